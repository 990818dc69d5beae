//! Table-kind detection from the header row.

use ocv_model::TableKind;
use ocv_standards::SchemaRegistry;

/// Pick the registered table kind whose columns best overlap `headers`.
///
/// Names match exactly, as they do during validation.
///
/// Returns `None` when nothing overlaps or two kinds tie.
pub fn detect_kind(headers: &[String], registry: &SchemaRegistry) -> Option<TableKind> {
    let mut best: Option<(TableKind, usize)> = None;
    let mut tied = false;

    for kind in registry.table_kinds() {
        let Ok(columns) = registry.columns_for(kind) else {
            continue;
        };
        let overlap = columns
            .iter()
            .filter(|column| headers.contains(&column.name))
            .count();
        match best {
            Some((_, score)) if overlap == score => tied = true,
            Some((_, score)) if overlap < score => {}
            _ => {
                best = Some((kind, overlap));
                tied = false;
            }
        }
    }

    match best {
        Some((kind, score)) if score > 0 && !tied => Some(kind),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn detects_citation_table() {
        let registry = SchemaRegistry::opencitations().expect("schema");
        let kind = detect_kind(
            &headers(&["citing_id", "citing_publication_date", "cited_id", "cited_publication_date"]),
            &registry,
        );
        assert_eq!(kind, Some(TableKind::Citation));
    }

    #[test]
    fn detects_entity_table_with_partial_header() {
        let registry = SchemaRegistry::opencitations().expect("schema");
        let kind = detect_kind(&headers(&["id", "title", "author", "extra"]), &registry);
        assert_eq!(kind, Some(TableKind::Entity));
    }

    #[test]
    fn header_names_match_exactly() {
        let registry = SchemaRegistry::opencitations().expect("schema");
        assert_eq!(
            detect_kind(&headers(&["ID", "TITLE", "AUTHOR"]), &registry),
            None
        );
    }

    #[test]
    fn unrelated_header_is_undetected() {
        let registry = SchemaRegistry::opencitations().expect("schema");
        assert_eq!(detect_kind(&headers(&["foo", "bar"]), &registry), None);
    }
}
