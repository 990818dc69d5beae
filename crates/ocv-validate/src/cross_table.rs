//! Cross-row and cross-table checks.
//!
//! Runs after the row phase has finished for every table, over the keys the
//! rows collected. Relational findings are grouped by the identifiers
//! involved, not by the cell text.

use std::collections::{BTreeMap, BTreeSet};

use ocv_model::{ColumnSpec, Finding, KeyRole, Location, Rule, TableKind};

use crate::row::{KeyItem, RowOutcome, TableOutcome};

/// Key column names of one table kind.
#[derive(Debug, Clone, Default)]
pub struct KeyColumns {
    pub primary: Option<String>,
    pub citing: Option<String>,
    pub cited: Option<String>,
}

impl KeyColumns {
    pub fn from_columns(columns: &[ColumnSpec]) -> Self {
        let named = |role: KeyRole| {
            columns
                .iter()
                .find(|spec| spec.role == Some(role))
                .map(|spec| spec.name.clone())
        };
        Self {
            primary: named(KeyRole::Primary),
            citing: named(KeyRole::Citing),
            cited: named(KeyRole::Cited),
        }
    }
}

/// A table's row results together with its key columns.
pub struct KeyedTable<'a> {
    pub outcome: &'a TableOutcome,
    pub keys: KeyColumns,
}

/// Run every relational check that the supplied tables allow.
pub fn check_relations(
    entity: Option<&KeyedTable<'_>>,
    citation: Option<&KeyedTable<'_>>,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    if let Some(entity) = entity {
        findings.extend(duplicate_identifiers(entity));
    }
    if let Some(citation) = citation {
        findings.extend(self_citations(citation));
        findings.extend(duplicate_citations(citation));
    }
    if let (Some(entity), Some(citation)) = (entity, citation) {
        findings.extend(dangling_references(entity, citation));
        findings.extend(orphan_entities(entity, citation));
    }

    findings
}

fn unique_keys(items: &[KeyItem]) -> BTreeSet<&str> {
    items.iter().map(|item| item.key.as_str()).collect()
}

fn joined(keys: &BTreeSet<&str>) -> String {
    keys.iter().copied().collect::<Vec<_>>().join(" ")
}

fn raw_joined(items: &[KeyItem]) -> String {
    items
        .iter()
        .map(|item| item.raw.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Identity of a citation row: its citing and cited identifier sets.
fn citation_pair(row: &RowOutcome) -> Option<String> {
    let citing = unique_keys(&row.keys.citing);
    let cited = unique_keys(&row.keys.cited);
    if citing.is_empty() || cited.is_empty() {
        return None;
    }
    Some(format!("{} -> {}", joined(&citing), joined(&cited)))
}

/// An identifier declared by more than one entity row.
fn duplicate_identifiers(entity: &KeyedTable<'_>) -> Vec<Finding> {
    let Some(column) = entity.keys.primary.as_deref() else {
        return Vec::new();
    };

    let mut declared: BTreeMap<&str, Vec<(usize, &KeyItem)>> = BTreeMap::new();
    for row in &entity.outcome.rows {
        let mut seen = BTreeSet::new();
        for item in &row.keys.primary {
            if seen.insert(item.key.as_str()) {
                declared
                    .entry(item.key.as_str())
                    .or_default()
                    .push((row.row, item));
            }
        }
    }

    let mut findings = Vec::new();
    for (key, occurrences) in declared {
        if occurrences.len() < 2 {
            continue;
        }
        let count = occurrences.len();
        for (row, item) in occurrences {
            findings.push(
                Finding::new(
                    Rule::DuplicateIdentifier,
                    Location::cell(TableKind::Entity, row, column).with_item(item.item),
                    item.raw.as_str(),
                    format!("identifier '{}' is declared by {count} entity rows", item.raw),
                )
                .with_signature(key),
            );
        }
    }
    findings
}

/// Both ends of a citation share an identifier.
fn self_citations(citation: &KeyedTable<'_>) -> Vec<Finding> {
    let (Some(citing_col), Some(cited_col)) =
        (citation.keys.citing.as_deref(), citation.keys.cited.as_deref())
    else {
        return Vec::new();
    };

    let mut findings = Vec::new();
    for row in &citation.outcome.rows {
        let citing = unique_keys(&row.keys.citing);
        let cited = unique_keys(&row.keys.cited);
        let shared: BTreeSet<&str> = citing.intersection(&cited).copied().collect();
        if shared.is_empty() {
            continue;
        }
        let Some(pair) = citation_pair(row) else {
            continue;
        };
        let message = format!("entity '{}' cites itself", joined(&shared));
        for column in [citing_col, cited_col] {
            findings.push(
                Finding::new(
                    Rule::SelfCitation,
                    Location::cell(TableKind::Citation, row.row, column),
                    joined(&shared),
                    message.clone(),
                )
                .with_signature(pair.clone()),
            );
        }
    }
    findings
}

/// The same (citing, cited) pair stated by more than one row.
fn duplicate_citations(citation: &KeyedTable<'_>) -> Vec<Finding> {
    let (Some(citing_col), Some(cited_col)) =
        (citation.keys.citing.as_deref(), citation.keys.cited.as_deref())
    else {
        return Vec::new();
    };

    let mut pairs: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for row in &citation.outcome.rows {
        if let Some(pair) = citation_pair(row) {
            pairs.entry(pair).or_default().push(row.row);
        }
    }

    let mut findings = Vec::new();
    for (pair, rows) in pairs {
        if rows.len() < 2 {
            continue;
        }
        let message = format!("citation {pair} appears in {} rows", rows.len());
        for row in rows {
            for column in [citing_col, cited_col] {
                findings.push(
                    Finding::new(
                        Rule::DuplicateCitation,
                        Location::cell(TableKind::Citation, row, column),
                        pair.as_str(),
                        message.clone(),
                    )
                    .with_signature(pair.clone()),
                );
            }
        }
    }
    findings
}

/// A citation end that no entity row describes and the external resolver did
/// not confirm.
fn dangling_references(entity: &KeyedTable<'_>, citation: &KeyedTable<'_>) -> Vec<Finding> {
    let described: BTreeSet<&str> = entity
        .outcome
        .rows
        .iter()
        .flat_map(|row| row.keys.primary.iter().map(|item| item.key.as_str()))
        .collect();

    let sides = [
        (KeyRole::Citing, "citing", citation.keys.citing.as_deref()),
        (KeyRole::Cited, "cited", citation.keys.cited.as_deref()),
    ];

    let mut findings = Vec::new();
    for row in &citation.outcome.rows {
        let pair = citation_pair(row);
        for (role, side, column) in sides {
            let Some(column) = column else {
                continue;
            };
            let items = row.keys.role(role);
            if items.is_empty() {
                continue;
            }
            let resolved = items.iter().any(|item| {
                described.contains(item.key.as_str()) || row.keys.known.contains(&item.key)
            });
            if resolved {
                continue;
            }
            let ids = raw_joined(items);
            let signature = match &pair {
                Some(pair) => format!("{side}|{pair}"),
                None => format!("{side}|{}", joined(&unique_keys(items))),
            };
            findings.push(
                Finding::new(
                    Rule::DanglingReference,
                    Location::cell(TableKind::Citation, row.row, column),
                    ids.as_str(),
                    format!("{side} entity '{ids}' is not described in the entity table"),
                )
                .with_signature(signature),
            );
        }
    }
    findings
}

/// An entity row that no citation mentions.
fn orphan_entities(entity: &KeyedTable<'_>, citation: &KeyedTable<'_>) -> Vec<Finding> {
    let Some(column) = entity.keys.primary.as_deref() else {
        return Vec::new();
    };
    let referenced: BTreeSet<&str> = citation
        .outcome
        .rows
        .iter()
        .flat_map(|row| row.keys.citing.iter().chain(&row.keys.cited))
        .map(|item| item.key.as_str())
        .collect();

    let mut findings = Vec::new();
    for row in &entity.outcome.rows {
        let keys = unique_keys(&row.keys.primary);
        if keys.is_empty() || keys.iter().any(|key| referenced.contains(key)) {
            continue;
        }
        let ids = raw_joined(&row.keys.primary);
        findings.push(
            Finding::new(
                Rule::OrphanEntity,
                Location::cell(TableKind::Entity, row.row, column),
                ids.as_str(),
                format!("entity '{ids}' takes part in no citation"),
            )
            .with_signature(joined(&keys)),
        );
    }
    findings
}

#[cfg(test)]
mod tests {
    use ocv_model::canonical_value;

    use super::*;
    use crate::row::RowKeys;

    fn key_items(ids: &[&str]) -> Vec<KeyItem> {
        ids.iter()
            .enumerate()
            .map(|(idx, id)| KeyItem {
                key: canonical_value(id),
                raw: id.to_string(),
                item: Some(idx),
            })
            .collect()
    }

    fn entity_rows(ids: &[&[&str]]) -> TableOutcome {
        TableOutcome {
            kind: TableKind::Entity,
            rows: ids
                .iter()
                .enumerate()
                .map(|(row, ids)| RowOutcome {
                    row,
                    cells: Vec::new(),
                    findings: Vec::new(),
                    keys: RowKeys {
                        primary: key_items(ids),
                        ..RowKeys::default()
                    },
                })
                .collect(),
        }
    }

    fn citation_rows(pairs: &[(&str, &str)]) -> TableOutcome {
        TableOutcome {
            kind: TableKind::Citation,
            rows: pairs
                .iter()
                .enumerate()
                .map(|(row, (citing, cited))| RowOutcome {
                    row,
                    cells: Vec::new(),
                    findings: Vec::new(),
                    keys: RowKeys {
                        citing: key_items(&[citing]),
                        cited: key_items(&[cited]),
                        ..RowKeys::default()
                    },
                })
                .collect(),
        }
    }

    fn entity_keys() -> KeyColumns {
        KeyColumns {
            primary: Some("id".to_string()),
            ..KeyColumns::default()
        }
    }

    fn citation_keys() -> KeyColumns {
        KeyColumns {
            citing: Some("citing_id".to_string()),
            cited: Some("cited_id".to_string()),
            ..KeyColumns::default()
        }
    }

    #[test]
    fn duplicate_identifier_marks_every_row() {
        let outcome = entity_rows(&[&["doi:10.1000/e7"], &["doi:10.1000/x"], &["DOI:10.1000/E7"]]);
        let entity = KeyedTable {
            outcome: &outcome,
            keys: entity_keys(),
        };
        let findings = check_relations(Some(&entity), None);
        assert_eq!(findings.len(), 2);
        assert!(findings.iter().all(|f| f.rule == Rule::DuplicateIdentifier));
        assert_eq!(findings[0].signature, findings[1].signature);
        let rows: Vec<usize> = findings.iter().map(|f| f.location.row).collect();
        assert_eq!(rows, vec![0, 2]);
    }

    #[test]
    fn dangling_and_orphan() {
        let entities = entity_rows(&[&["doi:10.1000/e1"], &["doi:10.1000/e2"], &["doi:10.1000/e9"]]);
        let citations = citation_rows(&[
            ("doi:10.1000/e1", "doi:10.1000/e2"),
            ("doi:10.1000/e1", "doi:10.1000/e3"),
        ]);
        let entity = KeyedTable {
            outcome: &entities,
            keys: entity_keys(),
        };
        let citation = KeyedTable {
            outcome: &citations,
            keys: citation_keys(),
        };
        let findings = check_relations(Some(&entity), Some(&citation));

        let dangling: Vec<&Finding> = findings
            .iter()
            .filter(|f| f.rule == Rule::DanglingReference)
            .collect();
        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].location.row, 1);
        assert_eq!(dangling[0].location.column, "cited_id");

        let orphans: Vec<&Finding> = findings
            .iter()
            .filter(|f| f.rule == Rule::OrphanEntity)
            .collect();
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].location.row, 2);
    }

    #[test]
    fn one_sided_dangling_rows_keep_their_own_identity() {
        let entities = entity_rows(&[&["doi:10.1000/e1"]]);
        let mut citations = citation_rows(&[
            ("doi:10.1000/unused", "doi:10.1000/x"),
            ("doi:10.1000/unused", "doi:10.1000/y"),
            ("doi:10.1000/unused", "DOI:10.1000/X"),
        ]);
        for row in &mut citations.rows {
            row.keys.citing.clear();
        }
        let entity = KeyedTable {
            outcome: &entities,
            keys: entity_keys(),
        };
        let citation = KeyedTable {
            outcome: &citations,
            keys: citation_keys(),
        };
        let dangling: Vec<Finding> = check_relations(Some(&entity), Some(&citation))
            .into_iter()
            .filter(|f| f.rule == Rule::DanglingReference)
            .collect();
        assert_eq!(dangling.len(), 3);
        assert_ne!(dangling[0].signature, dangling[1].signature);
        assert_eq!(dangling[0].signature, dangling[2].signature);
    }

    #[test]
    fn externally_known_ids_are_not_dangling() {
        let entities = entity_rows(&[&["doi:10.1000/e1"]]);
        let mut citations = citation_rows(&[("doi:10.1000/e1", "doi:10.1000/ext")]);
        citations.rows[0]
            .keys
            .known
            .insert("doi:10.1000/ext".to_string());
        let entity = KeyedTable {
            outcome: &entities,
            keys: entity_keys(),
        };
        let citation = KeyedTable {
            outcome: &citations,
            keys: citation_keys(),
        };
        let findings = check_relations(Some(&entity), Some(&citation));
        assert!(findings.iter().all(|f| f.rule != Rule::DanglingReference));
    }

    #[test]
    fn citation_only_checks() {
        let citations = citation_rows(&[
            ("doi:10.1000/a", "doi:10.1000/a"),
            ("doi:10.1000/a", "doi:10.1000/b"),
            ("doi:10.1000/A", "doi:10.1000/b"),
        ]);
        let citation = KeyedTable {
            outcome: &citations,
            keys: citation_keys(),
        };
        let findings = check_relations(None, Some(&citation));

        let self_cites = findings
            .iter()
            .filter(|f| f.rule == Rule::SelfCitation)
            .count();
        assert_eq!(self_cites, 2);

        let duplicates: Vec<&Finding> = findings
            .iter()
            .filter(|f| f.rule == Rule::DuplicateCitation)
            .collect();
        assert_eq!(duplicates.len(), 4);
        assert!(duplicates.iter().all(|f| f.location.row > 0));
        assert!(findings.iter().all(|f| f.rule != Rule::DanglingReference));
    }
}
