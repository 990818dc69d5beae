mod common;

use common::{
    CITATION_HEADERS, ENTITY_HEADERS, StubResolver, citation, entity, table,
};
use ocv_model::{Rule, Severity, TableKind};
use ocv_standards::{ConfigError, SchemaRegistry};
use ocv_validate::{
    OfflineResolver, ValidateError, ValidationOptions, Validator, validate,
};

fn registry() -> SchemaRegistry {
    SchemaRegistry::opencitations().expect("default schema")
}

#[test]
fn clean_entity_row_has_no_issues() {
    let registry = registry();
    let entities = table(
        TableKind::Entity,
        ENTITY_HEADERS,
        &[vec![
            "doi:10.1007/s11192-022-04367-w omid:br/0601",
            "A Study Of Citations",
            "Peroni, Silvio [orcid:0000-0003-0530-4305]; Heibi, Ivan",
            "2021-02",
            "Scientometrics [issn:0138-9130 issn:1588-2861]",
            "126",
            "2",
            "1-25",
            "journal article",
            "Springer Science And Business Media LLC [crossref:297]",
            "",
        ]],
    );
    let report = validate(&[entities], &registry, &OfflineResolver, ValidationOptions::default())
        .expect("validate");
    assert!(report.is_empty(), "unexpected issues: {:?}", report.issues);
    assert!(!report.has_errors());
}

#[test]
fn dangling_citation_is_one_issue() {
    let registry = registry();
    let entities = table(
        TableKind::Entity,
        ENTITY_HEADERS,
        &[entity("doi:10.1000/e1"), entity("doi:10.1000/e2")],
    );
    let citations = table(
        TableKind::Citation,
        CITATION_HEADERS,
        &[
            citation("doi:10.1000/e1", "doi:10.1000/e2"),
            citation("doi:10.1000/e1", "doi:10.1000/e3"),
        ],
    );

    let report = validate(
        &[entities, citations],
        &registry,
        &OfflineResolver,
        ValidationOptions::default(),
    )
    .expect("validate");

    let dangling: Vec<_> = report.by_rule(Rule::DanglingReference).collect();
    assert_eq!(dangling.len(), 1);
    assert_eq!(dangling[0].locations.len(), 1);
    assert_eq!(dangling[0].locations[0].table, TableKind::Citation);
    assert_eq!(dangling[0].locations[0].row, 1);
    assert_eq!(dangling[0].locations[0].column, "cited_id");
    assert!(report.has_errors());
}

#[test]
fn duplicate_identifier_covers_both_rows() {
    let registry = registry();
    let entities = table(
        TableKind::Entity,
        ENTITY_HEADERS,
        &[
            entity("doi:10.1000/e7"),
            entity("doi:10.1000/e8"),
            entity("doi:10.1000/e7"),
        ],
    );
    let report = validate(&[entities], &registry, &OfflineResolver, ValidationOptions::default())
        .expect("validate");

    assert_eq!(report.issues.len(), 1);
    let issue = &report.issues[0];
    assert_eq!(issue.rule, Rule::DuplicateIdentifier);
    let rows: Vec<usize> = issue.locations.iter().map(|l| l.row).collect();
    assert_eq!(rows, vec![0, 2]);
}

#[test]
fn same_bad_value_groups_across_rows() {
    let registry = registry();
    let mut rows = Vec::new();
    for idx in 0..3 {
        let mut row = citation("doi:10.1000/a", "doi:10.1000/b");
        row[1] = "2020-13-01";
        if idx == 1 {
            row[2] = "doi:10.1000/c";
        }
        rows.push(row);
    }
    let citations = table(TableKind::Citation, CITATION_HEADERS, &rows);
    let report = validate(&[citations], &registry, &OfflineResolver, ValidationOptions::default())
        .expect("validate");

    let dates: Vec<_> = report.by_rule(Rule::InvalidDate).collect();
    assert_eq!(dates.len(), 1);
    assert_eq!(dates[0].locations.len(), 3);
}

#[test]
fn missing_column_groups_by_column() {
    let registry = registry();
    let citations = table(
        TableKind::Citation,
        &["citing_id", "cited_id"],
        &[
            vec!["doi:10.1000/a", "doi:10.1000/b"],
            vec!["doi:10.1000/c", "doi:10.1000/d"],
        ],
    );
    let report = validate(&[citations], &registry, &OfflineResolver, ValidationOptions::default())
        .expect("validate");

    let missing: Vec<_> = report.by_rule(Rule::MissingColumn).collect();
    assert_eq!(missing.len(), 2);
    assert!(missing.iter().all(|issue| issue.locations.len() == 2));
    assert_eq!(missing[0].locations[0].column, "citing_publication_date");
}

#[test]
fn results_are_stable_and_parallel_safe() {
    let registry = registry();
    let mut rows = Vec::new();
    for idx in 0..40 {
        rows.push(match idx % 4 {
            0 => citation("doi:10.1000/a", "doi:10.1000/a"),
            1 => citation("doi:10.1000/a", "pmid:0"),
            2 => citation("doi:10.1000/b", "doi:10.1000/c  doi:10.1000/d"),
            _ => citation("", "doi:10.1000/e"),
        });
    }
    let citations = table(TableKind::Citation, CITATION_HEADERS, &rows);
    let tables = [citations];

    let sequential = validate(&tables, &registry, &OfflineResolver, ValidationOptions::default())
        .expect("sequential");
    let again = validate(&tables, &registry, &OfflineResolver, ValidationOptions::default())
        .expect("again");
    let parallel = validate(
        &tables,
        &registry,
        &OfflineResolver,
        ValidationOptions { parallel: true },
    )
    .expect("parallel");

    assert_eq!(sequential, again);
    assert_eq!(sequential, parallel);

    let total: usize = sequential
        .issues
        .iter()
        .map(|issue| issue.locations.len())
        .sum();
    assert!(total <= sequential.summary.findings);
    for issue in &sequential.issues {
        assert!(!issue.locations.is_empty());
    }
}

#[test]
fn each_identifier_is_resolved_once() {
    let registry = registry();
    let rows: Vec<Vec<&str>> = (0..64)
        .map(|_| citation("doi:10.1000/a", "doi:10.1000/shared"))
        .collect();
    let citations = table(TableKind::Citation, CITATION_HEADERS, &rows);
    let resolver = StubResolver::knowing(&["10.1000/shared"]);

    let validator = Validator::new(&registry, &resolver)
        .with_options(ValidationOptions { parallel: true });
    let report = validator.validate(&[citations]).expect("validate");

    assert_eq!(resolver.calls(), 1);
    assert_eq!(validator.lookups(), 1);
    assert!(report.by_rule(Rule::UnresolvedReference).next().is_none());
}

#[test]
fn unknown_identifier_is_unresolved_reference() {
    let registry = registry();
    let citations = table(
        TableKind::Citation,
        CITATION_HEADERS,
        &[
            citation("doi:10.1000/a", "doi:10.1000/ghost"),
            citation("doi:10.1000/b", "doi:10.1000/ghost"),
        ],
    );
    let resolver = StubResolver::knowing(&[]);
    let report = validate(&[citations], &registry, &resolver, ValidationOptions::default())
        .expect("validate");

    let unresolved: Vec<_> = report.by_rule(Rule::UnresolvedReference).collect();
    assert_eq!(unresolved.len(), 1);
    assert_eq!(unresolved[0].locations.len(), 2);
    assert_eq!(unresolved[0].severity, Severity::Error);
    assert_eq!(resolver.calls(), 1);
}

#[test]
fn lookup_failure_is_only_a_warning() {
    let registry = registry();
    let citations = table(
        TableKind::Citation,
        CITATION_HEADERS,
        &[citation("doi:10.1000/a", "doi:10.1000/b")],
    );
    let resolver = StubResolver::failing();
    let report = validate(&[citations], &registry, &resolver, ValidationOptions::default())
        .expect("validate");

    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].rule, Rule::ExternalCheckUnavailable);
    assert!(!report.has_errors());
}

#[test]
fn malformed_identifiers_are_not_looked_up() {
    let registry = registry();
    let citations = table(
        TableKind::Citation,
        CITATION_HEADERS,
        &[citation("doi:10.1000/a", "doi:11.1/b")],
    );
    let resolver = StubResolver::knowing(&[]);
    let report = validate(&[citations], &registry, &resolver, ValidationOptions::default())
        .expect("validate");

    assert_eq!(resolver.calls(), 0);
    assert!(report.by_rule(Rule::MalformedIdentifier).next().is_some());
}

#[test]
fn one_table_per_kind() {
    let registry = registry();
    let first = table(TableKind::Citation, CITATION_HEADERS, &[]);
    let second = table(TableKind::Citation, CITATION_HEADERS, &[]);
    let err = validate(
        &[first, second],
        &registry,
        &OfflineResolver,
        ValidationOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ValidateError::DuplicateTable {
            kind: TableKind::Citation
        }
    ));
}

#[test]
fn unregistered_table_kind_is_fatal() {
    let registry = SchemaRegistry::from_toml_str(
        "[schema]\nname = \"entities-only\"\n\n[[tables.entity.columns]]\nname = \"id\"\ntype = \"text\"\n",
        "test",
    )
    .expect("schema");
    let citations = table(TableKind::Citation, CITATION_HEADERS, &[]);
    let err = validate(&[citations], &registry, &OfflineResolver, ValidationOptions::default())
        .unwrap_err();
    assert!(matches!(
        err,
        ValidateError::Config(ConfigError::MissingTable { .. })
    ));
}

#[test]
fn dangling_ids_without_a_citing_side_stay_separate() {
    let registry = registry();
    let entities = table(TableKind::Entity, ENTITY_HEADERS, &[entity("doi:10.1000/e1")]);
    let citations = table(
        TableKind::Citation,
        CITATION_HEADERS,
        &[
            citation("", "doi:10.1000/x"),
            citation("", "doi:10.1000/y"),
        ],
    );

    let report = validate(
        &[entities, citations],
        &registry,
        &OfflineResolver,
        ValidationOptions::default(),
    )
    .expect("validate");

    let dangling: Vec<_> = report.by_rule(Rule::DanglingReference).collect();
    assert_eq!(dangling.len(), 2);
    assert_eq!(dangling[0].value, "doi:10.1000/x");
    assert_eq!(dangling[1].value, "doi:10.1000/y");
    assert!(dangling.iter().all(|issue| issue.locations.len() == 1));
}

#[test]
fn repeated_header_column_is_reported() {
    let registry = registry();
    let mut headers = CITATION_HEADERS.to_vec();
    headers.push("cited_id");
    let mut row = citation("doi:10.1000/a", "doi:10.1000/b");
    row.push("NOT-AN-ID");
    let citations = table(TableKind::Citation, &headers, &[row]);

    let report = validate(&[citations], &registry, &OfflineResolver, ValidationOptions::default())
        .expect("validate");

    let unexpected: Vec<_> = report.by_rule(Rule::UnexpectedColumn).collect();
    assert_eq!(unexpected.len(), 1);
    assert_eq!(unexpected[0].value, "NOT-AN-ID");
    assert_eq!(unexpected[0].severity, Severity::Warning);
}

#[test]
fn extra_column_groups_per_table() {
    let registry = registry();
    let mut entity_headers = ENTITY_HEADERS.to_vec();
    entity_headers.push("notes");
    let mut entity_row = entity("doi:10.1000/e1");
    entity_row.push("a");
    let mut citation_headers = CITATION_HEADERS.to_vec();
    citation_headers.push("notes");
    let mut citation_row = citation("doi:10.1000/e1", "doi:10.1000/e1");
    citation_row.push("b");

    let report = validate(
        &[
            table(TableKind::Entity, &entity_headers, &[entity_row]),
            table(TableKind::Citation, &citation_headers, &[citation_row]),
        ],
        &registry,
        &OfflineResolver,
        ValidationOptions::default(),
    )
    .expect("validate");

    let unexpected: Vec<_> = report.by_rule(Rule::UnexpectedColumn).collect();
    assert_eq!(unexpected.len(), 2);
    assert_eq!(unexpected[0].locations[0].table, TableKind::Entity);
    assert_eq!(unexpected[1].locations[0].table, TableKind::Citation);
    assert_ne!(unexpected[0].id, unexpected[1].id);
}
