use std::io::Write;

use ocv_model::{Cardinality, KeyRole, NameShape, Scheme, SemanticType, Severity, TableKind};
use ocv_standards::{ConfigError, SchemaRegistry};

#[test]
fn loads_default_opencitations_schema() {
    let registry = SchemaRegistry::opencitations().expect("load default schema");
    registry
        .require(&[TableKind::Entity, TableKind::Citation])
        .expect("both tables registered");

    let entity = registry.columns_for(TableKind::Entity).expect("entity");
    let names: Vec<&str> = entity.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "id", "title", "author", "pub_date", "venue", "volume", "issue", "page", "type",
            "publisher", "editor"
        ]
    );

    let citation = registry.columns_for(TableKind::Citation).expect("citation");
    assert_eq!(citation.len(), 4);
}

#[test]
fn default_schema_roles_and_types() {
    let registry = SchemaRegistry::opencitations().expect("load default schema");

    let id = registry
        .column_with_role(TableKind::Entity, KeyRole::Primary)
        .expect("primary key");
    assert_eq!(id.name, "id");
    assert_eq!(
        id.cardinality,
        Cardinality::List {
            delimiter: " ".to_string()
        }
    );

    let cited = registry
        .column_with_role(TableKind::Citation, KeyRole::Cited)
        .expect("cited column");
    assert!(cited.resolve);
    assert!(cited.required);

    let author = registry
        .columns_for(TableKind::Entity)
        .expect("entity")
        .iter()
        .find(|c| c.name == "author")
        .expect("author");
    match &author.semantic {
        SemanticType::Agent { schemes, shape } => {
            assert_eq!(*shape, NameShape::Person);
            assert!(schemes.contains(&Scheme::Orcid));
        }
        other => panic!("unexpected type {}", other.tag()),
    }
}

#[test]
fn default_vocabulary_and_resolver() {
    let registry = SchemaRegistry::opencitations().expect("load default schema");
    let types = registry.vocabulary("entity_type").expect("entity_type");
    assert_eq!(types.terms.len(), 31);
    assert!(types.contains("journal article"));
    assert_eq!(types.severity, Severity::Error);

    let resolver = registry.resolver();
    assert!(resolver.endpoints.contains_key(&Scheme::Doi));
    assert!(!resolver.endpoints.contains_key(&Scheme::Pmid));
}

#[test]
fn unknown_semantic_type_fails_fast() {
    let text = r#"
[schema]
name = "bad"

[[tables.entity.columns]]
name = "id"
type = "uuid"
"#;
    let err = SchemaRegistry::from_toml_str(text, "test").unwrap_err();
    assert!(matches!(
        err,
        ConfigError::UnknownSemanticType { ref type_name, .. } if type_name == "uuid"
    ));
}

#[test]
fn undefined_vocabulary_fails_fast() {
    let text = r#"
[schema]
name = "bad"

[[tables.entity.columns]]
name = "type"
type = "vocabulary"
vocabulary = "missing"
"#;
    let err = SchemaRegistry::from_toml_str(text, "test").unwrap_err();
    assert!(matches!(err, ConfigError::UnknownVocabulary { .. }));
}

#[test]
fn list_without_delimiter_fails() {
    let text = r#"
[schema]
name = "bad"

[[tables.citation.columns]]
name = "citing_id"
type = "identifier"
schemes = ["doi"]
cardinality = "list"
"#;
    let err = SchemaRegistry::from_toml_str(text, "test").unwrap_err();
    assert!(matches!(err, ConfigError::MissingDelimiter { .. }));
}

#[test]
fn unknown_scheme_and_duplicate_column_fail() {
    let unknown = r#"
[schema]
name = "bad"

[[tables.citation.columns]]
name = "citing_id"
type = "identifier"
schemes = ["handle"]
"#;
    assert!(matches!(
        SchemaRegistry::from_toml_str(unknown, "test").unwrap_err(),
        ConfigError::UnknownScheme { .. }
    ));

    let duplicate = r#"
[schema]
name = "bad"

[[tables.citation.columns]]
name = "citing_id"
type = "text"

[[tables.citation.columns]]
name = "citing_id"
type = "text"
"#;
    assert!(matches!(
        SchemaRegistry::from_toml_str(duplicate, "test").unwrap_err(),
        ConfigError::DuplicateColumn { .. }
    ));
}

#[test]
fn vocabulary_severity_override() {
    let text = r#"
[schema]
name = "soft"

[vocabularies.kind]
severity = "warning"
terms = ["a", "b"]

[[tables.entity.columns]]
name = "type"
type = "vocabulary"
vocabulary = "kind"
"#;
    let registry = SchemaRegistry::from_toml_str(text, "test").expect("load");
    assert_eq!(
        registry.vocabulary("kind").expect("kind").severity,
        Severity::Warning
    );
}

#[test]
fn endpoint_without_placeholder_fails() {
    let text = r#"
[schema]
name = "bad"

[[tables.citation.columns]]
name = "cited_id"
type = "identifier"
schemes = ["doi"]

[resolver.endpoints]
doi = "https://doi.org/api/handles/"
"#;
    assert!(matches!(
        SchemaRegistry::from_toml_str(text, "test").unwrap_err(),
        ConfigError::InvalidEndpoint { .. }
    ));
}

#[test]
fn loads_schema_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(
        file,
        "[schema]\nname = \"disk\"\n\n[[tables.citation.columns]]\nname = \"citing_id\"\ntype = \"text\"\n"
    )
    .expect("write schema");
    let registry = SchemaRegistry::load(file.path()).expect("load from disk");
    assert_eq!(registry.name, "disk");
}

#[test]
fn missing_file_is_io_error() {
    let err = SchemaRegistry::load(std::path::Path::new("/nonexistent/schema.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}
