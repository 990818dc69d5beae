//! Column contracts for the two table kinds.
//!
//! A [`ColumnSpec`] is immutable once the schema registry has been built. The
//! [`SemanticType`] is a closed set: every variant maps to exactly one family of
//! field validators.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::finding::Severity;

/// The kind of table being validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    /// Bibliographic entities (META-CSV).
    Entity,
    /// Citations between entities (CITS-CSV).
    Citation,
}

impl TableKind {
    pub const ALL: [TableKind; 2] = [TableKind::Entity, TableKind::Citation];

    /// Parse a table kind from its configuration key.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "entity" | "entities" | "meta" | "metadata" => Some(Self::Entity),
            "citation" | "citations" | "cits" => Some(Self::Citation),
            _ => None,
        }
    }

    /// Short code used in element ids of the rendered report.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Entity => "meta",
            Self::Citation => "cits",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Entity => "Entity table",
            Self::Citation => "Citation table",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Identifier schemes recognised in `scheme:value` identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Doi,
    Isbn,
    Issn,
    Orcid,
    Pmid,
    Pmcid,
    Url,
    Wikidata,
    Wikipedia,
    Openalex,
    Omid,
    Arxiv,
    Jid,
    Viaf,
    Ror,
    Crossref,
}

impl Scheme {
    pub const ALL: [Scheme; 16] = [
        Scheme::Doi,
        Scheme::Isbn,
        Scheme::Issn,
        Scheme::Orcid,
        Scheme::Pmid,
        Scheme::Pmcid,
        Scheme::Url,
        Scheme::Wikidata,
        Scheme::Wikipedia,
        Scheme::Openalex,
        Scheme::Omid,
        Scheme::Arxiv,
        Scheme::Jid,
        Scheme::Viaf,
        Scheme::Ror,
        Scheme::Crossref,
    ];

    /// The prefix written before the colon (e.g. `doi`).
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Doi => "doi",
            Self::Isbn => "isbn",
            Self::Issn => "issn",
            Self::Orcid => "orcid",
            Self::Pmid => "pmid",
            Self::Pmcid => "pmcid",
            Self::Url => "url",
            Self::Wikidata => "wikidata",
            Self::Wikipedia => "wikipedia",
            Self::Openalex => "openalex",
            Self::Omid => "omid",
            Self::Arxiv => "arxiv",
            Self::Jid => "jid",
            Self::Viaf => "viaf",
            Self::Ror => "ror",
            Self::Crossref => "crossref",
        }
    }

    /// Parse a scheme from its prefix (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|scheme| scheme.prefix() == lower)
    }

    /// Whether the scheme carries a check digit.
    pub fn has_checksum(&self) -> bool {
        matches!(self, Self::Isbn | Self::Issn | Self::Orcid)
    }

    /// Whether the local part compares case-insensitively.
    pub fn is_case_insensitive(&self) -> bool {
        matches!(self, Self::Doi | Self::Isbn | Self::Issn | Self::Orcid)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// How a cell splits into atomic values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Cardinality {
    Single,
    List { delimiter: String },
}

impl Cardinality {
    /// Split a raw cell into items, preserving blanks so they can be reported.
    ///
    /// An empty cell yields no items.
    pub fn split<'a>(&self, value: &'a str) -> Vec<&'a str> {
        if value.trim().is_empty() {
            return Vec::new();
        }
        match self {
            Self::Single => vec![value],
            Self::List { delimiter } => value.split(delimiter.as_str()).collect(),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::List { .. })
    }

    /// Delimiter used to join items back together when rendering.
    pub fn delimiter(&self) -> &str {
        match self {
            Self::Single => "",
            Self::List { delimiter } => delimiter,
        }
    }
}

/// Shape demanded of the name part of an agent item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameShape {
    /// `Surname, Given Names`.
    Person,
    /// Any non-structured name (organisations, publishers).
    Free,
}

/// Numeral systems accepted by a numeral column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumeralStyle {
    pub arabic: bool,
    pub roman: bool,
}

impl Default for NumeralStyle {
    fn default() -> Self {
        Self {
            arabic: true,
            roman: true,
        }
    }
}

/// A closed set of permitted terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    pub name: String,
    pub terms: BTreeSet<String>,
    /// Severity of an out-of-vocabulary value.
    pub severity: Severity,
}

impl Vocabulary {
    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains(term)
    }

    /// A term equal to `value` ignoring case, if one exists.
    pub fn near_match(&self, value: &str) -> Option<&str> {
        let lower = value.to_lowercase();
        self.terms
            .iter()
            .find(|term| term.to_lowercase() == lower)
            .map(String::as_str)
    }
}

/// Semantic role of a column; selects its field validators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SemanticType {
    /// Free text, no syntax checks.
    Text,
    /// `scheme:value` identifiers.
    Identifier { schemes: Vec<Scheme> },
    /// `Name [scheme:value ...]` agents.
    Agent { schemes: Vec<Scheme>, shape: NameShape },
    /// `Venue Name [scheme:value ...]`.
    Venue { schemes: Vec<Scheme> },
    /// ISO full or partial date.
    Date,
    /// Volume or issue sequence number.
    Numeral { style: NumeralStyle },
    /// `start-end` page numbers.
    PageRange { style: NumeralStyle },
    /// Member of a controlled vocabulary.
    Vocabulary { vocabulary: Arc<Vocabulary> },
}

impl SemanticType {
    /// Configuration tag for this type.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Identifier { .. } => "identifier",
            Self::Agent { .. } => "agent",
            Self::Venue { .. } => "venue",
            Self::Date => "date",
            Self::Numeral { .. } => "numeral",
            Self::PageRange { .. } => "page_range",
            Self::Vocabulary { .. } => "vocabulary",
        }
    }

    /// Schemes permitted in identifiers carried by this column.
    pub fn schemes(&self) -> &[Scheme] {
        match self {
            Self::Identifier { schemes }
            | Self::Agent { schemes, .. }
            | Self::Venue { schemes } => schemes,
            _ => &[],
        }
    }
}

/// Relational role of a column, used by cross-row checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyRole {
    /// Primary identifiers of an entity row.
    Primary,
    /// Identifiers of the citing entity.
    Citing,
    /// Identifiers of the cited entity.
    Cited,
}

/// Contract for one column of a table kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub semantic: SemanticType,
    pub cardinality: Cardinality,
    pub required: bool,
    pub role: Option<KeyRole>,
    /// Identifiers must be confirmed by the external resolver.
    pub resolve: bool,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, semantic: SemanticType) -> Self {
        Self {
            name: name.into(),
            semantic,
            cardinality: Cardinality::Single,
            required: false,
            role: None,
            resolve: false,
        }
    }

    #[must_use]
    pub fn list(mut self, delimiter: impl Into<String>) -> Self {
        self.cardinality = Cardinality::List {
            delimiter: delimiter.into(),
        };
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn with_role(mut self, role: KeyRole) -> Self {
        self.role = Some(role);
        self
    }

    #[must_use]
    pub fn resolved(mut self) -> Self {
        self.resolve = true;
        self
    }
}
