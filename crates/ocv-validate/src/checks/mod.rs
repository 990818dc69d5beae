//! Field validators.
//!
//! Every validator is a pure function of one atomic value and the column's
//! semantic type. Validators never see other cells or rows; the row validator
//! attaches locations to what they return.

pub mod date;
pub mod identifier;
pub mod names;
pub mod numeral;
pub mod vocabulary;

use ocv_model::{ColumnSpec, Finding, Location, Rule, SemanticType, Severity};

/// A violation found in one value, before it is placed in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub rule: Rule,
    pub value: String,
    pub message: String,
    /// Overrides the rule's default severity.
    pub severity: Option<Severity>,
}

impl Violation {
    pub fn new(rule: Rule, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule,
            value: value.into(),
            message: message.into(),
            severity: None,
        }
    }

    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Place this violation at a location.
    pub fn into_finding(self, location: Location) -> Finding {
        let finding = Finding::new(self.rule, location, self.value, self.message);
        match self.severity {
            Some(severity) => finding.with_severity(severity),
            None => finding,
        }
    }
}

/// Run the validators for one non-empty item of a cell.
pub fn check_item(item: &str, spec: &ColumnSpec) -> Vec<Violation> {
    match &spec.semantic {
        SemanticType::Text => Vec::new(),
        SemanticType::Identifier { schemes } => identifier::check_identifier(item, schemes),
        SemanticType::Agent { schemes, shape } => names::check_agent(item, schemes, *shape),
        SemanticType::Venue { schemes } => names::check_venue(item, schemes),
        SemanticType::Date => date::check_date(item).into_iter().collect(),
        SemanticType::Numeral { style } => numeral::check_numeral(item, *style)
            .into_iter()
            .collect(),
        SemanticType::PageRange { style } => numeral::check_page_range(item, *style)
            .into_iter()
            .collect(),
        SemanticType::Vocabulary { vocabulary } => vocabulary::check_term(item, vocabulary)
            .into_iter()
            .collect(),
    }
}

/// Raw identifiers carried by an item: the item itself for identifier
/// columns, the bracketed list for agents and venues.
pub fn identifiers_in<'a>(item: &'a str, spec: &ColumnSpec) -> Vec<&'a str> {
    match &spec.semantic {
        SemanticType::Identifier { .. } => {
            let trimmed = item.trim();
            if trimmed.is_empty() {
                Vec::new()
            } else {
                vec![trimmed]
            }
        }
        SemanticType::Agent { .. } | SemanticType::Venue { .. } => names::parse_bracketed(item)
            .map(|parsed| parsed.ids)
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}
