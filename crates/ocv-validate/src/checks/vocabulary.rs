use ocv_model::{Rule, Vocabulary};

use super::Violation;

/// Membership in a controlled vocabulary. Matching is exact; a case-only
/// mismatch is still a violation but the message names the intended term.
pub fn check_term(value: &str, vocabulary: &Vocabulary) -> Option<Violation> {
    let trimmed = value.trim();
    if vocabulary.contains(trimmed) {
        return None;
    }
    let message = match vocabulary.near_match(trimmed) {
        Some(term) => format!(
            "'{trimmed}' is not a {} term (did you mean '{term}'?)",
            vocabulary.name
        ),
        None => format!("'{trimmed}' is not a {} term", vocabulary.name),
    };
    Some(Violation::new(Rule::UnknownVocabularyTerm, trimmed, message).with_severity(vocabulary.severity))
}

#[cfg(test)]
mod tests {
    use ocv_model::Severity;

    use super::*;

    fn types(severity: Severity) -> Vocabulary {
        Vocabulary {
            name: "entity_type".to_string(),
            terms: ["journal article", "book"].iter().map(|t| t.to_string()).collect(),
            severity,
        }
    }

    #[test]
    fn known_term_passes() {
        assert!(check_term("book", &types(Severity::Error)).is_none());
    }

    #[test]
    fn case_mismatch_suggests_term() {
        let violation = check_term("Journal Article", &types(Severity::Error)).expect("violation");
        assert_eq!(violation.rule, Rule::UnknownVocabularyTerm);
        assert!(violation.message.contains("did you mean 'journal article'"));
        assert_eq!(violation.severity, Some(Severity::Error));
    }

    #[test]
    fn configured_severity_is_carried() {
        let violation = check_term("thesis", &types(Severity::Warning)).expect("violation");
        assert_eq!(violation.severity, Some(Severity::Warning));
    }
}
