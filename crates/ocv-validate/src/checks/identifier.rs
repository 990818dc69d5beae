//! Identifier syntax and check-digit validation.
//!
//! Identifiers are written `scheme:local`. The lexical pattern is always
//! checked first; the check digit is only verified for schemes that carry one
//! and only once the pattern matched.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use ocv_model::{Rule, Scheme};
use regex::Regex;

use super::Violation;

/// Local-part patterns per scheme.
const PATTERNS: &[(Scheme, &str)] = &[
    (Scheme::Doi, r"^10\.\d{4,9}(\.\d+)*/\S+$"),
    (Scheme::Isbn, r"^(\d{9}[\dX]|97[89]\d{10})$"),
    (Scheme::Issn, r"^\d{4}-\d{3}[\dX]$"),
    (Scheme::Orcid, r"^\d{4}-\d{4}-\d{4}-\d{3}[\dX]$"),
    (Scheme::Pmid, r"^[1-9]\d*$"),
    (Scheme::Pmcid, r"^PMC[1-9]\d*$"),
    (Scheme::Url, r"^\S+\.\S+$"),
    (Scheme::Wikidata, r"^Q[1-9]\d*$"),
    (Scheme::Wikipedia, r"^[1-9]\d*$"),
    (Scheme::Openalex, r"^[WIASCPFV][1-9]\d*$"),
    (Scheme::Omid, r"^(br|ra|id|re|ar)/0\d+$"),
    (Scheme::Arxiv, r"^\d{4}\.\d{4,5}(v\d+)?$"),
    (Scheme::Jid, r"^\S+$"),
    (Scheme::Viaf, r"^[1-9]\d*$"),
    (Scheme::Ror, r"^0[a-hj-km-np-tv-z0-9]{6}\d{2}$"),
    (Scheme::Crossref, r"^[1-9]\d*$"),
];

static SCHEME_PATTERNS: LazyLock<BTreeMap<Scheme, Regex>> = LazyLock::new(|| {
    PATTERNS
        .iter()
        .map(|(scheme, pattern)| {
            (
                *scheme,
                Regex::new(pattern).expect("Invalid identifier pattern"),
            )
        })
        .collect()
});

/// Why an identifier's local part was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierDefect {
    Malformed,
    Checksum,
}

impl IdentifierDefect {
    pub fn rule(&self) -> Rule {
        match self {
            Self::Malformed => Rule::MalformedIdentifier,
            Self::Checksum => Rule::InvalidChecksum,
        }
    }
}

/// Split `scheme:local` into a known scheme and its local part.
pub fn parse_identifier(value: &str) -> Option<(Scheme, &str)> {
    let (prefix, local) = value.trim().split_once(':')?;
    let scheme = Scheme::parse(prefix)?;
    Some((scheme, local))
}

/// Validate the local part of an identifier for one scheme.
pub fn validate_local(scheme: Scheme, local: &str) -> Result<(), IdentifierDefect> {
    let normalized = if scheme.has_checksum() {
        local.to_uppercase()
    } else {
        local.to_string()
    };
    let matches = SCHEME_PATTERNS
        .get(&scheme)
        .is_some_and(|pattern| pattern.is_match(&normalized));
    if !matches {
        return Err(IdentifierDefect::Malformed);
    }

    let checksum_ok = match scheme {
        Scheme::Orcid => orcid_checksum_ok(&normalized),
        Scheme::Issn => issn_checksum_ok(&normalized),
        Scheme::Isbn => isbn_checksum_ok(&normalized),
        _ => true,
    };
    if checksum_ok {
        Ok(())
    } else {
        Err(IdentifierDefect::Checksum)
    }
}

/// Check a prefixed identifier against the schemes a column permits.
pub fn check_identifier(value: &str, schemes: &[Scheme]) -> Vec<Violation> {
    let trimmed = value.trim();
    let Some((prefix, local)) = trimmed.split_once(':') else {
        return vec![Violation::new(
            Rule::MalformedIdentifier,
            trimmed,
            format!("'{trimmed}' has no identifier scheme prefix"),
        )];
    };

    let Some(scheme) = Scheme::parse(prefix) else {
        return vec![Violation::new(
            Rule::MalformedIdentifier,
            trimmed,
            format!("'{prefix}' is not a known identifier scheme"),
        )];
    };

    if !schemes.contains(&scheme) {
        let allowed: Vec<&str> = schemes.iter().map(Scheme::prefix).collect();
        return vec![Violation::new(
            Rule::MalformedIdentifier,
            trimmed,
            format!(
                "identifier scheme '{scheme}' is not permitted here (allowed: {})",
                allowed.join(", ")
            ),
        )];
    }

    match validate_local(scheme, local) {
        Ok(()) => Vec::new(),
        Err(IdentifierDefect::Malformed) => vec![Violation::new(
            Rule::MalformedIdentifier,
            trimmed,
            format!("'{trimmed}' is not a well-formed {scheme} identifier"),
        )],
        Err(IdentifierDefect::Checksum) => vec![Violation::new(
            Rule::InvalidChecksum,
            trimmed,
            format!("'{trimmed}' fails the {scheme} check digit"),
        )],
    }
}

/// ORCID check digit (ISO 7064 MOD 11-2).
pub fn orcid_checksum_ok(orcid: &str) -> bool {
    let chars: Vec<char> = orcid.chars().filter(|c| *c != '-').collect();
    let Some((&check, body)) = chars.split_last() else {
        return false;
    };
    let mut total = 0u32;
    for ch in body {
        let Some(digit) = ch.to_digit(10) else {
            return false;
        };
        total = (total + digit) * 2;
    }
    let result = (12 - total % 11) % 11;
    check_char(result) == check
}

/// ISSN check digit (weights 8..2, mod 11).
pub fn issn_checksum_ok(issn: &str) -> bool {
    let chars: Vec<char> = issn.chars().filter(|c| *c != '-').collect();
    if chars.len() != 8 {
        return false;
    }
    let mut sum = 0u32;
    for (idx, ch) in chars[..7].iter().enumerate() {
        let Some(digit) = ch.to_digit(10) else {
            return false;
        };
        sum += digit * (8 - idx as u32);
    }
    let result = (11 - sum % 11) % 11;
    check_char(result) == chars[7]
}

/// ISBN-10 (mod 11) or ISBN-13 (mod 10) check digit.
pub fn isbn_checksum_ok(isbn: &str) -> bool {
    let chars: Vec<char> = isbn.chars().filter(|c| *c != '-').collect();
    match chars.len() {
        10 => {
            let mut sum = 0u32;
            for (idx, ch) in chars.iter().enumerate() {
                let digit = match (idx, ch) {
                    (9, 'X') => 10,
                    _ => match ch.to_digit(10) {
                        Some(digit) => digit,
                        None => return false,
                    },
                };
                sum += digit * (10 - idx as u32);
            }
            sum % 11 == 0
        }
        13 => {
            let mut sum = 0u32;
            for (idx, ch) in chars.iter().enumerate() {
                let Some(digit) = ch.to_digit(10) else {
                    return false;
                };
                sum += if idx % 2 == 0 { digit } else { digit * 3 };
            }
            sum % 10 == 0
        }
        _ => false,
    }
}

fn check_char(value: u32) -> char {
    if value == 10 {
        'X'
    } else {
        char::from_digit(value, 10).unwrap_or('?')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orcid_pattern_and_checksum() {
        assert_eq!(validate_local(Scheme::Orcid, "0000-0002-1825-0097"), Ok(()));
        assert_eq!(
            validate_local(Scheme::Orcid, "0000-0002-1825-0098"),
            Err(IdentifierDefect::Checksum)
        );
        assert_eq!(
            validate_local(Scheme::Orcid, "123-456"),
            Err(IdentifierDefect::Malformed)
        );
    }

    #[test]
    fn orcid_with_x_check_digit() {
        assert_eq!(validate_local(Scheme::Orcid, "0000-0002-9079-593X"), Ok(()));
        assert_eq!(validate_local(Scheme::Orcid, "0000-0002-9079-593x"), Ok(()));
    }

    #[test]
    fn issn_checksum() {
        assert_eq!(validate_local(Scheme::Issn, "0378-5955"), Ok(()));
        assert_eq!(validate_local(Scheme::Issn, "2049-3630"), Ok(()));
        assert_eq!(
            validate_local(Scheme::Issn, "0378-5954"),
            Err(IdentifierDefect::Checksum)
        );
    }

    #[test]
    fn isbn_checksums() {
        assert_eq!(validate_local(Scheme::Isbn, "9780306406157"), Ok(()));
        assert_eq!(validate_local(Scheme::Isbn, "0306406152"), Ok(()));
        assert_eq!(
            validate_local(Scheme::Isbn, "9780306406158"),
            Err(IdentifierDefect::Checksum)
        );
        assert_eq!(
            validate_local(Scheme::Isbn, "978-0306406157"),
            Err(IdentifierDefect::Malformed)
        );
    }

    #[test]
    fn doi_pattern() {
        assert_eq!(validate_local(Scheme::Doi, "10.1162/qss_a_00292"), Ok(()));
        assert_eq!(
            validate_local(Scheme::Doi, "11.1162/x"),
            Err(IdentifierDefect::Malformed)
        );
        assert_eq!(
            validate_local(Scheme::Doi, "10.1162"),
            Err(IdentifierDefect::Malformed)
        );
    }

    #[test]
    fn other_schemes() {
        assert_eq!(validate_local(Scheme::Wikidata, "Q42"), Ok(()));
        assert_eq!(validate_local(Scheme::Pmcid, "PMC123"), Ok(()));
        assert_eq!(validate_local(Scheme::Omid, "br/0601"), Ok(()));
        assert_eq!(validate_local(Scheme::Viaf, "102333412"), Ok(()));
        assert_eq!(validate_local(Scheme::Arxiv, "2101.00001v2"), Ok(()));
        assert_eq!(validate_local(Scheme::Ror, "02mhbdp94"), Ok(()));
        assert_eq!(
            validate_local(Scheme::Wikidata, "42"),
            Err(IdentifierDefect::Malformed)
        );
    }

    #[test]
    fn prefix_problems_are_malformed() {
        let schemes = [Scheme::Doi];
        let no_prefix = check_identifier("10.1/x", &schemes);
        assert_eq!(no_prefix[0].rule, Rule::MalformedIdentifier);

        let unknown = check_identifier("handle:1/2", &schemes);
        assert_eq!(unknown[0].rule, Rule::MalformedIdentifier);

        let disallowed = check_identifier("pmid:123", &schemes);
        assert_eq!(disallowed[0].rule, Rule::MalformedIdentifier);
        assert!(disallowed[0].message.contains("not permitted"));
    }

    #[test]
    fn checksum_failure_is_distinct() {
        let violations = check_identifier("orcid:0000-0002-1825-0098", &[Scheme::Orcid]);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule, Rule::InvalidChecksum);
    }

    #[test]
    fn parse_splits_scheme() {
        assert_eq!(
            parse_identifier(" doi:10.1/x "),
            Some((Scheme::Doi, "10.1/x"))
        );
        assert_eq!(parse_identifier("nope"), None);
    }
}
