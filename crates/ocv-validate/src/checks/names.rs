//! Agents (`Surname, Given [ids]`) and venues (`Title [ids]`).

use std::sync::LazyLock;

use ocv_model::{NameShape, Rule, Scheme};
use regex::Regex;

use super::Violation;
use super::identifier::check_identifier;

/// `Surname, Given names`: exactly one comma, non-empty surname.
static PERSON_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^,]*[^,\s][^,]*,[^,]*$").expect("Invalid name regex"));

/// An item split into its name and bracketed identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bracketed<'a> {
    pub name: &'a str,
    pub ids: Vec<&'a str>,
}

/// Split `Name [id id]`. Fails on unbalanced or repeated brackets, or on
/// text after the closing bracket.
pub fn parse_bracketed(item: &str) -> Option<Bracketed<'_>> {
    let item = item.trim();
    let opens = item.matches('[').count();
    let closes = item.matches(']').count();
    match (opens, closes) {
        (0, 0) => Some(Bracketed {
            name: item,
            ids: Vec::new(),
        }),
        (1, 1) => {
            let (name, rest) = item.split_once('[')?;
            let inner = rest.strip_suffix(']')?;
            Some(Bracketed {
                name: name.trim(),
                ids: inner.split_whitespace().collect(),
            })
        }
        _ => None,
    }
}

fn check_bracketed<'a>(item: &'a str, what: &str) -> Result<Bracketed<'a>, Violation> {
    let trimmed = item.trim();
    let parsed = parse_bracketed(trimmed).ok_or_else(|| {
        Violation::new(
            Rule::MalformedName,
            trimmed,
            format!("{what} '{trimmed}' has unbalanced identifier brackets"),
        )
    })?;
    if parsed.name.is_empty() && parsed.ids.is_empty() {
        return Err(Violation::new(
            Rule::MalformedName,
            trimmed,
            format!("{what} '{trimmed}' has neither a name nor an identifier"),
        ));
    }
    Ok(parsed)
}

pub fn check_agent(item: &str, schemes: &[Scheme], shape: NameShape) -> Vec<Violation> {
    let parsed = match check_bracketed(item, "agent") {
        Ok(parsed) => parsed,
        Err(violation) => return vec![violation],
    };

    let mut violations = Vec::new();
    if shape == NameShape::Person && !parsed.name.is_empty() && !PERSON_NAME.is_match(parsed.name)
    {
        violations.push(Violation::new(
            Rule::MalformedName,
            parsed.name,
            format!(
                "'{}' is not in 'Surname, Given names' form",
                parsed.name
            ),
        ));
    }
    for id in parsed.ids {
        violations.extend(check_identifier(id, schemes));
    }
    violations
}

pub fn check_venue(item: &str, schemes: &[Scheme]) -> Vec<Violation> {
    match check_bracketed(item, "venue") {
        Ok(parsed) => parsed
            .ids
            .into_iter()
            .flat_map(|id| check_identifier(id, schemes))
            .collect(),
        Err(violation) => vec![violation],
    }
}
