//! Volume, issue and page numerals.

use std::sync::LazyLock;

use ocv_model::{NumeralStyle, Rule};
use regex::Regex;

use super::Violation;

static ARABIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("Invalid numeral regex"));

static ROMAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^M{0,3}(CM|CD|D?C{0,3})(XC|XL|L?X{0,3})(IX|IV|V?I{0,3})$")
        .expect("Invalid numeral regex")
});

/// A parsed numeral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Numeral {
    pub value: u32,
    pub roman: bool,
}

/// Value of a canonical roman numeral, all upper or all lower case.
pub fn roman_value(value: &str) -> Option<u32> {
    if value.is_empty() {
        return None;
    }
    let upper = value.to_uppercase();
    if value != upper && value != value.to_lowercase() {
        return None;
    }
    if !ROMAN.is_match(&upper) {
        return None;
    }

    let digit = |ch: char| match ch {
        'I' => 1,
        'V' => 5,
        'X' => 10,
        'L' => 50,
        'C' => 100,
        'D' => 500,
        'M' => 1000,
        _ => 0,
    };
    let digits: Vec<u32> = upper.chars().map(digit).collect();
    let mut total = 0;
    for (idx, current) in digits.iter().enumerate() {
        match digits.get(idx + 1) {
            Some(next) if next > current => total -= *current as i64,
            _ => total += *current as i64,
        }
    }
    u32::try_from(total).ok()
}

/// Parse a numeral in any system the style allows.
pub fn parse_numeral(value: &str, style: NumeralStyle) -> Option<Numeral> {
    let value = value.trim();
    if style.arabic && ARABIC.is_match(value) {
        return value
            .parse()
            .ok()
            .map(|value| Numeral { value, roman: false });
    }
    if style.roman {
        return roman_value(value).map(|value| Numeral { value, roman: true });
    }
    None
}

fn expected(style: NumeralStyle) -> &'static str {
    match (style.arabic, style.roman) {
        (true, true) => "an arabic or roman numeral",
        (false, true) => "a roman numeral",
        _ => "an arabic numeral",
    }
}

pub fn check_numeral(value: &str, style: NumeralStyle) -> Option<Violation> {
    let trimmed = value.trim();
    if parse_numeral(trimmed, style).is_some() {
        return None;
    }
    Some(Violation::new(
        Rule::InvalidNumeral,
        trimmed,
        format!("'{trimmed}' is not {}", expected(style)),
    ))
}

/// Check `start` or `start-end`.
pub fn check_page_range(value: &str, style: NumeralStyle) -> Option<Violation> {
    let trimmed = value.trim();
    let parts: Vec<&str> = trimmed.split('-').collect();
    if parts.len() > 2 {
        return Some(Violation::new(
            Rule::InvalidPageRange,
            trimmed,
            format!("'{trimmed}' is not a 'start-end' page range"),
        ));
    }

    let mut numerals = Vec::with_capacity(parts.len());
    for part in &parts {
        match parse_numeral(part, style) {
            Some(numeral) => numerals.push(numeral),
            None => {
                return Some(Violation::new(
                    Rule::InvalidNumeral,
                    trimmed,
                    format!(
                        "page '{}' in '{trimmed}' is not {}",
                        part.trim(),
                        expected(style)
                    ),
                ));
            }
        }
    }

    if let [start, end] = numerals.as_slice()
        && start.roman == end.roman
        && end.value < start.value
    {
        return Some(Violation::new(
            Rule::InvalidPageRange,
            trimmed,
            format!("page range '{trimmed}' ends before it starts"),
        ));
    }
    None
}
