//! One-line entry input.
//!
//! Finance: `[!] COST DESCRIPTION` (cost in major units, e.g. `12.50`).
//! Media: `[!] DESCRIPTION`. A leading `!` marks the entry as not worth
//! it; the default is worth it.

use api_types::CollectionKind;
use api_types::entry::NewEntry;

pub fn parse(input: &str, kind: CollectionKind) -> Result<NewEntry, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Type something first.".to_string());
    }

    let (worth_it, rest) = match trimmed.strip_prefix('!') {
        Some(stripped) => (false, stripped.trim_start()),
        None => (true, trimmed),
    };

    match kind {
        CollectionKind::Finance => {
            let mut parts = rest.splitn(2, ' ');
            let cost_raw = parts.next().unwrap_or("").trim();
            let description = parts.next().unwrap_or("").trim();
            if description.is_empty() {
                return Err("Format: [!] COST DESCRIPTION".to_string());
            }
            let cost_minor = parse_cost_minor(cost_raw)?;
            Ok(NewEntry {
                description: description.to_string(),
                worth_it,
                cost_minor: Some(cost_minor),
            })
        }
        CollectionKind::Media => {
            if rest.is_empty() {
                return Err("Describe what you watched or read.".to_string());
            }
            Ok(NewEntry {
                description: rest.to_string(),
                worth_it,
                cost_minor: None,
            })
        }
    }
}

/// Parses a major-unit amount (`12`, `12.5`, `12.50`) into minor units.
fn parse_cost_minor(raw: &str) -> Result<i64, String> {
    let invalid = || format!("Invalid cost: {raw}");
    let (major, minor) = match raw.split_once('.') {
        Some((major, minor)) => (major, minor),
        None => (raw, ""),
    };
    if major.is_empty() || !major.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let cents = match minor.len() {
        0 => 0,
        1 | 2 => {
            if !minor.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid());
            }
            let value: i64 = minor.parse().map_err(|_| invalid())?;
            if minor.len() == 1 { value * 10 } else { value }
        }
        _ => return Err(invalid()),
    };
    let major: i64 = major.parse().map_err(|_| invalid())?;
    let total = major
        .checked_mul(100)
        .and_then(|v| v.checked_add(cents))
        .ok_or_else(invalid)?;
    if total == 0 {
        return Err("Cost must be > 0.".to_string());
    }
    Ok(total)
}

/// Formats minor units back to a major-unit string for display.
pub fn format_cost(cost_minor: i64) -> String {
    format!("{}.{:02}", cost_minor / 100, (cost_minor % 100).abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finance_entry_with_decimal_cost() {
        let entry = parse("12.50 late night pizza", CollectionKind::Finance).unwrap();
        assert_eq!(entry.cost_minor, Some(1250));
        assert_eq!(entry.description, "late night pizza");
        assert!(entry.worth_it);
    }

    #[test]
    fn finance_entry_with_whole_cost() {
        let entry = parse("8 paperback", CollectionKind::Finance).unwrap();
        assert_eq!(entry.cost_minor, Some(800));
    }

    #[test]
    fn single_decimal_digit_is_tenths() {
        let entry = parse("3.5 espresso", CollectionKind::Finance).unwrap();
        assert_eq!(entry.cost_minor, Some(350));
    }

    #[test]
    fn bang_prefix_marks_not_worth_it() {
        let entry = parse("! 20 parking fine", CollectionKind::Finance).unwrap();
        assert!(!entry.worth_it);
        assert_eq!(entry.description, "parking fine");
    }

    #[test]
    fn media_entry_has_no_cost() {
        let entry = parse("the third season finale", CollectionKind::Media).unwrap();
        assert_eq!(entry.cost_minor, None);
        assert_eq!(entry.description, "the third season finale");
    }

    #[test]
    fn finance_without_description_is_rejected() {
        assert!(parse("12.50", CollectionKind::Finance).is_err());
    }

    #[test]
    fn garbage_cost_is_rejected() {
        assert!(parse("abc pizza", CollectionKind::Finance).is_err());
        assert!(parse("1.234 pizza", CollectionKind::Finance).is_err());
    }

    #[test]
    fn zero_cost_is_rejected() {
        assert!(parse("0 freebie", CollectionKind::Finance).is_err());
        assert!(parse("0.00 freebie", CollectionKind::Finance).is_err());
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(parse("   ", CollectionKind::Media).is_err());
    }

    #[test]
    fn cost_formats_back_with_two_decimals() {
        assert_eq!(format_cost(1250), "12.50");
        assert_eq!(format_cost(305), "3.05");
        assert_eq!(format_cost(800), "8.00");
    }
}
