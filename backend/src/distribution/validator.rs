use super::parser::{RawRow, RawTable};
use crate::error::ValidationError;
use regex::Regex;
use std::sync::LazyLock;

pub const REQUIRED_COLUMNS: [&str; 3] = ["FirstName", "Phone", "Notes"];

// ASCII digits only; `\d` would also accept other Unicode digits.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("phone pattern compiles"));

/// A contact row that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRecord {
    pub first_name: String,
    pub phone: String,
    pub notes: String,
}

/// Checks the header, then every row in order, stopping at the first problem.
pub fn validate(table: &RawTable) -> Result<Vec<ValidatedRecord>, ValidationError> {
    for column in REQUIRED_COLUMNS {
        if !table.headers.iter().any(|h| h == column) {
            return Err(ValidationError::MissingColumn {
                column: column.to_string(),
            });
        }
    }

    table
        .rows
        .iter()
        .enumerate()
        .map(|(idx, row)| validate_row(idx + 1, row))
        .collect()
}

fn validate_row(row_number: usize, row: &RawRow) -> Result<ValidatedRecord, ValidationError> {
    let phone = row.get("Phone").unwrap_or_default();
    if !PHONE_RE.is_match(phone) {
        return Err(ValidationError::InvalidPhone { row: row_number });
    }

    let first_name = row.get("FirstName").unwrap_or_default().trim();
    if first_name.is_empty() {
        return Err(ValidationError::EmptyFirstName { row: row_number });
    }

    Ok(ValidatedRecord {
        first_name: first_name.to_string(),
        phone: phone.to_string(),
        notes: row.get("Notes").unwrap_or_default().trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn table(headers: &[&str], rows: &[&[(&str, &str)]]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|pairs| RawRow::from_pairs(pairs.iter().copied()))
                .collect(),
        }
    }

    fn contact(name: &'static str, phone: &'static str) -> Vec<(&'static str, &'static str)> {
        vec![("FirstName", name), ("Phone", phone), ("Notes", "")]
    }

    #[test]
    fn valid_rows_are_coerced() {
        let t = table(
            &REQUIRED_COLUMNS,
            &[
                &[("FirstName", "  Ann "), ("Phone", "5550001"), ("Notes", " vip ")],
                &[("FirstName", "Bob"), ("Phone", "0042")],
            ],
        );
        let records = validate(&t).unwrap();
        assert_eq!(
            records,
            vec![
                ValidatedRecord {
                    first_name: "Ann".to_string(),
                    phone: "5550001".to_string(),
                    notes: "vip".to_string(),
                },
                ValidatedRecord {
                    first_name: "Bob".to_string(),
                    phone: "0042".to_string(),
                    notes: String::new(),
                },
            ]
        );
    }

    #[rstest]
    #[case(&["Phone", "Notes"], "FirstName")]
    #[case(&["FirstName", "Notes", "Extra"], "Phone")]
    #[case(&["FirstName", "Phone"], "Notes")]
    #[case(&["firstname", "phone", "notes"], "FirstName")]
    fn missing_columns_are_named(#[case] headers: &[&str], #[case] missing: &str) {
        let t = table(headers, &[&[("FirstName", "Ann"), ("Phone", "1")]]);
        assert_eq!(
            validate(&t),
            Err(ValidationError::MissingColumn {
                column: missing.to_string()
            })
        );
    }

    #[test]
    fn extra_columns_are_ignored() {
        let headers = ["FirstName", "Phone", "Notes", "City"];
        let t = table(&headers, &[&[("FirstName", "Ann"), ("Phone", "1"), ("City", "Oslo")]]);
        assert_eq!(validate(&t).unwrap().len(), 1);
    }

    #[rstest]
    #[case("555-0001")]
    #[case("+15550001")]
    #[case("555 0001")]
    #[case("55a0001")]
    #[case("")]
    #[case("٣٣٣")]
    fn bad_phones_are_rejected(#[case] phone: &'static str) {
        let good = contact("Ann", "5550001");
        let bad = contact("Bob", phone);
        let t = table(&REQUIRED_COLUMNS, &[&good, &bad]);
        assert_eq!(validate(&t), Err(ValidationError::InvalidPhone { row: 2 }));
    }

    #[test]
    fn absent_phone_is_rejected() {
        let t = table(&REQUIRED_COLUMNS, &[&[("FirstName", "Ann")]]);
        assert_eq!(validate(&t), Err(ValidationError::InvalidPhone { row: 1 }));
    }

    #[test]
    fn first_offending_row_is_reported() {
        let rows = [
            contact("Ann", "1"),
            contact("Bob", "2"),
            contact("Cid", "x3"),
            contact("Dee", "4"),
            contact("Eve", "+5"),
        ];
        let refs: Vec<&[(&str, &str)]> = rows.iter().map(Vec::as_slice).collect();
        let t = table(&REQUIRED_COLUMNS, &refs);
        assert_eq!(validate(&t), Err(ValidationError::InvalidPhone { row: 3 }));
    }

    #[test]
    fn blank_first_name_is_rejected() {
        let t = table(&REQUIRED_COLUMNS, &[&contact("Ann", "1"), &contact("   ", "2")]);
        assert_eq!(validate(&t), Err(ValidationError::EmptyFirstName { row: 2 }));
    }
}
