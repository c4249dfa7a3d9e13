//! vCard 3.0 serialization of a [`ContactRecord`].

use crate::domain::model::ContactRecord;
use std::borrow::Cow;

/// How reserved characters inside property values are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Escaping {
    /// `\` `,` `;` and line breaks are backslash-escaped (RFC 2426 §4).
    #[default]
    Rfc2426,
    /// Values are written verbatim. Reserved characters then corrupt the card.
    Raw,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

pub fn escape_value(value: &str, escaping: Escaping) -> Cow<'_, str> {
    if escaping == Escaping::Raw || !value.contains(['\\', ',', ';', '\r', '\n']) {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len() + 8);
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            ',' => out.push_str("\\,"),
            ';' => out.push_str("\\;"),
            '\r' => {
                // CRLF 算一個換行
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("\\n");
            }
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

fn push_property(lines: &mut Vec<String>, name: &str, value: Option<&str>, escaping: Escaping) {
    if let Some(v) = value {
        lines.push(format!("{}:{}", name, escape_value(v, escaping)));
    }
}

/// Serializes with [`Escaping::Rfc2426`].
pub fn to_vcard(record: &ContactRecord) -> String {
    to_vcard_with(record, Escaping::default())
}

/// Lines are joined with `\n`; there is no terminator after `END:VCARD`.
/// Empty optional fields are omitted (or left as empty slots in `N` and `ADR`).
pub fn to_vcard_with(record: &ContactRecord, escaping: Escaping) -> String {
    let prefix = non_empty(&record.prefix);
    let last_name = non_empty(&record.last_name);
    let first_name = record.first_name.as_str();

    let mut lines = vec!["BEGIN:VCARD".to_string(), "VERSION:3.0".to_string()];

    lines.push(format!(
        "N:{};{};;{};",
        escape_value(last_name.unwrap_or(""), escaping),
        escape_value(first_name, escaping),
        escape_value(prefix.unwrap_or(""), escaping),
    ));

    let full_name: Vec<&str> = [prefix, Some(first_name), last_name]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect();
    lines.push(format!("FN:{}", escape_value(&full_name.join(" "), escaping)));

    push_property(&mut lines, "ORG", non_empty(&record.company), escaping);
    push_property(&mut lines, "TITLE", non_empty(&record.job_title), escaping);
    let phone = Some(record.phone.as_str()).filter(|p| !p.is_empty());
    push_property(&mut lines, "TEL;TYPE=WORK,VOICE", phone, escaping);
    push_property(&mut lines, "EMAIL", non_empty(&record.email), escaping);

    let address = [
        non_empty(&record.street),
        non_empty(&record.city),
        non_empty(&record.region),
        non_empty(&record.postcode),
        non_empty(&record.country),
    ];
    if address.iter().any(Option::is_some) {
        // PO box 與 extended address 永遠留空
        let mut parts = vec![Cow::Borrowed(""), Cow::Borrowed("")];
        parts.extend(
            address
                .iter()
                .map(|part| escape_value(part.unwrap_or(""), escaping)),
        );
        lines.push(format!("ADR;TYPE=WORK:{}", parts.join(";")));
    }

    push_property(&mut lines, "URL", non_empty(&record.website), escaping);

    lines.push("END:VCARD".to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_record() -> ContactRecord {
        ContactRecord {
            prefix: Some("Dr.".to_string()),
            first_name: "Jane".to_string(),
            last_name: Some("Doe".to_string()),
            phone: "+1 123 456 7890".to_string(),
            email: Some("jane.doe@email.com".to_string()),
            company: Some("ACME Inc.".to_string()),
            job_title: Some("Manager".to_string()),
            street: Some("123 Main St".to_string()),
            city: Some("Anytown".to_string()),
            region: Some("CA".to_string()),
            postcode: Some("90210".to_string()),
            country: Some("USA".to_string()),
            website: Some("https://acme.inc".to_string()),
        }
    }

    #[test]
    fn test_full_record_line_order() {
        let card = to_vcard(&full_record());
        let expected = "BEGIN:VCARD\n\
VERSION:3.0\n\
N:Doe;Jane;;Dr.;\n\
FN:Dr. Jane Doe\n\
ORG:ACME Inc.\n\
TITLE:Manager\n\
TEL;TYPE=WORK,VOICE:+1 123 456 7890\n\
EMAIL:jane.doe@email.com\n\
ADR;TYPE=WORK:;;123 Main St;Anytown;CA;90210;USA\n\
URL:https://acme.inc\n\
END:VCARD";
        assert_eq!(card, expected);
        assert!(!card.ends_with('\n'));
    }

    #[test]
    fn test_empty_strings_behave_like_absent_fields() {
        let mut record = ContactRecord::new("John", "555");
        record.prefix = Some(String::new());
        record.company = Some(String::new());
        record.city = Some(String::new());

        let card = to_vcard(&record);
        assert!(card.contains("\nN:;John;;;\n"));
        assert!(card.contains("\nFN:John\n"));
        assert!(!card.contains("ORG:"));
        assert!(!card.contains("ADR;TYPE=WORK:"));
    }

    #[test]
    fn test_missing_phone_omits_tel() {
        let record = ContactRecord::new("John", "");
        assert!(!to_vcard(&record).contains("TEL;"));
    }

    #[test]
    fn test_escaping_reserved_characters() {
        let mut record = ContactRecord::new("Jane", "555");
        record.company = Some("Smith, Jones; Partners".to_string());
        record.street = Some("Line 1\r\nLine 2".to_string());
        record.job_title = Some(r"R\D".to_string());

        let card = to_vcard(&record);
        assert!(card.contains("ORG:Smith\\, Jones\\; Partners\n"));
        assert!(card.contains("TITLE:R\\\\D\n"));
        assert!(card.contains("ADR;TYPE=WORK:;;Line 1\\nLine 2;;;;\n"));
    }

    #[test]
    fn test_raw_escaping_reproduces_values_verbatim() {
        let mut record = ContactRecord::new("Jane", "555");
        record.company = Some("Smith, Jones".to_string());
        let card = to_vcard_with(&record, Escaping::Raw);
        assert!(card.contains("ORG:Smith, Jones\n"));
    }

    #[test]
    fn test_name_components_are_escaped() {
        let mut record = ContactRecord::new("Jane", "555");
        record.prefix = Some("Dr; X".to_string());
        record.last_name = Some("O,Neil".to_string());

        let card = to_vcard(&record);
        let lines: Vec<&str> = card.split('\n').collect();
        assert_eq!(lines[2], "N:O\\,Neil;Jane;;Dr\\; X;");
        assert_eq!(lines[3], "FN:Dr\\; X Jane O\\,Neil");

        let raw = to_vcard_with(&record, Escaping::Raw);
        let lines: Vec<&str> = raw.split('\n').collect();
        assert_eq!(lines[2], "N:O,Neil;Jane;;Dr; X;");
        assert_eq!(lines[3], "FN:Dr; X Jane O,Neil");
    }

    #[test]
    fn test_escape_value_borrows_when_clean() {
        assert!(matches!(escape_value("plain", Escaping::Rfc2426), Cow::Borrowed(_)));
        assert_eq!(escape_value("a\rb", Escaping::Rfc2426), "a\\nb");
    }
}
