// 📝 Change Log - audit trail for every discarded duplicate
//
// One entry per (discarded, surviving) pair: both records, why they matched,
// and which payload fields the merge changed.

use crate::lead::{format_entry_date, Lead};
use chrono::{DateTime, FixedOffset};
use std::fmt;

/// Token shown for any missing or blank value
pub const UNKNOWN: &str = "Unknown";

// ============================================================================
// DISPLAY VALUES
// ============================================================================

/// Display form of an optional text field. Missing and blank both render as `Unknown`.
pub fn display_value(value: Option<&str>) -> &str {
    match value {
        Some(text) if !text.trim().is_empty() => text,
        _ => UNKNOWN,
    }
}

/// Display form of an optional timestamp
pub fn display_timestamp(value: Option<&DateTime<FixedOffset>>) -> String {
    value.map(format_entry_date).unwrap_or_else(|| UNKNOWN.to_string())
}

fn render_lead(lead: &Lead) -> String {
    format!(
        "Lead{{_id='{}', email='{}', firstName='{}', lastName='{}', address='{}', entryDate={}}}",
        display_value(lead.id.as_deref()),
        display_value(lead.email.as_deref()),
        display_value(lead.first_name.as_deref()),
        display_value(lead.last_name.as_deref()),
        display_value(lead.address.as_deref()),
        display_timestamp(lead.entry_date.as_ref()),
    )
}

// ============================================================================
// FIELD CHANGE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: &'static str,
    pub old_value: String,
    pub new_value: String,
}

impl fmt::Display for FieldChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "- {}: {} → {}", self.field, self.old_value, self.new_value)
    }
}

/// Payload differences between two leads, compared on display values.
/// `_id` and `email` are the match keys and are never diffed.
pub fn diff_fields(source: &Lead, output: &Lead) -> Vec<FieldChange> {
    let candidates = [
        (
            "firstName",
            display_value(source.first_name.as_deref()).to_string(),
            display_value(output.first_name.as_deref()).to_string(),
        ),
        (
            "lastName",
            display_value(source.last_name.as_deref()).to_string(),
            display_value(output.last_name.as_deref()).to_string(),
        ),
        (
            "address",
            display_value(source.address.as_deref()).to_string(),
            display_value(output.address.as_deref()).to_string(),
        ),
        (
            "entryDate",
            display_timestamp(source.entry_date.as_ref()),
            display_timestamp(output.entry_date.as_ref()),
        ),
    ];

    candidates
        .into_iter()
        .filter(|(_, old, new)| old != new)
        .map(|(field, old_value, new_value)| FieldChange {
            field,
            old_value,
            new_value,
        })
        .collect()
}

// ============================================================================
// CHANGE LOG
// ============================================================================

/// One merge event. Immutable once built.
#[derive(Debug, Clone)]
pub struct ChangeLog {
    source: Lead,
    output: Lead,
    deduped_by_id: bool,
    deduped_by_email: bool,
    field_changes: Vec<FieldChange>,
}

impl ChangeLog {
    pub fn new(source: Lead, output: Lead, deduped_by_id: bool, deduped_by_email: bool) -> Self {
        let field_changes = diff_fields(&source, &output);
        ChangeLog {
            source,
            output,
            deduped_by_id,
            deduped_by_email,
            field_changes,
        }
    }

    /// The discarded lead
    pub fn source(&self) -> &Lead {
        &self.source
    }

    /// The surviving lead
    pub fn output(&self) -> &Lead {
        &self.output
    }

    pub fn deduped_by_id(&self) -> bool {
        self.deduped_by_id
    }

    pub fn deduped_by_email(&self) -> bool {
        self.deduped_by_email
    }

    pub fn field_changes(&self) -> &[FieldChange] {
        &self.field_changes
    }

    pub fn has_changes(&self) -> bool {
        !self.field_changes.is_empty()
    }

    fn cause_line(&self) -> String {
        let id = display_value(self.source.id.as_deref());
        let email = display_value(self.source.email.as_deref());

        match (self.deduped_by_id, self.deduped_by_email) {
            (true, true) => format!("- changes for id: {} and email: {}", id, email),
            (true, false) => format!("- changes for id: {}", id),
            (false, true) => format!("- changes for email: {}", email),
            // Linked only through other members of the group
            (false, false) => format!(
                "- linked transitively to id: {}",
                display_value(self.output.id.as_deref())
            ),
        }
    }
}

impl fmt::Display for ChangeLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Source: {}", render_lead(&self.source))?;
        writeln!(f, "Output: {}", render_lead(&self.output))?;
        writeln!(f, "{}", self.cause_line())?;

        if self.field_changes.is_empty() {
            writeln!(f, "- No changes (duplicate resolved; same data kept)")?;
        } else {
            for change in &self.field_changes {
                writeln!(f, "{}", change)?;
            }
        }

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lead::parse_entry_date;

    fn create_test_lead(
        id: &str,
        email: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
        address: Option<&str>,
        entry_date: Option<&str>,
    ) -> Lead {
        Lead {
            id: Some(id.to_string()),
            email: Some(email.to_string()),
            first_name: first_name.map(str::to_string),
            last_name: last_name.map(str::to_string),
            address: address.map(str::to_string),
            entry_date: entry_date.map(|d| parse_entry_date(d).unwrap()),
            ..Lead::default()
        }
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(None), "Unknown");
        assert_eq!(display_value(Some("")), "Unknown");
        assert_eq!(display_value(Some("  ")), "Unknown");
        assert_eq!(display_value(Some("John")), "John");
        assert_eq!(display_timestamp(None), "Unknown");
    }

    #[test]
    fn test_single_field_change() {
        let old = create_test_lead("1", "a@example.com", Some("John"), Some("Doe"), Some("123 St"), Some("2024-01-01T10:00:00Z"));
        let new = create_test_lead("1", "a@example.com", Some("John"), Some("Smith"), Some("123 St"), Some("2024-01-02T10:00:00Z"));

        let log = ChangeLog::new(old, new, true, true);
        let formatted = log.to_string();

        assert!(formatted.contains("- lastName: Doe → Smith"));
        assert!(formatted.contains("- entryDate: 2024-01-01T10:00:00Z → 2024-01-02T10:00:00Z"));
        assert!(!formatted.contains("firstName:"));
        assert!(formatted.contains("- changes for id: 1 and email: a@example.com"));
    }

    #[test]
    fn test_multiple_field_changes_keep_order() {
        let old = create_test_lead("1", "a@example.com", Some("John"), Some("Doe"), Some("123 St"), None);
        let new = create_test_lead("1", "a@example.com", Some("Jane"), Some("Smith"), Some("456 Ave"), None);

        let log = ChangeLog::new(old, new, true, true);
        let fields: Vec<&str> = log.field_changes().iter().map(|c| c.field).collect();

        assert_eq!(fields, vec!["firstName", "lastName", "address"]);
        assert!(log.to_string().contains("- address: 123 St → 456 Ave"));
    }

    #[test]
    fn test_missing_values_render_unknown() {
        let old = create_test_lead("1", "a@example.com", None, None, None, Some("2024-01-01T10:00:00Z"));
        let new = create_test_lead("1", "a@example.com", Some("Jane"), Some("Smith"), Some("456 Ave"), None);

        let formatted = ChangeLog::new(old, new, true, false).to_string();

        assert!(formatted.contains("- firstName: Unknown → Jane"));
        assert!(formatted.contains("- lastName: Unknown → Smith"));
        assert!(formatted.contains("- address: Unknown → 456 Ave"));
        assert!(formatted.contains("- entryDate: 2024-01-01T10:00:00Z → Unknown"));
    }

    #[test]
    fn test_null_and_empty_are_equal_for_diff() {
        let old = create_test_lead("1", "a@example.com", Some(""), None, Some(" "), None);
        let new = create_test_lead("2", "a@example.com", None, Some(""), None, None);

        let log = ChangeLog::new(old, new, false, true);

        assert!(!log.has_changes());
        assert!(log.to_string().contains("- No changes"));
    }

    #[test]
    fn test_cause_lines() {
        let a = Lead::new("1", "a@example.com");
        let b = Lead::new("2", "A@example.com");

        let by_email = ChangeLog::new(a.clone(), b.clone(), false, true).to_string();
        assert!(by_email.contains("- changes for email: a@example.com"));
        assert!(!by_email.contains("changes for id"));

        let by_id = ChangeLog::new(a.clone(), b.clone(), true, false).to_string();
        assert!(by_id.contains("- changes for id: 1\n"));

        let transitive = ChangeLog::new(a, b, false, false).to_string();
        assert!(transitive.contains("\n- linked transitively to id: 2\n"));
        assert!(!transitive.contains("changes for"));
    }

    #[test]
    fn test_render_lead_block() {
        let source = create_test_lead("1", "a@example.com", Some("John"), None, None, Some("2023-07-15T10:30:00-07:00"));
        let output = create_test_lead("1", "a@example.com", Some("John"), None, None, Some("2023-07-16T10:30:00-07:00"));

        let formatted = ChangeLog::new(source, output, true, true).to_string();
        let first_line = formatted.lines().next().unwrap();

        assert_eq!(
            first_line,
            "Source: Lead{_id='1', email='a@example.com', firstName='John', lastName='Unknown', address='Unknown', entryDate=2023-07-15T10:30:00-07:00}"
        );
        assert!(formatted.lines().nth(1).unwrap().starts_with("Output: Lead{_id='1'"));
    }
}
