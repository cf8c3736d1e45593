use chrono::{DateTime, SecondsFormat, Utc};

use crate::domain::{ChangeRecord, StatusLabel};

pub const ALERT_SUBJECT: &str = "F-1 Visa Slot Monitor: availability change";
pub const TEST_SUBJECT: &str = "Test: F-1 Slot Monitor (Mailjet test)";

const HEADING: &str = "F-1 Visa Availability Change Detected";
pub const SAFETY_NOTICE: &str = "This is a read-only reminder alert. No login or booking was attempted by this monitor.\n\
Please open the link and log in manually if you want to book. Avoid multiple quick logins.";
const TEST_PREAMBLE: &str = "This is a test email from your safe F-1 Visa Slot Monitor.";

pub fn build_message(changes: &[ChangeRecord], checked_at: DateTime<Utc>) -> String {
    let mut lines = vec![
        HEADING.to_string(),
        String::new(),
        SAFETY_NOTICE.to_string(),
        String::new(),
        "Changes:".to_string(),
    ];
    for change in changes {
        lines.push(format!("- {}", change.url));
        lines.push(format!("  previous: {}", change.previous));
        lines.push(format!("  now:      {}", change.current));
        lines.push(String::new());
    }
    lines.push(format!(
        "Checked at: {} UTC",
        checked_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    ));
    lines.join("\n")
}

/// Synthetic alert used by `--test` to prove delivery works end to end.
pub fn build_test_message(url: &str, checked_at: DateTime<Utc>) -> String {
    let change = ChangeRecord {
        url: url.to_string(),
        previous: StatusLabel::Unknown,
        current: StatusLabel::PossibleSlots,
    };
    format!(
        "{TEST_PREAMBLE}\n\n{}",
        build_message(std::slice::from_ref(&change), checked_at)
    )
}
