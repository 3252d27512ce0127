//! Display formatting shared by the console views.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

/// Shown wherever a value is missing.
pub const PLACEHOLDER: &str = "—";

/// First letter of the first two name tokens, uppercased.
///
/// `"asha rao kumar"` → `"AR"`, `"Asha"` → `"A"`.
#[must_use]
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .take(2)
        .filter_map(|token| token.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// `"name (relationship)"`, the bare name, or the placeholder.
#[must_use]
pub fn emergency_contact(name: Option<&str>, relationship: Option<&str>) -> String {
    let name = name.map(str::trim).filter(|n| !n.is_empty());
    let relationship = relationship.map(str::trim).filter(|r| !r.is_empty());

    match (name, relationship) {
        (Some(name), Some(relationship)) => format!("{name} ({relationship})"),
        (Some(name), None) => name.to_string(),
        (None, _) => PLACEHOLDER.to_string(),
    }
}

/// Relative description of the last access, rendered in `now`'s timezone.
///
/// | elapsed            | output               |
/// |--------------------|----------------------|
/// | under a minute     | `Just now`           |
/// | under an hour      | `12 min ago`         |
/// | under a day        | `Yesterday, 08:15`   |
/// | under a week       | `Monday, 08:15`      |
/// | older              | `Mar 4, 2026`        |
#[must_use]
pub fn relative_access_time<Tz: TimeZone>(at: Option<DateTime<Utc>>, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let Some(at) = at else {
        return PLACEHOLDER.to_string();
    };

    let local = at.with_timezone(&now.timezone());
    let elapsed = now.clone().signed_duration_since(&local);

    if elapsed.num_minutes() < 1 {
        "Just now".to_string()
    } else if elapsed.num_minutes() < 60 {
        format!("{} min ago", elapsed.num_minutes())
    } else if elapsed.num_hours() < 24 {
        format!("Yesterday, {}", local.format("%H:%M"))
    } else if elapsed.num_days() < 7 {
        local.format("%A, %H:%M").to_string()
    } else {
        local.format("%b %-d, %Y").to_string()
    }
}

/// Calendar date of an instant (`"Mar 4, 2026"`), or the placeholder.
#[must_use]
pub fn format_date(at: Option<DateTime<Utc>>) -> String {
    at.map_or_else(
        || PLACEHOLDER.to_string(),
        |at| at.format("%b %-d, %Y").to_string(),
    )
}

/// Amount with two decimals and thousands separators: `"12,500.00"`.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let fixed = format!("{:.2}", amount.round_dp(2));
    let (sign, digits) = fixed
        .strip_prefix('-')
        .map_or(("", fixed.as_str()), |rest| ("-", rest));
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("{sign}{grouped}.{fraction}")
}
