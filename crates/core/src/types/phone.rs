//! Phone calling codes and display formatting.
//!
//! Members store the national number and the calling code in separate
//! columns; nothing here validates the number itself.

/// A country calling code offered by the member form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountryCode {
    /// Calling code including the leading `+`.
    pub code: &'static str,
    /// Country name.
    pub country: &'static str,
    /// Flag emoji.
    pub flag: &'static str,
}

/// Calling code used when the form leaves it blank.
pub const DEFAULT_PHONE_COUNTRY_CODE: &str = "+91";

/// Calling codes offered by the member form, default first.
///
/// `+1` appears twice (United States, Canada); lookups resolve to the first.
pub const PHONE_COUNTRY_CODES: &[CountryCode] = &[
    CountryCode { code: "+91", country: "India", flag: "🇮🇳" },
    CountryCode { code: "+1", country: "United States", flag: "🇺🇸" },
    CountryCode { code: "+44", country: "United Kingdom", flag: "🇬🇧" },
    CountryCode { code: "+61", country: "Australia", flag: "🇦🇺" },
    CountryCode { code: "+86", country: "China", flag: "🇨🇳" },
    CountryCode { code: "+81", country: "Japan", flag: "🇯🇵" },
    CountryCode { code: "+49", country: "Germany", flag: "🇩🇪" },
    CountryCode { code: "+33", country: "France", flag: "🇫🇷" },
    CountryCode { code: "+55", country: "Brazil", flag: "🇧🇷" },
    CountryCode { code: "+1", country: "Canada", flag: "🇨🇦" },
];

impl CountryCode {
    /// Look up a known calling code.
    #[must_use]
    pub fn find(code: &str) -> Option<&'static Self> {
        PHONE_COUNTRY_CODES.iter().find(|c| c.code == code)
    }
}

/// Format a stored phone number for display.
///
/// - Known code: `"🇮🇳 +91 98765 43210"`
/// - Unknown code: `"+999 12345"`
/// - No code: the bare number
/// - No number: `"—"`
#[must_use]
pub fn format_phone_display(country_code: Option<&str>, phone: Option<&str>) -> String {
    let Some(number) = phone.map(str::trim).filter(|p| !p.is_empty()) else {
        return "—".to_string();
    };

    let code = country_code.map(str::trim).filter(|c| !c.is_empty());
    match code {
        Some(code) => match CountryCode::find(code) {
            Some(known) => format!("{} {} {number}", known.flag, known.code),
            None => format!("{code} {number}"),
        },
        None => number.to_string(),
    }
}
