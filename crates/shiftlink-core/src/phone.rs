//! Country-code phone input.
//!
//! The user picks a calling code and types a national number; the field commits an
//! E.164 value when the number validates for the selected region and falls back to
//! plain `code + digits` otherwise.

use std::sync::LazyLock;

use phonenumber::{country, Mode, PhoneNumber};
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::constants::DEFAULT_COUNTRY_CODE;

static CODE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+\d{1,4}").expect("calling code pattern is valid"));

/// Calling code to ISO 3166 region. A code shared by several regions maps to the primary one.
const CALLING_CODES: &[(&str, &str)] = &[
    ("+1", "US"),
    ("+7", "RU"),
    ("+20", "EG"),
    ("+27", "ZA"),
    ("+30", "GR"),
    ("+31", "NL"),
    ("+32", "BE"),
    ("+33", "FR"),
    ("+34", "ES"),
    ("+36", "HU"),
    ("+39", "IT"),
    ("+40", "RO"),
    ("+41", "CH"),
    ("+43", "AT"),
    ("+44", "GB"),
    ("+45", "DK"),
    ("+46", "SE"),
    ("+47", "NO"),
    ("+48", "PL"),
    ("+49", "DE"),
    ("+51", "PE"),
    ("+52", "MX"),
    ("+53", "CU"),
    ("+54", "AR"),
    ("+55", "BR"),
    ("+56", "CL"),
    ("+57", "CO"),
    ("+58", "VE"),
    ("+60", "MY"),
    ("+61", "AU"),
    ("+62", "ID"),
    ("+63", "PH"),
    ("+64", "NZ"),
    ("+65", "SG"),
    ("+66", "TH"),
    ("+81", "JP"),
    ("+82", "KR"),
    ("+84", "VN"),
    ("+86", "CN"),
    ("+90", "TR"),
    ("+91", "IN"),
    ("+92", "PK"),
    ("+93", "AF"),
    ("+94", "LK"),
    ("+95", "MM"),
    ("+98", "IR"),
    ("+212", "MA"),
    ("+213", "DZ"),
    ("+216", "TN"),
    ("+218", "LY"),
    ("+220", "GM"),
    ("+221", "SN"),
    ("+222", "MR"),
    ("+223", "ML"),
    ("+224", "GN"),
    ("+225", "CI"),
    ("+226", "BF"),
    ("+227", "NE"),
    ("+228", "TG"),
    ("+229", "BJ"),
    ("+230", "MU"),
    ("+231", "LR"),
    ("+232", "SL"),
    ("+233", "GH"),
    ("+234", "NG"),
    ("+235", "TD"),
    ("+236", "CF"),
    ("+237", "CM"),
    ("+238", "CV"),
    ("+239", "ST"),
    ("+240", "GQ"),
    ("+241", "GA"),
    ("+242", "CG"),
    ("+243", "CD"),
    ("+244", "AO"),
    ("+245", "GW"),
    ("+248", "SC"),
    ("+249", "SD"),
    ("+250", "RW"),
    ("+251", "ET"),
    ("+252", "SO"),
    ("+253", "DJ"),
    ("+254", "KE"),
    ("+255", "TZ"),
    ("+256", "UG"),
    ("+257", "BI"),
    ("+258", "MZ"),
    ("+260", "ZM"),
    ("+261", "MG"),
    ("+263", "ZW"),
    ("+264", "NA"),
    ("+265", "MW"),
    ("+266", "LS"),
    ("+267", "BW"),
    ("+268", "SZ"),
    ("+269", "KM"),
    ("+350", "GI"),
    ("+351", "PT"),
    ("+352", "LU"),
    ("+353", "IE"),
    ("+354", "IS"),
    ("+355", "AL"),
    ("+356", "MT"),
    ("+357", "CY"),
    ("+358", "FI"),
    ("+359", "BG"),
    ("+370", "LT"),
    ("+371", "LV"),
    ("+372", "EE"),
    ("+373", "MD"),
    ("+374", "AM"),
    ("+375", "BY"),
    ("+376", "AD"),
    ("+377", "MC"),
    ("+378", "SM"),
    ("+379", "VA"),
    ("+380", "UA"),
    ("+381", "RS"),
    ("+382", "ME"),
    ("+385", "HR"),
    ("+386", "SI"),
    ("+387", "BA"),
    ("+389", "MK"),
    ("+420", "CZ"),
    ("+421", "SK"),
    ("+423", "LI"),
    ("+500", "FK"),
    ("+501", "BZ"),
    ("+502", "GT"),
    ("+503", "SV"),
    ("+504", "HN"),
    ("+505", "NI"),
    ("+506", "CR"),
    ("+507", "PA"),
    ("+509", "HT"),
    ("+591", "BO"),
    ("+592", "GY"),
    ("+593", "EC"),
    ("+595", "PY"),
    ("+597", "SR"),
    ("+598", "UY"),
    ("+670", "TL"),
    ("+673", "BN"),
    ("+674", "NR"),
    ("+675", "PG"),
    ("+676", "TO"),
    ("+677", "SB"),
    ("+678", "VU"),
    ("+679", "FJ"),
    ("+680", "PW"),
    ("+685", "WS"),
    ("+686", "KI"),
    ("+688", "TV"),
    ("+691", "FM"),
    ("+692", "MH"),
    ("+850", "KP"),
    ("+852", "HK"),
    ("+853", "MO"),
    ("+855", "KH"),
    ("+856", "LA"),
    ("+880", "BD"),
    ("+886", "TW"),
    ("+960", "MV"),
    ("+961", "LB"),
    ("+962", "JO"),
    ("+963", "SY"),
    ("+964", "IQ"),
    ("+965", "KW"),
    ("+966", "SA"),
    ("+967", "YE"),
    ("+968", "OM"),
    ("+971", "AE"),
    ("+972", "IL"),
    ("+973", "BH"),
    ("+974", "QA"),
    ("+975", "BT"),
    ("+976", "MN"),
    ("+977", "NP"),
    ("+992", "TJ"),
    ("+993", "TM"),
    ("+994", "AZ"),
    ("+995", "GE"),
    ("+996", "KG"),
    ("+998", "UZ"),
    ("+1242", "BS"),
    ("+1246", "BB"),
    ("+1268", "AG"),
    ("+1284", "VG"),
    ("+1340", "VI"),
    ("+1441", "BM"),
    ("+1473", "GD"),
    ("+1649", "TC"),
    ("+1664", "MS"),
    ("+1670", "MP"),
    ("+1671", "GU"),
    ("+1684", "AS"),
    ("+1758", "LC"),
    ("+1767", "DM"),
    ("+1784", "VC"),
    ("+1809", "DO"),
    ("+1829", "DO"),
    ("+1849", "DO"),
    ("+1868", "TT"),
    ("+1869", "KN"),
    ("+1876", "JM"),
];

/// Region for a calling code such as `"+41"`.
pub fn region_for_code(code: &str) -> Option<&'static str> {
    CALLING_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, region)| *region)
}

/// One entry of the country dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryOption {
    pub code: String,
    pub name: String,
    pub flag: String,
}

/// Options whose name or code contains `query`, case-insensitively. Empty query keeps all.
pub fn filter_countries<'a>(query: &str, options: &'a [CountryOption]) -> Vec<&'a CountryOption> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return options.iter().collect();
    }
    options
        .iter()
        .filter(|o| o.name.to_lowercase().contains(&query) || o.code.to_lowercase().contains(&query))
        .collect()
}

/// Keep only what a phone number may be typed with: digits, spaces, `-`, `(` and `)`.
pub fn sanitize_keystrokes(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_digit() || c.is_whitespace() || matches!(c, '-' | '(' | ')'))
        .collect()
}

/// Values to write back after a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhoneCommit {
    /// Submitted value
    pub hidden_value: String,
    /// National formatting for the visible input, when the number validated
    pub display: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneField {
    selected_code: String,
    selected_region: Option<&'static str>,
}

impl Default for PhoneField {
    fn default() -> Self {
        Self {
            selected_code: DEFAULT_COUNTRY_CODE.to_string(),
            selected_region: region_for_code(DEFAULT_COUNTRY_CODE),
        }
    }
}

impl PhoneField {
    /// Restore the field from an already submitted value.
    ///
    /// Returns the field and the hidden value to keep. The calling code comes from a
    /// parseable E.164 value, else from a leading `+NNNN`, else the default; a code
    /// missing from `available_codes` also resets to the default.
    pub fn initialize(hidden_value: &str, available_codes: &[&str]) -> (Self, String) {
        let hidden_value = hidden_value.trim();
        let mut code = DEFAULT_COUNTRY_CODE.to_string();

        if !hidden_value.is_empty() {
            if let Ok(number) = phonenumber::parse(None, hidden_value) {
                code = format!("+{}", number.code().value());
            } else if let Some(m) = CODE_PREFIX.find(hidden_value) {
                code = m.as_str().to_string();
            }
        }

        if available_codes.contains(&code.as_str()) {
            let field = Self::with_code(&code);
            let hidden = if hidden_value.is_empty() {
                code
            } else {
                hidden_value.to_string()
            };
            (field, hidden)
        } else {
            (Self::default(), DEFAULT_COUNTRY_CODE.to_string())
        }
    }

    pub fn with_code(code: &str) -> Self {
        Self {
            selected_code: code.to_string(),
            selected_region: region_for_code(code),
        }
    }

    pub fn select(&mut self, code: &str) {
        *self = Self::with_code(code);
    }

    pub fn selected_code(&self) -> &str {
        &self.selected_code
    }

    pub fn selected_region(&self) -> Option<&'static str> {
        self.selected_region
    }

    /// Turn the typed number into the submitted value.
    pub fn commit(&self, raw: &str) -> PhoneCommit {
        let raw = raw.trim();
        if raw.is_empty() {
            return PhoneCommit {
                hidden_value: self.selected_code.clone(),
                display: None,
            };
        }

        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        let clean = strip_leading_zeros(&digits);

        match self.parse(&clean) {
            Some(number) if phonenumber::is_valid(&number) => PhoneCommit {
                hidden_value: number.format().mode(Mode::E164).to_string(),
                display: Some(number.format().mode(Mode::National).to_string()),
            },
            _ => {
                debug!(
                    code = %self.selected_code,
                    "Phone number did not validate, submitting as typed"
                );
                PhoneCommit {
                    hidden_value: format!("{}{}", self.selected_code, clean),
                    display: None,
                }
            }
        }
    }

    fn parse(&self, clean: &str) -> Option<PhoneNumber> {
        let with_code = format!("{}{}", self.selected_code, clean);
        let region: Option<country::Id> = self.selected_region.and_then(|r| r.parse().ok());

        if let Some(region) = region {
            if let Ok(number) = phonenumber::parse(Some(region), clean) {
                return Some(number);
            }
            if let Ok(number) = phonenumber::parse(Some(region), &with_code) {
                return Some(number);
            }
        }
        phonenumber::parse(None, &with_code).ok()
    }
}

/// Drop leading zeros but keep at least one digit.
fn strip_leading_zeros(digits: &str) -> String {
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() && !digits.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CODES: &[&str] = &["+41", "+33", "+49", "+1"];

    #[test]
    fn swiss_mobile_commits_e164() {
        let field = PhoneField::with_code("+41");
        let commit = field.commit("0791234567");
        assert_eq!(commit.hidden_value, "+41791234567");
        assert!(commit.display.is_some());
    }

    #[test]
    fn formatted_input_is_normalised() {
        let field = PhoneField::with_code("+41");
        assert_eq!(field.commit("079 123 45 67").hidden_value, "+41791234567");
    }

    #[test]
    fn invalid_number_falls_back_to_concatenation() {
        let field = PhoneField::with_code("+41");
        let commit = field.commit("0012");
        assert_eq!(commit.hidden_value, "+4112");
        assert_eq!(commit.display, None);
    }

    #[test]
    fn empty_input_commits_code() {
        let field = PhoneField::with_code("+33");
        assert_eq!(field.commit("   ").hidden_value, "+33");
    }

    #[test]
    fn initialize_from_e164_value() {
        let (field, hidden) = PhoneField::initialize("+33612345678", CODES);
        assert_eq!(field.selected_code(), "+33");
        assert_eq!(field.selected_region(), Some("FR"));
        assert_eq!(hidden, "+33612345678");
    }

    #[test]
    fn initialize_from_unparseable_prefix() {
        let (field, hidden) = PhoneField::initialize("+49 12", CODES);
        assert_eq!(field.selected_code(), "+49");
        assert_eq!(hidden, "+49 12");
    }

    #[test]
    fn initialize_empty_defaults_to_swiss() {
        let (field, hidden) = PhoneField::initialize("", CODES);
        assert_eq!(field.selected_code(), "+41");
        assert_eq!(field.selected_region(), Some("CH"));
        assert_eq!(hidden, "+41");
    }

    #[test]
    fn initialize_with_unavailable_code_resets() {
        let (field, hidden) = PhoneField::initialize("+998901234567", CODES);
        assert_eq!(field.selected_code(), "+41");
        assert_eq!(hidden, "+41");
    }

    #[test]
    fn keystroke_sanitising() {
        assert_eq!(sanitize_keystrokes("(079) 123-45a67"), "(079) 123-4567");
    }

    #[test]
    fn leading_zero_stripping() {
        assert_eq!(strip_leading_zeros("00791"), "791");
        assert_eq!(strip_leading_zeros("000"), "0");
        assert_eq!(strip_leading_zeros(""), "");
    }

    #[test]
    fn region_lookup() {
        assert_eq!(region_for_code("+41"), Some("CH"));
        assert_eq!(region_for_code("+1876"), Some("JM"));
        assert_eq!(region_for_code("+999"), None);
    }

    #[test]
    fn country_filtering() {
        let options = vec![
            CountryOption {
                code: "+41".to_string(),
                name: "Switzerland".to_string(),
                flag: "🇨🇭".to_string(),
            },
            CountryOption {
                code: "+49".to_string(),
                name: "Germany".to_string(),
                flag: "🇩🇪".to_string(),
            },
        ];
        assert_eq!(filter_countries("", &options).len(), 2);
        assert_eq!(filter_countries("swit", &options)[0].code, "+41");
        assert_eq!(filter_countries("+49", &options)[0].name, "Germany");
        assert!(filter_countries("xyz", &options).is_empty());
    }
}
