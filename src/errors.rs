use crate::types::ErrorEntry;

const KNOWN_ERROR_CODES: &[(&str, &str)] = &[
    ("Error 3", "error.error3.description"),
    ("Error 4", "error.error4.description"),
    ("Error 5", "error.error5.description"),
    ("Error 6", "error.error6.description"),
    ("Error 7", "error.error7.description"),
    ("Error 8", "error.error8.description"),
    ("Error 9", "error.error9.description"),
    ("Error 11", "error.error11.description"),
    ("Error 13", "error.error13.description"),
    ("Error 14", "error.error14.description"),
    ("Error 15", "error.error15.description"),
    ("Error 16", "error.error16.description"),
    ("Error C02", "error.errorC02.description"),
    ("Error C09", "error.errorC09.description"),
    ("Error C11", "error.errorC11.description"),
    ("Error IAQ1", "error.errorIAQ1.description"),
    ("Error IAQ2", "error.errorIAQ2.description"),
    ("Error IAQ3", "error.errorIAQ3.description"),
    ("Error IAQ4", "error.errorIAQ4.description"),
];

/// Resolves localization keys to display text.
pub trait Localization {
    fn text(&self, key: &str) -> Option<String>;
}

/// Built-in English texts for every known error key.
#[derive(Debug, Clone, Copy, Default)]
pub struct English;

impl Localization for English {
    fn text(&self, key: &str) -> Option<String> {
        let text = match key {
            "error.error3.description" => "Zone grille or damper jammed",
            "error.error4.description" => "Overheating alarm on the zone motor",
            "error.error5.description" => "Temperature probe open circuit",
            "error.error6.description" => "Temperature probe short circuit",
            "error.error7.description" => "Incompatible element on the system bus",
            "error.error8.description" => "Lite thermostat disconnected",
            "error.error9.description" => "Communication error between gateway and system",
            "error.error11.description" => "Communication error between gateway and indoor unit",
            "error.error13.description" => "Communication error with the zone module",
            "error.error14.description" => "Communication error with the radiant module",
            "error.error15.description" => "Communication error with the fan coil controller",
            "error.error16.description" => "Communication error with the zone thermostat",
            "error.errorC02.description" => "Communication error with the control board",
            "error.errorC09.description" => "Communication error between gateway and indoor unit",
            "error.errorC11.description" => "Indoor unit in error",
            "error.errorIAQ1.description" => "Air quality sensor communication error",
            "error.errorIAQ2.description" => "Air quality sensor fan failure",
            "error.errorIAQ3.description" => "Air quality sensor ionizer failure",
            "error.errorIAQ4.description" => "Air quality sensor probe failure",
            _ => return None,
        };
        Some(text.to_string())
    }
}

pub fn localization_key(code: &str) -> Option<&'static str> {
    KNOWN_ERROR_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, key)| *key)
}

/// Localized description of a bridge error code, if the code is documented.
pub fn describe(code: &str, localization: &dyn Localization) -> Option<String> {
    localization.text(localization_key(code)?)
}

/// Renders each entry as `"<origin>: <code>"`, followed by ` - <description>`
/// when the code is known.
pub fn format_errors(entries: &[ErrorEntry], localization: &dyn Localization) -> Vec<String> {
    entries
        .iter()
        .map(|entry| {
            let (origin, code) = match (&entry.system, &entry.zone) {
                (Some(code), _) => ("System", code.as_str()),
                (None, Some(code)) => ("Zone", code.as_str()),
                (None, None) => ("unknown", "unexpected"),
            };
            match describe(code, localization) {
                Some(detail) => format!("{origin}: {code} - {detail}"),
                None => format!("{origin}: {code}"),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_known_code_has_english_text() {
        for (code, _) in KNOWN_ERROR_CODES {
            assert!(describe(code, &English).is_some(), "missing text for {code}");
        }
    }

    #[test]
    fn unknown_codes_are_absent() {
        assert_eq!(localization_key("Error 10"), None);
        assert_eq!(describe("Error 12", &English), None);
        assert_eq!(describe("error 3", &English), None);
    }

    #[test]
    fn key_lookup() {
        assert_eq!(localization_key("Error C11"), Some("error.errorC11.description"));
        assert_eq!(localization_key("Error IAQ4"), Some("error.errorIAQ4.description"));
    }

    #[test]
    fn formats_origin_and_detail() {
        let entries = vec![
            ErrorEntry {
                system: Some("Error 8".to_string()),
                zone: None,
            },
            ErrorEntry {
                system: None,
                zone: Some("Error 99".to_string()),
            },
            ErrorEntry::default(),
        ];
        let lines = format_errors(&entries, &English);
        assert_eq!(lines[0], "System: Error 8 - Lite thermostat disconnected");
        assert_eq!(lines[1], "Zone: Error 99");
        assert_eq!(lines[2], "unknown: unexpected");
    }

    struct Keys;

    impl Localization for Keys {
        fn text(&self, key: &str) -> Option<String> {
            Some(format!("[{key}]"))
        }
    }

    #[test]
    fn custom_localization_is_used() {
        assert_eq!(
            describe("Error 3", &Keys).as_deref(),
            Some("[error.error3.description]")
        );
    }
}
