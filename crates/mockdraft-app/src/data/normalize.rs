// Name and college normalization shared by every loader.

use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Whole-name college aliases applied after uppercasing.
const COLLEGE_ALIASES: &[(&str, &str)] = &[
    ("MIAMI FL", "MIAMI (FL)"),
    ("TEXAS AM", "TEXAS A&M"),
    ("OKST", "OKLAHOMA STATE"),
    ("OREG", "OREGON"),
    ("OREST", "OREGON STATE"),
    ("SOAL", "SOUTH ALABAMA"),
    ("FRES", "FRESNO STATE"),
    ("GA ST", "GEORGIA STATE"),
];

/// Compiled patterns for player and manager name keys.
#[derive(Debug, Clone)]
pub struct Normalizer {
    suffix: Regex,
    non_alnum: Regex,
    spaces: Regex,
}

impl Normalizer {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Normalizer {
            suffix: Regex::new(r"\b(JR|SR|II|III|IV|V)\b")?,
            non_alnum: Regex::new(r"[^A-Z0-9 ]")?,
            spaces: Regex::new(r"\s+")?,
        })
    }

    /// Uppercase, strip accents and generational suffixes, drop punctuation.
    /// "Vernell Brown III" and "VERNELL BROWN" share a key.
    pub fn name(&self, raw: &str) -> String {
        let upper: String = raw
            .to_uppercase()
            .nfd()
            .filter(|c| !is_combining_mark(*c))
            .collect();
        let no_suffix = self.suffix.replace_all(&upper, "");
        let cleaned = self.non_alnum.replace_all(&no_suffix, "");
        self.spaces.replace_all(&cleaned, " ").trim().to_string()
    }
}

/// Uppercase, trim, remove apostrophes and apply the alias table.
pub fn college(raw: &str) -> String {
    let upper = raw.trim().to_uppercase().replace('\'', "");
    COLLEGE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == upper)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(upper)
}
