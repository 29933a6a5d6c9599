use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// The model's classification of an incident, as announced on its
/// `DIAGNOSIS:` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnosis {
    Configuration,
    Bug,
    Indeterminate,
}

impl Diagnosis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Diagnosis::Configuration => "CONFIGURATION",
            Diagnosis::Bug => "BUG",
            Diagnosis::Indeterminate => "INDETERMINATE",
        }
    }

    /// Find the first diagnosis tag in a reply. Tolerates markdown emphasis
    /// and bracketed tags such as `**DIAGNOSIS: [BUG]**`.
    pub fn parse(reply: &str) -> Option<Self> {
        static TAG: OnceLock<Regex> = OnceLock::new();
        let re = TAG.get_or_init(|| {
            Regex::new(r"(?i)DIAGNOSIS\s*\**\s*:\s*[*_\s]*\[?\s*(CONFIGURATION|BUG|INDETERMINATE)\b")
                .expect("diagnosis pattern is valid")
        });

        let caps = re.captures(reply)?;
        match caps[1].to_ascii_uppercase().as_str() {
            "CONFIGURATION" => Some(Diagnosis::Configuration),
            "BUG" => Some(Diagnosis::Bug),
            _ => Some(Diagnosis::Indeterminate),
        }
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_tag() {
        assert_eq!(
            Diagnosis::parse("DIAGNOSIS: CONFIGURATION\nPort 8080 is taken."),
            Some(Diagnosis::Configuration)
        );
    }

    #[test]
    fn parses_bold_and_bracketed_tags() {
        assert_eq!(
            Diagnosis::parse("**DIAGNOSIS: [BUG]**\n\nThe stack trace shows..."),
            Some(Diagnosis::Bug)
        );
        assert_eq!(
            Diagnosis::parse("**Diagnosis:** indeterminate"),
            Some(Diagnosis::Indeterminate)
        );
    }

    #[test]
    fn missing_tag_yields_none() {
        assert_eq!(Diagnosis::parse("Error analyzing logs: timeout"), None);
        assert_eq!(Diagnosis::parse("DIAGNOSIS: BUGGY"), None);
    }
}
