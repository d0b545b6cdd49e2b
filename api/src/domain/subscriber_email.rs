use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};

/// An address accepted by the lead forms: no whitespace, an `@` with at least
/// one character before it, and a `.` with at least one character on each side
/// somewhere after the `@` (`^\S+@\S+\.\S+$`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    pub fn parse(s: String) -> Result<SubscriberEmail, String> {
        let trimmed = s.trim();

        if matches_loose_email_pattern(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(format!("{} is not a valid email address", s))
        }
    }

    /// Lowercased form, used as the stored value and for duplicate lookups.
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }

    pub fn inner(&self) -> &str {
        self.0.as_str()
    }
}

// `\S` plus U+FEFF, which browsers count as whitespace but Unicode does not.
static LOOSE_EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s\x{FEFF}]+@[^\s\x{FEFF}]+\.[^\s\x{FEFF}]+$")
        .expect("the email pattern is a valid regex")
});

fn matches_loose_email_pattern(s: &str) -> bool {
    LOOSE_EMAIL.is_match(s)
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for SubscriberEmail {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
