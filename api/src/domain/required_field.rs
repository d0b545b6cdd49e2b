use unicode_segmentation::UnicodeSegmentation;

use crate::domain::ValidationError;

const DEFAULT_MAX_GRAPHEMES: usize = 256;
pub const MESSAGE_MAX_GRAPHEMES: usize = 5000;

/// A non-blank, length-bounded text value taken from a form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredField(String);

impl RequiredField {
    pub fn parse(field: &'static str, s: String) -> Result<RequiredField, ValidationError> {
        Self::parse_with_limit(field, s, DEFAULT_MAX_GRAPHEMES)
    }

    pub fn parse_with_limit(
        field: &'static str,
        s: String,
        max_graphemes: usize,
    ) -> Result<RequiredField, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::new(field, "is required"));
        }

        if trimmed.graphemes(true).count() > max_graphemes {
            return Err(ValidationError::new(
                field,
                format!("must be at most {} characters", max_graphemes),
            ));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn inner(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for RequiredField {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
