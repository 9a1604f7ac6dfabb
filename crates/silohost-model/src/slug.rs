use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

pub const SLUG_MAX_LEN: usize = 64;

/// URL-safe identifier. Grammar: `[a-z0-9]+(-[a-z0-9]+)*`, at most
/// [`SLUG_MAX_LEN`] bytes. Uniqueness scope (site, category, location) is a
/// storage concern; the type only guarantees the shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
#[non_exhaustive]
pub struct Slug(String);

impl Slug {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(ValidationError("slug must not be empty".to_string()));
        }
        if s.len() > SLUG_MAX_LEN {
            return Err(ValidationError(format!(
                "slug exceeds max length {SLUG_MAX_LEN}"
            )));
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(ValidationError(
                "slug must match [a-z0-9-]+ in kebab-case".to_string(),
            ));
        }
        if s.starts_with('-') || s.ends_with('-') || s.contains("--") {
            return Err(ValidationError(
                "slug must not start/end with '-' or contain '--'".to_string(),
            ));
        }
        Ok(Self(s.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for Slug {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Derives a slug from a display name: lowercased, every run of
/// non-alphanumeric characters collapsed to a single hyphen, truncated to the
/// slug length cap.
pub fn slugify(input: &str) -> Result<Slug, ValidationError> {
    let mut out = String::with_capacity(input.len());
    let mut pending_hyphen = false;
    for c in input.trim().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    while out.len() > SLUG_MAX_LEN {
        out.pop();
    }
    while out.ends_with('-') {
        out.pop();
    }
    if out.is_empty() {
        return Err(ValidationError(format!(
            "cannot derive a slug from {input:?}"
        )));
    }
    Slug::parse(&out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_kebab_case() {
        assert_eq!(Slug::parse("hvac-repair").expect("valid").as_str(), "hvac-repair");
        assert_eq!(Slug::parse(" austin ").expect("trimmed").as_str(), "austin");
    }

    #[test]
    fn parse_rejects_bad_shapes() {
        for bad in ["", "-lead", "lead-", "a--b", "Big", "a b", "ü"] {
            assert!(Slug::parse(bad).is_err(), "expected rejection for {bad:?}");
        }
        let long = "a".repeat(SLUG_MAX_LEN + 1);
        assert!(Slug::parse(&long).is_err());
    }

    #[test]
    fn slugify_normalizes_display_names() {
        assert_eq!(slugify("HVAC Repair").expect("slug").as_str(), "hvac-repair");
        assert_eq!(
            slugify("  Drain -- Cleaning! ").expect("slug").as_str(),
            "drain-cleaning"
        );
        assert_eq!(slugify("A/C & Heating").expect("slug").as_str(), "a-c-heating");
        assert!(slugify("!!!").is_err());
    }

    #[test]
    fn slugify_truncates_without_trailing_hyphen() {
        let input = format!("{} tail", "x".repeat(SLUG_MAX_LEN - 1));
        let slug = slugify(&input).expect("slug");
        assert!(slug.as_str().len() <= SLUG_MAX_LEN);
        assert!(!slug.as_str().ends_with('-'));
    }
}
