//! Course metadata extraction from README markdown.
//!
//! A course README publishes its listing as a first-level heading plus
//! `**Label:** value` lines:
//!
//! ```markdown
//! # Intro to Go
//! **Course Description:** Learn Go from scratch.
//! **Teacher:** Ada
//! **Course Price:** $20
//! ```
//!
//! Each field is matched independently; the first match wins and missing
//! fields fall back to fixed defaults. Extraction never fails, whatever
//! the input.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use learning_center_core::CoursePrice;

/// Default course name when the README has no first-level heading.
pub const DEFAULT_COURSE_NAME: &str = "Unknown Course";
/// Default description when the README publishes none.
pub const DEFAULT_DESCRIPTION: &str = "No description available.";
/// Default teacher when the README publishes none.
pub const DEFAULT_TEACHER: &str = "Unknown Teacher";

static COURSE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)] // pattern is a compile-time constant
    Regex::new(r"(?m)^# (.+)").unwrap()
});

// READMEs in the wild use both "**Course Description:**" and the shorter
// "**Description:**"; both label forms are accepted for each field.
static DESCRIPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"(?i)\*\*(?:Course )?Description:\*\* ?(.+)").unwrap()
});

static TEACHER_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"(?i)\*\*Teacher:\*\* ?(.+)").unwrap()
});

static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    // An optional dollar sign before the value is stripped
    #[allow(clippy::unwrap_used)]
    Regex::new(r"(?i)\*\*(?:Course )?Price:\*\* ?\$?(.+)").unwrap()
});

/// Course listing fields extracted from a README.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseMetadata {
    pub course_name: String,
    pub description: String,
    pub teacher: String,
    pub price: CoursePrice,
}

impl Default for CourseMetadata {
    fn default() -> Self {
        Self {
            course_name: DEFAULT_COURSE_NAME.to_owned(),
            description: DEFAULT_DESCRIPTION.to_owned(),
            teacher: DEFAULT_TEACHER.to_owned(),
            price: CoursePrice::default(),
        }
    }
}

/// Extract course metadata from README text.
///
/// Each field is optional; absent or malformed fields yield the defaults.
#[must_use]
pub fn extract(readme: &str) -> CourseMetadata {
    CourseMetadata {
        course_name: first_capture(&COURSE_NAME_RE, readme)
            .unwrap_or_else(|| DEFAULT_COURSE_NAME.to_owned()),
        description: first_capture(&DESCRIPTION_RE, readme)
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_owned()),
        teacher: first_capture(&TEACHER_RE, readme)
            .unwrap_or_else(|| DEFAULT_TEACHER.to_owned()),
        price: first_capture(&PRICE_RE, readme).map_or_else(CoursePrice::default, CoursePrice::new),
    }
}

/// First capture group of the first match, trimmed; `None` when absent or
/// blank after trimming.
fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_owned())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_readme_yields_defaults() {
        let meta = extract("");
        assert_eq!(meta.course_name, "Unknown Course");
        assert_eq!(meta.description, "No description available.");
        assert_eq!(meta.teacher, "Unknown Teacher");
        assert_eq!(meta.price.as_str(), "Free");
    }

    #[test]
    fn test_full_listing() {
        let readme = "# Intro to Go\n\
                      Some intro text.\n\
                      **Course Description:** Learn Go from scratch.\n\
                      **Teacher:** Ada\n\
                      **Course Price:** $20\n";
        let meta = extract(readme);
        assert_eq!(meta.course_name, "Intro to Go");
        assert_eq!(meta.description, "Learn Go from scratch.");
        assert_eq!(meta.teacher, "Ada");
        // Leading dollar sign is stripped by the pattern
        assert_eq!(meta.price.as_str(), "20");
    }

    #[test]
    fn test_partial_listing_mixes_defaults() {
        let meta = extract("# Intro to Go\n**Teacher:** Ada\n**Price:** $20");
        assert_eq!(meta.course_name, "Intro to Go");
        assert_eq!(meta.teacher, "Ada");
        assert_eq!(meta.description, "No description available.");
        assert_eq!(meta.price.as_str(), "20");
    }

    #[test]
    fn test_first_match_wins() {
        let readme = "# First Course\n# Second Course\n\
                      **Teacher:** Ada\n**Teacher:** Grace\n";
        let meta = extract(readme);
        assert_eq!(meta.course_name, "First Course");
        assert_eq!(meta.teacher, "Ada");
    }

    #[test]
    fn test_labels_are_case_insensitive() {
        let meta = extract("**course description:** lowercase labels work\n");
        assert_eq!(meta.description, "lowercase labels work");
    }

    #[test]
    fn test_heading_must_be_first_level() {
        let meta = extract("## Not a course title\n### Neither is this\n");
        assert_eq!(meta.course_name, "Unknown Course");
    }

    #[test]
    fn test_values_are_trimmed() {
        let meta = extract("**Course Price:**   49.99  \n");
        assert_eq!(meta.price.as_str(), "49.99");
    }

    #[test]
    fn test_free_price_kept_verbatim() {
        let meta = extract("**Course Price:** Free\n");
        assert_eq!(meta.price.as_str(), "Free");
        assert!(meta.price.is_free());
    }

    #[test]
    fn test_serde_shape() {
        #[allow(clippy::unwrap_used)]
        let json = serde_json::to_value(CourseMetadata::default()).unwrap();
        assert_eq!(json["courseName"], "Unknown Course");
        assert_eq!(json["price"], "Free");
    }
}
