use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::GenerationError;
use crate::plain::strip_markdown;

pub const MAX_TITLE_CHARS: usize = 140;
pub const EXPECTED_TAGS: usize = 13;
pub const EXPECTED_PROMPTS: usize = 3;

const DIVIDER: &str = "--------------------";

/// Marketplace listing returned by the content generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub title: String,
    #[serde(deserialize_with = "tags_from_list_or_string")]
    pub tags: Vec<String>,
    /// Markdown-subset text
    pub description: String,
    #[serde(default)]
    pub cover_image_prompts: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TagsField {
    List(Vec<String>),
    Joined(String),
}

fn tags_from_list_or_string<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match TagsField::deserialize(deserializer)? {
        TagsField::List(tags) => tags,
        TagsField::Joined(joined) => split_tags(&joined),
    })
}

/// Split a comma-joined tag string, trimming each tag.
pub fn split_tags(joined: &str) -> Vec<String> {
    joined.split(',').map(|tag| tag.trim().to_string()).collect()
}

impl Listing {
    /// Parse a generator response. Shape anomalies are logged, not corrected.
    pub fn from_json(json: &str) -> Result<Self, GenerationError> {
        let listing: Listing = serde_json::from_str(json.trim())?;
        listing.check();
        Ok(listing)
    }

    /// Log fields that miss the generator's contract. Nothing is truncated.
    pub fn check(&self) {
        let title_chars = self.title.chars().count();
        if title_chars > MAX_TITLE_CHARS {
            log::warn!("listing title is {title_chars} characters, over {MAX_TITLE_CHARS}");
        }
        if self.tags.len() != EXPECTED_TAGS {
            log::warn!(
                "listing has {} tags, expected {EXPECTED_TAGS}",
                self.tags.len()
            );
        }
        if self.cover_image_prompts.len() != EXPECTED_PROMPTS {
            log::warn!(
                "listing has {} cover image prompts, expected {EXPECTED_PROMPTS}",
                self.cover_image_prompts.len()
            );
        }
    }

    /// Flat `.txt` rendering with the description stripped of markdown
    pub fn to_text(&self) -> String {
        let mut out = format!("Title:\n{}\n\n", self.title);
        out.push_str(&format!("{DIVIDER}\n\n"));
        out.push_str(&format!("Suggested Tags:\n{}\n\n", self.tags.join(", ")));
        out.push_str(&format!("{DIVIDER}\n\n"));
        out.push_str(&format!(
            "Product Description:\n{}\n\n",
            strip_markdown(&self.description)
        ));
        out.push_str(&format!("{DIVIDER}\n\n"));
        out.push_str("Suggested Cover Image Prompts:\n");
        for prompt in &self.cover_image_prompts {
            out.push_str(&format!("- {prompt}\n"));
        }
        out
    }
}

/// Everything generated for one product idea
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedContent {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub idea: String,
    pub listing: Listing,
    /// Long-form markdown-subset product content
    pub product: String,
}

impl GeneratedContent {
    pub fn new(idea: impl Into<String>, listing: Listing, product: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            idea: idea.into(),
            listing,
            product: product.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn listing() -> Listing {
        Listing {
            title: "Budget Planner".to_string(),
            tags: vec!["budget".to_string(), "planner".to_string()],
            description: "## Why\nTrack **every** dollar.\n- Monthly pages".to_string(),
            cover_image_prompts: vec!["Flat lay".to_string(), "Desk mockup".to_string()],
        }
    }

    #[test]
    fn tags_accept_joined_string() {
        let parsed = Listing::from_json(
            r#"{"title":"T","tags":"a, b, c","description":"d","coverImagePrompts":[]}"#,
        )
        .expect("valid listing");
        assert_eq!(parsed.tags, vec!["a", "b", "c"]);
    }

    #[test]
    fn tags_accept_array() {
        let parsed =
            Listing::from_json(r#"{"title":"T","tags":["x","y"],"description":"d"}"#)
                .expect("valid listing");
        assert_eq!(parsed.tags, vec!["x", "y"]);
        assert!(parsed.cover_image_prompts.is_empty());
    }

    #[test]
    fn title_of_140_chars_is_kept() {
        let title = "t".repeat(MAX_TITLE_CHARS);
        let json = format!(r#"{{"title":"{title}","tags":[],"description":""}}"#);
        let parsed = Listing::from_json(&json).expect("valid listing");
        assert_eq!(parsed.title, title);
    }

    #[test]
    fn long_title_is_not_truncated() {
        let title = "t".repeat(MAX_TITLE_CHARS + 10);
        let json = format!(r#"{{"title":"{title}","tags":[],"description":""}}"#);
        assert_eq!(
            Listing::from_json(&json).expect("valid listing").title.len(),
            150
        );
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            Listing::from_json("{\"title\": 3}"),
            Err(GenerationError::Malformed(_))
        ));
    }

    #[test]
    fn text_export_layout() {
        assert_eq!(
            listing().to_text(),
            "Title:\nBudget Planner\n\n\
             --------------------\n\n\
             Suggested Tags:\nbudget, planner\n\n\
             --------------------\n\n\
             Product Description:\nWhy\nTrack every dollar.\n- Monthly pages\n\n\
             --------------------\n\n\
             Suggested Cover Image Prompts:\n- Flat lay\n- Desk mockup\n"
        );
    }

    #[test]
    fn generated_content_round_trips_without_id() {
        let json = r##"{"idea":"x","listing":{"title":"T","tags":"a","description":""},"product":"# P"}"##;
        let content: GeneratedContent = serde_json::from_str(json).expect("valid content");
        assert_eq!(content.idea, "x");
        assert_eq!(content.listing.tags, vec!["a"]);
        assert!(!content.id.is_nil());
    }
}
