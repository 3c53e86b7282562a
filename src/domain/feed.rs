use url::Url;

use crate::app::{FeedwatchError, Result};
use crate::extractor::CssRule;

/// A monitored webpage: where to fetch it, which fragment to watch and what
/// to say when it changes.
#[derive(Debug, Clone)]
pub struct FeedDefinition {
    pub identity: String,
    pub title: String,
    pub url: Url,
    pub rule: CssRule,
    pub message: String,
}

impl FeedDefinition {
    pub fn new(title: &str, url: &str, selector: &str, message: &str) -> Result<Self> {
        let title = title.trim();
        let identity = slugify(title);
        validate_identity(&identity)?;

        let url = Url::parse(url).map_err(|e| {
            FeedwatchError::Config(format!("Feed {} has an invalid url {}: {}", title, url, e))
        })?;

        let rule = CssRule::parse(selector)
            .map_err(|e| FeedwatchError::Config(format!("Feed {}: {}", title, e)))?;

        Ok(Self {
            identity,
            title: title.to_string(),
            url,
            rule,
            message: message.to_string(),
        })
    }
}

/// Trim the text, join words with a hyphen and lowercase it.
pub fn slugify(text: &str) -> String {
    text.trim().replace(' ', "-").to_lowercase()
}

// The identity names a file in the cache directory.
fn validate_identity(identity: &str) -> Result<()> {
    let invalid = identity.is_empty()
        || identity.chars().all(|c| c == '.')
        || identity
            .chars()
            .any(|c| c == '/' || c == '\\' || c == '\0' || c.is_control());

    if invalid {
        return Err(FeedwatchError::Config(format!(
            "Feed title {:?} does not produce a usable identity",
            identity
        )));
    }
    Ok(())
}
