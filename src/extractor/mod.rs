//! Fragment extraction from fetched pages.
//!
//! A feed watches exactly one element of its page, selected by a CSS rule.
//! The first match is serialized and becomes the fragment that the change
//! detector compares against the cached snapshot.
//!
//! ```text
//! page HTML → CssRule → first matching element → outer HTML
//! ```

use std::fmt;

use scraper::{ElementRef, Html, Selector};

use crate::app::{FeedwatchError, Result};

/// A validated CSS selector together with its source text.
#[derive(Clone)]
pub struct CssRule {
    source: String,
    selector: Selector,
}

impl CssRule {
    pub fn parse(source: &str) -> std::result::Result<Self, String> {
        let selector = Selector::parse(source)
            .map_err(|e| format!("invalid selector `{}`: {}", source, e))?;
        Ok(Self {
            source: source.to_string(),
            selector,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for CssRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CssRule").field(&self.source).finish()
    }
}

/// Serialize the first element of `content` matching `rule`.
///
/// The element has to be a link or contain one, since the notification is
/// built around it.
pub fn extract(content: &str, rule: &CssRule) -> Result<String> {
    let document = Html::parse_document(content);

    let element = document
        .select(&rule.selector)
        .next()
        .ok_or_else(|| FeedwatchError::Selection {
            selector: rule.source.clone(),
        })?;

    if !contains_anchor(&element) {
        return Err(FeedwatchError::MissingAnchor {
            selector: rule.source.clone(),
        });
    }

    let fragment = element.html();
    tracing::debug!(selector = %rule.source, %fragment, "Extracted fragment");
    Ok(fragment)
}

/// Whether `element` is an `<a>` or has one among its descendants.
pub(crate) fn contains_anchor(element: &ElementRef<'_>) -> bool {
    element
        .descendants()
        .filter_map(ElementRef::wrap)
        .any(|el| el.value().name() == "a")
}
