use std::borrow::Cow;

use html_escape::{encode_double_quoted_attribute, encode_text};
use scraper::{ElementRef, Html, Node};
use url::Url;

use crate::app::{FeedwatchError, Result};
use crate::domain::FeedDefinition;
use crate::extractor::contains_anchor;

const TITLE_PLACEHOLDER: &str = "{title}";

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "xmp", "iframe", "noembed", "noframes"];

/// Build the notification body for `feed` from its extracted fragment.
///
/// The message template comes first, then the fragment with every relative
/// link made absolute against the feed's URL.
pub fn render_notification(feed: &FeedDefinition, fragment: &str) -> Result<String> {
    // Template contents accept table parts (`<tr>`, `<td>`) that a body
    // context would drop.
    let parsed = Html::parse_document(&format!("<template>{}</template>", fragment));
    let root = parsed
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "template")
        .unwrap_or_else(|| parsed.root_element());

    if !contains_anchor(&root) {
        return Err(FeedwatchError::MissingAnchor {
            selector: feed.rule.as_str().to_string(),
        });
    }

    let mut body = String::with_capacity(fragment.len() + 64);
    write_children(&mut body, root, &feed.url);

    let heading = feed.message.replace(TITLE_PLACEHOLDER, &feed.title);
    Ok(format!("{}\n{}", heading, body))
}

fn resolve_href<'a>(base: &Url, href: &'a str) -> Cow<'a, str> {
    match Url::parse(href) {
        Err(url::ParseError::RelativeUrlWithoutBase) => match base.join(href) {
            Ok(absolute) => Cow::Owned(absolute.to_string()),
            Err(e) => {
                tracing::warn!("Could not resolve link {} against {}: {}", href, base, e);
                Cow::Borrowed(href)
            }
        },
        _ => Cow::Borrowed(href),
    }
}

fn write_element(out: &mut String, element: ElementRef<'_>, base: &Url) {
    let value = element.value();
    let name = value.name();

    out.push('<');
    out.push_str(name);
    for (attr, raw) in value.attrs() {
        let raw = if name == "a" && attr == "href" {
            resolve_href(base, raw)
        } else {
            Cow::Borrowed(raw)
        };
        out.push(' ');
        out.push_str(attr);
        out.push_str("=\"");
        out.push_str(&encode_double_quoted_attribute(&*raw));
        out.push('"');
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&name) {
        return;
    }

    write_children(out, element, base);

    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn write_children(out: &mut String, element: ElementRef<'_>, base: &Url) {
    let raw_text = RAW_TEXT_ELEMENTS.contains(&element.value().name());

    for child in element.children() {
        match child.value() {
            Node::Text(text) if raw_text => out.push_str(&**text),
            Node::Text(text) => out.push_str(&encode_text(&**text)),
            Node::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(&**comment);
                out.push_str("-->");
            }
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    write_element(out, child, base);
                }
            }
            _ => {}
        }
    }
}
