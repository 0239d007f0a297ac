use std::io::{self, Read};

use thiserror::Error;
use viewer_core::{ConversionResult, Diagnostic};

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to read document: {0}")]
    Io(#[from] io::Error),
    #[error("unsupported document: {reason}")]
    Unsupported { reason: String },
}

/// Converts a document stream, plus optional styles text, into HTML.
pub trait DocumentConverter: Send + Sync {
    fn convert(
        &self,
        document: &mut dyn Read,
        styles: Option<&str>,
    ) -> Result<ConversionResult, ConvertError>;
}

/// Converts UTF-8 plain text into HTML paragraphs.
///
/// Paragraphs are separated by blank lines. Styles text understands two
/// mappings, `p => TAG` for every paragraph and `p:first => TAG` for the
/// first one; any other non-comment line is reported as a warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextConverter;

const ALLOWED_TAGS: [&str; 10] = [
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "pre", "div",
];

#[derive(Debug, Clone, PartialEq, Eq)]
struct StyleMap {
    paragraph: String,
    first: Option<String>,
}

impl Default for StyleMap {
    fn default() -> Self {
        Self {
            paragraph: "p".to_string(),
            first: None,
        }
    }
}

fn parse_style_map(styles: &str, messages: &mut Vec<Diagnostic>) -> StyleMap {
    let mut map = StyleMap::default();
    for line in styles.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let parsed = line.split_once("=>").and_then(|(selector, tag)| {
            let tag = tag.trim();
            ALLOWED_TAGS
                .contains(&tag)
                .then(|| (selector.trim(), tag.to_string()))
        });
        match parsed {
            Some(("p", tag)) => map.paragraph = tag,
            Some(("p:first", tag)) => map.first = Some(tag),
            _ => messages.push(Diagnostic::warning(format!(
                "Did not understand this style mapping, so ignored it: {line}"
            ))),
        }
    }
    map
}

impl DocumentConverter for PlainTextConverter {
    fn convert(
        &self,
        document: &mut dyn Read,
        styles: Option<&str>,
    ) -> Result<ConversionResult, ConvertError> {
        let mut bytes = Vec::new();
        document.read_to_end(&mut bytes)?;
        let text = String::from_utf8(bytes).map_err(|err| ConvertError::Unsupported {
            reason: format!("document is not UTF-8 text ({err})"),
        })?;

        let mut messages = Vec::new();
        let map = styles
            .map(|styles| parse_style_map(styles, &mut messages))
            .unwrap_or_default();

        let html = paragraphs(&text)
            .enumerate()
            .map(|(index, paragraph)| {
                let tag = match (&map.first, index) {
                    (Some(first), 0) => first.as_str(),
                    _ => map.paragraph.as_str(),
                };
                format!("<{tag}>{}</{tag}>", escape_html(&paragraph))
            })
            .collect::<Vec<_>>()
            .join("\n");

        Ok(ConversionResult { html, messages })
    }
}

fn paragraphs(text: &str) -> impl Iterator<Item = String> + '_ {
    let mut found = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            if !current.is_empty() {
                found.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        found.push(current.join(" "));
    }
    found.into_iter()
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn blank_lines_separate_paragraphs() {
        let found: Vec<String> = paragraphs("one\ntwo\n\n\n three \r\n\r\nfour").collect();
        assert_eq!(found, vec!["one two", "three", "four"]);
    }

    #[test]
    fn mixed_line_endings_still_break_paragraphs() {
        let found: Vec<String> = paragraphs("first\n\r\nsecond\r\n \t\nthird").collect();
        assert_eq!(found, vec!["first", "second", "third"]);
    }
}
