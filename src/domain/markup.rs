//! Helpers for the restricted inline markup stored in `details`.
//!
//! Only `b`/`strong`, `i`/`em`, `u`, `a` and line-break tags carry meaning;
//! everything else is passed through untouched.

use regex::{Captures, Regex};
use std::sync::OnceLock;

/// A piece of markup: either a tag (including its angle brackets) or text between tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Text(&'a str),
    Tag(&'a str),
}

/// Inline formatting tags the details editor can toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineTag {
    Bold,
    Italic,
    Underline,
}

impl InlineTag {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "b" | "strong" => Some(Self::Bold),
            "i" | "em" => Some(Self::Italic),
            "u" => Some(Self::Underline),
            _ => None,
        }
    }

    pub fn open(&self) -> &'static str {
        match self {
            Self::Bold => "<b>",
            Self::Italic => "<i>",
            Self::Underline => "<u>",
        }
    }

    pub fn close(&self) -> &'static str {
        match self {
            Self::Bold => "</b>",
            Self::Italic => "</i>",
            Self::Underline => "</u>",
        }
    }

    /// Single-letter toolbar label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bold => "B",
            Self::Italic => "I",
            Self::Underline => "U",
        }
    }

    pub fn all() -> &'static [InlineTag] {
        &[InlineTag::Bold, InlineTag::Italic, InlineTag::Underline]
    }
}

/// Split markup into tags and text. An unterminated `<` is treated as text.
pub fn tokenize(html: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = html;

    while !rest.is_empty() {
        let Some(lt) = rest.find('<') else {
            tokens.push(Token::Text(rest));
            break;
        };
        let Some(gt) = rest[lt..].find('>') else {
            tokens.push(Token::Text(rest));
            break;
        };
        if lt > 0 {
            tokens.push(Token::Text(&rest[..lt]));
        }
        let end = lt + gt + 1;
        tokens.push(Token::Tag(&rest[lt..end]));
        rest = &rest[end..];
    }

    tokens
}

/// Lowercased tag name and whether it is a closing tag.
/// `<a href="x">` gives `("a", false)`, `</B>` gives `("b", true)`.
pub fn tag_name(tag: &str) -> (String, bool) {
    let inner = tag.trim_start_matches('<').trim_end_matches('>').trim();
    let (inner, closing) = match inner.strip_prefix('/') {
        Some(stripped) => (stripped, true),
        None => (inner, false),
    };
    let name: String = inner
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect();
    (name.to_ascii_lowercase(), closing)
}

/// Extract the `href` attribute value from an anchor tag
pub fn href_of(tag: &str) -> Option<&str> {
    let start = tag.find("href=")? + "href=".len();
    let rest = &tag[start..];
    let quote = rest.chars().next()?;
    if quote == '"' || quote == '\'' {
        let value = &rest[1..];
        let end = value.find(quote)?;
        Some(&value[..end])
    } else {
        let end = rest
            .find(|c: char| c.is_whitespace() || c == '>')
            .unwrap_or(rest.len());
        Some(&rest[..end])
    }
}

/// Inline tags left open at the end of the markup, innermost last
pub fn open_tags(html: &str) -> Vec<InlineTag> {
    let mut open: Vec<InlineTag> = Vec::new();

    for token in tokenize(html) {
        let Token::Tag(tag) = token else { continue };
        let (name, closing) = tag_name(tag);
        let Some(inline) = InlineTag::from_name(&name) else {
            continue;
        };
        if closing {
            if let Some(pos) = open.iter().rposition(|t| *t == inline) {
                open.remove(pos);
            }
        } else {
            open.push(inline);
        }
    }

    open
}

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // `&` only continues a URL as an escaped `&amp;`; other entities end it
        Regex::new(r#"(?i)(?:https?://|www\.)(?:[^\s<>"'&]|&amp;)+"#).expect("url pattern is valid")
    })
}

fn link_match(caps: &Captures) -> String {
    let matched = &caps[0];
    let mut core = matched.trim_end_matches(|c: char| ".,!?;:)".contains(c));
    if core.ends_with("&amp") {
        core = &matched[..core.len() + 1];
    }
    let tail = &matched[core.len()..];
    if core.len() <= "www.".len() {
        return matched.to_string();
    }

    let href = if core.to_ascii_lowercase().starts_with("www.") {
        format!("https://{}", core)
    } else {
        core.to_string()
    };
    format!(
        "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>{}",
        href, core, tail
    )
}

/// Wrap bare URLs in anchors. Text already inside an `<a>` is left alone,
/// and `www.` links get an `https://` href.
pub fn autolink_urls(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut anchor_depth = 0usize;

    for token in tokenize(html) {
        match token {
            Token::Tag(tag) => {
                let (name, closing) = tag_name(tag);
                if name == "a" {
                    if closing {
                        anchor_depth = anchor_depth.saturating_sub(1);
                    } else {
                        anchor_depth += 1;
                    }
                }
                out.push_str(tag);
            }
            Token::Text(text) if anchor_depth == 0 => {
                out.push_str(&url_pattern().replace_all(text, link_match));
            }
            Token::Text(text) => out.push_str(text),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tokenize_mixed() {
        let tokens = tokenize("a <b>bold</b> < c");
        assert_eq!(
            tokens,
            vec![
                Token::Text("a "),
                Token::Tag("<b>"),
                Token::Text("bold"),
                Token::Tag("</b>"),
                Token::Text(" < c"),
            ]
        );
    }

    #[test]
    fn test_tag_name() {
        assert_eq!(tag_name("<a href=\"x\">"), ("a".to_string(), false));
        assert_eq!(tag_name("</B>"), ("b".to_string(), true));
        assert_eq!(tag_name("<br/>"), ("br".to_string(), false));
    }

    #[test]
    fn test_href_of() {
        assert_eq!(href_of("<a href=\"https://x.io\" target=\"_blank\">"), Some("https://x.io"));
        assert_eq!(href_of("<a href='y'>"), Some("y"));
        assert_eq!(href_of("<a name=\"top\">"), None);
    }

    #[test]
    fn test_autolink_plain_url() {
        let html = autolink_urls("see https://example.com/docs now");
        assert_eq!(
            html,
            "see <a href=\"https://example.com/docs\" target=\"_blank\" rel=\"noopener noreferrer\">https://example.com/docs</a> now"
        );
    }

    #[test]
    fn test_autolink_www_gets_scheme_and_keeps_trailing_punctuation() {
        let html = autolink_urls("go to www.rust-lang.org.");
        assert_eq!(
            html,
            "go to <a href=\"https://www.rust-lang.org\" target=\"_blank\" rel=\"noopener noreferrer\">www.rust-lang.org</a>."
        );
    }

    #[test]
    fn test_autolink_stops_at_escaped_entities() {
        let html = autolink_urls("see https://x.io&lt;");
        assert_eq!(
            html,
            "see <a href=\"https://x.io\" target=\"_blank\" rel=\"noopener noreferrer\">https://x.io</a>&lt;"
        );

        let html = autolink_urls("https://x.io/?a=1&amp;b=2&amp;.");
        assert_eq!(
            html,
            "<a href=\"https://x.io/?a=1&amp;b=2&amp;\" target=\"_blank\" rel=\"noopener noreferrer\">https://x.io/?a=1&amp;b=2&amp;</a>."
        );
    }

    #[test]
    fn test_autolink_skips_existing_anchor() {
        let input = "<a href=\"https://a.io\">https://a.io</a> and <b>http://b.io</b>";
        let html = autolink_urls(input);
        assert!(html.starts_with("<a href=\"https://a.io\">https://a.io</a> and <b>"));
        assert!(html.contains("<a href=\"http://b.io\""));
        assert_eq!(html.matches("<a ").count(), 2);
    }

    #[test]
    fn test_autolink_is_idempotent() {
        let once = autolink_urls("notes: https://example.com");
        assert_eq!(autolink_urls(&once), once);
    }

    #[test]
    fn test_open_tags() {
        assert_eq!(open_tags("<b>bold <i>both"), vec![InlineTag::Bold, InlineTag::Italic]);
        assert_eq!(open_tags("<b>bold</b> <u>under"), vec![InlineTag::Underline]);
        assert!(open_tags("<strong>x</strong>").is_empty());
    }
}
