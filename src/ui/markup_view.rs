use crate::domain::markup::{href_of, tag_name, tokenize, InlineTag, Token};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

/// Decode the handful of entities the details editor produces
pub fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[derive(Default)]
struct LineBuilder {
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
}

impl LineBuilder {
    fn push(&mut self, span: Span<'static>) {
        self.current.push(span);
    }

    fn break_line(&mut self) {
        self.lines.push(Line::from(std::mem::take(&mut self.current)));
    }

    fn break_if_started(&mut self) {
        if !self.current.is_empty() {
            self.break_line();
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        if !self.current.is_empty() || self.lines.is_empty() {
            self.break_line();
        }
        self.lines
    }
}

/// Render inline details markup into styled terminal lines.
///
/// `b`/`strong`, `i`/`em` and `u` become modifiers, links use `link` and
/// show their target when it differs from the text, and `br`/`div`/`p`
/// break lines. Unknown tags are dropped.
pub fn render_markup(html: &str, base: Style, link: Style) -> Vec<Line<'static>> {
    let mut out = LineBuilder::default();
    let mut bold = 0usize;
    let mut italic = 0usize;
    let mut underline = 0usize;
    let mut anchor: Option<(String, String)> = None;

    for token in tokenize(html) {
        match token {
            Token::Tag(tag) => {
                let (name, closing) = tag_name(tag);
                match (name.as_str(), InlineTag::from_name(&name)) {
                    (_, Some(inline)) => {
                        let counter = match inline {
                            InlineTag::Bold => &mut bold,
                            InlineTag::Italic => &mut italic,
                            InlineTag::Underline => &mut underline,
                        };
                        *counter = if closing {
                            counter.saturating_sub(1)
                        } else {
                            *counter + 1
                        };
                    }
                    ("br", _) => out.break_line(),
                    ("div" | "p", _) => out.break_if_started(),
                    ("a", _) if closing => {
                        if let Some((href, text)) = anchor.take() {
                            if !href.is_empty() && href != text {
                                out.push(Span::styled(format!(" ({})", href), base.add_modifier(Modifier::DIM)));
                            }
                        }
                    }
                    ("a", _) => {
                        let href = href_of(tag).map(decode_entities).unwrap_or_default();
                        anchor = Some((href, String::new()));
                    }
                    _ => {}
                }
            }
            Token::Text(text) => {
                let decoded = decode_entities(text);
                let mut style = if anchor.is_some() { link } else { base };
                if bold > 0 {
                    style = style.add_modifier(Modifier::BOLD);
                }
                if italic > 0 {
                    style = style.add_modifier(Modifier::ITALIC);
                }
                if underline > 0 {
                    style = style.add_modifier(Modifier::UNDERLINED);
                }
                if let Some((_, link_text)) = anchor.as_mut() {
                    link_text.push_str(&decoded);
                }
                out.push(Span::styled(decoded, style));
            }
        }
    }

    out.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &lt;b&gt; &amp;lt; &nbsp;"), "a <b> &lt;  ");
    }

    #[test]
    fn test_plain_text_is_one_line() {
        let lines = render_markup("hello", Style::default(), Style::default());
        assert_eq!(lines.len(), 1);
        assert_eq!(line_text(&lines[0]), "hello");
    }

    #[test]
    fn test_empty_markup_still_has_a_line() {
        let lines = render_markup("", Style::default(), Style::default());
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_formatting_modifiers() {
        let lines = render_markup("a <b>b <i>bi</i></b> <u>u</u>", Style::default(), Style::default());
        let spans = &lines[0].spans;

        assert_eq!(spans[0].content, "a ");
        assert!(spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert!(spans[2].style.add_modifier.contains(Modifier::BOLD | Modifier::ITALIC));
        assert!(!spans[3].style.add_modifier.contains(Modifier::BOLD));
        assert!(spans[4].style.add_modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn test_line_breaks_from_contenteditable() {
        let lines = render_markup("first<div>second</div><div>third<br>fourth</div>", Style::default(), Style::default());
        let texts: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(texts, vec!["first", "second", "third", "fourth"]);
    }

    #[test]
    fn test_links_show_target() {
        let link = Style::default().fg(Color::Blue);
        let lines = render_markup(
            "<a href=\"https://x.io\">docs</a> <a href=\"https://y.io\">https://y.io</a>",
            Style::default(),
            link,
        );
        assert_eq!(line_text(&lines[0]), "docs (https://x.io) https://y.io");
        assert_eq!(lines[0].spans[0].style.fg, Some(Color::Blue));
    }
}
