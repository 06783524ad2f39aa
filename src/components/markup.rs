//! Renders the rules HTML as styled terminal text.
//!
//! Inline tags map to modifiers (`<b>` bold, `<i>` italic, ...), block tags
//! start new lines, list items get a bullet. Whitespace collapses the way a
//! browser collapses it. Scripts and styles are dropped.

use kuchiki::traits::TendrilSink as _;
use kuchiki::{NodeData, NodeRef};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span, Text};

const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "footer", "h1", "h2", "h3",
    "h4", "h5", "h6", "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table",
    "tr", "ul",
];

const SKIPPED_TAGS: &[&str] = &["head", "script", "style", "template", "title"];

pub fn markup_to_text(html: &str) -> Text<'static> {
    let document = kuchiki::parse_html().one(html);
    let mut renderer = MarkupRenderer::default();
    renderer.walk(&document);
    renderer.finish()
}

fn tag_style(tag: &str) -> Style {
    match tag {
        "b" | "strong" => Style::default().add_modifier(Modifier::BOLD),
        "i" | "em" | "cite" => Style::default().add_modifier(Modifier::ITALIC),
        "u" | "ins" | "a" => Style::default().add_modifier(Modifier::UNDERLINED),
        "s" | "del" | "strike" => Style::default().add_modifier(Modifier::CROSSED_OUT),
        "code" | "kbd" => Style::default().fg(Color::Cyan),
        "h1" | "h2" => Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        "h3" | "h4" | "h5" | "h6" | "th" => Style::default().add_modifier(Modifier::BOLD),
        _ => Style::default(),
    }
}

#[derive(Default)]
struct MarkupRenderer {
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    styles: Vec<Style>,
    list_depth: usize,
    pending_space: bool,
}

impl MarkupRenderer {
    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or_default()
    }

    fn walk(&mut self, node: &NodeRef) {
        match node.data() {
            NodeData::Text(text) => self.push_text(&text.borrow()),
            NodeData::Element(element) => {
                let tag: &str = &element.name.local;
                if SKIPPED_TAGS.contains(&tag) {
                    return;
                }
                if tag == "br" {
                    self.force_break();
                    return;
                }

                let block = BLOCK_TAGS.contains(&tag);
                if block {
                    self.break_line();
                }
                if tag == "li" {
                    let indent = "  ".repeat(self.list_depth.saturating_sub(1));
                    self.current.push(Span::raw(format!("{indent}• ")));
                }
                if tag == "ul" || tag == "ol" {
                    self.list_depth += 1;
                }
                if tag == "td" || tag == "th" {
                    self.pending_space = true;
                }

                self.styles.push(self.style().patch(tag_style(tag)));
                for child in node.children() {
                    self.walk(&child);
                }
                self.styles.pop();

                if tag == "ul" || tag == "ol" {
                    self.list_depth -= 1;
                }
                if block {
                    self.break_line();
                }
            }
            NodeData::Document(_) | NodeData::DocumentFragment => {
                for child in node.children() {
                    self.walk(&child);
                }
            }
            _ => {}
        }
    }

    fn line_has_text(&self) -> bool {
        self.current.iter().any(|span| !span.content.trim().is_empty())
    }

    fn push_text(&mut self, raw: &str) {
        if raw.trim().is_empty() {
            if !raw.is_empty() && self.line_has_text() {
                self.pending_space = true;
            }
            return;
        }

        if (self.pending_space || raw.starts_with(char::is_whitespace)) && self.line_has_text() {
            self.current.push(Span::raw(" "));
        }
        let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        self.pending_space = raw.ends_with(char::is_whitespace);
        self.current.push(Span::styled(text, self.style()));
    }

    /// End the current line if it has anything on it.
    fn break_line(&mut self) {
        if !self.current.is_empty() {
            self.force_break();
        }
    }

    fn force_break(&mut self) {
        self.lines.push(Line::from(std::mem::take(&mut self.current)));
        self.pending_space = false;
    }

    fn finish(mut self) -> Text<'static> {
        self.break_line();
        Text::from(self.lines)
    }
}
