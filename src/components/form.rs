use crate::components::output::output_text;
use crate::state::forms::Form;
use crate::state::page::Content;
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap};

/// A form box: one line per field, then the constraint notice and the
/// element holding the last server answer.
pub struct FormView<'a> {
    pub form: &'a Form,
    pub focused_field: Option<usize>,
    pub editing: bool,
    pub notice: Option<&'a str>,
    pub result: Option<&'a Content>,
}

impl FormView<'_> {
    fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::with_capacity(self.form.fields.len() + 4);
        for (idx, field) in self.form.fields.iter().enumerate() {
            let focused = self.focused_field == Some(idx);
            let marker = if focused { '>' } else { ' ' };
            let required = if field.required { "*" } else { "" };
            let cursor = if focused && self.editing { "_" } else { "" };
            let label_style = if focused {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Gray)
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{marker} {}{required}: ", field.label), label_style),
                Span::styled(
                    format!("{}{cursor}", field.display_value()),
                    Style::default().fg(Color::White),
                ),
            ]));
        }

        if let Some(notice) = self.notice {
            lines.push(Line::from(Span::styled(
                notice.to_string(),
                Style::default().fg(Color::Red),
            )));
        }

        let result = output_text(self.result);
        if !result.lines.is_empty() {
            lines.push(Line::from(""));
            lines.extend(result.lines);
        }
        lines
    }
}

impl Widget for FormView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border = if self.focused_field.is_some() { Color::Yellow } else { Color::DarkGray };
        let title_style = if self.editing && self.focused_field.is_some() {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border))
            .title(Span::styled(format!(" {} ", self.form.id.title()), title_style));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        Paragraph::new(self.lines())
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
