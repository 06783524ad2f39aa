use crate::components::markup::markup_to_text;
use crate::state::page::{Content, TableContent};
use tui::layout::Constraint;
use tui::style::{Modifier, Style};
use tui::text::Text;
use tui::widgets::{Cell, Row, Table};

/// Text for an output element. Only `Content::Markup` is interpreted.
pub fn output_text(content: Option<&Content>) -> Text<'static> {
    match content {
        None => Text::default(),
        Some(Content::Text(text)) => Text::raw(text.clone()),
        Some(Content::Markup(html)) => markup_to_text(html),
        Some(Content::Table(table)) => Text::raw(
            table
                .all_rows()
                .map(|row| row.join("  "))
                .collect::<Vec<_>>()
                .join("\n"),
        ),
    }
}

pub fn schedule_table(table: &TableContent) -> Table<'static> {
    let to_row = |cells: &Vec<String>| Row::new(cells.iter().cloned().map(Cell::from));
    let rows: Vec<Row<'static>> = table.rows.iter().map(to_row).collect();

    match &table.header {
        Some(header) => Table::new(
            rows,
            [
                Constraint::Percentage(40),
                Constraint::Percentage(30),
                Constraint::Percentage(30),
            ],
        )
        .header(
            to_row(header)
                .style(Style::default().add_modifier(Modifier::BOLD))
                .bottom_margin(1),
        ),
        None => Table::new(rows, [Constraint::Fill(1)]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_content_is_never_interpreted() {
        let content = Content::Text("<b>x</b>".into());
        let text = output_text(Some(&content));
        assert_eq!(text.lines.len(), 1);
        let span = &text.lines[0].spans[0];
        assert_eq!(span.content.as_ref(), "<b>x</b>");
        assert!(span.style.add_modifier.is_empty());
    }

    #[test]
    fn markup_content_is_rendered() {
        let content = Content::Markup("<b>x</b>".into());
        let text = output_text(Some(&content));
        assert_eq!(text.lines[0].spans[0].content.as_ref(), "x");
        assert!(text.lines[0].spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn pretty_json_keeps_its_lines() {
        let content = Content::Text("{\n  \"round\": 1\n}".into());
        assert_eq!(output_text(Some(&content)).lines.len(), 3);
    }

    #[test]
    fn missing_content_is_blank() {
        assert!(output_text(None).lines.is_empty());
    }
}
