use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs, Wrap};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, View};
use crate::components::form::FormView;
use crate::components::output::{output_text, schedule_table};
use crate::state::forms::FormId;
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::state::page::ElementId;
use crate::ui::layout::LayoutAreas;

const HELP_LINES: &[(&str, &str)] = &[
    ("1-5", "Register, Bracket, Schedule, Now/Next, Rules"),
    ("r", "reload the current view"),
    ("j/k ↑/↓ Tab", "move between form fields, or scroll"),
    ("Enter / i", "edit the focused field"),
    ("Enter", "submit the form (while editing)"),
    ("Esc", "stop editing"),
    ("PgUp/PgDn", "scroll"),
    ("f", "toggle full screen"),
    ("\"", "toggle log pane"),
    ("?", "toggle this help"),
    ("q", "quit"),
];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &App, loading: LoadingState) -> Result<(), B::Error>
where
    B: Backend,
{
    let current_size = terminal.size()?;
    if current_size.width <= 10 || current_size.height <= 10 {
        return Ok(());
    }

    let mut layout = LayoutAreas::new(current_size);

    terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar[0], app);
            draw_status(f, layout.tab_bar[1], app, loading);
        }

        match app.state.active_view {
            Some(View::Register) => draw_register(f, layout.main, app),
            Some(View::Bracket) => draw_bracket(f, layout.main, app),
            Some(View::Schedule) => draw_schedule(f, layout.main, app),
            Some(View::NowNext) => draw_output(f, layout.main, app, ElementId::NowNextContainer, View::NowNext),
            Some(View::Rules) => draw_output(f, layout.main, app, ElementId::RulesContainer, View::Rules),
            None => draw_placeholder(f, layout.main, "No view selected. Press 1-5."),
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }
        if app.settings.full_screen {
            draw_loading_spinner(f, f.area(), loading);
        }
        if app.state.show_help {
            draw_help(f, f.area());
        }
    })?;
    Ok(())
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

/// Bordered block titled with the view name and, once written, the time the
/// element last changed.
fn element_block<'a>(app: &App, title: &str, element: ElementId) -> Block<'a> {
    let block = default_border(Color::White).title(format!(" {title} "));
    match app.state.page.updated_at(element) {
        Some(at) => block.title(
            Line::from(format!(" updated {} ", at.format("%H:%M:%S")))
                .style(Style::default().fg(Color::DarkGray))
                .right_aligned(),
        ),
        None => block,
    }
}

fn draw_tabs(f: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<Line> = View::ALL
        .iter()
        .enumerate()
        .map(|(idx, view)| Line::from(format!("{} {}", idx + 1, view.label())))
        .collect();
    let selected = View::ALL.iter().position(|view| app.is_visible(*view));

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(BorderType::Rounded),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(selected)
        .style(Style::default().fg(Color::White));
    f.render_widget(tabs, area);
}

fn draw_status(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    let (backend, color) = match app.state.backend_online {
        None => ("checking", Color::DarkGray),
        Some(true) => ("online", Color::Green),
        Some(false) => ("offline", Color::Red),
    };
    let spinner_style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let status = Line::from(vec![
        Span::styled("tid ", Style::default().fg(Color::Gray)),
        Span::raw(app.settings.tid.to_string()),
        Span::raw("  "),
        Span::styled(backend, Style::default().fg(color)),
        Span::raw("  "),
        Span::styled(loading.spinner_char.to_string(), spinner_style),
        Span::styled("  ? help ", Style::default().fg(Color::Gray)),
    ]);

    let paragraph = Paragraph::new(status).alignment(Alignment::Right).block(
        Block::default()
            .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
            .border_type(BorderType::Rounded),
    );
    f.render_widget(paragraph, area);
}

fn form_view<'a>(app: &'a App, id: FormId, result: ElementId) -> FormView<'a> {
    let forms = &app.state.forms;
    FormView {
        form: forms.form(id),
        focused_field: forms.focus.filter(|focus| focus.form == id).map(|focus| focus.field),
        editing: forms.editing,
        notice: forms.notice.filter(|(form, _)| *form == id).map(|(_, message)| message),
        result: app.state.page.get(result),
    }
}

fn draw_register(f: &mut Frame, area: Rect, app: &App) {
    let [create, join] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);
    f.render_widget(form_view(app, FormId::CreateTeam, ElementId::RegisterResult), create);
    f.render_widget(form_view(app, FormId::JoinTeam, ElementId::JoinResult), join);
}

fn draw_bracket(f: &mut Frame, area: Rect, app: &App) {
    let [bracket, score] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(10)]).areas(area);
    draw_output(f, bracket, app, ElementId::BracketContainer, View::Bracket);
    f.render_widget(form_view(app, FormId::Score, ElementId::ScoreResult), score);
}

fn draw_schedule(f: &mut Frame, area: Rect, app: &App) {
    let block = element_block(app, View::Schedule.label(), ElementId::ScheduleTable);
    match app.state.page.table(ElementId::ScheduleTable) {
        Some(table) => f.render_widget(schedule_table(table).block(block), area),
        None => f.render_widget(block, area),
    }
}

fn draw_output(f: &mut Frame, area: Rect, app: &App, element: ElementId, view: View) {
    let paragraph = Paragraph::new(output_text(app.state.page.get(element)))
        .block(element_block(app, view.label(), element))
        .wrap(Wrap { trim: false })
        .scroll((app.state.scroll_offset, 0));
    f.render_widget(paragraph, area);
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str) {
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        inner,
    );
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray));
    f.render_widget(logs, area);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let width = 60.min(area.width);
    let height = (HELP_LINES.len() as u16 + 2).min(area.height);
    let [_, row, _] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(height), Constraint::Fill(1)])
            .areas(area);
    let [_, popup, _] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(width), Constraint::Fill(1)])
            .areas(row);

    let lines: Vec<Line> = HELP_LINES
        .iter()
        .map(|(keys, action)| {
            Line::from(vec![
                Span::styled(format!("{keys:>12}  "), Style::default().fg(Color::Yellow)),
                Span::raw(*action),
            ])
        })
        .collect();

    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines).block(default_border(Color::Yellow).title(" Help ")),
        popup,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string()).style(style);
    let area = Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1);
    f.render_widget(spinner, area);
}
