use crate::app::{App, View};
use crate::handlers::{Control, Handlers};
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::error;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

const PAGE_LINES: u16 = 10;

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    handlers: &Handlers,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;
    let requests = if guard.state.forms.editing {
        editing_keys(key_event, &mut guard, handlers)
    } else {
        normal_keys(key_event, &mut guard, handlers)
    };
    drop(guard);

    for request in requests {
        if let Err(e) = network_requests.send(request).await {
            error!("Failed to queue request: {e}");
        }
    }
}

/// Keys while typing into a form field.
fn editing_keys(key_event: KeyEvent, app: &mut App, handlers: &Handlers) -> Vec<NetworkRequest> {
    let view = app.state.active_view;
    let forms = &mut app.state.forms;
    match (key_event.code, key_event.modifiers) {
        (Char('c'), KeyModifiers::CONTROL) => app.state.should_quit = true,
        (KeyCode::Esc, _) => forms.editing = false,
        (KeyCode::Enter, _) => {
            if let Some(focus) = forms.focus {
                return handlers.dispatch(Control::Submit(focus.form), app);
            }
        }
        (KeyCode::Tab | KeyCode::Down, _) => forms.move_focus(view, true),
        (KeyCode::BackTab | KeyCode::Up, _) => forms.move_focus(view, false),
        (KeyCode::Backspace, _) => forms.backspace(),
        (Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => forms.type_char(c),
        _ => {}
    }
    Vec::new()
}

fn normal_keys(key_event: KeyEvent, app: &mut App, handlers: &Handlers) -> Vec<NetworkRequest> {
    let view = app.state.active_view;
    let has_forms = view.is_some_and(|v| !v.forms().is_empty());

    match (key_event.code, key_event.modifiers) {
        (Char('q'), _) | (Char('c'), KeyModifiers::CONTROL) => app.state.should_quit = true,
        (KeyCode::Esc, _) if app.state.show_help => app.toggle_help(),

        // Navigation buttons
        (Char(c @ '1'..='5'), _) => {
            let idx = c as usize - '1' as usize;
            return handlers.dispatch(Control::Nav(View::ALL[idx]), app);
        }
        (Char('r'), _) => {
            if let Some(view) = view {
                return handlers.dispatch(Control::Nav(view), app);
            }
        }

        // Form focus
        (Char('j') | KeyCode::Tab | KeyCode::Down, _) if has_forms => {
            app.state.forms.move_focus(view, true)
        }
        (Char('k') | KeyCode::BackTab | KeyCode::Up, _) if has_forms => {
            app.state.forms.move_focus(view, false)
        }
        (KeyCode::Enter | Char('i'), _) if has_forms => {
            if app.state.forms.focus.is_none() {
                app.state.forms.move_focus(view, true);
            }
            app.state.forms.editing = true;
        }

        // Scrolling
        (Char('j') | KeyCode::Down, _) => app.scroll_down(1),
        (Char('k') | KeyCode::Up, _) => app.scroll_up(1),
        (KeyCode::PageDown, _) => app.scroll_down(PAGE_LINES),
        (KeyCode::PageUp, _) => app.scroll_up(PAGE_LINES),

        // Global
        (Char('f'), _) => app.toggle_full_screen(),
        (Char('"'), _) => app.toggle_show_logs(),
        (Char('?'), _) => app.toggle_help(),

        _ => {}
    }
    Vec::new()
}
