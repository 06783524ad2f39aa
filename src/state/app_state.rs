use crate::app::View;
use crate::state::forms::FormsState;
use crate::state::page::Page;

#[derive(Debug, Default)]
pub struct AppState {
    /// `None` only after routing to an unknown view name.
    pub active_view: Option<View>,
    pub show_help: bool,
    pub show_logs: bool,
    pub should_quit: bool,
    pub scroll_offset: u16,
    /// Result of the startup health check; `None` until it answers.
    pub backend_online: Option<bool>,
    pub page: Page,
    pub forms: FormsState,
}
