use crate::handlers;
use crate::state::app_settings::AppSettings;
use crate::state::app_state::AppState;
use crate::state::forms::FormId;
use crate::state::messages::{NetworkRequest, NetworkResponse, RequestKind};
use crate::state::page::{ElementId, TableContent};
use std::str::FromStr;

/// The five page sections. At most one is visible at a time.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum View {
    Register,
    Bracket,
    Schedule,
    NowNext,
    Rules,
}

impl View {
    pub const ALL: [View; 5] = [View::Register, View::Bracket, View::Schedule, View::NowNext, View::Rules];

    pub fn name(&self) -> &'static str {
        match self {
            View::Register => "register",
            View::Bracket => "bracket",
            View::Schedule => "schedule",
            View::NowNext => "nownext",
            View::Rules => "rules",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            View::Register => "Register",
            View::Bracket => "Bracket",
            View::Schedule => "Schedule",
            View::NowNext => "Now/Next",
            View::Rules => "Rules",
        }
    }

    /// Forms laid out inside this view, in focus order.
    pub fn forms(&self) -> &'static [FormId] {
        match self {
            View::Register => &[FormId::CreateTeam, FormId::JoinTeam],
            View::Bracket => &[FormId::Score],
            View::Schedule | View::NowNext | View::Rules => &[],
        }
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        View::ALL
            .into_iter()
            .find(|v| v.name() == name)
            .ok_or_else(|| format!("unknown view `{name}`"))
    }
}

/// Fixed text shown when a request fails, and where it goes.
pub fn failure_text(kind: RequestKind) -> Option<(ElementId, &'static str)> {
    match kind {
        RequestKind::Health => None,
        RequestKind::RegisterTeam => Some((ElementId::RegisterResult, "Error creating team")),
        RequestKind::JoinTeam => Some((ElementId::JoinResult, "Error joining team")),
        RequestKind::Bracket => Some((ElementId::BracketContainer, "Failed to load bracket")),
        RequestKind::Schedule => Some((ElementId::ScheduleTable, "Failed to load schedule")),
        RequestKind::NowNext => Some((ElementId::NowNextContainer, "Failed to load now/next")),
        RequestKind::Rules => Some((ElementId::RulesContainer, "Failed to load rules")),
        RequestKind::SubmitScore => Some((ElementId::ScoreResult, "Error submitting score")),
    }
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        let mut app = Self {
            state: AppState::default(),
            settings,
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app.show_view(View::Register.name());
        app
    }

    // -----------------------------------------------------------------------
    // View router
    // -----------------------------------------------------------------------

    /// Make the named view the only visible one. Unknown names hide all views.
    pub fn show_view(&mut self, name: &str) {
        self.state.active_view = name.parse().ok();
        self.state.scroll_offset = 0;
        self.state.forms.focus_view(self.state.active_view);
    }

    pub fn is_visible(&self, view: View) -> bool {
        self.state.active_view == Some(view)
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    /// Write a response into the page. Returns follow-up requests.
    pub fn on_network_response(&mut self, response: NetworkResponse) -> Vec<NetworkRequest> {
        let page = &mut self.state.page;
        match response {
            NetworkResponse::LoadingStateChanged { .. } => {}
            NetworkResponse::HealthChecked => self.state.backend_online = Some(true),
            NetworkResponse::TeamRegistered(payload) => {
                page.set_text(ElementId::RegisterResult, payload.to_compact_string());
                self.state.forms.create_team.reset();
            }
            NetworkResponse::TeamJoined(payload) => {
                page.set_text(ElementId::JoinResult, payload.to_compact_string());
                self.state.forms.join_team.reset();
            }
            NetworkResponse::BracketLoaded(payload) => {
                page.set_text(ElementId::BracketContainer, payload.to_pretty_string());
            }
            NetworkResponse::ScheduleLoaded(schedule) => {
                page.set_table(ElementId::ScheduleTable, TableContent::from_schedule(&schedule));
            }
            NetworkResponse::NowNextLoaded(payload) => {
                page.set_text(ElementId::NowNextContainer, payload.to_pretty_string());
            }
            NetworkResponse::RulesLoaded(payload) => {
                page.set_markup(ElementId::RulesContainer, payload.into_markup());
            }
            NetworkResponse::ScoreSubmitted(payload) => {
                page.set_text(ElementId::ScoreResult, payload.to_compact_string());
                self.state.forms.score.reset();
                return handlers::load_bracket(self);
            }
            NetworkResponse::Failed { kind } => self.on_failure(kind),
        }
        Vec::new()
    }

    fn on_failure(&mut self, kind: RequestKind) {
        if kind == RequestKind::Health {
            self.state.backend_online = Some(false);
        }
        let Some((element, message)) = failure_text(kind) else {
            return;
        };
        if element == ElementId::ScheduleTable {
            self.state.page.set_table(element, TableContent::placeholder(message));
        } else {
            self.state.page.set_text(element, message);
        }
    }

    // -----------------------------------------------------------------------
    // Display toggles and scrolling
    // -----------------------------------------------------------------------

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    pub fn toggle_help(&mut self) {
        self.state.show_help = !self.state.show_help;
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.state.scroll_offset = self.state.scroll_offset.saturating_add(lines);
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.state.scroll_offset = self.state.scroll_offset.saturating_sub(lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::page::{Content, LOADING_TEXT};
    use cornhole_api::{Payload, Schedule, ScheduledMatch};
    use serde_json::json;

    fn app() -> App {
        App::new(AppSettings::default())
    }

    #[test]
    fn register_is_visible_at_start() {
        let app = app();
        assert_eq!(app.state.active_view, Some(View::Register));
    }

    #[test]
    fn exactly_one_view_visible_after_show_view() {
        let mut app = app();
        for view in View::ALL {
            app.show_view(view.name());
            let visible: Vec<_> = View::ALL.into_iter().filter(|v| app.is_visible(*v)).collect();
            assert_eq!(visible, vec![view]);
        }
    }

    #[test]
    fn unknown_view_hides_everything() {
        let mut app = app();
        app.show_view("scoreboard");
        assert!(View::ALL.iter().all(|v| !app.is_visible(*v)));
        assert_eq!(app.state.forms.focus, None);
    }

    #[test]
    fn every_failure_renders_fixed_text() {
        let mut app = app();
        for (kind, element, message) in [
            (RequestKind::RegisterTeam, ElementId::RegisterResult, "Error creating team"),
            (RequestKind::JoinTeam, ElementId::JoinResult, "Error joining team"),
            (RequestKind::Bracket, ElementId::BracketContainer, "Failed to load bracket"),
            (RequestKind::NowNext, ElementId::NowNextContainer, "Failed to load now/next"),
            (RequestKind::Rules, ElementId::RulesContainer, "Failed to load rules"),
            (RequestKind::SubmitScore, ElementId::ScoreResult, "Error submitting score"),
        ] {
            let follow_ups = app.on_network_response(NetworkResponse::Failed { kind });
            assert!(follow_ups.is_empty());
            assert_eq!(app.state.page.text(element), Some(message));
        }

        app.on_network_response(NetworkResponse::Failed { kind: RequestKind::Schedule });
        assert_eq!(
            app.state.page.table(ElementId::ScheduleTable),
            Some(&TableContent::placeholder("Failed to load schedule"))
        );
    }

    #[test]
    fn failed_submit_keeps_form_values() {
        let mut app = app();
        app.state.forms.join_team.set_value("team_code", "XK4Q");
        app.on_network_response(NetworkResponse::Failed { kind: RequestKind::JoinTeam });
        assert_eq!(app.state.forms.join_team.value("team_code"), "XK4Q");
    }

    #[test]
    fn team_registered_renders_compact_json_and_clears_form() {
        let mut app = app();
        app.state.forms.create_team.set_value("team_name", "Corn Stars");

        app.on_network_response(NetworkResponse::TeamRegistered(Payload::Json(
            json!({"data": {"teamId": "team-2"}}),
        )));

        assert_eq!(
            app.state.page.text(ElementId::RegisterResult),
            Some(r#"{"data":{"teamId":"team-2"}}"#)
        );
        assert_eq!(app.state.forms.create_team.value("team_name"), "");
    }

    #[test]
    fn bracket_renders_pretty_json_as_text() {
        let mut app = app();
        app.on_network_response(NetworkResponse::BracketLoaded(Payload::Json(
            json!({"note": "<b>x</b>"}),
        )));
        assert_eq!(
            app.state.page.get(ElementId::BracketContainer),
            Some(&Content::Text("{\n  \"note\": \"<b>x</b>\"\n}".into()))
        );
    }

    #[test]
    fn rules_are_stored_as_markup() {
        let mut app = app();
        app.on_network_response(NetworkResponse::RulesLoaded(Payload::Text("<b>x</b>".into())));
        assert_eq!(
            app.state.page.get(ElementId::RulesContainer),
            Some(&Content::Markup("<b>x</b>".into()))
        );
    }

    #[test]
    fn schedule_response_builds_table() {
        let mut app = app();
        app.on_network_response(NetworkResponse::ScheduleLoaded(Schedule::default()));
        assert_eq!(
            app.state.page.table(ElementId::ScheduleTable),
            Some(&TableContent::placeholder("No schedule data"))
        );

        app.on_network_response(NetworkResponse::ScheduleLoaded(Schedule {
            matches: vec![ScheduledMatch {
                match_id: "M1".into(),
                court: "1".into(),
                start_slot: "09:00".into(),
            }],
        }));
        let table = app.state.page.table(ElementId::ScheduleTable).unwrap();
        assert_eq!(table.rows, vec![vec!["M1".to_string(), "1".to_string(), "09:00".to_string()]]);
    }

    #[test]
    fn score_success_reloads_bracket_once() {
        let mut app = app();
        app.state.forms.score.set_value("matchId", "m1");

        let follow_ups = app.on_network_response(NetworkResponse::ScoreSubmitted(Payload::Json(
            json!({"data": {"winner_team_id": "team-1"}}),
        )));

        assert_eq!(follow_ups, vec![NetworkRequest::LoadBracket]);
        assert_eq!(app.state.page.text(ElementId::BracketContainer), Some(LOADING_TEXT));
        assert_eq!(
            app.state.page.text(ElementId::ScoreResult),
            Some(r#"{"data":{"winner_team_id":"team-1"}}"#)
        );
        assert_eq!(app.state.forms.score.value("matchId"), "");
    }

    #[test]
    fn health_flips_backend_status() {
        let mut app = app();
        assert_eq!(app.state.backend_online, None);
        app.on_network_response(NetworkResponse::HealthChecked);
        assert_eq!(app.state.backend_online, Some(true));
        app.on_network_response(NetworkResponse::Failed { kind: RequestKind::Health });
        assert_eq!(app.state.backend_online, Some(false));
    }
}
