//! One handler per control. A handler updates the page synchronously
//! (placeholders, validation notices) and returns the network calls to make.

use crate::app::{App, View};
use crate::state::forms::{FieldFocus, Form, FormId};
use crate::state::messages::NetworkRequest;
use crate::state::page::{ElementId, LOADING_TEXT, TableContent};
use cornhole_api::{EventPin, JoinTeam, NewTeam, Score, ScoreSubmission};
use log::debug;
use std::collections::HashMap;

/// Something the user can activate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    /// Navigation button for one view.
    Nav(View),
    Submit(FormId),
}

pub type Handler = Box<dyn Fn(&mut App) -> Vec<NetworkRequest> + Send + Sync>;

pub struct Handlers {
    handlers: HashMap<Control, Handler>,
}

impl Handlers {
    pub fn empty() -> Self {
        Self { handlers: HashMap::new() }
    }

    /// Attach a handler to a control, replacing any previous one.
    pub fn register<F>(&mut self, control: Control, handler: F)
    where
        F: Fn(&mut App) -> Vec<NetworkRequest> + Send + Sync + 'static,
    {
        self.handlers.insert(control, Box::new(handler));
    }

    /// Run the control's handler. Controls without one do nothing.
    pub fn dispatch(&self, control: Control, app: &mut App) -> Vec<NetworkRequest> {
        match self.handlers.get(&control) {
            Some(handler) => handler(app),
            None => {
                debug!("no handler registered for {control:?}");
                Vec::new()
            }
        }
    }
}

impl Default for Handlers {
    fn default() -> Self {
        let mut handlers = Self::empty();
        for view in View::ALL {
            handlers.register(Control::Nav(view), move |app| navigate(app, view.name()));
        }
        handlers.register(Control::Submit(FormId::CreateTeam), submit_create_team);
        handlers.register(Control::Submit(FormId::JoinTeam), submit_join_team);
        handlers.register(Control::Submit(FormId::Score), submit_score);
        handlers
    }
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

/// Show the named view and run its loader, if it has one.
pub fn navigate(app: &mut App, name: &str) -> Vec<NetworkRequest> {
    app.show_view(name);
    match app.state.active_view {
        Some(View::Bracket) => load_bracket(app),
        Some(View::Schedule) => load_schedule(app),
        Some(View::NowNext) => load_now_next(app),
        Some(View::Rules) => load_rules(app),
        Some(View::Register) | None => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// View loaders
// ---------------------------------------------------------------------------

pub fn load_bracket(app: &mut App) -> Vec<NetworkRequest> {
    app.state.page.set_text(ElementId::BracketContainer, LOADING_TEXT);
    vec![NetworkRequest::LoadBracket]
}

pub fn load_schedule(app: &mut App) -> Vec<NetworkRequest> {
    app.state
        .page
        .set_table(ElementId::ScheduleTable, TableContent::placeholder(LOADING_TEXT));
    vec![NetworkRequest::LoadSchedule]
}

pub fn load_now_next(app: &mut App) -> Vec<NetworkRequest> {
    app.state.page.set_text(ElementId::NowNextContainer, LOADING_TEXT);
    vec![NetworkRequest::LoadNowNext]
}

pub fn load_rules(app: &mut App) -> Vec<NetworkRequest> {
    app.state.page.set_text(ElementId::RulesContainer, LOADING_TEXT);
    vec![NetworkRequest::LoadRules]
}

// ---------------------------------------------------------------------------
// Form handlers
// ---------------------------------------------------------------------------

/// Run native constraint checks; on failure focus the field and note why.
fn validated(app: &mut App, id: FormId) -> Option<&Form> {
    let forms = &mut app.state.forms;
    match forms.form(id).check_validity() {
        Ok(()) => {
            forms.notice = None;
            Some(forms.form(id))
        }
        Err(invalid) => {
            forms.focus = Some(FieldFocus { form: id, field: invalid.field });
            forms.notice = Some((id, invalid.message));
            None
        }
    }
}

pub fn submit_create_team(app: &mut App) -> Vec<NetworkRequest> {
    let Some(form) = validated(app, FormId::CreateTeam) else {
        return Vec::new();
    };
    let team = NewTeam::new(
        form.value("team_name"),
        form.value("player1"),
        form.value("player2"),
        form.value("contact"),
    );
    vec![NetworkRequest::RegisterTeam(team)]
}

pub fn submit_join_team(app: &mut App) -> Vec<NetworkRequest> {
    let Some(form) = validated(app, FormId::JoinTeam) else {
        return Vec::new();
    };
    let join = JoinTeam {
        team_code: form.value("team_code").to_string(),
        player: form.value("player").to_string(),
    };
    vec![NetworkRequest::JoinTeam(join)]
}

pub fn submit_score(app: &mut App) -> Vec<NetworkRequest> {
    let Some(form) = validated(app, FormId::Score) else {
        return Vec::new();
    };
    let (Some(a), Some(b)) = (form.integer("scoreA"), form.integer("scoreB")) else {
        return Vec::new();
    };
    vec![NetworkRequest::SubmitScore {
        match_id: form.value("matchId").to_string(),
        submission: ScoreSubmission { score: Score { a, b } },
        pin: EventPin::new(form.value("pin")),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::app_settings::AppSettings;
    use crate::state::forms::MISSING_VALUE;
    use crate::state::page::Content;

    fn app() -> App {
        App::new(AppSettings::default())
    }

    #[test]
    fn nav_shows_view_and_triggers_its_loader() {
        let handlers = Handlers::default();
        let mut app = app();

        let requests = handlers.dispatch(Control::Nav(View::Schedule), &mut app);
        assert_eq!(requests, vec![NetworkRequest::LoadSchedule]);
        assert!(app.is_visible(View::Schedule));
        assert_eq!(
            app.state.page.table(ElementId::ScheduleTable),
            Some(&TableContent::placeholder(LOADING_TEXT))
        );

        let requests = handlers.dispatch(Control::Nav(View::Register), &mut app);
        assert!(requests.is_empty());
        assert!(app.is_visible(View::Register));
    }

    #[test]
    fn each_loader_issues_one_request() {
        let handlers = Handlers::default();
        let mut app = app();
        for (view, request, element) in [
            (View::Bracket, NetworkRequest::LoadBracket, ElementId::BracketContainer),
            (View::NowNext, NetworkRequest::LoadNowNext, ElementId::NowNextContainer),
            (View::Rules, NetworkRequest::LoadRules, ElementId::RulesContainer),
        ] {
            assert_eq!(handlers.dispatch(Control::Nav(view), &mut app), vec![request]);
            assert_eq!(app.state.page.text(element), Some(LOADING_TEXT));
        }
    }

    #[test]
    fn reloading_replaces_previous_content() {
        let handlers = Handlers::default();
        let mut app = app();
        app.state.page.set_text(ElementId::NowNextContainer, "{\"now\": []}");
        handlers.dispatch(Control::Nav(View::NowNext), &mut app);
        assert_eq!(
            app.state.page.get(ElementId::NowNextContainer),
            Some(&Content::Text(LOADING_TEXT.into()))
        );
    }

    #[test]
    fn register_submit_always_sends_two_players() {
        let handlers = Handlers::default();
        let mut app = app();
        let form = &mut app.state.forms.create_team;
        form.set_value("team_name", "<Bag> & Bandits");
        form.set_value("player1", "A");
        form.set_value("player2", "A");

        let requests = handlers.dispatch(Control::Submit(FormId::CreateTeam), &mut app);
        assert_eq!(
            requests,
            vec![NetworkRequest::RegisterTeam(NewTeam::new("<Bag> & Bandits", "A", "A", ""))]
        );
        match &requests[0] {
            NetworkRequest::RegisterTeam(team) => assert_eq!(team.players.len(), 2),
            other => panic!("unexpected request {other:?}"),
        }
        // cleared only once the server answers
        assert_eq!(app.state.forms.create_team.value("team_name"), "<Bag> & Bandits");
    }

    #[test]
    fn missing_required_field_blocks_submit() {
        let handlers = Handlers::default();
        let mut app = app();
        app.state.forms.join_team.set_value("team_code", "XK4Q");

        let requests = handlers.dispatch(Control::Submit(FormId::JoinTeam), &mut app);
        assert!(requests.is_empty());
        assert_eq!(app.state.forms.notice, Some((FormId::JoinTeam, MISSING_VALUE)));
        assert_eq!(app.state.forms.focus, Some(FieldFocus { form: FormId::JoinTeam, field: 1 }));
    }

    #[test]
    fn join_submit_sends_code_and_player() {
        let handlers = Handlers::default();
        let mut app = app();
        app.state.forms.join_team.set_value("team_code", "XK4Q");
        app.state.forms.join_team.set_value("player", "C");

        let requests = handlers.dispatch(Control::Submit(FormId::JoinTeam), &mut app);
        assert_eq!(
            requests,
            vec![NetworkRequest::JoinTeam(JoinTeam { team_code: "XK4Q".into(), player: "C".into() })]
        );
        assert_eq!(app.state.forms.notice, None);
    }

    #[test]
    fn score_submit_carries_match_scores_and_pin() {
        let handlers = Handlers::default();
        let mut app = app();
        let form = &mut app.state.forms.score;
        form.set_value("matchId", "m1");
        form.set_value("scoreA", "21");
        form.set_value("scoreB", "15");
        form.set_value("pin", "4321");

        let requests = handlers.dispatch(Control::Submit(FormId::Score), &mut app);
        assert_eq!(
            requests,
            vec![NetworkRequest::SubmitScore {
                match_id: "m1".into(),
                submission: ScoreSubmission { score: Score { a: 21, b: 15 } },
                pin: EventPin::new("4321"),
            }]
        );
    }

    #[test]
    fn unregistered_control_is_a_no_op() {
        let handlers = Handlers::empty();
        let mut app = app();
        assert!(handlers.dispatch(Control::Nav(View::Bracket), &mut app).is_empty());
        assert!(app.is_visible(View::Register));
    }

    #[test]
    fn handlers_can_be_replaced() {
        let mut handlers = Handlers::default();
        handlers.register(Control::Nav(View::Rules), |app| navigate(app, "rules-v2"));
        let mut app = app();
        assert!(handlers.dispatch(Control::Nav(View::Rules), &mut app).is_empty());
        assert_eq!(app.state.active_view, None);
    }
}
