use crate::state::network::LoadingState;
use cornhole_api::{EventPin, JoinTeam, NewTeam, Payload, Schedule, ScoreSubmission};
use crossterm::event::KeyEvent;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum NetworkRequest {
    CheckHealth,
    RegisterTeam(NewTeam),
    JoinTeam(JoinTeam),
    LoadBracket,
    LoadSchedule,
    LoadNowNext,
    LoadRules,
    SubmitScore {
        match_id: String,
        submission: ScoreSubmission,
        pin: EventPin,
    },
}

impl NetworkRequest {
    pub fn kind(&self) -> RequestKind {
        match self {
            NetworkRequest::CheckHealth => RequestKind::Health,
            NetworkRequest::RegisterTeam(_) => RequestKind::RegisterTeam,
            NetworkRequest::JoinTeam(_) => RequestKind::JoinTeam,
            NetworkRequest::LoadBracket => RequestKind::Bracket,
            NetworkRequest::LoadSchedule => RequestKind::Schedule,
            NetworkRequest::LoadNowNext => RequestKind::NowNext,
            NetworkRequest::LoadRules => RequestKind::Rules,
            NetworkRequest::SubmitScore { .. } => RequestKind::SubmitScore,
        }
    }
}

/// Which call a response belongs to, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Health,
    RegisterTeam,
    JoinTeam,
    Bracket,
    Schedule,
    NowNext,
    Rules,
    SubmitScore,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RequestKind::Health => "health check",
            RequestKind::RegisterTeam => "register team",
            RequestKind::JoinTeam => "join team",
            RequestKind::Bracket => "load bracket",
            RequestKind::Schedule => "load schedule",
            RequestKind::NowNext => "load now/next",
            RequestKind::Rules => "load rules",
            RequestKind::SubmitScore => "submit score",
        })
    }
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    HealthChecked,
    TeamRegistered(Payload),
    TeamJoined(Payload),
    BracketLoaded(Payload),
    ScheduleLoaded(Schedule),
    NowNextLoaded(Payload),
    RulesLoaded(Payload),
    ScoreSubmitted(Payload),
    /// Any failure: network, non-2xx status or an unreadable body.
    Failed { kind: RequestKind },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
