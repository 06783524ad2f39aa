use crate::config::EventConfig;
use crate::state::messages::{NetworkRequest, NetworkResponse};
use cornhole_api::TournamentId;
use cornhole_api::client::{ApiResult, TournamentApi};
use log::{debug, error};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

/// Runs every request as its own task so no call waits on another.
pub struct NetworkWorker {
    api: TournamentApi,
    tid: TournamentId,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    in_flight: Arc<AtomicUsize>,
    finished: Arc<AtomicUsize>,
    last_failed: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        config: &EventConfig,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            api: TournamentApi::new(config.base_url.clone()).with_timeout(config.timeout),
            tid: config.tid.clone(),
            requests,
            responses,
            in_flight: Arc::new(AtomicUsize::new(0)),
            finished: Arc::new(AtomicUsize::new(0)),
            last_failed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        let spinner = tokio::spawn(animate_spinner(
            self.responses.clone(),
            self.in_flight.clone(),
            self.finished.clone(),
            self.last_failed.clone(),
        ));

        while let Some(request) = self.requests.recv().await {
            self.in_flight.fetch_add(1, Ordering::SeqCst);

            let api = self.api.clone();
            let tid = self.tid.clone();
            let responses = self.responses.clone();
            let in_flight = self.in_flight.clone();
            let finished = self.finished.clone();
            let last_failed = self.last_failed.clone();

            tokio::spawn(async move {
                let kind = request.kind();
                debug!("{kind}: request started");

                let response = match execute(&api, &tid, request).await {
                    Ok(response) => {
                        debug!("{kind}: request complete");
                        last_failed.store(false, Ordering::SeqCst);
                        response
                    }
                    Err(err) => {
                        error!("{kind}: {err}");
                        last_failed.store(true, Ordering::SeqCst);
                        NetworkResponse::Failed { kind }
                    }
                };

                if let Err(e) = responses.send(response).await {
                    error!("Failed to send network response: {e}");
                }

                finished.fetch_add(1, Ordering::SeqCst);
                in_flight.fetch_sub(1, Ordering::SeqCst);
            });
        }

        spinner.abort();
    }
}

/// Sole sender of `LoadingStateChanged`. Spins while anything is in flight;
/// once idle, reports the outcome of the last finished request once.
async fn animate_spinner(
    responses: mpsc::Sender<NetworkResponse>,
    in_flight: Arc<AtomicUsize>,
    finished: Arc<AtomicUsize>,
    last_failed: Arc<AtomicBool>,
) {
    let mut interval = tokio::time::interval(Duration::from_millis(33));
    let mut spinner_index = 0;
    let mut seen_finished = 0;

    loop {
        interval.tick().await;

        let loading_state = if in_flight.load(Ordering::SeqCst) > 0 {
            let spinner_char = SPINNER_CHARS[spinner_index];
            spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
            LoadingState { is_loading: true, spinner_char }
        } else {
            let finished_now = finished.load(Ordering::SeqCst);
            if finished_now == seen_finished {
                continue;
            }
            seen_finished = finished_now;
            spinner_index = 0;
            let spinner_char = if last_failed.load(Ordering::SeqCst) { ERROR_CHAR } else { ' ' };
            LoadingState { is_loading: false, spinner_char }
        };

        if responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await
            .is_err()
        {
            break;
        }
    }
}

/// Perform one call against the backend for the session's tournament.
async fn execute(
    api: &TournamentApi,
    tid: &TournamentId,
    request: NetworkRequest,
) -> ApiResult<NetworkResponse> {
    Ok(match request {
        NetworkRequest::CheckHealth => {
            api.health().await?;
            NetworkResponse::HealthChecked
        }
        NetworkRequest::RegisterTeam(team) => {
            NetworkResponse::TeamRegistered(api.register_team(tid, &team).await?)
        }
        NetworkRequest::JoinTeam(join) => NetworkResponse::TeamJoined(api.join_team(tid, &join).await?),
        NetworkRequest::LoadBracket => NetworkResponse::BracketLoaded(api.fetch_bracket(tid).await?),
        NetworkRequest::LoadSchedule => NetworkResponse::ScheduleLoaded(api.fetch_schedule(tid).await?),
        NetworkRequest::LoadNowNext => NetworkResponse::NowNextLoaded(api.fetch_now_next(tid).await?),
        NetworkRequest::LoadRules => NetworkResponse::RulesLoaded(api.fetch_rules(tid).await?),
        NetworkRequest::SubmitScore { match_id, submission, pin } => NetworkResponse::ScoreSubmitted(
            api.submit_score(tid, &match_id, &submission, &pin).await?,
        ),
    })
}
