use crate::{EventPin, JoinTeam, NewTeam, Payload, Schedule, ScoreSubmission, TournamentId};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use std::time::Duration;
use url::Url;

pub type ApiResult<T> = Result<T, ApiError>;

/// Header carrying the event PIN on score submissions (`X-Event-PIN`).
pub const EVENT_PIN_HEADER: HeaderName = HeaderName::from_static("x-event-pin");

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("cannot build an endpoint below {0}")]
    BaseUrl(Url),
    #[error("network error for {1}: {0}")]
    Network(#[source] reqwest::Error, Url),
    #[error("request to {url} failed with status {status}")]
    Status { url: Url, status: StatusCode },
    #[error("could not read body from {1}: {0}")]
    Body(#[source] reqwest::Error, Url),
    #[error("unexpected body from {1}: {0}")]
    Decode(#[source] serde_json::Error, Url),
    #[error("invalid value for header {0}")]
    Header(HeaderName),
    #[error("could not encode request body: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Method, headers and body of one request.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    method: Method,
    headers: HeaderMap,
    body: Option<serde_json::Value>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            body: None,
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    /// POST with a JSON body; the content type is set to `application/json`.
    pub fn post_json<T: Serialize>(body: &T) -> ApiResult<Self> {
        let body = serde_json::to_value(body).map_err(ApiError::Encode)?;
        Ok(Self {
            method: Method::POST,
            body: Some(body),
            ..Self::default()
        })
    }

    pub fn header(mut self, name: HeaderName, value: &str) -> ApiResult<Self> {
        let value = HeaderValue::from_str(value).map_err(|_| ApiError::Header(name.clone()))?;
        self.headers.insert(name, value);
        Ok(self)
    }
}

/// Client for the tournament backend. Every event-scoped call takes the
/// tournament id explicitly.
#[derive(Debug, Clone)]
pub struct TournamentApi {
    client: Client,
    base_url: Url,
    timeout: Option<Duration>,
}

impl TournamentApi {
    pub fn new(base_url: Url) -> Self {
        Self {
            client: Client::builder()
                .user_agent(concat!("cornhole-tui/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            base_url,
            timeout: None,
        }
    }

    /// Per-request timeout. Without one a hung request never resolves.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append percent-encoded path segments to the base URL.
    pub fn endpoint<I>(&self, segments: I) -> ApiResult<Url>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|()| ApiError::BaseUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn event_endpoint(&self, tid: &TournamentId, rest: &[&str]) -> ApiResult<Url> {
        self.endpoint(["t", tid.as_str()].into_iter().chain(rest.iter().copied()))
    }

    /// `GET /health`
    pub async fn health(&self) -> ApiResult<Payload> {
        let url = self.endpoint(["health"])?;
        self.fetch(url, RequestOptions::get()).await
    }

    /// `POST /t/{tid}/teams`
    pub async fn register_team(&self, tid: &TournamentId, team: &NewTeam) -> ApiResult<Payload> {
        let url = self.event_endpoint(tid, &["teams"])?;
        self.fetch(url, RequestOptions::post_json(team)?).await
    }

    /// `POST /t/{tid}/teams/join`
    pub async fn join_team(&self, tid: &TournamentId, join: &JoinTeam) -> ApiResult<Payload> {
        let url = self.event_endpoint(tid, &["teams", "join"])?;
        self.fetch(url, RequestOptions::post_json(join)?).await
    }

    /// `GET /t/{tid}/bracket`
    pub async fn fetch_bracket(&self, tid: &TournamentId) -> ApiResult<Payload> {
        let url = self.event_endpoint(tid, &["bracket"])?;
        self.fetch(url, RequestOptions::get()).await
    }

    /// `GET /t/{tid}/schedule`
    pub async fn fetch_schedule(&self, tid: &TournamentId) -> ApiResult<Schedule> {
        let url = self.event_endpoint(tid, &["schedule"])?;
        let payload = self.fetch(url.clone(), RequestOptions::get()).await?;
        Schedule::from_payload(payload).map_err(|e| ApiError::Decode(e, url))
    }

    /// `GET /t/{tid}/nownext`
    pub async fn fetch_now_next(&self, tid: &TournamentId) -> ApiResult<Payload> {
        let url = self.event_endpoint(tid, &["nownext"])?;
        self.fetch(url, RequestOptions::get()).await
    }

    /// `GET /t/{tid}/rules`. Usually a text/html body.
    pub async fn fetch_rules(&self, tid: &TournamentId) -> ApiResult<Payload> {
        let url = self.event_endpoint(tid, &["rules"])?;
        self.fetch(url, RequestOptions::get()).await
    }

    /// `POST /t/{tid}/matches/{match_id}/score` with the PIN header attached.
    pub async fn submit_score(
        &self,
        tid: &TournamentId,
        match_id: &str,
        submission: &ScoreSubmission,
        pin: &EventPin,
    ) -> ApiResult<Payload> {
        let url = self.event_endpoint(tid, &["matches", match_id, "score"])?;
        let options = RequestOptions::post_json(submission)?.header(EVENT_PIN_HEADER, pin.expose())?;
        self.fetch(url, options).await
    }

    /// Issue one request. Non-2xx statuses fail; the body is decoded as JSON
    /// only when the response declares `application/json`.
    pub async fn fetch(&self, url: Url, options: RequestOptions) -> ApiResult<Payload> {
        let mut request = self
            .client
            .request(options.method, url.clone())
            .headers(options.headers);
        if let Some(body) = &options.body {
            request = request.json(body);
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.clone()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status { url, status });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Body(e, url.clone()))?;

        Payload::decode(&content_type, body).map_err(|e| ApiError::Decode(e, url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Score;
    use mockito::Matcher;
    use serde_json::json;

    fn api_for(server: &mockito::ServerGuard) -> TournamentApi {
        TournamentApi::new(Url::parse(&server.url()).unwrap())
    }

    fn tid() -> TournamentId {
        TournamentId::new("t1")
    }

    #[test]
    fn endpoints_percent_encode_segments() {
        let api = TournamentApi::new(Url::parse("http://localhost:8000/?tid=x#top").unwrap());
        let url = api
            .event_endpoint(&TournamentId::new("spring 26"), &["matches", "A/1", "score"])
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/t/spring%2026/matches/A%2F1/score");
    }

    #[test]
    fn endpoints_keep_a_mount_prefix() {
        let api = TournamentApi::new(Url::parse("http://localhost:8000/api/").unwrap());
        let url = api.endpoint(["health"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/health");
    }

    #[test]
    fn invalid_pin_header_is_rejected() {
        let options = RequestOptions::get().header(EVENT_PIN_HEADER, "12\n34");
        assert!(matches!(options, Err(ApiError::Header(_))));
    }

    #[tokio::test]
    async fn register_team_posts_two_players() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/t/t1/teams")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "team_name": "Bag Bandits",
                "players": [{"name": "A"}, {"name": "B"}],
                "captain_contact": ""
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":{"teamId":"team-1","team_code":"XK4Q"}}"#)
            .expect(1)
            .create_async()
            .await;

        let team = NewTeam::new("Bag Bandits", "A", "B", "");
        let payload = api_for(&server).register_team(&tid(), &team).await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            payload,
            Payload::Json(json!({"data": {"teamId": "team-1", "team_code": "XK4Q"}}))
        );
    }

    #[tokio::test]
    async fn join_team_posts_code_and_player() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/t/t1/teams/join")
            .match_body(Matcher::Json(json!({"team_code": "XK4Q", "player": "C"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":{"joined":true}}"#)
            .create_async()
            .await;

        let join = JoinTeam { team_code: "XK4Q".into(), player: "C".into() };
        let payload = api_for(&server).join_team(&tid(), &join).await.unwrap();

        mock.assert_async().await;
        assert_eq!(payload.to_compact_string(), r#"{"data":{"joined":true}}"#);
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/t/t1/bracket")
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{"detail":"boom"}"#)
            .create_async()
            .await;

        let err = api_for(&server).fetch_bracket(&tid()).await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status, .. } if status == StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[tokio::test]
    async fn client_errors_are_errors_too() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/t/t1/teams/join")
            .with_status(404)
            .create_async()
            .await;

        let join = JoinTeam { team_code: "NOPE".into(), player: "C".into() };
        let err = api_for(&server).join_team(&tid(), &join).await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status, .. } if status == StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn rules_come_back_as_text() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/t/t1/rules")
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body("<h2>Rules</h2><p>First to <b>21</b>.</p>")
            .create_async()
            .await;

        let payload = api_for(&server).fetch_rules(&tid()).await.unwrap();
        assert_eq!(payload, Payload::Text("<h2>Rules</h2><p>First to <b>21</b>.</p>".into()));
    }

    #[tokio::test]
    async fn malformed_json_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/t/t1/nownext")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{not json")
            .create_async()
            .await;

        let err = api_for(&server).fetch_now_next(&tid()).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(..)));
    }

    #[tokio::test]
    async fn schedule_is_decoded() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/t/t1/schedule")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"matches":[{"matchId":"M1","court":"1","start_slot":"09:00"}]}"#)
            .create_async()
            .await;

        let schedule = api_for(&server).fetch_schedule(&tid()).await.unwrap();
        assert_eq!(schedule.matches.len(), 1);
        assert_eq!(schedule.matches[0].match_id, "M1");
        assert_eq!(schedule.matches[0].court, "1");
        assert_eq!(schedule.matches[0].start_slot, "09:00");
    }

    #[tokio::test]
    async fn submit_score_sends_pin_header() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/t/t1/matches/m1/score")
            .match_header("x-event-pin", "4321")
            .match_body(Matcher::Json(json!({"score": {"a": 21, "b": 15}})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":{"winner_team_id":"team-1"}}"#)
            .expect(1)
            .create_async()
            .await;

        let submission = ScoreSubmission { score: Score { a: 21, b: 15 } };
        let payload = api_for(&server)
            .submit_score(&tid(), "m1", &submission, &EventPin::new("4321"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(payload, Payload::Json(json!({"data": {"winner_team_id": "team-1"}})));
    }

    #[tokio::test]
    async fn health_hits_root_endpoint() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/health")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":"ok"}"#)
            .create_async()
            .await;

        let payload = api_for(&server).health().await.unwrap();
        mock.assert_async().await;
        assert_eq!(payload, Payload::Json(json!({"status": "ok"})));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_network_error() {
        let api = TournamentApi::new(Url::parse("http://127.0.0.1:9/").unwrap())
            .with_timeout(Some(Duration::from_secs(2)));
        let err = api.fetch_bracket(&tid()).await.unwrap_err();
        assert!(matches!(err, ApiError::Network(..)));
    }
}
