pub mod client;

use serde::de::{Error as _, Unexpected};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use url::Url;

// ---------------------------------------------------------------------------
// Event identity
// ---------------------------------------------------------------------------

/// Tournament used when the event URL carries no (or an empty) `tid`.
pub const DEFAULT_TOURNAMENT_ID: &str = "demo";

/// Opaque identifier scoping every API call to one event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TournamentId(String);

impl TournamentId {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        if id.is_empty() {
            Self::default()
        } else {
            Self(id)
        }
    }

    /// Read the first `tid` query parameter of an event page URL.
    pub fn from_event_url(url: &Url) -> Self {
        url.query_pairs()
            .find(|(key, _)| key == "tid")
            .map(|(_, value)| Self::new(value.into_owned()))
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TournamentId {
    fn default() -> Self {
        Self(DEFAULT_TOURNAMENT_ID.to_string())
    }
}

impl fmt::Display for TournamentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shared event secret authorizing score submission. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct EventPin(String);

impl EventPin {
    pub fn new(pin: impl Into<String>) -> Self {
        Self(pin.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for EventPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EventPin(****)")
    }
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerEntry {
    pub name: String,
}

/// Body of `POST /t/{tid}/teams`. Always carries exactly two players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTeam {
    pub team_name: String,
    pub players: [PlayerEntry; 2],
    pub captain_contact: String,
}

impl NewTeam {
    pub fn new(
        team_name: impl Into<String>,
        player1: impl Into<String>,
        player2: impl Into<String>,
        captain_contact: impl Into<String>,
    ) -> Self {
        Self {
            team_name: team_name.into(),
            players: [
                PlayerEntry { name: player1.into() },
                PlayerEntry { name: player2.into() },
            ],
            captain_contact: captain_contact.into(),
        }
    }
}

/// Body of `POST /t/{tid}/teams/join`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinTeam {
    pub team_code: String,
    pub player: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub a: i64,
    pub b: i64,
}

/// Body of `POST /t/{tid}/matches/{matchId}/score`; the match id travels in
/// the path and the PIN in a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub score: Score,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Response body, tagged by the content type the server declared.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    pub fn is_json_content_type(content_type: &str) -> bool {
        content_type.contains("application/json")
    }

    /// Decode a body: JSON when the content type says so, raw text otherwise.
    pub fn decode(content_type: &str, body: String) -> Result<Self, serde_json::Error> {
        if Self::is_json_content_type(content_type) {
            serde_json::from_str(&body).map(Payload::Json)
        } else {
            Ok(Payload::Text(body))
        }
    }

    /// Single-line JSON rendering. Text bodies come out as a JSON string.
    pub fn to_compact_string(&self) -> String {
        match self {
            Payload::Json(value) => value.to_string(),
            Payload::Text(text) => Value::String(text.clone()).to_string(),
        }
    }

    /// JSON rendering with two-space indentation.
    pub fn to_pretty_string(&self) -> String {
        let pretty = |value: &Value| {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        };
        match self {
            Payload::Json(value) => pretty(value),
            Payload::Text(text) => pretty(&Value::String(text.clone())),
        }
    }

    /// Body as markup source for the rules view.
    pub fn into_markup(self) -> String {
        match self {
            Payload::Text(text) | Payload::Json(Value::String(text)) => text,
            Payload::Json(value) => value.to_string(),
        }
    }
}

/// `GET /t/{tid}/schedule` body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Schedule {
    #[serde(default)]
    pub matches: Vec<ScheduledMatch>,
}

impl Schedule {
    /// Text bodies, non-objects and a `matches` value that is falsy or has
    /// no length (`null`, `false`, `0`, `""`, numbers, objects) are an empty
    /// schedule. A non-empty string has a length but no rows, so it is an
    /// error, as is an array of the wrong shape.
    pub fn from_payload(payload: Payload) -> Result<Self, serde_json::Error> {
        match payload {
            Payload::Json(Value::Object(mut body)) => match body.remove("matches") {
                Some(matches @ Value::Array(_)) => Ok(Self {
                    matches: serde_json::from_value(matches)?,
                }),
                Some(Value::String(text)) if !text.is_empty() => Err(serde_json::Error::invalid_type(
                    Unexpected::Str(&text),
                    &"a sequence of matches",
                )),
                _ => Ok(Self::default()),
            },
            _ => Ok(Self::default()),
        }
    }
}

/// One schedule row. Backends send ids, courts and slots as strings or
/// numbers, so every field is kept as display text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ScheduledMatch {
    #[serde(rename = "matchId", default, deserialize_with = "id_text")]
    pub match_id: String,
    #[serde(default, deserialize_with = "optional_text")]
    pub court: String,
    #[serde(default, deserialize_with = "optional_text")]
    pub start_slot: String,
}

fn id_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text,
        Some(other) => other.to_string(),
    })
}

/// Falsy values (`null`, `false`, `0`, `""`) display as an empty cell.
fn optional_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) | Some(Value::Bool(false)) => String::new(),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => String::new(),
        Some(Value::String(text)) => text,
        Some(other) => other.to_string(),
    })
}
