use clap::Parser;
use cornhole_api::TournamentId;
use log::LevelFilter;
use std::time::Duration;
use url::Url;

pub const DEFAULT_EVENT_URL: &str = "http://127.0.0.1:8000/";

#[derive(Debug, Parser)]
#[command(
    name = "cornhole-tui",
    version,
    about = "Cornhole event-day terminal client",
    after_help = "Keys: 1-5 switch views, j/k move between fields, Enter edits/submits, \
                  Esc stops editing, r reloads, ? help, q quits."
)]
pub struct Cli {
    /// Event page URL. Its origin is the API base and `?tid=` picks the tournament.
    #[arg(env = "CORNHOLE_EVENT_URL", default_value = DEFAULT_EVENT_URL)]
    pub event_url: Url,

    /// Tournament id, overriding the event URL's `tid` parameter.
    #[arg(long, env = "CORNHOLE_TID")]
    pub tid: Option<String>,

    /// Give up on a request after this many seconds. Off by default.
    #[arg(long, env = "CORNHOLE_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Log level shown in the log pane.
    #[arg(long, env = "CORNHOLE_LOG_LEVEL", default_value = "error", value_parser = parse_level)]
    pub log_level: LevelFilter,

    /// Start without the tab bar.
    #[arg(long)]
    pub full_screen: bool,
}

fn parse_level(raw: &str) -> Result<LevelFilter, String> {
    raw.parse()
        .map_err(|_| format!("unknown log level `{raw}` (off, error, warn, info, debug, trace)"))
}

/// Connection settings resolved once at startup and shared read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventConfig {
    pub base_url: Url,
    pub tid: TournamentId,
    pub timeout: Option<Duration>,
}

impl EventConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        let mut config = Self::from_event_url(&cli.event_url);
        if let Some(tid) = &cli.tid {
            config.tid = TournamentId::new(tid.as_str());
        }
        config.timeout = cli.timeout_secs.map(Duration::from_secs);
        config
    }

    /// Same-origin base URL plus the page's `tid`.
    pub fn from_event_url(event_url: &Url) -> Self {
        let mut base_url = event_url.clone();
        base_url.set_path("/");
        base_url.set_query(None);
        base_url.set_fragment(None);
        Self {
            base_url,
            tid: TournamentId::from_event_url(event_url),
            timeout: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("cornhole-tui").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn event_url_supplies_origin_and_tid() {
        let config = EventConfig::from_event_url(
            &Url::parse("https://scores.example.org/event/index.html?tid=spring#rules").unwrap(),
        );
        assert_eq!(config.base_url.as_str(), "https://scores.example.org/");
        assert_eq!(config.tid.as_str(), "spring");
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn tid_flag_overrides_query() {
        let cli = parse(&["http://localhost:8000/?tid=spring", "--tid", "fall", "--timeout-secs", "5"]);
        let config = EventConfig::from_cli(&cli);
        assert_eq!(config.tid.as_str(), "fall");
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn log_level_is_validated() {
        assert_eq!(parse(&["--log-level", "debug"]).log_level, LevelFilter::Debug);
        assert!(
            Cli::try_parse_from(["cornhole-tui", "--log-level", "loud"]).is_err()
        );
    }
}
