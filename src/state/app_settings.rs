use crate::config::{Cli, EventConfig};
use cornhole_api::TournamentId;
use log::LevelFilter;

#[derive(Debug, Default, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    /// Shown in the status area.
    pub tid: TournamentId,
}

impl AppSettings {
    pub fn from_cli(cli: &Cli, config: &EventConfig) -> Self {
        Self {
            full_screen: cli.full_screen,
            log_level: Some(cli.log_level),
            tid: config.tid.clone(),
        }
    }
}
