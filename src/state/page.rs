use chrono::{DateTime, Local};
use cornhole_api::Schedule;
use std::collections::HashMap;

pub const LOADING_TEXT: &str = "Loading...";
pub const NO_SCHEDULE_TEXT: &str = "No schedule data";
pub const SCHEDULE_HEADER: [&str; 3] = ["Match", "Court", "Start"];

/// Output elements of the page, addressed by stable ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    RegisterResult,
    JoinResult,
    BracketContainer,
    ScheduleTable,
    NowNextContainer,
    RulesContainer,
    ScoreResult,
}

/// What an element currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Shown verbatim, never interpreted.
    Text(String),
    /// HTML source rendered as styled text.
    Markup(String),
    Table(TableContent),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableContent {
    pub header: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
}

impl TableContent {
    /// One single-cell row, used for loading/empty/failure states.
    pub fn placeholder(message: impl Into<String>) -> Self {
        Self {
            header: None,
            rows: vec![vec![message.into()]],
        }
    }

    /// Header plus one row per match in server order; cells are plain text.
    pub fn from_schedule(schedule: &Schedule) -> Self {
        if schedule.matches.is_empty() {
            return Self::placeholder(NO_SCHEDULE_TEXT);
        }
        Self {
            header: Some(SCHEDULE_HEADER.iter().map(|h| h.to_string()).collect()),
            rows: schedule
                .matches
                .iter()
                .map(|m| vec![m.match_id.clone(), m.court.clone(), m.start_slot.clone()])
                .collect(),
        }
    }

    /// Header first, then body rows.
    pub fn all_rows(&self) -> impl Iterator<Item = &Vec<String>> {
        self.header.iter().chain(self.rows.iter())
    }
}

#[derive(Debug, Default)]
pub struct Page {
    elements: HashMap<ElementId, Content>,
    updated_at: HashMap<ElementId, DateTime<Local>>,
}

impl Page {
    pub fn get(&self, id: ElementId) -> Option<&Content> {
        self.elements.get(&id)
    }

    /// Text of a `Content::Text` element.
    #[cfg(test)]
    pub fn text(&self, id: ElementId) -> Option<&str> {
        match self.elements.get(&id)? {
            Content::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn table(&self, id: ElementId) -> Option<&TableContent> {
        match self.elements.get(&id)? {
            Content::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn updated_at(&self, id: ElementId) -> Option<DateTime<Local>> {
        self.updated_at.get(&id).copied()
    }

    pub fn set_text(&mut self, id: ElementId, text: impl Into<String>) {
        self.set(id, Content::Text(text.into()));
    }

    pub fn set_markup(&mut self, id: ElementId, markup: impl Into<String>) {
        self.set(id, Content::Markup(markup.into()));
    }

    pub fn set_table(&mut self, id: ElementId, table: TableContent) {
        self.set(id, Content::Table(table));
    }

    fn set(&mut self, id: ElementId, content: Content) {
        self.elements.insert(id, content);
        self.updated_at.insert(id, Local::now());
    }
}
