//! The signed-in user's registered events: one authenticated fetch per visit,
//! then local search, list/timetable views and expandable descriptions.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capabilities::is_success;
use crate::error::{AppError, ErrorKind};

pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch registered events";

/// Event ids arrive as numbers from some deployments and strings from others.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventId {
    Number(i64),
    Text(String),
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventId::Number(n) => write!(f, "{n}"),
            EventId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDetails {
    pub description: String,
    pub venue: String,
    pub date: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredEvent {
    #[serde(alias = "eventId")]
    pub id: EventId,
    pub title: String,
    pub category_name: String,
    pub image: String,
    pub details: EventDetails,
}

impl RegisteredEvent {
    /// Case-insensitive substring match on title or category.
    pub fn matches(&self, needle_lower: &str) -> bool {
        needle_lower.is_empty()
            || self.title.to_lowercase().contains(needle_lower)
            || self.category_name.to_lowercase().contains(needle_lower)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    List,
    Timetable,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    CheckingCredentials,
    Loading,
    Loaded(Vec<RegisteredEvent>),
    Failed(AppError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateGroup {
    pub date: String,
    pub events: Vec<RegisteredEvent>,
}

#[derive(Debug, Default)]
pub struct RegisteredEventsPage {
    pub state: FetchState,
    pub search_term: String,
    pub view_mode: ViewMode,
    pub expanded: Option<EventId>,
}

impl RegisteredEventsPage {
    /// Fresh state for a new visit. Search and view mode are per visit too.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, FetchState::CheckingCredentials | FetchState::Loading)
    }

    pub fn events(&self) -> &[RegisteredEvent] {
        match &self.state {
            FetchState::Loaded(events) => events,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&AppError> {
        match &self.state {
            FetchState::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn filtered(&self) -> Vec<&RegisteredEvent> {
        let needle = self.search_term.trim().to_lowercase();
        self.events().iter().filter(|e| e.matches(&needle)).collect()
    }

    /// Filtered events grouped by date in order of first appearance, each
    /// group ordered by start time.
    pub fn grouped_by_date(&self) -> Vec<DateGroup> {
        let mut groups: Vec<DateGroup> = Vec::new();
        for event in self.filtered() {
            match groups.iter_mut().find(|g| g.date == event.details.date) {
                Some(group) => group.events.push(event.clone()),
                None => groups.push(DateGroup {
                    date: event.details.date.clone(),
                    events: vec![event.clone()],
                }),
            }
        }
        for group in &mut groups {
            group.events.sort_by(|a, b| a.details.time.cmp(&b.details.time));
        }
        groups
    }

    /// Expands `id`, or collapses it if it was already the expanded one.
    pub fn toggle(&mut self, id: EventId) {
        if self.expanded.as_ref() == Some(&id) {
            self.expanded = None;
        } else {
            self.expanded = Some(id);
        }
    }

    pub fn apply(&mut self, outcome: FetchOutcome) {
        self.state = match outcome {
            FetchOutcome::Loaded(events) => FetchState::Loaded(events),
            FetchOutcome::Failed(err) => FetchState::Failed(err.into()),
        };
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("server answered with status {status}")]
    Status { status: u16 },

    #[error("response had no readable body")]
    MissingBody,

    #[error("response body could not be decoded: {0}")]
    Decode(String),

    #[error("request failed: {0}")]
    Transport(String),
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        let internal = err.to_string();
        match err {
            FetchError::Status { status } => AppError::from_http_status(status, FETCH_FAILED_MESSAGE),
            FetchError::MissingBody | FetchError::Decode(_) => {
                AppError::new(ErrorKind::Deserialization, FETCH_FAILED_MESSAGE)
            }
            FetchError::Transport(_) => AppError::new(ErrorKind::Network, FETCH_FAILED_MESSAGE),
        }
        .with_internal(internal)
    }
}

/// Result of the registered-events request, reduced to what the page needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Loaded(Vec<RegisteredEvent>),
    Failed(FetchError),
}

impl FetchOutcome {
    pub fn from_status(status: u16, body: Option<Vec<RegisteredEvent>>) -> Self {
        if !is_success(status) {
            return FetchOutcome::Failed(FetchError::Status { status });
        }
        match body {
            Some(events) => FetchOutcome::Loaded(events),
            None => FetchOutcome::Failed(FetchError::MissingBody),
        }
    }

    pub fn from_http(result: crux_http::Result<crux_http::Response<Vec<RegisteredEvent>>>) -> Self {
        match result {
            Ok(mut response) => {
                let status: u16 = response.status().into();
                Self::from_status(status, response.take_body())
            }
            Err(crux_http::Error::Http(e)) => FetchOutcome::Failed(FetchError::Status {
                status: e.code.into(),
            }),
            Err(crux_http::Error::Json(reason)) => FetchOutcome::Failed(FetchError::Decode(reason)),
            Err(e) => FetchOutcome::Failed(FetchError::Transport(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = r#"[{"id":1,"title":"Dance Night","categoryName":"Nritya","image":"x.jpg","details":{"description":"d","venue":"Hall A","date":"2025-03-01","time":"18:00"}}]"#;

    fn event(id: i64, title: &str, category: &str, date: &str, time: &str) -> RegisteredEvent {
        RegisteredEvent {
            id: EventId::Number(id),
            title: title.into(),
            category_name: category.into(),
            image: format!("{id}.jpg"),
            details: EventDetails {
                description: format!("about {title}"),
                venue: "Main Stage".into(),
                date: date.into(),
                time: time.into(),
            },
        }
    }

    fn loaded(events: Vec<RegisteredEvent>) -> RegisteredEventsPage {
        RegisteredEventsPage {
            state: FetchState::Loaded(events),
            ..RegisteredEventsPage::default()
        }
    }

    #[test]
    fn test_decodes_example_record() {
        let events: Vec<RegisteredEvent> = serde_json::from_str(EXAMPLE).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, EventId::Number(1));
        assert_eq!(events[0].category_name, "Nritya");
        assert_eq!(events[0].details.venue, "Hall A");
    }

    #[test]
    fn test_accepts_event_id_alias_and_string_ids() {
        let json = r#"[{"eventId":"abc","title":"t","categoryName":"c","image":"i","details":{"description":"","venue":"","date":"d","time":"t"}}]"#;
        let events: Vec<RegisteredEvent> = serde_json::from_str(json).unwrap();
        assert_eq!(events[0].id, EventId::Text("abc".into()));
        assert_eq!(events[0].id.to_string(), "abc");
    }

    #[test]
    fn test_search_is_case_insensitive_on_title_and_category() {
        let mut page = loaded(vec![
            event(1, "Dance Night", "Nritya", "2025-03-01", "18:00"),
            event(2, "Short Film", "CineCarnival", "2025-03-02", "10:00"),
        ]);
        page.search_term = "DANCE".into();
        assert_eq!(page.filtered().len(), 1);
        page.search_term = "cine".into();
        assert_eq!(page.filtered()[0].id, EventId::Number(2));
        page.search_term = String::new();
        assert_eq!(page.filtered().len(), 2);
        page.search_term = "opera".into();
        assert!(page.filtered().is_empty());
    }

    #[test]
    fn test_timetable_groups_in_first_appearance_order() {
        let page = loaded(vec![
            event(1, "B", "x", "2025-03-02", "12:00"),
            event(2, "A", "x", "2025-03-01", "18:00"),
            event(3, "C", "x", "2025-03-02", "09:30"),
        ]);
        let groups = page.grouped_by_date();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].date, "2025-03-02");
        assert_eq!(groups[0].events[0].id, EventId::Number(3));
        assert_eq!(groups[0].events[1].id, EventId::Number(1));
        assert_eq!(groups[1].date, "2025-03-01");
    }

    #[test]
    fn test_single_expanded_description() {
        let mut page = loaded(vec![]);
        page.toggle(EventId::Number(1));
        assert_eq!(page.expanded, Some(EventId::Number(1)));
        page.toggle(EventId::Number(2));
        assert_eq!(page.expanded, Some(EventId::Number(2)));
        page.toggle(EventId::Number(2));
        assert!(page.expanded.is_none());
    }

    #[test]
    fn test_non_success_status_fails() {
        assert_eq!(
            FetchOutcome::from_status(401, None),
            FetchOutcome::Failed(FetchError::Status { status: 401 })
        );
        assert_eq!(
            FetchOutcome::from_status(500, Some(vec![])),
            FetchOutcome::Failed(FetchError::Status { status: 500 })
        );
        assert_eq!(
            FetchOutcome::from_status(200, None),
            FetchOutcome::Failed(FetchError::MissingBody)
        );
        assert_eq!(FetchOutcome::from_status(200, Some(vec![])), FetchOutcome::Loaded(vec![]));
    }

    #[test]
    fn test_error_kinds() {
        let unauthorized: AppError = FetchError::Status { status: 401 }.into();
        assert_eq!(unauthorized.kind, ErrorKind::Authentication);
        assert_eq!(unauthorized.message, FETCH_FAILED_MESSAGE);

        let server: AppError = FetchError::Status { status: 500 }.into();
        assert_eq!(server.kind, ErrorKind::Internal);
        assert_eq!(server.user_facing_message(), FETCH_FAILED_MESSAGE);

        let offline: AppError = FetchError::Transport("dns".into()).into();
        assert_eq!(offline.kind, ErrorKind::Network);
    }

    #[test]
    fn test_apply_failure_sets_single_error() {
        let mut page = RegisteredEventsPage::default();
        page.state = FetchState::Loading;
        page.apply(FetchOutcome::Failed(FetchError::Status { status: 403 }));
        assert!(!page.is_loading());
        assert_eq!(page.error().map(|e| e.kind), Some(ErrorKind::Authorization));
        assert!(page.events().is_empty());
    }
}
