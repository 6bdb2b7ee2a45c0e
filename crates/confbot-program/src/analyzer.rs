//! Read-only queries over the loaded program.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset};

use crate::model::{ConferenceSession, ExpertSummary, SessionSummary};

const KIND_WORKSHOP: &str = "WORKSHOP";
const KIND_KEYNOTE: &str = "KEYNOTE";
const KIND_SESSION: &str = "SESSION";

/// The immutable conference program.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    sessions: Vec<ConferenceSession>,
}

impl Catalog {
    pub fn new(sessions: Vec<ConferenceSession>) -> Self {
        Self { sessions }
    }

    pub fn sessions(&self) -> &[ConferenceSession] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Every speaker of every session, deduplicated, in program order.
    pub fn experts(&self) -> Vec<ExpertSummary> {
        let mut seen = HashSet::new();
        self.sessions
            .iter()
            .flat_map(|s| s.experts.iter())
            .map(|e| e.summary())
            .filter(|summary| seen.insert(summary.clone()))
            .collect()
    }

    /// Sessions listing a speaker whose forename and surname match exactly.
    pub fn sessions_by_expert(&self, forename: &str, surname: &str) -> Vec<SessionSummary> {
        self.sessions
            .iter()
            .filter(|s| s.has_expert(forename, surname))
            .map(ConferenceSession::summary)
            .collect()
    }

    pub fn session_by_name(&self, name: &str) -> Option<&ConferenceSession> {
        self.sessions.iter().find(|s| s.name == name)
    }

    pub fn workshops(&self) -> Vec<&ConferenceSession> {
        self.of_kind(KIND_WORKSHOP)
    }

    pub fn keynotes(&self) -> Vec<&ConferenceSession> {
        self.of_kind(KIND_KEYNOTE)
    }

    /// Regular talks, i.e. neither workshops nor keynotes.
    pub fn regular_sessions(&self) -> Vec<&ConferenceSession> {
        self.of_kind(KIND_SESSION)
    }

    /// Distinct track names in program order.
    pub fn tracks(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.sessions
            .iter()
            .flat_map(|s| s.tracks.iter())
            .filter(|t| seen.insert(t.name.as_str()))
            .map(|t| t.name.clone())
            .collect()
    }

    /// Sessions running at `time` (start and end inclusive).
    pub fn sessions_at(&self, time: DateTime<FixedOffset>) -> Vec<&ConferenceSession> {
        self.sessions
            .iter()
            .filter(|s| match (s.localized_start_date, s.localized_end_date) {
                (Some(start), Some(end)) => start <= time && time <= end,
                _ => false,
            })
            .collect()
    }

    fn of_kind(&self, kind: &str) -> Vec<&ConferenceSession> {
        self.sessions
            .iter()
            .filter(|s| s.session_type.kind == kind)
            .collect()
    }
}
