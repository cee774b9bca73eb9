//! Scoring session management.

use crate::scoring::{Match, MatchId, MatchSetup, ScoringError, ScoringEvent, SetupError};
use crate::scoring::{apply, replay_events};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};

/// A match being scored, with everything that happened to it.
#[derive(Debug, Clone)]
pub struct ScoringSession {
    /// The match as it was created.
    pub initial: Match,
    /// The match after the last accepted event.
    pub current: Match,
    /// Every accepted event, in order.
    pub events: Vec<ScoringEvent>,
    /// Latest generated commentary, if any.
    pub insight: Option<String>,
}

impl ScoringSession {
    /// Starts a session from a freshly created match.
    #[instrument(skip(initial), fields(match_id = %initial.id()))]
    pub fn new(initial: Match) -> Self {
        info!("Creating scoring session");
        Self {
            current: initial.clone(),
            initial,
            events: Vec::new(),
            insight: None,
        }
    }

    /// Returns the match id.
    pub fn id(&self) -> &MatchId {
        self.initial.id()
    }

    /// Applies an event and logs it. Rejected events leave the session unchanged.
    #[instrument(skip(self), fields(match_id = %self.id()))]
    pub fn record(&mut self, event: ScoringEvent) -> Result<&Match, ScoringError> {
        let next = apply(&self.current, &event).map_err(|e| {
            warn!(error = %e, "Event rejected");
            e
        })?;
        self.current = next;
        self.events.push(event);
        debug!(events = self.events.len(), "Event recorded");
        Ok(&self.current)
    }

    /// Rebuilds the current match from the initial state and the event log.
    #[instrument(skip(self), fields(match_id = %self.id()))]
    pub fn rebuild(&self) -> Result<Match, ScoringError> {
        replay_events(&self.initial, &self.events)
    }
}

/// Error returned by [`MatchBook`] operations.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum BookError {
    /// No session has this id.
    #[display("No match with id {}", _0)]
    UnknownMatch(MatchId),

    /// No match is selected.
    #[display("No match selected")]
    NothingSelected,

    /// The event was rejected.
    #[display("{}", _0)]
    Scoring(ScoringError),
}

impl std::error::Error for BookError {}

impl From<ScoringError> for BookError {
    fn from(err: ScoringError) -> Self {
        Self::Scoring(err)
    }
}

#[derive(Debug, Default)]
struct BookState {
    sessions: HashMap<MatchId, ScoringSession>,
    selected: Option<MatchId>,
}

/// Every match being scored, plus the one currently selected.
///
/// Cloning shares the same book. The lock is held for one operation, so
/// events on one match are applied one at a time.
#[derive(Debug, Clone, Default)]
pub struct MatchBook {
    state: Arc<Mutex<BookState>>,
}

impl MatchBook {
    /// Creates an empty book.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating match book");
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BookState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates a match from `setup`, stores it and selects it.
    #[instrument(skip(self, setup))]
    pub fn create_match(&self, setup: &MatchSetup) -> Result<MatchId, SetupError> {
        let game = setup.create_match()?;
        Ok(self.insert(game))
    }

    /// Stores an existing match and selects it.
    #[instrument(skip(self, game), fields(match_id = %game.id()))]
    pub fn insert(&self, game: Match) -> MatchId {
        let id = game.id().clone();
        let mut state = self.lock();
        state.sessions.insert(id.clone(), ScoringSession::new(game));
        state.selected = Some(id.clone());
        info!(count = state.sessions.len(), "Match added");
        id
    }

    /// Returns a copy of a session.
    #[instrument(skip(self))]
    pub fn session(&self, id: &MatchId) -> Option<ScoringSession> {
        let session = self.lock().sessions.get(id).cloned();
        if session.is_none() {
            debug!(match_id = %id, "Match not found");
        }
        session
    }

    /// Returns the current state of a match.
    pub fn current(&self, id: &MatchId) -> Option<Match> {
        self.lock().sessions.get(id).map(|s| s.current.clone())
    }

    /// Lists every match id.
    #[instrument(skip(self))]
    pub fn list_matches(&self) -> Vec<MatchId> {
        let mut ids: Vec<_> = self.lock().sessions.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Makes `id` the selected match.
    #[instrument(skip(self))]
    pub fn select(&self, id: &MatchId) -> Result<(), BookError> {
        let mut state = self.lock();
        if !state.sessions.contains_key(id) {
            return Err(BookError::UnknownMatch(id.clone()));
        }
        state.selected = Some(id.clone());
        Ok(())
    }

    /// Returns the selected match id.
    pub fn selected(&self) -> Option<MatchId> {
        self.lock().selected.clone()
    }

    /// Applies an event to a match and returns the new state.
    #[instrument(skip(self))]
    pub fn record(&self, id: &MatchId, event: ScoringEvent) -> Result<Match, BookError> {
        let mut state = self.lock();
        let session = state
            .sessions
            .get_mut(id)
            .ok_or_else(|| BookError::UnknownMatch(id.clone()))?;
        Ok(session.record(event)?.clone())
    }

    /// Applies an event to the selected match.
    #[instrument(skip(self))]
    pub fn record_selected(&self, event: ScoringEvent) -> Result<Match, BookError> {
        let id = self.selected().ok_or(BookError::NothingSelected)?;
        self.record(&id, event)
    }

    /// Stores commentary generated for a match.
    #[instrument(skip(self, insight))]
    pub fn attach_insight(&self, id: &MatchId, insight: String) -> Result<(), BookError> {
        let mut state = self.lock();
        let session = state
            .sessions
            .get_mut(id)
            .ok_or_else(|| BookError::UnknownMatch(id.clone()))?;
        session.insight = Some(insight);
        Ok(())
    }
}
