//! Strictly Cricket library - checked ball-by-ball cricket scoring
//!
//! A match is a value. Every scoring input is a first-class event that is
//! validated against contracts, applied to a copy, and checked against the
//! match invariants before the new state is returned.
//!
//! # Architecture
//!
//! - **Scoring**: data model, rules, contracts, invariants and replay
//! - **Session**: in-memory book of matches being scored
//! - **Insight**: match commentary from an LLM
//! - **Live feed**: live international scores with refresh ordering
//!
//! # Example
//!
//! ```
//! use strictly_cricket::{MatchSetup, PlayerRole, ScoringEvent};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let game = MatchSetup::new("Tech Titans", "Code Warriors", "Silicon Valley Oval")
//!     .with_overs(5)
//!     .create_match()?;
//!
//! let opener = game.batter_by_name("Tech Titans Player 1").cloned().ok_or("no opener")?;
//! let partner = game.batter_by_name("Tech Titans Player 2").cloned().ok_or("no partner")?;
//! let bowler = game.bowler_by_name("Code Warriors Player 11").cloned().ok_or("no bowler")?;
//!
//! let game = game
//!     .apply(&ScoringEvent::select(opener, PlayerRole::Striker))?
//!     .apply(&ScoringEvent::select(partner, PlayerRole::NonStriker))?
//!     .apply(&ScoringEvent::select(bowler, PlayerRole::Bowler))?
//!     .apply(&ScoringEvent::runs(4))?;
//!
//! assert_eq!(game.live_inning().total_runs(), 4);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod insight;
mod live_feed;
mod llm_client;
mod session;

pub mod scoring;

// Crate-level exports - Configuration
pub use config::{ConfigError, LiveSettings, LlmSettings, ScorerConfig};

// Crate-level exports - LLM client
pub use llm_client::{LlmClient, LlmConfig, LlmError, LlmProvider, extract_text, request_body};

// Crate-level exports - Commentary
pub use insight::{
    INSIGHT_FAILED, InsightSource, LlmInsightSource, NO_INSIGHT, generate_insight, insight_prompt,
};

// Crate-level exports - Live feed
pub use live_feed::{
    FEED_MATCH_OVERS, FeedError, LiveBoard, LiveFeed, LiveMatchSummary, LlmLiveFeed,
    RefreshOutcome, RefreshTicket, parse_live_matches, refresh_once, spawn_refresher,
};

// Crate-level exports - Session management
pub use session::{BookError, MatchBook, ScoringSession};

// Crate-level exports - Scoring
pub use scoring::{
    BattingRecord, BowlingRecord, Delivery, ExtraType, Inning, InningsEnd, Match, MatchDefaults,
    MatchId, MatchOutcome, MatchScript, MatchSetup, MatchStatus, MatchType, PlayerId,
    PlayerMatchStats, PlayerRole, Replay, ReplayError, ScoreLine, Scorecard, ScoringError,
    ScoringEvent, ScoringRules, ScriptError, ScriptedEvent, SetupError, TossDecision,
    ValidationError, apply, replay, replay_events,
};
