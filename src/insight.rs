//! Match commentary from an external model.
//!
//! Commentary is advisory. Whatever the source returns, or fails to return,
//! never touches the match itself.

use crate::llm_client::{LlmClient, LlmError};
use crate::scoring::{Match, ScoreLine};
use async_trait::async_trait;
use serde_json::json;
use tracing::{info, instrument, warn};

/// Shown when the source answers with nothing.
pub const NO_INSIGHT: &str = "No insights available.";

/// Shown when the source fails.
pub const INSIGHT_FAILED: &str = "Failed to generate AI insights.";

const SYSTEM_PROMPT: &str = "You are an expert cricket analyst. Give a short, punchy \
commentary on the match state: momentum, key performers, and what the batting side \
needs. Keep it under 120 words and do not invent events that are not in the data.";

/// Anything that can comment on a match.
#[async_trait]
pub trait InsightSource: Send + Sync {
    /// Produces commentary for the match as it stands.
    async fn insight(&self, game: &Match) -> Result<String, LlmError>;
}

/// Builds the prompt describing the match state.
pub fn insight_prompt(game: &Match) -> String {
    let innings: Vec<_> = game
        .innings()
        .iter()
        .enumerate()
        .filter(|(index, inning)| *index <= game.current_inning() || inning.has_started())
        .map(|(_, inning)| {
            let batters: Vec<_> = inning
                .squad()
                .into_iter()
                .filter_map(|p| {
                    p.batting().map(|b| {
                        json!({ "name": p.name(), "runs": b.runs, "balls": b.balls, "out": b.out })
                    })
                })
                .collect();
            json!({
                "team": inning.team(),
                "score": ScoreLine::of(inning).to_string(),
                "batters": batters,
            })
        })
        .collect();

    let state = json!({
        "title": game.title(),
        "venue": game.venue(),
        "overs": game.overs(),
        "status": game.status().to_string(),
        "statusText": game.status_text(),
        "target": game.target(),
        "innings": innings,
    });
    format!("Analyze this cricket match and give a brief insight:\n{}", state)
}

/// Asks `source` for commentary, substituting the fallback strings on an
/// empty answer or an error.
#[instrument(skip(source, game), fields(match_id = %game.id()))]
pub async fn generate_insight(source: &dyn InsightSource, game: &Match) -> String {
    match source.insight(game).await {
        Ok(text) if text.trim().is_empty() => {
            info!("Insight source returned nothing");
            NO_INSIGHT.to_string()
        }
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            warn!(error = %e, "Insight generation failed");
            INSIGHT_FAILED.to_string()
        }
    }
}

/// Commentary from an LLM.
#[derive(Debug, Clone)]
pub struct LlmInsightSource {
    client: LlmClient,
}

impl LlmInsightSource {
    /// Wraps a configured client.
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl InsightSource for LlmInsightSource {
    async fn insight(&self, game: &Match) -> Result<String, LlmError> {
        self.client
            .generate(SYSTEM_PROMPT, &insight_prompt(game))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::MatchSetup;

    #[test]
    fn test_prompt_describes_state() {
        let game = MatchSetup::new("Tech Titans", "Code Warriors", "Silicon Valley Oval")
            .create_match()
            .unwrap();
        let prompt = insight_prompt(&game);
        assert!(prompt.contains("Tech Titans vs Code Warriors"));
        assert!(prompt.contains("0/0 (0.0)"));
        assert!(prompt.contains("Match Started"));
        assert_eq!(prompt.matches("\"team\"").count(), 1);
    }
}
