//! Derived views of a match: score lines and batting/bowling cards.

use super::types::{BALLS_PER_OVER, Inning, Match};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::str::FromStr;

/// Formats overs as cricket notation, `overs.balls` ("8.4").
pub fn overs_notation(overs: u32, balls: u32) -> String {
    format!("{}.{}", overs, balls)
}

/// Runs per hundred balls, `None` before the first ball faced.
pub fn strike_rate(runs: u32, balls: u32) -> Option<f64> {
    (balls > 0).then(|| f64::from(runs) * 100.0 / f64::from(balls))
}

/// Runs conceded per over, `None` before the first legal ball.
pub fn economy(runs_conceded: u32, legal_balls: u32) -> Option<f64> {
    (legal_balls > 0)
        .then(|| f64::from(runs_conceded) * f64::from(BALLS_PER_OVER) / f64::from(legal_balls))
}

// ─────────────────────────────────────────────────────────────
//  Score line
// ─────────────────────────────────────────────────────────────

/// A compact team score, "82/2 (8.4)".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ScoreLine {
    /// Team total.
    pub runs: u32,
    /// Wickets fallen.
    pub wickets: u32,
    /// Completed overs.
    pub overs: u32,
    /// Balls into the current over.
    pub balls: u32,
}

impl ScoreLine {
    /// Reads the score line of an inning.
    pub fn of(inning: &Inning) -> Self {
        Self {
            runs: inning.total_runs(),
            wickets: inning.wickets(),
            overs: inning.overs(),
            balls: inning.balls(),
        }
    }

    /// Parses a score line, falling back to `0/0 (0.0)` when it is unreadable.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl std::fmt::Display for ScoreLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} ({})",
            self.runs,
            self.wickets,
            overs_notation(self.overs, self.balls)
        )
    }
}

/// A score string that does not read as `runs/wickets (overs)`.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Unreadable score line: '{}'", input)]
pub struct ScoreLineError {
    /// The rejected input.
    pub input: String,
}

impl FromStr for ScoreLine {
    type Err = ScoreLineError;

    /// Finds `<runs>/<wickets> (<overs>[.<balls>])` anywhere in the input, so
    /// feed values like `"IND 342/8 (50.0)"` parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ScoreLineError {
            input: s.to_string(),
        };
        let slash = s.find('/').ok_or_else(err)?;

        let head = &s[..slash];
        let runs_start = head
            .char_indices()
            .rev()
            .take_while(|(_, c)| c.is_ascii_digit())
            .last()
            .map_or(head.len(), |(i, _)| i);
        let runs = head[runs_start..].parse().map_err(|_| err())?;

        let tail = &s[slash + 1..];
        let wickets_end = tail
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(tail.len());
        let wickets = tail[..wickets_end].parse().map_err(|_| err())?;

        let rest = tail[wickets_end..].trim_start();
        let inner = rest
            .strip_prefix('(')
            .and_then(|r| r.split_once(')'))
            .map(|(inner, _)| inner.trim())
            .ok_or_else(err)?;
        let (overs, balls) = match inner.split_once('.') {
            Some((o, b)) => (o.parse().map_err(|_| err())?, b.parse().map_err(|_| err())?),
            None => (inner.parse().map_err(|_| err())?, 0),
        };

        Ok(Self {
            runs,
            wickets,
            overs,
            balls,
        })
    }
}

// ─────────────────────────────────────────────────────────────
//  Cards
// ─────────────────────────────────────────────────────────────

/// One row of a batting card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattingLine {
    /// Batter name.
    pub name: String,
    /// Runs scored.
    pub runs: u32,
    /// Balls faced.
    pub balls: u32,
    /// Fours hit.
    pub fours: u32,
    /// Sixes hit.
    pub sixes: u32,
    /// Dismissed.
    pub out: bool,
    /// Currently facing.
    pub on_strike: bool,
    /// Runs per hundred balls.
    pub strike_rate: Option<f64>,
}

/// One row of a bowling card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BowlingLine {
    /// Bowler name.
    pub name: String,
    /// Completed overs.
    pub overs: u32,
    /// Balls into the current over.
    pub balls: u32,
    /// Runs charged.
    pub runs_conceded: u32,
    /// Wickets taken.
    pub wickets: u32,
    /// Runs per over.
    pub economy: Option<f64>,
}

/// Card for one inning: who batted, who bowled, and extras.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InningCard {
    /// Batting side.
    pub team: String,
    /// Team score.
    pub score: ScoreLine,
    /// Wide and no-ball penalty runs.
    pub extras: u32,
    /// Batters who came to the crease, in squad order.
    pub batting: Vec<BattingLine>,
    /// Bowlers who bowled, in squad order.
    pub bowling: Vec<BowlingLine>,
}

impl InningCard {
    /// Builds the card for `batting`, taking bowling figures from `fielding`.
    pub fn build(batting: &Inning, fielding: &Inning) -> Self {
        let batting_lines = batting
            .squad()
            .into_iter()
            .filter_map(|p| {
                let record = p.batting()?;
                Some(BattingLine {
                    name: p.name().to_string(),
                    runs: record.runs,
                    balls: record.balls,
                    fours: record.fours,
                    sixes: record.sixes,
                    out: record.out,
                    on_strike: batting.striker() == Some(p.id()),
                    strike_rate: strike_rate(record.runs, record.balls),
                })
            })
            .collect();

        let bowling_lines = fielding
            .squad()
            .into_iter()
            .filter_map(|p| {
                let record = p.bowling()?;
                Some(BowlingLine {
                    name: p.name().to_string(),
                    overs: record.overs,
                    balls: record.balls_bowled,
                    runs_conceded: record.runs_conceded,
                    wickets: record.wickets,
                    economy: economy(record.runs_conceded, record.legal_balls()),
                })
            })
            .collect();

        Self {
            team: batting.team().to_string(),
            score: ScoreLine::of(batting),
            extras: batting.deliveries().iter().map(|d| *d.extra_runs()).sum(),
            batting: batting_lines,
            bowling: bowling_lines,
        }
    }
}

/// The full card for a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scorecard {
    /// Match title.
    pub title: String,
    /// Status or result line.
    pub status_text: String,
    /// One card per inning reached.
    pub innings: Vec<InningCard>,
}

impl Scorecard {
    /// Builds cards for every inning that has started, plus the live one.
    pub fn from_match(game: &Match) -> Self {
        let [first, second] = game.innings();
        let mut innings = vec![InningCard::build(first, second)];
        if game.current_inning() == 1 {
            innings.push(InningCard::build(second, first));
        }
        Self {
            title: game.title().to_string(),
            status_text: game.status_text().to_string(),
            innings,
        }
    }

    /// Renders the card as plain text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title);
        let _ = writeln!(out, "{}", self.status_text);
        for card in &self.innings {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}  {}  (extras {})", card.team, card.score, card.extras);
            for line in &card.batting {
                let marker = if line.on_strike { "*" } else { " " };
                let status = if line.out { "out" } else { "not out" };
                let _ = writeln!(
                    out,
                    "  {}{:<24} {:>4} ({:>3})  4s {:>2}  6s {:>2}  SR {:>6}  {}",
                    marker,
                    line.name,
                    line.runs,
                    line.balls,
                    line.fours,
                    line.sixes,
                    format_rate(line.strike_rate),
                    status
                );
            }
            for line in &card.bowling {
                let _ = writeln!(
                    out,
                    "   {:<24} {:>5}  {:>3}-{:<2}  Econ {:>5}",
                    line.name,
                    overs_notation(line.overs, line.balls),
                    line.runs_conceded,
                    line.wickets,
                    format_rate(line.economy)
                );
            }
        }
        out
    }
}

fn format_rate(rate: Option<f64>) -> String {
    rate.map_or_else(|| "-".to_string(), |r| format!("{:.2}", r))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feed_scores() {
        let score: ScoreLine = "342/8 (50.0)".parse().unwrap();
        assert_eq!(
            score,
            ScoreLine {
                runs: 342,
                wickets: 8,
                overs: 50,
                balls: 0
            }
        );

        let score: ScoreLine = "IND 187/4 (32.2)".parse().unwrap();
        assert_eq!(score.runs, 187);
        assert_eq!(score.overs, 32);
        assert_eq!(score.balls, 2);

        let score: ScoreLine = "12/0 (3)".parse().unwrap();
        assert_eq!((score.overs, score.balls), (3, 0));
    }

    #[test]
    fn test_unreadable_scores_fall_back() {
        assert!("Yet to bat".parse::<ScoreLine>().is_err());
        assert_eq!(ScoreLine::parse_lenient("Yet to bat"), ScoreLine::default());
        assert_eq!(ScoreLine::parse_lenient("").to_string(), "0/0 (0.0)");
    }

    #[test]
    fn test_display() {
        let score = ScoreLine {
            runs: 82,
            wickets: 2,
            overs: 8,
            balls: 4,
        };
        assert_eq!(score.to_string(), "82/2 (8.4)");
    }

    #[test]
    fn test_rates() {
        assert_eq!(strike_rate(50, 25), Some(200.0));
        assert_eq!(strike_rate(0, 0), None);
        assert_eq!(economy(30, 24), Some(7.5));
        assert_eq!(economy(4, 0), None);
    }
}
