use serde::Serialize;

use crate::domain::player::{Player, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreRow {
    pub player_id: UserId,
    pub name: String,
    pub score: u32,
}

/// Scores after `rounds_played` rounds, best first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreTable {
    pub rounds_played: u32,
    pub rows: Vec<ScoreRow>,
}

/// Rank players by score, descending. The sort is stable, so tied players
/// keep their join order.
pub fn rank_players(players: &[Player], rounds_played: u32) -> ScoreTable {
    let mut rows: Vec<ScoreRow> = players
        .iter()
        .map(|p| ScoreRow {
            player_id: p.id,
            name: p.display_name.clone(),
            score: p.score(),
        })
        .collect();
    rows.sort_by(|a, b| b.score.cmp(&a.score));
    ScoreTable {
        rounds_played,
        rows,
    }
}

impl ScoreTable {
    pub fn leader(&self) -> Option<&ScoreRow> {
        self.rows.first()
    }
}
