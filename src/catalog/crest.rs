use super::stats::StatBonus;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CrestKind {
    /// Rank 1-3, stackable by repeat acquisition, up to 3 distinct.
    Minor,
    /// One per player, granted in the dedicated round.
    Major,
}

/// Team-wide stat banner. Minor crest bonuses scale with rank.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrestTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: CrestKind,
    pub bonuses: &'static [StatBonus],
}

pub const MAX_CREST_RANK: u8 = 3;

/// Rank multiplier for minor crests: x1 / x1.5 / x2.
pub fn rank_multiplier(rank: u8) -> f32 {
    match rank {
        1 => 1.0,
        2 => 1.5,
        _ => 2.0,
    }
}
