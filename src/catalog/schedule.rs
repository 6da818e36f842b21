use crate::Gold;
use serde::Serialize;

/// Category of a round, governing whether it runs combat, a draft, or a
/// crest selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundKind {
    Pvp,
    PveIntro,
    PveLoot,
    PveBoss,
    MadMerchant,
    MajorCrest,
}

impl RoundKind {
    /// Rounds that run no combat and drive their own completion signal.
    pub fn is_special(&self) -> bool {
        matches!(self, Self::MadMerchant | Self::MajorCrest)
    }
    pub fn is_pve(&self) -> bool {
        matches!(self, Self::PveIntro | Self::PveLoot | Self::PveBoss)
    }
}

/// Fixed opening schedule; games continue as pvp until a single survivor.
const SCHEDULE: [RoundKind; 14] = [
    RoundKind::PveIntro,
    RoundKind::Pvp,
    RoundKind::Pvp,
    RoundKind::MadMerchant,
    RoundKind::Pvp,
    RoundKind::MajorCrest,
    RoundKind::Pvp,
    RoundKind::PveLoot,
    RoundKind::Pvp,
    RoundKind::MadMerchant,
    RoundKind::Pvp,
    RoundKind::PveBoss,
    RoundKind::Pvp,
    RoundKind::Pvp,
];

/// Round type for a 1-based round number.
pub fn round_kind(round: u32) -> RoundKind {
    SCHEDULE
        .get(round.saturating_sub(1) as usize)
        .copied()
        .unwrap_or(RoundKind::Pvp)
}

/// Shop odds: percent weight of each cost tier 1..5 by player level.
/// Every row sums to 100.
const SHOP_ODDS: [[u8; 5]; 6] = [
    [100, 0, 0, 0, 0],
    [80, 20, 0, 0, 0],
    [60, 30, 10, 0, 0],
    [35, 30, 25, 10, 0],
    [20, 25, 25, 25, 5],
    [10, 15, 25, 25, 25],
];

pub fn shop_odds(level: u8) -> &'static [u8; 5] {
    let index = level.clamp(1, 6) as usize - 1;
    &SHOP_ODDS[index]
}

/// Copies of each unit in the shared pool, by cost tier 1..5.
const POOL_SIZES: [usize; 5] = [30, 20, 16, 12, 10];

pub fn pool_size(cost: u8) -> usize {
    match cost {
        1..=5 => POOL_SIZES[cost as usize - 1],
        _ => 0,
    }
}

/// XP required to advance out of each level 1..5; level 6 is terminal.
const XP_THRESHOLDS: [u32; 5] = [2, 2, 6, 10, 20];

pub fn xp_to_level_up(level: u8) -> Option<u32> {
    match level {
        1..=5 => Some(XP_THRESHOLDS[level as usize - 1]),
        _ => None,
    }
}

/// Board capacity by player level.
pub fn max_units(level: u8) -> usize {
    level.clamp(1, 6) as usize + 2
}

pub fn star_multiplier(star: u8) -> f32 {
    match star {
        1 => 1.0,
        2 => 1.5,
        _ => 2.0,
    }
}

/// Sell value of a star-s unit: cost x 3^(s-1).
pub fn sell_price(cost: u8, star: u8) -> Gold {
    cost as Gold * 3i32.pow(star.saturating_sub(1) as u32)
}

/// Pool copies embodied by (and refunded for) a star-s instance.
pub fn copies_of(star: u8) -> usize {
    3usize.pow(star.saturating_sub(1) as u32)
}

/// Fixed enemy formation for an encounter round, in away-side board
/// coordinates (x 0..5, y 0..4).
pub fn encounter_board(kind: RoundKind) -> &'static [(&'static str, usize, usize)] {
    match kind {
        RoundKind::PveIntro => &[("wolf", 1, 1), ("wolf", 3, 1)],
        RoundKind::PveLoot => &[
            ("gilded_golem", 1, 1),
            ("gilded_golem", 2, 2),
            ("gilded_golem", 3, 1),
        ],
        RoundKind::PveBoss => &[
            ("direwolf", 1, 0),
            ("obsidian_dragon", 2, 1),
            ("direwolf", 3, 0),
        ],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn odds_rows_sum_to_one_hundred() {
        for level in 1..=6u8 {
            let total: u32 = shop_odds(level).iter().map(|p| *p as u32).sum();
            assert_eq!(total, 100, "level {} odds must sum to 100", level);
        }
    }
    #[test]
    fn schedule_shape() {
        assert_eq!(round_kind(1), RoundKind::PveIntro);
        assert_eq!(round_kind(4), RoundKind::MadMerchant);
        assert_eq!(round_kind(6), RoundKind::MajorCrest);
        assert_eq!(round_kind(8), RoundKind::PveLoot);
        assert_eq!(round_kind(12), RoundKind::PveBoss);
        assert_eq!(round_kind(15), RoundKind::Pvp);
        assert_eq!(round_kind(100), RoundKind::Pvp);
    }
    #[test]
    fn sell_price_grows_by_copies() {
        assert_eq!(sell_price(3, 1), 3);
        assert_eq!(sell_price(3, 2), 9);
        assert_eq!(sell_price(3, 3), 27);
        assert_eq!(copies_of(1), 1);
        assert_eq!(copies_of(2), 3);
        assert_eq!(copies_of(3), 9);
    }
    #[test]
    fn encounter_boards_fit_the_half_field() {
        for kind in [RoundKind::PveIntro, RoundKind::PveLoot, RoundKind::PveBoss] {
            for (_, x, y) in encounter_board(kind) {
                assert!(*x < crate::BOARD_W && *y < crate::BOARD_H);
            }
        }
    }
}
