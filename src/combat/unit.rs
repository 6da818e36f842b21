use super::hex::Hex;
use crate::InstanceId;
use crate::TICK_SECONDS;
use crate::Tick;
use crate::catalog::Stats;
use crate::catalog::UnitTemplate;
use serde::Serialize;

/// Which half of the arena a unit fights for. Home occupies rows 0-3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Team {
    Home,
    Away,
}

impl Team {
    pub fn other(self) -> Self {
        match self {
            Self::Home => Self::Away,
            Self::Away => Self::Home,
        }
    }
}

/// Whole ticks needed to span a duration in seconds.
pub fn ticks(seconds: f32) -> i32 {
    (seconds / TICK_SECONDS).ceil() as i32
}

/// One combatant for the lifetime of a single simulation. Owned by the
/// simulator and never escapes it.
#[derive(Debug, Clone)]
pub struct CombatUnit {
    pub id: InstanceId,
    pub template: &'static UnitTemplate,
    pub star: u8,
    pub team: Team,
    pub pos: Hex,
    pub stats: Stats,
    pub health: f32,
    pub mana: f32,
    pub alive: bool,
    pub target: Option<usize>,
    pub attack_cooldown: i32,
    pub move_cooldown: i32,
    pub arrival_tick: Tick,
    pub stuck: u32,
}

impl CombatUnit {
    pub fn new(
        id: InstanceId,
        template: &'static UnitTemplate,
        star: u8,
        team: Team,
        pos: Hex,
        stats: Stats,
    ) -> Self {
        Self {
            id,
            template,
            star,
            team,
            pos,
            health: stats.health,
            mana: 0.0,
            stats,
            alive: true,
            target: None,
            attack_cooldown: 0,
            move_cooldown: 0,
            arrival_tick: 0,
            stuck: 0,
        }
    }

    pub fn range(&self) -> i32 {
        self.stats.range.round() as i32
    }
    pub fn is_ranged(&self) -> bool {
        self.range() > 1
    }
    /// Whether the unit has settled on its tile (not mid-step).
    pub fn arrived(&self, now: Tick) -> bool {
        self.arrival_tick <= now
    }
    pub fn can_cast(&self) -> bool {
        self.stats.mana > 0.0 && self.mana >= self.stats.mana
    }
    /// Ticks in a full attack period at current attack speed.
    pub fn attack_period(&self) -> i32 {
        ticks(1.0 / self.stats.attack_speed)
    }
    /// Ticks until an attack started now connects.
    pub fn hit_delay(&self) -> i32 {
        ticks(1.0 / self.stats.attack_speed * crate::HIT_FRACTION)
    }
    /// Ticks spent crossing one tile at current move speed.
    pub fn step_ticks(&self) -> i32 {
        ticks(1.0 / self.stats.move_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_conversion_rounds_up() {
        assert_eq!(ticks(1.0), 20);
        assert_eq!(ticks(0.05), 1);
        assert_eq!(ticks(0.051), 2);
    }

    #[test]
    fn attack_timing_follows_attack_speed() {
        let template = crate::catalog::Catalog::get().unit("footman").expect("footman");
        let stats = template.stats_at(1);
        let unit = CombatUnit::new(1, template, 1, Team::Home, Hex::new(0, 0), stats);
        // 0.7 attacks/sec: period 1/0.7 ~ 1.4286s -> 29 ticks, hit at 0.4 of it.
        assert_eq!(unit.attack_period(), 29);
        assert_eq!(unit.hit_delay(), 12);
        assert!(!unit.is_ranged());
    }
}
