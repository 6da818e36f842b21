use super::unit::CombatUnit;
use super::unit::Team;
use crate::Health;
use crate::InstanceId;
use crate::Tick;
use crate::catalog::Stats;
use serde::Serialize;

/// One entry of the ordered combat log. Identical inputs produce a
/// byte-identical stream, so clients can replay deterministically.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CombatEvent {
    CombatStart {
        tick: Tick,
        units: Vec<Roster>,
    },
    UnitMove {
        tick: Tick,
        unit: InstanceId,
        x: i32,
        y: i32,
        duration: f32,
    },
    UnitAttack {
        tick: Tick,
        attacker: InstanceId,
        target: InstanceId,
        damage: i32,
        landing_tick: Tick,
    },
    UnitAbility {
        tick: Tick,
        attacker: InstanceId,
        target: InstanceId,
        name: &'static str,
        damage: i32,
        landing_tick: Tick,
        duration: f32,
    },
    UnitDamage {
        tick: Tick,
        target: InstanceId,
        damage: i32,
        health: f32,
    },
    UnitDeath {
        tick: Tick,
        target: InstanceId,
        killer: InstanceId,
        #[serde(skip_serializing_if = "Option::is_none")]
        loot: Option<&'static str>,
    },
    CombatEnd {
        tick: Tick,
        winner: Team,
        survivors: usize,
        damage: Health,
    },
}

/// Full stat line for one combatant, carried in the opening event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Roster {
    pub id: InstanceId,
    pub unit: &'static str,
    pub name: &'static str,
    pub team: Team,
    pub star: u8,
    pub x: i32,
    pub y: i32,
    pub stats: Stats,
}

impl From<&CombatUnit> for Roster {
    fn from(unit: &CombatUnit) -> Self {
        Self {
            id: unit.id,
            unit: unit.template.id,
            name: unit.template.name,
            team: unit.team,
            star: unit.star,
            x: unit.pos.x,
            y: unit.pos.y,
            stats: unit.stats,
        }
    }
}

impl CombatEvent {
    pub fn tick(&self) -> Tick {
        match self {
            Self::CombatStart { tick, .. }
            | Self::UnitMove { tick, .. }
            | Self::UnitAttack { tick, .. }
            | Self::UnitAbility { tick, .. }
            | Self::UnitDamage { tick, .. }
            | Self::UnitDeath { tick, .. }
            | Self::CombatEnd { tick, .. } => *tick,
        }
    }
}
