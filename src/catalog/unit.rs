use super::stats::StatBonus;
use super::stats::Stats;
use serde::Serialize;

/// Whether a unit's hits check armor or magic resist on the defender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Affinity {
    Physical,
    Magical,
}

/// Cast descriptor. Units without one fall back to the default cast
/// (tripled auto damage over a one second animation).
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ability {
    pub name: &'static str,
    pub damage_mult: f32,
    pub seconds: f32,
}

/// Immutable unit definition. Cost tier 1-5 for shop units, 0 for
/// encounter-only units.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub cost: u8,
    pub traits: &'static [&'static str],
    pub affinity: Affinity,
    pub base: Stats,
    pub blessed: Option<StatBonus>,
    pub ability: Option<Ability>,
    /// Loot tag rolled into a reward when this unit dies in an encounter.
    pub drops: Option<&'static str>,
}

impl UnitTemplate {
    /// Star-scaled base stats. The multiplier applies to the stats that
    /// grow with copies (health, attack, ability power); rates, ranges
    /// and mitigation are star-invariant.
    pub fn stats_at(&self, star: u8) -> Stats {
        let mult = super::schedule::star_multiplier(star);
        Stats {
            health: self.base.health * mult,
            attack: self.base.attack * mult,
            ability_power: self.base.ability_power * mult,
            ..self.base
        }
    }
    pub fn has_trait(&self, id: &str) -> bool {
        self.traits.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::Catalog;
    #[test]
    fn star_scaling_hits_damage_stats_only() {
        let unit = Catalog::get().unit("footman").expect("footman exists");
        let one = unit.stats_at(1);
        let two = unit.stats_at(2);
        assert_eq!(two.health, one.health * 1.5);
        assert_eq!(two.attack, one.attack * 1.5);
        assert_eq!(two.attack_speed, one.attack_speed);
        assert_eq!(two.range, one.range);
    }
}
