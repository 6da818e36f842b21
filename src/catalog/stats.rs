use serde::Serialize;

/// Stat block shared by templates, composed units, and combat units.
/// Attack speed is attacks per second, range is hex tiles, move speed
/// is tiles per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub health: f32,
    pub attack: f32,
    pub ability_power: f32,
    pub armor: f32,
    pub magic_resist: f32,
    pub attack_speed: f32,
    pub range: f32,
    pub mana: f32,
    pub move_speed: f32,
    pub crit_chance: f32,
    pub crit_damage: f32,
}

/// Addressable stat for bonus dictionaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StatKind {
    Health,
    Attack,
    AbilityPower,
    Armor,
    MagicResist,
    AttackSpeed,
    Range,
    Mana,
    MoveSpeed,
    CritChance,
    CritDamage,
}

/// One entry of a bonus dictionary. Attack speed values are percentages
/// applied multiplicatively; everything else is a flat addition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatBonus {
    pub stat: StatKind,
    pub value: f32,
}

impl StatBonus {
    pub const fn new(stat: StatKind, value: f32) -> Self {
        Self { stat, value }
    }
}

impl Stats {
    pub const fn zero() -> Self {
        Self {
            health: 0.0,
            attack: 0.0,
            ability_power: 0.0,
            armor: 0.0,
            magic_resist: 0.0,
            attack_speed: 0.0,
            range: 0.0,
            mana: 0.0,
            move_speed: 0.0,
            crit_chance: 0.0,
            crit_damage: 0.0,
        }
    }
    /// Applies a single bonus, scaled by `multiplier` (crest ranks).
    pub fn apply(&mut self, bonus: StatBonus, multiplier: f32) {
        let value = bonus.value * multiplier;
        match bonus.stat {
            StatKind::Health => self.health += value,
            StatKind::Attack => self.attack += value,
            StatKind::AbilityPower => self.ability_power += value,
            StatKind::Armor => self.armor += value,
            StatKind::MagicResist => self.magic_resist += value,
            StatKind::AttackSpeed => self.attack_speed *= 1.0 + value / 100.0,
            StatKind::Range => self.range += value,
            StatKind::Mana => self.mana += value,
            StatKind::MoveSpeed => self.move_speed += value,
            StatKind::CritChance => self.crit_chance += value,
            StatKind::CritDamage => self.crit_damage += value,
        }
    }
    /// Applies a whole bonus dictionary at the given multiplier.
    pub fn apply_all(&mut self, bonuses: &[StatBonus], multiplier: f32) {
        for bonus in bonuses {
            self.apply(*bonus, multiplier);
        }
    }
}
