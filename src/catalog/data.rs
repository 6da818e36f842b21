//! Shipped balance tables. Shapes are part of the engine contract; the
//! numbers here are tuning inputs.

use super::crest::CrestKind;
use super::crest::CrestTemplate;
use super::item::ConsumableEffect;
use super::item::ItemKind;
use super::item::ItemTemplate;
use super::stats::StatBonus;
use super::stats::StatKind;
use super::stats::Stats;
use super::traits::TraitDef;
use super::traits::TraitTier;
use super::unit::Ability;
use super::unit::Affinity;
use super::unit::UnitTemplate;

const fn stats(
    health: f32,
    attack: f32,
    ability_power: f32,
    armor: f32,
    magic_resist: f32,
    attack_speed: f32,
    range: f32,
    mana: f32,
    move_speed: f32,
) -> Stats {
    Stats {
        health,
        attack,
        ability_power,
        armor,
        magic_resist,
        attack_speed,
        range,
        mana,
        move_speed,
        crit_chance: 0.1,
        crit_damage: 1.5,
    }
}

const fn unit(
    id: &'static str,
    name: &'static str,
    cost: u8,
    traits: &'static [&'static str],
    affinity: Affinity,
    base: Stats,
) -> UnitTemplate {
    UnitTemplate {
        id,
        name,
        cost,
        traits,
        affinity,
        base,
        blessed: None,
        ability: None,
        drops: None,
    }
}

pub static ELEMENTS: &[&str] = &["ember", "frost", "gale", "stone"];

#[rustfmt::skip]
pub static UNITS: &[UnitTemplate] = &[
    // tier 1
    unit("footman", "Footman", 1, &["ironclad", "warden"], Affinity::Physical,
        stats(550.0, 50.0, 0.0, 30.0, 20.0, 0.7, 1.0, 80.0, 1.4)),
    unit("squire", "Squire", 1, &["ironclad", "swiftblade"], Affinity::Physical,
        stats(500.0, 55.0, 0.0, 25.0, 20.0, 0.75, 1.0, 90.0, 1.4)),
    unit("archer", "Archer", 1, &["deadeye", "swiftblade"], Affinity::Physical,
        stats(420.0, 45.0, 0.0, 15.0, 15.0, 0.8, 3.0, 70.0, 1.2)),
    unit("acolyte", "Acolyte", 1, &["arcanist", "warden"], Affinity::Magical,
        stats(450.0, 40.0, 20.0, 15.0, 25.0, 0.65, 2.0, 60.0, 1.2)),
    unit("hunter", "Hunter", 1, &["deadeye", "wildheart"], Affinity::Physical,
        stats(480.0, 48.0, 0.0, 18.0, 18.0, 0.7, 2.0, 80.0, 1.3)),
    // tier 2
    unit("spearman", "Spearman", 2, &["warden", "swiftblade"], Affinity::Physical,
        stats(650.0, 60.0, 0.0, 35.0, 25.0, 0.75, 2.0, 80.0, 1.4)),
    unit("pyromancer", "Pyromancer", 2, &["arcanist", "attuned"], Affinity::Magical,
        stats(500.0, 45.0, 35.0, 15.0, 30.0, 0.7, 3.0, 60.0, 1.1)),
    unit("duelist", "Duelist", 2, &["deadeye", "swiftblade"], Affinity::Physical,
        stats(580.0, 65.0, 0.0, 25.0, 25.0, 0.85, 1.0, 90.0, 1.6)),
    unit("druid", "Druid", 2, &["wildheart", "attuned"], Affinity::Magical,
        stats(620.0, 50.0, 30.0, 25.0, 35.0, 0.65, 2.0, 70.0, 1.2)),
    // tier 3
    unit("knight", "Knight", 3, &["ironclad", "warden"], Affinity::Physical,
        stats(900.0, 70.0, 0.0, 50.0, 40.0, 0.65, 1.0, 100.0, 1.3)),
    unit("stormcaller", "Stormcaller", 3, &["arcanist", "attuned"], Affinity::Magical,
        stats(600.0, 50.0, 55.0, 20.0, 40.0, 0.7, 3.0, 70.0, 1.1)),
    unit("berserker", "Berserker", 3, &["wildheart", "swiftblade"], Affinity::Physical,
        stats(820.0, 85.0, 0.0, 30.0, 25.0, 0.9, 1.0, 110.0, 1.7)),
    unit("ranger", "Ranger", 3, &["deadeye", "wildheart"], Affinity::Physical,
        stats(560.0, 75.0, 0.0, 18.0, 18.0, 0.8, 4.0, 80.0, 1.2)),
    // tier 4
    unit("warlord", "Warlord", 4, &["ironclad", "swiftblade"], Affinity::Physical,
        stats(1150.0, 95.0, 0.0, 55.0, 45.0, 0.8, 1.0, 100.0, 1.5)),
    unit("archmage", "Archmage", 4, &["arcanist", "attuned"], Affinity::Magical,
        stats(750.0, 55.0, 85.0, 25.0, 50.0, 0.75, 3.0, 60.0, 1.1)),
    unit("beastmaster", "Beastmaster", 4, &["wildheart", "deadeye"], Affinity::Physical,
        stats(1000.0, 90.0, 0.0, 40.0, 35.0, 0.85, 2.0, 90.0, 1.5)),
    // tier 5
    UnitTemplate {
        id: "dragon_knight",
        name: "Dragon Knight",
        cost: 5,
        traits: &["ironclad", "wildheart"],
        affinity: Affinity::Physical,
        base: stats(1500.0, 110.0, 0.0, 65.0, 55.0, 0.8, 1.0, 120.0, 1.5),
        blessed: Some(StatBonus::new(StatKind::Armor, 10.0)),
        ability: Some(Ability { name: "Dragonfire Sweep", damage_mult: 2.5, seconds: 1.2 }),
        drops: None,
    },
    UnitTemplate {
        id: "celestial_sovereign",
        name: "Celestial Sovereign",
        cost: 5,
        traits: &["sovereign", "arcanist"],
        affinity: Affinity::Magical,
        base: stats(1100.0, 70.0, 120.0, 35.0, 60.0, 0.75, 3.0, 80.0, 1.2),
        blessed: Some(StatBonus::new(StatKind::AbilityPower, 10.0)),
        ability: Some(Ability { name: "Starfall", damage_mult: 3.5, seconds: 1.5 }),
        drops: None,
    },
    // encounter-only
    unit("wolf", "Wolf", 0, &[], Affinity::Physical,
        stats(400.0, 40.0, 0.0, 10.0, 10.0, 0.7, 1.0, 0.0, 1.5)),
    unit("direwolf", "Direwolf", 0, &[], Affinity::Physical,
        stats(900.0, 70.0, 0.0, 30.0, 25.0, 0.75, 1.0, 0.0, 1.5)),
    UnitTemplate {
        id: "gilded_golem",
        name: "Gilded Golem",
        cost: 0,
        traits: &[],
        affinity: Affinity::Physical,
        base: stats(800.0, 50.0, 0.0, 40.0, 40.0, 0.5, 1.0, 0.0, 1.0),
        blessed: None,
        ability: None,
        drops: Some("trinket"),
    },
    UnitTemplate {
        id: "obsidian_dragon",
        name: "Obsidian Dragon",
        cost: 0,
        traits: &[],
        affinity: Affinity::Magical,
        base: stats(3200.0, 120.0, 80.0, 50.0, 50.0, 0.6, 2.0, 100.0, 1.2),
        blessed: None,
        ability: Some(Ability { name: "Obsidian Breath", damage_mult: 3.0, seconds: 1.5 }),
        drops: Some("hoard"),
    },
];

#[rustfmt::skip]
pub static TRAITS: &[TraitDef] = &[
    TraitDef { id: "ironclad", name: "Ironclad", tiers: &[
        TraitTier { count: 2, unit_bonuses: &[StatBonus::new(StatKind::Armor, 20.0)], team_bonuses: &[] },
        TraitTier { count: 4, unit_bonuses: &[StatBonus::new(StatKind::Armor, 45.0)], team_bonuses: &[] },
    ]},
    TraitDef { id: "warden", name: "Warden", tiers: &[
        TraitTier { count: 2, unit_bonuses: &[], team_bonuses: &[
            StatBonus::new(StatKind::Armor, 10.0),
            StatBonus::new(StatKind::MagicResist, 10.0),
        ]},
        TraitTier { count: 4, unit_bonuses: &[], team_bonuses: &[
            StatBonus::new(StatKind::Armor, 25.0),
            StatBonus::new(StatKind::MagicResist, 25.0),
        ]},
    ]},
    TraitDef { id: "swiftblade", name: "Swiftblade", tiers: &[
        TraitTier { count: 2, unit_bonuses: &[StatBonus::new(StatKind::AttackSpeed, 15.0)], team_bonuses: &[] },
        TraitTier { count: 4, unit_bonuses: &[StatBonus::new(StatKind::AttackSpeed, 35.0)], team_bonuses: &[] },
    ]},
    TraitDef { id: "arcanist", name: "Arcanist", tiers: &[
        TraitTier { count: 2, unit_bonuses: &[], team_bonuses: &[StatBonus::new(StatKind::AbilityPower, 10.0)] },
        TraitTier { count: 4, unit_bonuses: &[], team_bonuses: &[StatBonus::new(StatKind::AbilityPower, 25.0)] },
    ]},
    TraitDef { id: "deadeye", name: "Deadeye", tiers: &[
        TraitTier { count: 2, unit_bonuses: &[StatBonus::new(StatKind::CritChance, 0.10)], team_bonuses: &[] },
        TraitTier { count: 4, unit_bonuses: &[
            StatBonus::new(StatKind::CritChance, 0.25),
            StatBonus::new(StatKind::CritDamage, 0.25),
        ], team_bonuses: &[] },
    ]},
    TraitDef { id: "wildheart", name: "Wildheart", tiers: &[
        TraitTier { count: 2, unit_bonuses: &[StatBonus::new(StatKind::Health, 100.0)], team_bonuses: &[] },
        TraitTier { count: 4, unit_bonuses: &[StatBonus::new(StatKind::Health, 250.0)], team_bonuses: &[] },
    ]},
    TraitDef { id: "attuned", name: "Attuned", tiers: &[
        TraitTier { count: 2, unit_bonuses: &[StatBonus::new(StatKind::AbilityPower, 15.0)], team_bonuses: &[] },
        TraitTier { count: 3, unit_bonuses: &[StatBonus::new(StatKind::AbilityPower, 30.0)], team_bonuses: &[] },
    ]},
    TraitDef { id: "sovereign", name: "Sovereign", tiers: &[
        TraitTier { count: 1, unit_bonuses: &[], team_bonuses: &[StatBonus::new(StatKind::Attack, 5.0)] },
    ]},
];

#[rustfmt::skip]
pub static ITEMS: &[ItemTemplate] = &[
    // components
    ItemTemplate { id: "sword", name: "Worn Sword", kind: ItemKind::Component,
        bonuses: &[StatBonus::new(StatKind::Attack, 15.0)], recipe: None, effect: None },
    ItemTemplate { id: "staff", name: "Apprentice Staff", kind: ItemKind::Component,
        bonuses: &[StatBonus::new(StatKind::AbilityPower, 15.0)], recipe: None, effect: None },
    ItemTemplate { id: "vest", name: "Chain Vest", kind: ItemKind::Component,
        bonuses: &[StatBonus::new(StatKind::Armor, 20.0)], recipe: None, effect: None },
    ItemTemplate { id: "cloak", name: "Silver Cloak", kind: ItemKind::Component,
        bonuses: &[StatBonus::new(StatKind::MagicResist, 20.0)], recipe: None, effect: None },
    ItemTemplate { id: "bow", name: "Recurve Bow", kind: ItemKind::Component,
        bonuses: &[StatBonus::new(StatKind::AttackSpeed, 15.0)], recipe: None, effect: None },
    ItemTemplate { id: "heart", name: "Giant's Heart", kind: ItemKind::Component,
        bonuses: &[StatBonus::new(StatKind::Health, 150.0)], recipe: None, effect: None },
    // combined
    ItemTemplate { id: "greatsword", name: "Greatsword", kind: ItemKind::Combined,
        bonuses: &[StatBonus::new(StatKind::Attack, 40.0)],
        recipe: Some(("sword", "sword")), effect: None },
    ItemTemplate { id: "swift_saber", name: "Swift Saber", kind: ItemKind::Combined,
        bonuses: &[
            StatBonus::new(StatKind::Attack, 15.0),
            StatBonus::new(StatKind::AttackSpeed, 25.0),
        ],
        recipe: Some(("sword", "bow")), effect: None },
    ItemTemplate { id: "archstaff", name: "Archstaff", kind: ItemKind::Combined,
        bonuses: &[StatBonus::new(StatKind::AbilityPower, 40.0)],
        recipe: Some(("staff", "staff")), effect: None },
    ItemTemplate { id: "spellblade", name: "Spellblade", kind: ItemKind::Combined,
        bonuses: &[
            StatBonus::new(StatKind::Attack, 20.0),
            StatBonus::new(StatKind::AbilityPower, 20.0),
        ],
        recipe: Some(("sword", "staff")), effect: None },
    ItemTemplate { id: "aegis", name: "Aegis", kind: ItemKind::Combined,
        bonuses: &[
            StatBonus::new(StatKind::Armor, 25.0),
            StatBonus::new(StatKind::MagicResist, 25.0),
        ],
        recipe: Some(("vest", "cloak")), effect: None },
    ItemTemplate { id: "bulwark", name: "Bulwark", kind: ItemKind::Combined,
        bonuses: &[
            StatBonus::new(StatKind::Health, 250.0),
            StatBonus::new(StatKind::Armor, 15.0),
        ],
        recipe: Some(("heart", "vest")), effect: None },
    ItemTemplate { id: "titan_heart", name: "Titan Heart", kind: ItemKind::Combined,
        bonuses: &[StatBonus::new(StatKind::Health, 350.0)],
        recipe: Some(("heart", "heart")), effect: None },
    ItemTemplate { id: "rapidfire", name: "Rapidfire Bow", kind: ItemKind::Combined,
        bonuses: &[StatBonus::new(StatKind::AttackSpeed, 45.0)],
        recipe: Some(("bow", "bow")), effect: None },
    ItemTemplate { id: "spirit_ward", name: "Spirit Ward", kind: ItemKind::Combined,
        bonuses: &[
            StatBonus::new(StatKind::Health, 200.0),
            StatBonus::new(StatKind::MagicResist, 20.0),
        ],
        recipe: Some(("heart", "cloak")), effect: None },
    // consumables
    ItemTemplate { id: "crest_cache", name: "Crest Cache", kind: ItemKind::Consumable,
        bonuses: &[], recipe: None, effect: Some(ConsumableEffect::MinorCrestChoice) },
    ItemTemplate { id: "forge_kit", name: "Forge Kit", kind: ItemKind::Consumable,
        bonuses: &[], recipe: None, effect: Some(ConsumableEffect::ComponentChoice) },
];

#[rustfmt::skip]
pub static CRESTS: &[CrestTemplate] = &[
    // minor
    CrestTemplate { id: "crest_iron", name: "Crest of Iron", kind: CrestKind::Minor,
        bonuses: &[StatBonus::new(StatKind::Armor, 8.0)] },
    CrestTemplate { id: "crest_storms", name: "Crest of Storms", kind: CrestKind::Minor,
        bonuses: &[StatBonus::new(StatKind::AttackSpeed, 6.0)] },
    CrestTemplate { id: "crest_vigor", name: "Crest of Vigor", kind: CrestKind::Minor,
        bonuses: &[StatBonus::new(StatKind::Health, 60.0)] },
    CrestTemplate { id: "crest_focus", name: "Crest of Focus", kind: CrestKind::Minor,
        bonuses: &[StatBonus::new(StatKind::AbilityPower, 8.0)] },
    CrestTemplate { id: "crest_ruin", name: "Crest of Ruin", kind: CrestKind::Minor,
        bonuses: &[StatBonus::new(StatKind::Attack, 5.0)] },
    CrestTemplate { id: "crest_wards", name: "Crest of Wards", kind: CrestKind::Minor,
        bonuses: &[StatBonus::new(StatKind::MagicResist, 8.0)] },
    // major
    CrestTemplate { id: "banner_colossus", name: "Banner of the Colossus", kind: CrestKind::Major,
        bonuses: &[
            StatBonus::new(StatKind::Health, 200.0),
            StatBonus::new(StatKind::Armor, 15.0),
        ] },
    CrestTemplate { id: "banner_tempest", name: "Banner of the Tempest", kind: CrestKind::Major,
        bonuses: &[StatBonus::new(StatKind::AttackSpeed, 20.0)] },
    CrestTemplate { id: "banner_archons", name: "Banner of the Archons", kind: CrestKind::Major,
        bonuses: &[StatBonus::new(StatKind::AbilityPower, 25.0)] },
    CrestTemplate { id: "banner_war", name: "Banner of War", kind: CrestKind::Major,
        bonuses: &[
            StatBonus::new(StatKind::Attack, 15.0),
            StatBonus::new(StatKind::CritChance, 0.10),
        ] },
    CrestTemplate { id: "banner_aegis", name: "Banner of the Aegis", kind: CrestKind::Major,
        bonuses: &[
            StatBonus::new(StatKind::Armor, 20.0),
            StatBonus::new(StatKind::MagicResist, 20.0),
        ] },
];
