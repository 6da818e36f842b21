//! Immutable content tables: units, traits, items, crests, the round
//! schedule, shop odds, and the economy curves. Loaded and validated once
//! at startup; everything else borrows `&'static` template references.

mod crest;
mod data;
mod item;
mod schedule;
mod stats;
mod traits;
mod unit;

pub use crest::*;
pub use item::*;
pub use schedule::*;
pub use stats::*;
pub use traits::*;
pub use unit::*;

use std::collections::HashMap;
use std::sync::OnceLock;

/// Indexed view over the static tables. Obtain through [`Catalog::get`];
/// construction validates cross-references and panics on corrupt data, so
/// a bad build refuses to start.
pub struct Catalog {
    units: HashMap<&'static str, &'static UnitTemplate>,
    traits: HashMap<&'static str, &'static TraitDef>,
    items: HashMap<&'static str, &'static ItemTemplate>,
    crests: HashMap<&'static str, &'static CrestTemplate>,
    by_cost: [Vec<&'static UnitTemplate>; 6],
    members: HashMap<&'static str, Vec<&'static str>>,
    recipes: HashMap<(&'static str, &'static str), &'static ItemTemplate>,
}

static CATALOG: OnceLock<Catalog> = OnceLock::new();

impl Catalog {
    pub fn get() -> &'static Self {
        CATALOG.get_or_init(Self::build)
    }

    fn build() -> Self {
        let mut by_cost: [Vec<&'static UnitTemplate>; 6] = Default::default();
        let mut members: HashMap<&'static str, Vec<&'static str>> = HashMap::new();
        for unit in data::UNITS {
            assert!(unit.cost <= 5, "unit {} has cost tier out of range", unit.id);
            by_cost[unit.cost as usize].push(unit);
            for id in unit.traits {
                members.entry(id).or_default().push(unit.id);
            }
        }
        let mut recipes = HashMap::new();
        for item in data::ITEMS {
            if let Some((a, b)) = item.recipe {
                recipes.insert(Self::recipe_key(a, b), item);
            }
        }
        let catalog = Self {
            units: data::UNITS.iter().map(|u| (u.id, u)).collect(),
            traits: data::TRAITS.iter().map(|t| (t.id, t)).collect(),
            items: data::ITEMS.iter().map(|i| (i.id, i)).collect(),
            crests: data::CRESTS.iter().map(|c| (c.id, c)).collect(),
            by_cost,
            members,
            recipes,
        };
        catalog.validate();
        catalog
    }

    fn validate(&self) {
        for unit in data::UNITS {
            for id in unit.traits {
                assert!(self.traits.contains_key(id), "unit {} names unknown trait {}", unit.id, id);
            }
        }
        for def in data::TRAITS {
            assert!(!def.tiers.is_empty(), "trait {} has no tiers", def.id);
            assert!(
                def.tiers.windows(2).all(|w| w[0].count < w[1].count),
                "trait {} tiers must ascend",
                def.id
            );
            assert!(
                self.members.contains_key(def.id),
                "trait {} has no contributing units",
                def.id
            );
        }
        for item in data::ITEMS {
            if let Some((a, b)) = item.recipe {
                for id in [a, b] {
                    let part = self.items.get(id).unwrap_or_else(|| {
                        panic!("recipe for {} names unknown component {}", item.id, id)
                    });
                    assert!(
                        part.kind == ItemKind::Component,
                        "recipe for {} uses non-component {}",
                        item.id,
                        id
                    );
                }
            }
            if item.kind == ItemKind::Consumable {
                assert!(item.effect.is_some(), "consumable {} has no effect", item.id);
            }
        }
        for kind in [RoundKind::PveIntro, RoundKind::PveLoot, RoundKind::PveBoss] {
            for (id, _, _) in encounter_board(kind) {
                assert!(self.units.contains_key(id), "encounter names unknown unit {}", id);
            }
        }
    }

    fn recipe_key(a: &'static str, b: &'static str) -> (&'static str, &'static str) {
        if a <= b { (a, b) } else { (b, a) }
    }
}

impl Catalog {
    pub fn unit(&self, id: &str) -> Option<&'static UnitTemplate> {
        self.units.get(id).copied()
    }
    pub fn traitdef(&self, id: &str) -> Option<&'static TraitDef> {
        self.traits.get(id).copied()
    }
    pub fn item(&self, id: &str) -> Option<&'static ItemTemplate> {
        self.items.get(id).copied()
    }
    pub fn crest(&self, id: &str) -> Option<&'static CrestTemplate> {
        self.crests.get(id).copied()
    }
    pub fn units(&self) -> impl Iterator<Item = &'static UnitTemplate> {
        data::UNITS.iter()
    }
    pub fn items(&self) -> &'static [ItemTemplate] {
        data::ITEMS
    }
    pub fn traitdefs(&self) -> &'static [TraitDef] {
        data::TRAITS
    }
    pub fn elements(&self) -> &'static [&'static str] {
        data::ELEMENTS
    }
    /// Shop units at a cost tier 1..5.
    pub fn units_of_cost(&self, cost: u8) -> &[&'static UnitTemplate] {
        match cost {
            1..=5 => &self.by_cost[cost as usize],
            _ => &[],
        }
    }
    /// Ids of the units contributing to a trait.
    pub fn trait_members(&self, id: &str) -> &[&'static str] {
        self.members.get(id).map(Vec::as_slice).unwrap_or(&[])
    }
    /// The combined item for an unordered component pair.
    pub fn recipe(&self, a: &str, b: &str) -> Option<&'static ItemTemplate> {
        let a = self.items.get(a)?.id;
        let b = self.items.get(b)?.id;
        self.recipes.get(&Self::recipe_key(a, b)).copied()
    }
    pub fn components(&self) -> Vec<&'static ItemTemplate> {
        data::ITEMS.iter().filter(|i| i.kind == ItemKind::Component).collect()
    }
    /// Items the merchant may offer: anything but raw components.
    pub fn merchant_items(&self) -> Vec<&'static ItemTemplate> {
        data::ITEMS.iter().filter(|i| i.kind != ItemKind::Component).collect()
    }
    pub fn combined_items(&self) -> Vec<&'static ItemTemplate> {
        data::ITEMS.iter().filter(|i| i.kind == ItemKind::Combined).collect()
    }
    pub fn minor_crests(&self) -> Vec<&'static CrestTemplate> {
        data::CRESTS.iter().filter(|c| c.kind == CrestKind::Minor).collect()
    }
    pub fn major_crests(&self) -> Vec<&'static CrestTemplate> {
        data::CRESTS.iter().filter(|c| c.kind == CrestKind::Major).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn catalog_builds_and_validates() {
        let catalog = Catalog::get();
        assert!(catalog.unit("footman").is_some());
        assert!(catalog.unit("nonesuch").is_none());
        assert!(!catalog.units_of_cost(1).is_empty());
        assert!(catalog.units_of_cost(0).is_empty());
    }
    #[test]
    fn every_shop_tier_is_populated() {
        let catalog = Catalog::get();
        for cost in 1..=5u8 {
            assert!(!catalog.units_of_cost(cost).is_empty(), "tier {} empty", cost);
        }
    }
    #[test]
    fn trait_membership_is_derived_from_units() {
        let catalog = Catalog::get();
        let members = catalog.trait_members("ironclad");
        assert!(members.contains(&"footman"));
        assert!(members.contains(&"knight"));
        assert!(!members.contains(&"archer"));
    }
    #[test]
    fn unique_trait_has_one_member() {
        assert_eq!(Catalog::get().trait_members("sovereign").len(), 1);
    }
}
