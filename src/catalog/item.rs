use super::stats::StatBonus;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemKind {
    /// Building block granting a small flat bonus; pairs combine.
    Component,
    /// Product of an unordered two-component recipe.
    Combined,
    /// Not equippable; opens a pending selection when used.
    Consumable,
}

/// What a consumable offers when used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ConsumableEffect {
    MinorCrestChoice,
    ComponentChoice,
}

#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: ItemKind,
    pub bonuses: &'static [StatBonus],
    /// Component pair for combined items, order-insensitive.
    pub recipe: Option<(&'static str, &'static str)>,
    pub effect: Option<ConsumableEffect>,
}

impl ItemTemplate {
    pub fn equippable(&self) -> bool {
        self.kind != ItemKind::Consumable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    #[test]
    fn recipe_lookup_is_unordered() {
        let catalog = Catalog::get();
        let ab = catalog.recipe("sword", "bow").expect("recipe exists");
        let ba = catalog.recipe("bow", "sword").expect("recipe exists");
        assert_eq!(ab.id, ba.id);
        assert_eq!(ab.kind, ItemKind::Combined);
    }
    #[test]
    fn consumables_are_not_equippable() {
        let catalog = Catalog::get();
        assert!(
            catalog
                .items()
                .iter()
                .filter(|i| i.kind == ItemKind::Consumable)
                .all(|i| !i.equippable())
        );
    }
}
