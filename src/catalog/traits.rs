use super::stats::StatBonus;
use serde::Serialize;

/// One breakpoint tier of a trait: a unique-unit count threshold plus the
/// bonuses unlocked at it. Unit-scoped bonuses apply only to units that
/// carry the trait; team-scoped bonuses apply to every ally.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraitTier {
    pub count: usize,
    pub unit_bonuses: &'static [StatBonus],
    pub team_bonuses: &'static [StatBonus],
}

/// Trait definition with ordered breakpoint tiers. A unique trait has a
/// single one-unit tier.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraitDef {
    pub id: &'static str,
    pub name: &'static str,
    pub tiers: &'static [TraitTier],
}

impl TraitDef {
    /// Index of the highest tier whose threshold is met by `count`
    /// distinct board units carrying the trait.
    pub fn active_tier(&self, count: usize) -> Option<usize> {
        self.tiers
            .iter()
            .enumerate()
            .rev()
            .find(|(_, tier)| count >= tier.count)
            .map(|(i, _)| i)
    }
    pub fn is_unique(&self) -> bool {
        self.tiers.len() == 1 && self.tiers[0].count == 1
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::Catalog;
    #[test]
    fn tier_selection_is_highest_met_threshold() {
        let def = Catalog::get().traitdef("ironclad").expect("ironclad");
        assert_eq!(def.active_tier(0), None);
        assert_eq!(def.active_tier(1), None);
        assert_eq!(def.active_tier(2), Some(0));
        assert_eq!(def.active_tier(3), Some(0));
        assert_eq!(def.active_tier(4), Some(1));
        assert_eq!(def.active_tier(9), Some(1));
    }
    #[test]
    fn unique_trait_has_single_one_count_tier() {
        let def = Catalog::get().traitdef("sovereign").expect("sovereign");
        assert!(def.is_unique());
        assert_eq!(def.active_tier(1), Some(0));
    }
}
