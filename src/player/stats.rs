use super::state::PlayerState;
use crate::InstanceId;
use crate::catalog::Catalog;
use crate::catalog::Stats;
use crate::catalog::rank_multiplier;
use serde::Serialize;
use std::collections::HashSet;

/// A trait's standing on the board: how many distinct templates carry it
/// and which breakpoint tier (if any) is live.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveTrait {
    pub id: &'static str,
    pub count: usize,
    pub tier: Option<usize>,
}

impl PlayerState {
    /// Recomputes the active-trait summary from the board. Counts are
    /// over unique unit templates, so duplicate copies add nothing.
    pub fn refresh_traits(&mut self) {
        let catalog = Catalog::get();
        let mut templates = HashSet::new();
        for (unit, _, _) in self.board_units() {
            templates.insert(unit.template.id);
        }
        let mut active = Vec::new();
        for def in catalog.traitdefs() {
            let count = templates.iter().filter(|id| catalog.unit(id).is_some_and(|u| u.has_trait(def.id))).count();
            if count > 0 {
                active.push(ActiveTrait {
                    id: def.id,
                    count,
                    tier: def.active_tier(count),
                });
            }
        }
        self.active_traits = active;
    }

    /// Full stat composition for one owned unit, in pipeline order:
    /// star-scaled base, unit-scoped trait bonuses, team-scoped trait
    /// bonuses (plus blessed auras from fielded units), item bonuses,
    /// then rank-multiplied crest bonuses.
    pub fn composed_stats(&self, id: InstanceId) -> Option<Stats> {
        let catalog = Catalog::get();
        let unit = self.units.get(&id)?;
        let mut stats = unit.base_stats();
        for active in &self.active_traits {
            let Some(tier) = active.tier else { continue };
            let Some(def) = catalog.traitdef(active.id) else { continue };
            if unit.template.has_trait(active.id) {
                stats.apply_all(def.tiers[tier].unit_bonuses, 1.0);
            }
        }
        for active in &self.active_traits {
            let Some(tier) = active.tier else { continue };
            let Some(def) = catalog.traitdef(active.id) else { continue };
            stats.apply_all(def.tiers[tier].team_bonuses, 1.0);
        }
        for (fielded, _, _) in self.board_units() {
            if let Some(aura) = fielded.template.blessed {
                stats.apply(aura, 1.0);
            }
        }
        for item in &unit.items {
            stats.apply_all(item.bonuses, 1.0);
        }
        for owned in &self.minor_crests {
            stats.apply_all(owned.crest.bonuses, rank_multiplier(owned.rank));
        }
        if let Some(major) = self.major_crest {
            stats.apply_all(major.bonuses, 1.0);
        }
        Some(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::OwnedCrest;
    use crate::player::UnitInstance;

    fn fielded(player: &mut PlayerState, id: InstanceId, unit: &str, x: usize, y: usize) {
        let template = Catalog::get().unit(unit).expect("unit exists");
        player.add_to_bench(UnitInstance::new(id, template)).expect("bench room");
        player.place_unit(id, x, y).expect("place");
    }

    fn fixture() -> PlayerState {
        let mut player = PlayerState::new(1, "tester".into(), 0);
        player.level = 6;
        player
    }

    #[test]
    fn duplicate_templates_count_once() {
        let mut player = fixture();
        fielded(&mut player, 1, "footman", 0, 0);
        fielded(&mut player, 2, "footman", 1, 0);
        let ironclad = player
            .active_traits
            .iter()
            .find(|t| t.id == "ironclad")
            .expect("trait counted");
        assert_eq!(ironclad.count, 1);
        assert_eq!(ironclad.tier, None);
    }

    #[test]
    fn unit_scoped_bonus_hits_carriers_only() {
        let mut player = fixture();
        fielded(&mut player, 1, "footman", 0, 0);
        fielded(&mut player, 2, "squire", 1, 0);
        fielded(&mut player, 3, "archer", 2, 0);
        let footman = player.composed_stats(1).expect("stats");
        let archer = player.composed_stats(3).expect("stats");
        let footman_base = player.units[&1].base_stats();
        let archer_base = player.units[&3].base_stats();
        assert_eq!(footman.armor, footman_base.armor + 20.0, "ironclad pair live");
        assert_eq!(archer.armor, archer_base.armor, "archer is not ironclad");
    }

    #[test]
    fn team_scoped_bonus_hits_everyone() {
        let mut player = fixture();
        fielded(&mut player, 1, "footman", 0, 0);
        fielded(&mut player, 2, "acolyte", 1, 0);
        fielded(&mut player, 3, "archer", 2, 0);
        let archer = player.composed_stats(3).expect("stats");
        let base = player.units[&3].base_stats();
        assert_eq!(archer.armor, base.armor + 10.0, "warden pair is team-wide");
        assert_eq!(archer.magic_resist, base.magic_resist + 10.0);
    }

    #[test]
    fn blessed_aura_reaches_allies_only_while_fielded() {
        let mut player = fixture();
        fielded(&mut player, 1, "archer", 0, 0);
        let knight = Catalog::get().unit("dragon_knight").expect("dragon knight");
        player.add_to_bench(UnitInstance::new(2, knight)).expect("bench");
        let before = player.composed_stats(1).expect("stats");
        player.place_unit(2, 1, 0).expect("place");
        let after = player.composed_stats(1).expect("stats");
        assert_eq!(after.armor, before.armor + 10.0);
    }

    #[test]
    fn items_then_crests_round_out_the_pipeline() {
        let mut player = fixture();
        fielded(&mut player, 1, "archer", 0, 0);
        let base = player.units[&1].base_stats();
        let sword = Catalog::get().item("sword").expect("sword");
        player.units.get_mut(&1).expect("unit").items.push(sword);
        let crest = Catalog::get().crest("crest_ruin").expect("crest");
        player.minor_crests.push(OwnedCrest { crest, rank: 2 });
        let stats = player.composed_stats(1).expect("stats");
        assert_eq!(stats.attack, base.attack + 15.0 + 5.0 * 1.5);
    }

    #[test]
    fn attack_speed_items_stack_multiplicatively() {
        let mut player = fixture();
        fielded(&mut player, 1, "footman", 0, 0);
        let base = player.units[&1].base_stats();
        let bow = Catalog::get().item("bow").expect("bow");
        let unit = player.units.get_mut(&1).expect("unit");
        unit.items.push(bow);
        unit.items.push(bow);
        let stats = player.composed_stats(1).expect("stats");
        let expected = base.attack_speed * 1.15 * 1.15;
        assert!((stats.attack_speed - expected).abs() < 1e-6);
    }
}
