use super::state::PlayerState;
use crate::INVENTORY_SLOTS;
use crate::InstanceId;

impl PlayerState {
    /// Star-up check after a unit is introduced. Three same-template,
    /// same-star copies collapse into one upgraded instance: a
    /// board-resident copy is preferred as the survivor, then the
    /// introduced unit if it is on the board, then the first match in
    /// bench-then-board order. Upgrades chain transitively.
    pub fn merge_check(&mut self, introduced: InstanceId) -> bool {
        let Some(unit) = self.units.get(&introduced) else {
            return false;
        };
        let key = unit.key();
        if key.1 >= 3 {
            return false;
        }
        let others = self
            .instance_ids()
            .into_iter()
            .filter(|id| *id != introduced)
            .filter(|id| self.units.get(id).map(|u| u.key()) == Some(key))
            .collect::<Vec<_>>();
        if others.len() < 2 {
            return false;
        }
        let kept = others
            .iter()
            .copied()
            .find(|id| self.on_board(*id))
            .or_else(|| self.on_board(introduced).then_some(introduced))
            .unwrap_or(others[0]);
        let consumed = [introduced, others[0], others[1]]
            .into_iter()
            .filter(|id| *id != kept)
            .take(2)
            .collect::<Vec<_>>();
        for id in consumed {
            if let Some(mut eaten) = self.remove_unit(id) {
                for item in eaten.items.drain(..) {
                    if self.inventory.len() < INVENTORY_SLOTS {
                        self.inventory.push(item);
                    }
                }
            }
        }
        if let Some(survivor) = self.units.get_mut(&kept) {
            survivor.star_up();
        }
        self.refresh_traits();
        self.merge_check(kept);
        true
    }

    /// Re-runs the merge check across every owned unit until a full pass
    /// changes nothing. Resolves units acquired while combat was running.
    pub fn merge_sweep(&mut self) -> bool {
        let mut merged = false;
        loop {
            let pass = self
                .instance_ids()
                .into_iter()
                .any(|id| self.units.contains_key(&id) && self.merge_check(id));
            if !pass {
                return merged;
            }
            merged = true;
        }
    }
}
