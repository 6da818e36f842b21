use super::state::PlayerState;
use crate::INVENTORY_SLOTS;
use crate::ITEMS_PER_UNIT;
use crate::InstanceId;
use crate::catalog::Catalog;
use crate::catalog::ConsumableEffect;
use crate::catalog::ItemKind;
use crate::error::ActionError;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

impl PlayerState {
    pub fn equip_item(&mut self, item_index: usize, unit: InstanceId) -> Result<(), ActionError> {
        let item = *self.inventory.get(item_index).ok_or(ActionError::UnknownItem)?;
        if !item.equippable() {
            return Err(ActionError::NotEquippable);
        }
        let unit = self.units.get_mut(&unit).ok_or(ActionError::UnknownUnit)?;
        if unit.items.len() >= ITEMS_PER_UNIT {
            return Err(ActionError::ItemLimit);
        }
        unit.items.push(item);
        self.inventory.remove(item_index);
        Ok(())
    }

    pub fn unequip_item(&mut self, unit: InstanceId, item_slot: usize) -> Result<(), ActionError> {
        if self.inventory.len() >= INVENTORY_SLOTS {
            return Err(ActionError::InventoryFull);
        }
        let unit = self.units.get_mut(&unit).ok_or(ActionError::UnknownUnit)?;
        if item_slot >= unit.items.len() {
            return Err(ActionError::UnknownItem);
        }
        let item = unit.items.remove(item_slot);
        self.inventory.push(item);
        Ok(())
    }

    /// Combines two inventory components by recipe into one item.
    pub fn combine_items(&mut self, first: usize, second: usize) -> Result<(), ActionError> {
        if first == second {
            return Err(ActionError::NoRecipe);
        }
        let a = *self.inventory.get(first).ok_or(ActionError::UnknownItem)?;
        let b = *self.inventory.get(second).ok_or(ActionError::UnknownItem)?;
        if a.kind != ItemKind::Component || b.kind != ItemKind::Component {
            return Err(ActionError::NoRecipe);
        }
        let combined = Catalog::get().recipe(a.id, b.id).ok_or(ActionError::NoRecipe)?;
        let (high, low) = (first.max(second), first.min(second));
        self.inventory.remove(high);
        self.inventory.remove(low);
        self.inventory.push(combined);
        Ok(())
    }

    /// Consumes a consumable, opening the selection it offers.
    pub fn use_consumable(&mut self, item_index: usize, rng: &mut SmallRng) -> Result<(), ActionError> {
        let item = *self.inventory.get(item_index).ok_or(ActionError::UnknownItem)?;
        let effect = item.effect.ok_or(ActionError::NotConsumable)?;
        if self.pending.crest_choices.is_some() || self.pending.item_choices.is_some() {
            return Err(ActionError::PendingChoice);
        }
        match effect {
            ConsumableEffect::MinorCrestChoice => {
                let mut options = Catalog::get().minor_crests();
                options.shuffle(rng);
                options.truncate(3);
                self.pending.crest_choices = Some(options);
            }
            ConsumableEffect::ComponentChoice => {
                let mut options = Catalog::get().components();
                options.shuffle(rng);
                options.truncate(3);
                self.pending.item_choices = Some(options);
            }
        }
        self.inventory.remove(item_index);
        Ok(())
    }

    /// Resolves a pending item choice into the inventory.
    pub fn select_item_choice(&mut self, choice: usize) -> Result<(), ActionError> {
        let options = self.pending.item_choices.as_ref().ok_or(ActionError::NoPendingChoice)?;
        let item = *options.get(choice).ok_or(ActionError::NoSuchChoice)?;
        if self.inventory.len() >= INVENTORY_SLOTS {
            return Err(ActionError::InventoryFull);
        }
        self.inventory.push(item);
        self.pending.item_choices = None;
        Ok(())
    }
}
