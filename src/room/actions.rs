use super::phase::Phase;
use super::room::Room;
use crate::ClientId;
use crate::Gold;
use crate::MAX_LEVEL;
use crate::REROLL_COST;
use crate::XP_COST;
use crate::XP_PER_BUY;
use crate::error::ActionError;
use crate::player::LootReward;
use crate::player::UnitInstance;
use crate::session::PlayerAction;
use crate::session::ServerMessage;

impl Room {
    /// Validates and applies one player action. Success commits and
    /// broadcasts the new state; failure answers the caller alone and
    /// mutates nothing.
    pub(super) fn action(&mut self, client: ClientId, action: PlayerAction) {
        let name = action.name();
        match self.apply_action(client, action) {
            Ok(()) => {
                self.send(client, &ServerMessage::result_ok(name));
                self.broadcast_state();
            }
            Err(error) => {
                log::debug!("[room] {} rejected for {}: {}", name, client, error);
                self.send(client, &ServerMessage::result_err(name, error));
            }
        }
    }

    fn apply_action(&mut self, client: ClientId, action: PlayerAction) -> Result<(), ActionError> {
        if let PlayerAction::Ready { ready } = action {
            self.set_ready(client, ready);
            return Ok(());
        }
        if !self.started {
            return Err(ActionError::GameNotStarted);
        }
        let index = self.player_index(client).ok_or(ActionError::NotInRoom)?;
        if self.players[index].eliminated {
            return Err(ActionError::WrongPhase);
        }
        match action {
            PlayerAction::BuyUnit { shop_index } => self.buy_unit(index, shop_index),
            PlayerAction::SellUnit { instance_id } => self.sell_unit(index, instance_id),
            PlayerAction::PlaceUnit { instance_id, x, y } => {
                self.in_phase(&[Phase::Planning])?;
                self.players[index].place_unit(instance_id, x, y)
            }
            PlayerAction::BenchUnit { instance_id, target_slot } => {
                self.in_phase(&[Phase::Planning])?;
                self.players[index].bench_unit(instance_id, target_slot)
            }
            PlayerAction::MoveBenchUnit { instance_id, target_slot } => {
                self.in_phase(&[Phase::Planning])?;
                self.players[index].move_bench_unit(instance_id, target_slot)
            }
            PlayerAction::Reroll => self.reroll(index),
            PlayerAction::BuyXp => self.buy_xp(index),
            PlayerAction::ToggleShopLock => {
                self.in_phase(&[Phase::Planning, Phase::Combat])?;
                self.players[index].shop_locked = !self.players[index].shop_locked;
                Ok(())
            }
            PlayerAction::CollectLoot { loot_id } => self.collect_loot(index, loot_id),
            PlayerAction::EquipItem { item_index, instance_id } => {
                self.in_phase(&[Phase::Planning, Phase::Combat])?;
                self.players[index].equip_item(item_index, instance_id)
            }
            PlayerAction::UnequipItem { instance_id, item_slot } => {
                self.in_phase(&[Phase::Planning, Phase::Combat])?;
                self.players[index].unequip_item(instance_id, item_slot)
            }
            PlayerAction::CombineItems { item_index_1, item_index_2 } => {
                self.in_phase(&[Phase::Planning, Phase::Combat])?;
                self.players[index].combine_items(item_index_1, item_index_2)
            }
            PlayerAction::UseConsumable { item_index } => {
                self.in_phase(&[Phase::Planning, Phase::Combat])?;
                self.players[index].use_consumable(item_index, &mut self.rng)
            }
            PlayerAction::SelectCrestChoice { choice_index } => {
                self.players[index].select_crest_choice(choice_index).map(|_| ())
            }
            PlayerAction::SelectItemChoice { choice_index } => {
                self.players[index].select_item_choice(choice_index)
            }
            PlayerAction::ReplaceCrest { replace_index } => {
                self.players[index].replace_crest(replace_index)
            }
            PlayerAction::SelectMinorCrest { crest_id } => {
                self.players[index].select_minor_crest(&crest_id).map(|_| ())
            }
            PlayerAction::SelectMajorCrest { crest_id } => self.select_major(index, &crest_id),
            PlayerAction::MerchantPick { option_id } => self.merchant_pick(index, option_id),
            PlayerAction::Ready { .. } => Ok(()),
        }
    }

    fn in_phase(&self, allowed: &[Phase]) -> Result<(), ActionError> {
        match allowed.contains(&self.phase) {
            true => Ok(()),
            false => Err(ActionError::WrongPhase),
        }
    }

    /// Purchases reserve nothing new from the pool; the shop slot
    /// already holds the copy.
    fn buy_unit(&mut self, index: usize, shop_index: usize) -> Result<(), ActionError> {
        self.in_phase(&[Phase::Planning, Phase::Combat])?;
        let slot = *self
            .players[index]
            .shop
            .get(shop_index)
            .ok_or(ActionError::OutOfBounds)?;
        let template = slot.ok_or(ActionError::EmptyShopSlot)?;
        if self.players[index].gold < template.cost as Gold {
            return Err(ActionError::NotEnoughGold);
        }
        if self.players[index].bench_free_slot().is_none() {
            return Err(ActionError::BenchFull);
        }
        let id = self.next_instance();
        let player = &mut self.players[index];
        player.gold -= template.cost as Gold;
        player.shop[shop_index] = None;
        player.add_to_bench(UnitInstance::new(id, template))?;
        player.merge_check(id);
        Ok(())
    }

    fn sell_unit(&mut self, index: usize, instance: crate::InstanceId) -> Result<(), ActionError> {
        self.in_phase(&[Phase::Planning, Phase::Combat])?;
        let (unit, copies) = self.players[index].sell_unit(instance)?;
        self.pool.put(unit.template.id, copies);
        Ok(())
    }

    fn reroll(&mut self, index: usize) -> Result<(), ActionError> {
        self.in_phase(&[Phase::Planning, Phase::Combat])?;
        let player = &mut self.players[index];
        if player.free_rerolls > 0 {
            player.free_rerolls -= 1;
        } else if player.gold >= REROLL_COST {
            player.gold -= REROLL_COST;
        } else {
            return Err(ActionError::NotEnoughGold);
        }
        self.fill_shop(index);
        Ok(())
    }

    fn buy_xp(&mut self, index: usize) -> Result<(), ActionError> {
        self.in_phase(&[Phase::Planning, Phase::Combat])?;
        let player = &mut self.players[index];
        if player.level >= MAX_LEVEL {
            return Err(ActionError::MaxLevel);
        }
        if player.gold < XP_COST {
            return Err(ActionError::NotEnoughGold);
        }
        player.gold -= XP_COST;
        player.gain_xp(XP_PER_BUY);
        Ok(())
    }

    fn collect_loot(&mut self, index: usize, loot_id: u64) -> Result<(), ActionError> {
        self.in_phase(&[Phase::Planning, Phase::Combat])?;
        let position = self.players[index]
            .loot
            .iter()
            .position(|l| l.id == loot_id)
            .ok_or(ActionError::NoSuchLoot)?;
        match self.players[index].loot[position].reward {
            LootReward::Gold(amount) => self.players[index].gold += amount,
            LootReward::Item(item) => {
                if self.players[index].inventory.len() >= crate::INVENTORY_SLOTS {
                    return Err(ActionError::InventoryFull);
                }
                self.players[index].inventory.push(item);
            }
            LootReward::Unit(template) => {
                if self.players[index].bench_free_slot().is_none() {
                    return Err(ActionError::BenchFull);
                }
                let id = self.next_instance();
                let player = &mut self.players[index];
                let _ = player.add_to_bench(UnitInstance::new(id, template));
                player.merge_check(id);
            }
        }
        self.players[index].loot.remove(position);
        Ok(())
    }
}
