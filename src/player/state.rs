use super::instance::UnitInstance;
use crate::BENCH_SLOTS;
use crate::BOARD_H;
use crate::BOARD_W;
use crate::ClientId;
use crate::Gold;
use crate::Health;
use crate::INVENTORY_SLOTS;
use crate::InstanceId;
use crate::STARTING_GOLD;
use crate::STARTING_HEALTH;
use crate::SHOP_SLOTS;
use crate::catalog::CrestTemplate;
use crate::catalog::ItemTemplate;
use crate::catalog::UnitTemplate;
use crate::catalog::copies_of;
use crate::catalog::max_units;
use crate::error::ActionError;
use std::collections::HashMap;

/// Where an owned unit currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Board(usize, usize),
    Bench(usize),
}

/// A minor crest held at a rank 1-3.
#[derive(Debug, Clone, Copy)]
pub struct OwnedCrest {
    pub crest: &'static CrestTemplate,
    pub rank: u8,
}

/// What a collected loot token grants.
#[derive(Debug, Clone, Copy)]
pub enum LootReward {
    Gold(Gold),
    Item(&'static ItemTemplate),
    Unit(&'static UnitTemplate),
}

/// A drop recorded during an encounter, awaiting collection.
#[derive(Debug, Clone, Copy)]
pub struct LootDrop {
    pub id: u64,
    pub tag: &'static str,
    pub reward: LootReward,
}

/// Selections awaiting a player decision.
#[derive(Debug, Default)]
pub struct Pending {
    pub crest_choices: Option<Vec<&'static CrestTemplate>>,
    pub item_choices: Option<Vec<&'static ItemTemplate>>,
    pub crest_replacement: Option<&'static CrestTemplate>,
    pub major_choices: Option<Vec<&'static CrestTemplate>>,
}

/// Canonical per-player game state. Created on room join, reset on game
/// start, mutated only by room handlers, destroyed with the room.
#[derive(Debug)]
pub struct PlayerState {
    pub id: ClientId,
    pub name: String,
    pub slot: usize,
    pub gold: Gold,
    pub level: u8,
    pub xp: u32,
    pub health: Health,
    pub max_health: Health,
    pub win_streak: u32,
    pub loss_streak: u32,
    pub units: HashMap<InstanceId, UnitInstance>,
    pub board: [[Option<InstanceId>; BOARD_W]; BOARD_H],
    pub bench: [Option<InstanceId>; BENCH_SLOTS],
    pub shop: [Option<&'static UnitTemplate>; SHOP_SLOTS],
    pub shop_locked: bool,
    pub free_rerolls: u32,
    pub inventory: Vec<&'static ItemTemplate>,
    pub minor_crests: Vec<OwnedCrest>,
    pub major_crest: Option<&'static CrestTemplate>,
    pub active_traits: Vec<super::stats::ActiveTrait>,
    pub pending: Pending,
    pub loot: Vec<LootDrop>,
    pub eliminated: bool,
    pub connected: bool,
    pub ready: bool,
}

impl PlayerState {
    pub fn new(id: ClientId, name: String, slot: usize) -> Self {
        Self {
            id,
            name,
            slot,
            gold: STARTING_GOLD,
            level: 1,
            xp: 0,
            health: STARTING_HEALTH,
            max_health: STARTING_HEALTH,
            win_streak: 0,
            loss_streak: 0,
            units: HashMap::new(),
            board: Default::default(),
            bench: Default::default(),
            shop: Default::default(),
            shop_locked: false,
            free_rerolls: 0,
            inventory: Vec::new(),
            minor_crests: Vec::new(),
            major_crest: None,
            active_traits: Vec::new(),
            pending: Pending::default(),
            loot: Vec::new(),
            eliminated: false,
            connected: true,
            ready: false,
        }
    }

    /// Fresh state for a new game, keeping identity and connection.
    pub fn reset(&mut self) {
        let id = self.id;
        let name = std::mem::take(&mut self.name);
        let slot = self.slot;
        let connected = self.connected;
        *self = Self::new(id, name, slot);
        self.connected = connected;
    }

    pub fn active(&self) -> bool {
        !self.eliminated && self.connected
    }
}

impl PlayerState {
    pub fn board_count(&self) -> usize {
        self.board.iter().flatten().filter(|c| c.is_some()).count()
    }
    pub fn board_cap(&self) -> usize {
        max_units(self.level)
    }
    pub fn bench_free_slot(&self) -> Option<usize> {
        self.bench.iter().position(|s| s.is_none())
    }
    pub fn locate(&self, id: InstanceId) -> Option<Location> {
        if let Some(slot) = self.bench.iter().position(|s| *s == Some(id)) {
            return Some(Location::Bench(slot));
        }
        for y in 0..BOARD_H {
            for x in 0..BOARD_W {
                if self.board[y][x] == Some(id) {
                    return Some(Location::Board(x, y));
                }
            }
        }
        None
    }
    pub fn on_board(&self, id: InstanceId) -> bool {
        matches!(self.locate(id), Some(Location::Board(..)))
    }
    /// Instance ids in bench-then-board scan order.
    pub fn instance_ids(&self) -> Vec<InstanceId> {
        self.bench
            .iter()
            .flatten()
            .chain(self.board.iter().flatten().flatten())
            .copied()
            .collect()
    }
    /// Units currently fielded, in board scan order.
    pub fn board_units(&self) -> Vec<(&UnitInstance, usize, usize)> {
        let mut fielded = Vec::new();
        for y in 0..BOARD_H {
            for x in 0..BOARD_W {
                if let Some(id) = self.board[y][x] {
                    if let Some(unit) = self.units.get(&id) {
                        fielded.push((unit, x, y));
                    }
                }
            }
        }
        fielded
    }
    fn clear_location(&mut self, location: Location) {
        match location {
            Location::Bench(slot) => self.bench[slot] = None,
            Location::Board(x, y) => self.board[y][x] = None,
        }
    }
    fn set_location(&mut self, location: Location, id: InstanceId) {
        match location {
            Location::Bench(slot) => self.bench[slot] = Some(id),
            Location::Board(x, y) => self.board[y][x] = Some(id),
        }
    }

    /// Adds an instance to the arena and seats it on the bench.
    pub fn add_to_bench(&mut self, unit: UnitInstance) -> Result<usize, ActionError> {
        let slot = self.bench_free_slot().ok_or(ActionError::BenchFull)?;
        self.bench[slot] = Some(unit.id);
        self.units.insert(unit.id, unit);
        Ok(slot)
    }

    /// Removes an instance from the arena and whichever slot held it.
    pub fn remove_unit(&mut self, id: InstanceId) -> Option<UnitInstance> {
        let location = self.locate(id)?;
        self.clear_location(location);
        self.units.remove(&id)
    }

    /// Moves a unit onto a board cell. Placing onto an occupied cell
    /// swaps the two units, which is allowed even at board capacity.
    pub fn place_unit(&mut self, id: InstanceId, x: usize, y: usize) -> Result<(), ActionError> {
        if x >= BOARD_W || y >= BOARD_H {
            return Err(ActionError::OutOfBounds);
        }
        let source = self.locate(id).ok_or(ActionError::UnknownUnit)?;
        if source == Location::Board(x, y) {
            return Ok(());
        }
        match self.board[y][x] {
            Some(other) => {
                self.set_location(source, other);
                self.board[y][x] = Some(id);
            }
            None => {
                let from_bench = matches!(source, Location::Bench(_));
                if from_bench && self.board_count() >= self.board_cap() {
                    return Err(ActionError::BoardFull);
                }
                self.clear_location(source);
                self.board[y][x] = Some(id);
            }
        }
        self.refresh_traits();
        Ok(())
    }

    /// Returns a board unit to the bench. An occupied target slot swaps;
    /// no target picks the first free slot.
    pub fn bench_unit(&mut self, id: InstanceId, target: Option<usize>) -> Result<(), ActionError> {
        let source = match self.locate(id).ok_or(ActionError::UnknownUnit)? {
            Location::Bench(_) => return Err(ActionError::UnknownUnit),
            board => board,
        };
        let slot = match target {
            Some(slot) if slot >= BENCH_SLOTS => return Err(ActionError::OutOfBounds),
            Some(slot) => slot,
            None => self.bench_free_slot().ok_or(ActionError::BenchFull)?,
        };
        match self.bench[slot] {
            Some(other) => {
                self.set_location(source, other);
                self.bench[slot] = Some(id);
            }
            None => {
                self.clear_location(source);
                self.bench[slot] = Some(id);
            }
        }
        self.refresh_traits();
        Ok(())
    }

    /// Reorders the bench; an occupied target slot swaps.
    pub fn move_bench_unit(&mut self, id: InstanceId, target: usize) -> Result<(), ActionError> {
        if target >= BENCH_SLOTS {
            return Err(ActionError::OutOfBounds);
        }
        let source = match self.locate(id).ok_or(ActionError::UnknownUnit)? {
            Location::Bench(slot) => slot,
            Location::Board(..) => return Err(ActionError::UnknownUnit),
        };
        self.bench.swap(source, target);
        Ok(())
    }

    /// Detaches a unit for sale: equipped items return to the inventory
    /// (overflow is dropped), and the caller refunds gold and pool
    /// copies.
    pub fn sell_unit(&mut self, id: InstanceId) -> Result<(UnitInstance, usize), ActionError> {
        let mut unit = self.remove_unit(id).ok_or(ActionError::UnknownUnit)?;
        for item in unit.items.drain(..) {
            if self.inventory.len() < INVENTORY_SLOTS {
                self.inventory.push(item);
            }
        }
        self.gold += crate::catalog::sell_price(unit.template.cost, unit.star);
        self.refresh_traits();
        let copies = copies_of(unit.star);
        Ok((unit, copies))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn fixture() -> PlayerState {
        PlayerState::new(1, "tester".into(), 0)
    }

    fn spawn(player: &mut PlayerState, id: InstanceId, unit: &str) -> InstanceId {
        let template = Catalog::get().unit(unit).expect("unit exists");
        player.add_to_bench(UnitInstance::new(id, template)).expect("bench room");
        id
    }

    #[test]
    fn place_then_bench_round_trips() {
        let mut player = fixture();
        let id = spawn(&mut player, 1, "footman");
        assert_eq!(player.locate(id), Some(Location::Bench(0)));
        player.place_unit(id, 2, 1).expect("place");
        assert_eq!(player.locate(id), Some(Location::Board(2, 1)));
        player.bench_unit(id, None).expect("bench");
        assert_eq!(player.locate(id), Some(Location::Bench(0)));
    }

    #[test]
    fn board_cap_blocks_bench_placements_but_not_swaps() {
        let mut player = fixture();
        player.level = 1;
        let cap = player.board_cap();
        for i in 0..cap {
            let id = spawn(&mut player, i as InstanceId + 1, "footman");
            player.place_unit(id, i % BOARD_W, i / BOARD_W).expect("fill board");
        }
        let extra = spawn(&mut player, 99, "archer");
        let err = player.place_unit(extra, 4, 3).expect_err("cap reached");
        assert_eq!(err, ActionError::BoardFull);
        player.place_unit(extra, 0, 0).expect("swap with occupant");
        assert_eq!(player.locate(extra), Some(Location::Board(0, 0)));
        assert_eq!(player.locate(1), Some(Location::Bench(0)));
        assert_eq!(player.board_count(), cap);
    }

    #[test]
    fn bench_full_rejects_board_exit() {
        let mut player = fixture();
        for i in 0..BENCH_SLOTS {
            spawn(&mut player, i as InstanceId + 1, "footman");
        }
        let boarded = 1;
        player.place_unit(boarded, 0, 0).expect("place");
        spawn(&mut player, 50, "archer");
        let err = player.bench_unit(boarded, None).expect_err("bench full");
        assert_eq!(err, ActionError::BenchFull);
    }

    #[test]
    fn selling_transfers_items_without_cloning() {
        let mut player = fixture();
        let id = spawn(&mut player, 1, "footman");
        let sword = Catalog::get().item("sword").expect("sword");
        player.units.get_mut(&id).expect("unit").items.push(sword);
        let (unit, copies) = player.sell_unit(id).expect("sell");
        assert_eq!(copies, 1);
        assert!(unit.items.is_empty());
        assert_eq!(player.inventory.len(), 1);
        assert_eq!(player.gold, STARTING_GOLD + 1);
        assert!(player.units.is_empty());
    }

    #[test]
    fn selling_two_star_refunds_three_copies() {
        let mut player = fixture();
        let id = spawn(&mut player, 1, "footman");
        player.units.get_mut(&id).expect("unit").star_up();
        let (_, copies) = player.sell_unit(id).expect("sell");
        assert_eq!(copies, 3);
        assert_eq!(player.gold, STARTING_GOLD + 3);
    }
}
