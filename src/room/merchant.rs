use crate::ClientId;
use crate::Gold;
use crate::catalog::Catalog;
use crate::catalog::CrestTemplate;
use crate::catalog::ItemTemplate;
use crate::catalog::UnitTemplate;
use crate::error::ActionError;
use crate::player::PlayerState;
use rand::Rng;
use rand::rngs::SmallRng;
use serde::Serialize;

/// One half of a merchant pair.
#[derive(Debug, Clone, Copy)]
pub enum Reward {
    Unit(&'static UnitTemplate),
    Item(&'static ItemTemplate),
    Crest(&'static CrestTemplate),
    Gold(Gold),
    Rerolls(u32),
}

impl Reward {
    pub fn is_gold(&self) -> bool {
        matches!(self, Self::Gold(_))
    }
    pub fn view(&self) -> serde_json::Value {
        #[derive(Serialize)]
        #[serde(tag = "kind", rename_all = "camelCase")]
        enum View {
            Unit { id: &'static str, name: &'static str, cost: u8 },
            Item { id: &'static str, name: &'static str },
            Crest { id: &'static str, name: &'static str },
            Gold { amount: Gold },
            Rerolls { count: u32 },
        }
        let view = match *self {
            Self::Unit(u) => View::Unit { id: u.id, name: u.name, cost: u.cost },
            Self::Item(i) => View::Item { id: i.id, name: i.name },
            Self::Crest(c) => View::Crest { id: c.id, name: c.name },
            Self::Gold(amount) => View::Gold { amount },
            Self::Rerolls(count) => View::Rerolls { count },
        };
        serde_json::to_value(view).expect("serialize reward")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Pair {
    pub rewards: (Reward, Reward),
    pub taken_by: Option<ClientId>,
}

/// Sequential timed draft run during the merchant round. Pickers go in
/// ascending health order (board slot breaks ties); each picks one pair,
/// receiving both rewards.
#[derive(Debug)]
pub struct Merchant {
    pub pairs: Vec<Pair>,
    pub order: Vec<ClientId>,
    pub turn: usize,
    pub done: bool,
}

pub const PAIR_COUNT: usize = 6;

impl Merchant {
    /// Rolls six pairs, one of six pair shapes each, and fixes the pick
    /// order over the given players.
    pub fn generate(players: &[&PlayerState], rng: &mut SmallRng) -> Self {
        let mut order = players.iter().map(|p| (p.health, p.slot, p.id)).collect::<Vec<_>>();
        order.sort_unstable();
        let catalog = Catalog::get();
        let units = (2..=4u8)
            .flat_map(|cost| catalog.units_of_cost(cost).iter().copied())
            .collect::<Vec<_>>();
        let items = catalog.merchant_items();
        let crests = catalog.minor_crests();
        let unit = |rng: &mut SmallRng| Reward::Unit(units[rng.random_range(0..units.len())]);
        let item = |rng: &mut SmallRng| Reward::Item(items[rng.random_range(0..items.len())]);
        let crest = |rng: &mut SmallRng| Reward::Crest(crests[rng.random_range(0..crests.len())]);
        let pairs = (0..PAIR_COUNT)
            .map(|_| {
                let rewards = match rng.random_range(0..6u8) {
                    0 => (unit(rng), item(rng)),
                    1 => (crest(rng), Reward::Rerolls(3)),
                    2 => (Reward::Gold(rng.random_range(5..=8)), item(rng)),
                    3 => (item(rng), item(rng)),
                    4 => (unit(rng), crest(rng)),
                    _ => (item(rng), crest(rng)),
                };
                Pair { rewards, taken_by: None }
            })
            .collect();
        Self {
            pairs,
            order: order.into_iter().map(|(_, _, id)| id).collect(),
            turn: 0,
            done: false,
        }
    }

    pub fn current_picker(&self) -> Option<ClientId> {
        (!self.done).then(|| self.order.get(self.turn).copied()).flatten()
    }

    /// Claims a pair for the current picker.
    pub fn pick(&mut self, by: ClientId, option: usize) -> Result<(Reward, Reward), ActionError> {
        if self.current_picker() != Some(by) {
            return Err(ActionError::NotYourTurn);
        }
        let pair = self.pairs.get_mut(option).ok_or(ActionError::NoSuchChoice)?;
        if pair.taken_by.is_some() {
            return Err(ActionError::OptionTaken);
        }
        pair.taken_by = Some(by);
        Ok(pair.rewards)
    }

    /// The pair a timed-out picker is handed: the first untaken pair
    /// containing gold, else the first untaken pair.
    pub fn auto_option(&self) -> Option<usize> {
        self.pairs
            .iter()
            .position(|p| p.taken_by.is_none() && (p.rewards.0.is_gold() || p.rewards.1.is_gold()))
            .or_else(|| self.pairs.iter().position(|p| p.taken_by.is_none()))
    }

    /// Advances to the next picker still present; marks the draft done
    /// when the order is exhausted.
    pub fn advance(&mut self, present: impl Fn(ClientId) -> bool) -> Option<ClientId> {
        self.turn += 1;
        while let Some(id) = self.order.get(self.turn) {
            if present(*id) {
                return Some(*id);
            }
            self.turn += 1;
        }
        self.done = true;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn player(id: ClientId, slot: usize, health: crate::Health) -> PlayerState {
        let mut p = PlayerState::new(id, format!("p{}", id), slot);
        p.health = health;
        p
    }

    #[test]
    fn pick_order_is_ascending_health_then_slot() {
        let a = player(100, 0, 10);
        let b = player(200, 1, 20);
        let c = player(300, 2, 15);
        let mut rng = SmallRng::seed_from_u64(4);
        let merchant = Merchant::generate(&[&a, &b, &c], &mut rng);
        assert_eq!(merchant.order, vec![100, 300, 200]);
        assert_eq!(merchant.current_picker(), Some(100));
    }

    #[test]
    fn health_ties_break_by_slot() {
        let a = player(7, 3, 10);
        let b = player(8, 1, 10);
        let mut rng = SmallRng::seed_from_u64(4);
        let merchant = Merchant::generate(&[&a, &b], &mut rng);
        assert_eq!(merchant.order, vec![8, 7]);
    }

    #[test]
    fn exactly_six_pairs_roll() {
        let a = player(1, 0, 10);
        let mut rng = SmallRng::seed_from_u64(4);
        let merchant = Merchant::generate(&[&a], &mut rng);
        assert_eq!(merchant.pairs.len(), PAIR_COUNT);
    }

    #[test]
    fn picks_enforce_turn_order_and_claims() {
        let a = player(1, 0, 10);
        let b = player(2, 1, 20);
        let mut rng = SmallRng::seed_from_u64(4);
        let mut merchant = Merchant::generate(&[&a, &b], &mut rng);
        assert_eq!(merchant.pick(2, 0).expect_err("not b's turn"), ActionError::NotYourTurn);
        merchant.pick(1, 0).expect("a picks");
        assert_eq!(merchant.pick(1, 0).expect_err("already taken"), ActionError::OptionTaken);
        assert_eq!(merchant.advance(|_| true), Some(2));
        merchant.pick(2, 1).expect("b picks");
        assert_eq!(merchant.advance(|_| true), None);
        assert!(merchant.done);
    }

    #[test]
    fn advance_skips_absent_pickers() {
        let a = player(1, 0, 10);
        let b = player(2, 1, 20);
        let c = player(3, 2, 30);
        let mut rng = SmallRng::seed_from_u64(4);
        let mut merchant = Merchant::generate(&[&a, &b, &c], &mut rng);
        assert_eq!(merchant.advance(|id| id != 2), Some(3));
    }

    #[test]
    fn auto_pick_prefers_gold() {
        let a = player(1, 0, 10);
        for seed in 0..64 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let merchant = Merchant::generate(&[&a], &mut rng);
            let choice = merchant.auto_option().expect("something untaken");
            let has_gold = merchant
                .pairs
                .iter()
                .any(|p| p.rewards.0.is_gold() || p.rewards.1.is_gold());
            if has_gold {
                let picked = &merchant.pairs[choice];
                assert!(picked.rewards.0.is_gold() || picked.rewards.1.is_gold());
            } else {
                assert_eq!(choice, 0);
            }
        }
    }
}
