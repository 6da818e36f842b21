//! Shared multiset of unit copies. Every shop, bench, board, and loot
//! token across the room draws from one pool, so copies are conserved.

use crate::catalog::Catalog;
use crate::catalog::UnitTemplate;
use crate::catalog::pool_size;
use crate::catalog::shop_odds;
use rand::Rng;
use rand::rngs::SmallRng;
use std::collections::HashMap;

#[derive(Debug)]
pub struct UnitPool {
    counts: HashMap<&'static str, usize>,
}

impl UnitPool {
    /// A full pool: every shop unit at its tier's configured copy count.
    pub fn new() -> Self {
        Self {
            counts: Catalog::get()
                .units()
                .filter(|u| u.cost >= 1)
                .map(|u| (u.id, pool_size(u.cost)))
                .collect(),
        }
    }

    pub fn available(&self, id: &str) -> usize {
        self.counts.get(id).copied().unwrap_or(0)
    }

    /// Reserves one copy. Fails silently when none remain.
    pub fn take(&mut self, id: &str) {
        if let Some(count) = self.counts.get_mut(id) {
            *count = count.saturating_sub(1);
        }
    }

    /// Returns copies, saturating at the tier cap.
    pub fn put(&mut self, id: &str, n: usize) {
        let cap = Catalog::get().unit(id).map(|u| pool_size(u.cost)).unwrap_or(0);
        if let Some(count) = self.counts.get_mut(id) {
            *count = (*count + n).min(cap);
        }
    }

    /// Samples a unit for one shop slot at the given player level. Picks a
    /// cost tier from the level's odds row, then uniformly among units
    /// still available at that tier; exhausted tiers fall back through
    /// 1..5 in order. Never removes from the pool; callers reserve with
    /// [`UnitPool::take`].
    pub fn roll(&self, level: u8, rng: &mut SmallRng) -> Option<&'static UnitTemplate> {
        let odds = shop_odds(level);
        let point = rng.random_range(0..100u32);
        let mut cumulative = 0u32;
        let mut tier = 1u8;
        for (i, weight) in odds.iter().enumerate() {
            cumulative += *weight as u32;
            if point < cumulative {
                tier = i as u8 + 1;
                break;
            }
        }
        self.roll_at(tier, rng)
            .or_else(|| (1..=5).find_map(|t| self.roll_at(t, rng)))
    }

    fn roll_at(&self, tier: u8, rng: &mut SmallRng) -> Option<&'static UnitTemplate> {
        let available = Catalog::get()
            .units_of_cost(tier)
            .iter()
            .copied()
            .filter(|u| self.available(u.id) > 0)
            .collect::<Vec<_>>();
        match available.len() {
            0 => None,
            n => Some(available[rng.random_range(0..n)]),
        }
    }

    /// Total copies remaining across all units, for conservation checks.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

impl Default for UnitPool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn take_and_put_respect_bounds() {
        let mut pool = UnitPool::new();
        let cap = pool.available("footman");
        pool.put("footman", 5);
        assert_eq!(pool.available("footman"), cap, "put saturates at cap");
        pool.take("footman");
        assert_eq!(pool.available("footman"), cap - 1);
        pool.put("footman", 1);
        assert_eq!(pool.available("footman"), cap);
    }

    #[test]
    fn take_on_empty_is_silent() {
        let mut pool = UnitPool::new();
        let cap = pool.available("footman");
        for _ in 0..cap + 10 {
            pool.take("footman");
        }
        assert_eq!(pool.available("footman"), 0);
    }

    #[test]
    fn roll_never_mutates() {
        let pool = UnitPool::new();
        let total = pool.total();
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..100 {
            pool.roll(3, &mut rng);
        }
        assert_eq!(pool.total(), total);
    }

    #[test]
    fn level_one_rolls_only_tier_one() {
        let pool = UnitPool::new();
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..200 {
            let unit = pool.roll(1, &mut rng).expect("full pool rolls");
            assert_eq!(unit.cost, 1);
        }
    }

    #[test]
    fn roll_distribution_tracks_odds() {
        let pool = UnitPool::new();
        let mut rng = SmallRng::seed_from_u64(42);
        let n = 20_000;
        let mut tiers = [0u32; 5];
        for _ in 0..n {
            let unit = pool.roll(5, &mut rng).expect("full pool rolls");
            tiers[unit.cost as usize - 1] += 1;
        }
        let odds = shop_odds(5);
        for (i, count) in tiers.iter().enumerate() {
            let expected = odds[i] as f64 / 100.0;
            let observed = *count as f64 / n as f64;
            assert!(
                (observed - expected).abs() < 0.02,
                "tier {} observed {:.3} expected {:.3}",
                i + 1,
                observed,
                expected
            );
        }
    }

    #[test]
    fn exhausted_tier_falls_back() {
        let mut pool = UnitPool::new();
        for unit in Catalog::get().units_of_cost(1) {
            for _ in 0..pool_size(1) {
                pool.take(unit.id);
            }
        }
        let mut rng = SmallRng::seed_from_u64(9);
        let unit = pool.roll(1, &mut rng).expect("fallback finds a tier");
        assert!(unit.cost > 1);
    }
}
