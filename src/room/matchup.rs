use crate::ClientId;
use crate::catalog::RoundKind;
use rand::Rng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use std::collections::HashMap;

/// The opposing side of a matchup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Away {
    /// A live opponent; the fight damages the loser.
    Player(ClientId),
    /// A copy of this player's board; no damage, no streaks.
    Ghost(ClientId),
    /// The fixed enemy formation of an encounter round.
    Encounter(RoundKind),
}

/// One pairing. The home player's units occupy rows 0-3.
#[derive(Debug, Clone, Copy)]
pub struct Matchup {
    pub home: ClientId,
    pub away: Away,
}

/// Remembers who hosted the last meeting of each unordered pair so the
/// home side alternates across rematches.
pub type HostMemory = HashMap<(ClientId, ClientId), ClientId>;

fn pair_key(a: ClientId, b: ClientId) -> (ClientId, ClientId) {
    (a.min(b), a.max(b))
}

/// Picks the host for a pair: random on first meeting, flipped on every
/// repeat.
fn host_of(a: ClientId, b: ClientId, memory: &mut HostMemory, rng: &mut SmallRng) -> ClientId {
    let key = pair_key(a, b);
    let host = match memory.get(&key) {
        Some(last) if *last == a => b,
        Some(_) => a,
        None => match rng.random_bool(0.5) {
            true => a,
            false => b,
        },
    };
    memory.insert(key, host);
    host
}

/// Builds the round's pairings among active players. Two players always
/// fight each other; three produce one real pair plus a ghost rematch
/// for the odd one out; four shuffle into two pairs.
pub fn pairings(active: &[ClientId], memory: &mut HostMemory, rng: &mut SmallRng) -> Vec<Matchup> {
    let mut shuffled = active.to_vec();
    shuffled.shuffle(rng);
    match shuffled.len() {
        0 | 1 => Vec::new(),
        2 => vec![versus(shuffled[0], shuffled[1], memory, rng)],
        3 => vec![
            versus(shuffled[0], shuffled[1], memory, rng),
            Matchup { home: shuffled[2], away: Away::Ghost(shuffled[0]) },
        ],
        _ => vec![
            versus(shuffled[0], shuffled[1], memory, rng),
            versus(shuffled[2], shuffled[3], memory, rng),
        ],
    }
}

fn versus(a: ClientId, b: ClientId, memory: &mut HostMemory, rng: &mut SmallRng) -> Matchup {
    let home = host_of(a, b, memory, rng);
    let away = if home == a { b } else { a };
    Matchup { home, away: Away::Player(away) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn hosts_alternate_across_rematches() {
        let mut memory = HostMemory::new();
        let mut rng = SmallRng::seed_from_u64(11);
        let first = host_of(1, 2, &mut memory, &mut rng);
        let second = host_of(1, 2, &mut memory, &mut rng);
        let third = host_of(2, 1, &mut memory, &mut rng);
        assert_ne!(first, second);
        assert_ne!(second, third);
        assert_eq!(first, third);
    }

    #[test]
    fn two_players_fight_each_other() {
        let mut memory = HostMemory::new();
        let mut rng = SmallRng::seed_from_u64(5);
        let matchups = pairings(&[10, 20], &mut memory, &mut rng);
        assert_eq!(matchups.len(), 1);
        let m = matchups[0];
        match m.away {
            Away::Player(away) => assert_ne!(m.home, away),
            other => panic!("expected live pair, got {:?}", other),
        }
    }

    #[test]
    fn three_players_produce_a_ghost() {
        let mut memory = HostMemory::new();
        let mut rng = SmallRng::seed_from_u64(5);
        let matchups = pairings(&[1, 2, 3], &mut memory, &mut rng);
        assert_eq!(matchups.len(), 2);
        let ghosts = matchups
            .iter()
            .filter(|m| matches!(m.away, Away::Ghost(_)))
            .count();
        assert_eq!(ghosts, 1);
    }

    #[test]
    fn four_players_cover_everyone_exactly_once() {
        let mut memory = HostMemory::new();
        let mut rng = SmallRng::seed_from_u64(5);
        let matchups = pairings(&[1, 2, 3, 4], &mut memory, &mut rng);
        assert_eq!(matchups.len(), 2);
        let mut seen = Vec::new();
        for m in &matchups {
            seen.push(m.home);
            match m.away {
                Away::Player(p) => seen.push(p),
                other => panic!("expected live pairs, got {:?}", other),
            }
        }
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2, 3, 4]);
    }
}
