use super::hex::Hex;
use pathfinding::prelude::astar;
use std::collections::HashSet;

/// Integer cost per tile. The heuristic adds a |dx| tiebreaker at one
/// hundredth of a step, preferring straight columns over diagonal drift.
const STEP: u32 = 100;

fn heuristic(from: Hex, target: Hex) -> u32 {
    STEP * from.distance(target) as u32 + from.x.abs_diff(target.x)
}

/// A* toward any cell within `range` of `target`, treating `blocked`
/// cells (other alive units) as obstacles. Returns the single next tile,
/// or None when the goal ring is unreachable.
pub fn next_step(start: Hex, target: Hex, range: i32, blocked: &HashSet<Hex>) -> Option<Hex> {
    let (path, _) = astar(
        &start,
        |hex| {
            hex.neighbors()
                .into_iter()
                .filter(|n| n.in_field())
                .filter(|n| !blocked.contains(n))
                .map(|n| (n, STEP))
                .collect::<Vec<_>>()
        },
        |hex| heuristic(*hex, target),
        |hex| hex.distance(target) <= range,
    )?;
    path.get(1).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_straight_down_a_column() {
        let step = next_step(Hex::new(2, 0), Hex::new(2, 7), 1, &HashSet::new());
        assert_eq!(step, Some(Hex::new(2, 1)));
    }

    #[test]
    fn already_in_range_returns_no_step() {
        let step = next_step(Hex::new(2, 3), Hex::new(2, 4), 1, &HashSet::new());
        assert_eq!(step, None, "path is a single node");
    }

    #[test]
    fn routes_around_an_obstacle() {
        let blocked = HashSet::from([Hex::new(2, 1)]);
        let step = next_step(Hex::new(2, 0), Hex::new(2, 4), 1, &blocked)
            .expect("a detour exists");
        assert_ne!(step, Hex::new(2, 1));
        assert_eq!(Hex::new(2, 0).distance(step), 1);
    }

    #[test]
    fn walled_in_unit_has_no_path() {
        let start = Hex::new(0, 0);
        let blocked = start.neighbors().into_iter().filter(|n| n.in_field()).collect();
        assert_eq!(next_step(start, Hex::new(4, 7), 1, &blocked), None);
    }
}
