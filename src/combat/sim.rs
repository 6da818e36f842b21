use super::event::CombatEvent;
use super::event::Roster;
use super::hex::Hex;
use super::path;
use super::unit::CombatUnit;
use super::unit::Team;
use super::unit::ticks;
use crate::FIELD_H;
use crate::HIT_FRACTION;
use crate::Health;
use crate::InstanceId;
use crate::MANA_PER_ATTACK;
use crate::MAX_TICKS;
use crate::STUCK_RETARGET_TICKS;
use crate::Tick;
use crate::catalog::Ability;
use crate::catalog::Affinity;
use crate::catalog::Stats;
use crate::catalog::UnitTemplate;
use std::collections::HashSet;

const DEFAULT_ABILITY: Ability = Ability {
    name: "Empowered Strike",
    damage_mult: crate::ABILITY_DAMAGE_MULT,
    seconds: crate::ABILITY_SECONDS,
};

/// One combatant as handed to the simulator: composed stats plus a
/// board position in the owner's half (x 0..5, y 0..4).
#[derive(Debug, Clone)]
pub struct Fighter {
    pub id: InstanceId,
    pub template: &'static UnitTemplate,
    pub star: u8,
    pub stats: Stats,
    pub x: usize,
    pub y: usize,
}

/// Result of one simulated matchup.
#[derive(Debug)]
pub struct Outcome {
    pub winner: Team,
    pub survivors: usize,
    pub damage: Health,
    pub duration_ticks: Tick,
    pub events: Vec<CombatEvent>,
}

#[derive(Debug, Clone, Copy)]
struct PendingHit {
    attacker: usize,
    target: usize,
    damage: i32,
    landing: Tick,
    ranged: bool,
}

/// Deterministic fixed-step simulation of one matchup. Away units are
/// mirrored onto rows 4-7 so front ranks face each other. Each tick runs
/// four phases: land due hits, snapshot movement decisions, apply moves
/// in insertion order, then attacks and casts against settled positions.
pub struct Simulator {
    units: Vec<CombatUnit>,
    pending: Vec<PendingHit>,
    events: Vec<CombatEvent>,
}

impl Simulator {
    pub fn run(home: Vec<Fighter>, away: Vec<Fighter>) -> Outcome {
        let mut units = Vec::new();
        for fighter in home {
            let pos = Hex::new(fighter.x as i32, fighter.y as i32);
            units.push(CombatUnit::new(
                fighter.id,
                fighter.template,
                fighter.star,
                Team::Home,
                pos,
                fighter.stats,
            ));
        }
        for fighter in away {
            let pos = Hex::new(fighter.x as i32, (FIELD_H - 1 - fighter.y) as i32);
            units.push(CombatUnit::new(
                fighter.id,
                fighter.template,
                fighter.star,
                Team::Away,
                pos,
                fighter.stats,
            ));
        }
        Self {
            units,
            pending: Vec::new(),
            events: Vec::new(),
        }
        .simulate()
    }

    fn simulate(mut self) -> Outcome {
        self.events.push(CombatEvent::CombatStart {
            tick: 0,
            units: self.units.iter().map(Roster::from).collect(),
        });
        let mut tick: Tick = 0;
        let duration = loop {
            self.resolve_hits(tick);
            if self.finished() || tick >= MAX_TICKS {
                break tick;
            }
            let decisions = self.decide(tick);
            self.apply_moves(tick, decisions);
            self.act(tick);
            tick += 1;
        };
        let winner = self.winner();
        let survivors = self.alive(winner);
        let damage = 1 + survivors as Health;
        self.events.push(CombatEvent::CombatEnd {
            tick: duration,
            winner,
            survivors,
            damage,
        });
        Outcome {
            winner,
            survivors,
            damage,
            duration_ticks: duration,
            events: self.events,
        }
    }

    fn alive(&self, team: Team) -> usize {
        self.units.iter().filter(|u| u.alive && u.team == team).count()
    }

    fn total_health(&self, team: Team) -> f32 {
        self.units
            .iter()
            .filter(|u| u.alive && u.team == team)
            .map(|u| u.health)
            .sum()
    }

    fn finished(&self) -> bool {
        self.pending.is_empty() && (self.alive(Team::Home) == 0 || self.alive(Team::Away) == 0)
    }

    fn winner(&self) -> Team {
        let home = self.alive(Team::Home);
        let away = self.alive(Team::Away);
        if home > 0 && away == 0 {
            Team::Home
        } else if away > 0 && home == 0 {
            Team::Away
        } else if self.total_health(Team::Home) >= self.total_health(Team::Away) {
            Team::Home
        } else {
            Team::Away
        }
    }
}

impl Simulator {
    /// Phase one: apply every queued hit whose landing tick has come.
    /// Melee hits die with their attacker; projectiles land regardless.
    /// Hits on the already dead are dropped.
    fn resolve_hits(&mut self, tick: Tick) {
        let mut remaining = Vec::new();
        for hit in std::mem::take(&mut self.pending) {
            if hit.landing <= tick {
                self.land(tick, hit);
            } else {
                remaining.push(hit);
            }
        }
        self.pending = remaining;
    }

    fn land(&mut self, tick: Tick, hit: PendingHit) {
        if !self.units[hit.target].alive {
            return;
        }
        if !hit.ranged && !self.units[hit.attacker].alive {
            return;
        }
        let target = &mut self.units[hit.target];
        target.health = (target.health - hit.damage as f32).max(0.0);
        let health = target.health;
        let id = target.id;
        self.events.push(CombatEvent::UnitDamage {
            tick,
            target: id,
            damage: hit.damage,
            health,
        });
        if health <= 0.0 {
            self.units[hit.target].alive = false;
            self.events.push(CombatEvent::UnitDeath {
                tick,
                target: id,
                killer: self.units[hit.attacker].id,
                loot: self.units[hit.target].template.drops,
            });
        }
    }

    /// Phase two: against a positional snapshot, tick down cooldowns,
    /// re-evaluate targets, and collect one-tile move decisions.
    fn decide(&mut self, tick: Tick) -> Vec<(usize, Hex)> {
        let snapshot = self
            .units
            .iter()
            .map(|u| (u.pos, u.alive))
            .collect::<Vec<_>>();
        let mut decisions = Vec::new();
        for i in 0..self.units.len() {
            if !self.units[i].alive {
                continue;
            }
            self.units[i].attack_cooldown -= 1;
            self.units[i].move_cooldown -= 1;
            self.retarget(i, &snapshot);
            let unit = &self.units[i];
            let Some(target) = unit.target else { continue };
            let distance = unit.pos.distance(snapshot[target].0);
            if distance <= unit.range() {
                continue;
            }
            if unit.move_cooldown > 0 || !unit.arrived(tick) {
                continue;
            }
            let blocked = snapshot
                .iter()
                .enumerate()
                .filter(|(j, (_, alive))| *j != i && *alive)
                .map(|(_, (pos, _))| *pos)
                .collect::<HashSet<_>>();
            match path::next_step(unit.pos, snapshot[target].0, unit.range(), &blocked) {
                Some(step) => decisions.push((i, step)),
                None => self.units[i].stuck += 1,
            }
        }
        decisions
    }

    /// Re-target when the target died, when it left range while another
    /// enemy is reachable, or after ten stuck ticks.
    fn retarget(&mut self, i: usize, snapshot: &[(Hex, bool)]) {
        let me = self.units[i].pos;
        let range = self.units[i].range();
        let current = self.units[i].target.filter(|t| snapshot[*t].1);
        let next = match current {
            None => self.closest(i, None, snapshot),
            Some(t) => {
                let out_of_range = me.distance(snapshot[t].0) > range;
                if out_of_range && self.enemy_in_range(i, t, snapshot) {
                    self.closest(i, None, snapshot)
                } else if self.units[i].stuck >= STUCK_RETARGET_TICKS {
                    self.units[i].stuck = 0;
                    self.closest(i, Some(t), snapshot).or(Some(t))
                } else {
                    Some(t)
                }
            }
        };
        self.units[i].target = next;
    }

    fn enemy_in_range(&self, i: usize, current: usize, snapshot: &[(Hex, bool)]) -> bool {
        let me = self.units[i].pos;
        let range = self.units[i].range();
        self.units
            .iter()
            .enumerate()
            .filter(|(j, u)| snapshot[*j].1 && u.team != self.units[i].team && *j != current)
            .any(|(j, _)| me.distance(snapshot[j].0) <= range)
    }

    /// Closest living enemy by hex distance, ties to the smaller column
    /// offset, then to roster order.
    fn closest(&self, i: usize, exclude: Option<usize>, snapshot: &[(Hex, bool)]) -> Option<usize> {
        let me = self.units[i].pos;
        self.units
            .iter()
            .enumerate()
            .filter(|(j, u)| snapshot[*j].1 && u.team != self.units[i].team)
            .filter(|(j, _)| Some(*j) != exclude)
            .min_by_key(|(j, _)| {
                let pos = snapshot[*j].0;
                (me.distance(pos), (me.x - pos.x).abs(), *j)
            })
            .map(|(j, _)| j)
    }

    /// Phase three: apply decisions in insertion order; a destination
    /// occupied in the meantime bumps the mover's stuck counter.
    fn apply_moves(&mut self, tick: Tick, decisions: Vec<(usize, Hex)>) {
        for (i, dest) in decisions {
            if self.units.iter().any(|u| u.alive && u.pos == dest) {
                self.units[i].stuck += 1;
                continue;
            }
            let steps = self.units[i].step_ticks();
            let unit = &mut self.units[i];
            unit.pos = dest;
            unit.arrival_tick = tick + steps as Tick;
            unit.move_cooldown = steps;
            unit.stuck = 0;
            self.events.push(CombatEvent::UnitMove {
                tick,
                unit: unit.id,
                x: dest.x,
                y: dest.y,
                duration: steps as f32 * crate::TICK_SECONDS,
            });
        }
    }

    /// Phase four: with settled positions, every ready unit in range of
    /// its target either casts (mana full) or swings. Units mid-step
    /// cannot act; a moving target is only hittable by ranged attackers.
    fn act(&mut self, tick: Tick) {
        for i in 0..self.units.len() {
            if !self.units[i].alive {
                continue;
            }
            let Some(target) = self.units[i].target else { continue };
            if !self.units[target].alive {
                continue;
            }
            let unit = &self.units[i];
            if unit.pos.distance(self.units[target].pos) > unit.range() {
                continue;
            }
            if unit.attack_cooldown > 0 || !unit.arrived(tick) {
                continue;
            }
            if !self.units[target].arrived(tick) && !unit.is_ranged() {
                continue;
            }
            match unit.can_cast() {
                true => self.cast(tick, i, target),
                false => self.strike(tick, i, target),
            }
        }
    }

    fn strike(&mut self, tick: Tick, i: usize, target: usize) {
        let damage = self.mitigated(i, target, self.units[i].stats.attack);
        let landing = tick + self.units[i].hit_delay() as Tick;
        self.pending.push(PendingHit {
            attacker: i,
            target,
            damage,
            landing,
            ranged: self.units[i].is_ranged(),
        });
        self.events.push(CombatEvent::UnitAttack {
            tick,
            attacker: self.units[i].id,
            target: self.units[target].id,
            damage,
            landing_tick: landing,
        });
        let period = self.units[i].attack_period();
        let unit = &mut self.units[i];
        unit.mana += MANA_PER_ATTACK;
        unit.attack_cooldown = period;
    }

    fn cast(&mut self, tick: Tick, i: usize, target: usize) {
        let ability = self.units[i].template.ability.unwrap_or(DEFAULT_ABILITY);
        let raw = self.units[i].stats.attack * ability.damage_mult + self.units[i].stats.ability_power;
        let damage = self.mitigated(i, target, raw);
        let landing = tick + ticks(ability.seconds * HIT_FRACTION) as Tick;
        self.pending.push(PendingHit {
            attacker: i,
            target,
            damage,
            landing,
            ranged: self.units[i].is_ranged(),
        });
        self.events.push(CombatEvent::UnitAbility {
            tick,
            attacker: self.units[i].id,
            target: self.units[target].id,
            name: ability.name,
            damage,
            landing_tick: landing,
            duration: ability.seconds,
        });
        // the cast locks both cooldowns for its animation
        let lock = ticks(ability.seconds);
        let unit = &mut self.units[i];
        unit.mana -= unit.stats.mana;
        unit.attack_cooldown = lock;
        unit.move_cooldown = lock;
    }

    fn mitigated(&self, attacker: usize, defender: usize, raw: f32) -> i32 {
        let defense = match self.units[attacker].template.affinity {
            Affinity::Physical => self.units[defender].stats.armor,
            Affinity::Magical => self.units[defender].stats.magic_resist,
        };
        (raw * (1.0 - defense / (defense + 100.0))).round() as i32
    }
}
