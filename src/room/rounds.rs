use super::command::AlarmKind;
use super::matchup::Away;
use super::matchup::Matchup;
use super::merchant::Merchant;
use super::merchant::Reward;
use super::phase::Phase;
use super::room::Room;
use crate::COMBAT_GRACE_SECONDS;
use crate::ClientId;
use crate::Gold;
use crate::INVENTORY_SLOTS;
use crate::InstanceId;
use crate::MAJOR_CREST_SECONDS;
use crate::MERCHANT_GRACE_SECONDS;
use crate::MERCHANT_SAFETY_SECONDS;
use crate::MERCHANT_TURN_SECONDS;
use crate::TICK_SECONDS;
use crate::catalog::Catalog;
use crate::catalog::RoundKind;
use crate::catalog::round_kind;
use crate::combat::CombatEvent;
use crate::combat::Fighter;
use crate::combat::Outcome;
use crate::combat::Roster;
use crate::combat::Simulator;
use crate::combat::Team;
use crate::error::ActionError;
use crate::player::LootDrop;
use crate::player::LootReward;
use crate::player::UnitInstance;
use crate::session::CrestView;
use crate::session::MatchupResultView;
use crate::session::MatchupView;
use crate::session::MerchantPairView;
use crate::session::ServerMessage;
use crate::session::event_batches;
use rand::Rng;
use rand::seq::SliceRandom;
use std::time::Duration;

/// Instance ids above this mark belong to encounter units.
const ENCOUNTER_ID_BASE: InstanceId = 1_000_000;

impl Room {
    pub(super) fn to_combat(&mut self) {
        self.bump();
        self.phase = Phase::Combat;
        let matchups = self.round_matchups();
        let outcomes = matchups.iter().map(|m| self.simulate(m)).collect::<Vec<_>>();
        for (matchup, outcome) in matchups.iter().zip(&outcomes) {
            self.apply_outcome(*matchup, outcome);
        }
        self.results = Self::result_views(&matchups, &outcomes);
        self.fan_out(&matchups, &outcomes);
        let longest = outcomes.iter().map(|o| o.duration_ticks).max().unwrap_or(0);
        let delay =
            Duration::from_secs_f32(longest as f32 * TICK_SECONDS + COMBAT_GRACE_SECONDS);
        log::debug!(
            "[room] round {} combat: {} matchups, results in {:?}",
            self.round,
            matchups.len(),
            delay
        );
        self.broadcast(&ServerMessage::PhaseUpdate {
            phase: self.phase,
            timer: delay.as_secs(),
            round: self.round,
        });
        self.schedule(AlarmKind::CombatOver, delay);
        self.broadcast_state();
    }

    fn simulate(&self, matchup: &Matchup) -> Outcome {
        let home = self.fighters_of(matchup.home);
        let away = match matchup.away {
            Away::Player(id) | Away::Ghost(id) => self.fighters_of(id),
            Away::Encounter(kind) => Self::encounter_fighters(kind),
        };
        Simulator::run(home, away)
    }

    fn fighters_of(&self, client: ClientId) -> Vec<Fighter> {
        let Some(index) = self.player_index(client) else {
            return Vec::new();
        };
        let player = &self.players[index];
        player
            .board_units()
            .into_iter()
            .map(|(unit, x, y)| Fighter {
                id: unit.id,
                template: unit.template,
                star: unit.star,
                stats: player.composed_stats(unit.id).unwrap_or_else(|| unit.base_stats()),
                x,
                y,
            })
            .collect()
    }

    fn encounter_fighters(kind: RoundKind) -> Vec<Fighter> {
        crate::catalog::encounter_board(kind)
            .iter()
            .enumerate()
            .map(|(i, (id, x, y))| {
                let template = Catalog::get().unit(id).expect("encounter units validated");
                Fighter {
                    id: ENCOUNTER_ID_BASE + i as InstanceId,
                    template,
                    star: 1,
                    stats: template.stats_at(1),
                    x: *x,
                    y: *y,
                }
            })
            .collect()
    }

    fn apply_outcome(&mut self, matchup: Matchup, outcome: &Outcome) {
        match matchup.away {
            Away::Ghost(_) => {}
            Away::Player(away) => {
                let (winner, loser) = match outcome.winner {
                    Team::Home => (matchup.home, away),
                    Team::Away => (away, matchup.home),
                };
                if let Some(index) = self.player_index(winner) {
                    self.players[index].record_win();
                }
                if let Some(index) = self.player_index(loser) {
                    self.players[index].record_loss();
                    self.damage_player(index, outcome.damage);
                }
            }
            Away::Encounter(_) => {
                let Some(index) = self.player_index(matchup.home) else { return };
                match outcome.winner {
                    Team::Home => self.players[index].record_win(),
                    Team::Away => {
                        self.players[index].record_loss();
                        self.damage_player(index, outcome.damage);
                    }
                }
                self.collect_drops(index, outcome);
            }
        }
    }

    fn damage_player(&mut self, index: usize, damage: crate::Health) {
        let player = &mut self.players[index];
        player.health = (player.health - damage).max(0);
        if player.health == 0 {
            player.eliminated = true;
            log::info!("[room] player {} eliminated", player.id);
        }
    }

    /// Queues loot for every tagged encounter death in the log. Unit
    /// rewards reserve their pool copy when rolled, so conservation
    /// holds while the token sits uncollected.
    fn collect_drops(&mut self, index: usize, outcome: &Outcome) {
        let tags = outcome
            .events
            .iter()
            .filter_map(|event| match event {
                CombatEvent::UnitDeath { loot: Some(tag), .. } => Some(*tag),
                _ => None,
            })
            .collect::<Vec<_>>();
        for tag in tags {
            self.roll_loot(index, tag);
        }
    }

    fn roll_loot(&mut self, index: usize, tag: &'static str) {
        let catalog = Catalog::get();
        let reward = match tag {
            "trinket" => {
                let components = catalog.components();
                LootReward::Item(components[self.rng.random_range(0..components.len())])
            }
            "hoard" => match self.rng.random_range(0..3u8) {
                0 => {
                    let combined = catalog.combined_items();
                    LootReward::Item(combined[self.rng.random_range(0..combined.len())])
                }
                1 => LootReward::Gold(10),
                _ => {
                    let units = catalog.units_of_cost(4);
                    let template = units[self.rng.random_range(0..units.len())];
                    match self.pool.available(template.id) > 0 {
                        true => {
                            self.pool.take(template.id);
                            LootReward::Unit(template)
                        }
                        false => LootReward::Gold(template.cost as Gold * 2),
                    }
                }
            },
            _ => LootReward::Gold(2),
        };
        self.loot_ids += 1;
        let id = self.loot_ids;
        self.players[index].loot.push(LootDrop { id, tag, reward });
    }

    fn result_views(matchups: &[Matchup], outcomes: &[Outcome]) -> Vec<MatchupResultView> {
        matchups
            .iter()
            .zip(outcomes)
            .enumerate()
            .map(|(index, (m, o))| {
                let away = match m.away {
                    Away::Player(id) => Some(id),
                    _ => None,
                };
                let winner_id = match (m.away, o.winner) {
                    (Away::Ghost(_), _) => None,
                    (_, Team::Home) => Some(m.home),
                    (Away::Player(id), Team::Away) => Some(id),
                    (_, Team::Away) => None,
                };
                MatchupResultView {
                    index,
                    home: m.home,
                    away,
                    winner_id,
                    damage: o.damage,
                    survivors: o.survivors,
                    duration_seconds: o.duration_ticks as f32 * TICK_SECONDS,
                    ghost: matches!(m.away, Away::Ghost(_)),
                }
            })
            .collect()
    }

    /// Streams every matchup to every client: their own as the primary
    /// feed, the rest as scout feeds, all in transport-sized batches.
    fn fan_out(&self, matchups: &[Matchup], outcomes: &[Outcome]) {
        let views = matchups
            .iter()
            .enumerate()
            .map(|(index, m)| MatchupView {
                index,
                home: m.home,
                away: match m.away {
                    Away::Player(id) => Some(id),
                    _ => None,
                },
                ghost: matches!(m.away, Away::Ghost(_)),
                pve: matches!(m.away, Away::Encounter(_)),
            })
            .collect::<Vec<_>>();
        for player in &self.players {
            if !player.connected {
                continue;
            }
            let mine = matchups.iter().position(|m| {
                m.home == player.id || matches!(m.away, Away::Player(a) if a == player.id)
            });
            for (index, outcome) in outcomes.iter().enumerate() {
                let batches = event_batches(&outcome.events);
                let total = outcome.events.len();
                let last = batches.len() - 1;
                if mine == Some(index) {
                    let side = match matchups[index].home == player.id {
                        true => Team::Home,
                        false => Team::Away,
                    };
                    let (my_team, opponent_team) = Self::rosters(outcome, side);
                    self.send(
                        player.id,
                        &ServerMessage::CombatStart {
                            round: self.round,
                            matchups: views.clone(),
                            combat_events: batches[0].clone(),
                            my_team,
                            opponent_team,
                            total_events: total,
                            batch_index: 0,
                        },
                    );
                    for (i, batch) in batches.iter().enumerate().skip(1) {
                        self.send(
                            player.id,
                            &ServerMessage::CombatEventsBatch {
                                round: self.round,
                                combat_events: batch.clone(),
                                batch_index: i,
                                is_last: i == last,
                            },
                        );
                    }
                } else {
                    self.send(
                        player.id,
                        &ServerMessage::ScoutCombatEvents {
                            round: self.round,
                            matchup: index,
                            combat_events: batches[0].clone(),
                            total_events: total,
                            batch_index: 0,
                        },
                    );
                    for (i, batch) in batches.iter().enumerate().skip(1) {
                        self.send(
                            player.id,
                            &ServerMessage::ScoutCombatEventsBatch {
                                round: self.round,
                                matchup: index,
                                combat_events: batch.clone(),
                                batch_index: i,
                                is_last: i == last,
                            },
                        );
                    }
                }
            }
        }
    }

    fn rosters(outcome: &Outcome, side: Team) -> (Vec<Roster>, Vec<Roster>) {
        match outcome.events.first() {
            Some(CombatEvent::CombatStart { units, .. }) => units
                .iter()
                .cloned()
                .partition(|roster| roster.team == side),
            _ => (Vec::new(), Vec::new()),
        }
    }
}

impl Room {
    pub(super) fn start_merchant(&mut self) {
        let pickers = self.players.iter().filter(|p| p.active()).collect::<Vec<_>>();
        let merchant = Merchant::generate(&pickers, &mut self.rng);
        let order = merchant.order.clone();
        let picker = merchant.current_picker();
        self.merchant = Some(merchant);
        self.broadcast(&ServerMessage::MerchantStart {
            pairs: self.merchant_views(),
            order,
            picker,
            turn_seconds: MERCHANT_TURN_SECONDS,
        });
        self.schedule(
            AlarmKind::MerchantTurn { turn: 0 },
            Duration::from_secs(MERCHANT_TURN_SECONDS),
        );
        self.schedule(
            AlarmKind::MerchantSafety,
            Duration::from_secs(MERCHANT_SAFETY_SECONDS),
        );
    }

    fn merchant_views(&self) -> Vec<MerchantPairView> {
        self.merchant
            .as_ref()
            .map(|m| {
                m.pairs
                    .iter()
                    .enumerate()
                    .map(|(option_id, pair)| MerchantPairView {
                        option_id,
                        rewards: vec![pair.rewards.0.view(), pair.rewards.1.view()],
                        taken_by: pair.taken_by,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(super) fn merchant_pick(&mut self, index: usize, option: usize) -> Result<(), ActionError> {
        if self.phase != Phase::Planning || round_kind(self.round) != RoundKind::MadMerchant {
            return Err(ActionError::WrongPhase);
        }
        let client = self.players[index].id;
        let merchant = self.merchant.as_mut().ok_or(ActionError::WrongPhase)?;
        let rewards = merchant.pick(client, option)?;
        self.apply_reward(index, rewards.0);
        self.apply_reward(index, rewards.1);
        self.broadcast(&ServerMessage::MerchantPick {
            player_id: client,
            option_id: option,
            auto: false,
        });
        self.advance_merchant();
        Ok(())
    }

    fn apply_reward(&mut self, index: usize, reward: Reward) {
        match reward {
            Reward::Gold(amount) => self.players[index].gold += amount,
            Reward::Rerolls(count) => self.players[index].free_rerolls += count,
            Reward::Item(item) => {
                let player = &mut self.players[index];
                if player.inventory.len() < INVENTORY_SLOTS {
                    player.inventory.push(item);
                }
            }
            Reward::Crest(crest) => {
                self.players[index].acquire_minor_crest(crest);
            }
            Reward::Unit(template) => {
                let convertible = self.players[index].bench_free_slot().is_none()
                    || self.pool.available(template.id) == 0;
                if convertible {
                    self.players[index].gold += template.cost as Gold * 2;
                    return;
                }
                self.pool.take(template.id);
                let id = self.next_instance();
                let _ = self.players[index].add_to_bench(UnitInstance::new(id, template));
                self.players[index].merge_check(id);
            }
        }
    }

    pub(super) fn advance_merchant(&mut self) {
        let present = self
            .players
            .iter()
            .filter(|p| p.active())
            .map(|p| p.id)
            .collect::<Vec<_>>();
        let next = match self.merchant.as_mut() {
            Some(merchant) if !merchant.done => merchant.advance(|id| present.contains(&id)),
            _ => return,
        };
        match next {
            Some(picker) => {
                let turn = self.merchant.as_ref().map(|m| m.turn).unwrap_or(0);
                self.broadcast(&ServerMessage::MerchantTurnUpdate { picker });
                self.schedule(
                    AlarmKind::MerchantTurn { turn },
                    Duration::from_secs(MERCHANT_TURN_SECONDS),
                );
            }
            None => self.finish_merchant(),
        }
    }

    pub(super) fn merchant_timeout(&mut self, turn: usize) {
        let (picker, option) = {
            let Some(merchant) = self.merchant.as_ref() else { return };
            if merchant.done || merchant.turn != turn {
                return;
            }
            let Some(picker) = merchant.current_picker() else {
                self.advance_merchant();
                return;
            };
            (picker, merchant.auto_option())
        };
        if let Some(option) = option {
            let picked = self.merchant.as_mut().and_then(|m| m.pick(picker, option).ok());
            if let Some(rewards) = picked {
                if let Some(index) = self.player_index(picker) {
                    self.apply_reward(index, rewards.0);
                    self.apply_reward(index, rewards.1);
                }
                self.broadcast(&ServerMessage::MerchantPick {
                    player_id: picker,
                    option_id: option,
                    auto: true,
                });
                self.broadcast_state();
            }
        }
        self.advance_merchant();
    }

    pub(super) fn finish_merchant(&mut self) {
        if self.merchant.take().is_none() {
            return;
        }
        self.broadcast(&ServerMessage::MerchantEnd);
        self.broadcast_state();
        self.bump();
        self.schedule(AlarmKind::MerchantDone, Duration::from_secs(MERCHANT_GRACE_SECONDS));
    }
}

impl Room {
    pub(super) fn start_major_crest(&mut self) {
        let majors = Catalog::get().major_crests();
        for index in 0..self.players.len() {
            if !self.players[index].active() {
                continue;
            }
            let mut options = majors.clone();
            options.shuffle(&mut self.rng);
            options.truncate(3);
            let views = options.iter().copied().map(CrestView::from).collect::<Vec<_>>();
            self.players[index].pending.major_choices = Some(options);
            self.send(self.players[index].id, &ServerMessage::MajorCrestStart { options: views });
        }
        self.schedule(
            AlarmKind::MajorCrestOver,
            Duration::from_secs(MAJOR_CREST_SECONDS),
        );
    }

    pub(super) fn select_major(&mut self, index: usize, id: &str) -> Result<(), ActionError> {
        self.players[index].select_major_crest(id)?;
        let crest_id = self.players[index].major_crest.map(|c| c.id).unwrap_or_default();
        self.broadcast(&ServerMessage::MajorCrestSelect {
            player_id: self.players[index].id,
            crest_id,
        });
        let everyone_chose = self
            .players
            .iter()
            .filter(|p| p.active())
            .all(|p| p.pending.major_choices.is_none());
        let in_round =
            self.phase == Phase::Planning && round_kind(self.round) == RoundKind::MajorCrest;
        if in_round && everyone_chose {
            self.finish_major_crest();
        }
        Ok(())
    }

    /// Auto-assigns a random option to anyone still undecided, then
    /// moves to the next round, skipping combat and results.
    pub(super) fn finish_major_crest(&mut self) {
        for index in 0..self.players.len() {
            if !self.players[index].active() {
                continue;
            }
            let Some(options) = self.players[index].pending.major_choices.clone() else {
                continue;
            };
            if options.is_empty() {
                self.players[index].pending.major_choices = None;
                continue;
            }
            let pick = options[self.rng.random_range(0..options.len())];
            let _ = self.players[index].select_major_crest(pick.id);
            self.broadcast(&ServerMessage::MajorCrestSelect {
                player_id: self.players[index].id,
                crest_id: pick.id,
            });
        }
        self.broadcast(&ServerMessage::MajorCrestEnd);
        self.start_planning(self.round + 1);
    }
}
