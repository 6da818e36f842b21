use super::command::Alarm;
use super::command::AlarmKind;
use super::command::Command;
use super::matchup::Away;
use super::matchup::HostMemory;
use super::matchup::Matchup;
use super::merchant::Merchant;
use super::phase::Phase;
use super::timer::Timers;
use crate::ClientId;
use crate::InstanceId;
use crate::MAX_PLAYERS;
use crate::MIN_PLAYERS;
use crate::PLANNING_INTRO_SECONDS;
use crate::PLANNING_MERCHANT_SECONDS;
use crate::PLANNING_SECONDS;
use crate::RESULTS_SECONDS;
use crate::XP_PER_ROUND;
use crate::catalog::Catalog;
use crate::catalog::RoundKind;
use crate::catalog::copies_of;
use crate::catalog::round_kind;
use crate::error::ActionError;
use crate::lobby::RoomStatus;
use crate::player::LootReward;
use crate::player::PlayerState;
use crate::player::UnitInstance;
use crate::pool::UnitPool;
use crate::session::GameStateView;
use crate::session::LobbyPlayerView;
use crate::session::MatchupResultView;
use crate::session::Outbox;
use crate::session::PlayerView;
use crate::session::ServerMessage;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::oneshot;

/// Live game coordinator. One room runs as one task consuming a command
/// mailbox, so inbound actions, timer callbacks, and disconnects are
/// totally ordered; rooms share nothing but the read-only catalogue.
pub struct Room {
    code: String,
    tx: UnboundedSender<Command>,
    rx: UnboundedReceiver<Command>,
    status: Arc<RoomStatus>,
    pub(super) phase: Phase,
    pub(super) generation: u64,
    pub(super) round: u32,
    pub(super) started: bool,
    pub(super) players: Vec<PlayerState>,
    outboxes: HashMap<ClientId, Outbox>,
    host: Option<ClientId>,
    pub(super) pool: UnitPool,
    pub(super) rng: SmallRng,
    pub(super) timers: Timers,
    pub(super) hosts: HostMemory,
    pub(super) merchant: Option<Merchant>,
    pub(super) results: Vec<MatchupResultView>,
    pub(super) attuned: &'static str,
    pub(super) instances: InstanceId,
    pub(super) loot_ids: u64,
}

impl Room {
    pub fn create(
        code: String,
        seed: u64,
        status: Arc<RoomStatus>,
    ) -> (UnboundedSender<Command>, Self) {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let room = Self {
            code,
            tx: tx.clone(),
            rx,
            status,
            phase: Phase::Waiting,
            generation: 0,
            round: 0,
            started: false,
            players: Vec::new(),
            outboxes: HashMap::new(),
            host: None,
            pool: UnitPool::new(),
            rng: SmallRng::seed_from_u64(seed),
            timers: Timers::default(),
            hosts: HostMemory::new(),
            merchant: None,
            results: Vec::new(),
            attuned: Catalog::get().elements()[0],
            instances: 0,
            loot_ids: 0,
        };
        (tx, room)
    }

    pub async fn run(mut self, done: oneshot::Sender<()>) {
        log::info!("[room {}] open", self.code);
        while let Some(command) = self.rx.recv().await {
            self.handle(command);
            if self.players.is_empty() {
                break;
            }
        }
        self.timers.cancel_all();
        log::info!("[room {}] closed", self.code);
        let _ = done.send(());
    }

    /// Applies one command. Synchronous: a command's mutation and its
    /// broadcasts commit before the next command is observed.
    pub fn handle(&mut self, command: Command) {
        match command {
            Command::Join { client, name, outbox, reply } => {
                let result = self.join(client, name, outbox);
                let _ = reply.send(result);
            }
            Command::Leave { client } => self.leave(client),
            Command::Ready { client, ready } => self.set_ready(client, ready),
            Command::Chat { client, message } => self.chat(client, message),
            Command::Action { client, action } => self.action(client, action),
            Command::Alarm(alarm) => self.alarm(alarm),
        }
    }
}

impl Room {
    pub(super) fn player_index(&self, client: ClientId) -> Option<usize> {
        self.players.iter().position(|p| p.id == client)
    }

    pub(super) fn active_ids(&self) -> Vec<ClientId> {
        self.players.iter().filter(|p| p.active()).map(|p| p.id).collect()
    }

    pub(super) fn send(&self, client: ClientId, message: &ServerMessage) {
        if let Some(outbox) = self.outboxes.get(&client) {
            if outbox.send(message.to_json()).is_err() {
                log::warn!("[room {}] dead outbox for {}", self.code, client);
            }
        }
    }

    pub(super) fn broadcast(&self, message: &ServerMessage) {
        let json = message.to_json();
        for player in &self.players {
            if let Some(outbox) = self.outboxes.get(&player.id) {
                let _ = outbox.send(json.clone());
            }
        }
    }

    pub(super) fn state_view(&self) -> GameStateView {
        GameStateView {
            phase: self.phase,
            round: self.round,
            round_kind: round_kind(self.round.max(1)),
            attuned: self.attuned,
            players: self.players.iter().map(PlayerView::from).collect(),
        }
    }

    pub(super) fn broadcast_state(&self) {
        self.broadcast(&ServerMessage::GameState { state: self.state_view() });
    }

    fn lobby_roster(&self) -> Vec<LobbyPlayerView> {
        self.players
            .iter()
            .map(|p| LobbyPlayerView {
                id: p.id,
                name: p.name.clone(),
                slot: p.slot,
                ready: p.ready,
                host: self.host == Some(p.id),
            })
            .collect()
    }

    /// Enters a new generation: cancels every outstanding timer (best
    /// effort) and bumps the counter (the guarantee).
    pub(super) fn bump(&mut self) {
        self.generation += 1;
        self.timers.cancel_all();
    }

    pub(super) fn schedule(&mut self, kind: AlarmKind, delay: Duration) {
        self.timers.schedule(&self.tx, self.generation, kind, delay);
    }

    pub(super) fn next_instance(&mut self) -> InstanceId {
        self.instances += 1;
        self.instances
    }
}

impl Room {
    fn join(&mut self, client: ClientId, name: String, outbox: Outbox) -> Result<(), ActionError> {
        if self.started {
            return Err(ActionError::GameInProgress);
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(ActionError::RoomFull);
        }
        let slot = (0..MAX_PLAYERS)
            .find(|s| !self.players.iter().any(|p| p.slot == *s))
            .unwrap_or(self.players.len());
        self.outboxes.insert(client, outbox);
        self.players.push(PlayerState::new(client, name, slot));
        self.host.get_or_insert(client);
        self.status.players.store(self.players.len(), Ordering::Relaxed);
        log::info!("[room {}] {} joined at slot {}", self.code, client, slot);
        self.send(
            client,
            &ServerMessage::RoomJoined {
                room_id: self.code.clone(),
                slot,
                players: self.lobby_roster(),
            },
        );
        let joined = self.lobby_roster().into_iter().find(|p| p.id == client);
        if let Some(player) = joined {
            self.broadcast(&ServerMessage::PlayerJoined { player });
        }
        Ok(())
    }

    /// Detach path shared by explicit leaves and socket loss. The
    /// player's copies flow back to the pool so conservation holds.
    fn leave(&mut self, client: ClientId) {
        let Some(index) = self.player_index(client) else {
            self.outboxes.remove(&client);
            return;
        };
        let player = self.players.remove(index);
        self.outboxes.remove(&client);
        self.status.players.store(self.players.len(), Ordering::Relaxed);
        for template in player.shop.iter().flatten() {
            self.pool.put(template.id, 1);
        }
        for unit in player.units.values() {
            self.pool.put(unit.template.id, copies_of(unit.star));
        }
        for drop in &player.loot {
            if let LootReward::Unit(template) = drop.reward {
                self.pool.put(template.id, 1);
            }
        }
        log::info!("[room {}] {} left", self.code, client);
        self.broadcast(&ServerMessage::PlayerLeft { player_id: player.id, name: player.name });
        if self.host == Some(client) {
            self.host = self.players.first().map(|p| p.id);
            if let Some(host) = self.host {
                self.broadcast(&ServerMessage::BecameHost { player_id: host });
            }
        }
        if self.players.is_empty() {
            return;
        }
        match self.phase {
            Phase::Waiting => self.check_start(),
            Phase::GameOver => {}
            _ => {
                if self.merchant.as_ref().and_then(Merchant::current_picker) == Some(client) {
                    self.advance_merchant();
                }
                if self.phase == Phase::Planning {
                    self.check_planning_done();
                }
                self.check_game_over();
            }
        }
    }

    pub(crate) fn set_ready(&mut self, client: ClientId, ready: bool) {
        let Some(index) = self.player_index(client) else { return };
        self.players[index].ready = ready;
        self.broadcast(&ServerMessage::PlayerReady { player_id: client, ready });
        match self.phase {
            Phase::Waiting => self.check_start(),
            Phase::Planning => self.check_planning_done(),
            _ => {}
        }
    }

    fn check_start(&mut self) {
        let enough = self.players.len() >= MIN_PLAYERS;
        if enough && self.players.iter().all(|p| p.ready) {
            self.start_game();
        }
    }

    fn check_planning_done(&mut self) {
        if round_kind(self.round).is_special() {
            return;
        }
        let mut active = self.players.iter().filter(|p| p.active()).peekable();
        if active.peek().is_some() && active.all(|p| p.ready) {
            self.to_combat();
        }
    }

    fn chat(&mut self, client: ClientId, message: String) {
        let Some(index) = self.player_index(client) else { return };
        self.broadcast(&ServerMessage::Chat {
            player_id: client,
            name: self.players[index].name.clone(),
            message,
        });
    }
}

impl Room {
    fn start_game(&mut self) {
        self.started = true;
        self.status.started.store(true, Ordering::Relaxed);
        self.pool = UnitPool::new();
        self.hosts.clear();
        let elements = Catalog::get().elements();
        self.attuned = elements[self.rng.random_range(0..elements.len())];
        log::info!("[room {}] game start, attuned to {}", self.code, self.attuned);
        for index in 0..self.players.len() {
            self.players[index].reset();
            self.grant_starting_unit(index);
            self.fill_shop(index);
        }
        self.broadcast(&ServerMessage::GameStart { attuned: self.attuned });
        self.start_planning(1);
    }

    fn grant_starting_unit(&mut self, index: usize) {
        let candidates = Catalog::get().units_of_cost(1);
        let template = candidates[self.rng.random_range(0..candidates.len())];
        self.pool.take(template.id);
        let id = self.next_instance();
        let _ = self.players[index].add_to_bench(UnitInstance::new(id, template));
    }

    /// Returns unsold stock to the pool, then reserves four fresh rolls.
    pub(super) fn fill_shop(&mut self, index: usize) {
        for slot in self.players[index].shop.iter_mut() {
            if let Some(template) = slot.take() {
                self.pool.put(template.id, 1);
            }
        }
        let level = self.players[index].level;
        for slot in 0..crate::SHOP_SLOTS {
            match self.pool.roll(level, &mut self.rng) {
                Some(template) => {
                    self.pool.take(template.id);
                    self.players[index].shop[slot] = Some(template);
                }
                None => self.players[index].shop[slot] = None,
            }
        }
    }

    pub(super) fn planning_seconds(kind: RoundKind) -> u64 {
        match kind {
            RoundKind::PveIntro => PLANNING_INTRO_SECONDS,
            RoundKind::MadMerchant => PLANNING_MERCHANT_SECONDS,
            _ => PLANNING_SECONDS,
        }
    }

    pub(super) fn start_planning(&mut self, round: u32) {
        self.bump();
        self.round = round;
        self.phase = Phase::Planning;
        self.merchant = None;
        self.results.clear();
        let kind = round_kind(round);
        for index in 0..self.players.len() {
            if !self.players[index].active() {
                continue;
            }
            self.players[index].planning_income();
            if !kind.is_special() {
                self.players[index].gain_xp(XP_PER_ROUND);
            }
            self.players[index].merge_sweep();
            if !self.players[index].shop_locked {
                self.fill_shop(index);
            }
            self.players[index].ready = false;
            self.players[index].refresh_traits();
        }
        log::debug!("[room {}] round {} ({:?})", self.code, round, kind);
        self.broadcast(&ServerMessage::RoundStart { round, kind });
        self.broadcast(&ServerMessage::PhaseUpdate {
            phase: self.phase,
            timer: Self::planning_seconds(kind),
            round,
        });
        match kind {
            RoundKind::MadMerchant => self.start_merchant(),
            RoundKind::MajorCrest => self.start_major_crest(),
            _ => {
                let delay = Duration::from_secs(Self::planning_seconds(kind));
                self.schedule(AlarmKind::PlanningOver, delay);
            }
        }
        self.broadcast_state();
    }

    pub(super) fn to_results(&mut self) {
        self.bump();
        self.phase = Phase::Results;
        self.broadcast(&ServerMessage::CombatEnd { results: self.results.clone() });
        self.broadcast(&ServerMessage::PhaseUpdate {
            phase: self.phase,
            timer: RESULTS_SECONDS,
            round: self.round,
        });
        self.broadcast_state();
        if !self.check_game_over() {
            self.schedule(AlarmKind::ResultsOver, Duration::from_secs(RESULTS_SECONDS));
        }
    }

    /// Ends the game once at most one player is left standing.
    pub(super) fn check_game_over(&mut self) -> bool {
        if !self.started || self.phase == Phase::GameOver {
            return false;
        }
        if self.active_ids().len() > 1 {
            return false;
        }
        self.bump();
        self.phase = Phase::GameOver;
        let winner = self
            .players
            .iter()
            .filter(|p| p.active())
            .map(|p| (p.id, p.name.clone()))
            .next()
            .or_else(|| {
                self.players
                    .iter()
                    .max_by_key(|p| (p.health, std::cmp::Reverse(p.slot)))
                    .map(|p| (p.id, p.name.clone()))
            });
        if let Some((winner_id, winner_name)) = winner {
            log::info!("[room {}] game over, {} wins", self.code, winner_id);
            self.broadcast(&ServerMessage::GameEnd { winner_id, winner_name });
        }
        self.broadcast_state();
        true
    }

    fn alarm(&mut self, alarm: Alarm) {
        if alarm.generation != self.generation {
            log::debug!(
                "[room {}] stale alarm {:?} (gen {} != {})",
                self.code,
                alarm.kind,
                alarm.generation,
                self.generation
            );
            return;
        }
        match (self.phase, alarm.kind) {
            (Phase::Planning, AlarmKind::PlanningOver) => self.to_combat(),
            (Phase::Combat, AlarmKind::CombatOver) => self.to_results(),
            (Phase::Results, AlarmKind::ResultsOver) => self.start_planning(self.round + 1),
            (Phase::Planning, AlarmKind::MerchantTurn { turn }) => self.merchant_timeout(turn),
            (Phase::Planning, AlarmKind::MerchantSafety) => self.finish_merchant(),
            (Phase::Planning, AlarmKind::MerchantDone) => self.start_planning(self.round + 1),
            (Phase::Planning, AlarmKind::MajorCrestOver) => self.finish_major_crest(),
            (phase, kind) => {
                log::debug!("[room {}] alarm {:?} drifted into {:?}", self.code, kind, phase)
            }
        }
    }
}

impl Room {
    /// Pairings for the round, shared host-memory applied.
    pub(super) fn round_matchups(&mut self) -> Vec<Matchup> {
        let kind = round_kind(self.round);
        if kind.is_pve() {
            self.active_ids()
                .into_iter()
                .map(|id| Matchup { home: id, away: Away::Encounter(kind) })
                .collect()
        } else {
            let active = self.active_ids();
            super::matchup::pairings(&active, &mut self.hosts, &mut self.rng)
        }
    }
}
