use super::view::CrestView;
use super::view::GameStateView;
use super::view::LobbyPlayerView;
use super::view::RoomSummary;
use crate::ClientId;
use crate::EVENT_BATCH_SIZE;
use crate::Health;
use crate::combat::CombatEvent;
use crate::combat::Roster;
use crate::room::Phase;
use serde::Serialize;

/// Messages sent from server to client over WebSocket. A tagged union
/// keyed by `type`, mirroring the inbound shape.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// Connection established; the id is stable for the socket lifetime.
    Welcome { client_id: ClientId },
    NameSet { name: String },
    RoomCreated { room_id: String },
    RoomJoined {
        room_id: String,
        slot: usize,
        players: Vec<LobbyPlayerView>,
    },
    LeftRoom,
    RoomList { rooms: Vec<RoomSummary> },
    PlayerJoined { player: LobbyPlayerView },
    PlayerLeft { player_id: ClientId, name: String },
    PlayerReady { player_id: ClientId, ready: bool },
    BecameHost { player_id: ClientId },
    GameStart { attuned: &'static str },
    GameState { state: GameStateView },
    PhaseUpdate { phase: Phase, timer: u64, round: u32 },
    RoundStart { round: u32, kind: crate::catalog::RoundKind },
    /// Opening combat frame: roster plus the first event batch.
    CombatStart {
        round: u32,
        matchups: Vec<MatchupView>,
        combat_events: Vec<CombatEvent>,
        my_team: Vec<Roster>,
        opponent_team: Vec<Roster>,
        total_events: usize,
        batch_index: usize,
    },
    CombatEventsBatch {
        round: u32,
        combat_events: Vec<CombatEvent>,
        batch_index: usize,
        is_last: bool,
    },
    /// Same-shape stream for a matchup the receiver is not part of.
    ScoutCombatEvents {
        round: u32,
        matchup: usize,
        combat_events: Vec<CombatEvent>,
        total_events: usize,
        batch_index: usize,
    },
    ScoutCombatEventsBatch {
        round: u32,
        matchup: usize,
        combat_events: Vec<CombatEvent>,
        batch_index: usize,
        is_last: bool,
    },
    CombatEnd { results: Vec<MatchupResultView> },
    MerchantStart {
        pairs: Vec<MerchantPairView>,
        order: Vec<ClientId>,
        picker: Option<ClientId>,
        turn_seconds: u64,
    },
    MerchantPick {
        player_id: ClientId,
        option_id: usize,
        auto: bool,
    },
    MerchantTurnUpdate { picker: ClientId },
    MerchantEnd,
    MajorCrestStart { options: Vec<CrestView> },
    MajorCrestSelect { player_id: ClientId, crest_id: &'static str },
    MajorCrestEnd,
    ActionResult {
        action: &'static str,
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    GameEnd { winner_id: ClientId, winner_name: String },
    Chat {
        player_id: ClientId,
        name: String,
        message: String,
    },
    Error { message: String },
}

/// One pairing of the round as shown to every client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchupView {
    pub index: usize,
    pub home: ClientId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub away: Option<ClientId>,
    pub ghost: bool,
    pub pve: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchupResultView {
    pub index: usize,
    pub home: ClientId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub away: Option<ClientId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner_id: Option<ClientId>,
    pub damage: Health,
    pub survivors: usize,
    pub duration_seconds: f32,
    pub ghost: bool,
}

/// One merchant pair and its taken state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantPairView {
    pub option_id: usize,
    pub rewards: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taken_by: Option<ClientId>,
}

impl ServerMessage {
    pub fn error(message: impl std::fmt::Display) -> Self {
        Self::Error { message: message.to_string() }
    }
    pub fn result_ok(action: &'static str) -> Self {
        Self::ActionResult { action, success: true, error: None }
    }
    pub fn result_err(action: &'static str, error: impl std::fmt::Display) -> Self {
        Self::ActionResult {
            action,
            success: false,
            error: Some(error.to_string()),
        }
    }
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("serialize server message")
    }
}

/// Splits an event log into transport-sized batches. Always yields at
/// least one (possibly empty) chunk so the opening frame exists.
pub fn event_batches(events: &[CombatEvent]) -> Vec<Vec<CombatEvent>> {
    match events.is_empty() {
        true => vec![Vec::new()],
        false => events.chunks(EVENT_BATCH_SIZE).map(|c| c.to_vec()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outbound_frames_tag_by_type() {
        let json = ServerMessage::Welcome { client_id: 12 }.to_json();
        assert_eq!(json, r#"{"type":"welcome","clientId":12}"#);
        let json = ServerMessage::PhaseUpdate {
            phase: Phase::Planning,
            timer: 20,
            round: 3,
        }
        .to_json();
        assert!(json.contains("\"type\":\"phaseUpdate\""));
        assert!(json.contains("\"phase\":\"planning\""));
    }

    #[test]
    fn action_results_carry_contract_wording() {
        let json = ServerMessage::result_err("buyUnit", crate::error::ActionError::NotEnoughGold)
            .to_json();
        assert!(json.contains("\"success\":false"));
        assert!(json.contains("Not enough gold"));
    }

    #[test]
    fn batches_split_at_fifty() {
        let events = (0..120)
            .map(|i| CombatEvent::UnitDamage { tick: i, target: 1, damage: 1, health: 1.0 })
            .collect::<Vec<_>>();
        let batches = event_batches(&events);
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].len(), 50);
        assert_eq!(batches[1].len(), 50);
        assert_eq!(batches[2].len(), 20);
    }

    #[test]
    fn empty_logs_still_open_a_stream() {
        assert_eq!(event_batches(&[]).len(), 1);
    }
}
