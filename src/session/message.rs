use serde::Deserialize;

/// Messages sent from client to server over WebSocket. The wire protocol
/// is a tagged union keyed by `type`; unknown types fail deserialization
/// and are rejected.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    SetName { name: String },
    CreateRoom,
    JoinRoom { room_id: String },
    LeaveRoom,
    ListRooms,
    Ready { ready: bool },
    Chat { message: String },
    Action { action: PlayerAction },
}

/// In-game intents, routed to the player's room and validated there.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PlayerAction {
    BuyUnit { shop_index: usize },
    SellUnit { instance_id: u64 },
    PlaceUnit { instance_id: u64, x: usize, y: usize },
    BenchUnit { instance_id: u64, target_slot: Option<usize> },
    MoveBenchUnit { instance_id: u64, target_slot: usize },
    Reroll,
    #[serde(rename = "buyXP")]
    BuyXp,
    ToggleShopLock,
    Ready { ready: bool },
    CollectLoot { loot_id: u64 },
    EquipItem { item_index: usize, instance_id: u64 },
    UnequipItem { instance_id: u64, item_slot: usize },
    CombineItems { item_index_1: usize, item_index_2: usize },
    UseConsumable { item_index: usize },
    SelectCrestChoice { choice_index: usize },
    SelectItemChoice { choice_index: usize },
    ReplaceCrest { replace_index: usize },
    SelectMinorCrest { crest_id: String },
    SelectMajorCrest { crest_id: String },
    MerchantPick { option_id: usize },
}

impl PlayerAction {
    /// Wire tag, echoed back in action results.
    pub fn name(&self) -> &'static str {
        match self {
            Self::BuyUnit { .. } => "buyUnit",
            Self::SellUnit { .. } => "sellUnit",
            Self::PlaceUnit { .. } => "placeUnit",
            Self::BenchUnit { .. } => "benchUnit",
            Self::MoveBenchUnit { .. } => "moveBenchUnit",
            Self::Reroll => "reroll",
            Self::BuyXp => "buyXP",
            Self::ToggleShopLock => "toggleShopLock",
            Self::Ready { .. } => "ready",
            Self::CollectLoot { .. } => "collectLoot",
            Self::EquipItem { .. } => "equipItem",
            Self::UnequipItem { .. } => "unequipItem",
            Self::CombineItems { .. } => "combineItems",
            Self::UseConsumable { .. } => "useConsumable",
            Self::SelectCrestChoice { .. } => "selectCrestChoice",
            Self::SelectItemChoice { .. } => "selectItemChoice",
            Self::ReplaceCrest { .. } => "replaceCrest",
            Self::SelectMinorCrest { .. } => "selectMinorCrest",
            Self::SelectMajorCrest { .. } => "selectMajorCrest",
            Self::MerchantPick { .. } => "merchantPick",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_wire_shapes() {
        let joined: ClientMessage =
            serde_json::from_str(r#"{"type":"joinRoom","roomId":"AB2C"}"#).expect("parse");
        assert!(matches!(joined, ClientMessage::JoinRoom { room_id } if room_id == "AB2C"));
        let action: ClientMessage = serde_json::from_str(
            r#"{"type":"action","action":{"type":"placeUnit","instanceId":7,"x":2,"y":1}}"#,
        )
        .expect("parse");
        assert!(matches!(
            action,
            ClientMessage::Action { action: PlayerAction::PlaceUnit { instance_id: 7, x: 2, y: 1 } }
        ));
    }

    #[test]
    fn buy_xp_keeps_its_legacy_casing() {
        let parsed: PlayerAction = serde_json::from_str(r#"{"type":"buyXP"}"#).expect("parse");
        assert!(matches!(parsed, PlayerAction::BuyXp));
        assert_eq!(parsed.name(), "buyXP");
    }

    #[test]
    fn unknown_types_are_rejected() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"hackTheGibson"}"#).is_err());
        assert!(serde_json::from_str::<PlayerAction>(r#"{"type":"deleteAllUnits"}"#).is_err());
    }

    #[test]
    fn optional_bench_slot_may_be_absent() {
        let parsed: PlayerAction =
            serde_json::from_str(r#"{"type":"benchUnit","instanceId":3}"#).expect("parse");
        assert!(matches!(parsed, PlayerAction::BenchUnit { instance_id: 3, target_slot: None }));
    }

    #[test]
    fn combine_items_field_names() {
        let parsed: PlayerAction = serde_json::from_str(
            r#"{"type":"combineItems","itemIndex1":0,"itemIndex2":3}"#,
        )
        .expect("parse");
        assert!(matches!(
            parsed,
            PlayerAction::CombineItems { item_index_1: 0, item_index_2: 3 }
        ));
    }
}
