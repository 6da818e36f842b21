use crate::ClientId;
use crate::Gold;
use crate::Health;
use crate::InstanceId;
use crate::catalog::CrestTemplate;
use crate::catalog::ItemKind;
use crate::catalog::ItemTemplate;
use crate::catalog::RoundKind;
use crate::player::ActiveTrait;
use crate::player::PlayerState;
use crate::player::UnitInstance;
use crate::room::Phase;
use serde::Serialize;

/// Wire snapshot of a whole room, broadcast after every committed
/// mutation. Everything here is public knowledge; clients scout each
/// other freely.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateView {
    pub phase: Phase,
    pub round: u32,
    pub round_kind: RoundKind,
    pub attuned: &'static str,
    pub players: Vec<PlayerView>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
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
    pub eliminated: bool,
    pub connected: bool,
    pub ready: bool,
    pub shop_locked: bool,
    pub free_rerolls: u32,
    pub board: Vec<UnitView>,
    pub bench: Vec<Option<UnitView>>,
    pub shop: Vec<Option<ShopSlotView>>,
    pub inventory: Vec<ItemView>,
    pub minor_crests: Vec<CrestView>,
    pub major_crest: Option<CrestView>,
    pub active_traits: Vec<ActiveTrait>,
    pub pending: PendingView,
    pub loot: Vec<LootView>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitView {
    pub instance_id: InstanceId,
    pub unit: &'static str,
    pub name: &'static str,
    pub star: u8,
    pub items: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopSlotView {
    pub unit: &'static str,
    pub name: &'static str,
    pub cost: u8,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: ItemKind,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrestView {
    pub id: &'static str,
    pub name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u8>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crest_choices: Option<Vec<CrestView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_choices: Option<Vec<ItemView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crest_replacement: Option<CrestView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub major_choices: Option<Vec<CrestView>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LootView {
    pub id: u64,
    pub tag: &'static str,
}

/// Pre-game roster line for lobby traffic.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyPlayerView {
    pub id: ClientId,
    pub name: String,
    pub slot: usize,
    pub ready: bool,
    pub host: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub room_id: String,
    pub players: usize,
    pub max_players: usize,
    pub started: bool,
}

impl ItemView {
    pub fn from(item: &'static ItemTemplate) -> Self {
        Self { id: item.id, name: item.name, kind: item.kind }
    }
}

impl CrestView {
    pub fn from(crest: &'static CrestTemplate) -> Self {
        Self { id: crest.id, name: crest.name, rank: None }
    }
    pub fn ranked(crest: &'static CrestTemplate, rank: u8) -> Self {
        Self { id: crest.id, name: crest.name, rank: Some(rank) }
    }
}

impl UnitView {
    fn from(unit: &UnitInstance, position: Option<(usize, usize)>) -> Self {
        Self {
            instance_id: unit.id,
            unit: unit.template.id,
            name: unit.template.name,
            star: unit.star,
            items: unit.items.iter().map(|i| i.id).collect(),
            x: position.map(|(x, _)| x),
            y: position.map(|(_, y)| y),
        }
    }
}

impl PlayerView {
    pub fn from(player: &PlayerState) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            slot: player.slot,
            gold: player.gold,
            level: player.level,
            xp: player.xp,
            health: player.health,
            max_health: player.max_health,
            win_streak: player.win_streak,
            loss_streak: player.loss_streak,
            eliminated: player.eliminated,
            connected: player.connected,
            ready: player.ready,
            shop_locked: player.shop_locked,
            free_rerolls: player.free_rerolls,
            board: player
                .board_units()
                .into_iter()
                .map(|(unit, x, y)| UnitView::from(unit, Some((x, y))))
                .collect(),
            bench: player
                .bench
                .iter()
                .map(|slot| {
                    slot.and_then(|id| player.units.get(&id)).map(|u| UnitView::from(u, None))
                })
                .collect(),
            shop: player
                .shop
                .iter()
                .map(|slot| {
                    slot.map(|t| ShopSlotView { unit: t.id, name: t.name, cost: t.cost })
                })
                .collect(),
            inventory: player.inventory.iter().copied().map(ItemView::from).collect(),
            minor_crests: player
                .minor_crests
                .iter()
                .map(|o| CrestView::ranked(o.crest, o.rank))
                .collect(),
            major_crest: player.major_crest.map(CrestView::from),
            active_traits: player.active_traits.clone(),
            pending: PendingView {
                crest_choices: player
                    .pending
                    .crest_choices
                    .as_ref()
                    .map(|cs| cs.iter().copied().map(CrestView::from).collect()),
                item_choices: player
                    .pending
                    .item_choices
                    .as_ref()
                    .map(|is| is.iter().copied().map(ItemView::from).collect()),
                crest_replacement: player.pending.crest_replacement.map(CrestView::from),
                major_choices: player
                    .pending
                    .major_choices
                    .as_ref()
                    .map(|cs| cs.iter().copied().map(CrestView::from).collect()),
            },
            loot: player.loot.iter().map(|l| LootView { id: l.id, tag: l.tag }).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::player::UnitInstance;

    #[test]
    fn player_view_reflects_layout() {
        let mut player = PlayerState::new(9, "viewer".into(), 1);
        let footman = Catalog::get().unit("footman").expect("footman");
        player.add_to_bench(UnitInstance::new(1, footman)).expect("bench");
        player.add_to_bench(UnitInstance::new(2, footman)).expect("bench");
        player.place_unit(1, 2, 3).expect("place");
        let view = PlayerView::from(&player);
        assert_eq!(view.board.len(), 1);
        assert_eq!(view.board[0].x, Some(2));
        assert_eq!(view.bench.iter().flatten().count(), 1);
        let json = serde_json::to_string(&view).expect("serialize");
        assert!(json.contains("\"winStreak\":0"));
    }
}
