//! Room runtime: the per-room actor loop, phase state machine with
//! generation-fenced timers, matchup generation, combat dispatch, and
//! the merchant and crest round engines.

mod actions;
mod command;
mod matchup;
mod merchant;
mod phase;
mod room;
mod rounds;
mod timer;

pub use command::*;
pub use matchup::*;
pub use merchant::*;
pub use phase::*;
pub use room::*;
pub use timer::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientId;
    use crate::catalog::Catalog;
    use crate::catalog::copies_of;
    use crate::catalog::pool_size;
    use crate::error::ActionError;
    use crate::lobby::RoomStatus;
    use crate::player::LootReward;
    use crate::session::PlayerAction;
    use std::sync::Arc;
    use tokio::sync::mpsc::UnboundedReceiver;
    use tokio::sync::mpsc::unbounded_channel;
    use tokio::sync::oneshot;

    fn open_room() -> Room {
        let (_tx, room) = Room::create("TEST".into(), 42, Arc::new(RoomStatus::default()));
        room
    }

    fn try_join(room: &mut Room, id: ClientId) -> Result<UnboundedReceiver<String>, ActionError> {
        let (tx, rx) = unbounded_channel();
        let (reply_tx, mut reply_rx) = oneshot::channel();
        room.handle(Command::Join {
            client: id,
            name: format!("p{}", id),
            outbox: tx,
            reply: reply_tx,
        });
        match reply_rx.try_recv().expect("join replies synchronously") {
            Ok(()) => Ok(rx),
            Err(error) => Err(error),
        }
    }

    fn join(room: &mut Room, id: ClientId) -> UnboundedReceiver<String> {
        try_join(room, id).expect("join accepted")
    }

    fn ready_all(room: &mut Room, ids: &[ClientId]) {
        for id in ids {
            room.handle(Command::Ready { client: *id, ready: true });
        }
    }

    /// Copies held outside the pool: shop reservations, owned instances
    /// (a star-s unit embodies 3^(s-1) copies), and unit loot tokens.
    fn held_copies(room: &Room) -> usize {
        room.players
            .iter()
            .map(|p| {
                let shop = p.shop.iter().flatten().count();
                let owned: usize = p.units.values().map(|u| copies_of(u.star)).sum();
                let loot = p
                    .loot
                    .iter()
                    .filter(|l| matches!(l.reward, LootReward::Unit(_)))
                    .count();
                shop + owned + loot
            })
            .sum()
    }

    fn configured_total() -> usize {
        Catalog::get().units().filter(|u| u.cost >= 1).map(|u| pool_size(u.cost)).sum()
    }

    #[tokio::test]
    async fn capacity_and_progress_guard_joins() {
        let mut room = open_room();
        let _rxs: Vec<_> = (1..=4).map(|id| join(&mut room, id)).collect();
        assert_eq!(try_join(&mut room, 5).expect_err("room full"), ActionError::RoomFull);
        ready_all(&mut room, &[1, 2, 3, 4]);
        assert_eq!(room.phase, Phase::Planning);
        assert_eq!(
            try_join(&mut room, 6).expect_err("mid-game"),
            ActionError::GameInProgress
        );
    }

    #[tokio::test]
    async fn game_needs_two_ready_players() {
        let mut room = open_room();
        let _rx = join(&mut room, 1);
        ready_all(&mut room, &[1]);
        assert_eq!(room.phase, Phase::Waiting, "one player cannot start");
        let _rx2 = join(&mut room, 2);
        assert_eq!(room.phase, Phase::Waiting);
        room.handle(Command::Ready { client: 2, ready: true });
        assert_eq!(room.phase, Phase::Planning, "second ready starts the game");
        assert_eq!(room.round, 1);
    }

    #[tokio::test]
    async fn stale_generation_alarms_are_inert() {
        let mut room = open_room();
        let _rx1 = join(&mut room, 1);
        let _rx2 = join(&mut room, 2);
        ready_all(&mut room, &[1, 2]);
        assert_eq!(room.phase, Phase::Planning);
        ready_all(&mut room, &[1, 2]);
        assert_eq!(room.phase, Phase::Combat);
        let live = room.generation;
        room.handle(Command::Alarm(Alarm {
            generation: live - 1,
            kind: AlarmKind::CombatOver,
        }));
        assert_eq!(room.phase, Phase::Combat, "stale alarm must not transition");
        room.handle(Command::Alarm(Alarm { generation: live, kind: AlarmKind::CombatOver }));
        assert_eq!(room.phase, Phase::Results);
    }

    #[tokio::test]
    async fn generations_strictly_increase_across_transitions() {
        let mut room = open_room();
        let _rx1 = join(&mut room, 1);
        let _rx2 = join(&mut room, 2);
        let before = room.generation;
        ready_all(&mut room, &[1, 2]);
        let planning = room.generation;
        ready_all(&mut room, &[1, 2]);
        let combat = room.generation;
        assert!(before < planning && planning < combat);
    }

    #[tokio::test]
    async fn shop_cycling_conserves_the_pool() {
        let mut room = open_room();
        let _rx1 = join(&mut room, 1);
        let _rx2 = join(&mut room, 2);
        ready_all(&mut room, &[1, 2]);
        let total = configured_total();
        assert_eq!(room.pool.total() + held_copies(&room), total);
        for i in 0..50u32 {
            let client = 1 + (i % 2) as ClientId;
            let index = room.player_index(client).expect("player present");
            room.players[index].gold = 100;
            room.handle(Command::Action { client, action: PlayerAction::Reroll });
            assert_eq!(room.pool.total() + held_copies(&room), total, "reroll {}", i);
        }
    }

    #[tokio::test]
    async fn buying_and_selling_conserve_the_pool() {
        let mut room = open_room();
        let _rx1 = join(&mut room, 1);
        let _rx2 = join(&mut room, 2);
        ready_all(&mut room, &[1, 2]);
        let total = configured_total();
        let index = room.player_index(1).expect("player present");
        room.players[index].gold = 100;
        room.handle(Command::Action { client: 1, action: PlayerAction::BuyUnit { shop_index: 0 } });
        assert_eq!(room.pool.total() + held_copies(&room), total);
        let bought = *room.players[index]
            .bench
            .iter()
            .flatten()
            .next_back()
            .expect("bought unit benched");
        room.handle(Command::Action {
            client: 1,
            action: PlayerAction::SellUnit { instance_id: bought },
        });
        assert_eq!(room.pool.total() + held_copies(&room), total);
    }

    #[tokio::test]
    async fn buying_the_third_copy_merges_and_clears_the_slot() {
        let mut room = open_room();
        let _rx1 = join(&mut room, 1);
        let _rx2 = join(&mut room, 2);
        ready_all(&mut room, &[1, 2]);
        let index = room.player_index(1).expect("present");
        room.players[index].units.clear();
        room.players[index].bench = Default::default();
        room.players[index].board = Default::default();
        let footman = Catalog::get().unit("footman").expect("footman");
        for _ in 0..3 {
            room.players[index].shop[0] = Some(footman);
            room.players[index].gold = 10;
            room.handle(Command::Action {
                client: 1,
                action: PlayerAction::BuyUnit { shop_index: 0 },
            });
            assert!(room.players[index].shop[0].is_none(), "slot cleared by the buy");
        }
        let stars = room.players[index]
            .units
            .values()
            .map(|u| u.star)
            .collect::<Vec<_>>();
        assert_eq!(stars, vec![2], "three copies collapse into one two-star");
    }

    #[tokio::test]
    async fn toggling_the_shop_lock_twice_is_identity() {
        let mut room = open_room();
        let _rx1 = join(&mut room, 1);
        let _rx2 = join(&mut room, 2);
        ready_all(&mut room, &[1, 2]);
        let index = room.player_index(1).expect("present");
        assert!(!room.players[index].shop_locked);
        room.handle(Command::Action { client: 1, action: PlayerAction::ToggleShopLock });
        assert!(room.players[index].shop_locked);
        room.handle(Command::Action { client: 1, action: PlayerAction::ToggleShopLock });
        assert!(!room.players[index].shop_locked);
    }

    #[tokio::test]
    async fn merchant_pick_order_follows_health_then_slot() {
        let mut room = open_room();
        let _rx1 = join(&mut room, 1);
        let _rx2 = join(&mut room, 2);
        let _rx3 = join(&mut room, 3);
        ready_all(&mut room, &[1, 2, 3]);
        for (client, health) in [(1, 10), (2, 20), (3, 15)] {
            let index = room.player_index(client).expect("present");
            room.players[index].health = health;
        }
        room.start_planning(4);
        let merchant = room.merchant.as_ref().expect("merchant running");
        assert_eq!(merchant.order, vec![1, 3, 2]);
        assert_eq!(merchant.current_picker(), Some(1));
        room.handle(Command::Action { client: 1, action: PlayerAction::MerchantPick { option_id: 0 } });
        let merchant = room.merchant.as_ref().expect("merchant running");
        assert_eq!(merchant.current_picker(), Some(3));
    }

    #[tokio::test]
    async fn merchant_skips_a_leaving_picker() {
        let mut room = open_room();
        let _rx1 = join(&mut room, 1);
        let _rx2 = join(&mut room, 2);
        let _rx3 = join(&mut room, 3);
        ready_all(&mut room, &[1, 2, 3]);
        for (client, health) in [(1, 10), (2, 20), (3, 15)] {
            let index = room.player_index(client).expect("present");
            room.players[index].health = health;
        }
        room.start_planning(4);
        assert_eq!(room.merchant.as_ref().and_then(|m| m.current_picker()), Some(1));
        room.handle(Command::Leave { client: 1 });
        assert_eq!(room.merchant.as_ref().and_then(|m| m.current_picker()), Some(3));
    }

    #[tokio::test]
    async fn major_crest_round_advances_once_everyone_chose() {
        let mut room = open_room();
        let _rx1 = join(&mut room, 1);
        let _rx2 = join(&mut room, 2);
        ready_all(&mut room, &[1, 2]);
        room.start_planning(6);
        for client in [1, 2] {
            let index = room.player_index(client).expect("present");
            let options = room.players[index]
                .pending
                .major_choices
                .clone()
                .expect("choices offered");
            assert_eq!(options.len(), 3);
            room.handle(Command::Action {
                client,
                action: PlayerAction::SelectMajorCrest { crest_id: options[0].id.to_string() },
            });
        }
        assert_eq!(room.round, 7, "crest round advances without combat");
        assert_eq!(room.phase, Phase::Planning);
        assert!(room.players.iter().all(|p| p.major_crest.is_some()));
    }

    #[tokio::test]
    async fn eliminated_rooms_reach_game_over() {
        let mut room = open_room();
        let _rx1 = join(&mut room, 1);
        let _rx2 = join(&mut room, 2);
        ready_all(&mut room, &[1, 2]);
        let index = room.player_index(2).expect("present");
        room.players[index].health = 0;
        room.players[index].eliminated = true;
        assert!(room.check_game_over());
        assert_eq!(room.phase, Phase::GameOver);
    }

    #[tokio::test]
    async fn leaving_mid_game_returns_copies_and_can_end_the_game() {
        let mut room = open_room();
        let _rx1 = join(&mut room, 1);
        let _rx2 = join(&mut room, 2);
        ready_all(&mut room, &[1, 2]);
        let total = configured_total();
        room.handle(Command::Leave { client: 2 });
        assert_eq!(room.players.len(), 1);
        assert_eq!(room.pool.total() + held_copies(&room), total);
        assert_eq!(room.phase, Phase::GameOver, "lone survivor wins");
    }
}
