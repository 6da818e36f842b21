//! Process-wide registries: connected clients, live rooms, and the
//! room-code allocator. Rooms run as independent tasks; the lobby only
//! routes inbound messages to mailboxes and tracks membership.

use crate::ClientId;
use crate::MAX_PLAYERS;
use crate::ROOM_CODE_ALPHABET;
use crate::ROOM_CODE_LEN;
use crate::error::ActionError;
use crate::room::Command;
use crate::room::Room;
use crate::session::ClientMessage;
use crate::session::Outbox;
use crate::session::RoomSummary;
use crate::session::ServerMessage;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use tokio::sync::RwLock;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::oneshot;

/// Occupancy mirror a room task keeps current for lobby listings.
#[derive(Debug, Default)]
pub struct RoomStatus {
    pub players: AtomicUsize,
    pub started: AtomicBool,
}

pub struct RoomHandle {
    pub tx: UnboundedSender<Command>,
    pub status: Arc<RoomStatus>,
}

struct Client {
    name: String,
    room: Option<String>,
    outbox: Outbox,
}

/// Shared across all connections; touched only on connect, disconnect,
/// and message routing.
pub struct Lobby {
    clients: RwLock<HashMap<ClientId, Client>>,
    rooms: RwLock<HashMap<String, RoomHandle>>,
    counter: AtomicU64,
}

impl Default for Lobby {
    fn default() -> Self {
        Self {
            clients: RwLock::new(HashMap::new()),
            rooms: RwLock::new(HashMap::new()),
            counter: AtomicU64::new(1),
        }
    }
}

impl Lobby {
    /// Registers a fresh connection and returns its stable client id.
    pub async fn register(&self, outbox: Outbox) -> ClientId {
        let id = self.counter.fetch_add(1, Ordering::Relaxed);
        self.clients.write().await.insert(
            id,
            Client {
                name: format!("Player {}", id),
                room: None,
                outbox,
            },
        );
        log::info!("[lobby] client {} connected", id);
        id
    }

    /// Tears down a connection; a room membership runs the leave path.
    pub async fn disconnect(&self, id: ClientId) {
        let client = self.clients.write().await.remove(&id);
        let Some(client) = client else { return };
        log::info!("[lobby] client {} disconnected", id);
        if let Some(code) = client.room {
            if let Some(handle) = self.rooms.read().await.get(&code) {
                let _ = handle.tx.send(Command::Leave { client: id });
            }
        }
    }

    pub async fn reply(&self, id: ClientId, message: &ServerMessage) {
        if let Some(client) = self.clients.read().await.get(&id) {
            let _ = client.outbox.send(message.to_json());
        }
    }

    async fn fail(&self, id: ClientId, error: ActionError) {
        self.reply(id, &ServerMessage::error(error)).await;
    }
}

impl Lobby {
    /// Dispatches one inbound frame. Lobby-level requests resolve here;
    /// anything in-game forwards into the room mailbox.
    pub async fn route(self: &Arc<Self>, id: ClientId, message: ClientMessage) {
        match message {
            ClientMessage::SetName { name } => self.set_name(id, name).await,
            ClientMessage::CreateRoom => self.create_room(id).await,
            ClientMessage::JoinRoom { room_id } => {
                self.join_room(id, room_id.trim().to_uppercase()).await
            }
            ClientMessage::LeaveRoom => self.leave_room(id).await,
            ClientMessage::ListRooms => self.list_rooms(id).await,
            ClientMessage::Ready { ready } => {
                self.forward(id, Command::Ready { client: id, ready }).await
            }
            ClientMessage::Chat { message } => {
                self.forward(id, Command::Chat { client: id, message }).await
            }
            ClientMessage::Action { action } => {
                self.forward(id, Command::Action { client: id, action }).await
            }
        }
    }

    async fn set_name(&self, id: ClientId, name: String) {
        let name = name.trim().to_string();
        if name.is_empty() {
            self.reply(id, &ServerMessage::error("Name cannot be empty")).await;
            return;
        }
        if let Some(client) = self.clients.write().await.get_mut(&id) {
            client.name = name.clone();
        }
        self.reply(id, &ServerMessage::NameSet { name }).await;
    }

    async fn create_room(self: &Arc<Self>, id: ClientId) {
        if self.binding(id).await.is_some() {
            return self.fail(id, ActionError::AlreadyInRoom).await;
        }
        let status = Arc::new(RoomStatus::default());
        let (done_tx, done_rx) = oneshot::channel();
        let code = {
            let mut rooms = self.rooms.write().await;
            let code = Self::allocate_code(&rooms);
            let (tx, room) = Room::create(code.clone(), rand::rng().random(), status.clone());
            rooms.insert(code.clone(), RoomHandle { tx, status });
            tokio::spawn(room.run(done_tx));
            code
        };
        let lobby = self.clone();
        let gone = code.clone();
        tokio::spawn(async move {
            let _ = done_rx.await;
            lobby.rooms.write().await.remove(&gone);
            log::info!("[lobby] room {} removed", gone);
        });
        log::info!("[lobby] client {} created room {}", id, code);
        self.reply(id, &ServerMessage::RoomCreated { room_id: code.clone() }).await;
        self.join_room(id, code).await;
    }

    /// Uniformly random 4-character code over the unambiguous alphabet,
    /// resampled on collision.
    fn allocate_code(rooms: &HashMap<String, RoomHandle>) -> String {
        let alphabet = ROOM_CODE_ALPHABET.as_bytes();
        let mut rng = rand::rng();
        loop {
            let code = (0..ROOM_CODE_LEN)
                .map(|_| alphabet[rng.random_range(0..alphabet.len())] as char)
                .collect::<String>();
            if !rooms.contains_key(&code) {
                return code;
            }
        }
    }

    async fn join_room(&self, id: ClientId, code: String) {
        if self.binding(id).await.is_some() {
            return self.fail(id, ActionError::AlreadyInRoom).await;
        }
        let (name, outbox) = {
            let clients = self.clients.read().await;
            let Some(client) = clients.get(&id) else { return };
            (client.name.clone(), client.outbox.clone())
        };
        let tx = {
            let rooms = self.rooms.read().await;
            match rooms.get(&code) {
                Some(handle) => handle.tx.clone(),
                None => return self.fail(id, ActionError::RoomNotFound).await,
            }
        };
        let (reply_tx, reply_rx) = oneshot::channel();
        let join = Command::Join {
            client: id,
            name,
            outbox,
            reply: reply_tx,
        };
        if tx.send(join).is_err() {
            return self.fail(id, ActionError::RoomNotFound).await;
        }
        match reply_rx.await {
            Ok(Ok(())) => {
                if let Some(client) = self.clients.write().await.get_mut(&id) {
                    client.room = Some(code);
                }
            }
            Ok(Err(error)) => self.fail(id, error).await,
            Err(_) => self.fail(id, ActionError::RoomNotFound).await,
        }
    }

    async fn leave_room(&self, id: ClientId) {
        let Some(code) = self.binding(id).await else {
            return self.fail(id, ActionError::NotInRoom).await;
        };
        if let Some(handle) = self.rooms.read().await.get(&code) {
            let _ = handle.tx.send(Command::Leave { client: id });
        }
        if let Some(client) = self.clients.write().await.get_mut(&id) {
            client.room = None;
        }
        self.reply(id, &ServerMessage::LeftRoom).await;
    }

    async fn list_rooms(&self, id: ClientId) {
        let rooms = self
            .rooms
            .read()
            .await
            .iter()
            .map(|(code, handle)| RoomSummary {
                room_id: code.clone(),
                players: handle.status.players.load(Ordering::Relaxed),
                max_players: MAX_PLAYERS,
                started: handle.status.started.load(Ordering::Relaxed),
            })
            .collect();
        self.reply(id, &ServerMessage::RoomList { rooms }).await;
    }

    async fn forward(&self, id: ClientId, command: Command) {
        let Some(code) = self.binding(id).await else {
            return self.fail(id, ActionError::NotInRoom).await;
        };
        match self.rooms.read().await.get(&code) {
            Some(handle) => {
                let _ = handle.tx.send(command);
            }
            None => self.fail(id, ActionError::RoomNotFound).await,
        }
    }

    async fn binding(&self, id: ClientId) -> Option<String> {
        self.clients.read().await.get(&id).and_then(|c| c.room.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    #[test]
    fn codes_use_the_unambiguous_alphabet() {
        let rooms = HashMap::new();
        for _ in 0..100 {
            let code = Lobby::allocate_code(&rooms);
            assert_eq!(code.len(), ROOM_CODE_LEN);
            assert!(code.chars().all(|c| ROOM_CODE_ALPHABET.contains(c)));
            assert!(!code.contains('I') && !code.contains('O'));
            assert!(!code.contains('0') && !code.contains('1'));
        }
    }

    #[tokio::test]
    async fn register_hands_out_distinct_ids() {
        let lobby = Lobby::default();
        let (tx, _rx) = unbounded_channel();
        let a = lobby.register(tx.clone()).await;
        let b = lobby.register(tx).await;
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn joining_a_missing_room_reports_the_contract_error() {
        let lobby = Arc::new(Lobby::default());
        let (tx, mut rx) = unbounded_channel();
        let id = lobby.register(tx).await;
        lobby
            .route(id, ClientMessage::JoinRoom { room_id: "ZZZZ".into() })
            .await;
        let frame = rx.recv().await.expect("error frame");
        assert!(frame.contains("Room not found"));
    }

    #[tokio::test]
    async fn create_join_leave_deletes_the_room() {
        let lobby = Arc::new(Lobby::default());
        let (tx, mut rx) = unbounded_channel();
        let id = lobby.register(tx).await;
        lobby.route(id, ClientMessage::CreateRoom).await;
        let created = rx.recv().await.expect("roomCreated frame");
        assert!(created.contains("roomCreated"));
        assert_eq!(lobby.rooms.read().await.len(), 1);
        lobby.route(id, ClientMessage::LeaveRoom).await;
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(lobby.rooms.read().await.is_empty(), "empty room self-deletes");
    }

    #[tokio::test]
    async fn actions_without_a_room_are_rejected() {
        let lobby = Arc::new(Lobby::default());
        let (tx, mut rx) = unbounded_channel();
        let id = lobby.register(tx).await;
        lobby.route(id, ClientMessage::Ready { ready: true }).await;
        let frame = rx.recv().await.expect("error frame");
        assert!(frame.contains("Not in a room"));
    }
}
