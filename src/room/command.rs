use crate::ClientId;
use crate::error::ActionError;
use crate::session::Outbox;
use crate::session::PlayerAction;
use tokio::sync::oneshot;

/// Everything that can mutate a room flows through its mailbox, so all
/// mutations are totally ordered per room.
#[derive(Debug)]
pub enum Command {
    Join {
        client: ClientId,
        name: String,
        outbox: Outbox,
        reply: oneshot::Sender<Result<(), ActionError>>,
    },
    Leave {
        client: ClientId,
    },
    Ready {
        client: ClientId,
        ready: bool,
    },
    Chat {
        client: ClientId,
        message: String,
    },
    Action {
        client: ClientId,
        action: PlayerAction,
    },
    Alarm(Alarm),
}

/// A fired timer. The captured generation is compared against the
/// room's current one; cancellation is best-effort, the comparison is
/// the correctness guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alarm {
    pub generation: u64,
    pub kind: AlarmKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmKind {
    PlanningOver,
    CombatOver,
    ResultsOver,
    MerchantTurn { turn: usize },
    MerchantSafety,
    MerchantDone,
    MajorCrestOver,
}
