/// User-visible rejection of an inbound request. The exact wording is
/// part of the wire contract; state is never mutated on the error path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionError {
    RoomNotFound,
    RoomFull,
    GameInProgress,
    GameNotStarted,
    NotInRoom,
    AlreadyInRoom,
    WrongPhase,
    NotYourTurn,
    InventoryFull,
    BenchFull,
    BoardFull,
    NotEnoughGold,
    MaxLevel,
    EmptyShopSlot,
    UnknownUnit,
    UnknownItem,
    UnknownCrest,
    ItemLimit,
    NotEquippable,
    NoRecipe,
    NotConsumable,
    PendingChoice,
    NoPendingChoice,
    NoSuchChoice,
    CrestAtMaxRank,
    NoSuchLoot,
    OptionTaken,
    OutOfBounds,
}

impl std::fmt::Display for ActionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Self::RoomNotFound => "Room not found",
            Self::RoomFull => "Room is full",
            Self::GameInProgress => "Game already in progress",
            Self::GameNotStarted => "Game has not started",
            Self::NotInRoom => "Not in a room",
            Self::AlreadyInRoom => "Already in a room",
            Self::WrongPhase => "Not allowed in this phase",
            Self::NotYourTurn => "Not your turn to pick",
            Self::InventoryFull => "Inventory full",
            Self::BenchFull => "Bench is full",
            Self::BoardFull => "Board is full",
            Self::NotEnoughGold => "Not enough gold",
            Self::MaxLevel => "Already max level",
            Self::EmptyShopSlot => "Shop slot is empty",
            Self::UnknownUnit => "No such unit",
            Self::UnknownItem => "No such item",
            Self::UnknownCrest => "No such crest",
            Self::ItemLimit => "Unit already has three items",
            Self::NotEquippable => "Item cannot be equipped",
            Self::NoRecipe => "These items cannot be combined",
            Self::NotConsumable => "Item cannot be used",
            Self::PendingChoice => "Resolve your pending choice first",
            Self::NoPendingChoice => "Nothing to choose",
            Self::NoSuchChoice => "No such choice",
            Self::CrestAtMaxRank => "Crest already at max rank",
            Self::NoSuchLoot => "No such loot",
            Self::OptionTaken => "That option was already taken",
            Self::OutOfBounds => "Position out of bounds",
        };
        write!(f, "{}", message)
    }
}

impl std::error::Error for ActionError {}
