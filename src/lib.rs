//! Authoritative server for a 2-4 player hex-grid auto-battler.
//!
//! Players connect over WebSocket, negotiate rooms, and play a multi-round
//! game alternating between a player-driven planning phase and a
//! server-simulated combat phase. The server owns canonical state; clients
//! are rendering terminals that emit intent and receive snapshots plus
//! combat event streams.
//!
//! ## Architecture
//!
//! - [`catalog`] — immutable content tables (units, traits, items, crests)
//! - [`pool`] — shared multiset of unit copies feeding every shop
//! - [`player`] — per-player board/bench/shop/economy and stat pipeline
//! - [`combat`] — deterministic tick simulator on the hex arena
//! - [`room`] — room actor: phase machine, timers, matchups, merchant
//! - [`session`] — wire protocol and WebSocket hosting
//! - [`lobby`] — process-wide client and room registries

pub mod catalog;
pub mod combat;
pub mod error;
pub mod lobby;
pub mod player;
pub mod pool;
pub mod room;
pub mod session;

/// dimensional analysis types
pub type Gold = i32;
pub type Health = i32;
pub type Tick = u32;
pub type ClientId = u64;
pub type InstanceId = u64;

// room parameters
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;
pub const STARTING_HEALTH: Health = 20;
pub const STARTING_GOLD: Gold = 3;
pub const MAX_LEVEL: u8 = 6;
pub const BENCH_SLOTS: usize = 7;
pub const SHOP_SLOTS: usize = 4;
pub const INVENTORY_SLOTS: usize = 10;
pub const ITEMS_PER_UNIT: usize = 3;
pub const MINOR_CRESTS: usize = 3;

// board geometry: each player fields a 5x4 half of the combat arena
pub const BOARD_W: usize = 5;
pub const BOARD_H: usize = 4;
pub const FIELD_H: usize = 8;

// economy parameters
pub const BASE_INCOME: Gold = 5;
pub const INTEREST_DENOMINATOR: Gold = 5;
pub const INTEREST_CAP: Gold = 3;
pub const STREAK_FLOOR: u32 = 2;
pub const STREAK_BONUS_CAP: Gold = 5;
pub const REROLL_COST: Gold = 2;
pub const XP_COST: Gold = 4;
pub const XP_PER_BUY: u32 = 4;
pub const XP_PER_ROUND: u32 = 1;

// combat parameters
pub const TICK_SECONDS: f32 = 0.05;
pub const MAX_TICKS: Tick = 1200;
pub const HIT_FRACTION: f32 = 0.4;
pub const MANA_PER_ATTACK: f32 = 10.0;
pub const ABILITY_DAMAGE_MULT: f32 = 3.0;
pub const ABILITY_SECONDS: f32 = 1.0;
pub const STUCK_RETARGET_TICKS: u32 = 10;

// phase timing (seconds)
pub const PLANNING_SECONDS: u64 = 20;
pub const PLANNING_INTRO_SECONDS: u64 = 5;
pub const PLANNING_MERCHANT_SECONDS: u64 = 30;
pub const RESULTS_SECONDS: u64 = 3;
pub const COMBAT_GRACE_SECONDS: f32 = 2.0;
pub const MERCHANT_TURN_SECONDS: u64 = 15;
pub const MERCHANT_SAFETY_SECONDS: u64 = 90;
pub const MERCHANT_GRACE_SECONDS: u64 = 1;
pub const MAJOR_CREST_SECONDS: u64 = 20;

// wire parameters
pub const EVENT_BATCH_SIZE: usize = 50;
pub const ROOM_CODE_LEN: usize = 4;
pub const ROOM_CODE_ALPHABET: &str = "ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// initialize logging and exit on ctrl-c
pub fn init() {
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.expect("listen for ctrl-c");
        println!();
        log::warn!("forcing exit");
        std::process::exit(0);
    });
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}
