//! GIPF Core - Rules engine and static evaluator
//!
//! This crate provides the game logic consumed by external search code:
//! - Board geometry (61-cell hex board, neighbor and line tables)
//! - Bitset piece sets with push/slide physics
//! - Capture detection and alternative capture plans
//! - Game state with move generation and apply/undo
//! - Static position evaluation
//! - Perft counters for verifying move generation

pub mod board;
pub mod bitset;
pub mod capture;
pub mod game;
pub mod eval;
pub mod config;
pub mod error;
pub mod perft;

// Re-exports for convenient access
pub use board::{Direction, Position, CELL_COUNT, GEOMETRY};
pub use bitset::PositionSet;
pub use capture::{CaptureMask, CapturePlan};
pub use game::{GameResult, GameState, Move, Player, Snapshot};
pub use eval::{evaluate, Heuristics, LOSS_SCORE, WIN_SCORE};
pub use config::EngineConfig;
pub use error::EngineError;
pub use perft::{perft, unique_positions, PerftStats};
#[cfg(feature = "parallel")]
pub use perft::perft_parallel;
