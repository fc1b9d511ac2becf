pub mod config;
pub mod error;
pub mod rng;
pub mod types;

pub use config::ReplayConfig;
pub use error::{Result, WarError};
pub use rng::{BattleRng, SeededRng, SequenceRng};
pub use types::{Position, Turn, UnitId};
