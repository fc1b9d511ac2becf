//! Crew Battle - tactical command resolution for army-scale engagements
//!
//! Units exchange orders (attack, move, ambush, fire, rocks, retreat, charge,
//! defend) resolved against an injected random stream, so every engagement
//! can be replayed exactly.

pub mod battle;
pub mod command;
pub mod core;
pub mod scenario;
