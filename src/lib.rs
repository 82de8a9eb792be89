//! Chess rules engine and search agent.
//!
//! `logic` owns the board, move legality and the game session; `engine`
//! provides the depth-limited alpha-beta search over it; `worker` runs that
//! search off-thread so an interactive caller stays responsive. Rendering and
//! input handling are the embedding application's business.

pub mod engine;
pub mod logic;
pub mod worker;
