pub mod board;
pub mod game;
pub mod generator;
pub mod lookup;
pub mod rules;
