//! Supermarket Sim - Markov-chain shoppers routed across a tile map with A*

pub mod core;
pub mod pathfinding;
pub mod simulation;
pub mod store;
