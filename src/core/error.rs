use thiserror::Error;

use crate::core::types::Coord;
use crate::store::Zone;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Malformed layout: {0}")]
    MalformedLayout(String),

    #[error("Symbol '{symbol}' not found: expected exactly one cell, found {found}")]
    SymbolNotFound { symbol: char, found: usize },

    #[error("Failed to find a target cell near {zone:?} after {attempts} attempts")]
    TargetResolution { zone: Zone, attempts: u32 },

    #[error("No path found from {from:?} to {to:?}")]
    NoPathFound { from: Coord, to: Coord },

    #[error("Invalid stochastic matrix: {0}")]
    InvalidStochasticMatrix(String),

    #[error("Unknown zone: {0}")]
    UnknownZone(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
