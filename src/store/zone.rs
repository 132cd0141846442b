//! Store zones and their map symbols

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every tile of the store map is one of these
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Background,
    Floor,
    Entrance,
    Exit,
    Checkout,
    Dairy,
    Drinks,
    Fruit,
    Spices,
}

impl Zone {
    pub const ALL: [Zone; 9] = [
        Zone::Background,
        Zone::Floor,
        Zone::Entrance,
        Zone::Exit,
        Zone::Checkout,
        Zone::Dairy,
        Zone::Drinks,
        Zone::Fruit,
        Zone::Spices,
    ];

    /// Character used for this zone in a layout
    pub fn symbol(&self) -> char {
        match self {
            Self::Background => '#',
            Self::Floor => '.',
            Self::Entrance => 'G',
            Self::Exit => 'E',
            Self::Checkout => 'C',
            Self::Dairy => 'D',
            Self::Drinks => 'L',
            Self::Fruit => 'F',
            Self::Spices => 'S',
        }
    }

    /// Name used in transition matrices and the tick log
    pub fn label(&self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Floor => "floor",
            Self::Entrance => "entrance",
            Self::Exit => "exit",
            Self::Checkout => "checkout",
            Self::Dairy => "dairy",
            Self::Drinks => "drinks",
            Self::Fruit => "fruit",
            Self::Spices => "spices",
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Zone> {
        Self::ALL.into_iter().find(|zone| zone.symbol() == symbol)
    }

    pub fn from_label(label: &str) -> Option<Zone> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|zone| zone.label().eq_ignore_ascii_case(label))
    }

    /// Entrance and exit are always walked to exactly, never approximated
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Entrance | Self::Exit)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
