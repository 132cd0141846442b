//! The built-in store map

use crate::core::error::Result;
use crate::core::types::Region;
use crate::store::grid::Grid;
use crate::store::zone::Zone;

/// 12x20 store: shelves in columns, checkouts below, exit and entrance in the
/// bottom wall
pub const STORE_LAYOUT: &str = "\
####################
##................##
##L..LD..DS..SF..F##
##L..LD..DS..SF..F##
##L..LD..DS..SF..F##
##L..LD..DS..SF..F##
##L..LD..DS..SF..F##
##................##
##...CC..CC..CC...##
##...CC..CC..CC...##
##................##
###E############G###";

/// Areas customers stand in when they visit a zone, as (rows, cols)
pub fn store_regions() -> Vec<(Zone, Region)> {
    vec![
        (Zone::Checkout, Region::new((8, 9), (4, 15))),
        (Zone::Dairy, Region::new((2, 6), (7, 8))),
        (Zone::Drinks, Region::new((2, 6), (3, 4))),
        (Zone::Fruit, Region::new((2, 6), (15, 16))),
        (Zone::Spices, Region::new((2, 6), (11, 12))),
        (Zone::Exit, Region::new((11, 11), (3, 3))),
        (Zone::Entrance, Region::new((11, 11), (16, 16))),
    ]
}

impl Grid {
    /// The built-in store with its zone regions registered
    pub fn default_store() -> Result<Self> {
        Grid::from_layout_str(STORE_LAYOUT)?.with_regions(store_regions())
    }
}
