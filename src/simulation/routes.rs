//! Walking routes for one tick's transitions
//!
//! Uses rayon to search every customer's route in parallel. Each worker owns
//! its `SearchContext`, and each route gets its own RNG derived from the run
//! seed, the tick and the customer id, so results do not depend on scheduling.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;

use crate::core::error::{Result, SimError};
use crate::core::types::{Coord, CustomerId, Tick};
use crate::pathfinding::{find_path_with, PathRequest, SearchContext};
use crate::simulation::supermarket::Transition;
use crate::store::{Grid, Zone};

/// Route a customer walked during one tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerRoute {
    pub customer: CustomerId,
    pub from: Zone,
    pub to: Zone,
    /// `None` when the store offers no walkable route
    pub path: Option<Vec<Coord>>,
}

impl CustomerRoute {
    /// Where the customer ends up standing
    pub fn destination(&self) -> Option<Coord> {
        self.path.as_ref().and_then(|p| p.last().copied())
    }
}

/// Compute a route for every transition, in the order given
///
/// A missing route is reported as `path: None`; every other failure aborts.
pub fn plan_routes(
    grid: &Grid,
    transitions: &[Transition],
    efficient: bool,
    seed: u64,
    tick: Tick,
) -> Result<Vec<CustomerRoute>> {
    transitions
        .par_iter()
        .map_init(
            || SearchContext::new(grid.len()),
            |context, transition| {
                let request = PathRequest::new(transition.previous, transition.current, efficient);
                let mut rng = route_rng(seed, tick, transition.customer);
                let path = match find_path_with(grid, &request, context, &mut rng) {
                    Ok(path) => Some(path),
                    Err(SimError::NoPathFound { from, to }) => {
                        tracing::warn!(
                            "Customer {} has no route from {:?} to {:?} ({} -> {})",
                            transition.customer,
                            from,
                            to,
                            transition.previous,
                            transition.current
                        );
                        None
                    }
                    Err(e) => return Err(e),
                };
                Ok(CustomerRoute {
                    customer: transition.customer,
                    from: transition.previous,
                    to: transition.current,
                    path,
                })
            },
        )
        .collect()
}

fn route_rng(seed: u64, tick: Tick, customer: CustomerId) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed ^ tick.rotate_left(32));
    rng.set_stream(customer.0);
    rng
}
