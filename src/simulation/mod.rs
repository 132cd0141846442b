//! Customer simulation - a Markov chain over store zones
//!
//! Customers enter at the entrance, hop between sections according to a
//! `TransitionModel`, and leave once they reach the checkout.

pub mod clock;
pub mod customer;
pub mod log;
pub mod names;
pub mod routes;
pub mod supermarket;
pub mod transition;

pub use clock::format_clock;
pub use customer::Customer;
pub use log::{LogRecord, TickLog};
pub use routes::{plan_routes, CustomerRoute};
pub use supermarket::{ArrivalRate, Supermarket, TickSummary, Transition};
pub use transition::{TransitionModel, TransitionTable, ROW_SUM_TOLERANCE};
