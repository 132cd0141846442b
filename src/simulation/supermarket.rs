//! Simulation controller
//!
//! Each tick runs, in order:
//! 1. advance the clock
//! 2. move every customer one Markov step
//! 3. let new customers in at the entrance
//! 4. log where everyone is
//! 5. let customers at the checkout leave
//!
//! `tick_with_routes` additionally computes walking routes between steps 4
//! and 5. Routes are derived data and never feed back into the simulation.

use std::collections::BTreeMap;
use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{CustomerId, Tick};
use crate::simulation::clock::format_clock;
use crate::simulation::customer::Customer;
use crate::simulation::log::{LogRecord, TickLog};
use crate::simulation::names::generate_name;
use crate::simulation::routes::{plan_routes, CustomerRoute};
use crate::simulation::transition::TransitionModel;
use crate::store::{Grid, Zone};

/// Inclusive bounds on customers arriving per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArrivalRate {
    pub min: u32,
    pub max: u32,
}

impl ArrivalRate {
    pub fn new(min: u32, max: u32) -> Result<Self> {
        if min > max {
            return Err(SimError::InvalidConfig(format!(
                "arrival bounds inverted: min {} > max {}",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        rng.gen_range(self.min..=self.max)
    }
}

/// One customer's move during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub customer: CustomerId,
    pub previous: Zone,
    pub current: Zone,
}

/// What happened during one tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickSummary {
    pub tick: Tick,
    pub clock: String,
    pub arrivals: u32,
    pub departures: usize,
    /// Every customer present after arrivals, in id order
    pub transitions: Vec<Transition>,
}

pub struct Supermarket {
    customers: BTreeMap<CustomerId, Customer>,
    minutes: Tick,
    last_id: u64,
    log: TickLog,
    model: Arc<TransitionModel>,
    arrivals: ArrivalRate,
    seed: u64,
    rng: ChaCha8Rng,
}

impl Supermarket {
    pub fn new(model: Arc<TransitionModel>, arrivals: ArrivalRate, seed: u64) -> Result<Self> {
        if !model.has_row(Zone::Entrance) {
            return Err(SimError::UnknownZone(
                "transition model has no row for the entrance".into(),
            ));
        }
        // Customers leave at the checkout; every other reachable zone needs a row
        if let Some(zone) = model
            .columns()
            .iter()
            .find(|zone| **zone != Zone::Checkout && !model.has_row(**zone))
        {
            return Err(SimError::UnknownZone(format!(
                "transition model can move customers to '{}' but has no row for it",
                zone
            )));
        }
        Ok(Self {
            customers: BTreeMap::new(),
            minutes: 0,
            last_id: 0,
            log: TickLog::new(),
            model,
            arrivals,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    pub fn from_config(model: Arc<TransitionModel>, config: &SimulationConfig) -> Result<Self> {
        config.validate()?;
        let arrivals = ArrivalRate::new(config.min_arrivals, config.max_arrivals)?;
        Self::new(model, arrivals, config.resolve_seed())
    }

    pub fn minutes(&self) -> Tick {
        self.minutes
    }

    pub fn clock(&self) -> String {
        format_clock(self.minutes)
    }

    pub fn last_id(&self) -> u64 {
        self.last_id
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn arrivals(&self) -> ArrivalRate {
        self.arrivals
    }

    pub fn active_count(&self) -> usize {
        self.customers.len()
    }

    pub fn customers(&self) -> impl Iterator<Item = &Customer> {
        self.customers.values()
    }

    pub fn customer(&self, id: CustomerId) -> Option<&Customer> {
        self.customers.get(&id)
    }

    pub fn log(&self) -> &TickLog {
        &self.log
    }

    pub fn into_log(self) -> TickLog {
        self.log
    }

    /// Run one full tick
    pub fn tick(&mut self) -> Result<TickSummary> {
        let mut summary = self.step()?;
        summary.departures = self.remove_exiting_customers();
        Ok(summary)
    }

    /// Run one tick and compute each customer's walking route before anyone leaves
    pub fn tick_with_routes(&mut self, grid: &Grid, efficient: bool) -> Result<(TickSummary, Vec<CustomerRoute>)> {
        let mut summary = self.step()?;
        let routes = plan_routes(grid, &summary.transitions, efficient, self.seed, self.minutes)?;
        summary.departures = self.remove_exiting_customers();
        Ok((summary, routes))
    }

    /// Run `duration` ticks
    pub fn run(&mut self, duration: u64) -> Result<Vec<TickSummary>> {
        (0..duration).map(|_| self.tick()).collect()
    }

    fn step(&mut self) -> Result<TickSummary> {
        // All moves are sampled before any is applied
        let mut moves = Vec::with_capacity(self.customers.len());
        for customer in self.customers.values() {
            moves.push(customer.next_zone(&mut self.rng)?);
        }

        self.minutes += 1;
        for (customer, next) in self.customers.values_mut().zip(moves) {
            customer.move_to(next);
        }

        let arrivals = self.add_new_customers();
        let clock = self.clock();

        let mut transitions = Vec::with_capacity(self.customers.len());
        for customer in self.customers.values() {
            self.log.push(LogRecord {
                timestamp: clock.clone(),
                customer_no: customer.id,
                name: customer.name.clone(),
                current_location: customer.current_zone(),
            });
            transitions.push(Transition {
                customer: customer.id,
                previous: customer.previous_zone(),
                current: customer.current_zone(),
            });
        }

        tracing::debug!(
            "{}: {} customers in store, {} arrived",
            clock,
            self.customers.len(),
            arrivals
        );

        Ok(TickSummary {
            tick: self.minutes,
            clock,
            arrivals,
            departures: 0,
            transitions,
        })
    }

    fn add_new_customers(&mut self) -> u32 {
        let count = self.arrivals.draw(&mut self.rng);
        for offset in 0..u64::from(count) {
            let id = CustomerId(self.last_id + offset);
            let name = generate_name(&mut self.rng);
            self.customers
                .insert(id, Customer::new(id, name, Arc::clone(&self.model)));
        }
        self.last_id += u64::from(count);

        if count > 0 {
            tracing::info!(
                "{}: {} new customer(s) entered the supermarket",
                self.clock(),
                count
            );
        }
        count
    }

    fn remove_exiting_customers(&mut self) -> usize {
        let before = self.customers.len();
        self.customers.retain(|_, customer| customer.is_active());
        before - self.customers.len()
    }
}
