//! A single shopper moving through the store

use std::fmt;
use std::sync::Arc;

use rand::Rng;

use crate::core::error::Result;
use crate::core::types::CustomerId;
use crate::simulation::transition::TransitionModel;
use crate::store::Zone;

#[derive(Debug, Clone)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    current_zone: Zone,
    previous_zone: Zone,
    model: Arc<TransitionModel>,
}

impl Customer {
    /// A customer standing at the entrance
    pub fn new(id: CustomerId, name: String, model: Arc<TransitionModel>) -> Self {
        Self {
            id,
            name,
            current_zone: Zone::Entrance,
            previous_zone: Zone::Entrance,
            model,
        }
    }

    pub fn current_zone(&self) -> Zone {
        self.current_zone
    }

    pub fn previous_zone(&self) -> Zone {
        self.previous_zone
    }

    /// Take one Markov step
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let next = self.next_zone(rng)?;
        self.move_to(next);
        Ok(())
    }

    /// Draw the next zone without moving
    pub fn next_zone<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Zone> {
        self.model.sample(self.current_zone, rng)
    }

    pub fn move_to(&mut self, next: Zone) {
        self.previous_zone = self.current_zone;
        self.current_zone = next;
    }

    /// Still shopping (has not reached the checkout)
    pub fn is_active(&self) -> bool {
        self.current_zone != Zone::Checkout
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {} -> {}",
            self.name, self.id, self.previous_zone, self.current_zone
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn straight_to_checkout() -> Arc<TransitionModel> {
        Arc::new(
            TransitionModel::new(
                vec![Zone::Checkout, Zone::Dairy],
                vec![(Zone::Entrance, vec![0.0, 1.0]), (Zone::Dairy, vec![1.0, 0.0])],
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_new_customer_at_entrance() {
        let customer = Customer::new(CustomerId(0), "Ada Byron".into(), straight_to_checkout());
        assert_eq!(customer.current_zone(), Zone::Entrance);
        assert_eq!(customer.previous_zone(), Zone::Entrance);
        assert!(customer.is_active());
    }

    #[test]
    fn test_advance_shifts_zones() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut customer = Customer::new(CustomerId(3), "Ada Byron".into(), straight_to_checkout());

        customer.advance(&mut rng).unwrap();
        assert_eq!(customer.previous_zone(), Zone::Entrance);
        assert_eq!(customer.current_zone(), Zone::Dairy);

        customer.advance(&mut rng).unwrap();
        assert_eq!(customer.previous_zone(), Zone::Dairy);
        assert_eq!(customer.current_zone(), Zone::Checkout);
        assert!(!customer.is_active());
    }

    #[test]
    fn test_advance_without_row_leaves_state() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut customer = Customer::new(CustomerId(1), "Ada Byron".into(), straight_to_checkout());
        customer.advance(&mut rng).unwrap();
        customer.advance(&mut rng).unwrap();

        // checkout has no row in this model
        assert!(customer.advance(&mut rng).is_err());
        assert_eq!(customer.previous_zone(), Zone::Dairy);
        assert_eq!(customer.current_zone(), Zone::Checkout);
    }

    #[test]
    fn test_next_zone_does_not_move() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut customer = Customer::new(CustomerId(2), "Ada Byron".into(), straight_to_checkout());

        assert_eq!(customer.next_zone(&mut rng).unwrap(), Zone::Dairy);
        assert_eq!(customer.current_zone(), Zone::Entrance);

        customer.move_to(Zone::Dairy);
        assert_eq!(customer.previous_zone(), Zone::Entrance);
        assert_eq!(customer.current_zone(), Zone::Dairy);
    }

    #[test]
    fn test_display() {
        let customer = Customer::new(CustomerId(7), "Ada Byron".into(), straight_to_checkout());
        assert_eq!(customer.to_string(), "Ada Byron (7): entrance -> entrance");
    }
}
