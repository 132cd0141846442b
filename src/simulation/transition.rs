//! Zone-to-zone transition probabilities
//!
//! Rows are the zone a customer is in, columns the zone they go to next. The
//! TOML form used on disk is:
//!
//! ```toml
//! columns = ["checkout", "dairy", "drinks", "fruit", "spices"]
//!
//! [rows]
//! entrance = [0.0, 0.288, 0.153, 0.377, 0.182]
//! dairy = [0.103, 0.737, 0.058, 0.050, 0.052]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::store::Zone;

/// Allowed deviation of a row sum from 1
pub const ROW_SUM_TOLERANCE: f64 = 1e-6;

/// On-disk form of a transition matrix, keyed by zone label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionTable {
    pub columns: Vec<String>,
    pub rows: BTreeMap<String, Vec<f64>>,
}

#[derive(Debug, Clone)]
struct TransitionRow {
    probabilities: Vec<f64>,
    sampler: WeightedIndex<f64>,
}

/// Validated stochastic matrix over store zones
#[derive(Debug, Clone)]
pub struct TransitionModel {
    columns: Vec<Zone>,
    rows: BTreeMap<Zone, TransitionRow>,
}

impl TransitionModel {
    /// Build and validate a model
    pub fn new(columns: Vec<Zone>, rows: Vec<(Zone, Vec<f64>)>) -> Result<Self> {
        if columns.is_empty() {
            return Err(SimError::InvalidStochasticMatrix("no columns".into()));
        }
        for (i, zone) in columns.iter().enumerate() {
            if columns[..i].contains(zone) {
                return Err(SimError::InvalidStochasticMatrix(format!(
                    "column '{}' appears twice",
                    zone
                )));
            }
        }

        let mut built = BTreeMap::new();
        for (zone, probabilities) in rows {
            validate_row(zone, &probabilities, columns.len())?;
            let sampler = WeightedIndex::new(&probabilities).map_err(|e| {
                SimError::InvalidStochasticMatrix(format!("row '{}': {}", zone, e))
            })?;
            let row = TransitionRow {
                probabilities,
                sampler,
            };
            if built.insert(zone, row).is_some() {
                return Err(SimError::InvalidStochasticMatrix(format!(
                    "row '{}' appears twice",
                    zone
                )));
            }
        }

        Ok(Self {
            columns,
            rows: built,
        })
    }

    /// Build a model from zone labels
    pub fn from_table(table: &TransitionTable) -> Result<Self> {
        let columns = table
            .columns
            .iter()
            .map(|label| parse_label(label))
            .collect::<Result<Vec<_>>>()?;
        let rows = table
            .rows
            .iter()
            .map(|(label, probabilities)| Ok((parse_label(label)?, probabilities.clone())))
            .collect::<Result<Vec<_>>>()?;
        Self::new(columns, rows)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let table: TransitionTable = toml::from_str(content)?;
        Self::from_table(&table)
    }

    /// Load a TOML transition matrix from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Transition matrix fitted to the reference store's customer data
    pub fn default_store() -> Result<Self> {
        let columns = vec![Zone::Checkout, Zone::Dairy, Zone::Drinks, Zone::Fruit, Zone::Spices];
        Self::new(
            columns,
            vec![
                (Zone::Checkout, vec![1.0, 0.0, 0.0, 0.0, 0.0]),
                (Zone::Dairy, vec![0.103, 0.737, 0.058, 0.050, 0.052]),
                (Zone::Drinks, vec![0.216, 0.011, 0.598, 0.088, 0.087]),
                (Zone::Entrance, vec![0.0, 0.288, 0.153, 0.377, 0.182]),
                (Zone::Fruit, vec![0.201, 0.096, 0.055, 0.597, 0.051]),
                (Zone::Spices, vec![0.150, 0.193, 0.163, 0.091, 0.403]),
            ],
        )
    }

    /// Re-check every row
    pub fn validate(&self) -> Result<()> {
        for (zone, row) in &self.rows {
            validate_row(*zone, &row.probabilities, self.columns.len())?;
        }
        Ok(())
    }

    /// Draw the zone a customer in `current` moves to next
    pub fn sample<R: Rng + ?Sized>(&self, current: Zone, rng: &mut R) -> Result<Zone> {
        let row = self
            .rows
            .get(&current)
            .ok_or_else(|| SimError::UnknownZone(format!("no transition row for '{}'", current)))?;
        Ok(self.columns[row.sampler.sample(rng)])
    }

    pub fn probability(&self, from: Zone, to: Zone) -> Option<f64> {
        let row = self.rows.get(&from)?;
        let col = self.columns.iter().position(|zone| *zone == to)?;
        Some(row.probabilities[col])
    }

    pub fn columns(&self) -> &[Zone] {
        &self.columns
    }

    pub fn rows(&self) -> impl Iterator<Item = (Zone, &[f64])> + '_ {
        self.rows
            .iter()
            .map(|(zone, row)| (*zone, row.probabilities.as_slice()))
    }

    pub fn has_row(&self, zone: Zone) -> bool {
        self.rows.contains_key(&zone)
    }

    /// Back to the on-disk form
    pub fn to_table(&self) -> TransitionTable {
        TransitionTable {
            columns: self.columns.iter().map(|z| z.label().to_string()).collect(),
            rows: self
                .rows
                .iter()
                .map(|(zone, row)| (zone.label().to_string(), row.probabilities.clone()))
                .collect(),
        }
    }
}

fn parse_label(label: &str) -> Result<Zone> {
    Zone::from_label(label).ok_or_else(|| SimError::UnknownZone(label.to_string()))
}

fn validate_row(zone: Zone, probabilities: &[f64], width: usize) -> Result<()> {
    if probabilities.len() != width {
        return Err(SimError::InvalidStochasticMatrix(format!(
            "row '{}' has {} entries, expected {}",
            zone,
            probabilities.len(),
            width
        )));
    }
    if let Some(p) = probabilities.iter().find(|p| !p.is_finite() || **p < 0.0) {
        return Err(SimError::InvalidStochasticMatrix(format!(
            "row '{}' contains invalid probability {}",
            zone, p
        )));
    }
    let sum: f64 = probabilities.iter().sum();
    if (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
        return Err(SimError::InvalidStochasticMatrix(format!(
            "row '{}' sums to {}",
            zone, sum
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_default_store_is_stochastic() {
        let model = TransitionModel::default_store().unwrap();
        assert!(model.validate().is_ok());
        for (_, row) in model.rows() {
            let sum: f64 = row.iter().sum();
            assert!((sum - 1.0).abs() <= ROW_SUM_TOLERANCE);
        }
        assert_eq!(model.probability(Zone::Checkout, Zone::Checkout), Some(1.0));
        assert_eq!(model.probability(Zone::Exit, Zone::Dairy), None);
    }

    #[test]
    fn test_row_sum_checked() {
        let result = TransitionModel::new(
            vec![Zone::Checkout, Zone::Dairy],
            vec![(Zone::Entrance, vec![0.5, 0.4])],
        );
        assert!(matches!(result, Err(SimError::InvalidStochasticMatrix(_))));
    }

    #[test]
    fn test_negative_entry_rejected() {
        let result = TransitionModel::new(
            vec![Zone::Checkout, Zone::Dairy],
            vec![(Zone::Entrance, vec![1.5, -0.5])],
        );
        assert!(matches!(result, Err(SimError::InvalidStochasticMatrix(_))));
    }

    #[test]
    fn test_row_width_checked() {
        let result = TransitionModel::new(
            vec![Zone::Checkout, Zone::Dairy],
            vec![(Zone::Entrance, vec![1.0])],
        );
        assert!(matches!(result, Err(SimError::InvalidStochasticMatrix(_))));
    }

    #[test]
    fn test_sum_within_tolerance_accepted() {
        let result = TransitionModel::new(
            vec![Zone::Checkout, Zone::Dairy],
            vec![(Zone::Entrance, vec![0.3333334, 0.6666665])],
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_sample_unknown_row() {
        let model = TransitionModel::default_store().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(matches!(
            model.sample(Zone::Exit, &mut rng),
            Err(SimError::UnknownZone(_))
        ));
    }

    #[test]
    fn test_sample_respects_zero_probabilities() {
        let model = TransitionModel::default_store().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..500 {
            let next = model.sample(Zone::Entrance, &mut rng).unwrap();
            assert_ne!(next, Zone::Checkout);
            assert!(model.columns().contains(&next));
            assert_eq!(model.sample(Zone::Checkout, &mut rng).unwrap(), Zone::Checkout);
        }
    }

    #[test]
    fn test_toml_roundtrip_through_table() {
        let toml_str = r#"
            columns = ["checkout", "dairy"]

            [rows]
            entrance = [0.0, 1.0]
            dairy = [0.25, 0.75]
            checkout = [1.0, 0.0]
        "#;
        let model = TransitionModel::from_toml_str(toml_str).unwrap();
        assert_eq!(model.columns(), &[Zone::Checkout, Zone::Dairy]);
        assert_eq!(model.probability(Zone::Dairy, Zone::Checkout), Some(0.25));

        let table = model.to_table();
        assert_eq!(table.rows["entrance"], vec![0.0, 1.0]);
    }

    #[test]
    fn test_unknown_label_rejected() {
        let toml_str = r#"
            columns = ["checkout", "bakery"]

            [rows]
            entrance = [0.5, 0.5]
        "#;
        assert!(matches!(
            TransitionModel::from_toml_str(toml_str),
            Err(SimError::UnknownZone(label)) if label == "bakery"
        ));
    }
}
