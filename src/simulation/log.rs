//! Append-only record of where every customer was at every tick

use serde::{Deserialize, Serialize};

use crate::core::types::CustomerId;
use crate::store::Zone;

pub const CSV_HEADER: &str = "timestamp,customer_no,name,current_location";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: String,
    pub customer_no: CustomerId,
    pub name: String,
    pub current_location: Zone,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickLog {
    records: Vec<LogRecord>,
}

impl TickLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: LogRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogRecord> {
        self.records.iter()
    }

    /// Records for one customer, oldest first
    pub fn history(&self, customer: CustomerId) -> impl Iterator<Item = &LogRecord> {
        self.records.iter().filter(move |r| r.customer_no == customer)
    }

    /// CSV with a header row
    pub fn to_csv(&self) -> String {
        let mut out = String::from(CSV_HEADER);
        out.push('\n');
        for record in &self.records {
            out.push_str(&format!(
                "{},{},{},{}\n",
                record.timestamp,
                record.customer_no,
                escape_csv(&record.name),
                record.current_location
            ));
        }
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.records)
    }
}

fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
