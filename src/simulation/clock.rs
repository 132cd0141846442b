//! Wall-clock rendering of simulation minutes

use crate::core::types::Tick;

/// Render minutes as `HH:MM`; hours keep counting past 24
pub fn format_clock(minutes: Tick) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
