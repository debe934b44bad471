//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Score display
//! - Model loading (network fetch on web, embedded natively)
//! - Tuning overrides

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::sim::ScoreSink;

/// Writes score changes to the log (native runs)
#[derive(Debug)]
pub struct LogScoreSink {
    last_logged: Option<u64>,
    /// Only log when the score crosses a multiple of this
    every: u64,
}

impl LogScoreSink {
    pub fn new(every: u64) -> Self {
        Self {
            last_logged: None,
            every: every.max(1),
        }
    }
}

impl ScoreSink for LogScoreSink {
    fn show_score(&mut self, text: &str) {
        let Ok(value) = text.parse::<u64>() else {
            log::debug!("Score: {}", text);
            return;
        };
        let bucket = value / self.every;
        if self.last_logged != Some(bucket) {
            self.last_logged = Some(bucket);
            log::info!("Score: {}", text);
        }
    }
}
