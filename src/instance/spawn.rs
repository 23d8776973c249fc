use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timing for staggered sibling creation at startup.
///
/// The n-th child (0-based) is created after
/// `initial_delay + n * stagger + offset`. The delays only spread load on the
/// settings backend; correctness does not depend on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnSchedule {
    pub initial_delay_ms: u64,
    pub stagger_ms: u64,
    pub offset_ms: u64,
}

impl Default for SpawnSchedule {
    fn default() -> Self {
        Self {
            initial_delay_ms: 500,
            stagger_ms: 30,
            offset_ms: 20,
        }
    }
}

impl SpawnSchedule {
    /// No delays at all
    pub fn immediate() -> Self {
        Self {
            initial_delay_ms: 0,
            stagger_ms: 0,
            offset_ms: 0,
        }
    }

    /// Delay before creating the n-th child
    pub fn delay_for(&self, n: usize) -> Duration {
        let n = n as u64;
        Duration::from_millis(self.initial_delay_ms + n * self.stagger_ms + self.offset_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delays() {
        let schedule = SpawnSchedule::default();
        assert_eq!(schedule.delay_for(0), Duration::from_millis(520));
        assert_eq!(schedule.delay_for(3), Duration::from_millis(610));
        assert_eq!(SpawnSchedule::immediate().delay_for(4), Duration::ZERO);
    }
}
