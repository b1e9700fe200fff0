use std::error::Error;
use std::thread;

use serde::{Deserialize, Serialize};

fn default_mesh_batch() -> usize {
    50
}
fn default_finished_capacity() -> usize {
    4096
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Background worker count; `None` keeps two cores free for the caller.
    #[serde(default)]
    pub workers: Option<usize>,
    /// Mesh-stage jobs drained per worker wake.
    #[serde(default = "default_mesh_batch")]
    pub mesh_batch: usize,
    /// Finished jobs held before workers block.
    #[serde(default = "default_finished_capacity")]
    pub finished_capacity: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            workers: None,
            mesh_batch: default_mesh_batch(),
            finished_capacity: default_finished_capacity(),
        }
    }
}

impl SchedulerConfig {
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            let cpus = thread::available_parallelism().map(|n| n.get()).unwrap_or(4);
            cpus.saturating_sub(2).max(1)
        })
    }

    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.workers == Some(0) {
            return Err("scheduler.workers must be positive".into());
        }
        if self.mesh_batch == 0 {
            return Err("scheduler.mesh_batch must be positive".into());
        }
        if self.finished_capacity == 0 {
            return Err(format!(
                "scheduler.finished_capacity must be positive, got {}",
                self.finished_capacity
            )
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let cfg: SchedulerConfig = toml::from_str("workers = 3").unwrap();
        assert_eq!(cfg.workers, Some(3));
        assert_eq!(cfg.mesh_batch, 50);
        assert_eq!(cfg.finished_capacity, 4096);
        assert_eq!(cfg.worker_count(), 3);
    }

    #[test]
    fn auto_worker_count_is_at_least_one() {
        assert!(SchedulerConfig::default().worker_count() >= 1);
    }

    #[test]
    fn zero_values_are_rejected() {
        let cfg = SchedulerConfig {
            workers: Some(0),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
        let cfg = SchedulerConfig {
            mesh_batch: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
        assert!(SchedulerConfig::default().validate().is_ok());
    }
}
