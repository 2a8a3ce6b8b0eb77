use crate::constants::{HIVE_SIDE, MAX_FIELD_SIZE};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::{error::Error, fmt};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Deterministic seed for reproducible simulation runs.
    pub seed: u64,
    /// Side length of the square field in cells (one acre at 1-unit cells).
    pub field_size: usize,
    /// Number of flowers kept alive on the field for the whole run.
    pub flower_count: usize,
    /// Nectar units a freshly spawned flower holds.
    pub flower_nectar: u32,
    /// Nectar the queen must collect before she can lay one egg.
    pub nectar_needed: u32,
    /// Colony nectar units converted into one honey unit per tick.
    pub nectar_per_honey: u64,
    /// Distance the queen advances per tick, in cells.
    pub move_speed: f64,
    /// Radians added to the spiral search angle each searching tick.
    pub search_angle_step: f64,
    /// Ticks the queen lives before she is retired from the colony.
    pub queen_lifespan: u64,
    /// Ticks a larva needs before maturing into an adult bee.
    pub larva_development_ticks: u64,
    /// Worker roster size below which a maturing larva becomes a worker.
    pub worker_capacity: usize,
    /// Drone roster size below which a maturing larva becomes a drone.
    pub drone_capacity: usize,
    /// Tick interval at which the colony-split condition is checked.
    pub split_check_interval: u64,
    /// Roster size the colony must exceed for the split condition to fire.
    pub split_min_roster: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            field_size: 208,
            flower_count: 100,
            flower_nectar: 10,
            nectar_needed: 10,
            nectar_per_honey: 10,
            move_speed: 1.0,
            search_angle_step: 0.25,
            queen_lifespan: 14_600,
            larva_development_ticks: 21,
            worker_capacity: 50,
            drone_capacity: 10,
            split_check_interval: 365,
            split_min_roster: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimConfigError {
    InvalidFieldSize,
    FieldSizeTooLarge { max: usize, actual: usize },
    TooManyFlowers { capacity: usize, requested: usize },
    InvalidFlowerNectar,
    InvalidNectarNeeded,
    InvalidNectarPerHoney,
    InvalidMoveSpeed,
    InvalidSearchAngleStep,
    InvalidDevelopmentTime,
}

impl fmt::Display for SimConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimConfigError::InvalidFieldSize => {
                write!(f, "field_size must be at least {HIVE_SIDE} cells per side")
            }
            SimConfigError::FieldSizeTooLarge { max, actual } => {
                write!(f, "field_size ({actual}) exceeds supported maximum ({max})")
            }
            SimConfigError::TooManyFlowers {
                capacity,
                requested,
            } => write!(
                f,
                "flower_count ({requested}) exceeds free cells after hive placement ({capacity})"
            ),
            SimConfigError::InvalidFlowerNectar => write!(f, "flower_nectar must be positive"),
            SimConfigError::InvalidNectarNeeded => write!(f, "nectar_needed must be positive"),
            SimConfigError::InvalidNectarPerHoney => {
                write!(f, "nectar_per_honey must be positive")
            }
            SimConfigError::InvalidMoveSpeed => {
                write!(f, "move_speed must be positive and finite")
            }
            SimConfigError::InvalidSearchAngleStep => {
                write!(f, "search_angle_step must be in (0, 2*pi)")
            }
            SimConfigError::InvalidDevelopmentTime => {
                write!(f, "larva_development_ticks must be positive")
            }
        }
    }
}

impl Error for SimConfigError {}

impl SimConfig {
    pub fn validate(&self) -> Result<(), SimConfigError> {
        if self.field_size < HIVE_SIDE {
            return Err(SimConfigError::InvalidFieldSize);
        }
        if self.field_size > MAX_FIELD_SIZE {
            return Err(SimConfigError::FieldSizeTooLarge {
                max: MAX_FIELD_SIZE,
                actual: self.field_size,
            });
        }
        let capacity = self.field_size * self.field_size - HIVE_SIDE * HIVE_SIDE;
        if self.flower_count > capacity {
            return Err(SimConfigError::TooManyFlowers {
                capacity,
                requested: self.flower_count,
            });
        }
        if self.flower_nectar == 0 {
            return Err(SimConfigError::InvalidFlowerNectar);
        }
        if self.nectar_needed == 0 {
            return Err(SimConfigError::InvalidNectarNeeded);
        }
        if self.nectar_per_honey == 0 {
            return Err(SimConfigError::InvalidNectarPerHoney);
        }
        if !(self.move_speed.is_finite() && self.move_speed > 0.0) {
            return Err(SimConfigError::InvalidMoveSpeed);
        }
        if !(self.search_angle_step.is_finite()
            && self.search_angle_step > 0.0
            && self.search_angle_step < TAU)
        {
            return Err(SimConfigError::InvalidSearchAngleStep);
        }
        if self.larva_development_ticks == 0 {
            return Err(SimConfigError::InvalidDevelopmentTime);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_field_smaller_than_hive_footprint() {
        let config = SimConfig {
            field_size: 1,
            flower_count: 0,
            ..SimConfig::default()
        };
        assert_eq!(config.validate(), Err(SimConfigError::InvalidFieldSize));
    }

    #[test]
    fn rejects_oversized_field() {
        let config = SimConfig {
            field_size: MAX_FIELD_SIZE + 1,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimConfigError::FieldSizeTooLarge { .. })
        ));
    }

    #[test]
    fn rejects_flower_count_beyond_free_cells() {
        let config = SimConfig {
            field_size: 3,
            flower_count: 6,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimConfigError::TooManyFlowers {
                capacity: 5,
                requested: 6,
            })
        ));
    }

    #[test]
    fn rejects_non_finite_move_speed() {
        let config = SimConfig {
            move_speed: f64::NAN,
            ..SimConfig::default()
        };
        assert_eq!(config.validate(), Err(SimConfigError::InvalidMoveSpeed));
    }

    #[test]
    fn rejects_angle_step_of_full_turn() {
        let config = SimConfig {
            search_angle_step: TAU,
            ..SimConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(SimConfigError::InvalidSearchAngleStep)
        );
    }

    #[test]
    fn rejects_zero_conversion_rate() {
        let config = SimConfig {
            nectar_per_honey: 0,
            ..SimConfig::default()
        };
        assert_eq!(config.validate(), Err(SimConfigError::InvalidNectarPerHoney));
    }
}
