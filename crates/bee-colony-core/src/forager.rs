use crate::config::SimConfig;
use crate::field::{FieldError, SpatialField};
use rand::Rng;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use tracing::debug;

/// Behavioral state of a foraging bee.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BeeState {
    InHive,
    Searching,
    Returning,
}

impl BeeState {
    pub fn name(&self) -> &'static str {
        match self {
            BeeState::InHive => "IN_HIVE",
            BeeState::Searching => "SEARCHING",
            BeeState::Returning => "RETURNING",
        }
    }
}

/// A flower location and the travel path that reached it, shared with the
/// colony through the waggle dance.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlowerDiscovery {
    pub location: (usize, usize),
    pub path: Vec<(usize, usize)>,
}

/// Colony-level effects of one forager tick. The agent never mutates the
/// colony directly; `ColonyState` applies these after the update.
#[derive(Debug, Default)]
pub struct ForagerOutcome {
    /// Nectar units to credit to the colony stock this tick.
    pub nectar_for_colony: u32,
    /// Whether an egg was converted from collected nectar this tick.
    pub egg_laid: bool,
    /// Waggle dance performed on arrival at the hive, if any.
    pub dance: Option<FlowerDiscovery>,
    /// Age exceeded lifespan; the colony retires this agent.
    pub died: bool,
}

/// The queen's search-collect-return state machine.
///
/// Two-tier movement policy while searching: known flower locations are
/// revisited first (exploitation), and only when memory is empty or stale
/// does the agent pay for blind spiral search (exploration). The spiral
/// widens by one ring per full revolution, so field coverage time is
/// bounded. Cells visited while searching are pushed onto `return_path`
/// and popped in reverse to retrace the exact route home.
#[derive(Clone, Debug)]
pub struct ForagingAgent {
    pub(crate) position: [f64; 2],
    pub(crate) state: BeeState,
    pub(crate) nectar_collected: u32,
    nectar_needed: u32,
    pub(crate) eggs_laid: u64,
    pub(crate) age: u64,
    lifespan: u64,
    move_speed: f64,
    angle_step: f64,
    pub(crate) search_radius: f64,
    pub(crate) search_angle: f64,
    pub(crate) known_flower_locations: Vec<(usize, usize)>,
    pub(crate) return_path: Vec<(usize, usize)>,
    pub(crate) last_flower: Option<(usize, usize)>,
    hive_location: (usize, usize),
}

fn chebyshev(a: (usize, usize), b: (usize, usize)) -> usize {
    let dx = a.0.abs_diff(b.0);
    let dy = a.1.abs_diff(b.1);
    dx.max(dy)
}

impl ForagingAgent {
    pub fn new(hive_location: (usize, usize), config: &SimConfig) -> Self {
        Self {
            position: [hive_location.0 as f64, hive_location.1 as f64],
            state: BeeState::InHive,
            nectar_collected: 0,
            nectar_needed: config.nectar_needed,
            eggs_laid: 0,
            age: 0,
            lifespan: config.queen_lifespan,
            move_speed: config.move_speed,
            angle_step: config.search_angle_step,
            search_radius: 1.0,
            search_angle: 0.0,
            known_flower_locations: Vec::new(),
            return_path: Vec::new(),
            last_flower: None,
            hive_location,
        }
    }

    pub fn position(&self) -> [f64; 2] {
        self.position
    }

    pub fn state(&self) -> BeeState {
        self.state
    }

    pub fn nectar_collected(&self) -> u32 {
        self.nectar_collected
    }

    pub fn nectar_needed(&self) -> u32 {
        self.nectar_needed
    }

    pub fn eggs_laid(&self) -> u64 {
        self.eggs_laid
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn return_path(&self) -> &[(usize, usize)] {
        &self.return_path
    }

    pub fn known_flower_locations(&self) -> &[(usize, usize)] {
        &self.known_flower_locations
    }

    /// Advance the state machine by one tick.
    pub fn update(
        &mut self,
        field: &mut SpatialField,
        rng: &mut ChaCha12Rng,
    ) -> Result<ForagerOutcome, FieldError> {
        let mut outcome = ForagerOutcome::default();
        self.age += 1;
        if self.age > self.lifespan {
            outcome.died = true;
            return Ok(outcome);
        }

        let vacating = self.grid_cell(field.size());
        match self.state {
            BeeState::InHive => self.hive_step(rng, &mut outcome),
            BeeState::Searching => self.search_step(field, &mut outcome),
            BeeState::Returning => self.return_step(field.size(), &mut outcome),
        }

        // A depleted flower is only removed once no agent stands on it.
        // Moving off the cell completes that deferred removal (and its
        // conservation-preserving respawn).
        if self.grid_cell(field.size()) != vacating {
            field.clear_depleted_flower(vacating, rng)?;
        }
        Ok(outcome)
    }

    fn hive_step(&mut self, rng: &mut ChaCha12Rng, outcome: &mut ForagerOutcome) {
        if self.nectar_collected >= self.nectar_needed {
            self.eggs_laid += 1;
            self.nectar_collected -= self.nectar_needed;
            outcome.egg_laid = true;
            debug!(eggs_laid = self.eggs_laid, "queen laid an egg");
        }
        if self.nectar_collected < self.nectar_needed {
            self.state = BeeState::Searching;
            self.position = [self.hive_location.0 as f64, self.hive_location.1 as f64];
            self.search_radius = 1.0;
            self.search_angle = rng.random::<f64>() * TAU;
            self.return_path.clear();
        }
    }

    fn search_step(&mut self, field: &mut SpatialField, outcome: &mut ForagerOutcome) {
        let here = self.grid_cell(field.size());
        // Consecutive duplicates (ticks spent collecting on one cell) add
        // nothing to the route home.
        if self.return_path.last() != Some(&here) {
            self.return_path.push(here);
        }

        let mut targeted_memory = false;
        if let Some(&target) = self.known_flower_locations.first() {
            if field.has_active_flower(target) {
                self.step_toward(target, field.size());
                targeted_memory = true;
            } else {
                // Stale memory: the flower is gone. Drop the entry and fall
                // back to spiral search this tick.
                self.known_flower_locations.remove(0);
            }
        }
        if !targeted_memory {
            self.spiral_step(field.size());
        }

        let cell = self.grid_cell(field.size());
        let collected = field.collect_nectar_from_flower(cell);
        if collected > 0 {
            self.nectar_collected += collected;
            outcome.nectar_for_colony += collected;
            self.last_flower = Some(cell);
            if !self.known_flower_locations.contains(&cell) {
                self.known_flower_locations.push(cell);
            }
            if self.nectar_collected >= self.nectar_needed {
                self.state = BeeState::Returning;
            }
        }
    }

    fn return_step(&mut self, field_size: usize, outcome: &mut ForagerOutcome) {
        // Retrace the recorded route; once it is consumed, head straight
        // for the hive.
        let target = self.return_path.pop().unwrap_or(self.hive_location);
        self.step_toward(target, field_size);

        if chebyshev(self.grid_cell(field_size), self.hive_location) <= 1 {
            if let Some(location) = self.last_flower {
                debug!(?location, "waggle dance: sharing flower with colony");
                outcome.dance = Some(FlowerDiscovery {
                    location,
                    path: self.return_path.clone(),
                });
            }
            self.state = BeeState::InHive;
        }
    }

    /// One outward-spiral move around the hive: a fixed angular increment,
    /// widening the ring by one cell per full revolution.
    fn spiral_step(&mut self, field_size: usize) {
        self.search_angle += self.angle_step;
        if self.search_angle >= TAU {
            self.search_angle = 0.0;
            self.search_radius += 1.0;
        }
        let limit = (field_size - 1) as f64;
        let hx = self.hive_location.0 as f64;
        let hy = self.hive_location.1 as f64;
        self.position = [
            (hx + self.search_radius * self.search_angle.cos()).clamp(0.0, limit),
            (hy + self.search_radius * self.search_angle.sin()).clamp(0.0, limit),
        ];
    }

    /// Vector step toward a target cell: normalize the displacement and
    /// advance by `move_speed` along it, snapping onto the target when it
    /// is within reach. Diagonal moves are permitted.
    fn step_toward(&mut self, target: (usize, usize), field_size: usize) {
        let limit = (field_size - 1) as f64;
        let tx = target.0 as f64;
        let ty = target.1 as f64;
        let dx = tx - self.position[0];
        let dy = ty - self.position[1];
        let distance = (dx * dx + dy * dy).sqrt();
        if distance <= self.move_speed {
            self.position = [tx, ty];
        } else {
            self.position = [
                (self.position[0] + dx / distance * self.move_speed).clamp(0.0, limit),
                (self.position[1] + dy / distance * self.move_speed).clamp(0.0, limit),
            ];
        }
    }

    /// The grid cell the agent currently occupies (coordinates truncated).
    pub(crate) fn grid_cell(&self, field_size: usize) -> (usize, usize) {
        let limit = (field_size - 1) as f64;
        (
            self.position[0].clamp(0.0, limit) as usize,
            self.position[1].clamp(0.0, limit) as usize,
        )
    }
}
