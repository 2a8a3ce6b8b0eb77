use crate::brood::{choose_caste, Bee, Caste, Larva};
use crate::config::{SimConfig, SimConfigError};
use crate::field::{FieldError, SpatialField};
use crate::forager::{FlowerDiscovery, ForagingAgent};
use crate::rng;
use rand_chacha::ChaCha12Rng;
use std::{error::Error, fmt};
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub enum ColonyInitError {
    Config(SimConfigError),
    Field(FieldError),
    FieldSizeMismatch { expected: usize, actual: usize },
}

impl fmt::Display for ColonyInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColonyInitError::Config(e) => write!(f, "invalid configuration: {e}"),
            ColonyInitError::Field(e) => write!(f, "field setup failed: {e}"),
            ColonyInitError::FieldSizeMismatch { expected, actual } => write!(
                f,
                "field side ({actual}) does not match configured field_size ({expected})"
            ),
        }
    }
}

impl Error for ColonyInitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ColonyInitError::Config(e) => Some(e),
            ColonyInitError::Field(e) => Some(e),
            ColonyInitError::FieldSizeMismatch { .. } => None,
        }
    }
}

impl From<SimConfigError> for ColonyInitError {
    fn from(e: SimConfigError) -> Self {
        ColonyInitError::Config(e)
    }
}

impl From<FieldError> for ColonyInitError {
    fn from(e: FieldError) -> Self {
        ColonyInitError::Field(e)
    }
}

/// Hive orchestrator: exclusively owns the bee roster, nectar and honey
/// stocks, and the shared flower memory. All agent effects flow back
/// through [`crate::forager::ForagerOutcome`] so invariants are enforced
/// in one place.
pub struct ColonyState {
    age: u64,
    queen: Option<ForagingAgent>,
    bees: Vec<Bee>,
    nectar: u64,
    honey: u64,
    eggs_laid: u64,
    known_flowers: Vec<FlowerDiscovery>,
    hive_location: (usize, usize),
    split_events: u64,
    config: SimConfig,
    rng: ChaCha12Rng,
}

impl ColonyState {
    /// Validate the config, place the hive and initial flowers on the
    /// field, and seat the founding queen.
    pub fn new(field: &mut SpatialField, config: SimConfig) -> Result<Self, ColonyInitError> {
        config.validate()?;
        if field.size() != config.field_size {
            return Err(ColonyInitError::FieldSizeMismatch {
                expected: config.field_size,
                actual: field.size(),
            });
        }
        let mut rng = rng::create_rng(config.seed);
        let hive_location = field.place_hive(&mut rng)?;
        field.populate_flowers(config.flower_count, &mut rng)?;
        let queen = ForagingAgent::new(hive_location, &config);
        Ok(Self {
            age: 0,
            queen: Some(queen),
            bees: Vec::new(),
            nectar: 0,
            honey: 0,
            eggs_laid: 0,
            known_flowers: Vec::new(),
            hive_location,
            split_events: 0,
            config,
            rng,
        })
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn queen(&self) -> Option<&ForagingAgent> {
        self.queen.as_ref()
    }

    pub fn bees(&self) -> &[Bee] {
        &self.bees
    }

    pub fn nectar(&self) -> u64 {
        self.nectar
    }

    pub fn honey(&self) -> u64 {
        self.honey
    }

    pub fn eggs_laid(&self) -> u64 {
        self.eggs_laid
    }

    pub fn known_flowers(&self) -> &[FlowerDiscovery] {
        &self.known_flowers
    }

    pub fn hive_location(&self) -> (usize, usize) {
        self.hive_location
    }

    pub fn split_events(&self) -> u64 {
        self.split_events
    }

    pub fn worker_count(&self) -> usize {
        self.bees.iter().filter(|b| matches!(b, Bee::Worker)).count()
    }

    pub fn drone_count(&self) -> usize {
        self.bees.iter().filter(|b| matches!(b, Bee::Drone)).count()
    }

    pub fn larva_count(&self) -> usize {
        self.bees
            .iter()
            .filter(|b| matches!(b, Bee::Larva(_)))
            .count()
    }

    /// Total colony members, the foraging queen included.
    pub fn roster_len(&self) -> usize {
        self.bees.len() + usize::from(self.queen.is_some())
    }

    /// Advance the whole colony by one tick: age, honey conversion, then
    /// every member in roster order. Members interact only through the
    /// shared field and the nectar pool, so update order is irrelevant.
    pub fn update(&mut self, field: &mut SpatialField) -> Result<(), FieldError> {
        self.age += 1;
        self.produce_honey();
        self.update_queen(field)?;
        self.update_brood();

        if self.config.split_check_interval > 0
            && self.age % self.config.split_check_interval == 0
            && self.roster_len() > self.config.split_min_roster
        {
            // The split mechanism itself is deliberately unimplemented;
            // the condition is surfaced as a counted event only.
            self.split_events += 1;
            info!(
                age = self.age,
                roster = self.roster_len(),
                "colony split condition met"
            );
        }
        Ok(())
    }

    /// Convert the nectar stock to honey at the fixed exchange rate,
    /// keeping the integer remainder as nectar.
    fn produce_honey(&mut self) {
        let produced = self.nectar / self.config.nectar_per_honey;
        self.honey += produced;
        self.nectar -= produced * self.config.nectar_per_honey;
    }

    fn update_queen(&mut self, field: &mut SpatialField) -> Result<(), FieldError> {
        let Some(mut queen) = self.queen.take() else {
            return Ok(());
        };
        let outcome = queen.update(field, &mut self.rng)?;
        self.nectar += u64::from(outcome.nectar_for_colony);
        if outcome.egg_laid {
            self.eggs_laid += 1;
            self.bees
                .push(Bee::Larva(Larva::new(self.config.larva_development_ticks)));
        }
        if let Some(dance) = outcome.dance {
            self.known_flowers.push(dance);
        }
        if outcome.died {
            info!(age = queen.age(), "the queen has died");
        } else {
            self.queen = Some(queen);
        }
        Ok(())
    }

    fn update_brood(&mut self) {
        let mut matured = Vec::new();
        for (idx, bee) in self.bees.iter_mut().enumerate() {
            if let Bee::Larva(larva) = bee {
                if larva.update() {
                    matured.push(idx);
                }
            }
        }
        // Descending order keeps earlier indices stable across the one
        // roster-shrinking case (a matured queen taking the forager slot).
        for idx in matured.into_iter().rev() {
            let caste = choose_caste(
                self.worker_count(),
                self.drone_count(),
                self.config.worker_capacity,
                self.config.drone_capacity,
            );
            match caste {
                Caste::Worker => self.bees[idx] = Bee::Worker,
                Caste::Drone => self.bees[idx] = Bee::Drone,
                Caste::Queen => {
                    if self.queen.is_none() {
                        info!("matured queen takes the vacant forager slot");
                        self.queen =
                            Some(ForagingAgent::new(self.hive_location, &self.config));
                        self.bees.swap_remove(idx);
                    } else {
                        self.bees[idx] = Bee::Queen;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Cell;

    fn small_config() -> SimConfig {
        SimConfig {
            field_size: 32,
            flower_count: 10,
            ..SimConfig::default()
        }
    }

    fn make_colony(config: SimConfig) -> (SpatialField, ColonyState) {
        let mut field = SpatialField::new(config.field_size, config.flower_nectar);
        let colony = ColonyState::new(&mut field, config).unwrap();
        (field, colony)
    }

    #[test]
    fn new_colony_places_hive_and_flowers() {
        let (field, colony) = make_colony(small_config());
        assert_eq!(field.flower_cell_count(), 10);
        assert!(colony.queen().is_some());
        let (hx, hy) = colony.hive_location();
        assert_eq!(field.get_cell(hx as isize, hy as isize), Some(Cell::Hive));
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = SimConfig {
            field_size: 3,
            flower_count: 100,
            ..SimConfig::default()
        };
        let mut field = SpatialField::new(3, 10);
        assert!(matches!(
            ColonyState::new(&mut field, config),
            Err(ColonyInitError::Config(SimConfigError::TooManyFlowers { .. }))
        ));
    }

    #[test]
    fn new_rejects_mismatched_field() {
        let config = small_config();
        let mut field = SpatialField::new(16, 10);
        assert!(matches!(
            ColonyState::new(&mut field, config),
            Err(ColonyInitError::FieldSizeMismatch {
                expected: 32,
                actual: 16,
            })
        ));
    }

    #[test]
    fn honey_conversion_keeps_remainder_below_rate() {
        let (_, mut colony) = make_colony(small_config());
        colony.nectar = 25;
        colony.produce_honey();
        assert_eq!(colony.honey(), 2);
        assert_eq!(colony.nectar(), 5);
    }

    #[test]
    fn nectar_remainder_stays_below_rate_across_ticks() {
        let (mut field, mut colony) = make_colony(small_config());
        for _ in 0..300 {
            colony.update(&mut field).unwrap();
            // Conversion runs before deposits, so at most one tick of
            // deposits sits on top of a sub-rate remainder.
            assert!(colony.nectar() < colony.config.nectar_per_honey + 1);
        }
    }

    #[test]
    fn queen_is_retired_when_lifespan_is_exceeded() {
        let config = SimConfig {
            queen_lifespan: 1,
            ..small_config()
        };
        let (mut field, mut colony) = make_colony(config);
        colony.update(&mut field).unwrap();
        assert!(colony.queen().is_some());
        colony.update(&mut field).unwrap();
        assert!(colony.queen().is_none());
        // The colony keeps ticking without a queen.
        colony.update(&mut field).unwrap();
        assert_eq!(colony.age(), 3);
    }

    #[test]
    fn laid_egg_becomes_a_larva() {
        let (mut field, mut colony) = make_colony(small_config());
        colony.queen.as_mut().unwrap().nectar_collected = 10;
        colony.update(&mut field).unwrap();
        assert_eq!(colony.eggs_laid(), 1);
        assert_eq!(colony.larva_count(), 1);
    }

    #[test]
    fn matured_larva_becomes_worker_below_capacity() {
        let config = SimConfig {
            larva_development_ticks: 1,
            ..small_config()
        };
        let (mut field, mut colony) = make_colony(config);
        colony.bees.extend(std::iter::repeat_n(Bee::Worker, 49));
        colony.bees.push(Bee::Larva(Larva::new(1)));
        colony.update(&mut field).unwrap();
        assert_eq!(colony.worker_count(), 50);
        assert_eq!(colony.larva_count(), 0);
    }

    #[test]
    fn matured_larva_becomes_drone_at_worker_capacity() {
        let (mut field, mut colony) = make_colony(small_config());
        colony.bees.extend(std::iter::repeat_n(Bee::Worker, 50));
        colony.bees.extend(std::iter::repeat_n(Bee::Drone, 9));
        colony.bees.push(Bee::Larva(Larva::new(1)));
        colony.update(&mut field).unwrap();
        assert_eq!(colony.drone_count(), 10);
    }

    #[test]
    fn matured_queen_fills_vacant_forager_slot() {
        let (mut field, mut colony) = make_colony(small_config());
        colony.queen = None;
        colony.bees.extend(std::iter::repeat_n(Bee::Worker, 50));
        colony.bees.extend(std::iter::repeat_n(Bee::Drone, 10));
        colony.bees.push(Bee::Larva(Larva::new(1)));
        colony.update(&mut field).unwrap();
        assert!(colony.queen().is_some());
        assert_eq!(colony.larva_count(), 0);
        assert!(!colony.bees().iter().any(|b| matches!(b, Bee::Queen)));
    }

    #[test]
    fn matured_queen_idles_when_forager_slot_is_occupied() {
        let (mut field, mut colony) = make_colony(small_config());
        colony.bees.extend(std::iter::repeat_n(Bee::Worker, 50));
        colony.bees.extend(std::iter::repeat_n(Bee::Drone, 10));
        colony.bees.push(Bee::Larva(Larva::new(1)));
        colony.update(&mut field).unwrap();
        assert_eq!(
            colony
                .bees()
                .iter()
                .filter(|b| matches!(b, Bee::Queen))
                .count(),
            1
        );
    }

    #[test]
    fn split_condition_is_counted_not_acted_on() {
        let config = SimConfig {
            split_check_interval: 1,
            ..small_config()
        };
        let (mut field, mut colony) = make_colony(config);
        colony.bees.extend(std::iter::repeat_n(Bee::Worker, 60));
        let before = colony.roster_len();
        colony.update(&mut field).unwrap();
        assert_eq!(colony.split_events(), 1);
        assert_eq!(colony.roster_len(), before);
    }

    #[test]
    fn waggle_dance_reaches_colony_memory() {
        let (mut field, mut colony) = make_colony(small_config());
        {
            let queen = colony.queen.as_mut().unwrap();
            queen.state = crate::forager::BeeState::Returning;
            queen.last_flower = Some((3, 3));
            let (hx, hy) = colony.hive_location;
            queen.position = [hx as f64, hy as f64];
        }
        colony.update(&mut field).unwrap();
        assert_eq!(colony.known_flowers().len(), 1);
        assert_eq!(colony.known_flowers()[0].location, (3, 3));
    }
}
