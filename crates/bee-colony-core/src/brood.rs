use serde::{Deserialize, Serialize};

/// A bee's functional role, assigned at maturation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Caste {
    Worker,
    Drone,
    Queen,
}

/// Capacity rule for caste assignment: worker-heavy, few drones, queens
/// only as overflow. `workers` and `drones` are the current roster counts.
pub fn choose_caste(
    workers: usize,
    drones: usize,
    worker_capacity: usize,
    drone_capacity: usize,
) -> Caste {
    if workers < worker_capacity {
        Caste::Worker
    } else if drones < drone_capacity {
        Caste::Drone
    } else {
        Caste::Queen
    }
}

/// Brood stage: ages once per tick and matures after `development_time`.
#[derive(Clone, Debug)]
pub struct Larva {
    age: u64,
    development_time: u64,
}

impl Larva {
    pub fn new(development_time: u64) -> Self {
        Self {
            age: 0,
            development_time,
        }
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    /// Advance one tick; returns true when the larva has matured and must
    /// be replaced by exactly one adult bee.
    pub fn update(&mut self) -> bool {
        self.age += 1;
        self.age >= self.development_time
    }
}

/// Roster member. Workers and drones have no behavior of their own in
/// this version (only the queen forages), so their update is a no-op; a
/// `Queen` entry is an idle queen waiting for the forager slot to open.
#[derive(Clone, Debug)]
pub enum Bee {
    Worker,
    Drone,
    Queen,
    Larva(Larva),
}

impl Bee {
    pub fn caste(&self) -> Option<Caste> {
        match self {
            Bee::Worker => Some(Caste::Worker),
            Bee::Drone => Some(Caste::Drone),
            Bee::Queen => Some(Caste::Queen),
            Bee::Larva(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_worker_capacity_spawns_worker() {
        assert_eq!(choose_caste(49, 0, 50, 10), Caste::Worker);
    }

    #[test]
    fn at_worker_capacity_spawns_drone() {
        assert_eq!(choose_caste(50, 9, 50, 10), Caste::Drone);
    }

    #[test]
    fn at_both_capacities_spawns_queen() {
        assert_eq!(choose_caste(50, 10, 50, 10), Caste::Queen);
    }

    #[test]
    fn larva_matures_at_development_time() {
        let mut larva = Larva::new(21);
        for tick in 1..21 {
            assert!(!larva.update(), "matured early at tick {tick}");
        }
        assert!(larva.update());
    }

    #[test]
    fn larva_has_no_caste_until_maturation() {
        assert_eq!(Bee::Larva(Larva::new(21)).caste(), None);
        assert_eq!(Bee::Worker.caste(), Some(Caste::Worker));
    }
}
