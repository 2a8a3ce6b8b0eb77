use std::time::Duration;

/// Base rate of the real-time mapping: one simulated hour per real
/// minute.
const BASE_SIM_SECONDS_PER_REAL_SECOND: f64 = 3600.0 / 60.0;

/// Maps simulated time to wall-clock time for an interactive driver.
///
/// Purely a presentation-layer concern: ticks are an abstract unit of
/// colony age and simulation mechanics never depend on this mapping.
#[derive(Clone, Copy, Debug)]
pub struct TickPacing {
    time_multiplier: f64,
}

impl TickPacing {
    pub fn new(time_multiplier: f64) -> Self {
        assert!(
            time_multiplier.is_finite() && time_multiplier > 0.0,
            "time_multiplier must be positive and finite"
        );
        Self { time_multiplier }
    }

    pub fn time_multiplier(&self) -> f64 {
        self.time_multiplier
    }

    /// Real-time duration of one simulated second.
    pub fn real_seconds_per_sim_second(&self) -> f64 {
        1.0 / (BASE_SIM_SECONDS_PER_REAL_SECOND * self.time_multiplier)
    }

    /// Real-time delay corresponding to `sim_seconds` of simulated time.
    pub fn real_delay_for(&self, sim_seconds: f64) -> Duration {
        Duration::from_secs_f64(sim_seconds.max(0.0) * self.real_seconds_per_sim_second())
    }
}

impl Default for TickPacing {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_sim_minute_takes_one_real_second_at_base_rate() {
        let pacing = TickPacing::default();
        assert_eq!(pacing.real_delay_for(60.0), Duration::from_secs(1));
    }

    #[test]
    fn multiplier_scales_delay_down() {
        let pacing = TickPacing::new(2.0);
        let base = TickPacing::default().real_seconds_per_sim_second();
        assert!((pacing.real_seconds_per_sim_second() - base / 2.0).abs() < 1e-12);
    }

    #[test]
    fn negative_sim_time_maps_to_zero_delay() {
        let pacing = TickPacing::default();
        assert_eq!(pacing.real_delay_for(-5.0), Duration::ZERO);
    }

    #[test]
    #[should_panic(expected = "time_multiplier must be positive")]
    fn zero_multiplier_is_rejected() {
        TickPacing::new(0.0);
    }
}
