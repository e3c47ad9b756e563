use crate::particle::Rgba;
use serde::{Deserialize, Serialize};

/// Simulation mode - how walkers spawn and whether the aggregate's
/// bounding box steers them
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum SimulationMode {
    /// Spawn uniformly over the whole domain, fixed active target
    Random,
    /// Spawn near the bounding box edge, target adapts to box area
    #[default]
    RandomBound,
    /// Like RandomBound, but each walker keeps a fixed direction
    DeterminedBound,
}

impl SimulationMode {
    pub fn name(&self) -> &str {
        match self {
            SimulationMode::Random => "Random",
            SimulationMode::RandomBound => "Random bound",
            SimulationMode::DeterminedBound => "Determined bound",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            SimulationMode::Random => SimulationMode::RandomBound,
            SimulationMode::RandomBound => SimulationMode::DeterminedBound,
            SimulationMode::DeterminedBound => SimulationMode::Random,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            SimulationMode::Random => SimulationMode::DeterminedBound,
            SimulationMode::RandomBound => SimulationMode::Random,
            SimulationMode::DeterminedBound => SimulationMode::RandomBound,
        }
    }

    /// Whether this mode tracks the aggregate's bounding box
    pub fn use_bounds(&self) -> bool {
        !matches!(self, SimulationMode::Random)
    }
}

/// All engine settings consolidated into one struct
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimSettings {
    /// Domain width in cells
    pub width: usize,
    /// Domain height in cells
    pub height: usize,
    /// Spawn/steering behavior
    pub mode: SimulationMode,
    /// Starting number of concurrently active walkers (bounded modes grow
    /// this with the box area)
    pub target_active: usize,
    /// Cap on the active-walker target (50-2000)
    pub max_active: usize,
    /// Simulation stops once total particles exceed this (100+)
    pub max_particles: usize,
    /// Padding around the aggregate and depth of the edge-reseed band (1-50)
    pub bound_width: usize,
    /// Color given to every spawned particle
    pub particle_color: Rgba,
    /// RNG seed for reproducible runs; None seeds from entropy
    pub rng_seed: Option<u64>,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
            mode: SimulationMode::default(),
            target_active: 20,
            max_active: 500,
            max_particles: 10000,
            bound_width: 10,
            particle_color: [255, 255, 255, 255],
            rng_seed: None,
        }
    }
}

impl SimSettings {
    /// Fail-fast contract check; the engine refuses to start from a
    /// config that could produce undefined occupancy state.
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!(
                "domain must have positive dimensions, got {}x{}",
                self.width, self.height
            ));
        }
        if self.target_active > self.max_active {
            return Err(format!(
                "target active walkers ({}) exceeds the maximum ({})",
                self.target_active, self.max_active
            ));
        }
        if self.max_particles == 0 {
            return Err("max particles must be at least 1".to_string());
        }
        if self.bound_width == 0 {
            return Err("bound width must be at least 1".to_string());
        }
        if self.seed_index() >= self.width * self.height {
            return Err(format!(
                "domain {}x{} is too narrow to hold the center seed",
                self.width, self.height
            ));
        }
        Ok(())
    }

    /// Linear index of the aggregate's starting seed, at the domain
    /// center. On degenerate domains (height 1) this lands past the last
    /// cell; `validate` rejects those.
    pub fn seed_index(&self) -> usize {
        (self.width as f64 * self.height as f64 / 2.0 + self.width as f64 / 2.0).round() as usize
    }

    /// Settings for a fresh domain size, keeping everything else
    pub fn with_domain(&self, width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..self.clone()
        }
    }

    /// Adjust the active-walker cap within bounds
    pub fn adjust_max_active(&mut self, delta: i64) {
        self.max_active = (self.max_active as i64 + delta).clamp(50, 2000) as usize;
        self.target_active = self.target_active.min(self.max_active);
    }

    /// Adjust the total particle ceiling within bounds
    pub fn adjust_max_particles(&mut self, delta: i64) {
        self.max_particles = (self.max_particles as i64 + delta).clamp(100, 1_000_000) as usize;
    }

    /// Adjust the bound width within bounds
    pub fn adjust_bound_width(&mut self, delta: i64) {
        self.bound_width = (self.bound_width as i64 + delta).clamp(1, 50) as usize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(SimSettings::default().validate().is_ok());
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let mut settings = SimSettings::default();
        settings.width = 0;
        assert!(settings.validate().is_err());
        settings.width = 400;
        settings.height = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_target_over_max_rejected() {
        let settings = SimSettings {
            target_active: 501,
            max_active: 500,
            ..SimSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_zero_bound_width_rejected() {
        let settings = SimSettings {
            bound_width: 0,
            ..SimSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_domain_too_narrow_for_seed_rejected() {
        let strip = SimSettings {
            width: 100,
            height: 1,
            ..SimSettings::default()
        };
        assert!(strip.validate().is_err());

        // A tall one-column domain still holds its center seed.
        let column = SimSettings {
            width: 1,
            height: 100,
            ..SimSettings::default()
        };
        assert!(column.validate().is_ok());
        assert!(column.seed_index() < 100);
    }

    #[test]
    fn test_mode_cycle_round_trip() {
        let mode = SimulationMode::Random;
        assert_eq!(mode.next().next().next(), mode);
        assert_eq!(mode.prev(), mode.next().next());
    }

    #[test]
    fn test_use_bounds() {
        assert!(!SimulationMode::Random.use_bounds());
        assert!(SimulationMode::RandomBound.use_bounds());
        assert!(SimulationMode::DeterminedBound.use_bounds());
    }

    #[test]
    fn test_adjust_max_active_pulls_target_down() {
        let mut settings = SimSettings {
            target_active: 500,
            max_active: 500,
            ..SimSettings::default()
        };
        settings.adjust_max_active(-450);
        assert_eq!(settings.max_active, 50);
        assert_eq!(settings.target_active, 50);
    }
}
