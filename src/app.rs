use crate::braille;
use crate::config::AppConfig;
use crate::settings::SimSettings;
use crate::simulation::Simulation;

/// Main application state: the engine plus host-side scheduling knobs.
/// The engine itself knows nothing about pacing; pausing and batching
/// live here.
pub struct App {
    pub simulation: Simulation,
    /// Template used when the simulation is rebuilt (reset, resize,
    /// mode change).
    pub settings: SimSettings,
    pub paused: bool,
    pub steps_per_frame: usize,
    pub show_help: bool,
    /// Transient one-line message shown in the sidebar.
    pub status: Option<String>,
}

impl App {
    pub fn new(
        canvas_width: u16,
        canvas_height: u16,
        settings: SimSettings,
        steps_per_frame: usize,
    ) -> Result<Self, String> {
        let (sim_width, sim_height) = braille::calculate_simulation_size(canvas_width, canvas_height);
        let settings = settings.with_domain(sim_width, sim_height);
        Ok(Self {
            simulation: Simulation::new(settings.clone())?,
            settings,
            paused: false,
            steps_per_frame: steps_per_frame.clamp(1, 50),
            show_help: false,
            status: None,
        })
    }

    /// Run the simulation steps for the current frame.
    pub fn tick(&mut self) {
        if self.paused {
            return;
        }
        for _ in 0..self.steps_per_frame {
            if self.simulation.is_complete() {
                break;
            }
            self.simulation.advance();
        }
    }

    /// Rebuild the simulation from the current settings template.
    pub fn reset(&mut self) {
        // The template was validated when the current simulation was
        // built, so this cannot fail.
        if let Ok(sim) = Simulation::new(self.settings.clone()) {
            self.simulation = sim;
        }
        self.paused = false;
        self.status = None;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Switch to the next simulation mode and restart.
    pub fn cycle_mode(&mut self) {
        self.settings.mode = self.settings.mode.next();
        self.reset();
    }

    /// Switch to the previous simulation mode and restart.
    pub fn cycle_mode_prev(&mut self) {
        self.settings.mode = self.settings.mode.prev();
        self.reset();
    }

    /// Grow or shrink the bounding-box padding and restart.
    pub fn adjust_bound_width(&mut self, delta: i64) {
        self.settings.adjust_bound_width(delta);
        self.reset();
    }

    /// Change the active-walker cap and restart.
    pub fn adjust_max_active(&mut self, delta: i64) {
        self.settings.adjust_max_active(delta);
        self.reset();
    }

    /// Change the total particle ceiling and restart.
    pub fn adjust_max_particles(&mut self, delta: i64) {
        self.settings.adjust_max_particles(delta);
        self.reset();
    }

    pub fn increase_speed(&mut self) {
        self.steps_per_frame = (self.steps_per_frame + 1).min(50);
    }

    pub fn decrease_speed(&mut self) {
        self.steps_per_frame = self.steps_per_frame.saturating_sub(1).max(1);
    }

    /// Rebuild the simulation to match a new canvas size.
    pub fn resize(&mut self, canvas_width: u16, canvas_height: u16) {
        let (sim_width, sim_height) = braille::calculate_simulation_size(canvas_width, canvas_height);
        if sim_width != self.settings.width || sim_height != self.settings.height {
            self.settings = self.settings.with_domain(sim_width, sim_height);
            self.reset();
        }
    }

    /// Write the current configuration to the default config path.
    pub fn save_config(&mut self) {
        let config = AppConfig {
            version: 1,
            settings: self.settings.clone(),
            steps_per_frame: self.steps_per_frame,
        };
        self.status = Some(match AppConfig::default_path() {
            Some(path) => match config.save_to_file(&path) {
                Ok(()) => format!("Saved {}", path.display()),
                Err(e) => e,
            },
            None => "No config directory available".to_string(),
        });
    }
}
