mod app;
mod bounds;
mod braille;
mod config;
mod grid;
mod particle;
mod settings;
mod simulation;
mod ui;

use app::App;
use clap::Parser;
use config::AppConfig;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use settings::SimulationMode;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "fractal-walkers")]
#[command(about = "Bounded diffusion-limited aggregation fractals in the terminal")]
struct Args {
    /// Simulation mode (random, random-bound, determined-bound)
    #[arg(short, long)]
    mode: Option<String>,

    /// Starting number of active walkers
    #[arg(short, long)]
    target: Option<usize>,

    /// Maximum number of active walkers (50-2000)
    #[arg(long = "max-active")]
    max_active: Option<usize>,

    /// Stop once this many particles exist (100+)
    #[arg(short = 'p', long = "max-particles")]
    max_particles: Option<usize>,

    /// Bounding-box padding / spawn band depth (1-50)
    #[arg(short = 'b', long = "bound-width")]
    bound_width: Option<usize>,

    /// Simulation steps per frame (1-50)
    #[arg(long)]
    speed: Option<usize>,

    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Load settings from a config file instead of the defaults
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn parse_mode(s: &str) -> SimulationMode {
    match s.to_lowercase().as_str() {
        "random" | "rand" => SimulationMode::Random,
        "determined-bound" | "determined" | "det" => SimulationMode::DeterminedBound,
        _ => SimulationMode::RandomBound,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::default(),
    };

    // Explicit CLI flags win over the config file.
    if let Some(mode) = &args.mode {
        config.settings.mode = parse_mode(mode);
    }
    if let Some(target) = args.target {
        config.settings.target_active = target;
    }
    if let Some(max_active) = args.max_active {
        config.settings.max_active = max_active.clamp(50, 2000);
    }
    if let Some(max_particles) = args.max_particles {
        config.settings.max_particles = max_particles.clamp(100, 1_000_000);
    }
    if let Some(bound_width) = args.bound_width {
        config.settings.bound_width = bound_width.clamp(1, 50);
    }
    if let Some(speed) = args.speed {
        config.steps_per_frame = speed.clamp(1, 50);
    }
    if args.seed.is_some() {
        config.settings.rng_seed = args.seed;
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Size the simulation domain from the terminal canvas
    let size = terminal.size()?;
    let frame_rect = ratatui::layout::Rect {
        x: 0,
        y: 0,
        width: size.width,
        height: size.height,
    };
    let (canvas_width, canvas_height) = ui::get_canvas_size(frame_rect);
    let app = App::new(
        canvas_width,
        canvas_height,
        config.settings,
        config.steps_per_frame,
    );

    let res = match app {
        Ok(mut app) => run_app(&mut terminal, &mut app).map_err(|e| e.to_string()),
        Err(e) => Err(e),
    };

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    // Target ~60fps for smooth animation
    const FRAME_DURATION: Duration = Duration::from_millis(16);

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(FRAME_DURATION)? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }

                    if key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        return Ok(());
                    }

                    match key.code {
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                        KeyCode::Char(' ') => app.toggle_pause(),
                        KeyCode::Char('r') | KeyCode::Char('R') => app.reset(),
                        KeyCode::Char('h') | KeyCode::Char('H') => app.toggle_help(),
                        KeyCode::Char('m') => app.cycle_mode(),
                        KeyCode::Char('M') => app.cycle_mode_prev(),
                        KeyCode::Char('s') | KeyCode::Char('S') => app.save_config(),
                        KeyCode::Char('[') => app.adjust_bound_width(-1),
                        KeyCode::Char(']') => app.adjust_bound_width(1),
                        KeyCode::Char('a') => app.adjust_max_active(50),
                        KeyCode::Char('A') => app.adjust_max_active(-50),
                        KeyCode::Char('p') => app.adjust_max_particles(1000),
                        KeyCode::Char('P') => app.adjust_max_particles(-1000),
                        KeyCode::Char('+') | KeyCode::Char('=') => app.increase_speed(),
                        KeyCode::Char('-') | KeyCode::Char('_') => app.decrease_speed(),
                        KeyCode::Esc => {
                            if app.show_help {
                                app.toggle_help();
                            }
                        }
                        _ => {}
                    }
                }
                Event::Resize(width, height) => {
                    let (canvas_width, canvas_height) = ui::get_canvas_size(ratatui::layout::Rect {
                        x: 0,
                        y: 0,
                        width,
                        height,
                    });
                    app.resize(canvas_width, canvas_height);
                }
                _ => {}
            }
        }

        app.tick();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode() {
        assert_eq!(parse_mode("random"), SimulationMode::Random);
        assert_eq!(parse_mode("rand"), SimulationMode::Random);
        assert_eq!(parse_mode("random-bound"), SimulationMode::RandomBound);
        assert_eq!(parse_mode("determined"), SimulationMode::DeterminedBound);
        assert_eq!(parse_mode("DETERMINED-BOUND"), SimulationMode::DeterminedBound);
        assert_eq!(parse_mode("gibberish"), SimulationMode::RandomBound);
    }
}
