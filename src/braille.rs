use crate::simulation::Simulation;
use ratatui::style::Color;

/// Braille character rendering for high-resolution terminal graphics.
/// Each Braille character represents a 2x4 grid of dots (8 dots total).
///
/// Unicode Braille patterns: U+2800 to U+28FF (256 patterns)
const BRAILLE_BASE: u32 = 0x2800;

/// Dot position to bit mapping for Braille characters
const BRAILLE_DOTS: [[u8; 4]; 2] = [
    [0x01, 0x02, 0x04, 0x40], // Left column (x=0): rows 0,1,2,3
    [0x08, 0x10, 0x20, 0x80], // Right column (x=1): rows 0,1,2,3
];

/// A single rendered Braille cell with position and color
#[derive(Clone, Copy)]
pub struct BrailleCell {
    pub x: u16,
    pub y: u16,
    pub char: char,
    pub color: Color,
}

/// Render the simulation to Braille characters. Settled particles keep
/// their own color; active walkers render dimmed so the aggregate stands
/// out from the moving dust around it.
pub fn render_to_braille(
    simulation: &Simulation,
    canvas_width: u16,
    canvas_height: u16,
) -> Vec<BrailleCell> {
    let sim_width = simulation.settings().width;
    let sim_height = simulation.settings().height;

    let braille_width = canvas_width as usize * 2;
    let braille_height = canvas_height as usize * 4;

    let scale_x = sim_width as f32 / braille_width as f32;
    let scale_y = sim_height as f32 / braille_height as f32;

    let mut cells = Vec::with_capacity((canvas_width * canvas_height) as usize);

    for cy in 0..canvas_height {
        for cx in 0..canvas_width {
            let mut pattern: u8 = 0;
            let mut settled_color: Option<Color> = None;
            let mut has_active = false;

            // Sample the 2x4 dots for this Braille character
            let base_bx = cx as usize * 2;
            let base_by = cy as usize * 4;

            for (dx, column) in BRAILLE_DOTS.iter().enumerate() {
                for (dy, bit) in column.iter().enumerate() {
                    let sim_x = ((base_bx + dx) as f32 * scale_x) as usize;
                    let sim_y = ((base_by + dy) as f32 * scale_y) as usize;

                    if let Some(particle) = simulation.particle_at(sim_x, sim_y) {
                        pattern |= bit;
                        if particle.active {
                            has_active = true;
                        } else {
                            let [r, g, b, _] = particle.color;
                            settled_color = Some(Color::Rgb(r, g, b));
                        }
                    }
                }
            }

            // Only emit cells that have at least one dot
            if pattern != 0 {
                let braille_char = char::from_u32(BRAILLE_BASE + pattern as u32).unwrap_or(' ');
                let color = match settled_color {
                    Some(c) => c,
                    None if has_active => Color::DarkGray,
                    None => Color::White,
                };
                cells.push(BrailleCell {
                    x: cx,
                    y: cy,
                    char: braille_char,
                    color,
                });
            }
        }
    }

    cells
}

/// Calculate the simulation grid size backing a given canvas size.
/// Braille gives 2x4 dots per character, so the grid matches that
/// resolution exactly (one cell per dot).
pub fn calculate_simulation_size(canvas_width: u16, canvas_height: u16) -> (usize, usize) {
    let width = (canvas_width as usize * 2).max(64);
    let height = (canvas_height as usize * 4).max(64);
    (width, height)
}
