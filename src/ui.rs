use crate::app::App;
use crate::braille;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 24;

// UI color scheme
const BORDER_COLOR: Color = Color::Cyan;
const HIGHLIGHT_COLOR: Color = Color::Yellow;
const TEXT_COLOR: Color = Color::White;
const DIM_TEXT_COLOR: Color = Color::Gray;

/// Creates a standard styled block with rounded borders
fn styled_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(title)
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(area);

    render_sidebar(frame, layout[0], app);
    render_canvas(frame, layout[1], app);

    if app.show_help {
        render_help_overlay(frame, area);
    }
}

/// Calculate the canvas size (excluding borders)
pub fn get_canvas_size(frame_area: Rect) -> (u16, u16) {
    let canvas_width = frame_area.width.saturating_sub(SIDEBAR_WIDTH + 2);
    let canvas_height = frame_area.height.saturating_sub(2);
    (canvas_width, canvas_height)
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),  // Status
            Constraint::Length(9),  // Parameters
            Constraint::Min(8),     // Controls
        ])
        .split(area);

    render_status_box(frame, sections[0], app);
    render_params_box(frame, sections[1], app);
    render_controls_box(frame, sections[2], app);
}

fn render_status_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Fractal Walkers ");
    let sim = &app.simulation;

    let progress = sim.progress();
    let progress_width = (area.width.saturating_sub(4)) as usize;
    let filled = (progress * progress_width as f64) as usize;
    let empty = progress_width.saturating_sub(filled);

    let (status_text, status_color) = if app.paused {
        ("PAUSED", HIGHLIGHT_COLOR)
    } else if sim.is_complete() {
        ("COMPLETE", Color::Green)
    } else {
        ("RUNNING", BORDER_COLOR)
    };

    let content = vec![
        Line::from(Span::styled(
            format!("{} / {}", sim.total_particles(), sim.settings().max_particles),
            Style::default().fg(TEXT_COLOR),
        )),
        Line::from(vec![
            Span::styled("█".repeat(filled), Style::default().fg(Color::Green)),
            Span::styled("░".repeat(empty), Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(Span::styled(status_text, Style::default().fg(status_color))),
        Line::from(Span::styled(
            app.status.clone().unwrap_or_default(),
            Style::default().fg(DIM_TEXT_COLOR),
        )),
    ];

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn render_params_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Simulation ");
    let sim = &app.simulation;

    let make_line = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{:>8}: ", label), Style::default().fg(DIM_TEXT_COLOR)),
            Span::styled(value, Style::default().fg(TEXT_COLOR)),
        ])
    };

    let mut content = vec![
        make_line("Mode", sim.settings().mode.name().to_string()),
        make_line(
            "Active",
            format!("{} / {}", sim.active_count(), sim.target_active()),
        ),
        make_line("Settled", format!("{}", sim.settled_particles())),
        make_line("Steps", format!("{}", sim.steps())),
    ];
    // Random mode never tracks the box, so the init-time values would
    // just go stale on screen.
    if sim.settings().mode.use_bounds() {
        let bounds = sim.bounds();
        content.push(make_line(
            "Bounds",
            format!(
                "{}..{} {}..{}",
                bounds.min_x, bounds.max_x, bounds.min_y, bounds.max_y
            ),
        ));
        content.push(make_line("Band", format!("{}", sim.settings().bound_width)));
    }
    content.push(make_line("Speed", format!("{} step/frame", app.steps_per_frame)));

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn render_controls_box(frame: &mut Frame, area: Rect, app: &App) {
    let key_style = Style::default().fg(HIGHLIGHT_COLOR);
    let desc_style = Style::default().fg(DIM_TEXT_COLOR);

    let make_control = |key: &str, desc: String| -> Line<'_> {
        Line::from(vec![
            Span::styled(format!("{:>5}", key), key_style),
            Span::styled(format!(" {}", desc), desc_style),
        ])
    };

    let content = vec![
        make_control("Space", "pause/resume".to_string()),
        make_control("M", format!("mode: {}", app.settings.mode.name())),
        make_control("[/]", "bound width".to_string()),
        make_control("a/A", format!("max active: {}", app.settings.max_active)),
        make_control("p/P", format!("max total: {}", app.settings.max_particles)),
        make_control("+/-", "speed".to_string()),
        make_control("R", "reset".to_string()),
        make_control("S", "save config".to_string()),
        make_control("H", "help".to_string()),
        make_control("Q", "quit".to_string()),
    ];

    let block = styled_block(" Controls ");
    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn render_canvas(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block("");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cells = braille::render_to_braille(&app.simulation, inner.width, inner.height);

    for cell in cells {
        let x = inner.x + cell.x;
        let y = inner.y + cell.y;

        if x < inner.x + inner.width && y < inner.y + inner.height {
            let cell_rect = Rect {
                x,
                y,
                width: 1,
                height: 1,
            };
            let span = Span::styled(cell.char.to_string(), Style::default().fg(cell.color));
            let paragraph = Paragraph::new(Line::from(span));
            frame.render_widget(paragraph, cell_rect);
        }
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let canvas_width = area.width.saturating_sub(SIDEBAR_WIDTH);
    let help_width = 52.min(canvas_width.saturating_sub(4));
    let help_height = area.height.saturating_sub(4).min(22);
    let x = SIDEBAR_WIDTH + (canvas_width.saturating_sub(help_width)) / 2;
    let y = (area.height.saturating_sub(help_height)) / 2;

    let help_area = Rect {
        x: area.x + x,
        y: area.y + y,
        width: help_width,
        height: help_height,
    };

    frame.render_widget(Clear, help_area);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "DIFFUSION-LIMITED AGGREGATION",
            Style::default().fg(BORDER_COLOR),
        )),
        Line::from(""),
        Line::from("Walkers drift randomly until they touch the frozen structure, then stick and extend it."),
        Line::from(""),
        Line::from(Span::styled("M - Simulation Mode", Style::default().fg(TEXT_COLOR))),
        Line::from("Random: walkers spawn anywhere, fixed population"),
        Line::from("Random bound: walkers spawn near the structure's bounding box; population follows box area"),
        Line::from("Determined bound: as above, but each walker keeps one direction until it deadlocks"),
        Line::from(""),
        Line::from(Span::styled("[/] - Bound Width", Style::default().fg(TEXT_COLOR))),
        Line::from("Padding around the structure; also the depth of the spawn band at the box edge"),
        Line::from(""),
        Line::from(Span::styled("BASIC CONTROLS:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Space=Pause, R=Reset, S=Save config, +/-=Speed, Q=Quit"),
        Line::from(""),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(HIGHLIGHT_COLOR))
        .title(" Help (H to close) ");

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, help_area);
}
