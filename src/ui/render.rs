use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::simulation::agent::TaskController;
use crate::simulation::scoring::score;
use crate::simulation::vacuum::Simulator;

/// One-line status: controller state, battery, steps, dirt, the score the
/// run would get if it stopped now and the size of the last route search.
#[must_use]
pub fn hud_text(sim: &Simulator, controller: &TaskController) -> String {
    let house = sim.house();
    let planner = controller.planner();
    let current = score(
        sim.steps(),
        sim.dirt_left(),
        sim.is_finished(),
        sim.in_dock(),
        house.max_steps,
    );
    format!(
        "{} | {} | Bat: {}/{} | Steps: {}/{} | Dirt: {} | Score: {} | Frontier: {} | Search: {}{} | q: quit",
        house.name,
        controller.state(),
        sim.battery(),
        house.max_battery,
        sim.steps(),
        house.max_steps,
        sim.dirt_left(),
        current,
        controller.knowledge().frontier_len(),
        planner.last_expansions(),
        if planner.last_used_fallback() { " (bfs)" } else { "" },
    )
}

pub fn draw_ui(f: &mut Frame, grid_lines: Vec<String>, hud_info: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // HUD
            Constraint::Min(0),    // Field
        ])
        .split(f.area());

    let hud = Paragraph::new(Span::styled(
        hud_info,
        Style::default().add_modifier(Modifier::REVERSED),
    ));
    f.render_widget(hud, chunks[0]);

    let text: Vec<Line> = grid_lines
        .into_iter()
        .map(|s| Line::from(Span::raw(s)))
        .collect();

    let field = Paragraph::new(text)
        .block(Block::default().borders(Borders::NONE))
        .style(Style::default().fg(Color::White).bg(Color::Black));

    f.render_widget(field, chunks[1]);
}
