#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{ensure, Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::{backend::CrosstermBackend, Terminal};

use vacuum_explorer::harness::{run_all, BatchConfig};
use vacuum_explorer::logging;
use vacuum_explorer::simulation::params::{
    DEFAULT_THREADS, DEFAULT_TICK_MS, HOUSE_EXTENSION, RANDOM_DIRT_DENSITY,
    RANDOM_HOUSE_COLS, RANDOM_HOUSE_ROWS, RANDOM_WALL_DENSITY,
};
use vacuum_explorer::simulation::{AgentRegistry, Algorithm, House, Simulator, TaskController};
use vacuum_explorer::ui::{field::compute_field_grid, render::{draw_ui, hud_text}};

#[derive(Parser)]
#[command(name = "vacuum_explorer", version, about = "Autonomous vacuum cleaner simulator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every agent against every house file in a directory
    Run {
        /// Directory holding the `*.house` files
        #[arg(long, default_value = ".")]
        house_path: PathBuf,
        /// Restrict the batch to these agents (repeatable)
        #[arg(long = "agent")]
        agents: Vec<String>,
        #[arg(long, default_value_t = DEFAULT_THREADS)]
        num_threads: usize,
        /// Wall-clock limit per run, in milliseconds [default: one per budget step]
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Only write summary.csv, skip per-run reports
        #[arg(long)]
        summary_only: bool,
        /// Directory for reports and the summary
        #[arg(long, default_value = ".")]
        output: PathBuf,
    },
    /// Watch a single run in the terminal
    Watch {
        /// House file; a random house is generated when omitted
        house: Option<PathBuf>,
        /// Seed for the random house
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value_t = DEFAULT_TICK_MS)]
        tick_ms: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            house_path,
            agents,
            num_threads,
            timeout_ms,
            summary_only,
            output,
        } => {
            logging::init();
            let config = BatchConfig {
                threads: num_threads,
                timeout: timeout_ms.map(Duration::from_millis),
                report_dir: (!summary_only).then(|| output.clone()),
            };
            run_batch(&house_path, &agents, &config, &output)
        }
        // No stderr subscriber here: the alternate screen owns the terminal.
        Command::Watch { house, seed, tick_ms } => watch(house.as_deref(), seed, Duration::from_millis(tick_ms)),
    }
}

fn run_batch(house_path: &Path, agents: &[String], config: &BatchConfig, output: &Path) -> Result<()> {
    let houses = load_houses(house_path)?;
    ensure!(
        !houses.is_empty(),
        "no readable .{HOUSE_EXTENSION} files in {}",
        house_path.display()
    );

    let mut registry = AgentRegistry::with_builtin();
    if !agents.is_empty() {
        registry.retain_named(agents)?;
    }
    fs::create_dir_all(output).with_context(|| format!("creating {}", output.display()))?;

    let table = run_all(&houses, &registry, config)?;
    let summary = table
        .write_summary(output)
        .with_context(|| format!("writing summary into {}", output.display()))?;
    tracing::info!(path = %summary.display(), runs = table.len(), "summary written");
    print!("{}", table.to_csv());
    Ok(())
}

/// Loads every house file in `dir`, in name order. Bad files are logged and skipped.
fn load_houses(dir: &Path) -> Result<Vec<House>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("reading house directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == HOUSE_EXTENSION))
        .collect();
    paths.sort();

    Ok(paths
        .iter()
        .filter_map(|path| match House::load(path) {
            Ok(house) => Some(house),
            Err(err) => {
                tracing::error!(path = %path.display(), %err, "skipping house file");
                None
            }
        })
        .collect())
}

fn watch(house_file: Option<&Path>, seed: Option<u64>, tick_rate: Duration) -> Result<()> {
    let house = match house_file {
        Some(path) => House::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => {
            let seed = seed.unwrap_or_else(|| rand::rng().random());
            let mut rng = StdRng::seed_from_u64(seed);
            House::generate(
                &mut rng,
                RANDOM_HOUSE_ROWS,
                RANDOM_HOUSE_COLS,
                RANDOM_WALL_DENSITY,
                RANDOM_DIRT_DENSITY,
            )?
        }
    };
    let mut sim = Simulator::new(house);
    let mut controller = TaskController::default();
    controller.set_max_steps(sim.house().max_steps);

    // Setup Terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut sim, &mut controller, tick_rate);

    // Restore Terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    sim: &mut Simulator,
    controller: &mut TaskController,
    tick_rate: Duration,
) -> Result<()> {
    let mut last_tick = Instant::now();
    loop {
        // 1. Update
        if last_tick.elapsed() >= tick_rate {
            let running = !sim.is_finished() && !sim.is_dead();
            if running && sim.steps() < sim.house().max_steps {
                let action = controller.advance_one_tick(&*sim);
                sim.apply(action)?;
            }
            last_tick = Instant::now();
        }

        // 2. Render
        terminal.draw(|f| {
            let grid = compute_field_grid(&*sim, controller.knowledge());
            let hud = hud_text(&*sim, controller);
            draw_ui(f, grid, &hud);
        })?;

        // 3. Input
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.code == KeyCode::Char('q') {
                    return Ok(());
                }
            }
        }
    }
}
