#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that replays a scripted walk through a Cucumber World level.

mod script;

use std::{fs, path::PathBuf, thread, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use cucumber_world_core::{Event, GridPosition, InputState, TileDefinition, TransitionSpec};
use cucumber_world_explorer::{
    Clock, Collaborators, DirectorySource, ExplorerConfig, GridWorldExplorer, ManualClock,
    SystemClock,
};
use cucumber_world_world::{query, InteractiveObject};

use crate::script::Action;

/// Frames an action may take before the replay gives up waiting for a step.
const SETTLE_FRAME_LIMIT: usize = 10_000;

/// Replays keyboard input against a level and prints what happens.
#[derive(Debug, Parser)]
#[command(name = "cucumber-world", version, about)]
struct Cli {
    /// Asset directory holding `objects/tiles.json` and `worlds/`.
    #[arg(long, default_value = "assets")]
    root: PathBuf,
    /// World to explore.
    #[arg(long, default_value = "garden")]
    world: String,
    /// Level to load inside the world.
    #[arg(long, default_value = "vegetable_patch_grid")]
    level: String,
    /// TOML file with explorer settings.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed overriding the configured one.
    #[arg(long)]
    seed: Option<u64>,
    /// Walk script: `u`, `d`, `l`, `r` step, `i` interacts, `.` waits a frame.
    #[arg(long, default_value = "")]
    walk: String,
    /// Simulated frame length in milliseconds.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// Pace frames with the system clock instead of simulated time.
    #[arg(long)]
    realtime: bool,
    /// Print every world event instead of tile events only.
    #[arg(long)]
    verbose: bool,
}

/// Prints relayed tile events and remembers the latest transition.
#[derive(Debug, Default)]
struct Console {
    pending_transition: Option<TransitionSpec>,
}

impl Collaborators for Console {
    fn on_encounter(&mut self, kind: &str, tile: &TileDefinition, cell: GridPosition) {
        println!(
            "encounter: {kind} on {} at {cell}",
            tile.name.as_deref().unwrap_or("unnamed tile")
        );
    }

    fn on_interaction(
        &mut self,
        tile: &TileDefinition,
        cell: GridPosition,
        object: Option<&InteractiveObject>,
    ) {
        match object.and_then(InteractiveObject::text) {
            Some(text) => println!("interaction at {cell}: {text}"),
            None => println!(
                "interaction at {cell}: you examined the {}",
                tile.name.as_deref().unwrap_or("object")
            ),
        }
    }

    fn on_healing(&mut self) {
        println!("healing: your fruits have been healed");
    }

    fn on_transition(&mut self, transition: &TransitionSpec) {
        println!(
            "transition: world {} level {}",
            transition.world.as_deref().unwrap_or("(current)"),
            transition.level.as_deref().unwrap_or("(none)")
        );
        self.pending_transition = Some(transition.clone());
    }
}

/// Entry point for the Cucumber World command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_ref())?;
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    let actions = script::parse(&cli.walk).context("invalid walk script")?;
    tracing::info!(
        root = %cli.root.display(),
        world = cli.world.as_str(),
        level = cli.level.as_str(),
        actions = actions.len(),
        "starting replay"
    );

    if cli.realtime {
        run(&cli, config, &actions, SystemClock::new(), |frame| {
            thread::sleep(frame);
        })
    } else {
        let clock = ManualClock::new();
        let handle = clock.clone();
        run(&cli, config, &actions, clock, move |frame| handle.advance(frame))
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<ExplorerConfig> {
    let Some(path) = path else {
        return Ok(ExplorerConfig::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}

fn run<K, F>(
    cli: &Cli,
    config: ExplorerConfig,
    actions: &[Action],
    clock: K,
    mut pace: F,
) -> Result<()>
where
    K: Clock,
    F: FnMut(Duration),
{
    let source = DirectorySource::new(&cli.root);
    let frame = Duration::from_millis(cli.frame_ms);
    let mut explorer =
        GridWorldExplorer::load(&source, &cli.world, &cli.level, config, Console::default(), clock);

    let mut step = |explorer: &mut GridWorldExplorer<Console, K>, input: InputState| {
        pace(frame);
        explorer.update(&input);
        if cli.verbose {
            for event in explorer.frame_events() {
                println!("event: {}", describe(event));
            }
        }
        if let Some(transition) = explorer.collaborators_mut().pending_transition.take() {
            let _ = explorer.follow_transition(&source, &transition);
        }
    };

    for action in actions {
        match *action {
            Action::Step(direction) => {
                step(&mut explorer, InputState::holding(direction));
                let mut frames = 0;
                while query::player(explorer.world()).is_moving() && frames < SETTLE_FRAME_LIMIT {
                    step(&mut explorer, InputState::default());
                    frames += 1;
                }
            }
            Action::Interact => {
                step(&mut explorer, InputState::interacting());
                step(&mut explorer, InputState::default());
            }
            Action::Wait => step(&mut explorer, InputState::default()),
        }
    }

    let state = serde_json::to_string_pretty(&explorer.state())
        .context("failed to serialize explorer state")?;
    println!("{state}");
    Ok(())
}

fn describe(event: &Event) -> String {
    match event {
        Event::TimeAdvanced { dt } => format!("time advanced by {dt:?}"),
        Event::MovementStarted {
            direction,
            from,
            to,
        } => format!("moving {direction:?} from {from} to {to}"),
        Event::MovementQueued { direction } => format!("queued {direction:?}"),
        Event::MovementRejected { direction, reason } => {
            format!("rejected {direction:?}: {reason:?}")
        }
        Event::StepCompleted { cell, step_count } => format!("step {step_count} landed on {cell}"),
        Event::PlayerPlaced { cell } => format!("placed on {cell}"),
        Event::EncounterTriggered { kind, cell, .. } => format!("encounter {kind} at {cell}"),
        Event::InteractionTriggered { cell, .. } => format!("interaction at {cell}"),
        Event::HealingTriggered { cell } => format!("healing at {cell}"),
        Event::TransitionTriggered { cell, .. } => format!("transition at {cell}"),
    }
}
