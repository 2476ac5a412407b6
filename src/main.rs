//! StoryTool CLI entry point

mod vn;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use storytool::core::{ActivityFlag, GraphController, StoryGraph, StoryRunner, TaskRegistry};

#[derive(Parser)]
#[command(name = "storytool", version, about = "Branching story graph engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a story graph, repair its trigger links, and report
    Check {
        /// Path to the story graph YAML file
        graph: PathBuf,
        /// Write the repaired graph back to the file
        #[arg(long)]
        write: bool,
    },
    /// Execute a story graph with an interactive terminal host
    Run {
        /// Path to the story graph YAML file
        graph: PathBuf,
    },
    /// List the registered task kinds
    Kinds,
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let registry = registry();

    match cli.command {
        Command::Check { graph, write } => check(&graph, write, &registry),
        Command::Run { graph } => run(&graph, &registry),
        Command::Kinds => {
            for kind in registry.kinds() {
                println!("{}", kind);
            }
            Ok(())
        }
    }
}

/// Built-in kinds plus the visual-novel demo kinds.
fn registry() -> TaskRegistry {
    let mut registry = TaskRegistry::with_builtins();
    vn::register(&mut registry);
    registry
}

fn check(path: &Path, write: bool, registry: &TaskRegistry) -> Result<()> {
    let mut graph = StoryGraph::from_file(path, registry)?;
    log::info!("Loaded {} tasks, {} comments", graph.len(), graph.comments.len());

    let repaired = GraphController::new(&mut graph, registry).sync_trigger_links();
    if repaired == 0 {
        println!("{}: trigger links are consistent", path.display());
        return Ok(());
    }

    println!("{}: repaired {} trigger link(s)", path.display(), repaired);
    if write {
        graph.save(path, registry)?;
        log::info!("Wrote repaired graph to {}", path.display());
    } else {
        log::warn!("Re-run with --write to persist the repairs");
    }
    Ok(())
}

fn run(path: &Path, registry: &TaskRegistry) -> Result<()> {
    let mut graph = StoryGraph::from_file(path, registry)?;
    if let Some(metadata) = &graph.metadata {
        println!("== {} ==", metadata.story);
    }

    // Heal links before running so authoring leftovers cannot misfire.
    GraphController::new(&mut graph, registry).sync_trigger_links();

    let mut runner = StoryRunner::new(graph);
    runner.run()?;

    // Service tasks waiting on player input until the story settles.
    let stdin = std::io::stdin();
    while let Some(index) = waiting_task(&runner) {
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            log::warn!("Input closed while the story is still waiting");
            break;
        }
        let payload = match line.trim().parse::<u64>() {
            Ok(number) => serde_json::Value::from(number),
            Err(_) => serde_json::Value::Null,
        };
        runner.resume(index, payload)?;
    }

    println!();
    println!("Final task states:");
    for index in 0..runner.len() {
        println!(
            "  {:>3}  {:<20} {}",
            index,
            runner.kind(index).unwrap_or("?"),
            runner.activity(index).unwrap_or(ActivityFlag::Inactive)
        );
    }
    Ok(())
}

/// First task that is active and waiting on player input.
fn waiting_task(runner: &StoryRunner) -> Option<usize> {
    (0..runner.len()).find(|&index| {
        runner.activity(index) == Some(ActivityFlag::Active)
            && runner
                .kind(index)
                .is_some_and(|kind| vn::WAITING_KINDS.contains(&kind))
    })
}
