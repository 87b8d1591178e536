use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use aeroduel_shared::{MatchConfig, TICKS_PER_SEC};
use aeroduel_sim::{agents, run_match, ControlMode, DecisionAgent, Engine};

#[derive(Parser)]
#[command(name = "aeroduel", about = "Toroidal dogfight simulator CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a match with a decision agent flying the jet
    Run {
        /// Agent for the jet (noop, pursuit)
        #[arg(long, default_value = "pursuit")]
        jet: String,

        /// Optional scripted agent for the prop; it flies straight otherwise
        #[arg(long)]
        prop: Option<String>,

        /// Tick cap for undecided matches
        #[arg(long, default_value_t = aeroduel_shared::DEFAULT_MAX_TICKS)]
        max_ticks: u64,

        /// Pace at the real 25 ms tick with the background decision bridge
        /// instead of running headless at full speed
        #[arg(long)]
        realtime: bool,

        /// Output path for replay JSON (headless mode only)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Start the frame-streaming match server
    Serve {
        /// Port to listen on
        #[arg(long, default_value_t = 3001)]
        port: u16,
    },
}

/// Resolve an agent name or exit with the list of valid options.
fn resolve_agent(name: &str) -> Box<dyn DecisionAgent> {
    match agents::resolve(name) {
        Some(agent) => agent,
        None => {
            eprintln!(
                "Unknown agent '{}'. Valid options: {}.",
                name,
                agents::AGENT_NAMES.join(", ")
            );
            std::process::exit(1);
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            jet,
            prop,
            max_ticks,
            realtime,
            output,
        } => cmd_run(&jet, prop.as_deref(), max_ticks, realtime, output),

        Commands::Serve { port } => cmd_serve(port),
    }
}

fn cmd_run(jet: &str, prop: Option<&str>, max_ticks: u64, realtime: bool, output: Option<PathBuf>) {
    if realtime {
        let mut engine = Engine::new(ControlMode::SingleAgent);
        if let Err(e) = engine.register_agent(resolve_agent(jet)) {
            eprintln!("{e}");
            std::process::exit(1);
        }
        println!("Running real-time match: {jet} (cap {max_ticks} ticks)");
        let snap = engine.run(Some(max_ticks));
        println!();
        println!("=== Match Result ===");
        println!("Status:     {:?}", snap.status);
        println!("Reason:     {}", snap.reason.as_deref().unwrap_or("-"));
        println!(
            "Final tick: {} ({:.1}s)",
            snap.tick,
            snap.tick as f64 / TICKS_PER_SEC as f64
        );
        return;
    }

    let config = MatchConfig {
        jet_agent: jet.to_string(),
        prop_agent: prop.map(str::to_owned),
        max_ticks,
        ..Default::default()
    };
    let mut jet_agent = resolve_agent(jet);
    let mut prop_agent = prop.map(resolve_agent);

    println!(
        "Running match: {} vs {} (cap {} ticks)",
        jet,
        prop.unwrap_or("idle prop"),
        max_ticks
    );

    let replay = run_match(&config, jet_agent.as_mut(), prop_agent.as_deref_mut());
    let result = &replay.result;

    println!();
    println!("=== Match Result ===");
    println!("Status:     {:?}", result.status);
    println!("Reason:     {}", result.reason.as_deref().unwrap_or("-"));
    println!(
        "Final tick: {} ({:.1}s)",
        result.final_tick, result.elapsed_secs
    );
    println!("Shots:      {}", result.shots_fired);

    if let Some(path) = output {
        match serde_json::to_string_pretty(&replay) {
            Ok(json) => match std::fs::write(&path, json) {
                Ok(()) => println!("\nReplay written to {}", path.display()),
                Err(e) => eprintln!("\nFailed to write replay: {e}"),
            },
            Err(e) => eprintln!("\nFailed to serialize replay: {e}"),
        }
    }
}

fn cmd_serve(port: u16) {
    let rt = tokio::runtime::Runtime::new().expect("failed to create tokio runtime");
    rt.block_on(async {
        if let Err(e) = aeroduel_server::run_server(port).await {
            eprintln!("Server error: {e}");
            std::process::exit(1);
        }
    });
}
