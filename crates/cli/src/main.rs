#![deny(unsafe_code)]
//! CLI binary for the cellsim cellular automaton toolkit.
//!
//! Subcommands:
//! - `run <rule>`: simulate a rule, print its metrics and optionally write a
//!   history archive, a run report and a PNG snapshot
//! - `list`: print the registered rules
//! - `sweep`: measure all 256 elementary rules and write a CSV

mod error;
mod sweep;

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process;

use cellsim_core::run_spec::DEFAULT_WIDTH;
use cellsim_core::{Engine, GridSize, Registry, RuleSpec, RunSpec, StateKind, Xorshift64};
use cellsim_io::{save_history, snapshot, write_report, RunReport};
use cellsim_rules::{
    builtin_registry, configure, elementary, param_schema, reaction_diffusion, ELEMENTARY_FAMILY,
};
use clap::{Args, Parser, Subcommand};
use error::CliError;
use serde_json::{json, Value};
use sweep::{SweepConfig, WolframClass};
use tracing_subscriber::EnvFilter;

/// Extents used when neither `--size` nor `--config` is given to a 2-D rule.
const DEFAULT_PLANE: [usize; 2] = [50, 50];

#[derive(Parser)]
#[command(name = "cellsim", about = "Cellular automata simulator")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a rule for N steps.
    Run(RunArgs),
    /// List available rules.
    List,
    /// Measure every elementary rule and write a CSV of the results.
    Sweep {
        /// Cells per row.
        #[arg(short = 'W', long, default_value_t = DEFAULT_WIDTH)]
        width: usize,

        #[arg(short, long, default_value_t = 100)]
        steps: usize,

        /// Random starts per rule.
        #[arg(short, long, default_value_t = 5)]
        runs: usize,

        /// Base seed; each run gets its own offset.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// CSV path; stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Rule name (e.g. "rule_30", "game_of_life", "elementary").
    rule: Option<String>,

    /// Grid size: "101" for 1-D rules, "50x50" (HxW) for 2-D rules.
    #[arg(long)]
    size: Option<String>,

    #[arg(short, long)]
    steps: Option<usize>,

    /// PRNG seed; a fresh one is drawn and recorded when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Initial pattern: random, center_dot or zeros.
    #[arg(long)]
    init: Option<String>,

    /// moore or von_neumann.
    #[arg(long)]
    neighborhood: Option<String>,

    /// wrap or fixed.
    #[arg(long)]
    boundary: Option<String>,

    /// Rule parameters as a JSON object.
    #[arg(long)]
    params: Option<String>,

    /// RunSpec JSON file; other flags override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed reaction_diffusion with activator spots instead of noise.
    #[arg(long)]
    spots: bool,

    /// Write the history archive here.
    #[arg(long)]
    history: Option<PathBuf>,

    /// Write the run report here.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Write a PNG snapshot here.
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

fn input(e: impl std::fmt::Display) -> CliError {
    CliError::Input(e.to_string())
}

/// Parses "W" into a line or "HxW" into a plane.
fn parse_size(s: &str) -> Result<GridSize, CliError> {
    let dims = s
        .split(['x', 'X'])
        .map(|part| part.trim().parse::<usize>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| CliError::Input(format!("invalid --size '{s}': {e}")))?;
    GridSize::from_dims(&dims).map_err(input)
}

fn default_size(rule: &str, registry: &Registry) -> Vec<usize> {
    let dimensionality = registry
        .get(rule)
        .map(RuleSpec::dimensionality)
        .or_else(|_| configure(rule, &json!({})).map(|spec| spec.dimensionality()))
        .unwrap_or(1);
    if dimensionality == 2 {
        DEFAULT_PLANE.to_vec()
    } else {
        vec![DEFAULT_WIDTH]
    }
}

/// Merges `--config` with the command-line flags, flags winning.
fn run_spec_from_args(args: &RunArgs, registry: &Registry) -> Result<RunSpec, CliError> {
    let mut spec = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| CliError::Io(format!("cannot read {}: {e}", path.display())))?;
            let mut spec: RunSpec = serde_json::from_str(&text)
                .map_err(|e| CliError::Input(format!("invalid config {}: {e}", path.display())))?;
            if let Some(rule) = &args.rule {
                spec.rule = rule.clone();
            }
            spec
        }
        None => {
            let rule = args
                .rule
                .as_deref()
                .ok_or_else(|| CliError::Input("give a rule name or --config".into()))?;
            let mut spec = RunSpec::new(rule, GridSize::Line(DEFAULT_WIDTH));
            spec.size = default_size(rule, registry);
            spec
        }
    };

    if let Some(size) = &args.size {
        spec.size = parse_size(size)?.dims();
    }
    if let Some(steps) = args.steps {
        spec.steps = steps;
    }
    if let Some(seed) = args.seed {
        spec.seed = Some(seed);
    }
    if let Some(init) = &args.init {
        spec.init = init.parse().map_err(input)?;
    }
    if let Some(neighborhood) = &args.neighborhood {
        spec.neighborhood = neighborhood.parse().map_err(input)?;
    }
    if let Some(boundary) = &args.boundary {
        spec.boundary = boundary.parse().map_err(input)?;
    }
    if let Some(params) = &args.params {
        spec.params = serde_json::from_str(params)
            .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    }
    if spec.seed.is_none() {
        spec.seed = Some(Xorshift64::entropy_seed());
    }
    spec.validate().map_err(input)?;
    Ok(spec)
}

/// Registered default unless parameters are given or the name is only known
/// to [`configure`].
fn resolve_rule(spec: &RunSpec, registry: &Registry) -> Result<RuleSpec, CliError> {
    let has_params = spec.params.as_object().is_some_and(|m| !m.is_empty());
    if has_params || !registry.contains(&spec.rule) {
        Ok(configure(&spec.rule, &spec.params)?)
    } else {
        Ok(registry.get(&spec.rule)?.clone())
    }
}

fn format_metric(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.4}"))
}

fn execute_run(args: &RunArgs, json_mode: bool) -> Result<(), CliError> {
    let registry = builtin_registry()?;
    let spec = run_spec_from_args(args, &registry)?;
    let rule = resolve_rule(&spec, &registry)?;
    let mut engine = Engine::new(spec.engine_config()?, rule)?;

    if args.spots {
        if engine.rule().name() != reaction_diffusion::NAME {
            return Err(CliError::Input(format!(
                "--spots applies to {} only, not {}",
                reaction_diffusion::NAME,
                engine.rule().name()
            )));
        }
        let size = engine.config().size;
        let seed = engine.seed().unwrap_or_default();
        engine.seed_grid(reaction_diffusion::spot_grid(size, seed)?)?;
    }

    let model = engine.rule().name().to_string();
    tracing::info!(
        rule = %model,
        size = %engine.config().size,
        steps = spec.steps,
        seed = ?spec.seed,
        "running"
    );
    let history = engine.run(spec.steps)?;
    let report = RunReport::new(&model, engine.config(), spec.steps, &history);

    if let Some(path) = &args.history {
        save_history(path, &history, Some(&serde_json::to_value(&spec)?))?;
        tracing::info!(path = %path.display(), frames = history.len(), "wrote history");
    }
    if let Some(path) = &args.report {
        write_report(path, &report)?;
        tracing::info!(path = %path.display(), "wrote report");
    }
    if let Some(path) = &args.snapshot {
        snapshot::write_png(&history, path)?;
        tracing::info!(path = %path.display(), "wrote snapshot");
    }

    if json_mode {
        println!("{}", report.to_json_pretty()?);
    } else {
        let s = &report.summary;
        println!(
            "{model} ({}, {} steps, seed {})",
            engine.config().size,
            spec.steps,
            spec.seed.map_or_else(|| "none".to_string(), |seed| seed.to_string())
        );
        println!("  shape    {:?} {}", s.history_shape, s.dtype);
        println!("  entropy  {}", format_metric(s.entropy_mean));
        println!("  activity {}", format_metric(s.activity));
        println!("  symmetry {}", format_metric(s.symmetry));
        if let Some(notes) = &s.notes {
            println!("  note     {notes}");
        }
    }
    Ok(())
}

fn states_label(states: StateKind) -> String {
    match states {
        StateKind::Discrete { num_states } => format!("{num_states} states"),
        StateKind::Continuous { channels } => format!("{channels} channel(s)"),
    }
}

fn execute_list(json_mode: bool) -> Result<(), CliError> {
    let registry = builtin_registry()?;
    if json_mode {
        let rules: Vec<Value> = registry
            .iter()
            .map(|spec| {
                json!({
                    "name": spec.name(),
                    "dimensionality": spec.dimensionality(),
                    "states": states_label(spec.states()),
                    "needs_neighbors": spec.needs_neighbors(),
                    "description": spec.description(),
                    "params": param_schema(spec.name()),
                })
            })
            .collect();
        let info = json!({
            "rules": rules,
            "families": { ELEMENTARY_FAMILY: elementary::param_schema() },
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("Rules:");
        for spec in registry.iter() {
            println!(
                "  {:<22}{}-D  {:<14}{}",
                spec.name(),
                spec.dimensionality(),
                states_label(spec.states()),
                spec.description()
            );
        }
        println!("Families:");
        println!(
            "  {:<22}any rule_<n>, or --params '{{\"rule\": n}}'",
            ELEMENTARY_FAMILY
        );
    }
    Ok(())
}

fn execute_sweep(config: SweepConfig, output: Option<PathBuf>, json_mode: bool) -> Result<(), CliError> {
    if config.width == 0 || config.steps == 0 || config.runs == 0 {
        return Err(CliError::Input(
            "--width, --steps and --runs must all be at least 1".into(),
        ));
    }
    tracing::info!(width = config.width, steps = config.steps, runs = config.runs, "sweeping elementary rules");
    let records = sweep::sweep(&config)?;

    let Some(path) = output else {
        sweep::write_csv(io::stdout().lock(), &records)?;
        return Ok(());
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    sweep::write_csv(BufWriter::new(File::create(&path)?), &records)?;

    let count = |class: WolframClass| records.iter().filter(|r| r.class == class).count();
    let classes = [WolframClass::I, WolframClass::II, WolframClass::III, WolframClass::IV];
    if json_mode {
        let by_class: serde_json::Map<String, Value> = classes
            .iter()
            .map(|&c| (c.to_string(), json!(count(c))))
            .collect();
        let info = json!({
            "records": records.len(),
            "classes": by_class,
            "output": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        let summary: Vec<String> = classes
            .iter()
            .map(|&c| format!("{c}: {}", count(c)))
            .collect();
        eprintln!(
            "swept 256 rules x {} runs -> {} ({})",
            config.runs,
            path.display(),
            summary.join(", ")
        );
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Run(args) => execute_run(&args, cli.json),
        Command::List => execute_list(cli.json),
        Command::Sweep {
            width,
            steps,
            runs,
            seed,
            output,
        } => execute_sweep(
            SweepConfig {
                width,
                steps,
                runs,
                seed,
            },
            output,
            cli.json,
        ),
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cellsim=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
