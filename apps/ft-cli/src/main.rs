use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use ft_app::{
    AppResult, ExperimentKind, ExperimentParams, ExperimentResult, ExperimentRunner, Report,
    export_experiment, load_fuzzy_config, load_params, write_report_json,
};
use ft_controls::{Defuzzification, FuzzyController, FuzzySystem, hvac};

#[derive(Parser)]
#[command(name = "ft-cli")]
#[command(about = "fuzzytherm - fuzzy vs PID temperature control experiments", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one or all experiments and print their comparison tables
    Run {
        /// Experiment to run
        #[arg(value_enum)]
        experiment: Which,
        /// Parameter YAML file (defaults when omitted)
        #[arg(long)]
        params: Option<PathBuf>,
        /// Fuzzy system YAML file (built-in HVAC rule base when omitted)
        #[arg(long)]
        fuzzy: Option<PathBuf>,
        /// Directory for CSV series and the JSON report
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Print the effective parameters as YAML
    Params {
        #[arg(long)]
        params: Option<PathBuf>,
    },
    /// Print the fuzzy rule base
    Rules {
        #[arg(long)]
        fuzzy: Option<PathBuf>,
    },
    /// Print the fuzzy control surface as CSV
    Surface {
        /// Grid points per input axis
        #[arg(long, default_value_t = 11)]
        resolution: usize,
        /// Defuzzification method
        #[arg(long, default_value = "centroid")]
        method: Defuzzification,
        #[arg(long)]
        fuzzy: Option<PathBuf>,
    },
    /// Show fuzzification, rule strengths and every method's output
    Infer {
        /// Room temperature
        #[arg(allow_negative_numbers = true)]
        temperature: f64,
        /// Setpoint minus temperature
        #[arg(allow_negative_numbers = true)]
        error: f64,
        #[arg(long)]
        fuzzy: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Which {
    Basic,
    Disturbance,
    Defuzz,
    All,
}

impl Which {
    fn kinds(self) -> Vec<ExperimentKind> {
        match self {
            Which::Basic => vec![ExperimentKind::Basic],
            Which::Disturbance => vec![ExperimentKind::Disturbance],
            Which::Defuzz => vec![ExperimentKind::Defuzzification],
            Which::All => ExperimentKind::ALL.to_vec(),
        }
    }
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            experiment,
            params,
            fuzzy,
            out,
        } => cmd_run(experiment, params.as_deref(), fuzzy.as_deref(), out.as_deref()),
        Commands::Params { params } => cmd_params(params.as_deref()),
        Commands::Rules { fuzzy } => cmd_rules(fuzzy.as_deref()),
        Commands::Surface {
            resolution,
            method,
            fuzzy,
        } => cmd_surface(resolution, method, fuzzy.as_deref()),
        Commands::Infer {
            temperature,
            error,
            fuzzy,
        } => cmd_infer(temperature, error, fuzzy.as_deref()),
    }
}

fn params_or_default(path: Option<&Path>) -> AppResult<ExperimentParams> {
    match path {
        Some(path) => load_params(path),
        None => Ok(ExperimentParams::default()),
    }
}

fn fuzzy_system(path: Option<&Path>) -> AppResult<Arc<FuzzySystem>> {
    let config = match path {
        Some(path) => load_fuzzy_config(path)?,
        None => hvac::hvac_config()?,
    };
    Ok(Arc::new(FuzzySystem::new(config)?))
}

fn cmd_run(
    which: Which,
    params: Option<&Path>,
    fuzzy: Option<&Path>,
    out: Option<&Path>,
) -> AppResult<()> {
    let runner = ExperimentRunner::new(params_or_default(params)?, fuzzy_system(fuzzy)?)?;

    let mut results = Vec::new();
    for kind in which.kinds() {
        let result = runner.run(kind)?;
        print_result(&result);
        results.push(result);
    }

    if let Some(dir) = out {
        info!(dir = %dir.display(), "exporting results");
        for result in &results {
            for path in export_experiment(dir, result)? {
                println!("  wrote {}", path.display());
            }
        }
        let report_path = dir.join("report.json");
        write_report_json(&report_path, &Report::new(runner.params(), &results))?;
        println!("✓ Report written to {}", report_path.display());
    }
    Ok(())
}

fn print_result(result: &ExperimentResult) {
    println!();
    println!("== {} ==", result.experiment.title());
    for d in &result.disturbances {
        println!("  disturbance at t = {:.1}: {:?}", d.at, d.kind);
    }
    println!("{}", result.table);
    match result.table.overall_winner() {
        Some(winner) => println!("Overall: {winner}"),
        None => println!("Overall: tie"),
    }
}

fn cmd_params(path: Option<&Path>) -> AppResult<()> {
    let params = params_or_default(path)?;
    print!("{}", params.to_yaml_string()?);
    Ok(())
}

fn cmd_rules(fuzzy: Option<&Path>) -> AppResult<()> {
    let system = fuzzy_system(fuzzy)?;
    let rules = &system.config().rules;
    println!("{} rules:", rules.len());
    for (i, rule) in rules.iter().enumerate() {
        println!("{:>3}. {rule}", i + 1);
    }
    Ok(())
}

fn cmd_surface(resolution: usize, method: Defuzzification, fuzzy: Option<&Path>) -> AppResult<()> {
    let controller = FuzzyController::new(fuzzy_system(fuzzy)?, method);
    let surface = controller.control_surface(resolution)?;

    let header: Vec<String> = surface.temperatures.iter().map(|t| format!("{t:.2}")).collect();
    println!("error\\temperature,{}", header.join(","));
    for (error, row) in surface.errors.iter().zip(&surface.values) {
        let cells: Vec<String> = row.iter().map(|v| format!("{v:.3}")).collect();
        println!("{error:.2},{}", cells.join(","));
    }
    Ok(())
}

fn cmd_infer(temperature: f64, error: f64, fuzzy: Option<&Path>) -> AppResult<()> {
    let system = fuzzy_system(fuzzy)?;
    let config = system.config();
    let inference = system.infer(temperature, error);

    println!("temperature = {temperature}");
    for (name, mu) in config.temperature.set_names().zip(&inference.temperature_degrees) {
        println!("  {name:<16} {mu:.3}");
    }
    println!("error = {error}");
    for (name, mu) in config.error.set_names().zip(&inference.error_degrees) {
        println!("  {name:<16} {mu:.3}");
    }
    println!("power strengths:");
    for (name, s) in config.power.set_names().zip(&inference.strengths) {
        println!("  {name:<16} {s:.3}");
    }

    println!("outputs:");
    for method in [
        Defuzzification::Centroid,
        Defuzzification::Bisector,
        Defuzzification::MeanOfMaximum,
        Defuzzification::SmallestOfMaximum,
        Defuzzification::LargestOfMaximum,
    ] {
        let power = system.evaluate(temperature, error, method);
        println!("  {:<20} {power:.2}", method.name());
    }
    Ok(())
}
