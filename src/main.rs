use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use exit_ready::output;
use exit_ready::scenario::ScenarioDelta;
use exit_ready::{CompanyCase, Engine};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_OUTPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Args, Debug)]
struct DeltaArgs {
    /// Revenue change in percent (e.g. 15 or -10)
    #[arg(long, allow_hyphen_values = true, default_value_t = 0.0)]
    revenue_change: f64,

    /// COGS change in percent
    #[arg(long, allow_hyphen_values = true, default_value_t = 0.0)]
    cogs_change: f64,

    /// Operating expense change in percent
    #[arg(long, allow_hyphen_values = true, default_value_t = 0.0)]
    opex_change: f64,

    /// Add-backs to add (negative to remove)
    #[arg(long, allow_hyphen_values = true, default_value_t = 0.0)]
    addbacks: f64,

    /// Override recurring revenue percent
    #[arg(long)]
    recurring: Option<f64>,

    /// Override customer concentration percent
    #[arg(long)]
    concentration: Option<f64>,

    /// Override growth rate percent
    #[arg(long, allow_hyphen_values = true)]
    growth: Option<f64>,
}

impl From<DeltaArgs> for ScenarioDelta {
    fn from(args: DeltaArgs) -> Self {
        ScenarioDelta {
            revenue_change_pct: args.revenue_change,
            cogs_change_pct: args.cogs_change,
            opex_change_pct: args.opex_change,
            additional_addbacks: args.addbacks,
            recurring_revenue_pct: args.recurring,
            customer_concentration_pct: args.concentration,
            growth_rate_pct: args.growth,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate a company case file
    Evaluate {
        /// Path to the case YAML
        case: PathBuf,

        /// Also write the JSON report to this file
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Run one what-if against a case file's statement and profile
    Simulate {
        /// Path to the case YAML
        case: PathBuf,

        #[command(flatten)]
        delta: DeltaArgs,
    },
    /// List the configured industry multiple bands
    Bands {
        /// Only show bands for this industry category
        #[arg(long)]
        industry: Option<String>,
    },
    /// Validate the config file and exit
    CheckConfig,
}

#[derive(Parser, Debug)]
#[command(name = "exit-ready")]
#[command(about = "Business valuation and exit-readiness scoring", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/exit-ready/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Print JSON instead of the formatted report
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_case_or_exit(path: &Path) -> CompanyCase {
    match exit_ready::load_case(path) {
        Ok(case) => case,
        Err(e) => {
            eprintln!("Case error: {:#}", e);
            std::process::exit(EXIT_INPUT);
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize output: {}", e);
            std::process::exit(EXIT_OUTPUT);
        }
    }
}

fn fail_input(e: exit_ready::EngineError) -> ! {
    eprintln!("Input errors:");
    for message in e.messages() {
        eprintln!("  - {}", message);
    }
    std::process::exit(EXIT_INPUT);
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match exit_ready::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate config at startup
    let engine = match Engine::new(config) {
        Ok(engine) => engine,
        Err(errors) => {
            eprintln!("Config errors:");
            for error in errors {
                eprintln!("  - {}", error);
            }
            std::process::exit(EXIT_CONFIG);
        }
    };

    let use_colors = output::should_use_colors();

    match cli.command {
        Commands::Evaluate { case, out } => {
            let case = load_case_or_exit(&case);
            let report = match engine.evaluate_case(&case) {
                Ok(report) => report,
                Err(e) => fail_input(e),
            };

            if cli.json {
                print_json(&report);
            } else {
                println!("{}", output::format_report(&report, use_colors));
            }

            if let Some(out) = out {
                if let Err(e) = output::save_report(&out, &report) {
                    eprintln!("Output error: {:#}", e);
                    std::process::exit(EXIT_OUTPUT);
                }
                tracing::info!(path = %out.display(), "report saved");
            }
        }
        Commands::Simulate { case, delta } => {
            let case = load_case_or_exit(&case);
            let delta = ScenarioDelta::from(delta);
            let result = match engine.simulate(&case.statement, &case.profile, &delta) {
                Ok(result) => result,
                Err(e) => fail_input(e),
            };

            if cli.json {
                print_json(&result);
            } else {
                println!("{}", output::format_scenario(&result, use_colors));
            }
        }
        Commands::Bands { industry } => {
            let bands: Vec<_> = engine
                .bands()
                .iter()
                .filter(|b| industry.as_deref().is_none_or(|i| b.category == i))
                .collect();

            if cli.json {
                print_json(&bands);
            } else if bands.is_empty() {
                println!("No bands found.");
            } else {
                for band in bands {
                    let name = match &band.subcategory {
                        Some(sub) => format!("{} / {}", band.category, sub),
                        None => band.category.clone(),
                    };
                    println!(
                        "{:<36} {:<20} {:>7} - {:<7} {:.1}x - {:.1}x",
                        name,
                        band.size_band,
                        output::format_money(band.min_ebitda),
                        output::format_money(band.max_ebitda),
                        band.base_multiple,
                        band.high_multiple
                    );
                }
            }
        }
        Commands::CheckConfig => {
            println!(
                "Config OK: {} bands, {} readiness questions, {} goal questions, tie-break {}",
                engine.bands().len(),
                engine.readiness_questions().len(),
                engine.goal_questions().len(),
                engine.tie_break()
            );
        }
    }

    std::process::exit(EXIT_SUCCESS);
}
