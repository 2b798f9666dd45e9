// src/cli/commands.rs
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::{TaskError, TaskExecResult};
use crate::plan::{arithmetic, Operands, PlanNode};
use crate::report::RunReport;

#[derive(Parser, Debug)]
#[command(name = "taskexec")]
#[command(about = "Run series and parallel task plans", version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(long, global = true, help = "Log at debug level")]
    pub verbose: bool,

    #[arg(long, short, global = true, help = "Path to a settings file")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Execute a plan and print its run report
    Run {
        #[arg(help = "Path to the plan file (toml, json or yaml)")]
        plan: PathBuf,

        #[arg(long, help = "Delay in milliseconds before every worker call")]
        delay_ms: Option<u64>,

        #[arg(short, long, help = "Write the report to this file instead of stdout")]
        output: Option<PathBuf>,
    },

    /// Validate a plan without executing it
    Check {
        #[arg(help = "Path to the plan file")]
        plan: PathBuf,
    },

    /// List the workers plans can refer to
    Workers,

    /// Write the default settings file
    Init {
        #[arg(short, long, help = "Force overwrite existing settings")]
        force: bool,
    },

    /// Print the effective settings
    Settings,
}

pub async fn execute_command(command: &Commands, settings: &Settings) -> TaskExecResult<()> {
    match command {
        Commands::Run {
            plan,
            delay_ms,
            output,
        } => handle_run_command(plan, *delay_ms, output.as_deref(), settings).await,
        Commands::Check { plan } => handle_check_command(plan),
        Commands::Workers => {
            for name in arithmetic().names() {
                println!("{}", name);
            }
            Ok(())
        }
        Commands::Init { force } => {
            let path = Settings::init(*force)?;
            println!("Settings initialized at {}", path.display());
            Ok(())
        }
        Commands::Settings => {
            let rendered = toml::to_string_pretty(settings)
                .map_err(|e| TaskError::Config(format!("Failed to serialize settings: {}", e)))?;
            print!("{}", rendered);
            Ok(())
        }
    }
}

async fn handle_run_command(
    plan_path: &Path,
    delay_ms: Option<u64>,
    output: Option<&Path>,
    settings: &Settings,
) -> TaskExecResult<()> {
    let report = run_plan(plan_path, delay_ms, settings).await?;

    match output {
        Some(path) => report.save(path, settings.output.pretty),
        None => {
            println!("{}", report.to_json(settings.output.pretty)?);
            Ok(())
        }
    }
}

/// Load, build and execute the plan at `plan_path`
pub async fn run_plan(
    plan_path: &Path,
    delay_ms: Option<u64>,
    settings: &Settings,
) -> TaskExecResult<RunReport<f64>> {
    let plan = PlanNode::<Operands>::load(plan_path)?;

    let delay = Duration::from_millis(delay_ms.unwrap_or(settings.plan.default_delay_ms));
    debug!("Worker delay: {:?}", delay);

    let registry = arithmetic().with_delay(delay);
    let mut group = plan.build(&registry)?;
    RunReport::capture(&mut group).await
}

fn handle_check_command(plan_path: &Path) -> TaskExecResult<()> {
    let plan = PlanNode::<Operands>::load(plan_path)?;
    plan.build(&arithmetic())?;

    let stats = plan.stats();
    info!("Plan {} is valid", plan_path.display());
    println!("Plan OK: {} groups, {} tasks", stats.groups, stats.tasks);
    Ok(())
}
