//! Budget Planner
//!
//! Command-line tool that compares the cost of keeping a small company's IT
//! on its own servers against colocation and public cloud scenarios.
//! Reports go to stdout, logs to stderr.

use clap::{Args, Parser, Subcommand, ValueEnum};
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{Environment, FromEnv};
use domain_budget::{
    CapacityStrategy, CostPolicy, InfraDrafter, KeywordDrafter, ScenarioBuilder, ScenarioCost,
    SchemaFormat, SchemaTarget, UnpricedMigration, infra_spec_to_yaml, parse_infra_spec,
    parse_pricing_catalog, samples, schema,
};
use eyre::{Result, WrapErr, bail};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

mod report;

#[derive(Parser)]
#[command(name = "budget-planner", version)]
#[command(about = "IT budget planner: on-prem vs colocation vs cloud scenarios")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an infrastructure description (and optionally a pricing file)
    Validate {
        infra: PathBuf,

        #[arg(short, long)]
        pricing: Option<PathBuf>,
    },

    /// Calculate and compare budget scenarios
    Plan {
        infra: PathBuf,
        pricing: PathBuf,

        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,

        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// Generate the owner report (markdown, in Russian)
    Report {
        infra: PathBuf,
        pricing: PathBuf,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// Write sample infra.yaml and pricing.yaml
    InitSample {
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Print the JSON Schema of an input document
    Schema {
        #[arg(short, long, default_value_t = SchemaTarget::Infra)]
        target: SchemaTarget,

        #[arg(short, long, default_value_t = SchemaFormat::Json)]
        format: SchemaFormat,
    },

    /// Draft an infrastructure description from free text
    Draft {
        text: String,

        /// Region for the company profile
        #[arg(short, long, default_value = "Moscow")]
        region: String,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Markdown,
    Json,
}

/// Command-line overrides for the cost policy loaded from the environment
#[derive(Args, Debug, Default, Clone)]
struct PolicyArgs {
    /// Metering hours per month
    #[arg(long)]
    hours_per_month: Option<u32>,

    /// Capex amortization horizon in months (0 disables amortization)
    #[arg(long)]
    amortization_months: Option<u32>,

    /// Cloud profile code used to price migrated workloads
    #[arg(long)]
    cloud_profile: Option<String>,

    /// Assumed monthly egress per migrated workload, GB
    #[arg(long)]
    migrated_egress_gb: Option<u32>,

    /// exclude | reduce
    #[arg(long)]
    unpriced_migration: Option<UnpricedMigration>,

    /// proportional_vcpu | retain_on_prem
    #[arg(long)]
    capacity_strategy: Option<CapacityStrategy>,
}

impl PolicyArgs {
    fn apply(self, mut policy: CostPolicy) -> Result<CostPolicy> {
        if let Some(hours) = self.hours_per_month {
            policy.hours_per_month = hours;
        }
        if let Some(months) = self.amortization_months {
            policy.amortization_months = months;
        }
        if let Some(profile) = self.cloud_profile {
            policy.default_cloud_profile = profile;
        }
        if let Some(egress) = self.migrated_egress_gb {
            policy.migrated_egress_gb = egress;
        }
        if let Some(unpriced) = self.unpriced_migration {
            policy.unpriced_migration = unpriced;
        }
        if let Some(strategy) = self.capacity_strategy {
            policy.capacity_strategy = strategy;
        }
        policy.ensure_valid()?;
        Ok(policy)
    }
}

fn main() -> Result<()> {
    install_color_eyre();

    let environment = Environment::from_env();
    init_tracing(&environment);

    let cli = Cli::parse();
    run(cli.command)
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Validate { infra, pricing } => {
            print!("{}", validate(&infra, pricing.as_deref())?);
        }

        Commands::Plan {
            infra,
            pricing,
            format,
            policy,
        } => {
            let scenarios = evaluate(&infra, &pricing, policy)?;
            let rendered = match format {
                OutputFormat::Table => report::plan_text(&scenarios),
                OutputFormat::Markdown => report::plan_markdown(&scenarios),
                OutputFormat::Json => serde_json::to_string_pretty(&scenarios)?,
            };
            println!("{rendered}");
        }

        Commands::Report {
            infra,
            pricing,
            output,
            policy,
        } => {
            let scenarios = evaluate(&infra, &pricing, policy)?;
            emit(&report::owner_report(&scenarios), output.as_deref())?;
        }

        Commands::InitSample { dir, force } => {
            let written = init_sample(&dir, force)?;
            for path in written {
                println!("Создан файл {}", path.display());
            }
        }

        Commands::Schema { target, format } => {
            println!("{}", schema::render_schema(target, format)?);
        }

        Commands::Draft {
            text,
            region,
            output,
        } => {
            let draft = KeywordDrafter::new(region).draft(&text);
            info!(workloads = draft.workloads.len(), "Drafted infrastructure");
            emit(&infra_spec_to_yaml(&draft)?, output.as_deref())?;
        }
    }

    Ok(())
}

/// Load both documents and evaluate every scenario
/// Load both inputs and summarize them. Consistency and duplicate-key
/// warnings are logged by the loader.
fn validate(infra: &Path, pricing: Option<&Path>) -> Result<String> {
    let spec = parse_infra_spec(infra)?;
    let mut summary = format!(
        "Конфигурация корректна: {} (нагрузок: {}, серверов: {})\n",
        infra.display(),
        spec.workloads.len(),
        spec.current_deployment.on_prem_servers.len()
    );
    if let Some(pricing) = pricing {
        parse_pricing_catalog(pricing)?;
        summary.push_str(&format!("Тарифы корректны: {}\n", pricing.display()));
    }
    Ok(summary)
}

fn evaluate(infra: &Path, pricing: &Path, overrides: PolicyArgs) -> Result<Vec<ScenarioCost>> {
    let policy = overrides.apply(CostPolicy::from_env()?)?;
    let spec = parse_infra_spec(infra)?;
    let catalog = parse_pricing_catalog(pricing)?;

    info!(
        company = %spec.company_profile.name,
        cloud_profile = %policy.default_cloud_profile,
        capacity_strategy = %policy.capacity_strategy,
        "Evaluating scenarios"
    );
    Ok(ScenarioBuilder::new(&spec, &catalog, policy).build_all())
}

/// Write to `output` when given, otherwise print
fn emit(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text).wrap_err_with(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "Report written");
            println!("Сохранено в {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

/// Write both sample documents into `dir`. Refuses to overwrite unless
/// `force` is set; nothing is written when any target already exists.
fn init_sample(dir: &Path, force: bool) -> Result<Vec<PathBuf>> {
    let files = [
        (samples::INFRA_FILE_NAME, samples::INFRA_YAML),
        (samples::PRICING_FILE_NAME, samples::PRICING_YAML),
    ];

    if !force {
        for (name, _) in &files {
            let path = dir.join(name);
            if path.exists() {
                bail!("{} already exists, use --force to overwrite", path.display());
            }
        }
    }

    fs::create_dir_all(dir).wrap_err_with(|| format!("Failed to create {}", dir.display()))?;

    let mut written = Vec::with_capacity(files.len());
    for (name, content) in files {
        let path = dir.join(name);
        fs::write(&path, content).wrap_err_with(|| format!("Failed to write {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}
