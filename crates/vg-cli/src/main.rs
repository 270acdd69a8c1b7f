use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use vg_config::DashboardConfig;
use vg_formula::{FieldSchema, check_formula, compile_formula, describe_formula, parse, registry};
use vg_suggest::PatternMatcher;

mod schema_file;
mod tracing_init;

#[derive(Parser)]
#[command(name = "vigil", about = "Traffic-baseline formula engine")]
struct Cli {
    /// Path to vigil.toml config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and validate a formula against a field schema
    Check {
        formula: String,
        /// TOML file of [[field]] entries
        #[arg(short, long)]
        schema: Option<PathBuf>,
        /// Complexity budget override
        #[arg(short, long)]
        budget: Option<u32>,
    },
    /// Compile a formula and print the aggregation plan
    Compile {
        formula: String,
        #[arg(short, long)]
        schema: Option<PathBuf>,
    },
    /// Describe a formula in plain language
    Explain { formula: String },
    /// Suggest a formula for a natural-language query
    Suggest {
        query: String,
        /// Teach the matcher this formula for the query first
        #[arg(short, long)]
        learn: Option<String>,
    },
    /// List the builtin function registry
    Functions,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, base_dir) = match &cli.config {
        Some(path) => {
            let path = path
                .canonicalize()
                .map_err(|e| anyhow::anyhow!("config path '{}': {e}", path.display()))?;
            let config = DashboardConfig::load(&path)?;
            let base_dir = path
                .parent()
                .expect("config path must have a parent directory")
                .to_path_buf();
            (config, base_dir)
        }
        None => (DashboardConfig::default(), std::env::current_dir()?),
    };

    let _guard = tracing_init::init_tracing(&config.logging, &base_dir)?;
    tracing::debug!(domain = "cli", "vigil starting");

    match cli.command {
        Commands::Check {
            formula,
            schema,
            budget,
        } => {
            let schema = load_schema_or_empty(schema.as_deref())?;
            let budget = budget.or(config.editor.complexity_budget);

            let outcome = parse(&formula);
            let Some(ast) = outcome.ast else {
                for issue in &outcome.errors {
                    match issue.position {
                        Some(pos) => eprintln!("error: {} (at offset {})", issue.message, pos),
                        None => eprintln!("error: {}", issue.message),
                    }
                }
                std::process::exit(1);
            };

            let validation = check_formula(&ast, &schema, budget);
            for diag in &validation.results {
                eprintln!("{diag}");
            }
            println!("complexity: {}", validation.complexity);
            if !validation.valid {
                std::process::exit(1);
            }
            println!("ok");
        }
        Commands::Compile { formula, schema } => {
            let schema = load_schema_or_empty(schema.as_deref())?;
            let outcome = parse(&formula);
            let Some(ast) = outcome.ast else {
                for issue in &outcome.errors {
                    eprintln!("error: {}", issue.message);
                }
                std::process::exit(1);
            };
            match compile_formula(&ast, &schema) {
                Ok(plan) => println!("{plan:#?}"),
                Err(e) => {
                    eprintln!("error: {e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Explain { formula } => {
            println!("{}", describe_formula(&formula));
        }
        Commands::Suggest { query, learn } => {
            let mut matcher = PatternMatcher::new(config.suggest.cache_ttl.as_duration());
            if let Some(formula) = learn {
                matcher.learn_pattern(&query, &formula);
            }
            let suggestion = matcher.generate_formula(&query);
            println!(
                "{}  (confidence {:.2})",
                suggestion.formula, suggestion.confidence
            );
            for alt in &suggestion.alternatives {
                println!("  alt: {}  (confidence {:.2})", alt.formula, alt.confidence);
            }
        }
        Commands::Functions => {
            for spec in registry::FUNCTIONS {
                println!("{:<16} {:?}", spec.name, spec.category);
                println!("    {}", spec.description);
                for example in spec.examples {
                    println!("    e.g. {example}");
                }
            }
        }
    }

    Ok(())
}

fn load_schema_or_empty(path: Option<&std::path::Path>) -> Result<FieldSchema> {
    match path {
        Some(p) => schema_file::load_schema(p),
        None => Ok(FieldSchema::empty()),
    }
}
