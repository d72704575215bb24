//! Command-line access to the built-in value functions
//!
//! Lists the registered overloads and evaluates a function on JSON literals.

use annotrule::{Arg, EngineConfig, FunctionEngine, Value};
use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use log::{LevelFilter, debug};

#[derive(Parser)]
#[command(name = "annotrule")]
#[command(about = "Inspect and evaluate annotation-rule value functions")]
#[command(version)]
struct Cli {
    /// Log resolution details to stderr (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON engine configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every registered overload with its signature
    Functions {
        /// Print full documentation as JSON
        #[arg(long)]
        json: bool,
    },
    /// Call a function on JSON arguments
    ///
    /// Each argument is a JSON literal. `@absent` passes an absent argument,
    /// `@regex:PATTERN` a string pattern and `@fn:NAME` a registered function.
    Call {
        /// Function name
        name: String,
        /// Arguments
        args: Vec<String>,
        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,
    },
}

fn main() -> Result<()> {
    human_panic::setup_panic!();

    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("loading configuration from '{path}'"))?,
        None => EngineConfig::default(),
    };
    if cli.verbose > 0 {
        config.log_resolution = true;
    }
    let engine = FunctionEngine::new().with_config(config);

    match cli.command {
        Commands::Functions { json } => list_functions(&engine, json),
        Commands::Call { name, args, pretty } => call(&engine, &name, &args, pretty),
    }
}

fn list_functions(engine: &FunctionEngine, json: bool) -> Result<()> {
    let registry = engine.registry();
    if json {
        println!("{}", registry.generate_docs_json()?);
        return Ok(());
    }
    for name in registry.names() {
        for function in registry.candidates(name).unwrap_or_default() {
            println!("{name:<12} {}", function.signature());
        }
    }
    Ok(())
}

fn parse_arg(engine: &FunctionEngine, raw: &str) -> Result<Arg> {
    if raw == "@absent" {
        return Ok(None);
    }
    if let Some(pattern) = raw.strip_prefix("@regex:") {
        return Ok(Some(Value::regex(pattern)));
    }
    if let Some(name) = raw.strip_prefix("@fn:") {
        return engine
            .registry()
            .function_value(name)
            .map(Some)
            .ok_or_else(|| anyhow!("unknown function '{name}'"));
    }
    let json: serde_json::Value =
        serde_json::from_str(raw).with_context(|| format!("argument '{raw}' is not valid JSON"))?;
    Ok(Some(Value::from_json(&json)))
}

fn call(engine: &FunctionEngine, name: &str, raw_args: &[String], pretty: bool) -> Result<()> {
    let args = raw_args
        .iter()
        .map(|raw| parse_arg(engine, raw))
        .collect::<Result<Vec<_>>>()?;
    debug!("calling {name} with {} arguments", args.len());

    let env = engine.create_env();
    let result = engine.evaluate(name, &env, &args)?;
    let json = result.map_or(serde_json::Value::Null, |v| v.to_json());
    let output = if pretty {
        serde_json::to_string_pretty(&json)?
    } else {
        serde_json::to_string(&json)?
    };
    println!("{output}");
    Ok(())
}
