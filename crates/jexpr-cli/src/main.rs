//! jexpr CLI entry point

use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use jexpr::{EvalError, Evaluator, Value};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Evaluate expressions written as JSON.
#[derive(Parser, Debug)]
#[command(name = "jexpr", version, about)]
struct Args {
    /// Expression to evaluate (read from stdin when absent)
    expr: Option<String>,

    /// Read the expression from a file
    #[arg(short, long, conflicts_with = "expr")]
    file: Option<PathBuf>,

    /// Evaluate in suspending mode and enable the `sleep` builtin
    #[arg(long = "async")]
    suspending: bool,

    /// Symbol prefix
    #[arg(long, default_value_t = '$')]
    prefix: char,

    /// Bind NAME to a JSON value before evaluating
    #[arg(short = 'D', long = "define", value_name = "NAME=JSON", value_parser = parse_binding)]
    defines: Vec<(String, serde_json::Value)>,

    /// Start an interactive session
    #[arg(long, conflicts_with_all = ["expr", "file"])]
    repl: bool,
}

fn parse_binding(s: &str) -> std::result::Result<(String, serde_json::Value), String> {
    let (name, json) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=JSON, got `{}`", s))?;
    if name.is_empty() {
        return Err("binding name is empty".to_string());
    }
    let value = serde_json::from_str(json).map_err(|e| format!("invalid JSON for {}: {}", name, e))?;
    Ok((name.to_string(), value))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let evaluator = build_evaluator(&args);
    info!(version = jexpr::VERSION, prefix = %args.prefix, suspending = args.suspending, "jexpr");

    if args.repl {
        return repl(&evaluator, args.suspending).await;
    }

    let source = read_source(&args)?;
    let expr = parse(&source)?;
    let value = run(&evaluator, &expr, args.suspending).await?;
    println!("{}", render(&value));
    Ok(())
}

fn build_evaluator(args: &Args) -> Evaluator {
    let mut builder = Evaluator::builder().prefix(args.prefix).bindings(
        args.defines
            .iter()
            .map(|(name, json)| (name.clone(), Value::from(json.clone()))),
    );
    if args.suspending {
        builder = builder.binding("sleep", sleep_builtin());
    }
    builder.build()
}

/// `sleep(ms, value)` resolves to `value` after `ms` milliseconds.
fn sleep_builtin() -> Value {
    Value::async_builtin("sleep", 2, |args: Vec<Value>| async move {
        let ms = args[0]
            .as_i64()
            .and_then(|ms| u64::try_from(ms).ok())
            .ok_or_else(|| EvalError::type_error("non-negative milliseconds", args[0].type_name()))?;
        tokio::time::sleep(Duration::from_millis(ms)).await;
        Ok(args[1].clone())
    })
}

fn read_source(args: &Args) -> Result<String> {
    if let Some(expr) = &args.expr {
        return Ok(expr.clone());
    }
    if let Some(path) = &args.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()));
    }
    let mut source = String::new();
    std::io::stdin()
        .read_to_string(&mut source)
        .context("Failed to read expression from stdin")?;
    Ok(source)
}

fn parse(source: &str) -> Result<Value> {
    let json: serde_json::Value =
        serde_json::from_str(source).context("Expression is not valid JSON")?;
    Ok(Value::from(json))
}

async fn run(evaluator: &Evaluator, expr: &Value, suspending: bool) -> Result<Value> {
    let result = if suspending {
        evaluator.evaluate_async(expr).await
    } else {
        evaluator.evaluate(expr)
    };
    Ok(result?)
}

/// JSON when the value has a JSON form, the display form otherwise.
fn render(value: &Value) -> String {
    value
        .to_json()
        .ok()
        .and_then(|json| serde_json::to_string_pretty(&json).ok())
        .unwrap_or_else(|| value.to_string())
}

// ═══════════════════════════════════════════════════════════════════════
// REPL
// ═══════════════════════════════════════════════════════════════════════

async fn repl(evaluator: &Evaluator, suspending: bool) -> Result<()> {
    let mut rl = DefaultEditor::new().context("Failed to start line editor")?;
    println!("jexpr {} (one JSON expression per line, Ctrl-D to exit)", jexpr::VERSION);

    loop {
        match rl.readline("jexpr> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                match parse(line) {
                    Ok(expr) => match run(evaluator, &expr, suspending).await {
                        Ok(value) => println!("{}", render(&value)),
                        Err(e) => println!("Error: {}", e),
                    },
                    Err(e) => println!("Error: {:#}", e),
                }
            }
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => {
                debug!("repl closed");
                break;
            }
            Err(e) => bail!("Line editor failed: {}", e),
        }
    }

    Ok(())
}
