use basket_core::persistence::{load_from_disk, load_json, ScoringSnapshot};
use basket_core::{BasketResult, BatchScorer, EvalConfig, Method, PredictionEngine};
use crossterm::style::Stylize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const USAGE: &str =
    "usage: basket_eval <snapshot> [--json] [--config <file>] [--method <gfreq|pfreq|wpfreq|gpfreq>]...";

struct Args {
    snapshot: PathBuf,
    json: bool,
    config: Option<PathBuf>,
    methods: Vec<Method>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}", message.red());
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn parse_args(mut raw: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut snapshot = None;
    let mut json = false;
    let mut config = None;
    let mut methods = Vec::new();

    while let Some(arg) = raw.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--config" => {
                let path = raw.next().ok_or("--config needs a file")?;
                config = Some(PathBuf::from(path));
            }
            "--method" => {
                let selector = raw.next().ok_or("--method needs a selector")?;
                methods.push(selector.parse::<Method>().map_err(|e| e.to_string())?);
            }
            s if s.starts_with("--") => return Err(format!("unknown flag {s}")),
            s => {
                if snapshot.replace(PathBuf::from(s)).is_some() {
                    return Err("only one snapshot may be given".to_string());
                }
            }
        }
    }

    Ok(Args {
        snapshot: snapshot.ok_or("missing snapshot path")?,
        json,
        config,
        methods,
    })
}

fn run(args: &Args) -> BasketResult<()> {
    let config = match &args.config {
        Some(path) => EvalConfig::from_json_file(path)?,
        None => EvalConfig::default(),
    };
    let snapshot: ScoringSnapshot = if args.json {
        load_json(&args.snapshot)?
    } else {
        load_from_disk(&args.snapshot)?
    };

    let methods = if args.methods.is_empty() {
        vec![config.method]
    } else {
        args.methods.clone()
    };
    let ratios = snapshot.ratios_or_derived(config.last_n);

    println!("{}", "Next-basket evaluation".bold());
    println!("---------------------------------------------------------------");
    println!(
        "rows: {}  metric: {}  threshold: {}",
        snapshot.ground_truth.len(),
        config.metric.name(),
        config
            .threshold
            .map_or_else(|| "none".to_string(), |t| t.to_string()),
    );

    for method in methods {
        let mut engine = PredictionEngine::new(&snapshot.frequencies, &snapshot.basket_sizes);
        if let Some(ratios) = &ratios {
            engine = engine.with_ratios(ratios);
        }
        let scorer = BatchScorer::new(engine, config.clone().with_method(method));
        let score = scorer.score(&snapshot.ground_truth)?;
        println!("  {} {}", format!("{method:<8}").cyan(), format!("{score:.4}").green());
    }

    Ok(())
}
