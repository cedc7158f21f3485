//! postrender - inspect how a post body will be rendered

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use postrender::{RenderConfig, RenderInstruction, RenderOptions, parse_body};

#[derive(Parser)]
#[command(name = "postrender")]
#[command(version, about = "Inspect renderer decisions for a post body", long_about = None)]
#[command(after_help = "EXAMPLES:
    postrender post.html                 Print the render plan as JSON
    postrender -w 414 post.html          Plan for a 414px wide screen
    postrender --config post.html        Print the engine configuration
    cat post.html | postrender -         Read the body from stdin")]
struct Cli {
    /// HTML body file, or - for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Render options (JSON)
    #[arg(short, long, value_name = "FILE")]
    options: Option<PathBuf>,

    /// Content width in logical pixels (overrides the options file)
    #[arg(short, long)]
    width: Option<f32>,

    /// Print the engine configuration instead of the plan
    #[arg(long)]
    config: bool,

    /// Print a one-line summary per overridden node instead of JSON
    #[arg(short, long)]
    summary: bool,

    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn setup_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(&cli.log_level, cli.json_logs);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = match &cli.options {
        Some(path) => RenderOptions::load(path)?,
        None => RenderOptions::default(),
    };
    if let Some(width) = cli.width {
        options = options.with_content_width(width);
    }

    let config = RenderConfig::new(&options)?;
    if cli.config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let body = read_input(&cli.input)?;
    let tree = parse_body(&body);
    let plan = config.plan(&tree)?;

    if cli.summary {
        for planned in &plan.nodes {
            println!("{:>5}  {}", planned.node.0, describe(&planned.instruction));
        }
        println!("images: {}", plan.images.len());
    } else {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    }
    Ok(())
}

fn read_input(input: &str) -> std::io::Result<String> {
    if input == "-" {
        let mut body = String::new();
        std::io::stdin().read_to_string(&mut body)?;
        Ok(body)
    } else {
        std::fs::read_to_string(input)
    }
}

fn describe(instruction: &RenderInstruction) -> String {
    match instruction {
        RenderInstruction::AutoHeightImage { url, decision } => format!(
            "img   {:?} {:.1}px{} {url}",
            decision.kind,
            decision.resolved_width,
            if decision.is_anchored { " anchored" } else { "" }
        ),
        RenderInstruction::VideoThumb { uri, width } => {
            format!("video {width:.1}px {}", uri.as_deref().unwrap_or("(placeholder)"))
        }
        RenderInstruction::Anchor { link } => format!(
            "a     {:?} {}",
            link.link_type,
            link.href.as_deref().unwrap_or("")
        ),
        RenderInstruction::Paragraph { in_list_item, .. } => {
            format!("p     {}", if *in_list_item { "list item" } else { "default" })
        }
    }
}
