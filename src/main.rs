//! Diagram Engine CLI
//!
//! Usage:
//!   diagram-engine [OPTIONS] <COMMAND>
//!
//! Commands:
//!   render     Render diagram metadata (JSON) to SVG
//!   validate   Check diagram metadata without rendering, reporting malformed
//!              blueprint expressions on stderr
//!   templates  List registered templates
//!   types      List canonical diagram types
//!   batch      Create diagrams from bulk-import rows (JSON array)

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde_json::json;

use diagram_engine::blueprint::check_expressions;
use diagram_engine::logging::init_logging;
use diagram_engine::metadata::specs_from_rows;
use diagram_engine::{
    DiagramFactory, DiagramMetadata, DiagramType, Engine, EngineConfig, ImportRow, Palette,
    VisibilityPolicy,
};

#[derive(Parser)]
#[command(name = "diagram-engine")]
#[command(about = "Parametric diagram rendering for educational content")]
struct Cli {
    /// Palette file (TOML format)
    #[arg(short, long, global = true)]
    palette: Option<PathBuf>,

    /// Report malformed visibility flags as errors
    #[arg(long, global = true)]
    strict: bool,

    /// Log level (trace|debug|info|warn|error|off)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log format (compact|pretty|json)
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render diagram metadata (reads stdin if no file is given)
    Render {
        input: Option<PathBuf>,

        /// Print a base64 data URI instead of markup
        #[arg(long)]
        data_uri: bool,

        /// Print the full result (markup, size, warnings) as JSON
        #[arg(long, conflicts_with = "data_uri")]
        json: bool,
    },
    /// Validate diagram metadata (reads stdin if no file is given)
    Validate { input: Option<PathBuf> },
    /// List registered templates
    Templates {
        /// Only templates in this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List canonical diagram types and their template ids
    Types,
    /// Create diagrams from a JSON array of import rows
    Batch { input: PathBuf },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log_level.as_deref(), cli.log_format.as_deref()) {
        eprintln!("Error initializing logging: {}", e);
        process::exit(1);
    }

    let palette = match &cli.palette {
        Some(path) => match Palette::from_file(path) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Error loading palette '{}': {}", path.display(), e);
                process::exit(1);
            }
        },
        None => Palette::default(),
    };

    let policy = if cli.strict {
        VisibilityPolicy::Strict
    } else {
        VisibilityPolicy::Lenient
    };
    let engine = Engine::new(
        EngineConfig::new()
            .with_palette(palette)
            .with_visibility_policy(policy),
    );

    match cli.command {
        Command::Render {
            input,
            data_uri,
            json,
        } => {
            let metadata: DiagramMetadata = read_json(input.as_deref());
            let result = engine.render(&metadata);
            for warning in &result.warnings {
                eprintln!("warning: {}", warning);
            }
            if json {
                print_json(&result);
            } else if result.is_empty() {
                eprintln!("Error: nothing was rendered");
                process::exit(1);
            } else if data_uri {
                println!("{}", result.to_data_uri().unwrap_or_default());
            } else {
                println!("{}", result.svg);
            }
        }
        Command::Validate { input } => {
            let metadata: DiagramMetadata = read_json(input.as_deref());
            let result = engine.validate(&metadata);
            print_json(&result);
            let issues = metadata
                .custom
                .as_ref()
                .map(check_expressions)
                .unwrap_or_default();
            for issue in &issues {
                eprintln!("{}", issue.report());
            }
            if !result.ok || !issues.is_empty() {
                process::exit(1);
            }
        }
        Command::Templates { category } => {
            let templates = match &category {
                Some(c) => engine.registry().by_category(c),
                None => engine.registry().all(),
            };
            for t in templates {
                println!("{:<40} {:<12} {}", t.id, t.category, t.title);
            }
        }
        Command::Types => {
            for ty in DiagramType::ALL {
                println!("{:<16} {}", ty.name(), ty.template_id());
            }
        }
        Command::Batch { input } => {
            let rows: Vec<ImportRow> = read_json(Some(&input));
            let mut report = Vec::new();
            let mut specs = Vec::new();
            let mut positions = Vec::new();

            for (index, spec) in specs_from_rows(rows).into_iter().enumerate() {
                match spec {
                    Ok(spec) => {
                        positions.push(index);
                        specs.push(spec);
                    }
                    Err(e) => report.push((index, json!({"row": index, "ok": false, "error": e.to_string()}))),
                }
            }

            let results = DiagramFactory::new(&engine).create_batch(&specs);
            for (index, result) in positions.into_iter().zip(results) {
                let entry = match result {
                    Ok(record) => json!({
                        "row": index,
                        "ok": true,
                        "title": record.title,
                        "warnings": record.warnings,
                    }),
                    Err(e) => json!({"row": index, "ok": false, "error": e.to_string()}),
                };
                report.push((index, entry));
            }

            report.sort_by_key(|(index, _)| *index);
            let failed = report.iter().filter(|(_, e)| e["ok"] == false).count();
            let entries: Vec<_> = report.into_iter().map(|(_, e)| e).collect();
            print_json(&entries);
            if failed > 0 {
                process::exit(1);
            }
        }
    }
}

fn read_json<T: DeserializeOwned>(path: Option<&Path>) -> T {
    let source = match path {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    process::exit(1);
                }
            }
        }
    };

    match serde_json::from_str(&source) {
        Ok(value) => value,
        Err(e) => {
            eprintln!("Error parsing JSON: {}", e);
            process::exit(1);
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
