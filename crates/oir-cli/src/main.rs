use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use oir_core::config::{self, CONFIG_FILE_NAME, ConvertOptions, OirConfig};
use oir_core::generator::generator_exec_config;
use oir_core::ir::{IrOpenApiFile, IrRequest, IrSchema};
use oir_core::parse::{self, document::OpenApiDocument};
use oir_core::transform::{self, get_reference_occurrences};

#[derive(Parser)]
#[command(name = "oir", about = "OpenAPI 3.x to IR converter", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an OpenAPI document and write the IR as JSON
    Generate {
        /// Path to the OpenAPI document (YAML or JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Where to write the IR
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check that a document converts, printing any warnings
    Validate {
        /// Path to the OpenAPI document
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print a summary of the converted IR
    Inspect {
        /// Path to the OpenAPI document
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Count `$ref` occurrences after content conflicts are resolved
    References {
        /// Path to the OpenAPI document
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print the config each configured generator would be invoked with
    Plan {
        /// Snippet file to mount for GitHub outputs
        #[arg(long)]
        snippet: Option<PathBuf>,
    },

    /// Initialize a new oir configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { input, output } => cmd_generate(input, output),

        Commands::Validate { input } => cmd_validate(input),

        Commands::Inspect { input, format } => cmd_inspect(input, format),

        Commands::References { input } => cmd_references(input),

        Commands::Plan { snippet } => cmd_plan(snippet),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "oir", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<OirConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))
}

fn load_document(path: &Path) -> Result<OpenApiDocument> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");

    let parsed = match ext {
        "json" => parse::from_json(&content)?,
        _ => parse::from_yaml(&content)?,
    };
    Ok(parsed)
}

fn convert(path: &Path, options: &ConvertOptions) -> Result<IrOpenApiFile> {
    let document = load_document(path)?;
    let ir = transform::generate_ir_with_options(&document, options)
        .with_context(|| format!("failed to convert {}", path.display()))?;
    for error in &ir.errors {
        log::warn!("{error}");
    }
    Ok(ir)
}

fn cmd_generate(input: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let input = input.unwrap_or_else(|| PathBuf::from(&cfg.input));
    let output = output.unwrap_or_else(|| PathBuf::from(&cfg.output));
    let ir = convert(&input, &cfg.conversion)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(&ir)?;
    fs::write(&output, json).with_context(|| format!("failed to write {}", output.display()))?;

    eprintln!(
        "Wrote {} ({} endpoints, {} schemas, {} warnings)",
        output.display(),
        ir.endpoints.len(),
        ir.schemas.len(),
        ir.errors.len()
    );
    Ok(())
}

fn cmd_validate(input: PathBuf) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let document = load_document(&input)?;

    eprintln!("Valid OpenAPI {} document", document.openapi);
    eprintln!("  Paths: {}", document.paths.len());
    if let Some(ref components) = document.components {
        eprintln!("  Schemas: {}", components.schemas.len());
    }

    let ir = transform::generate_ir_with_options(&document, &cfg.conversion)?;
    eprintln!("  Title: {}", ir.title);
    eprintln!("  Endpoints: {}", ir.endpoints.len());
    eprintln!("  Webhooks: {}", ir.webhooks.len());
    eprintln!("  IR Schemas: {}", ir.schemas.len());

    if ir.errors.is_empty() {
        eprintln!("Validation successful.");
    } else {
        for error in &ir.errors {
            eprintln!("  warning: {error}");
        }
        eprintln!("Validation finished with {} warnings.", ir.errors.len());
    }
    Ok(())
}

fn cmd_inspect(input: PathBuf, format: InspectFormat) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let ir = convert(&input, &cfg.conversion)?;

    let summary = build_inspect_summary(&ir);

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn build_inspect_summary(ir: &IrOpenApiFile) -> serde_json::Value {
    let schemas: Vec<serde_json::Value> = ir
        .schemas
        .iter()
        .map(|(id, schema)| {
            serde_json::json!({
                "id": id,
                "kind": match schema {
                    IrSchema::Object(_) => "object",
                    IrSchema::Union(_) => "union",
                    IrSchema::Enum(_) => "enum",
                    IrSchema::Primitive(_) => "primitive",
                    IrSchema::Array(_) => "array",
                    IrSchema::Map(_) => "map",
                    IrSchema::Reference(_) => "reference",
                    IrSchema::Unknown(_) => "unknown",
                },
            })
        })
        .collect();

    let endpoints: Vec<serde_json::Value> = ir
        .endpoints
        .iter()
        .map(|endpoint| {
            serde_json::json!({
                "name": endpoint.name.camel_case,
                "method": endpoint.method.as_str(),
                "path": endpoint.path,
                "authed": endpoint.authed,
                "request": endpoint.request.as_ref().map(|request| match request {
                    IrRequest::Json { .. } => "json",
                    IrRequest::Multipart { .. } => "multipart",
                    IrRequest::Bytes { .. } => "bytes",
                }),
                "tags": endpoint.tags,
            })
        })
        .collect();

    serde_json::json!({
        "title": ir.title,
        "schemas": schemas,
        "endpoints": endpoints,
        "webhooks": ir.webhooks.iter().map(|w| &w.name.camel_case).collect::<Vec<_>>(),
        "securitySchemes": ir.security_schemes.keys().collect::<Vec<_>>(),
        "warnings": ir.errors.len(),
    })
}

fn cmd_references(input: PathBuf) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let document = load_document(&input)?;
    let occurrences =
        get_reference_occurrences(&document, cfg.conversion.content_conflict_policy)?;
    println!("{}", serde_json::to_string_pretty(&occurrences)?);
    Ok(())
}

fn cmd_plan(snippet: Option<PathBuf>) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();

    if cfg.generators.is_empty() {
        eprintln!("No generators configured. Add a `generators` section to your config.");
        return Ok(());
    }

    let mut plans = Vec::with_capacity(cfg.generators.len());
    for invocation in &cfg.generators {
        let plan = generator_exec_config(
            invocation,
            &cfg.workspace,
            &cfg.organization,
            snippet.as_deref(),
        )?;
        plans.push(serde_json::json!({
            "generator": format!("{}:{}", invocation.name, invocation.version),
            "config": plan.config,
            "binds": plan.binds,
        }));
    }
    println!("{}", serde_json::to_string_pretty(&plans)?);
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
