//! `snowstorm`: inspect the particle editor inputs, apply edits and check snapshot
//! documents from the command line.

use std::fmt::Write as FmtWrite;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use serde_json::{Value, json};
use tracing::{debug, info, warn};
use tracing_subscriber::filter::LevelFilter;

use snowstorm_schema::{
    DocumentFormat, Editor, FieldPath, InputRegistry, OutputDestination, OutputOptions,
    RegistryOptions, ValidationOutcome, build_registry, emit, read_document, read_layout,
    snapshot_schema, validate_snapshot,
};

#[derive(Debug, Parser)]
#[command(
    name = "snowstorm",
    version,
    about = "Inspect and edit Bedrock particle editor inputs"
)]
struct Cli {
    /// Layout file to use instead of the built-in particle editor layout
    #[arg(short = 'l', long = "layout", value_name = "FILE", global = true)]
    layout: Option<PathBuf>,

    /// Behave like an embedded host: image inputs never offer uploads
    #[arg(long = "embedded", global = true)]
    embedded: bool,

    /// Output format (json, yaml, toml)
    #[arg(long = "format", value_name = "FORMAT", value_parser = parse_format, global = true)]
    format: Option<DocumentFormat>,

    /// Emit compact JSON/TOML rather than pretty formatting
    #[arg(long = "no-pretty", global = true)]
    no_pretty: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every input with its kind, gating state and current value
    Fields {
        /// Only list inputs enabled by the current modes
        #[arg(long = "enabled")]
        enabled_only: bool,
    },
    /// Show one input as a document
    Get {
        /// Input path, e.g. particle.appearance.material
        #[arg(value_name = "PATH")]
        path: FieldPath,
    },
    /// Apply edits and print the resulting snapshot
    Set {
        /// Edits in the form subject.group.field=value
        #[arg(value_name = "PATH=VALUE", required = true, value_parser = parse_edit)]
        edits: Vec<(FieldPath, String)>,

        /// Snapshot to start from instead of the layout defaults
        #[arg(short = 's', long = "snapshot", value_name = "FILE")]
        snapshot: Option<PathBuf>,

        /// Output destinations ("-" writes to stdout)
        #[arg(short = 'o', long = "output", value_name = "DEST", num_args = 1.., action = ArgAction::Append)]
        outputs: Vec<String>,
    },
    /// Print the JSON Schema of snapshot documents
    Schema,
    /// Check a snapshot document
    Validate {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let registry = load_registry(cli.layout.as_deref(), cli.embedded)?;
    let format = cli.format.unwrap_or_default();
    let pretty = !cli.no_pretty;

    match cli.command {
        Command::Fields { enabled_only } => {
            print!("{}", field_table(&registry, enabled_only));
            Ok(())
        }
        Command::Get { path } => {
            let document = describe_field(&registry, &path)?;
            emit_document(&document, OutputOptions::new(format).with_pretty(pretty))
        }
        Command::Set {
            edits,
            snapshot,
            outputs,
        } => {
            let mut editor = Editor::new(registry).with_default_observers();
            if let Some(file) = snapshot {
                let document = read_document(&file).map_err(|err| eyre!("{err:#}"))?;
                editor
                    .load_snapshot(&document)
                    .wrap_err_with(|| format!("failed to load snapshot {}", file.display()))?;
            }
            for (path, raw) in &edits {
                editor
                    .set_input(path, raw)
                    .wrap_err_with(|| format!("failed to set {path}"))?;
            }
            for issue in editor.validate() {
                warn!("{issue}");
            }
            let destinations = outputs
                .iter()
                .map(|raw| OutputDestination::parse(raw).map_err(|err| eyre!("{err:#}")))
                .collect::<Result<Vec<_>>>()?;
            let options = OutputOptions::for_destinations(destinations, cli.format)
                .map_err(|err| eyre!("{err:#}"))?
                .with_pretty(pretty);
            emit_document(&editor.snapshot(), options)
        }
        Command::Schema => emit_document(
            &snapshot_schema(&registry),
            OutputOptions::new(format).with_pretty(pretty),
        ),
        Command::Validate { file } => {
            let document = read_document(&file).map_err(|err| eyre!("{err:#}"))?;
            match validate_snapshot(&registry, &document).map_err(|err| eyre!("{err:#}"))? {
                ValidationOutcome::Valid => {
                    println!("{}: valid", file.display());
                    Ok(())
                }
                ValidationOutcome::Invalid { issues } => {
                    let mut body = String::new();
                    for issue in &issues {
                        let pointer = if issue.pointer.is_empty() {
                            "/"
                        } else {
                            issue.pointer.as_str()
                        };
                        let _ = writeln!(body, "  {pointer}: {}", issue.message);
                    }
                    Err(eyre!(
                        "{} has {} issue(s):\n{body}",
                        file.display(),
                        issues.len()
                    ))
                }
            }
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_registry(layout: Option<&Path>, embedded: bool) -> Result<InputRegistry> {
    let options = RegistryOptions::default().with_embedded_host(embedded);
    let registry = match layout {
        Some(path) => {
            let definition = read_layout(path).map_err(|err| eyre!("{err:#}"))?;
            info!(layout = %path.display(), "using custom layout");
            build_registry(&definition, &options)
                .wrap_err_with(|| format!("invalid layout {}", path.display()))?
        }
        None => InputRegistry::snowstorm(&options).map_err(|err| eyre!("{err:#}"))?,
    };
    debug!(fields = registry.field_count(), "registry ready");
    Ok(registry)
}

fn field_table(registry: &InputRegistry, enabled_only: bool) -> String {
    let mut table = String::new();
    for field in registry.fields() {
        if enabled_only && !field.enabled {
            continue;
        }
        let state = if field.enabled { "enabled" } else { "disabled" };
        let _ = writeln!(
            table,
            "{}\t{}\t{state}\t{}",
            field.path,
            field.kind().name(),
            field.display_value()
        );
    }
    table
}

fn describe_field(registry: &InputRegistry, path: &FieldPath) -> Result<Value> {
    let field = registry.field(path)?;
    let mut document = json!({
        "path": path.to_string(),
        "label": field.label(),
        "kind": field.kind().name(),
        "enabled": field.enabled,
        "required": field.is_required(),
        "value": field.current_value().unwrap_or(Value::Null),
    });
    if let Some(options) = field.options() {
        document["options"] = json!(options);
    }
    if let Some(modes) = field.enabled_modes() {
        document["enabled_modes"] = json!(modes);
    }
    Ok(document)
}

fn emit_document(document: &Value, options: OutputOptions) -> Result<()> {
    emit(document, &options).map_err(|err| eyre!("{err:#}"))
}

fn parse_format(raw: &str) -> std::result::Result<DocumentFormat, String> {
    raw.parse().map_err(|err| format!("{err}"))
}

fn parse_edit(raw: &str) -> std::result::Result<(FieldPath, String), String> {
    let (path, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("'{raw}' is not of the form subject.group.field=value"))?;
    let path = path.parse::<FieldPath>().map_err(|err| err.to_string())?;
    Ok((path, value.to_string()))
}
