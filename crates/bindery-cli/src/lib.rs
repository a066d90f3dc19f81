//! Command-line front end for the bindery engine.
//!
//! Two commands are provided:
//!
//! - `transcode` reads a document in one media type, binds it to a type from
//!   a descriptor file and writes it back out in another configuration.
//! - `check` loads a descriptor file and builds a binding context from it,
//!   reporting any configuration error.
//!
//! ```bash
//! bindery transcode --descriptors order.json --type Order --from xml --to json order.xml
//! bindery check --descriptors order.json
//! ```

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bindery::{BindingConfig, BindingContext, DescriptorSet, MediaType};
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::{debug, info};

/// Transcode XML and JSON documents through bindery descriptors.
#[derive(Debug, Parser)]
#[command(name = "bindery", version, about, propagate_version = true)]
pub struct Cli {
    /// Log level used when `RUST_LOG` is not set.
    #[arg(long, env = "BINDERY_LOG_LEVEL", default_value = "warn", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read a document and write it back in another media type
    Transcode(TranscodeArgs),
    /// Validate a descriptor file
    Check(CheckArgs),
}

#[derive(Debug, Clone, Args)]
pub struct TranscodeArgs {
    /// Descriptor file (`{"types": [...]}`)
    #[arg(long, env = "BINDERY_DESCRIPTORS")]
    pub descriptors: PathBuf,

    /// Type key of the document's root object
    #[arg(long = "type")]
    pub type_key: String,

    /// Media type of the input (`json` or `xml`)
    #[arg(long, default_value = "xml")]
    pub from: MediaType,

    /// Media type of the output (`json` or `xml`)
    #[arg(long, default_value = "json")]
    pub to: MediaType,

    /// JSON input carries the root name as its single member
    #[arg(
        long,
        default_value_t = true,
        num_args = 0..=1,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub from_include_root: bool,

    /// JSON output carries the root name as its single member
    #[arg(
        long,
        default_value_t = true,
        num_args = 0..=1,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub include_root: bool,

    /// Render wrapped collections as `"wrapper": [...]` in JSON output
    #[arg(long)]
    pub wrapper_as_array: bool,

    /// Root name for the output; defaults to the name read from the input
    #[arg(long)]
    pub root: Option<String>,

    /// Pretty-print the output
    #[arg(long)]
    pub pretty: bool,

    /// Binding properties (JSON object) applied to the output configuration
    #[arg(long)]
    pub properties: Option<PathBuf>,

    /// Input document; standard input when omitted
    pub input: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Descriptor file (`{"types": [...]}`)
    #[arg(long, env = "BINDERY_DESCRIPTORS")]
    pub descriptors: PathBuf,
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `level`.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("bindery={},bindery_cli={}", level, level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

pub fn load_descriptors(path: &Path) -> Result<DescriptorSet> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read descriptor file {}", path.display()))?;
    let descriptors = DescriptorSet::from_json_str(&text)
        .with_context(|| format!("invalid descriptor file {}", path.display()))?;
    debug!(path = %path.display(), types = descriptors.types.len(), "Loaded descriptors");
    Ok(descriptors)
}

fn load_properties(path: &Path) -> Result<BindingConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read properties file {}", path.display()))?;
    let properties: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("invalid properties file {}", path.display()))?;
    Ok(BindingConfig::from_properties(properties)?)
}

/// Reads the input document from `path`, or from standard input.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("cannot read input {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("cannot read standard input")?;
            Ok(text)
        }
    }
}

impl TranscodeArgs {
    fn source_config(&self) -> BindingConfig {
        BindingConfig::default()
            .with_media_type(self.from)
            .with_include_root(self.from_include_root)
    }

    fn target_config(&self) -> Result<BindingConfig> {
        let base = match &self.properties {
            Some(path) => load_properties(path)?,
            None => BindingConfig::default()
                .with_include_root(self.include_root)
                .with_wrapper_as_array(self.wrapper_as_array),
        };
        let config = base.with_media_type(self.to);
        let config = if self.wrapper_as_array {
            config.with_wrapper_as_array(true)
        } else {
            config
        };
        Ok(if self.pretty {
            config.with_formatted_output(true)
        } else {
            config
        })
    }
}

/// Transcodes `input` as described by `args` and returns the output text.
pub fn transcode(args: &TranscodeArgs, input: &str) -> Result<String> {
    let descriptors = load_descriptors(&args.descriptors)?;

    let source = BindingContext::builder()
        .bind_all(descriptors.clone())
        .config(args.source_config())
        .build()?;
    let target = BindingContext::builder()
        .bind_all(descriptors)
        .config(args.target_config()?)
        .build()?;

    let mut element = source
        .unmarshaller()
        .unmarshal_element(input, args.type_key.as_str())
        .with_context(|| format!("cannot read {} input as {}", args.from, args.type_key))?;
    if let Some(root) = &args.root {
        element.name = root.clone();
    }

    let output = target
        .marshaller()
        .marshal_element(&element)
        .with_context(|| format!("cannot write {} output", args.to))?;
    info!(from = %args.from, to = %args.to, type_key = %args.type_key, "Transcoded document");
    Ok(output)
}

/// Builds a binding context from the descriptor file and summarizes it.
pub fn check(args: &CheckArgs) -> Result<String> {
    let descriptors = load_descriptors(&args.descriptors)?;
    let mut keys: Vec<String> = descriptors
        .types
        .iter()
        .map(|t| t.key.as_str().to_string())
        .collect();
    keys.sort();

    let context = BindingContext::builder().bind_all(descriptors).build()?;
    for key in context.bound_types().map(|t| t.key.clone()) {
        context.resolve(&key)?;
    }
    Ok(format!("{} types bound: {}", keys.len(), keys.join(", ")))
}

/// Runs one command and returns the text to print.
pub fn run(cli: &Cli) -> Result<String> {
    match &cli.command {
        Command::Transcode(args) => {
            let input = read_input(args.input.as_deref())?;
            transcode(args, &input)
        }
        Command::Check(args) => check(args),
    }
}
