//! Minimal CLI: check documents against a spec, or infer a spec from samples.
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use serde_json::Value;
use tracing::{debug, info, warn};

use json_shapecheck::infer::Inference;
use json_shapecheck::{validate_slot, ConsoleReporter, PathError, Reporter, Spec, DEFAULT_ROOT_LABEL};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// check JSON/NDJSON documents against a shape spec, or infer a spec from samples
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    /// more logging (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// disable colored diagnostics
    #[arg(long, global = true, default_value_t = false)]
    pub no_color: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// validate every input document and print one line per mismatch
    Check(CheckOut),
    /// infer a spec that every input document conforms to
    Infer(InferOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document.
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// spec file in JSON literal notation
    #[arg(long, short)]
    spec: PathBuf,

    /// label prefixed to every reported path
    #[arg(long, default_value = DEFAULT_ROOT_LABEL)]
    root_label: String,

    /// exit with a failure status when any document has mismatches
    #[arg(long, default_value_t = false)]
    strict: bool,
}

#[derive(clap::Parser, Debug)]
struct InferOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json spec file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

/// One document pulled out of an input file. `value` is `None` when a JSON
/// pointer selected nothing, which is checked as an absent value.
#[derive(Debug)]
struct Document {
    source: String,
    value: Option<Value>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_documents(&self) -> Result<Vec<Document>> {
        let source_paths = resolve_file_path_patterns(&self.input)
            .context("failed to resolve input file paths")?;
        let mut documents = Vec::new();
        for source_path in source_paths {
            let source_path_str = source_path.to_string_lossy().to_string();
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file ({source_path_str})"))?;
            for (index, json_value) in parse_documents(&source, self.ndjson).enumerate() {
                let json_value = json_value
                    .with_context(|| format!("failed to parse JSON source file ({source_path_str}) document #{index}"))?;
                let label = if self.ndjson { format!("{source_path_str}:{}", index + 1) } else { source_path_str.clone() };
                self.select(label, json_value, &mut documents)?;
            }
        }
        debug!(documents = documents.len(), "loaded input documents");
        Ok(documents)
    }

    fn select(&self, source: String, json_value: Value, out: &mut Vec<Document>) -> Result<()> {
        let selected = match self.json_pointer.as_deref() {
            None => Some(json_value),
            Some(pointer) => {
                let hit = json_value.pointer(pointer).cloned();
                if hit.is_none() {
                    debug!(%source, pointer, "json pointer selected nothing");
                }
                hit
            }
        };
        match (self.jq_expr.as_ref(), selected) {
            (Some(jq_expr), Some(value)) => {
                let outputs = json_shapecheck::jq_exec::run_filter(jq_expr, &value)
                    .with_context(|| format!("failed to apply jq expression to source file ({source})"))?;
                for (index, value) in outputs.into_iter().enumerate() {
                    out.push(Document { source: format!("{source}#{index}"), value: Some(value) });
                }
            }
            (_, value) => out.push(Document { source, value }),
        }
        Ok(())
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<ExitCode> {
        if self.no_color {
            colored::control::set_override(false);
        }
        match &self.cmd {
            Command::Check(target) => target.run(!self.no_color),
            Command::Infer(target) => target.run(),
        }
    }
}

impl CheckOut {
    fn run(&self, color: bool) -> Result<ExitCode> {
        let spec = load_spec(&self.spec)?;
        let documents = self.input_settings.load_documents()?;

        // validation is stateless, so documents are independent
        let results: Vec<Vec<PathError>> = documents
            .par_iter()
            .map(|doc| validate_slot(doc.value.as_ref(), &spec))
            .collect();

        let mut reporter = ConsoleReporter { color };
        let mut failed = 0usize;
        for (doc, errors) in documents.iter().zip(&results) {
            if errors.is_empty() {
                debug!(source = %doc.source, "document conforms");
                continue;
            }
            failed += 1;
            info!(source = %doc.source, mismatches = errors.len(), "document does not conform");
            for error in errors {
                reporter.report(&json_shapecheck::reporter::format_diagnostic(&self.root_label, error));
            }
        }

        info!(documents = documents.len(), failed, "check finished");
        if self.strict && failed > 0 {
            Ok(ExitCode::FAILURE)
        } else {
            Ok(ExitCode::SUCCESS)
        }
    }
}

impl InferOut {
    fn run(&self) -> Result<ExitCode> {
        let mut inf = Inference::new();
        for doc in self.input_settings.load_documents()? {
            match doc.value {
                Some(value) => inf.observe_value(&value),
                None => warn!(source = %doc.source, "skipping document without a selected value"),
            }
        }
        let Some(spec) = inf.solve() else {
            bail!("no documents to infer a spec from");
        };
        info!(samples = inf.samples(), "inferred spec");

        let spec_src = serde_json::to_string_pretty(&spec)?;
        if let Some(out) = self.out.as_ref() {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(out, &spec_src)
                .with_context(|| format!("failed to write {}", out.display()))?;
        } else {
            println!("{spec_src}");
        }
        Ok(ExitCode::SUCCESS)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn load_spec(path: &Path) -> Result<Spec> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read spec file ({})", path.display()))?;
    Spec::from_json_str(&source).with_context(|| format!("failed to load spec file ({})", path.display()))
}

fn parse_documents(source: &str, ndjson: bool) -> Box<dyn Iterator<Item = serde_json::Result<Value>> + '_> {
    if ndjson {
        Box::new(
            source
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(serde_json::from_str::<Value>),
        )
    } else {
        Box::new(std::iter::once(serde_json::from_str::<Value>(source)))
    }
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
