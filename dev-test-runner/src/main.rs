//! Runs every `fixtures/*.json` case through `check_with` and compares the
//! reported lines with the expected ones.
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use colored::Colorize;
use serde::Deserialize;
use serde_json::Value;

use json_shapecheck::{check_with, Spec, DEFAULT_ROOT_LABEL};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Case {
    name: String,
    spec: Spec,
    value: Value,
    #[serde(default)]
    root_label: Option<String>,
    expect: Vec<String>,
}

/// Deserialize with JSON-path context in error messages.
fn load_case(path: &Path) -> Result<Case, String> {
    let src = std::fs::read_to_string(path).map_err(|e| format!("failed to read: {e}"))?;
    let de = &mut serde_json::Deserializer::from_str(&src);
    serde_path_to_error::deserialize::<_, Case>(de).map_err(|err| {
        let path = err.path().to_string();
        format!("at JSON path {path} → {}", err.into_inner())
    })
}

fn fixture_paths() -> Vec<PathBuf> {
    let pattern = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/*.json");
    match glob::glob(pattern) {
        Ok(paths) => paths.filter_map(Result::ok).collect(),
        Err(error) => {
            eprintln!("❌ bad fixture pattern: {error}");
            Vec::new()
        }
    }
}

fn main() -> ExitCode {
    let mut failures = 0usize;
    let paths = fixture_paths();
    for path in &paths {
        let case = match load_case(path) {
            Ok(x) => x,
            Err(error) => {
                eprintln!("❌ {}: {error}", path.display());
                failures += 1;
                continue;
            }
        };
        let root_label = case.root_label.as_deref().unwrap_or(DEFAULT_ROOT_LABEL);
        let mut lines: Vec<String> = Vec::new();
        let returned = check_with(&case.value, &case.spec, root_label, &mut lines);
        let passthrough = std::ptr::eq(returned, &case.value);

        if lines == case.expect && passthrough {
            eprintln!("✅ {}", case.name.green());
        } else {
            failures += 1;
            eprintln!("❌ {}", case.name.red());
            eprintln!("   expected: {:#?}", case.expect);
            eprintln!("   got:      {lines:#?}");
        }
    }

    eprintln!("—— {} cases, {failures} failed ——", paths.len());
    if failures == 0 && !paths.is_empty() { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
