//! Pass-through checking: validate, report every mismatch, hand the value back.
//!
//! Reporting is observational. A failed check never panics, never returns an
//! error and never changes what the caller gets back; callers who want a hard
//! failure should look at [`validate`](crate::validate::validate) themselves.
use std::borrow::Borrow;

use colored::Colorize;
use serde_json::Value;

use crate::mismatch::PathError;
use crate::spec::Spec;
use crate::validate::validate;

pub const DEFAULT_ROOT_LABEL: &str = "object";

/// A sink for formatted diagnostic lines.
pub trait Reporter {
    fn report(&mut self, line: &str);
}

impl Reporter for Vec<String> {
    fn report(&mut self, line: &str) { self.push(line.to_string()); }
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn report(&mut self, line: &str) { (**self).report(line) }
}

/// Emits each line as a `WARN` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&mut self, line: &str) {
        tracing::warn!(target: "json_shapecheck", "{line}");
    }
}

/// Prints each line to stdout.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleReporter {
    pub color: bool,
}

impl Default for ConsoleReporter {
    fn default() -> Self { Self { color: true } }
}

impl Reporter for ConsoleReporter {
    fn report(&mut self, line: &str) {
        if self.color {
            println!("{} {}", "✗".red().bold(), line.yellow());
        } else {
            println!("{line}");
        }
    }
}

/// `root_label` followed by the rendered path and message.
pub fn format_diagnostic(root_label: &str, error: &PathError) -> String {
    format!("{root_label}{error}")
}

/// Validate and report through `tracing`; returns `value` untouched.
pub fn check<V: Borrow<Value>>(value: V, spec: &Spec, root_label: &str) -> V {
    check_with(value, spec, root_label, &mut TracingReporter)
}

/// Validate and report into `reporter`; returns `value` untouched.
pub fn check_with<V, R>(value: V, spec: &Spec, root_label: &str, reporter: &mut R) -> V
where
    V: Borrow<Value>,
    R: Reporter + ?Sized,
{
    for error in validate(value.borrow(), spec) {
        reporter.report(&format_diagnostic(root_label, &error));
    }
    value
}
