//! Terminal output for build results.
//!
//! Status lines carry a colored symbol, report fields are printed as dimmed
//! `label: value` pairs, and stage timings are laid out as an aligned table.

use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
}

pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  let millis = duration.subsec_millis();

  if secs >= 60 {
    let mins = secs / 60;
    let remaining_secs = secs % 60;
    format!("{}m {}s", mins, remaining_secs)
  } else if secs > 0 {
    format!("{}.{:02}s", secs, millis / 10)
  } else if millis > 0 {
    format!("{}ms", millis)
  } else {
    format!("{}µs", duration.subsec_micros())
  }
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

/// Lines of the timing table: one per stage, then the total, labels padded to a common width.
pub fn timing_lines(timings: &[(String, Duration)]) -> Vec<String> {
  let total: Duration = timings.iter().map(|(_, elapsed)| *elapsed).sum();
  let width = timings.iter().map(|(label, _)| label.len()).chain([TOTAL_LABEL.len()]).max().unwrap_or(0);

  timings
    .iter()
    .map(|(label, elapsed)| (label.as_str(), *elapsed))
    .chain([(TOTAL_LABEL, total)])
    .map(|(label, elapsed)| format!("{:<width$}  {:>8}", label, format_duration(elapsed), width = width))
    .collect()
}

const TOTAL_LABEL: &str = "total";

pub fn print_timings(timings: &[(String, Duration)]) {
  println!();
  println!("Timings:");
  for line in timing_lines(timings) {
    println!("  {}", line);
  }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}
