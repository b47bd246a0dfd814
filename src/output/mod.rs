//! CLI output formatting and display helpers.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chemly_core::{BatchResult, FailedIdentifier, ResolutionInput, records_to_json, to_table};
use tracing::{info, warn};

use crate::cli::OutputFormat;

/// Message when no input was provided at all.
pub const NO_INPUT_GUIDANCE: &str =
    "No input provided. Pipe identifiers via stdin or pass .txt/.csv/.tsv files as arguments.";

/// Message when stdin was piped but empty.
pub const EMPTY_STDIN_GUIDANCE: &str =
    "Received empty stdin input. Pipe compound names, CIDs, or SMILES separated by | , tab or newline.";

/// Example for piping input.
pub const INPUT_PIPE_EXAMPLE: &str = "Example: echo 'Aspirin|2244|C=O' | chemly";

/// Example for passing files as arguments.
pub const INPUT_ARG_EXAMPLE: &str = "Example: chemly compounds.txt -o results.tsv";

/// Logged when a run produced no records at all.
pub const NO_VALID_ENTRY_GUIDANCE: &str =
    "Could not find any valid entry. Check the spelling of names, CIDs, and SMILES and try again.";

/// Failed identifiers listed before the summary line is truncated.
const MAX_FAILED_LISTED: usize = 20;

/// Returns terminal width from COLUMNS, or 80 if unset/invalid.
pub fn terminal_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|width| *width >= 20)
        .unwrap_or(80)
}

/// Truncates text to at most `width` chars, appending ellipsis if truncated.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    let text_len = text.chars().count();
    if text_len <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    if width == 1 {
        return "…".to_string();
    }

    let mut output: String = text.chars().take(width - 1).collect();
    output.push('…');
    output
}

/// Returns lines for quick-start guidance (headline + examples), truncated to width.
pub fn quick_start_guidance_lines(empty_stdin: bool, width: usize) -> Vec<String> {
    let headline = if empty_stdin {
        EMPTY_STDIN_GUIDANCE
    } else {
        NO_INPUT_GUIDANCE
    };

    vec![
        truncate_to_width(headline, width),
        truncate_to_width(INPUT_PIPE_EXAMPLE, width),
        truncate_to_width(INPUT_ARG_EXAMPLE, width),
    ]
}

/// Prints quick-start guidance to stdout (no input or empty stdin).
pub fn print_quick_start_guidance(empty_stdin: bool) {
    let width = terminal_width().min(80);
    for line in quick_start_guidance_lines(empty_stdin, width) {
        println!("{line}");
    }
}

pub(crate) fn log_parse_feedback(input: &ResolutionInput) {
    let summary = build_parse_feedback_summary(input);
    info!("{}", truncate_to_width(&summary, terminal_width()));
}

pub(crate) fn build_parse_feedback_summary(input: &ResolutionInput) -> String {
    let counts = input.kind_counts();
    format!(
        "Parsed {} identifiers: {} CIDs, {} SMILES, {} names",
        input.len(),
        counts.numeric_ids,
        counts.structural,
        counts.names
    )
}

/// Seconds with two decimals, e.g. `7.53`.
pub(crate) fn format_elapsed_secs(elapsed: Duration) -> String {
    format!("{:.2}", elapsed.as_secs_f64())
}

pub(crate) fn render_failure_summary_line(failed: &[FailedIdentifier], width: usize) -> String {
    let listed: Vec<&str> = failed
        .iter()
        .take(MAX_FAILED_LISTED)
        .map(FailedIdentifier::raw)
        .collect();
    let more = failed.len().saturating_sub(MAX_FAILED_LISTED);
    let more_suffix = if more > 0 {
        format!(" (+{more} more)")
    } else {
        String::new()
    };
    truncate_to_width(
        &format!(
            "Could not resolve {} identifiers: {}{more_suffix}",
            failed.len(),
            listed.join(", ")
        ),
        width,
    )
}

/// Logs the end-of-run summary: elapsed time, counts, failures, and guidance.
pub(crate) fn log_run_summary(result: &BatchResult) {
    info!(
        "Resolved {} of {} identifiers in {} seconds",
        result.records().len(),
        result.total_count(),
        format_elapsed_secs(result.elapsed())
    );

    if !result.failed().is_empty() {
        warn!(
            "{}",
            render_failure_summary_line(result.failed(), terminal_width().max(120))
        );
    }

    if result.records().is_empty() && result.is_complete() {
        warn!("{NO_VALID_ENTRY_GUIDANCE}");
    }

    if result.was_interrupted() {
        warn!(
            completed = result.completed_count(),
            total = result.total_count(),
            "Interrupted. Partial results were written; run again to resolve the rest."
        );
    }
}

/// Renders resolved records in the requested format.
pub(crate) fn render_result(result: &BatchResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Tsv => Ok(to_table(result.records()).to_tsv()),
        OutputFormat::Json => {
            let mut json =
                records_to_json(result.records()).context("Failed to serialize records as JSON")?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Writes rendered output to `path`, or to stdout when no path is given.
pub(crate) fn write_output(rendered: &str, path: Option<&Path>) -> Result<()> {
    if let Some(path) = path {
        fs::write(path, rendered)
            .with_context(|| format!("Failed to write results to '{}'", path.display()))?;
        info!(path = %path.display(), "Wrote results");
        return Ok(());
    }
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(rendered.as_bytes())
        .and_then(|()| stdout.flush())
        .context("Failed to write results to stdout")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chemly_core::tokenize;
    use tempfile::TempDir;

    #[test]
    fn test_terminal_width_returns_sensible_value() {
        assert!(terminal_width() >= 20);
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdefgh", 5), "abcd…");
        assert_eq!(truncate_to_width("abc", 1), "…");
        assert_eq!(truncate_to_width("abc", 0), "");
    }

    #[test]
    fn test_quick_start_guidance_lines_switch_headline() {
        let lines = quick_start_guidance_lines(false, 200);
        assert_eq!(lines[0], NO_INPUT_GUIDANCE);
        assert_eq!(lines.len(), 3);
        let lines = quick_start_guidance_lines(true, 200);
        assert_eq!(lines[0], EMPTY_STDIN_GUIDANCE);
    }

    #[test]
    fn test_build_parse_feedback_summary_counts_kinds() {
        let input = tokenize("Aspirin|2244|C=O|962|water");
        assert_eq!(
            build_parse_feedback_summary(&input),
            "Parsed 5 identifiers: 2 CIDs, 1 SMILES, 2 names"
        );
    }

    #[test]
    fn test_format_elapsed_secs_two_decimals() {
        assert_eq!(format_elapsed_secs(Duration::from_millis(7534)), "7.53");
        assert_eq!(format_elapsed_secs(Duration::ZERO), "0.00");
    }

    #[test]
    fn test_render_failure_summary_line_lists_identifiers() {
        let failed = vec![
            FailedIdentifier::new("Unobtainium123"),
            FailedIdentifier::new("C((("),
        ];
        assert_eq!(
            render_failure_summary_line(&failed, 200),
            "Could not resolve 2 identifiers: Unobtainium123, C((("
        );
    }

    #[test]
    fn test_render_failure_summary_line_caps_list() {
        let failed: Vec<FailedIdentifier> = (0..25)
            .map(|i| FailedIdentifier::new(format!("x{i}")))
            .collect();
        let line = render_failure_summary_line(&failed, 1000);
        assert!(line.starts_with("Could not resolve 25 identifiers: x0, x1"));
        assert!(line.ends_with("x19 (+5 more)"));
    }

    #[test]
    fn test_render_result_empty_tsv_has_header_only() {
        let rendered = render_result(&BatchResult::empty(), OutputFormat::Tsv).unwrap();
        assert_eq!(rendered.lines().count(), 1);
        assert!(rendered.starts_with("name\tcid\tsmiles"));
    }

    #[test]
    fn test_render_result_empty_json_is_empty_array() {
        let rendered = render_result(&BatchResult::empty(), OutputFormat::Json).unwrap();
        assert_eq!(rendered, "[]\n");
    }

    #[test]
    fn test_write_output_to_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.tsv");
        write_output("name\tcid\n", Some(&path)).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "name\tcid\n");
    }

    #[test]
    fn test_write_output_missing_directory_errors() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("no-such-dir").join("out.tsv");
        let err = write_output("x", Some(&path)).unwrap_err();
        assert!(err.to_string().contains("out.tsv"));
    }
}
