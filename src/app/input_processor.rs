//! Assembly of identifier text from input files and/or stdin.

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use crate::app::validation;

/// Raw identifier text gathered for one run.
#[derive(Debug, Default)]
pub(crate) struct CollectedInput {
    /// Joined text of every source, or `None` when nothing was supplied.
    pub(crate) text: Option<String>,
    /// Stdin was piped but contained only whitespace.
    pub(crate) piped_stdin_was_empty: bool,
}

/// Validates input paths and reads identifier text.
///
/// Files are read in the order given. Stdin is read only when no files are given
/// and it is not a terminal.
pub(crate) fn process_input(inputs: &[PathBuf]) -> Result<CollectedInput> {
    validation::validate_input_paths(inputs)?;

    if !inputs.is_empty() {
        return Ok(CollectedInput {
            text: Some(read_input_files(inputs)?),
            piped_stdin_was_empty: false,
        });
    }

    if io::stdin().is_terminal() {
        return Ok(CollectedInput::default());
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read identifiers from stdin")?;
    if buffer.trim().is_empty() {
        return Ok(CollectedInput {
            text: None,
            piped_stdin_was_empty: true,
        });
    }
    debug!(bytes = buffer.len(), "read identifiers from stdin");
    Ok(CollectedInput {
        text: Some(buffer),
        piped_stdin_was_empty: false,
    })
}

fn read_input_files(inputs: &[PathBuf]) -> Result<String> {
    let mut segments = Vec::with_capacity(inputs.len());
    for path in inputs {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file '{}'", path.display()))?;
        debug!(path = %path.display(), bytes = text.len(), "read input file");
        segments.push(text);
    }
    Ok(segments.join("\n"))
}
