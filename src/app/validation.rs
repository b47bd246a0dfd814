use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use url::Url;

/// Input file extensions accepted for identifier lists.
pub(crate) const ACCEPTED_INPUT_EXTENSIONS: [&str; 3] = ["txt", "csv", "tsv"];

pub(crate) fn validate_input_paths(paths: &[PathBuf]) -> Result<()> {
    for path in paths {
        validate_input_extension(path)?;
    }
    Ok(())
}

fn validate_input_extension(path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    if extension
        .as_deref()
        .is_some_and(|ext| ACCEPTED_INPUT_EXTENSIONS.contains(&ext))
    {
        return Ok(());
    }
    bail!(
        "What: Unsupported input file '{}'\nWhy: Only .txt, .csv, and .tsv identifier lists are accepted\nFix: Save the identifiers as plain text with one of those extensions, or pipe them via stdin.",
        path.display()
    );
}

pub(crate) fn validate_base_url(base_url: &str) -> Result<()> {
    let parsed = match Url::parse(base_url) {
        Ok(parsed) => parsed,
        Err(e) => bail!(
            "What: Invalid base URL '{base_url}'\nWhy: {e}\nFix: Pass a full URL such as https://pubchem.ncbi.nlm.nih.gov/rest/pug"
        ),
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!(
            "What: Invalid base URL '{base_url}'\nWhy: Scheme '{}' is not supported\nFix: Use an http:// or https:// URL",
            parsed.scheme()
        );
    }
    Ok(())
}
