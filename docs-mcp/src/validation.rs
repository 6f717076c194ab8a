//! Input checks shared by the tools.
//!
//! Every check returns a message naming the offending parameter, which the
//! tool layer hands back to the model verbatim.

use anyhow::{anyhow, bail, Result};
use docs_index::DocRange;

use crate::requests::RgbColor;

const MIN_DOC_ID_LEN: usize = 25;
const MAX_DOC_ID_LEN: usize = 100;
pub const MAX_TABLE_DIMENSION: usize = 20;

/// Pull a document ID out of a Docs URL, or pass a bare ID through.
pub fn extract_document_id(url_or_id: &str) -> Option<String> {
    let trimmed = url_or_id.trim();
    if trimmed.contains("docs.google.com") || trimmed.contains("drive.google.com") {
        let start = trimmed
            .find("/document/d/")
            .map(|i| i + "/document/d/".len())
            .or_else(|| trimmed.find("/file/d/").map(|i| i + "/file/d/".len()))?;
        let after = &trimmed[start..];
        let end = after.find(['/', '?', '#']).unwrap_or(after.len());
        let id = &after[..end];
        return (!id.is_empty()).then(|| id.to_string());
    }
    if trimmed.is_empty() || trimmed.contains('/') || trimmed.contains(char::is_whitespace) {
        return None;
    }
    Some(trimmed.to_string())
}

/// Validate the shape of a document ID (or URL) and return the bare ID
pub fn document_id(input: &str) -> Result<String> {
    let id = extract_document_id(input)
        .ok_or_else(|| anyhow!("document_id: could not find a document ID in '{}'", input))?;
    if !(MIN_DOC_ID_LEN..=MAX_DOC_ID_LEN).contains(&id.len()) {
        bail!(
            "document_id: '{}' is {} characters long, expected {} to {}",
            id,
            id.len(),
            MIN_DOC_ID_LEN,
            MAX_DOC_ID_LEN
        );
    }
    if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        bail!("document_id: '{}' contains characters other than letters, digits, '-' and '_'", id);
    }
    Ok(id)
}

/// A single insertion index; the body starts at 1
pub fn index(name: &str, value: usize) -> Result<usize> {
    if value < 1 {
        bail!("{}: must be at least 1 (the document body starts at index 1)", name);
    }
    Ok(value)
}

/// A half-open index range with `1 <= start < end`
pub fn index_range(start: usize, end: usize) -> Result<DocRange> {
    index("start_index", start)?;
    if end <= start {
        bail!("end_index ({}) must be greater than start_index ({})", end, start);
    }
    Ok(DocRange::new(start, end))
}

/// Escape a value for use inside a single-quoted Drive query string
pub fn escape_query_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Parse `#RRGGBB` (or `RRGGBB`, or `#RGB`) into 0.0-1.0 components
pub fn hex_color(name: &str, value: &str) -> Result<RgbColor> {
    let hex = value.trim().trim_start_matches('#');
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        bail!("{}: '{}' is not a #RRGGBB color", name, value);
    }
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => bail!("{}: '{}' is not a #RRGGBB color", name, value),
    };
    // All ASCII from here, so byte slicing is on char boundaries
    let channel = |i: usize| -> Result<f32> {
        u8::from_str_radix(&expanded[i..i + 2], 16)
            .map(|v| f32::from(v) / 255.0)
            .map_err(|_| anyhow!("{}: '{}' is not a #RRGGBB color", name, value))
    };
    Ok(RgbColor {
        red: channel(0)?,
        green: channel(2)?,
        blue: channel(4)?,
    })
}

/// An absolute http(s) URL
pub fn http_url(name: &str, value: &str) -> Result<String> {
    let parsed = url::Url::parse(value.trim())
        .map_err(|e| anyhow!("{}: '{}' is not a valid URL: {}", name, value, e))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed.to_string()),
        other => bail!("{}: scheme '{}' is not supported, use http or https", name, other),
    }
}

/// Table rows/columns in `1..=MAX_TABLE_DIMENSION`
pub fn table_dimension(name: &str, value: usize) -> Result<usize> {
    if !(1..=MAX_TABLE_DIMENSION).contains(&value) {
        bail!("{}: must be between 1 and {}", name, MAX_TABLE_DIMENSION);
    }
    Ok(value)
}

/// A strictly positive point size
pub fn points(name: &str, value: f64) -> Result<f64> {
    if !value.is_finite() || value <= 0.0 {
        bail!("{}: must be a positive number of points", name);
    }
    Ok(value)
}
