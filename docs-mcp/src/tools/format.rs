//! Character and paragraph formatting tools.

use anyhow::{bail, Result};
use docs_index::DocRange;
use rmcp::model::JsonObject;
use serde::Deserialize;
use serde_json::json;

use super::{parse_args, GoogleDocsServer, ToolOutput, ToolResult};
use crate::google_api::GoogleDocsClient;
use crate::requests::{Dimension, Link, ParagraphStyle, Range, Request, TextStyle, WeightedFontFamily};
use crate::validation;

const NAMED_STYLES: &[&str] = &[
    "NORMAL_TEXT",
    "TITLE",
    "SUBTITLE",
    "HEADING_1",
    "HEADING_2",
    "HEADING_3",
    "HEADING_4",
    "HEADING_5",
    "HEADING_6",
];
const ALIGNMENTS: &[&str] = &["START", "CENTER", "END", "JUSTIFIED"];

#[derive(Debug, Deserialize)]
struct FormatTextArgs {
    document_id: String,
    start_index: usize,
    end_index: usize,
    tab_id: Option<String>,
    bold: Option<bool>,
    italic: Option<bool>,
    underline: Option<bool>,
    strikethrough: Option<bool>,
    font_size: Option<f64>,
    font_family: Option<String>,
    foreground_color: Option<String>,
    background_color: Option<String>,
    link_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FormatParagraphArgs {
    document_id: String,
    start_index: usize,
    end_index: usize,
    tab_id: Option<String>,
    named_style: Option<String>,
    alignment: Option<String>,
    line_spacing: Option<f64>,
    space_above: Option<f64>,
    space_below: Option<f64>,
    indent_start: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RangeArgs {
    document_id: String,
    start_index: usize,
    end_index: usize,
    tab_id: Option<String>,
}

/// Upper-case `value` and check it against `allowed`
fn one_of(name: &str, value: &str, allowed: &[&str]) -> Result<String> {
    let upper = value.trim().to_uppercase().replace([' ', '-'], "_");
    if !allowed.contains(&upper.as_str()) {
        bail!("{}: '{}' is not one of {}", name, value, allowed.join(", "));
    }
    Ok(upper)
}

fn text_style(args: &FormatTextArgs) -> Result<TextStyle> {
    let style = TextStyle {
        bold: args.bold,
        italic: args.italic,
        underline: args.underline,
        strikethrough: args.strikethrough,
        font_size: args
            .font_size
            .map(|size| validation::points("font_size", size).map(Dimension::pt))
            .transpose()?,
        weighted_font_family: args
            .font_family
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(|f| WeightedFontFamily { font_family: f.to_string() }),
        foreground_color: args
            .foreground_color
            .as_deref()
            .map(|c| validation::hex_color("foreground_color", c).map(Into::into))
            .transpose()?,
        background_color: args
            .background_color
            .as_deref()
            .map(|c| validation::hex_color("background_color", c).map(Into::into))
            .transpose()?,
        link: args
            .link_url
            .as_deref()
            .map(|u| validation::http_url("link_url", u).map(|url| Link { url }))
            .transpose()?,
    };
    if style.fields().is_empty() {
        bail!("no formatting options given; set at least one of bold, italic, underline, strikethrough, font_size, font_family, foreground_color, background_color, link_url");
    }
    Ok(style)
}

fn paragraph_style(args: &FormatParagraphArgs) -> Result<ParagraphStyle> {
    let style = ParagraphStyle {
        named_style_type: args
            .named_style
            .as_deref()
            .map(|s| one_of("named_style", s, NAMED_STYLES))
            .transpose()?,
        alignment: args
            .alignment
            .as_deref()
            .map(|a| one_of("alignment", a, ALIGNMENTS))
            .transpose()?,
        line_spacing: args
            .line_spacing
            .map(|s| validation::points("line_spacing", s))
            .transpose()?,
        space_above: dimension("space_above", args.space_above)?,
        space_below: dimension("space_below", args.space_below)?,
        indent_start: dimension("indent_start", args.indent_start)?,
    };
    if style.fields().is_empty() {
        bail!("no paragraph options given; set at least one of named_style, alignment, line_spacing, space_above, space_below, indent_start");
    }
    Ok(style)
}

/// Spacing and indents may be zero, but not negative
fn dimension(name: &str, value: Option<f64>) -> Result<Option<Dimension>> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => bail!("{}: must be zero or more points", name),
        Some(v) => Ok(Some(Dimension::pt(v))),
        None => Ok(None),
    }
}

fn checked_range(document_id: &str, start: usize, end: usize) -> Result<(String, DocRange)> {
    let range = validation::index_range(start, end)?;
    Ok((validation::document_id(document_id)?, range))
}

impl GoogleDocsServer {
    pub(super) async fn format_text(&self, client: &GoogleDocsClient, args: JsonObject) -> ToolResult {
        let args: FormatTextArgs = parse_args(args)?;
        let (document_id, range) = checked_range(&args.document_id, args.start_index, args.end_index)?;
        let style = text_style(&args)?;
        let fields = style.fields();

        let request = Request::UpdateTextStyle {
            range: Range::new(range, args.tab_id.as_deref()),
            text_style: style,
            fields: fields.clone(),
        };
        client.batch_update(&document_id, &[request]).await?;

        Ok(ToolOutput::new(
            format!("Applied {} to {}-{}", fields, range.start, range.end),
            json!({ "document_id": document_id, "start_index": range.start, "end_index": range.end, "fields": fields }),
        ))
    }

    pub(super) async fn format_paragraph(&self, client: &GoogleDocsClient, args: JsonObject) -> ToolResult {
        let args: FormatParagraphArgs = parse_args(args)?;
        let (document_id, range) = checked_range(&args.document_id, args.start_index, args.end_index)?;
        let style = paragraph_style(&args)?;
        let fields = style.fields();

        let request = Request::UpdateParagraphStyle {
            range: Range::new(range, args.tab_id.as_deref()),
            paragraph_style: style,
            fields: fields.clone(),
        };
        client.batch_update(&document_id, &[request]).await?;

        Ok(ToolOutput::new(
            format!("Applied paragraph {} to {}-{}", fields, range.start, range.end),
            json!({ "document_id": document_id, "start_index": range.start, "end_index": range.end, "fields": fields }),
        ))
    }

    pub(super) async fn clear_formatting(&self, client: &GoogleDocsClient, args: JsonObject) -> ToolResult {
        let args: RangeArgs = parse_args(args)?;
        let (document_id, range) = checked_range(&args.document_id, args.start_index, args.end_index)?;

        let request = Request::UpdateTextStyle {
            range: Range::new(range, args.tab_id.as_deref()),
            text_style: TextStyle::default(),
            fields: TextStyle::ALL_FIELDS.to_string(),
        };
        client.batch_update(&document_id, &[request]).await?;

        Ok(ToolOutput::new(
            format!("Cleared character formatting in {}-{}", range.start, range.end),
            json!({ "document_id": document_id, "start_index": range.start, "end_index": range.end }),
        ))
    }
}
