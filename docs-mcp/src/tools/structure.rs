//! Document structure: breaks, lists, headers/footers, tables and images.

use anyhow::{anyhow, bail, Result};
use rmcp::model::JsonObject;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{parse_args, GoogleDocsServer, ToolOutput, ToolResult};
use crate::google_api::{BatchUpdateResponse, GoogleDocsClient};
use crate::requests::{
    Dimension, HeaderFooterType, Location, Range, Request, SectionType, Size, TableCellLocation, Target,
};
use crate::validation;

const DEFAULT_BULLET_PRESET: &str = "BULLET_DISC_CIRCLE_SQUARE";
const BULLET_PRESETS: &[&str] = &[
    "BULLET_DISC_CIRCLE_SQUARE",
    "BULLET_DIAMONDX_ARROW3D_SQUARE",
    "BULLET_CHECKBOX",
    "BULLET_ARROW_DIAMOND_DISC",
    "BULLET_STAR_CIRCLE_SQUARE",
    "BULLET_ARROW3D_CIRCLE_SQUARE",
    "BULLET_LEFTTRIANGLE_DIAMOND_DISC",
    "NUMBERED_DECIMAL_ALPHA_ROMAN",
    "NUMBERED_DECIMAL_ALPHA_ROMAN_PARENS",
    "NUMBERED_DECIMAL_NESTED",
    "NUMBERED_UPPERALPHA_ALPHA_ROMAN",
    "NUMBERED_UPPERROMAN_UPPERALPHA_DECIMAL",
    "NUMBERED_ZERODECIMAL_ALPHA_ROMAN",
];

fn yes() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct BreakArgs {
    document_id: String,
    index: usize,
    tab_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum SectionKind {
    Continuous,
    #[default]
    NextPage,
}

impl From<SectionKind> for SectionType {
    fn from(kind: SectionKind) -> Self {
        match kind {
            SectionKind::Continuous => SectionType::Continuous,
            SectionKind::NextPage => SectionType::NextPage,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SectionBreakArgs {
    document_id: String,
    index: usize,
    #[serde(default)]
    section_type: SectionKind,
    tab_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BulletArgs {
    document_id: String,
    start_index: usize,
    end_index: usize,
    preset: Option<String>,
    tab_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DocumentArgs {
    document_id: String,
}

#[derive(Debug, Deserialize)]
struct TableArgs {
    document_id: String,
    rows: usize,
    columns: usize,
    index: Option<usize>,
    tab_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TableCellArgs {
    document_id: String,
    table_start_index: usize,
    #[serde(default)]
    row_index: usize,
    #[serde(default)]
    column_index: usize,
    /// Row insertion side
    #[serde(default = "yes")]
    below: bool,
    /// Column insertion side
    #[serde(default = "yes")]
    right: bool,
    tab_id: Option<String>,
}

impl TableCellArgs {
    fn location(&self) -> Result<(String, TableCellLocation)> {
        let index = validation::index("table_start_index", self.table_start_index)?;
        let location = TableCellLocation {
            table_start_location: Location {
                index,
                tab_id: self.tab_id.clone(),
            },
            row_index: self.row_index,
            column_index: self.column_index,
        };
        Ok((validation::document_id(&self.document_id)?, location))
    }
}

#[derive(Debug, Deserialize)]
struct ImageArgs {
    document_id: String,
    image_url: String,
    index: Option<usize>,
    width_pt: Option<f64>,
    height_pt: Option<f64>,
    tab_id: Option<String>,
}

/// Accepts a preset name, or `bullet` / `numbered` / `checkbox`
fn bullet_preset(value: Option<&str>) -> Result<String> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(DEFAULT_BULLET_PRESET.to_string());
    };
    let preset = match value.to_lowercase().as_str() {
        "bullet" | "bullets" => DEFAULT_BULLET_PRESET.to_string(),
        "numbered" | "number" => "NUMBERED_DECIMAL_ALPHA_ROMAN".to_string(),
        "checkbox" => "BULLET_CHECKBOX".to_string(),
        _ => value.to_uppercase(),
    };
    if !BULLET_PRESETS.contains(&preset.as_str()) {
        bail!("preset: '{}' is not a known bullet preset", value);
    }
    Ok(preset)
}

fn image_size(width: Option<f64>, height: Option<f64>) -> Result<Option<Size>> {
    let width = width.map(|w| validation::points("width_pt", w).map(Dimension::pt)).transpose()?;
    let height = height.map(|h| validation::points("height_pt", h).map(Dimension::pt)).transpose()?;
    if width.is_none() && height.is_none() {
        return Ok(None);
    }
    Ok(Some(Size { width, height }))
}

/// Pull an ID out of the first reply, e.g. `createHeader.headerId`
fn reply_id(response: &BatchUpdateResponse, pointer: &str) -> Option<String> {
    response
        .replies
        .first()
        .and_then(|reply| reply.pointer(pointer))
        .and_then(Value::as_str)
        .map(str::to_string)
}

impl GoogleDocsServer {
    pub(super) async fn insert_page_break(&self, client: &GoogleDocsClient, args: JsonObject) -> ToolResult {
        let args: BreakArgs = parse_args(args)?;
        let index = validation::index("index", args.index)?;
        let document_id = validation::document_id(&args.document_id)?;

        let request = Request::InsertPageBreak {
            target: Target::at(index, args.tab_id.as_deref()),
        };
        client.batch_update(&document_id, &[request]).await?;

        Ok(ToolOutput::new(
            format!("Inserted a page break at index {}", index),
            json!({ "document_id": document_id, "index": index }),
        ))
    }

    pub(super) async fn insert_section_break(&self, client: &GoogleDocsClient, args: JsonObject) -> ToolResult {
        let args: SectionBreakArgs = parse_args(args)?;
        let index = validation::index("index", args.index)?;
        let document_id = validation::document_id(&args.document_id)?;
        let section_type = SectionType::from(args.section_type);

        let request = Request::InsertSectionBreak {
            section_type,
            target: Target::at(index, args.tab_id.as_deref()),
        };
        client.batch_update(&document_id, &[request]).await?;

        Ok(ToolOutput::new(
            format!("Inserted a {:?} section break at index {}", section_type, index),
            json!({ "document_id": document_id, "index": index, "section_type": section_type }),
        ))
    }

    pub(super) async fn create_bullet_list(&self, client: &GoogleDocsClient, args: JsonObject) -> ToolResult {
        let args: BulletArgs = parse_args(args)?;
        let range = validation::index_range(args.start_index, args.end_index)?;
        let document_id = validation::document_id(&args.document_id)?;
        let preset = bullet_preset(args.preset.as_deref())?;

        let request = Request::CreateParagraphBullets {
            range: Range::new(range, args.tab_id.as_deref()),
            bullet_preset: preset.clone(),
        };
        client.batch_update(&document_id, &[request]).await?;

        Ok(ToolOutput::new(
            format!("Applied {} to paragraphs in {}-{}", preset, range.start, range.end),
            json!({ "document_id": document_id, "start_index": range.start, "end_index": range.end, "preset": preset }),
        ))
    }

    pub(super) async fn remove_bullet_list(&self, client: &GoogleDocsClient, args: JsonObject) -> ToolResult {
        let args: BulletArgs = parse_args(args)?;
        let range = validation::index_range(args.start_index, args.end_index)?;
        let document_id = validation::document_id(&args.document_id)?;

        let request = Request::DeleteParagraphBullets {
            range: Range::new(range, args.tab_id.as_deref()),
        };
        client.batch_update(&document_id, &[request]).await?;

        Ok(ToolOutput::new(
            format!("Removed bullets from paragraphs in {}-{}", range.start, range.end),
            json!({ "document_id": document_id, "start_index": range.start, "end_index": range.end }),
        ))
    }

    pub(super) async fn create_header_footer(
        &self,
        client: &GoogleDocsClient,
        args: JsonObject,
        header: bool,
    ) -> ToolResult {
        let args: DocumentArgs = parse_args(args)?;
        let document_id = validation::document_id(&args.document_id)?;

        let kind = HeaderFooterType::Default;
        let (request, label, pointer) = if header {
            (Request::CreateHeader { kind }, "header", "/createHeader/headerId")
        } else {
            (Request::CreateFooter { kind }, "footer", "/createFooter/footerId")
        };
        let response = client.batch_update(&document_id, &[request]).await?;
        let id = reply_id(&response, pointer)
            .ok_or_else(|| anyhow!("Docs API did not return a {} ID", label))?;

        Ok(ToolOutput::new(
            format!("Created {} {}", label, id),
            json!({ "document_id": document_id, "kind": label, "id": id }),
        ))
    }

    pub(super) async fn insert_table(&self, client: &GoogleDocsClient, args: JsonObject) -> ToolResult {
        let args: TableArgs = parse_args(args)?;
        let rows = validation::table_dimension("rows", args.rows)?;
        let columns = validation::table_dimension("columns", args.columns)?;
        let index = args.index.map(|i| validation::index("index", i)).transpose()?;
        let document_id = validation::document_id(&args.document_id)?;

        let request = Request::InsertTable {
            rows,
            columns,
            target: Target::at_or_end(index, args.tab_id.as_deref()),
        };
        client.batch_update(&document_id, &[request]).await?;

        Ok(ToolOutput::new(
            format!("Inserted a {}x{} table", rows, columns),
            json!({ "document_id": document_id, "rows": rows, "columns": columns, "index": index }),
        ))
    }

    pub(super) async fn insert_table_row(&self, client: &GoogleDocsClient, args: JsonObject) -> ToolResult {
        let args: TableCellArgs = parse_args(args)?;
        let (document_id, location) = args.location()?;
        let side = if args.below { "below" } else { "above" };

        let request = Request::InsertTableRow {
            table_cell_location: location,
            insert_below: args.below,
        };
        self.table_edit(client, &document_id, request, format!("Inserted a row {} row {}", side, args.row_index))
            .await
    }

    pub(super) async fn insert_table_column(&self, client: &GoogleDocsClient, args: JsonObject) -> ToolResult {
        let args: TableCellArgs = parse_args(args)?;
        let (document_id, location) = args.location()?;
        let side = if args.right { "right of" } else { "left of" };

        let request = Request::InsertTableColumn {
            table_cell_location: location,
            insert_right: args.right,
        };
        self.table_edit(client, &document_id, request, format!("Inserted a column {} column {}", side, args.column_index))
            .await
    }

    pub(super) async fn delete_table_row(&self, client: &GoogleDocsClient, args: JsonObject) -> ToolResult {
        let args: TableCellArgs = parse_args(args)?;
        let (document_id, location) = args.location()?;

        let request = Request::DeleteTableRow {
            table_cell_location: location,
        };
        self.table_edit(client, &document_id, request, format!("Deleted row {}", args.row_index))
            .await
    }

    pub(super) async fn delete_table_column(&self, client: &GoogleDocsClient, args: JsonObject) -> ToolResult {
        let args: TableCellArgs = parse_args(args)?;
        let (document_id, location) = args.location()?;

        let request = Request::DeleteTableColumn {
            table_cell_location: location,
        };
        self.table_edit(client, &document_id, request, format!("Deleted column {}", args.column_index))
            .await
    }

    async fn table_edit(
        &self,
        client: &GoogleDocsClient,
        document_id: &str,
        request: Request,
        summary: String,
    ) -> ToolResult {
        let kind = request.kind();
        client.batch_update(document_id, &[request]).await?;
        Ok(ToolOutput::new(summary, json!({ "document_id": document_id, "request": kind })))
    }

    pub(super) async fn insert_image(&self, client: &GoogleDocsClient, args: JsonObject) -> ToolResult {
        let args: ImageArgs = parse_args(args)?;
        let uri = validation::http_url("image_url", &args.image_url)?;
        let index = args.index.map(|i| validation::index("index", i)).transpose()?;
        let object_size = image_size(args.width_pt, args.height_pt)?;
        let document_id = validation::document_id(&args.document_id)?;

        let request = Request::InsertInlineImage {
            uri: uri.clone(),
            target: Target::at_or_end(index, args.tab_id.as_deref()),
            object_size,
        };
        let response = client.batch_update(&document_id, &[request]).await?;
        let object_id = reply_id(&response, "/insertInlineImage/objectId");

        Ok(ToolOutput::new(
            format!("Inserted image {}", object_id.as_deref().unwrap_or(&uri)),
            json!({ "document_id": document_id, "image_url": uri, "index": index, "object_id": object_id }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullet_preset() {
        assert_eq!(bullet_preset(None).unwrap(), DEFAULT_BULLET_PRESET);
        assert_eq!(bullet_preset(Some("numbered")).unwrap(), "NUMBERED_DECIMAL_ALPHA_ROMAN");
        assert_eq!(bullet_preset(Some("bullet_checkbox")).unwrap(), "BULLET_CHECKBOX");
        assert!(bullet_preset(Some("sparkles")).is_err());
    }

    #[test]
    fn test_image_size() {
        assert_eq!(image_size(None, None).unwrap(), None);
        let size = image_size(Some(120.0), None).unwrap().unwrap();
        assert_eq!(size.width, Some(Dimension::pt(120.0)));
        assert_eq!(size.height, None);
        assert!(image_size(Some(-1.0), None).is_err());
    }

    #[test]
    fn test_table_cell_location() {
        let args: TableCellArgs = serde_json::from_value(json!({
            "document_id": "1AbCdEfGhIjKlMnOpQrStUvWxYz_0123",
            "table_start_index": 12,
            "row_index": 2,
            "tab_id": "t.1"
        }))
        .unwrap();
        assert!(args.below && args.right);

        let (_, location) = args.location().unwrap();
        assert_eq!(
            serde_json::to_value(&location).unwrap(),
            json!({"tableStartLocation": {"index": 12, "tabId": "t.1"}, "rowIndex": 2, "columnIndex": 0})
        );

        let args: TableCellArgs = serde_json::from_value(json!({
            "document_id": "1AbCdEfGhIjKlMnOpQrStUvWxYz_0123",
            "table_start_index": 0
        }))
        .unwrap();
        assert!(args.location().is_err());
    }

    #[test]
    fn test_reply_id() {
        let response: BatchUpdateResponse = serde_json::from_value(json!({
            "documentId": "d",
            "replies": [{"createHeader": {"headerId": "kix.h1"}}]
        }))
        .unwrap();
        assert_eq!(reply_id(&response, "/createHeader/headerId").as_deref(), Some("kix.h1"));
        assert_eq!(reply_id(&response, "/createFooter/footerId"), None);
    }

    #[test]
    fn test_section_kind_default() {
        let args: SectionBreakArgs = serde_json::from_value(json!({"document_id": "d", "index": 3})).unwrap();
        assert_eq!(SectionType::from(args.section_type), SectionType::NextPage);
    }
}
