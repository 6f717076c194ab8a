//! Typed `documents.batchUpdate` requests.
//!
//! Each variant serializes to the single-key object the Docs API expects,
//! e.g. `{"insertText": {"text": "..", "location": {"index": 5}}}`.

use docs_index::{DocRange, EditOperation};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Request {
    InsertText {
        text: String,
        #[serde(flatten)]
        target: Target,
    },
    DeleteContentRange {
        range: Range,
    },
    UpdateTextStyle {
        range: Range,
        text_style: TextStyle,
        fields: String,
    },
    UpdateParagraphStyle {
        range: Range,
        paragraph_style: ParagraphStyle,
        fields: String,
    },
    InsertTable {
        rows: usize,
        columns: usize,
        #[serde(flatten)]
        target: Target,
    },
    InsertTableRow {
        table_cell_location: TableCellLocation,
        insert_below: bool,
    },
    InsertTableColumn {
        table_cell_location: TableCellLocation,
        insert_right: bool,
    },
    DeleteTableRow {
        table_cell_location: TableCellLocation,
    },
    DeleteTableColumn {
        table_cell_location: TableCellLocation,
    },
    InsertInlineImage {
        uri: String,
        #[serde(flatten)]
        target: Target,
        #[serde(skip_serializing_if = "Option::is_none")]
        object_size: Option<Size>,
    },
    InsertPageBreak {
        #[serde(flatten)]
        target: Target,
    },
    InsertSectionBreak {
        section_type: SectionType,
        #[serde(flatten)]
        target: Target,
    },
    CreateParagraphBullets {
        range: Range,
        bullet_preset: String,
    },
    DeleteParagraphBullets {
        range: Range,
    },
    CreateHeader {
        #[serde(rename = "type")]
        kind: HeaderFooterType,
    },
    CreateFooter {
        #[serde(rename = "type")]
        kind: HeaderFooterType,
    },
}

impl Request {
    /// Translate a planned index edit into its API request
    pub fn from_edit(edit: &EditOperation, tab_id: Option<&str>) -> Self {
        match edit {
            EditOperation::Delete { range } => Request::DeleteContentRange {
                range: Range::new(*range, tab_id),
            },
            EditOperation::Insert { index, text } => Request::InsertText {
                text: text.clone(),
                target: Target::at(*index, tab_id),
            },
        }
    }

    /// The request's key in the batch payload, for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Request::InsertText { .. } => "insertText",
            Request::DeleteContentRange { .. } => "deleteContentRange",
            Request::UpdateTextStyle { .. } => "updateTextStyle",
            Request::UpdateParagraphStyle { .. } => "updateParagraphStyle",
            Request::InsertTable { .. } => "insertTable",
            Request::InsertTableRow { .. } => "insertTableRow",
            Request::InsertTableColumn { .. } => "insertTableColumn",
            Request::DeleteTableRow { .. } => "deleteTableRow",
            Request::DeleteTableColumn { .. } => "deleteTableColumn",
            Request::InsertInlineImage { .. } => "insertInlineImage",
            Request::InsertPageBreak { .. } => "insertPageBreak",
            Request::InsertSectionBreak { .. } => "insertSectionBreak",
            Request::CreateParagraphBullets { .. } => "createParagraphBullets",
            Request::DeleteParagraphBullets { .. } => "deleteParagraphBullets",
            Request::CreateHeader { .. } => "createHeader",
            Request::CreateFooter { .. } => "createFooter",
        }
    }
}

/// Where an insertion lands: a fixed index or the end of the body segment
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Target {
    Location(Location),
    EndOfSegmentLocation(EndOfSegmentLocation),
}

impl Target {
    pub fn at(index: usize, tab_id: Option<&str>) -> Self {
        Target::Location(Location {
            index,
            tab_id: tab_id.map(str::to_string),
        })
    }

    pub fn end_of_body(tab_id: Option<&str>) -> Self {
        Target::EndOfSegmentLocation(EndOfSegmentLocation {
            tab_id: tab_id.map(str::to_string),
        })
    }

    /// `Some(index)` inserts there, `None` appends to the body
    pub fn at_or_end(index: Option<usize>, tab_id: Option<&str>) -> Self {
        match index {
            Some(index) => Self::at(index, tab_id),
            None => Self::end_of_body(tab_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndOfSegmentLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Range {
    pub start_index: usize,
    pub end_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab_id: Option<String>,
}

impl Range {
    pub fn new(range: DocRange, tab_id: Option<&str>) -> Self {
        Self {
            start_index: range.start,
            end_index: range.end,
            tab_id: tab_id.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCellLocation {
    pub table_start_location: Location,
    pub row_index: usize,
    pub column_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SectionType {
    Continuous,
    NextPage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HeaderFooterType {
    Default,
}

/// A length in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dimension {
    pub magnitude: f64,
    pub unit: &'static str,
}

impl Dimension {
    pub fn pt(magnitude: f64) -> Self {
        Self { magnitude, unit: "PT" }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Size {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Dimension>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RgbColor {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Color {
    pub rgb_color: RgbColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OptionalColor {
    pub color: Color,
}

impl From<RgbColor> for OptionalColor {
    fn from(rgb_color: RgbColor) -> Self {
        Self {
            color: Color { rgb_color },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedFontFamily {
    pub font_family: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub url: String,
}

/// Character formatting; only the set fields are sent
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strikethrough: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weighted_font_family: Option<WeightedFontFamily>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreground_color: Option<OptionalColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<OptionalColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
}

impl TextStyle {
    /// Every field `clear_formatting` resets
    pub const ALL_FIELDS: &'static str = "bold,italic,underline,strikethrough,fontSize,\
        weightedFontFamily,foregroundColor,backgroundColor,link";

    /// Field mask naming exactly the fields that are set
    pub fn fields(&self) -> String {
        let mut fields = Vec::new();
        if self.bold.is_some() {
            fields.push("bold");
        }
        if self.italic.is_some() {
            fields.push("italic");
        }
        if self.underline.is_some() {
            fields.push("underline");
        }
        if self.strikethrough.is_some() {
            fields.push("strikethrough");
        }
        if self.font_size.is_some() {
            fields.push("fontSize");
        }
        if self.weighted_font_family.is_some() {
            fields.push("weightedFontFamily");
        }
        if self.foreground_color.is_some() {
            fields.push("foregroundColor");
        }
        if self.background_color.is_some() {
            fields.push("backgroundColor");
        }
        if self.link.is_some() {
            fields.push("link");
        }
        fields.join(",")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub named_style_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<String>,
    /// Percentage, 100 is single spacing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_spacing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_above: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_below: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent_start: Option<Dimension>,
}

impl ParagraphStyle {
    pub fn fields(&self) -> String {
        [
            ("namedStyleType", self.named_style_type.is_some()),
            ("alignment", self.alignment.is_some()),
            ("lineSpacing", self.line_spacing.is_some()),
            ("spaceAbove", self.space_above.is_some()),
            ("spaceBelow", self.space_below.is_some()),
            ("indentStart", self.indent_start.is_some()),
        ]
        .iter()
        .filter(|(_, set)| *set)
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_text_serialization() {
        let request = Request::InsertText {
            text: "hi".into(),
            target: Target::at(5, Some("t.0")),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"insertText": {"text": "hi", "location": {"index": 5, "tabId": "t.0"}}})
        );

        let request = Request::InsertText {
            text: "tail".into(),
            target: Target::end_of_body(None),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"insertText": {"text": "tail", "endOfSegmentLocation": {}}})
        );
    }

    #[test]
    fn test_from_edit() {
        let delete = EditOperation::Delete {
            range: DocRange::new(3, 7),
        };
        assert_eq!(
            serde_json::to_value(Request::from_edit(&delete, None)).unwrap(),
            json!({"deleteContentRange": {"range": {"startIndex": 3, "endIndex": 7}}})
        );

        let insert = EditOperation::Insert {
            index: 3,
            text: "new".into(),
        };
        assert_eq!(Request::from_edit(&insert, None).kind(), "insertText");
    }

    #[test]
    fn test_text_style_fields() {
        let style = TextStyle {
            bold: Some(true),
            font_size: Some(Dimension::pt(14.0)),
            foreground_color: Some(RgbColor { red: 1.0, green: 0.0, blue: 0.0 }.into()),
            ..Default::default()
        };
        assert_eq!(style.fields(), "bold,fontSize,foregroundColor");
        assert_eq!(
            serde_json::to_value(&style).unwrap(),
            json!({
                "bold": true,
                "fontSize": {"magnitude": 14.0, "unit": "PT"},
                "foregroundColor": {"color": {"rgbColor": {"red": 1.0, "green": 0.0, "blue": 0.0}}}
            })
        );
        assert_eq!(TextStyle::default().fields(), "");
    }

    #[test]
    fn test_paragraph_style_fields() {
        let style = ParagraphStyle {
            named_style_type: Some("HEADING_1".into()),
            space_below: Some(Dimension::pt(6.0)),
            ..Default::default()
        };
        assert_eq!(style.fields(), "namedStyleType,spaceBelow");
    }

    #[test]
    fn test_table_and_header_requests() {
        let request = Request::InsertTableRow {
            table_cell_location: TableCellLocation {
                table_start_location: Location { index: 10, tab_id: None },
                row_index: 1,
                column_index: 0,
            },
            insert_below: true,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"insertTableRow": {
                "tableCellLocation": {"tableStartLocation": {"index": 10}, "rowIndex": 1, "columnIndex": 0},
                "insertBelow": true
            }})
        );

        let request = Request::CreateHeader {
            kind: HeaderFooterType::Default,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"createHeader": {"type": "DEFAULT"}})
        );

        let request = Request::InsertSectionBreak {
            section_type: SectionType::NextPage,
            target: Target::at(4, None),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"insertSectionBreak": {"sectionType": "NEXT_PAGE", "location": {"index": 4}}})
        );
    }
}
