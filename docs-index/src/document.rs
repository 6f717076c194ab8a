//! Structural content as the Docs API returns it.
//!
//! Only what extraction needs is modelled; every other field in the API
//! response is ignored by serde. All indices are UTF-16 code units.

use serde::Deserialize;

/// A segment body (document body, header, footer or footnote)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    #[serde(default)]
    pub content: Vec<StructuralElement>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralElement {
    #[serde(default)]
    pub start_index: Option<usize>,
    #[serde(default)]
    pub end_index: Option<usize>,
    #[serde(default)]
    pub paragraph: Option<Paragraph>,
    #[serde(default)]
    pub table: Option<Table>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    #[serde(default)]
    pub elements: Vec<ParagraphElement>,
}

/// An inline element. Only `text_run` contributes flat text; inline objects,
/// page breaks, equations and the like still occupy index space.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphElement {
    #[serde(default)]
    pub start_index: Option<usize>,
    #[serde(default)]
    pub end_index: Option<usize>,
    #[serde(default)]
    pub text_run: Option<TextRunPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRunPayload {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[serde(default)]
    pub table_rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    #[serde(default)]
    pub table_cells: Vec<TableCell>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    #[serde(default)]
    pub content: Vec<StructuralElement>,
}

impl ParagraphElement {
    /// Convenience constructor for a text run at `start_index`
    pub fn text(start_index: usize, content: &str) -> Self {
        Self {
            start_index: Some(start_index),
            end_index: Some(start_index + crate::units::utf16_len(content)),
            text_run: Some(TextRunPayload {
                content: Some(content.to_string()),
            }),
        }
    }

    /// A non-text element (image, break) occupying `len` index units
    pub fn object(start_index: usize, len: usize) -> Self {
        Self {
            start_index: Some(start_index),
            end_index: Some(start_index + len),
            text_run: None,
        }
    }
}

impl StructuralElement {
    /// A paragraph block spanning its elements
    pub fn paragraph(elements: Vec<ParagraphElement>) -> Self {
        let start_index = elements.first().and_then(|e| e.start_index);
        let end_index = elements.last().and_then(|e| e.end_index);
        Self {
            start_index,
            end_index,
            paragraph: Some(Paragraph { elements }),
            table: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_api_shape() {
        let json = serde_json::json!({
            "content": [
                { "endIndex": 1, "sectionBreak": { "sectionStyle": {} } },
                {
                    "startIndex": 1,
                    "endIndex": 13,
                    "paragraph": {
                        "elements": [
                            { "startIndex": 1, "endIndex": 7, "textRun": { "content": "Hello ", "textStyle": {} } },
                            { "startIndex": 7, "endIndex": 8, "inlineObjectElement": { "inlineObjectId": "kix.1" } },
                            { "startIndex": 8, "endIndex": 13, "textRun": { "content": "there" } }
                        ],
                        "paragraphStyle": { "namedStyleType": "NORMAL_TEXT" }
                    }
                }
            ]
        });

        let body: Body = serde_json::from_value(json).unwrap();
        assert_eq!(body.content.len(), 2);
        let paragraph = body.content[1].paragraph.as_ref().unwrap();
        assert_eq!(paragraph.elements.len(), 3);
        assert!(paragraph.elements[1].text_run.is_none());
        assert_eq!(body.content[1].end_index, Some(13));
    }
}
