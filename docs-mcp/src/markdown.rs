//! Structured body to Markdown.
//!
//! Works on one tab's `documentTab` object. Headings, bullets (including
//! numbered and checkbox lists), inline styles, links, tables and section
//! breaks are rendered; everything else is reduced to its text.

use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTab {
    #[serde(default)]
    body: Option<Body>,
    #[serde(default)]
    inline_objects: HashMap<String, InlineObject>,
    #[serde(default)]
    lists: HashMap<String, ListDefinition>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Body {
    #[serde(default)]
    content: Vec<StructuralElement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StructuralElement {
    #[serde(default)]
    paragraph: Option<Paragraph>,
    #[serde(default)]
    table: Option<Table>,
    #[serde(default)]
    section_break: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Paragraph {
    #[serde(default)]
    elements: Vec<ParagraphElement>,
    #[serde(default)]
    paragraph_style: Option<ParagraphStyle>,
    #[serde(default)]
    bullet: Option<Bullet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParagraphStyle {
    #[serde(default)]
    named_style_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Bullet {
    #[serde(default)]
    list_id: Option<String>,
    #[serde(default)]
    nesting_level: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParagraphElement {
    #[serde(default)]
    text_run: Option<TextRun>,
    #[serde(default)]
    inline_object_element: Option<InlineObjectElement>,
    #[serde(default)]
    rich_link: Option<RichLink>,
    #[serde(default)]
    person: Option<Person>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TextRun {
    #[serde(default)]
    content: String,
    #[serde(default)]
    text_style: Option<TextStyle>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TextStyle {
    #[serde(default)]
    bold: bool,
    #[serde(default)]
    italic: bool,
    #[serde(default)]
    strikethrough: bool,
    #[serde(default)]
    link: Option<Link>,
    #[serde(default)]
    weighted_font_family: Option<FontFamily>,
}

#[derive(Debug, Deserialize)]
struct Link {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FontFamily {
    #[serde(default)]
    font_family: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineObjectElement {
    #[serde(default)]
    inline_object_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RichLink {
    #[serde(default)]
    rich_link_properties: Option<RichLinkProperties>,
}

#[derive(Debug, Deserialize)]
struct RichLinkProperties {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    uri: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Person {
    #[serde(default)]
    person_properties: Option<PersonProperties>,
}

#[derive(Debug, Deserialize)]
struct PersonProperties {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Table {
    #[serde(default)]
    table_rows: Vec<TableRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TableRow {
    #[serde(default)]
    table_cells: Vec<TableCell>,
}

#[derive(Debug, Deserialize)]
struct TableCell {
    #[serde(default)]
    content: Vec<StructuralElement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineObject {
    #[serde(default)]
    inline_object_properties: Option<InlineObjectProperties>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineObjectProperties {
    #[serde(default)]
    embedded_object: Option<EmbeddedObject>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmbeddedObject {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    image_properties: Option<ImageProperties>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageProperties {
    #[serde(default)]
    content_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDefinition {
    #[serde(default)]
    list_properties: Option<ListProperties>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListProperties {
    #[serde(default)]
    nesting_levels: Vec<NestingLevel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NestingLevel {
    #[serde(default)]
    glyph_type: Option<String>,
}

enum ListKind {
    Unordered,
    Ordered,
    Checkbox,
}

/// Render one tab's body
pub fn tab_to_markdown(tab: &DocumentTab) -> String {
    let Some(body) = &tab.body else {
        return String::new();
    };
    let mut writer = Writer {
        tab,
        counters: HashMap::new(),
    };
    writer.blocks(&body.content)
}

struct Writer<'a> {
    tab: &'a DocumentTab,
    /// Next item number per (list, nesting level)
    counters: HashMap<(String, usize), usize>,
}

impl Writer<'_> {
    fn blocks(&mut self, content: &[StructuralElement]) -> String {
        let mut parts = Vec::new();
        for element in content {
            if let Some(paragraph) = &element.paragraph {
                let md = self.paragraph(paragraph);
                if !md.is_empty() {
                    parts.push(md);
                }
            } else if let Some(table) = &element.table {
                parts.push(self.table(table));
            } else if element.section_break.is_some() && !parts.is_empty() {
                parts.push("\n---\n".to_string());
            }
        }
        parts.join("\n")
    }

    fn paragraph(&mut self, paragraph: &Paragraph) -> String {
        let text: String = paragraph.elements.iter().map(|e| self.inline(e)).collect();
        let text = text.trim();
        if text.is_empty() {
            return String::new();
        }

        let style = paragraph
            .paragraph_style
            .as_ref()
            .and_then(|s| s.named_style_type.as_deref())
            .unwrap_or("NORMAL_TEXT");
        if let Some(level) = heading_level(style) {
            return format!("{} {}\n", "#".repeat(level), text);
        }

        let Some(bullet) = &paragraph.bullet else {
            return format!("{}\n", text);
        };
        let indent = "  ".repeat(bullet.nesting_level);
        match self.list_kind(bullet) {
            ListKind::Checkbox => format!("{}- [ ] {}\n", indent, text),
            ListKind::Unordered => format!("{}- {}\n", indent, text),
            ListKind::Ordered => {
                let key = (bullet.list_id.clone().unwrap_or_default(), bullet.nesting_level);
                let counter = self.counters.entry(key).or_insert(0);
                *counter += 1;
                format!("{}{}. {}\n", indent, counter, text)
            }
        }
    }

    fn list_kind(&self, bullet: &Bullet) -> ListKind {
        let glyph = bullet
            .list_id
            .as_ref()
            .and_then(|id| self.tab.lists.get(id))
            .and_then(|list| list.list_properties.as_ref())
            .and_then(|props| props.nesting_levels.get(bullet.nesting_level))
            .and_then(|level| level.glyph_type.as_deref());
        match glyph {
            Some("GLYPH_TYPE_UNSPECIFIED") => ListKind::Checkbox,
            Some("DECIMAL" | "ZERO_DECIMAL" | "UPPER_ALPHA" | "ALPHA" | "UPPER_ROMAN" | "ROMAN") => {
                ListKind::Ordered
            }
            _ => ListKind::Unordered,
        }
    }

    fn inline(&self, element: &ParagraphElement) -> String {
        if let Some(run) = &element.text_run {
            return text_run(run);
        }
        if let Some(object_id) = element
            .inline_object_element
            .as_ref()
            .and_then(|e| e.inline_object_id.as_deref())
        {
            return self.image(object_id);
        }
        if let Some(props) = element.rich_link.as_ref().and_then(|l| l.rich_link_properties.as_ref()) {
            let title = props.title.as_deref().unwrap_or("");
            let uri = props.uri.as_deref().unwrap_or("");
            return match (title.is_empty(), uri.is_empty()) {
                (false, false) => format!("[{}]({})", title, uri),
                (true, false) => format!("<{}>", uri),
                _ => title.to_string(),
            };
        }
        if let Some(props) = element.person.as_ref().and_then(|p| p.person_properties.as_ref()) {
            if let Some(name) = props.name.as_deref().or(props.email.as_deref()) {
                return format!("@{}", name);
            }
        }
        String::new()
    }

    fn image(&self, object_id: &str) -> String {
        let Some(embedded) = self
            .tab
            .inline_objects
            .get(object_id)
            .and_then(|o| o.inline_object_properties.as_ref())
            .and_then(|p| p.embedded_object.as_ref())
        else {
            return String::new();
        };
        let alt = embedded
            .description
            .as_deref()
            .or(embedded.title.as_deref())
            .unwrap_or("image");
        match embedded.image_properties.as_ref().and_then(|p| p.content_uri.as_deref()) {
            Some(uri) => format!("![{}]({})", alt, uri),
            None => format!("![{}](object:{})", alt, object_id),
        }
    }

    fn table(&mut self, table: &Table) -> String {
        let mut rows = Vec::new();
        for (i, row) in table.table_rows.iter().enumerate() {
            let cells: Vec<String> = row
                .table_cells
                .iter()
                .map(|cell| {
                    self.blocks(&cell.content)
                        .split_whitespace()
                        .collect::<Vec<_>>()
                        .join(" ")
                        .replace('|', "\\|")
                })
                .collect();
            rows.push(format!("| {} |", cells.join(" | ")));
            if i == 0 {
                rows.push(format!("|{}", " --- |".repeat(cells.len())));
            }
        }
        if rows.is_empty() {
            return String::new();
        }
        rows.join("\n") + "\n"
    }
}

fn text_run(run: &TextRun) -> String {
    let content = run.content.trim_end_matches('\n');
    if content.trim().is_empty() {
        return content.to_string();
    }
    let default_style = TextStyle::default();
    let style = run.text_style.as_ref().unwrap_or(&default_style);

    // Markers must hug the text, so surrounding spaces stay outside them
    let leading = &content[..content.len() - content.trim_start().len()];
    let trailing = &content[content.trim_end().len()..];
    let mut text = content.trim().to_string();

    let monospace = style
        .weighted_font_family
        .as_ref()
        .and_then(|f| f.font_family.as_deref())
        .map(|family| {
            let family = family.to_lowercase();
            ["courier", "consolas", "monaco", "mono"].iter().any(|m| family.contains(m))
        })
        .unwrap_or(false);
    if monospace {
        text = format!("`{}`", text);
    }
    if style.bold {
        text = format!("**{}**", text);
    }
    if style.italic {
        text = format!("*{}*", text);
    }
    if style.strikethrough {
        text = format!("~~{}~~", text);
    }
    if let Some(url) = style.link.as_ref().and_then(|l| l.url.as_deref()) {
        text = format!("[{}]({})", text, url);
    }
    format!("{}{}{}", leading, text, trailing)
}

fn heading_level(named_style: &str) -> Option<usize> {
    match named_style {
        "TITLE" | "HEADING_1" => Some(1),
        "SUBTITLE" | "HEADING_2" => Some(2),
        "HEADING_3" => Some(3),
        "HEADING_4" => Some(4),
        "HEADING_5" => Some(5),
        "HEADING_6" => Some(6),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(tab: serde_json::Value) -> String {
        let tab: DocumentTab = serde_json::from_value(tab).unwrap();
        tab_to_markdown(&tab)
    }

    fn para(text: &str) -> serde_json::Value {
        json!({"paragraph": {"elements": [{"textRun": {"content": text}}]}})
    }

    #[test]
    fn test_headings_and_styles() {
        let md = render(json!({"body": {"content": [
            {"sectionBreak": {}},
            {"paragraph": {
                "paragraphStyle": {"namedStyleType": "HEADING_2"},
                "elements": [{"textRun": {"content": "Plan\n"}}]
            }},
            {"paragraph": {"elements": [
                {"textRun": {"content": "Say "}},
                {"textRun": {"content": "hello ", "textStyle": {"bold": true}}},
                {"textRun": {"content": "here", "textStyle": {"link": {"url": "https://x.y"}}}},
                {"textRun": {"content": "\n"}}
            ]}}
        ]}}));
        assert_eq!(md, "## Plan\n\nSay **hello** [here](https://x.y)\n");
    }

    #[test]
    fn test_lists() {
        let md = render(json!({
            "lists": {
                "num": {"listProperties": {"nestingLevels": [{"glyphType": "DECIMAL"}]}},
                "todo": {"listProperties": {"nestingLevels": [{"glyphType": "GLYPH_TYPE_UNSPECIFIED"}]}}
            },
            "body": {"content": [
                {"paragraph": {"bullet": {"listId": "num"}, "elements": [{"textRun": {"content": "one\n"}}]}},
                {"paragraph": {"bullet": {"listId": "num"}, "elements": [{"textRun": {"content": "two\n"}}]}},
                {"paragraph": {"bullet": {"listId": "todo"}, "elements": [{"textRun": {"content": "task\n"}}]}},
                {"paragraph": {"bullet": {"listId": "other", "nestingLevel": 1}, "elements": [{"textRun": {"content": "dot\n"}}]}}
            ]}
        }));
        assert_eq!(md, "1. one\n\n2. two\n\n- [ ] task\n\n  - dot\n");
    }

    #[test]
    fn test_table_and_image() {
        let md = render(json!({
            "inlineObjects": {"kix.1": {"inlineObjectProperties": {"embeddedObject": {
                "title": "Logo",
                "imageProperties": {"contentUri": "https://img/1"}
            }}}},
            "body": {"content": [
                {"table": {"tableRows": [
                    {"tableCells": [{"content": [para("a|b\n")]}, {"content": [para("c\n")]}]},
                    {"tableCells": [{"content": [para("1\n")]}, {"content": [para("2\n")]}]}
                ]}},
                {"paragraph": {"elements": [{"inlineObjectElement": {"inlineObjectId": "kix.1"}}]}}
            ]}
        }));
        assert_eq!(md, "| a\\|b | c |\n| --- | --- |\n| 1 | 2 |\n\n![Logo](https://img/1)\n");
    }

    #[test]
    fn test_empty_tab() {
        assert_eq!(render(json!({})), "");
    }
}
