//! Tool definitions advertised by `list_tools`

use rmcp::model::Tool;
use serde_json::{json, Value};
use std::sync::Arc;

fn make_schema(value: Value) -> Arc<serde_json::Map<String, Value>> {
    match value {
        Value::Object(map) => Arc::new(map),
        _ => Arc::new(serde_json::Map::new()),
    }
}

fn tool(name: &'static str, description: &'static str, properties: Value, required: &[&str]) -> Tool {
    Tool {
        name: name.into(),
        title: None,
        description: Some(description.into()),
        input_schema: make_schema(json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })),
        annotations: None,
        output_schema: None,
        icons: None,
        meta: None,
    }
}

fn document_id() -> Value {
    json!({
        "type": "string",
        "description": "Google Doc ID or full docs.google.com URL"
    })
}

fn tab_id() -> Value {
    json!({
        "type": "string",
        "description": "Tab ID from list_document_tabs (default: first tab)"
    })
}

fn index(description: &str) -> Value {
    json!({ "type": "integer", "minimum": 1, "description": description })
}

fn start_index() -> Value {
    index("Start of the range (inclusive, UTF-16 units from 1)")
}

fn end_index() -> Value {
    index("End of the range (exclusive)")
}

fn limit() -> Value {
    json!({
        "type": "integer",
        "minimum": 1,
        "description": "Maximum number of documents to return (default: 20, max: 100)"
    })
}

fn table_cell(extra_name: &str, extra: Value) -> Value {
    let mut properties = json!({
        "document_id": document_id(),
        "table_start_index": index("Index where the table starts (from search or read_document json)"),
        "row_index": { "type": "integer", "minimum": 0, "description": "Zero-based row (default: 0)" },
        "column_index": { "type": "integer", "minimum": 0, "description": "Zero-based column (default: 0)" },
        "tab_id": tab_id(),
    });
    if let Some(map) = properties.as_object_mut() {
        if !extra.is_null() {
            map.insert(extra_name.to_string(), extra);
        }
    }
    properties
}

pub(super) fn tools() -> Vec<Tool> {
    let mut tools = drive_tools();
    tools.extend(read_tools());
    tools.extend(text_tools());
    tools.extend(format_tools());
    tools.extend(structure_tools());
    tools.extend(table_tools());
    tools.push(tool(
        "insert_image",
        "Insert an image from a public http(s) URL",
        json!({
            "document_id": document_id(),
            "image_url": { "type": "string", "description": "Publicly reachable http or https image URL" },
            "index": index("Insertion index (default: end of document)"),
            "width_pt": { "type": "number", "exclusiveMinimum": 0, "description": "Width in points" },
            "height_pt": { "type": "number", "exclusiveMinimum": 0, "description": "Height in points" },
            "tab_id": tab_id(),
        }),
        &["document_id", "image_url"],
    ));
    tools
}

fn drive_tools() -> Vec<Tool> {
    vec![
        tool(
            "list_documents",
            "List Google Docs from the user's Drive, most recently modified first",
            json!({
                "query": { "type": "string", "description": "Optional full-text filter" },
                "limit": limit(),
                "order_by": {
                    "type": "string",
                    "enum": ["modifiedTime desc", "modifiedTime", "createdTime desc", "createdTime", "name", "name desc"],
                    "default": "modifiedTime desc"
                }
            }),
            &[],
        ),
        tool(
            "search_documents",
            "Search Google Docs by name and/or content",
            json!({
                "query": { "type": "string", "description": "Text to search for" },
                "search_in": { "type": "string", "enum": ["name", "content", "both"], "default": "both" },
                "limit": limit(),
            }),
            &["query"],
        ),
        tool(
            "get_document_info",
            "Get title, revision, owners and timestamps of a Google Doc",
            json!({ "document_id": document_id() }),
            &["document_id"],
        ),
        tool(
            "create_document",
            "Create a new Google Doc, optionally with initial text",
            json!({
                "title": { "type": "string" },
                "initial_text": { "type": "string", "description": "Text to place in the new document" },
            }),
            &["title"],
        ),
        tool(
            "copy_document",
            "Copy a Google Doc under a new title",
            json!({ "document_id": document_id(), "title": { "type": "string" } }),
            &["document_id", "title"],
        ),
        tool(
            "rename_document",
            "Rename a Google Doc",
            json!({ "document_id": document_id(), "title": { "type": "string" } }),
            &["document_id", "title"],
        ),
        tool(
            "delete_document",
            "Move a Google Doc to the trash",
            json!({ "document_id": document_id() }),
            &["document_id"],
        ),
    ]
}

fn read_tools() -> Vec<Tool> {
    vec![
        tool(
            "read_document",
            "Read a Google Doc tab as plain text, markdown, or the raw API JSON (which carries indices)",
            json!({
                "document_id": document_id(),
                "format": { "type": "string", "enum": ["text", "markdown", "json"], "default": "text" },
                "tab_id": tab_id(),
                "max_length": { "type": "integer", "minimum": 1, "description": "Truncate content to this many characters" },
            }),
            &["document_id"],
        ),
        tool(
            "list_document_tabs",
            "List the tabs of a Google Doc, including nested tabs",
            json!({ "document_id": document_id() }),
            &["document_id"],
        ),
        tool(
            "get_word_count",
            "Count words, characters and paragraphs in a Google Doc tab",
            json!({ "document_id": document_id(), "tab_id": tab_id() }),
            &["document_id"],
        ),
    ]
}

fn text_tools() -> Vec<Tool> {
    vec![
        tool(
            "search_text_in_document",
            "Find text in a document. Returns each match's start_index/end_index for use with the \
            editing and formatting tools, plus surrounding context. Matches spanning images or other \
            non-text content have null indices.",
            json!({
                "document_id": document_id(),
                "query": { "type": "string" },
                "match_case": { "type": "boolean", "default": false },
                "max_results": { "type": "integer", "minimum": 1, "default": 50 },
                "context_chars": { "type": "integer", "minimum": 0, "default": 40 },
                "start_index": index("Only search from this index (requires end_index)"),
                "end_index": index("Only search up to this index (requires start_index)"),
                "tab_id": tab_id(),
            }),
            &["document_id", "query"],
        ),
        tool(
            "find_and_replace",
            "Replace text in a document in one atomic update. Matches spanning non-text content are \
            skipped and reported.",
            json!({
                "document_id": document_id(),
                "find": { "type": "string" },
                "replace": { "type": "string", "description": "Replacement (empty deletes the matches)" },
                "match_case": { "type": "boolean", "default": false },
                "replace_all": { "type": "boolean", "default": false, "description": "Replace every match instead of only the first" },
                "tab_id": tab_id(),
            }),
            &["document_id", "find", "replace"],
        ),
        tool(
            "insert_text",
            "Insert text at an index, or at the end of the document",
            json!({
                "document_id": document_id(),
                "text": { "type": "string" },
                "index": index("Insertion index (default: end of document)"),
                "tab_id": tab_id(),
            }),
            &["document_id", "text"],
        ),
        tool(
            "append_text",
            "Append text to the end of the document",
            json!({
                "document_id": document_id(),
                "text": { "type": "string" },
                "add_newline": { "type": "boolean", "default": true, "description": "Start a new paragraph first" },
                "tab_id": tab_id(),
            }),
            &["document_id", "text"],
        ),
        tool(
            "delete_range",
            "Delete the content between two indices",
            json!({
                "document_id": document_id(),
                "start_index": start_index(),
                "end_index": end_index(),
                "tab_id": tab_id(),
            }),
            &["document_id", "start_index", "end_index"],
        ),
        tool(
            "transform_case",
            "Change the case of the text in a range",
            json!({
                "document_id": document_id(),
                "start_index": start_index(),
                "end_index": end_index(),
                "case": { "type": "string", "enum": ["upper", "lower", "title", "sentence"] },
                "tab_id": tab_id(),
            }),
            &["document_id", "start_index", "end_index", "case"],
        ),
    ]
}

fn format_tools() -> Vec<Tool> {
    vec![
        tool(
            "format_text",
            "Apply character formatting to a range. Only the options given are changed.",
            json!({
                "document_id": document_id(),
                "start_index": start_index(),
                "end_index": end_index(),
                "bold": { "type": "boolean" },
                "italic": { "type": "boolean" },
                "underline": { "type": "boolean" },
                "strikethrough": { "type": "boolean" },
                "font_size": { "type": "number", "exclusiveMinimum": 0, "description": "Points" },
                "font_family": { "type": "string" },
                "foreground_color": { "type": "string", "description": "#RRGGBB" },
                "background_color": { "type": "string", "description": "#RRGGBB" },
                "link_url": { "type": "string", "description": "http(s) URL to link the text to" },
                "tab_id": tab_id(),
            }),
            &["document_id", "start_index", "end_index"],
        ),
        tool(
            "format_paragraph",
            "Apply paragraph style to the paragraphs overlapping a range",
            json!({
                "document_id": document_id(),
                "start_index": start_index(),
                "end_index": end_index(),
                "named_style": {
                    "type": "string",
                    "enum": ["NORMAL_TEXT", "TITLE", "SUBTITLE", "HEADING_1", "HEADING_2", "HEADING_3", "HEADING_4", "HEADING_5", "HEADING_6"]
                },
                "alignment": { "type": "string", "enum": ["START", "CENTER", "END", "JUSTIFIED"] },
                "line_spacing": { "type": "number", "description": "Percent, 100 is single spacing" },
                "space_above": { "type": "number", "minimum": 0, "description": "Points" },
                "space_below": { "type": "number", "minimum": 0, "description": "Points" },
                "indent_start": { "type": "number", "minimum": 0, "description": "Points" },
                "tab_id": tab_id(),
            }),
            &["document_id", "start_index", "end_index"],
        ),
        tool(
            "clear_formatting",
            "Reset character formatting in a range to the paragraph defaults",
            json!({
                "document_id": document_id(),
                "start_index": start_index(),
                "end_index": end_index(),
                "tab_id": tab_id(),
            }),
            &["document_id", "start_index", "end_index"],
        ),
    ]
}

fn structure_tools() -> Vec<Tool> {
    vec![
        tool(
            "insert_page_break",
            "Insert a page break at an index",
            json!({ "document_id": document_id(), "index": index("Insertion index"), "tab_id": tab_id() }),
            &["document_id", "index"],
        ),
        tool(
            "insert_section_break",
            "Insert a section break at an index",
            json!({
                "document_id": document_id(),
                "index": index("Insertion index"),
                "section_type": { "type": "string", "enum": ["continuous", "next_page"], "default": "next_page" },
                "tab_id": tab_id(),
            }),
            &["document_id", "index"],
        ),
        tool(
            "create_bullet_list",
            "Turn the paragraphs in a range into a bulleted, numbered or checkbox list",
            json!({
                "document_id": document_id(),
                "start_index": start_index(),
                "end_index": end_index(),
                "preset": {
                    "type": "string",
                    "description": "bullet, numbered, checkbox, or a Docs preset such as NUMBERED_DECIMAL_NESTED"
                },
                "tab_id": tab_id(),
            }),
            &["document_id", "start_index", "end_index"],
        ),
        tool(
            "remove_bullet_list",
            "Remove list bullets from the paragraphs in a range",
            json!({
                "document_id": document_id(),
                "start_index": start_index(),
                "end_index": end_index(),
                "tab_id": tab_id(),
            }),
            &["document_id", "start_index", "end_index"],
        ),
        tool(
            "create_header",
            "Add a default header to the document",
            json!({ "document_id": document_id() }),
            &["document_id"],
        ),
        tool(
            "create_footer",
            "Add a default footer to the document",
            json!({ "document_id": document_id() }),
            &["document_id"],
        ),
    ]
}

fn table_tools() -> Vec<Tool> {
    let dimension = |what: &str| json!({ "type": "integer", "minimum": 1, "maximum": 20, "description": what });
    vec![
        tool(
            "insert_table",
            "Insert an empty table (up to 20 x 20)",
            json!({
                "document_id": document_id(),
                "rows": dimension("Number of rows"),
                "columns": dimension("Number of columns"),
                "index": index("Insertion index (default: end of document)"),
                "tab_id": tab_id(),
            }),
            &["document_id", "rows", "columns"],
        ),
        tool(
            "insert_table_row",
            "Insert a row above or below a table cell",
            table_cell("below", json!({ "type": "boolean", "default": true })),
            &["document_id", "table_start_index"],
        ),
        tool(
            "insert_table_column",
            "Insert a column left or right of a table cell",
            table_cell("right", json!({ "type": "boolean", "default": true })),
            &["document_id", "table_start_index"],
        ),
        tool(
            "delete_table_row",
            "Delete the row containing a table cell",
            table_cell("", Value::Null),
            &["document_id", "table_start_index"],
        ),
        tool(
            "delete_table_column",
            "Delete the column containing a table cell",
            table_cell("", Value::Null),
            &["document_id", "table_start_index"],
        ),
    ]
}
