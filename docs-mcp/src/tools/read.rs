//! Read tools: document content, tabs and text statistics.

use rmcp::model::JsonObject;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{fetch_document, parse_args, GoogleDocsServer, ToolOutput, ToolResult};
use crate::google_api::GoogleDocsClient;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
enum ReadFormat {
    #[default]
    Text,
    Markdown,
    Json,
}

#[derive(Debug, Deserialize)]
struct ReadArgs {
    document_id: String,
    #[serde(default)]
    format: ReadFormat,
    tab_id: Option<String>,
    max_length: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct DocumentArgs {
    document_id: String,
    tab_id: Option<String>,
}

/// Cut `content` to at most `max` characters, on a char boundary
fn truncate(content: &mut String, max: Option<usize>) -> bool {
    let Some(max) = max else {
        return false;
    };
    match content.char_indices().nth(max) {
        Some((cut, _)) => {
            content.truncate(cut);
            true
        }
        None => false,
    }
}

impl GoogleDocsServer {
    pub(super) async fn read_document(&self, client: &GoogleDocsClient, args: JsonObject) -> ToolResult {
        let args: ReadArgs = parse_args(args)?;
        let doc = fetch_document(client, &args.document_id).await?;
        let tab_id = args.tab_id.as_deref();

        let mut content = match args.format {
            ReadFormat::Text => doc.flat(tab_id)?.text().to_string(),
            ReadFormat::Markdown => doc.markdown(tab_id)?,
            ReadFormat::Json => serde_json::to_string_pretty(doc.tab(tab_id)?)?,
        };
        let full_length = content.chars().count();
        let truncated = truncate(&mut content, args.max_length);

        let mut text = format!("# {}\n\n{}", doc.title, content);
        if truncated {
            text.push_str(&format!(
                "\n\n[Truncated to {} of {} characters]",
                content.chars().count(),
                full_length
            ));
        }
        Ok(ToolOutput::new(
            text,
            json!({
                "document_id": doc.document_id,
                "title": doc.title,
                "revision_id": doc.revision_id,
                "tab_id": args.tab_id,
                "format": args.format,
                "content": content,
                "length": full_length,
                "truncated": truncated,
            }),
        ))
    }

    pub(super) async fn list_document_tabs(&self, client: &GoogleDocsClient, args: JsonObject) -> ToolResult {
        let args: DocumentArgs = parse_args(args)?;
        let doc = fetch_document(client, &args.document_id).await?;
        let tabs = doc.list_tabs()?;

        let mut lines = vec![format!("'{}' has {} tab(s):", doc.title, tabs.len())];
        for tab in &tabs {
            lines.push(format!(
                "{}- {}{} (tab_id: {})",
                "  ".repeat(tab.nesting_level),
                tab.icon.as_deref().map(|i| format!("{} ", i)).unwrap_or_default(),
                tab.title,
                tab.tab_id
            ));
        }
        Ok(ToolOutput::new(
            lines.join("\n"),
            json!({ "document_id": doc.document_id, "tabs": tabs }),
        ))
    }

    pub(super) async fn get_word_count(&self, client: &GoogleDocsClient, args: JsonObject) -> ToolResult {
        let args: DocumentArgs = parse_args(args)?;
        let doc = fetch_document(client, &args.document_id).await?;
        let stats = docs_index::text_stats(doc.flat(args.tab_id.as_deref())?.text());

        Ok(ToolOutput::new(
            format!(
                "'{}': {} words, {} characters ({} without spaces), {} paragraphs",
                doc.title, stats.words, stats.characters, stats.characters_no_spaces, stats.paragraphs
            ),
            json!({ "document_id": doc.document_id, "tab_id": args.tab_id, "stats": stats }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        let mut s = "héllo wörld".to_string();
        assert!(!truncate(&mut s, None));
        assert!(!truncate(&mut s, Some(11)));
        assert!(truncate(&mut s, Some(7)));
        assert_eq!(s, "héllo w");
    }

    #[test]
    fn test_read_args_defaults() {
        let args: ReadArgs = serde_json::from_value(json!({"document_id": "x"})).unwrap();
        assert_eq!(args.format, ReadFormat::Text);
        let args: ReadArgs =
            serde_json::from_value(json!({"document_id": "x", "format": "markdown", "max_length": 10})).unwrap();
        assert_eq!(args.format, ReadFormat::Markdown);
        assert_eq!(args.max_length, Some(10));
        assert!(serde_json::from_value::<ReadArgs>(json!({"document_id": "x", "format": "html"})).is_err());
    }
}
