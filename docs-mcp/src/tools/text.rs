//! Text search and edit tools, built on the document text index.

use anyhow::bail;
use docs_index::units::utf16_len;
use docs_index::{plan_case_change, DocRange, EditOperation, FindOptions, FlatDocument, Match, TextCase};
use rmcp::model::JsonObject;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use super::{fetch_document, parse_args, GoogleDocsServer, ToolOutput, ToolResult};
use crate::google_api::GoogleDocsClient;
use crate::requests::{Request, Target};
use crate::validation;

const DEFAULT_CONTEXT_CHARS: usize = 40;
const DEFAULT_MAX_RESULTS: usize = 50;

fn yes() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct SearchArgs {
    document_id: String,
    query: String,
    #[serde(default)]
    match_case: bool,
    max_results: Option<usize>,
    context_chars: Option<usize>,
    start_index: Option<usize>,
    end_index: Option<usize>,
    tab_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReplaceArgs {
    document_id: String,
    find: String,
    replace: String,
    #[serde(default)]
    match_case: bool,
    #[serde(default)]
    replace_all: bool,
    tab_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InsertArgs {
    document_id: String,
    text: String,
    index: Option<usize>,
    tab_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AppendArgs {
    document_id: String,
    text: String,
    #[serde(default = "yes")]
    add_newline: bool,
    tab_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RangeArgs {
    document_id: String,
    start_index: usize,
    end_index: usize,
    tab_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaseArgs {
    document_id: String,
    start_index: usize,
    end_index: usize,
    case: TextCase,
    tab_id: Option<String>,
}

/// A search hit as reported to the model
#[derive(Debug, Serialize, PartialEq)]
struct Hit {
    flat_start: usize,
    flat_end: usize,
    /// `None` when the hit spans non-text content and cannot be edited
    start_index: Option<usize>,
    end_index: Option<usize>,
    text: String,
    context: String,
}

fn hits(doc: &FlatDocument, matches: &[Match], context_chars: usize) -> anyhow::Result<Vec<Hit>> {
    matches
        .iter()
        .map(|m| {
            Ok(Hit {
                flat_start: m.flat.start,
                flat_end: m.flat.end,
                start_index: m.doc.map(|d| d.start),
                end_index: m.doc.map(|d| d.end),
                text: doc.slice(m.flat)?.to_string(),
                context: doc.context(m.flat, context_chars)?,
            })
        })
        .collect()
}

fn edit_requests(operations: &[EditOperation], tab_id: Option<&str>) -> Vec<Request> {
    operations.iter().map(|op| Request::from_edit(op, tab_id)).collect()
}

fn scope(start: Option<usize>, end: Option<usize>) -> anyhow::Result<Option<DocRange>> {
    match (start, end) {
        (None, None) => Ok(None),
        (Some(start), Some(end)) => Ok(Some(validation::index_range(start, end)?)),
        _ => bail!("start_index and end_index must be given together"),
    }
}

fn non_empty<'a>(name: &str, text: &'a str) -> anyhow::Result<&'a str> {
    if text.is_empty() {
        bail!("{}: must not be empty", name);
    }
    Ok(text)
}

impl GoogleDocsServer {
    pub(super) async fn search_text_in_document(&self, client: &GoogleDocsClient, args: JsonObject) -> ToolResult {
        let args: SearchArgs = parse_args(args)?;
        let within = scope(args.start_index, args.end_index)?;
        let doc = fetch_document(client, &args.document_id).await?;
        let flat = doc.flat(args.tab_id.as_deref())?;

        let options = FindOptions {
            case_sensitive: args.match_case,
            within,
            max_results: Some(args.max_results.unwrap_or(DEFAULT_MAX_RESULTS)),
        };
        let matches = flat.find(&args.query, options)?;
        let hits = hits(&flat, &matches, args.context_chars.unwrap_or(DEFAULT_CONTEXT_CHARS))?;

        let mut lines = vec![format!("Found {} match(es) for '{}' in '{}'", hits.len(), args.query, doc.title)];
        for hit in &hits {
            let location = match (hit.start_index, hit.end_index) {
                (Some(start), Some(end)) => format!("{}-{}", start, end),
                _ => "spans non-text content".to_string(),
            };
            lines.push(format!("- [{}] ...{}...", location, hit.context));
        }
        Ok(ToolOutput::new(
            lines.join("\n"),
            json!({
                "document_id": doc.document_id,
                "query": args.query,
                "match_case": args.match_case,
                "count": hits.len(),
                "matches": hits,
            }),
        ))
    }

    pub(super) async fn find_and_replace(&self, client: &GoogleDocsClient, args: JsonObject) -> ToolResult {
        let args: ReplaceArgs = parse_args(args)?;
        let doc = fetch_document(client, &args.document_id).await?;
        let tab_id = args.tab_id.as_deref();
        let flat = doc.flat(tab_id)?;

        let plan = flat.plan_replace(&args.find, &args.replace, args.match_case, args.replace_all)?;
        if !plan.skipped.is_empty() {
            warn!(
                "find_and_replace: {} match(es) of '{}' span non-text content and were skipped",
                plan.skipped.len(),
                args.find
            );
        }

        let requests = edit_requests(&plan.operations, tab_id);
        if !requests.is_empty() {
            client
                .batch_update_at(&doc.document_id, &requests, doc.revision_id.as_deref())
                .await?;
        }
        info!("find_and_replace: applied {} replacement(s) in {}", plan.applied, doc.document_id);

        let mut text = match plan.applied {
            0 => format!("No replaceable occurrences of '{}' found", args.find),
            n => format!("Replaced {} occurrence(s) of '{}' with '{}'", n, args.find, args.replace),
        };
        if !plan.skipped.is_empty() {
            text.push_str(&format!(
                " ({} skipped because they span non-text content)",
                plan.skipped.len()
            ));
        }
        Ok(ToolOutput::new(
            text,
            json!({
                "document_id": doc.document_id,
                "applied": plan.applied,
                "skipped": plan.skipped,
                "requests_sent": requests.len(),
            }),
        ))
    }

    pub(super) async fn insert_text(&self, client: &GoogleDocsClient, args: JsonObject) -> ToolResult {
        let args: InsertArgs = parse_args(args)?;
        let document_id = validation::document_id(&args.document_id)?;
        let text = non_empty("text", &args.text)?;
        let index = args.index.map(|i| validation::index("index", i)).transpose()?;

        let request = Request::InsertText {
            text: text.to_string(),
            target: Target::at_or_end(index, args.tab_id.as_deref()),
        };
        client.batch_update(&document_id, &[request]).await?;

        let location = index.map_or("the end of the document".to_string(), |i| format!("index {}", i));
        Ok(ToolOutput::new(
            format!("Inserted {} characters at {}", text.chars().count(), location),
            json!({ "document_id": document_id, "index": index, "length": utf16_len(text) }),
        ))
    }

    pub(super) async fn append_text(&self, client: &GoogleDocsClient, args: JsonObject) -> ToolResult {
        let args: AppendArgs = parse_args(args)?;
        let document_id = validation::document_id(&args.document_id)?;
        let text = non_empty("text", &args.text)?;
        let text = if args.add_newline { format!("\n{}", text) } else { text.to_string() };

        let request = Request::InsertText {
            text: text.clone(),
            target: Target::end_of_body(args.tab_id.as_deref()),
        };
        client.batch_update(&document_id, &[request]).await?;

        Ok(ToolOutput::new(
            format!("Appended {} characters", text.chars().count()),
            json!({ "document_id": document_id, "length": utf16_len(&text) }),
        ))
    }

    pub(super) async fn delete_range(&self, client: &GoogleDocsClient, args: JsonObject) -> ToolResult {
        let args: RangeArgs = parse_args(args)?;
        let range = validation::index_range(args.start_index, args.end_index)?;
        let document_id = validation::document_id(&args.document_id)?;

        let request = Request::from_edit(&EditOperation::Delete { range }, args.tab_id.as_deref());
        client.batch_update(&document_id, &[request]).await?;

        Ok(ToolOutput::new(
            format!("Deleted {} characters ({}-{})", range.len(), range.start, range.end),
            json!({ "document_id": document_id, "start_index": range.start, "end_index": range.end }),
        ))
    }

    pub(super) async fn transform_case(&self, client: &GoogleDocsClient, args: JsonObject) -> ToolResult {
        let args: CaseArgs = parse_args(args)?;
        let range = validation::index_range(args.start_index, args.end_index)?;
        let doc = fetch_document(client, &args.document_id).await?;
        let tab_id = args.tab_id.as_deref();
        let flat = doc.flat(tab_id)?;

        let operations = plan_case_change(&flat, range, args.case)?;
        let requests = edit_requests(&operations, tab_id);
        if !requests.is_empty() {
            client
                .batch_update_at(&doc.document_id, &requests, doc.revision_id.as_deref())
                .await?;
        }

        let text = if requests.is_empty() {
            format!("Text in {}-{} already has the requested case", range.start, range.end)
        } else {
            format!("Changed case of {} segment(s) in {}-{}", requests.len() / 2, range.start, range.end)
        };
        Ok(ToolOutput::new(
            text,
            json!({
                "document_id": doc.document_id,
                "start_index": range.start,
                "end_index": range.end,
                "requests_sent": requests.len(),
            }),
        ))
    }
}
