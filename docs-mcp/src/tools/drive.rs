//! Drive-level tools: listing, search, metadata and file lifecycle.

use anyhow::bail;
use rmcp::model::JsonObject;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::{parse_args, GoogleDocsServer, ToolOutput, ToolResult};
use crate::google_api::{document_url, DriveFile, GoogleDocsClient, SearchIn};
use crate::requests::{Request, Target};
use crate::validation;

const ORDER_BY: &[&str] = &[
    "modifiedTime desc",
    "modifiedTime",
    "createdTime desc",
    "createdTime",
    "name",
    "name desc",
];

#[derive(Debug, Deserialize)]
struct ListArgs {
    query: Option<String>,
    limit: Option<usize>,
    order_by: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchArgs {
    query: String,
    #[serde(default)]
    search_in: SearchIn,
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct DocumentArgs {
    document_id: String,
}

#[derive(Debug, Deserialize)]
struct CreateArgs {
    title: String,
    initial_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TitleArgs {
    document_id: String,
    title: String,
}

fn title(value: &str) -> anyhow::Result<&str> {
    let value = value.trim();
    if value.is_empty() {
        bail!("title: must not be empty");
    }
    Ok(value)
}

fn order_by(value: Option<&str>) -> anyhow::Result<Option<&str>> {
    match value {
        Some(v) if !ORDER_BY.contains(&v) => {
            bail!("order_by: '{}' is not one of {}", v, ORDER_BY.join(", "))
        }
        other => Ok(other),
    }
}

fn file_list_text(files: &[DriveFile]) -> String {
    if files.is_empty() {
        return "No documents found.".to_string();
    }
    let mut lines = vec![format!("Found {} document(s):", files.len())];
    for file in files {
        lines.push(format!(
            "- {} (id: {}, modified: {})",
            file.name,
            file.id,
            file.modified_time.as_deref().unwrap_or("unknown")
        ));
    }
    lines.join("\n")
}

impl GoogleDocsServer {
    pub(super) async fn list_documents(&self, client: &GoogleDocsClient, args: JsonObject) -> ToolResult {
        let args: ListArgs = parse_args(args)?;
        let order = order_by(args.order_by.as_deref())?;
        let limit = self.settings.page_size(args.limit);

        let files = client.list_documents(args.query.as_deref(), order, limit).await?;
        Ok(ToolOutput::new(
            file_list_text(&files),
            json!({ "count": files.len(), "files": files }),
        ))
    }

    pub(super) async fn search_documents(&self, client: &GoogleDocsClient, args: JsonObject) -> ToolResult {
        let args: SearchArgs = parse_args(args)?;
        if args.query.trim().is_empty() {
            bail!("query: must not be empty");
        }
        let limit = self.settings.page_size(args.limit);

        let files = client
            .search_documents(Some(&args.query), args.search_in, None, limit)
            .await?;
        Ok(ToolOutput::new(
            file_list_text(&files),
            json!({ "query": args.query, "count": files.len(), "files": files }),
        ))
    }

    pub(super) async fn get_document_info(&self, client: &GoogleDocsClient, args: JsonObject) -> ToolResult {
        let args: DocumentArgs = parse_args(args)?;
        let document_id = validation::document_id(&args.document_id)?;

        let (info, file) = tokio::try_join!(
            client.get_document_info(&document_id),
            client.get_file(&document_id)
        )?;
        let owners: Vec<&str> = file
            .owners
            .iter()
            .filter_map(|o| o.display_name.as_deref().or(o.email_address.as_deref()))
            .collect();

        let text = format!(
            "{}\nID: {}\nRevision: {}\nModified: {}\nOwners: {}\nURL: {}",
            info.title,
            info.document_id,
            info.revision_id.as_deref().unwrap_or("unknown"),
            file.modified_time.as_deref().unwrap_or("unknown"),
            if owners.is_empty() { "unknown".to_string() } else { owners.join(", ") },
            file.web_view_link.clone().unwrap_or_else(|| document_url(&document_id)),
        );
        Ok(ToolOutput::new(
            text,
            json!({
                "document_id": info.document_id,
                "title": info.title,
                "revision_id": info.revision_id,
                "file": file,
            }),
        ))
    }

    pub(super) async fn create_document(&self, client: &GoogleDocsClient, args: JsonObject) -> ToolResult {
        let args: CreateArgs = parse_args(args)?;
        let info = client.create_document(title(&args.title)?).await?;

        let initial_text = args.initial_text.filter(|t| !t.is_empty());
        if let Some(text) = &initial_text {
            let request = Request::InsertText {
                text: text.clone(),
                target: Target::at(1, None),
            };
            client.batch_update(&info.document_id, &[request]).await?;
        }

        let url = document_url(&info.document_id);
        Ok(ToolOutput::new(
            format!("Created document '{}' ({})\n{}", info.title, info.document_id, url),
            json!({
                "document_id": info.document_id,
                "title": info.title,
                "url": url,
                "initial_text_inserted": initial_text.is_some(),
            }),
        ))
    }

    pub(super) async fn copy_document(&self, client: &GoogleDocsClient, args: JsonObject) -> ToolResult {
        let args: TitleArgs = parse_args(args)?;
        let document_id = validation::document_id(&args.document_id)?;

        let copy = client.copy_file(&document_id, title(&args.title)?).await?;
        info!("copy_document: {} -> {}", document_id, copy.id);
        Ok(ToolOutput::new(
            format!("Copied to '{}' ({})", copy.name, copy.id),
            json!({ "source_document_id": document_id, "file": copy }),
        ))
    }

    pub(super) async fn rename_document(&self, client: &GoogleDocsClient, args: JsonObject) -> ToolResult {
        let args: TitleArgs = parse_args(args)?;
        let document_id = validation::document_id(&args.document_id)?;

        let file = client.rename_file(&document_id, title(&args.title)?).await?;
        Ok(ToolOutput::new(
            format!("Renamed document {} to '{}'", file.id, file.name),
            json!({ "file": file }),
        ))
    }

    pub(super) async fn delete_document(&self, client: &GoogleDocsClient, args: JsonObject) -> ToolResult {
        let args: DocumentArgs = parse_args(args)?;
        let document_id = validation::document_id(&args.document_id)?;

        client.trash_file(&document_id).await?;
        Ok(ToolOutput::new(
            format!("Moved document {} to the trash", document_id),
            json!({ "document_id": document_id, "trashed": true }),
        ))
    }
}
