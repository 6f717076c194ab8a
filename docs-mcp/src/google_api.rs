//! Google Docs and Drive API client
//!
//! Documents are fetched with all tabs included and kept as raw JSON; each
//! consumer (text index, markdown, JSON dump) deserializes the part it needs.

use anyhow::{anyhow, Context, Result};
use bridge_config::settings::{DEFAULT_DOCS_API_BASE, DEFAULT_DRIVE_API_BASE};
use docs_index::{extract, Body, FlatDocument};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::markdown;
use crate::requests::Request;
use crate::validation::escape_query_string;

pub const DOCUMENT_MIME_TYPE: &str = "application/vnd.google-apps.document";
const FILE_FIELDS: &str =
    "id,name,mimeType,modifiedTime,createdTime,webViewLink,owners(displayName,emailAddress)";

static EMPTY_TAB: Value = Value::Null;

/// Google Docs API client
pub struct GoogleDocsClient {
    http_client: Client,
    access_token: String,
    docs_base: String,
    drive_base: String,
}

/// File metadata from Drive API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    #[serde(default)]
    pub modified_time: Option<String>,
    #[serde(default)]
    pub created_time: Option<String>,
    #[serde(default)]
    pub web_view_link: Option<String>,
    #[serde(default)]
    pub owners: Vec<DriveOwner>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveOwner {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
}

/// Response from Drive API list files
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFileList {
    #[serde(default)]
    pub files: Vec<DriveFile>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Document metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    pub document_id: String,
    pub title: String,
    #[serde(default)]
    pub revision_id: Option<String>,
}

/// Which fields a Drive search matches against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchIn {
    Name,
    Content,
    #[default]
    Both,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateResponse {
    pub document_id: String,
    #[serde(default)]
    pub replies: Vec<Value>,
}

/// One entry of a document's (possibly nested) tab tree
#[derive(Debug, Clone, Serialize)]
pub struct TabInfo {
    pub tab_id: String,
    pub title: String,
    pub icon: Option<String>,
    pub parent_tab_id: Option<String>,
    pub tab_index: usize,
    pub nesting_level: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TabNode {
    tab_properties: TabProperties,
    #[serde(default)]
    child_tabs: Vec<TabNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TabProperties {
    tab_id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    icon_emoji: Option<String>,
}

/// A document fetched with `includeTabsContent=true`
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    pub document_id: String,
    pub title: String,
    pub revision_id: Option<String>,
    pub raw: Value,
}

impl FetchedDocument {
    pub fn from_json(raw: Value) -> Result<Self> {
        let info: DocumentInfo =
            serde_json::from_value(raw.clone()).context("Docs API returned an unexpected document")?;
        Ok(Self {
            document_id: info.document_id,
            title: info.title,
            revision_id: info.revision_id,
            raw,
        })
    }

    /// The `documentTab` object of a tab, defaulting to the first tab.
    ///
    /// Responses without tabs carry the body at the top level; that object
    /// is returned instead.
    pub fn tab(&self, tab_id: Option<&str>) -> Result<&Value> {
        let tabs = self.raw.get("tabs").and_then(Value::as_array);
        let tab = match (tabs, tab_id) {
            (Some(tabs), Some(id)) => find_tab(tabs, id)
                .ok_or_else(|| anyhow!("tab_id: no tab '{}' in document {}", id, self.document_id))?,
            (Some(tabs), None) if !tabs.is_empty() => &tabs[0],
            (_, Some(id)) => {
                return Err(anyhow!("tab_id: document {} has no tab '{}'", self.document_id, id));
            }
            _ => return Ok(&self.raw),
        };
        Ok(tab.get("documentTab").unwrap_or(&EMPTY_TAB))
    }

    /// The body segment of a tab, for the text index
    pub fn body(&self, tab_id: Option<&str>) -> Result<Body> {
        match self.tab(tab_id)?.get("body") {
            Some(body) => serde_json::from_value(body.clone()).context("Failed to parse document body"),
            None => Ok(Body::default()),
        }
    }

    pub fn flat(&self, tab_id: Option<&str>) -> Result<FlatDocument> {
        Ok(extract(&self.body(tab_id)?.content))
    }

    pub fn markdown(&self, tab_id: Option<&str>) -> Result<String> {
        let value = self.tab(tab_id)?;
        if value.is_null() {
            return Ok(String::new());
        }
        let tab: markdown::DocumentTab =
            serde_json::from_value(value.clone()).context("Failed to parse document tab")?;
        Ok(markdown::tab_to_markdown(&tab))
    }

    /// All tabs, depth-first in reading order
    pub fn list_tabs(&self) -> Result<Vec<TabInfo>> {
        let nodes: Vec<TabNode> = match self.raw.get("tabs") {
            Some(tabs) => serde_json::from_value(tabs.clone()).context("Failed to parse tabs")?,
            None => Vec::new(),
        };
        let mut result = Vec::new();
        let mut work_queue: Vec<(&TabNode, Option<String>, usize, usize)> = nodes
            .iter()
            .enumerate()
            .rev()
            .map(|(i, node)| (node, None, i, 0))
            .collect();

        while let Some((node, parent, index, level)) = work_queue.pop() {
            let props = &node.tab_properties;
            for (i, child) in node.child_tabs.iter().enumerate().rev() {
                work_queue.push((child, Some(props.tab_id.clone()), i, level + 1));
            }
            result.push(TabInfo {
                tab_id: props.tab_id.clone(),
                title: props.title.clone(),
                icon: props.icon_emoji.clone(),
                parent_tab_id: parent,
                tab_index: index,
                nesting_level: level,
            });
        }
        Ok(result)
    }
}

fn find_tab<'a>(tabs: &'a [Value], tab_id: &str) -> Option<&'a Value> {
    tabs.iter().find_map(|tab| {
        let id = tab.pointer("/tabProperties/tabId").and_then(Value::as_str);
        if id == Some(tab_id) {
            return Some(tab);
        }
        tab.get("childTabs")
            .and_then(Value::as_array)
            .and_then(|children| find_tab(children, tab_id))
    })
}

/// Drive `q` expression for Docs files, optionally narrowed by free text
pub fn drive_query(text: Option<&str>, search_in: SearchIn) -> String {
    let mut q = format!("mimeType='{}' and trashed=false", DOCUMENT_MIME_TYPE);
    if let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) {
        let escaped = escape_query_string(text);
        let clause = match search_in {
            SearchIn::Name => format!("name contains '{}'", escaped),
            SearchIn::Content => format!("fullText contains '{}'", escaped),
            SearchIn::Both => format!("(name contains '{0}' or fullText contains '{0}')", escaped),
        };
        q = format!("{} and {}", q, clause);
    }
    q
}

fn batch_update_body(requests: &[Request], revision_id: Option<&str>) -> Value {
    let mut body = json!({ "requests": requests });
    if let Some(revision_id) = revision_id {
        body["writeControl"] = json!({ "requiredRevisionId": revision_id });
    }
    body
}

pub fn document_url(document_id: &str) -> String {
    format!("https://docs.google.com/document/d/{}/edit", document_id)
}

impl GoogleDocsClient {
    /// Create a new client with the given access token
    pub fn new(access_token: String) -> Self {
        Self::with_endpoints(access_token, DEFAULT_DOCS_API_BASE, DEFAULT_DRIVE_API_BASE)
    }

    pub fn with_endpoints(access_token: String, docs_base: &str, drive_base: &str) -> Self {
        Self {
            http_client: Client::new(),
            access_token,
            docs_base: docs_base.trim_end_matches('/').to_string(),
            drive_base: drive_base.trim_end_matches('/').to_string(),
        }
    }

    /// URL for a Drive `files.list` call
    pub fn files_list_url(&self, q: &str, page_size: usize, order_by: &str) -> String {
        format!(
            "{}/files?pageSize={}&orderBy={}&fields=files({}),nextPageToken&q={}",
            self.drive_base,
            page_size,
            urlencoding::encode(order_by),
            FILE_FIELDS,
            urlencoding::encode(q)
        )
    }

    async fn send(&self, request: RequestBuilder, api: &str) -> Result<Response> {
        let response = request.bearer_auth(&self.access_token).send().await?;
        debug!("{} response status={}", api, response.status());

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("{} error ({}): {}", api, status, body));
        }
        Ok(response)
    }

    /// List Google Docs from Drive
    pub async fn list_documents(
        &self,
        query: Option<&str>,
        order_by: Option<&str>,
        limit: usize,
    ) -> Result<Vec<DriveFile>> {
        self.search_documents(query, SearchIn::Content, order_by, limit).await
    }

    pub async fn search_documents(
        &self,
        query: Option<&str>,
        search_in: SearchIn,
        order_by: Option<&str>,
        limit: usize,
    ) -> Result<Vec<DriveFile>> {
        let q = drive_query(query, search_in);
        let url = self.files_list_url(&q, limit, order_by.unwrap_or("modifiedTime desc"));
        debug!("search_documents: q={}", q);

        let response = self.send(self.http_client.get(&url), "Drive API").await?;
        let list: DriveFileList = response.json().await?;
        Ok(list.files)
    }

    pub async fn get_file(&self, file_id: &str) -> Result<DriveFile> {
        let url = format!("{}/files/{}?fields={}", self.drive_base, file_id, FILE_FIELDS);
        let response = self.send(self.http_client.get(&url), "Drive API").await?;
        Ok(response.json().await?)
    }

    pub async fn copy_file(&self, file_id: &str, name: &str) -> Result<DriveFile> {
        let url = format!("{}/files/{}/copy?fields={}", self.drive_base, file_id, FILE_FIELDS);
        let request = self.http_client.post(&url).json(&json!({ "name": name }));
        let response = self.send(request, "Drive API").await?;
        Ok(response.json().await?)
    }

    pub async fn rename_file(&self, file_id: &str, name: &str) -> Result<DriveFile> {
        let url = format!("{}/files/{}?fields={}", self.drive_base, file_id, FILE_FIELDS);
        let request = self.http_client.patch(&url).json(&json!({ "name": name }));
        let response = self.send(request, "Drive API").await?;
        Ok(response.json().await?)
    }

    /// Move a file to the trash
    pub async fn trash_file(&self, file_id: &str) -> Result<()> {
        let url = format!("{}/files/{}", self.drive_base, file_id);
        let request = self.http_client.patch(&url).json(&json!({ "trashed": true }));
        self.send(request, "Drive API").await?;
        info!("trash_file: moved {} to trash", file_id);
        Ok(())
    }

    pub async fn create_document(&self, title: &str) -> Result<DocumentInfo> {
        let url = format!("{}/documents", self.docs_base);
        let request = self.http_client.post(&url).json(&json!({ "title": title }));
        let response = self.send(request, "Docs API").await?;
        let info: DocumentInfo = response.json().await?;
        info!("create_document: created '{}' ({})", info.title, info.document_id);
        Ok(info)
    }

    /// Fetch a document with every tab's content
    pub async fn get_document(&self, document_id: &str) -> Result<FetchedDocument> {
        let url = format!("{}/documents/{}?includeTabsContent=true", self.docs_base, document_id);
        debug!("get_document: fetching {}", url);

        let response = self.send(self.http_client.get(&url), "Docs API").await?;
        let raw: Value = response.json().await?;
        let doc = FetchedDocument::from_json(raw)?;
        info!("get_document: fetched '{}' revision={:?}", doc.title, doc.revision_id);
        Ok(doc)
    }

    pub async fn get_document_info(&self, document_id: &str) -> Result<DocumentInfo> {
        let url = format!(
            "{}/documents/{}?fields=documentId,title,revisionId",
            self.docs_base, document_id
        );
        let response = self.send(self.http_client.get(&url), "Docs API").await?;
        Ok(response.json().await?)
    }

    /// Send requests as one atomic batch; either all apply or none do
    pub async fn batch_update(&self, document_id: &str, requests: &[Request]) -> Result<BatchUpdateResponse> {
        self.batch_update_at(document_id, requests, None).await
    }

    /// Like [`batch_update`](Self::batch_update), but rejected by the API if
    /// the document has moved past `revision_id` since it was read
    pub async fn batch_update_at(
        &self,
        document_id: &str,
        requests: &[Request],
        revision_id: Option<&str>,
    ) -> Result<BatchUpdateResponse> {
        let url = format!("{}/documents/{}:batchUpdate", self.docs_base, document_id);
        let kinds: Vec<&str> = requests.iter().map(Request::kind).collect();
        debug!("batch_update: {} requests {:?} revision={:?}", requests.len(), kinds, revision_id);

        let request = self
            .http_client
            .post(&url)
            .json(&batch_update_body(requests, revision_id));
        let response = self.send(request, "Docs API").await?;
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FetchedDocument {
        FetchedDocument::from_json(json!({
            "documentId": "doc-1",
            "title": "Sample",
            "revisionId": "rev-9",
            "tabs": [
                {
                    "tabProperties": {"tabId": "t.0", "title": "First"},
                    "documentTab": {"body": {"content": [
                        {"startIndex": 0, "endIndex": 1, "sectionBreak": {}},
                        {"startIndex": 1, "endIndex": 7, "paragraph": {"elements": [
                            {"startIndex": 1, "endIndex": 7, "textRun": {"content": "Alpha\n"}}
                        ]}}
                    ]}},
                    "childTabs": [{
                        "tabProperties": {"tabId": "t.1", "title": "Nested", "iconEmoji": "📎"},
                        "documentTab": {"body": {"content": [
                            {"startIndex": 1, "endIndex": 6, "paragraph": {"elements": [
                                {"startIndex": 1, "endIndex": 6, "textRun": {"content": "Beta\n"}}
                            ]}}
                        ]}}
                    }]
                },
                {"tabProperties": {"tabId": "t.2", "title": "Second"}, "documentTab": {}}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_flat_text_per_tab() {
        let doc = sample();
        assert_eq!(doc.revision_id.as_deref(), Some("rev-9"));
        assert_eq!(doc.flat(None).unwrap().text(), "Alpha\n");
        assert_eq!(doc.flat(Some("t.1")).unwrap().text(), "Beta\n");
        assert!(doc.flat(Some("t.2")).unwrap().is_empty());
        assert!(doc.flat(Some("missing")).is_err());
    }

    #[test]
    fn test_list_tabs_depth_first() {
        let tabs = sample().list_tabs().unwrap();
        let ids: Vec<&str> = tabs.iter().map(|t| t.tab_id.as_str()).collect();
        assert_eq!(ids, vec!["t.0", "t.1", "t.2"]);
        assert_eq!(tabs[1].parent_tab_id.as_deref(), Some("t.0"));
        assert_eq!(tabs[1].nesting_level, 1);
        assert_eq!(tabs[1].icon.as_deref(), Some("📎"));
        assert_eq!(tabs[2].tab_index, 1);
    }

    #[test]
    fn test_document_without_tabs() {
        let doc = FetchedDocument::from_json(json!({
            "documentId": "legacy",
            "title": "Old",
            "body": {"content": [
                {"startIndex": 1, "endIndex": 4, "paragraph": {"elements": [
                    {"startIndex": 1, "endIndex": 4, "textRun": {"content": "Hi\n"}}
                ]}}
            ]}
        }))
        .unwrap();
        assert_eq!(doc.flat(None).unwrap().text(), "Hi\n");
        assert!(doc.list_tabs().unwrap().is_empty());
        assert!(doc.body(Some("t.0")).is_err());
    }

    #[test]
    fn test_drive_query() {
        assert_eq!(
            drive_query(None, SearchIn::Both),
            "mimeType='application/vnd.google-apps.document' and trashed=false"
        );
        assert_eq!(
            drive_query(Some("Bob's"), SearchIn::Name),
            "mimeType='application/vnd.google-apps.document' and trashed=false and name contains 'Bob\\'s'"
        );
        assert!(drive_query(Some("plan"), SearchIn::Both)
            .ends_with("(name contains 'plan' or fullText contains 'plan')"));
        assert!(!drive_query(Some("   "), SearchIn::Content).contains("fullText"));
    }

    #[test]
    fn test_files_list_url() {
        let client = GoogleDocsClient::with_endpoints("token".into(), "http://docs/", "http://drive/");
        let url = client.files_list_url("name contains 'a b'", 5, "modifiedTime desc");
        assert!(url.starts_with("http://drive/files?pageSize=5&orderBy=modifiedTime%20desc"));
        assert!(url.ends_with("&q=name%20contains%20%27a%20b%27"));
    }

    #[test]
    fn test_batch_update_body() {
        let requests = [Request::DeleteContentRange {
            range: crate::requests::Range::new(docs_index::DocRange::new(2, 4), None),
        }];
        assert_eq!(
            batch_update_body(&requests, Some("rev-9")),
            json!({
                "requests": [{"deleteContentRange": {"range": {"startIndex": 2, "endIndex": 4}}}],
                "writeControl": {"requiredRevisionId": "rev-9"}
            })
        );
        assert!(batch_update_body(&requests, None).get("writeControl").is_none());
    }

    #[test]
    fn test_document_url() {
        assert_eq!(document_url("abc"), "https://docs.google.com/document/d/abc/edit");
    }
}
