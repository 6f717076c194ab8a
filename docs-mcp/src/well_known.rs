//! OAuth 2.0 authorization server metadata (RFC 8414) pointing at Google.
//!
//! MCP clients read this to run the OAuth flow themselves and then send the
//! resulting token as `Authorization: Bearer ...` on each request.

use serde::Serialize;

const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/documents",
    "https://www.googleapis.com/auth/drive",
];

#[derive(Debug, Clone, Serialize)]
pub struct OAuthServerMetadata {
    pub issuer: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_endpoint: Option<String>,
    pub scopes_supported: Vec<String>,
    pub response_types_supported: Vec<String>,
    pub grant_types_supported: Vec<String>,
    pub code_challenge_methods_supported: Vec<String>,
}

pub fn google_oauth_metadata() -> OAuthServerMetadata {
    OAuthServerMetadata {
        issuer: "https://accounts.google.com".to_string(),
        authorization_endpoint: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
        token_endpoint: "https://oauth2.googleapis.com/token".to_string(),
        // Google has no dynamic client registration
        registration_endpoint: None,
        scopes_supported: SCOPES.iter().map(|s| s.to_string()).collect(),
        response_types_supported: vec!["code".to_string()],
        grant_types_supported: vec!["authorization_code".to_string(), "refresh_token".to_string()],
        code_challenge_methods_supported: vec!["S256".to_string()],
    }
}
