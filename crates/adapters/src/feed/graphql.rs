// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! GraphQL feed client over HTTPS

use super::{Edge, FeedAdapter, FeedError, FeedPage, Page};
use crate::credential::CredentialProvider;
use async_trait::async_trait;
use fv_core::{ContinuationToken, FeedConfig, RawEventRecord};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Events query; `$first` is bounded to 1000 by the feed
pub const EVENTS_QUERY: &str = r#"
query FeedEvents($after: String, $first: Int!) {
  events(first: $first, after: $after) {
    pageInfo {
      hasNextPage
      endCursor
    }
    edges {
      cursor
      node {
        id
        actionTime
        source
        destination
        sourcePort
        destinationPort
        transportProtocol
        formulaMatches {
          action {
            response
          }
          formula {
            formulaId
            title
            background
            tags {
              category
              value
            }
          }
        }
        applicationProtocol
        applicationData {
          ... on HttpRequestData {
            method
            path
            host
            userAgent
          }
          ... on HttpResponseData {
            statusCode
            statusString
            server
            contentType
          }
          ... on DnsData {
            host
          }
          ... on TlsData {
            sniHost
          }
        }
      }
    }
  }
}
"#;

const CLIENT_IDS_HEADER: &str = "X-Effective-Client-Ids";

/// Error codes the feed uses for rejected credentials
const AUTH_ERROR_CODES: [&str; 3] = ["UNAUTHENTICATED", "UNAUTHORIZED", "FORBIDDEN"];

/// Feed adapter that POSTs the events query with a bearer credential.
///
/// HTTP is blocking (`ureq`) and runs on tokio's blocking pool.
pub struct GraphQlFeedAdapter<C> {
    agent: ureq::Agent,
    endpoint: String,
    client_id: Option<String>,
    page_size: u32,
    max_response_bytes: u64,
    credentials: Arc<C>,
}

impl<C> Clone for GraphQlFeedAdapter<C> {
    fn clone(&self) -> Self {
        Self {
            agent: self.agent.clone(),
            endpoint: self.endpoint.clone(),
            client_id: self.client_id.clone(),
            page_size: self.page_size,
            max_response_bytes: self.max_response_bytes,
            credentials: Arc::clone(&self.credentials),
        }
    }
}

impl<C: CredentialProvider> GraphQlFeedAdapter<C> {
    pub fn new(config: &FeedConfig, credentials: C) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(config.timeout)
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            endpoint: config.endpoint.clone(),
            client_id: config.client_id.clone(),
            page_size: config.page_size,
            max_response_bytes: config.max_response_bytes,
            credentials: Arc::new(credentials),
        }
    }

    fn request_body(&self, after: Option<&ContinuationToken>) -> Result<Vec<u8>, FeedError> {
        let body = json!({
            "query": EVENTS_QUERY,
            "variables": {
                "after": after.map(ContinuationToken::as_str),
                "first": self.page_size,
            },
        });
        serde_json::to_vec(&body).map_err(|e| FeedError::Decode(e.to_string()))
    }
}

#[async_trait]
impl<C: CredentialProvider> FeedAdapter for GraphQlFeedAdapter<C> {
    async fn fetch_page(&self, after: Option<&ContinuationToken>) -> Result<FeedPage, FeedError> {
        // Fetched per request so a rotated credential is picked up
        let api_key = self.credentials.credential()?;
        let body = self.request_body(after)?;
        let agent = self.agent.clone();
        let endpoint = self.endpoint.clone();
        let client_id = self.client_id.clone();
        let limit = self.max_response_bytes;

        let (status, text) = tokio::task::spawn_blocking(move || {
            let mut request = agent
                .post(&endpoint)
                .header("Content-Type", "application/json")
                .header("Authorization", &format!("Bearer {}", api_key));
            if let Some(client_id) = &client_id {
                request = request.header(CLIENT_IDS_HEADER, client_id);
            }
            let mut response = request
                .send(&body[..])
                .map_err(|e| FeedError::Transport(e.to_string()))?;
            let status = response.status().as_u16();
            // A full page can exceed ureq's default 10 MiB body cap
            let text = response
                .body_mut()
                .with_config()
                .limit(limit)
                .read_to_string()
                .map_err(|e| FeedError::Transport(format!("failed to read response: {}", e)))?;
            Ok::<_, FeedError>((status, text))
        })
        .await
        .map_err(|e| FeedError::Transport(format!("fetch task failed: {}", e)))??;

        parse_page(status, &text)
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<EventsData>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    extensions: Option<Value>,
}

impl GraphQlError {
    fn is_auth(&self) -> bool {
        let code = self
            .extensions
            .as_ref()
            .and_then(|ext| ext.get("code"))
            .and_then(Value::as_str)
            .unwrap_or_default();
        AUTH_ERROR_CODES.contains(&code)
    }
}

#[derive(Debug, Deserialize)]
struct EventsData {
    events: Option<EventsConnection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventsConnection {
    page_info: PageInfo,
    #[serde(default)]
    edges: Option<Vec<EdgeNode>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    #[serde(default)]
    has_next_page: bool,
    #[serde(default)]
    end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EdgeNode {
    cursor: String,
    node: RawEventRecord,
}

/// Interpret an HTTP status and body from the feed.
///
/// A response without an end cursor is [`FeedPage::NoData`], never an empty
/// page with more to come.
pub fn parse_page(status: u16, body: &str) -> Result<FeedPage, FeedError> {
    match status {
        200..=299 => {}
        401 | 403 => return Err(FeedError::Auth(format!("HTTP {}: {}", status, truncate(body)))),
        _ => {
            return Err(FeedError::Status {
                status,
                body: truncate(body),
            })
        }
    }

    let response: GraphQlResponse =
        serde_json::from_str(body).map_err(|e| FeedError::Decode(e.to_string()))?;

    if let Some(errors) = response.errors.filter(|errors| !errors.is_empty()) {
        let message = errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        if errors.iter().any(GraphQlError::is_auth) {
            return Err(FeedError::Auth(message));
        }
        return Err(FeedError::GraphQl(message));
    }

    let events = response
        .data
        .and_then(|data| data.events)
        .ok_or_else(|| FeedError::Decode("response has no data.events".to_string()))?;

    let Some(end_cursor) = events.page_info.end_cursor else {
        return Ok(FeedPage::NoData);
    };

    let edges = events
        .edges
        .unwrap_or_default()
        .into_iter()
        .map(|edge| Edge {
            cursor: ContinuationToken::new(edge.cursor),
            record: edge.node,
        })
        .collect();

    Ok(FeedPage::Page(Page {
        edges,
        has_next_page: events.page_info.has_next_page,
        end_cursor: ContinuationToken::new(end_cursor),
    }))
}

fn truncate(body: &str) -> String {
    const LIMIT: usize = 512;
    match body.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
#[path = "graphql_tests.rs"]
mod tests;
