use std::{collections::HashMap, time::Duration};

use serde::Deserialize;
use ureq::Agent;
use url::Url;

use crate::{
    error::FetchError,
    node::{CatalogNode, NodeFields},
    path::{Level, NavigationPath},
    store::CatalogStore,
    util::default_ureq_agent_builder,
};

pub const DEFAULT_ENDPOINT: &str = "https://firestore.googleapis.com";
pub const DEFAULT_DATABASE: &str = "(default)";
pub const DEFAULT_PAGE_SIZE: usize = 300;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Connection values for the Firestore REST API.
#[derive(Clone, Debug)]
pub struct FirestoreConfig {
    pub endpoint: String,
    pub project_id: String,
    pub database: String,
    pub api_key: Option<String>,
    pub id_token: Option<String>,
    pub proxy_url: Option<String>,
    pub page_size: usize,
    pub timeout: Duration,
}

impl FirestoreConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            project_id: project_id.into(),
            database: DEFAULT_DATABASE.to_string(),
            api_key: None,
            id_token: None,
            proxy_url: None,
            page_size: DEFAULT_PAGE_SIZE,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Catalog store reading the `titles/{id}/subtitles/{id}/subsubtitles`
/// collections through the Firestore `documents.list` endpoint.
pub struct FirestoreStore {
    config: FirestoreConfig,
    agent: Agent,
}

impl FirestoreStore {
    pub fn new(config: FirestoreConfig) -> Self {
        let agent = default_ureq_agent_builder(config.proxy_url.as_deref(), config.timeout)
            .build()
            .into();
        Self { config, agent }
    }

    fn load_page(&self, url: &Url) -> Result<ListDocuments, FetchError> {
        let mut request = self.agent.get(url.as_str());
        if let Some(token) = &self.config.id_token {
            request = request.header("Authorization", &format!("Bearer {}", token));
        }
        let mut response = request.call().map_err(fetch_error)?;
        response
            .body_mut()
            .read_json::<ListDocuments>()
            .map_err(fetch_error)
    }
}

impl CatalogStore for FirestoreStore {
    /// Lists the whole collection.  Firestore splits long listings into result
    /// pages, those are followed here so a single call returns everything.
    fn fetch_children(&self, path: &NavigationPath) -> Result<Vec<CatalogNode>, FetchError> {
        let level = path.level();
        let mut nodes = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let url = collection_url(&self.config, path, page_token.as_deref())?;
            log::debug!("listing {}", path);
            let page = self.load_page(&url)?;
            nodes.extend(
                page.documents
                    .into_iter()
                    .filter_map(|doc| doc.into_node(level)),
            );
            match page.next_page_token {
                Some(token) if page_token.as_deref() == Some(token.as_str()) => {
                    log::warn!("listing {} repeated page token {:?}, stopping", path, token);
                    break;
                }
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }
        Ok(nodes)
    }
}

fn collection_url(
    config: &FirestoreConfig,
    path: &NavigationPath,
    page_token: Option<&str>,
) -> Result<Url, FetchError> {
    let mut url = Url::parse(&config.endpoint)
        .map_err(|err| FetchError::Unknown(format!("invalid endpoint: {err}")))?;
    url.path_segments_mut()
        .map_err(|_| FetchError::Unknown("endpoint cannot hold a path".to_string()))?
        .pop_if_empty()
        .extend([
            "v1",
            "projects",
            config.project_id.as_str(),
            "databases",
            config.database.as_str(),
            "documents",
        ])
        .extend(path.collection_segments());
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("pageSize", &config.page_size.to_string());
        if let Some(token) = page_token {
            query.append_pair("pageToken", token);
        }
        if let Some(key) = &config.api_key {
            query.append_pair("key", key);
        }
    }
    Ok(url)
}

fn fetch_error(err: ureq::Error) -> FetchError {
    match err {
        ureq::Error::StatusCode(401 | 403) => FetchError::PermissionDenied,
        ureq::Error::StatusCode(404) => FetchError::NotFound,
        ureq::Error::StatusCode(code) => FetchError::Unknown(format!("HTTP status {code}")),
        ureq::Error::Io(_)
        | ureq::Error::Timeout(_)
        | ureq::Error::HostNotFound
        | ureq::Error::ConnectionFailed => FetchError::NetworkUnavailable,
        err => FetchError::Unknown(err.to_string()),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocuments {
    #[serde(default)]
    documents: Vec<Document>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Document {
    name: String,
    #[serde(default)]
    fields: HashMap<String, Value>,
}

impl Document {
    /// Document names are full resource paths, the id is the last segment.
    fn id(&self) -> Option<&str> {
        self.name.rsplit('/').next().filter(|id| !id.is_empty())
    }

    fn into_node(mut self, level: Level) -> Option<CatalogNode> {
        let Some(id) = self.id().map(str::to_string) else {
            log::warn!("skipping document without id: {:?}", self.name);
            return None;
        };
        let mut text = |key: &str| self.fields.remove(key).and_then(Value::into_text);
        let fields = NodeFields {
            name: text("name"),
            description: text("description"),
            content: text("content"),
            video_url: text("videoUrl"),
        };
        Some(CatalogNode::from_fields(level, &id, fields))
    }
}

/// Firestore typed value.  Only the scalar kinds the catalog uses are read,
/// anything else decodes to an empty value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Value {
    string_value: Option<String>,
    integer_value: Option<String>,
    double_value: Option<f64>,
    boolean_value: Option<bool>,
}

impl Value {
    fn into_text(self) -> Option<String> {
        self.string_value
            .or(self.integer_value)
            .or_else(|| self.double_value.map(|v| v.to_string()))
            .or_else(|| self.boolean_value.map(|v| v.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    const SUBTITLES_PAGE: &str = r#"{
        "documents": [
            {
                "name": "projects/p/databases/(default)/documents/titles/t1/subtitles/s1",
                "fields": {
                    "name": { "stringValue": "Stars" },
                    "content": { "stringValue": "Balls of plasma" },
                    "videoUrl": { "stringValue": "https://x/y.mp4" }
                },
                "createTime": "2024-01-01T00:00:00Z"
            },
            {
                "name": "projects/p/databases/(default)/documents/titles/t1/subtitles/s2",
                "fields": {
                    "name": { "stringValue": "Planets" },
                    "order": { "integerValue": "2" },
                    "tags": { "arrayValue": { "values": [] } }
                }
            }
        ],
        "nextPageToken": "abc"
    }"#;

    #[test]
    fn decodes_documents_in_listing_order() {
        let page: ListDocuments = serde_json::from_str(SUBTITLES_PAGE).unwrap();
        assert_eq!(page.next_page_token.as_deref(), Some("abc"));
        let nodes: Vec<_> = page
            .documents
            .into_iter()
            .filter_map(|doc| doc.into_node(Level::Subtitles))
            .collect();
        assert_eq!(nodes.len(), 2);
        assert_eq!(&*nodes[0].id, "s1");
        assert_eq!(&*nodes[0].name, "Stars");
        assert_eq!(nodes[0].summary(), Some("Balls of plasma"));
        assert!(nodes[0].has_video());
        assert_eq!(&*nodes[1].id, "s2");
        assert!(!nodes[1].has_video());
    }

    #[test]
    fn empty_collection_decodes_to_no_documents() {
        let page: ListDocuments = serde_json::from_str("{}").unwrap();
        assert!(page.documents.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn builds_nested_collection_url() {
        let mut config = FirestoreConfig::new("fire-1");
        config.api_key = Some("k3y".into());
        let path = NavigationPath::from_ids(&["t1", "s 1"]).unwrap();
        let url = collection_url(&config, &path, Some("next")).unwrap();
        assert!(url.path().starts_with("/v1/projects/fire-1/databases/"));
        assert!(url
            .path()
            .ends_with("/documents/titles/t1/subtitles/s%201/subsubtitles"));
        let query: HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(query["pageSize"], DEFAULT_PAGE_SIZE.to_string());
        assert_eq!(query["pageToken"], "next");
        assert_eq!(query["key"], "k3y");
    }

    #[test]
    fn emulator_endpoint_keeps_host() {
        let mut config = FirestoreConfig::new("demo");
        config.endpoint = "http://localhost:8080/".into();
        let url = collection_url(&config, &NavigationPath::Root, None).unwrap();
        assert_eq!(url.host_str(), Some("localhost"));
        assert_eq!(url.port(), Some(8080));
        assert!(url.path().ends_with("/documents/titles"));
        assert!(!url.query_pairs().any(|(key, _)| key == "key"));
    }

    #[test]
    fn maps_transport_failures() {
        assert_eq!(
            fetch_error(ureq::Error::StatusCode(403)),
            FetchError::PermissionDenied
        );
        assert_eq!(
            fetch_error(ureq::Error::StatusCode(401)),
            FetchError::PermissionDenied
        );
        assert_eq!(fetch_error(ureq::Error::StatusCode(404)), FetchError::NotFound);
        assert!(matches!(
            fetch_error(ureq::Error::StatusCode(500)),
            FetchError::Unknown(_)
        ));
        assert_eq!(
            fetch_error(ureq::Error::Io(io::Error::from(io::ErrorKind::ConnectionRefused))),
            FetchError::NetworkUnavailable
        );
        assert_eq!(
            fetch_error(ureq::Error::HostNotFound),
            FetchError::NetworkUnavailable
        );
    }
}
