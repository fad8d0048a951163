use std::sync::Arc;

use serde::Deserialize;
use url::Url;

use crate::path::Level;

/// One record of the catalog.  `id` is only unique among its siblings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogNode {
    pub id: Arc<str>,
    pub name: Arc<str>,
    pub detail: NodeDetail,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeDetail {
    Title {
        description: Option<Arc<str>>,
    },
    Entry {
        content: Option<Arc<str>>,
        video_url: Option<Url>,
    },
}

/// Loosely typed fields of a stored document, before they are shaped into a
/// `CatalogNode` for a particular level.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub video_url: Option<String>,
}

impl CatalogNode {
    pub fn title(id: &str, name: &str, description: Option<&str>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            detail: NodeDetail::Title {
                description: description.map(Arc::from),
            },
        }
    }

    pub fn entry(id: &str, name: &str, content: Option<&str>, video_url: Option<Url>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            detail: NodeDetail::Entry {
                content: content.map(Arc::from),
                video_url,
            },
        }
    }

    /// Shape raw document fields into a node.  Titles keep `description`,
    /// deeper levels keep `content` and `videoUrl`.  A missing name falls back
    /// to the id, an unparsable video URL is dropped.
    pub fn from_fields(level: Level, id: &str, fields: NodeFields) -> Self {
        let name = fields.name.unwrap_or_else(|| {
            log::debug!("node {:?} has no name, using its id", id);
            id.to_string()
        });
        let detail = if level.is_top() {
            NodeDetail::Title {
                description: fields.description.map(Arc::from),
            }
        } else {
            NodeDetail::Entry {
                content: fields.content.map(Arc::from),
                video_url: fields.video_url.and_then(|raw| parse_video_url(id, &raw)),
            }
        };
        Self {
            id: id.into(),
            name: name.into(),
            detail,
        }
    }

    /// Text shown under the name: the description of a title or the content
    /// of a deeper entry.
    pub fn summary(&self) -> Option<&str> {
        match &self.detail {
            NodeDetail::Title { description } => description.as_deref(),
            NodeDetail::Entry { content, .. } => content.as_deref(),
        }
    }

    pub fn video_url(&self) -> Option<&Url> {
        match &self.detail {
            NodeDetail::Title { .. } => None,
            NodeDetail::Entry { video_url, .. } => video_url.as_ref(),
        }
    }

    pub fn has_video(&self) -> bool {
        self.video_url().is_some()
    }
}

fn parse_video_url(id: &str, raw: &str) -> Option<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match Url::parse(raw) {
        Ok(url) => Some(url),
        Err(err) => {
            log::warn!("ignoring video url of {:?}: {}", id, err);
            None
        }
    }
}
