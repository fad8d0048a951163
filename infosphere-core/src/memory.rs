use std::{
    collections::{HashMap, HashSet},
    fs::File,
    io,
    path::Path,
    sync::Arc,
};

use serde::Deserialize;

use crate::{
    error::{Error, FetchError},
    node::{CatalogNode, NodeFields},
    path::{Level, NavigationPath},
    store::CatalogStore,
};

/// Catalog held in memory, keyed by the path of the listed collection.
/// Paths that were never inserted list as empty, like a missing Firestore
/// collection.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    children: HashMap<NavigationPath, Arc<[CatalogNode]>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: NavigationPath, nodes: Vec<CatalogNode>) -> Result<(), Error> {
        check_unique(&path, &nodes)?;
        self.children.insert(path, nodes.into());
        Ok(())
    }

    pub fn with(mut self, path: NavigationPath, nodes: Vec<CatalogNode>) -> Result<Self, Error> {
        self.insert(path, nodes)?;
        Ok(self)
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        log::info!("loading catalog fixture: {:?}", path);
        Self::from_reader(File::open(path)?)
    }

    /// Read a nested fixture of the form
    /// `{"titles": [{"id", "name", "description", "subtitles": [...]}]}`.
    pub fn from_reader(reader: impl io::Read) -> Result<Self, Error> {
        let fixture: Fixture = serde_json::from_reader(reader)?;
        let mut store = Self::new();
        store.insert_records(NavigationPath::Root, fixture.titles)?;
        Ok(store)
    }

    fn insert_records(&mut self, path: NavigationPath, records: Vec<Record>) -> Result<(), Error> {
        let level = path.level();
        let mut nodes = Vec::with_capacity(records.len());
        let mut nested = Vec::new();
        for record in records {
            if record.id.is_empty() {
                return Err(Error::InvalidFixture(format!("empty id under {path}")));
            }
            let node = CatalogNode::from_fields(level, &record.id, record.fields);
            // Titles hold `subtitles`, subtitles hold `subsubtitles`.
            let children = match (level, record.subtitles, record.subsubtitles) {
                (_, None, None) => None,
                (Level::Titles, Some(children), None) => Some(children),
                (Level::Subtitles, None, Some(children)) => Some(children),
                _ => {
                    return Err(Error::InvalidFixture(format!(
                        "{:?} under {path} has children it cannot hold",
                        record.id
                    )))
                }
            };
            if let Some(children) = children {
                let child = path.child(node.id.clone()).ok_or_else(|| {
                    Error::InvalidFixture(format!("{:?} under {path} is too deep", record.id))
                })?;
                nested.push((child, children));
            }
            nodes.push(node);
        }
        self.insert(path, nodes)?;
        for (child, children) in nested {
            self.insert_records(child, children)?;
        }
        Ok(())
    }
}

impl CatalogStore for MemoryStore {
    fn fetch_children(&self, path: &NavigationPath) -> Result<Vec<CatalogNode>, FetchError> {
        Ok(self
            .children
            .get(path)
            .map(|nodes| nodes.to_vec())
            .unwrap_or_default())
    }
}

fn check_unique(path: &NavigationPath, nodes: &[CatalogNode]) -> Result<(), Error> {
    let mut seen = HashSet::with_capacity(nodes.len());
    for node in nodes {
        if !seen.insert(&node.id) {
            return Err(Error::InvalidFixture(format!(
                "duplicate id {:?} under {path}",
                node.id
            )));
        }
    }
    Ok(())
}

#[derive(Deserialize)]
struct Fixture {
    #[serde(default)]
    titles: Vec<Record>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Record {
    id: String,
    #[serde(flatten)]
    fields: NodeFields,
    subtitles: Option<Vec<Record>>,
    subsubtitles: Option<Vec<Record>>,
}
