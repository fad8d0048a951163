use std::sync::Arc;

use crate::{error::FetchError, node::CatalogNode, path::NavigationPath};

/// Read access to the catalog.  One call is one remote read: no caching, no
/// retries.  Ancestor ids are not validated, a path that names nothing lists
/// as empty or fails, depending on the backend.
pub trait CatalogStore: Send + Sync {
    fn fetch_children(&self, path: &NavigationPath) -> Result<Vec<CatalogNode>, FetchError>;
}

impl<S: CatalogStore + ?Sized> CatalogStore for Arc<S> {
    fn fetch_children(&self, path: &NavigationPath) -> Result<Vec<CatalogNode>, FetchError> {
        (**self).fetch_children(path)
    }
}

impl<S: CatalogStore + ?Sized> CatalogStore for Box<S> {
    fn fetch_children(&self, path: &NavigationPath) -> Result<Vec<CatalogNode>, FetchError> {
        (**self).fetch_children(path)
    }
}
