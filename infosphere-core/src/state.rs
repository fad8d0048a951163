use std::sync::Arc;

use url::Url;

use crate::{
    error::{Error, FetchError},
    node::CatalogNode,
    path::{Level, NavigationPath},
    promise::Promise,
};

static ROOT: NavigationPath = NavigationPath::Root;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchKind {
    /// The one-time load of the top-level list.
    Initial,
    /// Listing the children of a selected node, pushed as a new level.
    DrillIn,
    /// Reloading the active level in place.
    Refresh,
}

/// Handle of one dispatched fetch.  Only the reply carrying the ticket the
/// navigator is waiting for is applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub path: NavigationPath,
    pub kind: FetchKind,
}

#[derive(Debug)]
pub struct FetchReply {
    pub ticket: FetchTicket,
    pub result: Result<Vec<CatalogNode>, FetchError>,
}

/// A fetched list together with the path it was listed at.
#[derive(Clone, Debug)]
pub struct LevelView {
    pub path: NavigationPath,
    pub nodes: Arc<[CatalogNode]>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Back {
    /// Moved up, the list of this path is displayed again.
    Level(NavigationPath),
    /// Already at the top, the shell should leave the navigator.
    Exit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Completion {
    Applied(NavigationPath),
    Failed(FetchError),
    Stale,
}

/// Navigation state of one catalog screen: the stack of fetched levels, the
/// fetch in flight and the video overlay.  Pure bookkeeping, fetches are
/// requested by handing out `FetchTicket`s and applied with `complete`.
#[derive(Debug, Default)]
pub struct NavigatorState {
    levels: Vec<LevelView>,
    loading: Promise<Arc<[CatalogNode]>, FetchTicket>,
    failed: Option<FetchTicket>,
    video: Option<Url>,
    initialized: bool,
    seq: u64,
}

impl NavigatorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry action of the root state, requests the top-level list.  Allowed
    /// once per navigator.
    pub fn initialize(&mut self) -> Result<FetchTicket, Error> {
        if self.initialized {
            return Err(Error::AlreadyInitialized);
        }
        self.initialized = true;
        Ok(self.issue(NavigationPath::Root, FetchKind::Initial))
    }

    /// Drill into the node `id` of the active list.
    pub fn select(&mut self, id: &str) -> Result<FetchTicket, Error> {
        self.check_idle()?;
        let active = self.levels.last().ok_or(Error::NotInitialized)?;
        if active.path.depth() == NavigationPath::MAX_DEPTH {
            return Err(Error::DepthExceeded);
        }
        let node = active
            .nodes
            .iter()
            .find(|node| &*node.id == id)
            .ok_or_else(|| Error::UnknownNode(id.into()))?;
        let path = active
            .path
            .child(node.id.clone())
            .ok_or(Error::DepthExceeded)?;
        Ok(self.issue(path, FetchKind::DrillIn))
    }

    /// Go up one level.  The parent list is shown as it was fetched, nothing
    /// is requested.  At the top nothing changes, a failed fetch stays
    /// retryable.
    pub fn back(&mut self) -> Result<Back, Error> {
        if self.loading.is_pending() {
            return Err(Error::Busy);
        }
        if self.levels.len() > 1 {
            self.loading.clear();
            self.failed = None;
            self.levels.pop();
            log::debug!("back to {}", self.path());
            Ok(Back::Level(self.path().clone()))
        } else {
            Ok(Back::Exit)
        }
    }

    /// Request the active level again, replacing its list when it arrives.
    pub fn refresh(&mut self) -> Result<FetchTicket, Error> {
        self.check_idle()?;
        let path = self
            .levels
            .last()
            .map(|level| level.path.clone())
            .ok_or(Error::NotInitialized)?;
        Ok(self.issue(path, FetchKind::Refresh))
    }

    /// Issue the last failed fetch again.
    pub fn retry(&mut self) -> Result<FetchTicket, Error> {
        self.check_idle()?;
        let failed = self.failed.take().ok_or(Error::NothingToRetry)?;
        Ok(self.issue(failed.path, failed.kind))
    }

    /// Apply the reply of a fetch.  Replies for anything but the pending
    /// ticket are ignored.
    pub fn complete(&mut self, reply: FetchReply) -> Completion {
        let FetchReply { ticket, result } = reply;
        if !self.loading.update((ticket.clone(), result.map(Arc::from))) {
            log::debug!("ignoring stale reply for {}", ticket.path);
            return Completion::Stale;
        }
        match self.loading.take_resolved() {
            Some(nodes) => {
                log::debug!("loaded {} entries at {}", nodes.len(), ticket.path);
                self.apply(&ticket, nodes);
                Completion::Applied(ticket.path)
            }
            None => {
                let err = self
                    .loading
                    .error()
                    .cloned()
                    .unwrap_or_else(|| FetchError::Unknown("fetch settled without result".into()));
                log::error!("failed to load {}: {}", ticket.path, err);
                self.failed = Some(ticket);
                Completion::Failed(err)
            }
        }
    }

    pub fn open_video(&mut self, url: Url) {
        log::info!("opening video {}", url);
        self.video = Some(url);
    }

    /// Open the video of a node in the active list.
    pub fn open_node_video(&mut self, id: &str) -> Result<Url, Error> {
        let node = self.node(id).ok_or_else(|| Error::UnknownNode(id.into()))?;
        let url = node
            .video_url()
            .cloned()
            .ok_or_else(|| Error::NoVideo(node.id.clone()))?;
        self.open_video(url.clone());
        Ok(url)
    }

    pub fn close_video(&mut self) -> Option<Url> {
        self.video.take()
    }

    pub fn video(&self) -> Option<&Url> {
        self.video.as_ref()
    }

    pub fn path(&self) -> &NavigationPath {
        self.levels.last().map_or(&ROOT, |level| &level.path)
    }

    pub fn level(&self) -> Level {
        self.path().level()
    }

    /// Fetched levels from the root down to the active one.
    pub fn levels(&self) -> &[LevelView] {
        &self.levels
    }

    /// The displayed list, empty until the first fetch succeeded.
    pub fn nodes(&self) -> &[CatalogNode] {
        match self.levels.last() {
            Some(level) => &level.nodes,
            None => &[],
        }
    }

    pub fn node(&self, id: &str) -> Option<&CatalogNode> {
        self.nodes().iter().find(|node| &*node.id == id)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_pending()
    }

    pub fn pending(&self) -> Option<&FetchTicket> {
        self.loading.deferred()
    }

    pub fn pending_path(&self) -> Option<&NavigationPath> {
        self.pending().map(|ticket| &ticket.path)
    }

    /// Error of the last fetch, kept until the next action.
    pub fn last_error(&self) -> Option<&FetchError> {
        self.loading.error()
    }

    pub fn can_retry(&self) -> bool {
        self.failed.is_some()
    }

    fn check_idle(&mut self) -> Result<(), Error> {
        if self.loading.is_pending() {
            return Err(Error::Busy);
        }
        self.loading.clear();
        Ok(())
    }

    fn issue(&mut self, path: NavigationPath, kind: FetchKind) -> FetchTicket {
        self.seq += 1;
        let ticket = FetchTicket {
            seq: self.seq,
            path,
            kind,
        };
        log::debug!("fetch #{} {:?} {}", ticket.seq, ticket.kind, ticket.path);
        self.failed = None;
        self.loading.defer(ticket.clone());
        ticket
    }

    fn apply(&mut self, ticket: &FetchTicket, nodes: Arc<[CatalogNode]>) {
        let view = LevelView {
            path: ticket.path.clone(),
            nodes,
        };
        match ticket.kind {
            FetchKind::Initial => {
                self.levels = vec![view];
            }
            FetchKind::DrillIn => {
                debug_assert_eq!(ticket.path.parent().as_ref(), Some(self.path()));
                self.levels.push(view);
            }
            FetchKind::Refresh => match self.levels.last_mut() {
                Some(active) if active.path == ticket.path => *active = view,
                _ => log::warn!("dropping refresh of {}, no longer active", ticket.path),
            },
        }
    }
}
