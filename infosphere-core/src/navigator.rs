use crossbeam_channel::Receiver;
use url::Url;

use crate::{
    error::{Error, FetchError},
    state::{Back, Completion, FetchReply, FetchTicket, NavigatorState},
    store::CatalogStore,
    worker::FetchWorker,
};

/// One catalog screen: navigation state plus the worker running its fetches.
/// User actions return as soon as the fetch is dispatched, replies are applied
/// through `handle_reply`, `poll` or `wait_idle`.
pub struct Navigator {
    state: NavigatorState,
    worker: FetchWorker,
}

impl Navigator {
    pub fn new<S>(store: S) -> Self
    where
        S: CatalogStore + 'static,
    {
        Self {
            state: NavigatorState::new(),
            worker: FetchWorker::spawn(store),
        }
    }

    pub fn state(&self) -> &NavigatorState {
        &self.state
    }

    pub fn initialize(&mut self) -> Result<(), Error> {
        let ticket = self.state.initialize()?;
        self.dispatch(ticket)
    }

    pub fn select(&mut self, id: &str) -> Result<(), Error> {
        let ticket = self.state.select(id)?;
        self.dispatch(ticket)
    }

    pub fn back(&mut self) -> Result<Back, Error> {
        self.state.back()
    }

    pub fn refresh(&mut self) -> Result<(), Error> {
        let ticket = self.state.refresh()?;
        self.dispatch(ticket)
    }

    pub fn retry(&mut self) -> Result<(), Error> {
        let ticket = self.state.retry()?;
        self.dispatch(ticket)
    }

    pub fn open_video(&mut self, url: Url) {
        self.state.open_video(url);
    }

    pub fn open_node_video(&mut self, id: &str) -> Result<Url, Error> {
        self.state.open_node_video(id)
    }

    pub fn close_video(&mut self) -> Option<Url> {
        self.state.close_video()
    }

    /// Receiver of fetch replies, for event loops selecting over several
    /// sources.  Pass what arrives to `handle_reply`.
    pub fn replies(&self) -> &Receiver<FetchReply> {
        self.worker.replies()
    }

    pub fn handle_reply(&mut self, reply: FetchReply) -> Completion {
        self.state.complete(reply)
    }

    /// Apply a reply if one is ready.
    pub fn poll(&mut self) -> Option<Completion> {
        let reply = self.worker.replies().try_recv().ok()?;
        Some(self.handle_reply(reply))
    }

    /// Block until no fetch is pending.  Returns the completion of the
    /// pending fetch, or `None` if nothing was loading.
    pub fn wait_idle(&mut self) -> Result<Option<Completion>, Error> {
        let mut last = None;
        while self.state.is_loading() {
            let reply = self
                .worker
                .replies()
                .recv()
                .map_err(|_| Error::WorkerDisconnected)?;
            match self.state.complete(reply) {
                Completion::Stale => {}
                completion => last = Some(completion),
            }
        }
        Ok(last)
    }

    fn dispatch(&mut self, ticket: FetchTicket) -> Result<(), Error> {
        if let Err(err) = self.worker.dispatch(ticket.clone()) {
            // Settle the ticket so the loading gate does not stay shut.
            self.state.complete(FetchReply {
                ticket,
                result: Err(FetchError::Unknown(err.to_string())),
            });
            return Err(err);
        }
        Ok(())
    }
}
