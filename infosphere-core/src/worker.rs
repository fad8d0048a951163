use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::{
    error::Error,
    state::{FetchReply, FetchTicket},
    store::CatalogStore,
};

/// Thread owning a catalog store.  Tickets go in, replies come out in the
/// same order; the owner of the navigation state never blocks on the store.
pub struct FetchWorker {
    sender: Option<Sender<FetchTicket>>,
    replies: Receiver<FetchReply>,
    thread: Option<JoinHandle<()>>,
}

impl FetchWorker {
    pub fn spawn<S>(store: S) -> Self
    where
        S: CatalogStore + 'static,
    {
        let (ticket_send, ticket_recv) = unbounded();
        let (reply_send, reply_recv) = unbounded();
        let thread = thread::spawn(move || Self::service(store, ticket_recv, reply_send));
        Self {
            sender: Some(ticket_send),
            replies: reply_recv,
            thread: Some(thread),
        }
    }

    fn service<S: CatalogStore>(
        store: S,
        tickets: Receiver<FetchTicket>,
        replies: Sender<FetchReply>,
    ) {
        for ticket in tickets {
            let result = store.fetch_children(&ticket.path);
            if replies.send(FetchReply { ticket, result }).is_err() {
                log::debug!("reply receiver gone, stopping fetch worker");
                break;
            }
        }
    }

    pub fn dispatch(&self, ticket: FetchTicket) -> Result<(), Error> {
        self.sender
            .as_ref()
            .ok_or(Error::WorkerDisconnected)?
            .send(ticket)
            .map_err(|_| Error::WorkerDisconnected)
    }

    pub fn replies(&self) -> &Receiver<FetchReply> {
        &self.replies
    }

    /// Close the ticket channel and wait for the thread to finish the fetch
    /// it may be running.
    pub fn shutdown(&mut self) {
        self.sender.take();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("fetch worker panicked");
            }
        }
    }
}

impl Drop for FetchWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
