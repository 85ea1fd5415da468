//! Background fetch worker.
//!
//! Fetches run on a dedicated thread so the render loop never blocks. The
//! loop submits tickets and polls completions non-blockingly; completions are
//! applied back on the loop's own thread, so state is only ever mutated from
//! one place.

use super::{FetchCompletion, PageFetcher};
use crate::model::FetchError;
use crate::state::FetchTicket;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Handle to the fetch thread.
///
/// Dropping the handle closes the request channel; the thread exits after
/// finishing the fetch it is currently simulating.
#[derive(Debug)]
pub struct FetchWorker {
    requests: Sender<FetchTicket>,
    completions: Receiver<FetchCompletion>,
}

impl FetchWorker {
    /// Spawn a worker that serves tickets with `fetcher` after `delay`.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the OS refuses to spawn the thread.
    pub fn spawn<F>(mut fetcher: F, delay: Duration) -> std::io::Result<Self>
    where
        F: PageFetcher + 'static,
    {
        let (request_tx, request_rx) = mpsc::channel::<FetchTicket>();
        let (completion_tx, completion_rx) = mpsc::channel();

        thread::Builder::new()
            .name("feedscope-fetch".to_string())
            .spawn(move || {
                for ticket in request_rx {
                    if !delay.is_zero() {
                        thread::sleep(delay);
                    }
                    let completion = FetchCompletion::run(&mut fetcher, ticket);
                    debug!(
                        generation = ticket.generation,
                        page = ticket.page,
                        ok = completion.result.is_ok(),
                        "Fetch finished"
                    );
                    if completion_tx.send(completion).is_err() {
                        break;
                    }
                }
            })?;

        Ok(Self {
            requests: request_tx,
            completions: completion_rx,
        })
    }

    /// Queue a fetch.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Disconnected`] if the worker thread has exited.
    pub fn submit(&self, ticket: FetchTicket) -> Result<(), FetchError> {
        debug!(
            generation = ticket.generation,
            page = ticket.page,
            kind = ?ticket.kind,
            "Submitting fetch"
        );
        self.requests.send(ticket).map_err(|_| {
            warn!("Fetch worker is gone");
            FetchError::Disconnected
        })
    }

    /// Take one finished fetch, if any. Never blocks.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Disconnected`] if the worker thread has exited.
    pub fn try_recv(&self) -> Result<Option<FetchCompletion>, FetchError> {
        match self.completions.try_recv() {
            Ok(completion) => Ok(Some(completion)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(FetchError::Disconnected),
        }
    }

    /// Block up to `timeout` for one finished fetch.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Disconnected`] if the worker thread has exited.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<FetchCompletion>, FetchError> {
        match self.completions.recv_timeout(timeout) {
            Ok(completion) => Ok(Some(completion)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(FetchError::Disconnected),
        }
    }
}
