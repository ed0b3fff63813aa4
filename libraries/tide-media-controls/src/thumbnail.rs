//! Background cover-art loader.
//!
//! Resolving a file into a native stream blocks, so it runs on one worker
//! thread fed by a bounded queue. Every metadata update bumps a generation
//! counter before touching the session. The worker checks the generation
//! before loading and again when staging the result, so a slow load for an
//! old track never lands after a newer one.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use tracing::{debug, warn};

use crate::error::Result;
use crate::session::MediaSession;

pub(crate) type SharedSession = Arc<dyn MediaSession>;

struct ThumbnailJob {
    generation: u64,
    path: PathBuf,
}

pub(crate) struct ThumbnailWorker {
    tx: Option<Sender<ThumbnailJob>>,
    handle: Option<JoinHandle<()>>,
    generation: Arc<AtomicU64>,
    cancelled: Arc<AtomicBool>,
}

impl ThumbnailWorker {
    pub(crate) fn spawn(session: SharedSession, capacity: usize) -> Result<Self> {
        let (tx, rx) = bounded(capacity.max(1));
        let generation = Arc::new(AtomicU64::new(0));
        let cancelled = Arc::new(AtomicBool::new(false));

        let handle = thread::Builder::new().name("media-thumbnail".into()).spawn({
            let generation = generation.clone();
            let cancelled = cancelled.clone();
            move || run(&rx, &session, &generation, &cancelled)
        })?;

        Ok(Self {
            tx: Some(tx),
            handle: Some(handle),
            generation,
            cancelled,
        })
    }

    /// Queue a load for `path`, superseding anything already queued.
    ///
    /// Returns `false` if the queue is full or the worker is gone; the caller
    /// then publishes without art.
    pub(crate) fn submit(&self, path: PathBuf) -> bool {
        let Some(tx) = &self.tx else {
            return false;
        };

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        match tx.try_send(ThumbnailJob { generation, path }) {
            Ok(()) => true,
            Err(TrySendError::Full(job)) => {
                warn!(path = %job.path.display(), "Thumbnail queue full, skipping art");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// Invalidate queued and in-flight jobs without queueing a new one.
    ///
    /// Called before new metadata is staged.
    pub(crate) fn supersede(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Cancel pending work and wait for the worker to exit.
    pub(crate) fn shutdown(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.tx.take();

        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Thumbnail worker panicked");
            }
        }
    }
}

impl Drop for ThumbnailWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run(
    rx: &Receiver<ThumbnailJob>,
    session: &SharedSession,
    generation: &AtomicU64,
    cancelled: &AtomicBool,
) {
    for job in rx {
        if cancelled.load(Ordering::SeqCst) {
            break;
        }
        let is_current = || job.generation == generation.load(Ordering::SeqCst);
        if !is_current() {
            debug!(path = %job.path.display(), "Dropping stale thumbnail");
            continue;
        }

        // Art is optional: publish the text even if the image fails
        match session.set_thumbnail(&job.path, &is_current) {
            Ok(true) => {}
            Ok(false) => {
                debug!(path = %job.path.display(), "Thumbnail superseded during load");
                continue;
            }
            Err(e) => {
                debug!(path = %job.path.display(), error = %e, "Thumbnail load failed");
            }
        }
        if !is_current() {
            continue;
        }
        if let Err(e) = session.commit() {
            warn!(error = %e, "Failed to publish media metadata");
        }
    }

    debug!("Thumbnail worker stopped");
}
