//! Background worker lifecycle.
//!
//! The router runs in its own task and is only reachable by message. Like a
//! browser service worker it stops after a period of inactivity unless a
//! keep-alive port is open, aborting whatever is still in flight. The next
//! message starts it again.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use pdpwriter_protocols::{BridgeError, Response, RouterRequest};

use crate::router::MessageRouter;

/// Inactivity period after which an idle worker stops.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30);

const CHANNEL_CAPACITY: usize = 32;

type Envelope = (RouterRequest, oneshot::Sender<Response>);

/// Builds a [`BackgroundHandle`] around a router.
pub struct BackgroundWorker {
    router: Arc<MessageRouter>,
    idle_timeout: Duration,
}

impl BackgroundWorker {
    pub fn new(router: Arc<MessageRouter>) -> Self {
        Self {
            router,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Handle to the worker. Nothing runs until the first message.
    pub fn handle(self) -> BackgroundHandle {
        BackgroundHandle {
            inner: Arc::new(Inner {
                router: self.router,
                idle_timeout: self.idle_timeout,
                sender: Mutex::new(None),
                ports: Arc::new(AtomicUsize::new(0)),
                starts: AtomicUsize::new(0),
            }),
        }
    }
}

struct Inner {
    router: Arc<MessageRouter>,
    idle_timeout: Duration,
    sender: Mutex<Option<mpsc::Sender<Envelope>>>,
    ports: Arc<AtomicUsize>,
    starts: AtomicUsize,
}

/// Messaging endpoint of the background worker.
#[derive(Clone)]
pub struct BackgroundHandle {
    inner: Arc<Inner>,
}

impl BackgroundHandle {
    /// Send a request, starting the worker if it is not running.
    ///
    /// Fails with [`BridgeError::BackgroundUnavailable`] when the worker
    /// stops before replying.
    pub async fn send(&self, request: RouterRequest) -> Result<Response, BridgeError> {
        let sender = self.ensure_running();
        let (reply, response) = oneshot::channel();
        sender
            .send((request, reply))
            .await
            .map_err(|_| BridgeError::BackgroundUnavailable)?;
        response.await.map_err(|_| BridgeError::BackgroundUnavailable)
    }

    /// Open a keep-alive port. The worker does not idle out while any port
    /// is open; dropping the port closes it.
    pub fn connect(&self) -> KeepAlive {
        self.ensure_running();
        self.inner.ports.fetch_add(1, Ordering::SeqCst);
        debug!("Keep-alive port opened");
        KeepAlive {
            ports: self.inner.ports.clone(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner
            .sender
            .lock()
            .as_ref()
            .is_some_and(|sender| !sender.is_closed())
    }

    /// Number of times the worker has been started.
    pub fn starts(&self) -> usize {
        self.inner.starts.load(Ordering::SeqCst)
    }

    pub fn open_ports(&self) -> usize {
        self.inner.ports.load(Ordering::SeqCst)
    }

    fn ensure_running(&self) -> mpsc::Sender<Envelope> {
        let mut slot = self.inner.sender.lock();
        if let Some(sender) = slot.as_ref().filter(|sender| !sender.is_closed()) {
            return sender.clone();
        }

        let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);
        let generation = self.inner.starts.fetch_add(1, Ordering::SeqCst) + 1;
        info!(generation, "Starting background worker");
        tokio::spawn(run(
            receiver,
            self.inner.router.clone(),
            self.inner.ports.clone(),
            self.inner.idle_timeout,
        ));
        *slot = Some(sender.clone());
        sender
    }
}

async fn run(
    mut receiver: mpsc::Receiver<Envelope>,
    router: Arc<MessageRouter>,
    ports: Arc<AtomicUsize>,
    idle_timeout: Duration,
) {
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            message = receiver.recv() => {
                let Some((request, reply)) = message else {
                    break;
                };
                let router = router.clone();
                in_flight.spawn(async move {
                    let response = router.handle(request).await;
                    if reply.send(response).is_err() {
                        debug!("Caller went away before the reply");
                    }
                });
            }
            Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
            _ = tokio::time::sleep(idle_timeout) => {
                if ports.load(Ordering::SeqCst) == 0 {
                    if !in_flight.is_empty() {
                        warn!(aborted = in_flight.len(), "Idle timeout with requests in flight");
                    }
                    info!("Background worker idle, stopping");
                    break;
                }
            }
        }
    }

    receiver.close();
    in_flight.shutdown().await;
}

/// An open keep-alive port.
pub struct KeepAlive {
    ports: Arc<AtomicUsize>,
}

impl Drop for KeepAlive {
    fn drop(&mut self) {
        self.ports.fetch_sub(1, Ordering::SeqCst);
        debug!("Keep-alive port closed");
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
