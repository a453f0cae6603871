//! Content script bridge.
//!
//! The page agent runs as its own task and is only reachable by message. A
//! [`TabHandle`] is what the controller holds for the active tab; a tab
//! without a content script fails every send.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use pdpwriter_protocols::{BridgeError, PageRequest, Response};

use crate::agent::PageAgent;

const CHANNEL_CAPACITY: usize = 16;

type Envelope = (PageRequest, oneshot::Sender<Response>);

/// Runs a [`PageAgent`] behind a message channel.
pub struct ContentScript;

impl ContentScript {
    /// Spawn the agent task and return a handle to its tab.
    ///
    /// The task ends once every handle is dropped.
    pub fn spawn(agent: PageAgent, url: Option<String>) -> TabHandle {
        let (sender, mut receiver) = mpsc::channel::<Envelope>(CHANNEL_CAPACITY);
        let agent = Arc::new(agent);

        tokio::spawn(async move {
            while let Some((request, reply)) = receiver.recv().await {
                let kind = request.kind();
                debug!(kind, "Content script received request");
                let response = agent.handle(request).await;
                if reply.send(response).is_err() {
                    warn!(kind, "Sender went away before the reply");
                }
            }
            debug!("Content script stopped");
        });

        TabHandle {
            url,
            sender: Some(sender),
        }
    }
}

/// The active tab as seen by the controller.
#[derive(Clone)]
pub struct TabHandle {
    url: Option<String>,
    sender: Option<mpsc::Sender<Envelope>>,
}

impl TabHandle {
    /// A tab where no content script was injected.
    pub fn without_content_script(url: Option<String>) -> Self {
        Self { url, sender: None }
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Send a request to the tab's content script and wait for its reply.
    pub async fn send(&self, request: PageRequest) -> Result<Response, BridgeError> {
        let sender = self
            .sender
            .as_ref()
            .ok_or(BridgeError::ContentScriptUnavailable)?;

        let (reply, response) = oneshot::channel();
        sender
            .send((request, reply))
            .await
            .map_err(|_| BridgeError::ContentScriptUnavailable)?;
        response
            .await
            .map_err(|_| BridgeError::ContentScriptUnavailable)
    }
}

impl std::fmt::Debug for TabHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabHandle")
            .field("url", &self.url)
            .field("content_script", &self.sender.is_some())
            .finish()
    }
}
