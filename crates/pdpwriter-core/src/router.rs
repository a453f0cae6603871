//! Background message router.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use pdpwriter_protocols::{Response, RouterRequest};

use crate::rewrite::RewriteService;

const PONG: &str = "pong";
const UNKNOWN_TYPE: &str = "Unknown message type";

/// Single dispatch point for messages addressed to the background worker.
pub struct MessageRouter {
    service: Arc<RewriteService>,
}

impl MessageRouter {
    pub fn new(service: Arc<RewriteService>) -> Self {
        Self { service }
    }

    pub async fn handle(&self, request: RouterRequest) -> Response {
        debug!(kind = request.kind(), "Routing message");
        match request {
            RouterRequest::Generate { payload } => match self.service.rewrite(&payload).await {
                Ok(record) => {
                    info!("Rewrite succeeded");
                    Response::success(record)
                }
                Err(e) => {
                    error!(error = %e, "Rewrite failed");
                    Response::failure(e.to_string())
                }
            },
            RouterRequest::GetStatus => Response::from_result(self.service.status().await),
            RouterRequest::Ping => Response::success(PONG),
            RouterRequest::Unknown => {
                warn!("Unknown message type");
                Response::failure(UNKNOWN_TYPE)
            }
        }
    }

    /// Decode a raw message envelope and dispatch it.
    pub async fn handle_value(&self, message: Value) -> Response {
        match serde_json::from_value::<RouterRequest>(message) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                warn!(error = %e, "Malformed message");
                Response::failure(format!("Malformed message: {}", e))
            }
        }
    }
}
