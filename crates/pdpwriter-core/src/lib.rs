//! # pdpwriter Core
//!
//! The extension's background and popup halves:
//!
//! - [`RewriteService`] - mock or live rewriting of a scraped record
//! - [`MessageRouter`] - the background message listener
//! - [`BackgroundWorker`] - the router behind a channel, with an idle lifecycle
//! - [`Controller`] - the apply and preview flows plus the mode badge

pub mod controller;
pub mod rewrite;
pub mod router;
pub mod worker;

pub use controller::{Badge, Controller, ControllerError, RecordingSink, StatusSink};
pub use rewrite::RewriteService;
pub use router::MessageRouter;
pub use worker::{BackgroundHandle, BackgroundWorker, KeepAlive};
