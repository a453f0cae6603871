//! # pdpwriter Protocols
//!
//! Types shared by the three execution contexts of pdpwriter:
//!
//! - the page agent (scrapes and rewrites the product page),
//! - the background worker (routes messages to the rewrite service),
//! - the controller (drives a user action end to end).
//!
//! Nothing in here performs I/O.

pub mod error;
pub mod message;
pub mod record;

pub use error::{BridgeError, ProviderError, RewriteError};
pub use message::{PageRequest, Response, RouterRequest, StatusInfo};
pub use record::{Field, RewrittenRecord, ScrapedRecord};
