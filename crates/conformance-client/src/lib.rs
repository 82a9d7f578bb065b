//! Request transport for the HSDS-UK conformance validator.
//!
//! The validation engine only ever issues HTTP GETs for JSON
//! documents, so the whole transport surface is one trait with one
//! method. The [`HttpTransport`] implementation adds the resource
//! policies the engine must not know about: per-call timeout, bounded
//! retry with backoff, response caching and a cap on simultaneous
//! outbound requests. [`MemoryTransport`] serves canned responses for
//! tests.

pub mod error;
pub mod http;
pub mod memory;
pub mod transport;

pub use error::{TransportError, TransportResult};
pub use http::{HttpTransport, HttpTransportConfig};
pub use memory::MemoryTransport;
pub use transport::RequestTransport;
