//! Transport layer
//!
//! [`HttpClient`] is the seam between the typed API and the wire: the
//! network implementation talks to the catalog server, tests swap in a
//! scripted fake.

pub mod http;

pub use http::{FilePart, HttpClient, HttpResult, NetworkHttpClient};
