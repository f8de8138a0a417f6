// parkdesk-api: async client for the parking-management REST backend.
//
// `Client` owns transport and envelope decoding; `services/` adds one
// inherent-method block per resource; `Session` carries the bearer token.

pub mod client;
pub mod envelope;
pub mod error;
pub mod models;
pub mod session;
pub mod transport;

mod services;

pub use client::Client;
pub use error::Error;
pub use session::{MemoryTokenStore, Session, TokenStore};
pub use transport::{TlsMode, TransportConfig};
