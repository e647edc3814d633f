// bedwatch-api: Async Rust client for the bedwatch hospital occupancy API

pub mod auth;
pub mod client;
pub mod ehr;
pub mod error;
pub mod hospitals;
pub mod models;
pub mod predict;
pub mod public;
pub mod session;
pub mod transport;

pub use client::ApiClient;
pub use error::Error;
pub use models::*;
pub use session::{MemorySession, SessionProvider};
pub use transport::{TlsMode, TransportConfig};
