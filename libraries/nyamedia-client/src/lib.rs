//! Nyamedia Portal Client
//!
//! HTTP client for the portal's backend API.
//!
//! # Endpoints
//!
//! - `GET /api/check_user/{telegram_id}`: registration status
//! - `GET /api/pending`: media requests still in progress
//! - `GET /api/archived`: completed media requests
//!
//! [`NyamediaClient`] implements [`nyamedia_core::PortalApi`], so it plugs
//! straight into a [`nyamedia_core::Portal`].
//!
//! # Example
//!
//! ```ignore
//! use nyamedia_client::{ClientConfig, NyamediaClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = NyamediaClient::new(ClientConfig::new("https://media.example.com"))?;
//!
//!     let status = client.check_user(123_456_789).await?;
//!     if status.registered {
//!         let pending = client.pending().await?;
//!         println!("{} pending requests", pending.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::NyamediaClient;
pub use error::{ClientError, Result};
pub use types::ClientConfig;
