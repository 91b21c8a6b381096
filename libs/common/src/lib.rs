//! Common library for the salon dashboard services
//!
//! This crate provides the pieces shared by the auth and api services: the
//! session codec, the upstream HTTP client, the typed catalog façade,
//! configuration, validation and error types.
//!
//! ```rust,no_run
//! use common::{
//!     catalog::ServicesService,
//!     config::Settings,
//!     http::HttpClient,
//!     session::SessionCodec,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::from_env()?;
//!     let upstream = HttpClient::from_settings(&settings)?;
//!     let catalog = ServicesService::new(upstream.clone(), upstream.rebase(&settings.dashboard_url));
//!
//!     let codec = SessionCodec::new(&settings.session_secret, settings.session_ttl_secs);
//!     let session = codec.decode("<signed session>")?;
//!     let page = catalog.find_all(Some(&session), 1, 9).await?;
//!     println!("{} services", page.total_elements);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod session;
pub mod validation;
