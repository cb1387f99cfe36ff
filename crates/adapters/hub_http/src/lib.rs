//! # hubsetup-adapter-hub-http
//!
//! Outbound HTTP adapter built on [reqwest](https://docs.rs/reqwest).
//!
//! ## Responsibilities
//! - Implement the `HubApi` port against the hub REST API
//!   (`/api/v1/hubs/{hub}/…`), including OpenID sign-in
//! - Implement the `Geocoder` port against a Nominatim-style search endpoint
//! - Map HTTP statuses into domain outcomes: `202` is an accepted write,
//!   `401` invalidates the credentials, a `4xx` error body becomes a message
//!   for the user
//!
//! ## Dependency rule
//! Depends on `hubsetup-app` (for port traits) and `hubsetup-domain`.
//! reqwest types never cross the port boundary.

pub mod client;
pub mod config;
mod dto;
pub mod error;
pub mod nominatim;

pub use client::HubHttpClient;
pub use config::{AuthMode, GeocoderConfig, HubClientConfig};
pub use error::HubClientError;
pub use nominatim::NominatimGeocoder;
