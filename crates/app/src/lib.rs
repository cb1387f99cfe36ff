//! # hubsetup-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `HubApi` — the hub's REST API (configuration, image, plugins, e-mail, password)
//!   - `Geocoder` — address to coordinates lookup
//!   - `SessionStore` — keep wizard sessions between requests
//! - Define **driving/inbound ports** as use-case structs, one per wizard step:
//!   - `SignInService`, `RegistrationService`, `PluginService`,
//!     `EmailService`, `PasswordService`
//!   - `Navigator` — maps step slugs to steps and runs before/after hooks
//! - Provide **in-process infrastructure** (session store) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `hubsetup-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod navigator;
pub mod ports;
pub mod services;
pub mod session_store;
