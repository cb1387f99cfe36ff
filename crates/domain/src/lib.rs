//! # hubsetup-domain
//!
//! Pure domain model for the hub setup wizard.
//!
//! ## Responsibilities
//! - Define the **wizard steps** (`start → plugins → email → password → complete`)
//!   and the rules for moving between them
//! - Define the **forms** each step submits (registration, email, password)
//!   and their client-side validation
//! - Mirror the **hub resources** the wizard reads and writes (configuration,
//!   plugins, image, credentials)
//! - Hold the per-browser **session state** (active step, credentials, notices)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;

pub mod email;
pub mod hub;
pub mod password;
pub mod plugin;
pub mod registration;
pub mod session;
pub mod step;
pub mod wizard;
