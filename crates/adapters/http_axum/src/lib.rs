//! # hubsetup-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **server-side-rendered setup wizard** under `/setup`, one
//!   page per step, that works with **zero JavaScript**
//! - Map form submissions into application service calls (driving adapter)
//! - Map step outcomes into redirects or re-rendered pages
//! - Keep the browser's wizard session referenced by a cookie
//!
//! ## No-JS wizard approach
//! - Every page is rendered server-side as complete HTML (askama templates).
//! - The footer buttons are a `<form>` posting an `action` (`next`, `back`,
//!   `test`) back to the step; successful actions redirect (PRG pattern).
//! - Failed actions re-render the step with the typed values, inline field
//!   errors and notices.
//!
//! ## Dependency rule
//! Depends on `hubsetup-app` (for port traits and services) and
//! `hubsetup-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod error;
mod form;
pub mod pages;
pub mod router;
pub mod session;
pub mod state;
