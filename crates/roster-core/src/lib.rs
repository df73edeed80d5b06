//! Core types, collaborator traits and services for the roster platform.
//!
//! This crate is deliberately free of HTTP and database dependencies. Storage
//! backends implement the traits in [`store`]; the services in [`alts`] and
//! [`channel`] are built on top of them with explicitly injected
//! collaborators.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod alt;
pub mod alts;
pub mod channel;
pub mod character;
pub mod error;
pub mod event;
pub mod location;
pub mod store;

pub use error::{Error, Result};
