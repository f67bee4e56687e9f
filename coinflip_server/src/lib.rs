//! HTTP front end for the coinflip gambling engine.
//!
//! The binary wires a [`coinflip::Resolver`] to either PostgreSQL or the
//! in-memory store and serves it through [`api::create_router`].

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
