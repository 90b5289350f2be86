//! # apollo-api
//!
//! HTTP boundary of the event engagement server, built on Axum. Handlers
//! check the session and the anti-forgery nonce, call one service, and reply
//! with the `{success, data}` envelope.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod render;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run, run_server};
pub use state::AppState;
