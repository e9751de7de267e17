//! HTTP surface for poem and qaafia search.

pub mod rest;

pub use rest::{AppState, RestApi, ServerConfig, DEFAULT_REQUEST_TIMEOUT};
