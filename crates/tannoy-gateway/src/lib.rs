//! HTTP gateway exposing the announcement pipeline as a JSON API.

pub mod server;
pub mod state;

pub use server::{router, start_gateway};
pub use state::GatewayState;
