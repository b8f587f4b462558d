#![doc = "The `todoforge` library crate."]
#![doc = ""]
#![doc = "Authentication (password hashing, signed tokens, the request gate), user and"]
#![doc = "to-do management routes, persistence seams and error handling. The binary in"]
#![doc = "`main.rs` wires these together with configuration from the environment."]
// The OpenAPI document is one large `json!` literal.
#![recursion_limit = "256"]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod security;
pub mod state;
pub mod store;

pub use crate::config::Config;
pub use crate::error::AppError;
pub use crate::state::AppState;
