pub mod bootstrap;
mod dto;
mod error;
pub mod logging;
pub mod routes;
mod ws;

pub use bootstrap::{run_server, ServerConfig};
pub use error::ApiError;
pub use routes::{HoldemServer, ServerContext};
