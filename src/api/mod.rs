//! API module - HTTP interface over the ledger operations

mod routes;
mod server;

pub use routes::*;
pub use server::*;
