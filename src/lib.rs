pub mod adapter;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use error::CafeError;
pub use router::{CafeState, cafe_router};
