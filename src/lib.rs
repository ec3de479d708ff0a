pub mod config;
pub mod customer;
pub mod error;
pub mod model;
pub mod predictor;
pub mod server;

pub use error::{Error, Result};
