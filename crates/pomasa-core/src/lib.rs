pub mod catalog;
pub mod config;
pub mod creation;
pub mod dialog;
pub mod error;
pub mod io;
pub mod paths;
pub mod tree;
pub mod user_input;

pub use error::{PomasaError, Result};
