//! Shared plumbing for the Bucks crates: logging setup, runtime directory
//! checks, pagination and small wire types.

pub mod env;
pub mod pagination;
pub mod types;
pub mod utils;
