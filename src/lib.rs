//! Gut: Content-Addressable Object Store
//!
//! Turns file and directory content into immutable, hash-identified objects
//! and persists them as zlib-compressed loose objects on disk.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod object;
pub mod store;
pub mod tree;
pub mod types;
