//! quire-core
//!
//! Request vocabulary shared by every Quire crate: the render request model,
//! its validator, and object naming conventions. No I/O lives here.

pub mod error;
pub mod models;
pub mod object_keys;
pub mod validate;
