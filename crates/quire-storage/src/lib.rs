//! quire-storage
//!
//! Object storage for generated documents: the `ObjectStore` contract, its
//! S3 and Space backends, and publishing of PDF artifacts.

pub mod client;
pub mod error;
pub mod objects;
pub mod publish;
pub mod s3;
pub mod space;
pub mod store;
