pub mod issue;
pub mod params;
pub mod request;
