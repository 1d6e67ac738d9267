use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

/// An object to be created in a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewObject {
    /// Object name, unique within the store.
    pub name: String,
    pub body: Vec<u8>,
    pub content_type: String,
    pub visibility: Visibility,
    /// Filename offered to people downloading the object.
    pub display_name: Option<String>,
}

/// A created object and where it can be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    pub name: String,
    pub url: String,
}

/// Storage service that turns bytes into an addressable object.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn create(&self, object: NewObject) -> Result<StoredObject, StorageError>;
}
