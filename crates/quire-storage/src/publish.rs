use quire_core::object_keys::{PDF_CONTENT_TYPE, download_filename, pdf_object_name};

use crate::error::StorageError;
use crate::store::{NewObject, ObjectStore, StoredObject, Visibility};

/// Store a finished PDF under a fresh unique name with public visibility.
///
/// `name_hint` is the caller-supplied document name; when it sanitizes to
/// something usable it becomes the suggested download filename.
pub async fn publish(
    store: &dyn ObjectStore,
    pdf: Vec<u8>,
    name_hint: Option<&str>,
) -> Result<StoredObject, StorageError> {
    let object = NewObject {
        name: pdf_object_name(),
        body: pdf,
        content_type: PDF_CONTENT_TYPE.to_string(),
        visibility: Visibility::Public,
        display_name: name_hint.and_then(download_filename),
    };
    let bytes = object.body.len();
    let stored = store.create(object).await?;
    tracing::info!(name = %stored.name, url = %stored.url, bytes, "pdf published");
    Ok(stored)
}
