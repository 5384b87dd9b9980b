//! Image resources selected through the file input.

use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// A file as delivered by the file or camera input.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Arc<[u8]>,
}

impl ImageFile {
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }
}

impl fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFile")
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Displayable resource derived from a selected file.
///
/// Each handle gets a fresh `blob:` source, so selecting the same file twice
/// yields two distinct handles. The bytes are shared with the originating
/// [`ImageFile`].
#[derive(Clone, PartialEq, Eq)]
pub struct ImageHandle {
    id: Uuid,
    name: String,
    media_type: String,
    bytes: Arc<[u8]>,
}

impl ImageHandle {
    pub fn from_file(file: &ImageFile) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: file.name.clone(),
            media_type: file.media_type.clone(),
            bytes: Arc::clone(&file.bytes),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Source string the view hands to its image element.
    pub fn source(&self) -> String {
        format!("blob:snapid/{}", self.id)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageHandle")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .finish_non_exhaustive()
    }
}
