use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncReadExt;

use crate::traits::ImageFile;

/// An image on the local filesystem, as handed over by the file picker.
#[derive(Debug, Clone)]
pub struct LocalImage {
    path: PathBuf,
    size: u64,
    mime_type: String,
}

impl LocalImage {
    /// Stat the file and guess its MIME type from the extension. The bytes
    /// are not read until the workflow encodes them.
    pub async fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let metadata = tokio::fs::metadata(&path).await?;
        let mime_type = mime_guess::from_path(&path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self {
            path,
            size: metadata.len(),
            mime_type,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The picker's `image/*` filter.
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

#[async_trait]
impl ImageFile for LocalImage {
    fn size(&self) -> u64 {
        self.size
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Reads at most the size seen at `open`; a file that has grown since
    /// is an error rather than a larger upload.
    async fn read(&self) -> std::io::Result<Vec<u8>> {
        let file = tokio::fs::File::open(&self.path).await?;
        let mut bytes = Vec::with_capacity(self.size as usize);
        file.take(self.size + 1).read_to_end(&mut bytes).await?;

        if bytes.len() as u64 > self.size {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!(
                    "{} grew after it was selected (expected {} bytes)",
                    self.path.display(),
                    self.size
                ),
            ));
        }
        Ok(bytes)
    }
}
