// src/services/uploads.rs
//! Image storage on the local filesystem
//!
//! Files land in a single upload directory under generated names and are
//! served back statically under [`PUBLIC_PREFIX`].

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

use crate::common::ApiError;

pub const PUBLIC_PREFIX: &str = "/uploads";
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];
const BASE64_EXTENSION: &str = "webp";

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Image is required")]
    EmptyImage,

    #[error("Invalid base64 image")]
    InvalidBase64,

    #[error("No files uploaded")]
    NoFiles,

    #[error("File {name} exceeds maximum size limit of {limit} bytes")]
    TooLarge { name: String, limit: usize },

    #[error("File type {extension} is not allowed for {name}. Allowed types: .jpg, .jpeg, .png, .gif")]
    DisallowedType { name: String, extension: String },

    #[error("Failed to save file: {0}")]
    Io(#[from] std::io::Error),
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Io(e) => {
                tracing::error!(error = %e, "Failed to write uploaded image");
                ApiError::InternalServer("Failed to save image".to_string())
            }
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

/// A file accepted from a multipart request, not yet validated
#[derive(Debug)]
pub struct IncomingFile {
    pub original_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoredFile {
    pub filename: String,
    pub url: String,
    #[serde(skip)]
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ImageStorage {
    dir: PathBuf,
}

impl ImageStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Decodes a base64 payload, optionally prefixed by a data-URI header,
    /// and stores it as a `.webp` file. The content is not inspected.
    pub async fn save_base64(&self, payload: &str) -> Result<StoredFile, UploadError> {
        let encoded = match payload.find(',') {
            Some(idx) => &payload[idx + 1..],
            None => payload,
        };
        let encoded = encoded.trim();
        if encoded.is_empty() {
            return Err(UploadError::EmptyImage);
        }

        let bytes = STANDARD
            .decode(encoded)
            .map_err(|_| UploadError::InvalidBase64)?;

        let stored = self.write(BASE64_EXTENSION, &bytes).await?;
        info!(filename = %stored.filename, size = bytes.len(), "Stored base64 image");
        Ok(stored)
    }

    /// Validates and stores every file. If any file fails, the files already
    /// written for this batch are removed before the error is returned.
    pub async fn save_batch(&self, files: Vec<IncomingFile>) -> Result<Vec<StoredFile>, UploadError> {
        if files.is_empty() {
            return Err(UploadError::NoFiles);
        }

        let mut stored: Vec<StoredFile> = Vec::with_capacity(files.len());
        for file in files {
            match self.save_checked(&file).await {
                Ok(saved) => stored.push(saved),
                Err(e) => {
                    warn!(error = %e, saved = stored.len(), "Upload batch failed, removing saved files");
                    for saved in &stored {
                        if let Err(remove_err) = tokio::fs::remove_file(&saved.path).await {
                            warn!(error = %remove_err, path = %saved.path.display(), "Failed to remove partial upload");
                        }
                    }
                    return Err(e);
                }
            }
        }

        info!(count = stored.len(), "Stored uploaded images");
        Ok(stored)
    }

    async fn save_checked(&self, file: &IncomingFile) -> Result<StoredFile, UploadError> {
        if file.bytes.len() > MAX_FILE_SIZE {
            return Err(UploadError::TooLarge {
                name: file.original_name.clone(),
                limit: MAX_FILE_SIZE,
            });
        }

        let extension = Path::new(&file.original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(UploadError::DisallowedType {
                name: file.original_name.clone(),
                extension: if extension.is_empty() {
                    "(none)".to_string()
                } else {
                    format!(".{}", extension)
                },
            });
        }

        self.write(&extension, &file.bytes).await
    }

    async fn write(&self, extension: &str, bytes: &[u8]) -> Result<StoredFile, UploadError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let filename = format!("{}.{}", Uuid::new_v4(), extension);
        let path = self.dir.join(&filename);
        tokio::fs::write(&path, bytes).await?;

        Ok(StoredFile {
            url: format!("{}/{}", PUBLIC_PREFIX, filename),
            filename,
            path,
        })
    }
}
