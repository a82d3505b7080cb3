//! Upload service
//!
//! Stores chat attachments under the upload directory and returns the
//! relative path clients put into a message body.

use std::path::PathBuf;

use campus_core::DomainError;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::dto::UploadResponse;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Public prefix uploads are served under
const PUBLIC_PREFIX: &str = "upload";

/// Kind of attachment being stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Image,
    File,
}

impl UploadKind {
    /// Sub-directory below `{upload_dir}/chat`
    pub const fn directory(self) -> &'static str {
        match self {
            Self::Image => "photo",
            Self::File => "file",
        }
    }

    /// Multipart field name carrying the payload
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::File => "file",
        }
    }
}

/// Reduce a client-supplied file name to a safe single path segment
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Upload service
pub struct UploadService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UploadService<'a> {
    /// Create a new UploadService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Size limit for `kind`, in bytes
    pub fn limit_for(&self, kind: UploadKind) -> u64 {
        let storage = self.ctx.storage_config();
        match kind {
            UploadKind::Image => storage.max_image_bytes,
            UploadKind::File => storage.max_file_bytes,
        }
    }

    /// Validate and write an attachment
    ///
    /// # Errors
    /// `FileTooLarge` above the kind's limit, `UnsupportedMediaType` for an
    /// image upload without an `image/*` content type, `Storage` when the
    /// file cannot be written.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn store(
        &self,
        kind: UploadKind,
        original_name: &str,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> ServiceResult<UploadResponse> {
        let max_bytes = self.limit_for(kind);
        if bytes.len() as u64 > max_bytes {
            return Err(DomainError::FileTooLarge { max_bytes }.into());
        }
        if kind == UploadKind::Image {
            let content_type = content_type.unwrap_or_default();
            if !content_type.starts_with("image/") {
                return Err(DomainError::UnsupportedMediaType(content_type.to_string()).into());
            }
        }

        let file_name = format!("{}_{}", Uuid::new_v4(), sanitize_file_name(original_name));
        let dir: PathBuf = [
            self.ctx.storage_config().upload_dir.as_str(),
            "chat",
            kind.directory(),
        ]
        .iter()
        .collect();

        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&file_name), bytes).await?;

        let url = format!("{PUBLIC_PREFIX}/chat/{}/{file_name}", kind.directory());
        info!(url = %url, "Upload stored");

        Ok(UploadResponse { url })
    }
}
