use std::path::Path;
use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;

use crate::source::{
    error::SelectionError,
    source_model::{AnalysisRequest, ImageFile, Preview, Selection},
};

static IMAGE_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https?://.+\.(jpg|jpeg|png|webp|bmp|gif)$").unwrap()
});

// ============================================================================
// Validation
// ============================================================================

/// True when the declared media type is some `image/*` type.
pub fn is_image_media_type(media_type: &str) -> bool {
    media_type
        .trim()
        .to_ascii_lowercase()
        .strip_prefix("image/")
        .is_some_and(|subtype| !subtype.is_empty())
}

/// Syntactic check only. Never touches the network.
pub fn is_image_url(url: &str) -> bool {
    IMAGE_URL_RE.is_match(url)
}

/// Validate a picked file and build its local preview.
pub fn select_file(file: ImageFile) -> Result<Selection, SelectionError> {
    if file.bytes.is_empty() {
        return Err(SelectionError::NothingSelected);
    }
    if !is_image_media_type(&file.media_type) {
        return Err(SelectionError::InvalidFileType {
            media_type: file.media_type,
        });
    }

    let preview = Preview::DataUri(data_uri(&file.media_type, &file.bytes));
    Ok(Selection {
        request: AnalysisRequest::File(file),
        preview,
    })
}

/// Validate a pasted URL. The URL doubles as its own preview.
pub fn select_url(url: &str) -> Result<Selection, SelectionError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(SelectionError::NothingSelected);
    }
    if !is_image_url(url) {
        return Err(SelectionError::InvalidUrl {
            url: url.to_string(),
        });
    }

    Ok(Selection {
        request: AnalysisRequest::Url(url.to_string()),
        preview: Preview::RemoteUrl(url.to_string()),
    })
}

/// `data:<media type>;base64,<payload>`
pub fn data_uri(media_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", media_type, STANDARD.encode(bytes))
}

// ============================================================================
// Loading from disk
// ============================================================================

/// Guess a media type: content sniffing first, then the file extension.
pub fn detect_media_type(path: &Path, bytes: &[u8]) -> String {
    if let Some(kind) = infer::get(bytes) {
        return kind.mime_type().to_string();
    }

    mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string())
}

/// Read a file into an `ImageFile`. Validation happens later in `select_file`.
pub async fn load_image_file(path: &Path) -> Result<ImageFile, SelectionError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| SelectionError::Read {
            path: path.display().to_string(),
            source,
        })?;

    let media_type = detect_media_type(path, &bytes);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());

    Ok(ImageFile::new(name, media_type, bytes))
}
