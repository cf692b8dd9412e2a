use serde::Serialize;

/// An image file picked by the user, held in memory until it is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }
}

/// What gets sent to the analysis service. Exactly one source is active at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisRequest {
    File(ImageFile),
    Url(String),
}

impl AnalysisRequest {
    pub fn kind(&self) -> SourceKind {
        match self {
            AnalysisRequest::File(_) => SourceKind::File,
            AnalysisRequest::Url(_) => SourceKind::Url,
        }
    }

    /// Stable SHA-1 of the payload, used to correlate trace lines with a request.
    pub fn fingerprint(&self) -> String {
        use sha1::{Digest, Sha1};

        let mut hasher = Sha1::new();
        match self {
            AnalysisRequest::File(file) => {
                hasher.update(b"file:");
                hasher.update(&file.bytes);
            }
            AnalysisRequest::Url(url) => {
                hasher.update(b"url:");
                hasher.update(url.as_bytes());
            }
        }
        format!("{:x}", hasher.finalize())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    File,
    Url,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::File => "file",
            SourceKind::Url => "url",
        }
    }
}

/// Something the presentation layer can render without touching the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "src", rename_all = "snake_case")]
pub enum Preview {
    DataUri(String),
    RemoteUrl(String),
}

impl Preview {
    pub fn as_str(&self) -> &str {
        match self {
            Preview::DataUri(s) | Preview::RemoteUrl(s) => s,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }
}

/// A validated source together with its preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub request: AnalysisRequest,
    pub preview: Preview,
}
