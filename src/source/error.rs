use thiserror::Error;

/// Validation failures from the source selector. None of these mutate workflow state.
#[derive(Debug, Error)]
pub enum SelectionError {
    /// No file bytes or a blank URL was submitted
    #[error("No image selected: please upload an image or provide a URL")]
    NothingSelected,

    /// File's declared media type is not `image/*`
    #[error("Invalid file type '{media_type}': please upload an image file (JPEG, PNG, etc.)")]
    InvalidFileType { media_type: String },

    /// URL does not look like a direct link to an image
    #[error("Invalid URL '{url}': please enter a valid image URL (ending with jpg, png, etc.)")]
    InvalidUrl { url: String },

    /// Reading a file from disk failed
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl SelectionError {
    /// Short title used for user-facing notifications.
    pub fn title(&self) -> &'static str {
        match self {
            SelectionError::NothingSelected => "No image selected",
            SelectionError::InvalidFileType { .. } => "Invalid file type",
            SelectionError::InvalidUrl { .. } => "Invalid URL",
            SelectionError::Read { .. } => "Could not read file",
        }
    }
}
