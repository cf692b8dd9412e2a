use thiserror::Error;

/// Transport-level failures. These never leave `AnalysisClient`; they are
/// logged and folded into an `AnalysisError`.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Service answered with a non-2xx status
    #[error("{endpoint} responded with HTTP {status}")]
    Status { endpoint: String, status: u16 },

    /// Connection or body transfer failed
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// Body was not the JSON we expected
    #[error("could not decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    /// Building the request itself failed (bad media type, bad base URL)
    #[error("could not build request for {endpoint}: {message}")]
    Request { endpoint: String, message: String },
}
