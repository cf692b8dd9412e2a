use tracing::{info, warn};

use crate::client::{
    backend::{AnalysisBackend, HttpBackend},
    client_model::{AnalysisError, AnalysisOutcome, PriceInfo},
};
use crate::source::source_model::AnalysisRequest;

/// Shown for every transport, status or decode failure. Details go to the log.
pub const ANALYSIS_FAILED_MESSAGE: &str =
    "There was a problem analyzing your image. Please try again.";

/// Names the service uses when it could not identify produce.
const UNIDENTIFIED_NAMES: [&str; 2] = ["unknown", "not a fruit or vegetable"];

/// Normalizes everything the backend can do into an `AnalysisOutcome`.
/// Every call resolves; nothing is retried.
pub struct AnalysisClient {
    backend: Box<dyn AnalysisBackend>,
    enrich_prices: bool,
}

impl AnalysisClient {
    pub fn new(backend: Box<dyn AnalysisBackend>) -> Self {
        Self {
            backend,
            enrich_prices: true,
        }
    }

    pub fn http(base_url: &str) -> Self {
        Self::new(Box::new(HttpBackend::new(base_url)))
    }

    pub fn with_price_enrichment(mut self, enabled: bool) -> Self {
        self.enrich_prices = enabled;
        self
    }

    pub async fn analyze(&self, request: &AnalysisRequest) -> AnalysisOutcome {
        let outcome = match self.backend.analyze(request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "analysis request failed");
                return AnalysisOutcome::Failure(AnalysisError::new(ANALYSIS_FAILED_MESSAGE));
            }
        };

        match outcome {
            AnalysisOutcome::Success(mut result) => {
                if self.enrich_prices && result.price.is_none() && is_identified(&result.name) {
                    if let Some(info) = self.get_price(&result.name).await {
                        result.apply_price(info);
                    }
                }
                info!(name = %result.name, quality = result.quality, "analysis succeeded");
                AnalysisOutcome::Success(result)
            }
            AnalysisOutcome::Failure(error) => {
                info!(error = %error.error, "service rejected the image");
                AnalysisOutcome::Failure(error)
            }
        }
    }

    /// Price lookup that degrades to `None` on any failure.
    pub async fn get_price(&self, product_name: &str) -> Option<PriceInfo> {
        match self.backend.price(product_name).await {
            Ok(info) if info.is_available() => Some(info),
            Ok(_) => {
                info!(product = product_name, "no price listed");
                None
            }
            Err(e) => {
                warn!(product = product_name, error = %e, "price lookup failed");
                None
            }
        }
    }
}

fn is_identified(name: &str) -> bool {
    let name = name.trim().to_ascii_lowercase();
    !name.is_empty() && !UNIDENTIFIED_NAMES.contains(&name.as_str())
}
