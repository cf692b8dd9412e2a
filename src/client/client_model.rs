use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Analysis result
// ============================================================================

/// A successful analysis as returned by the service. Every nested section is
/// optional on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub name: String,
    #[serde(deserialize_with = "percent")]
    pub quality: u8,
    #[serde(deserialize_with = "percent")]
    pub moisture: u8,
    /// Raw size label from the service; see `size_category` for display.
    pub size: String,
    pub insight: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shelf_life: Option<ShelfLife>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macros: Option<Macros>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipes: Option<Vec<Recipe>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_analysis: Option<PriceAnalysis>,
}

impl AnalysisResult {
    pub fn size_category(&self) -> SizeCategory {
        SizeCategory::from_label(&self.size)
    }

    /// Price and quantity, only when both are known.
    pub fn price_tag(&self) -> Option<(&str, &str)> {
        match (self.price.as_deref(), self.quantity.as_deref()) {
            (Some(price), Some(quantity)) => Some((price, quantity)),
            _ => None,
        }
    }

    pub fn apply_price(&mut self, info: PriceInfo) {
        self.price = Some(info.price);
        self.quantity = Some(info.quantity);
    }
}

/// Accept any JSON number, round it and clamp it into 0..=100.
fn percent<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() {
        return Err(serde::de::Error::custom("percentage must be a finite number"));
    }
    Ok(value.round().clamp(0.0, 100.0) as u8)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeCategory {
    Small,
    Medium,
    Large,
}

impl SizeCategory {
    /// Case-insensitive; `big` means large and anything unknown shows as medium.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "small" => SizeCategory::Small,
            "large" | "big" => SizeCategory::Large,
            _ => SizeCategory::Medium,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SizeCategory::Small => "small",
            SizeCategory::Medium => "medium",
            SizeCategory::Large => "large",
        }
    }
}

// ============================================================================
// Optional sections
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShelfLife {
    /// Free text such as "2-3 days" or "Immediate"
    pub days: String,
    pub stage: String,
    pub storage_tips: String,
}

impl ShelfLife {
    pub fn stage_kind(&self) -> ShelfStage {
        ShelfStage::from_label(&self.stage)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShelfStage {
    Ripening,
    Ripe,
    PeakFresh,
    Overripe,
}

impl ShelfStage {
    pub const ALL: [ShelfStage; 4] = [
        ShelfStage::Ripening,
        ShelfStage::Ripe,
        ShelfStage::PeakFresh,
        ShelfStage::Overripe,
    ];

    /// Unknown stages display as `Ripe`.
    pub fn from_label(label: &str) -> Self {
        let wanted = label.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|stage| stage.label().to_ascii_lowercase() == wanted)
            .unwrap_or(ShelfStage::Ripe)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShelfStage::Ripening => "Ripening",
            ShelfStage::Ripe => "Ripe",
            ShelfStage::PeakFresh => "Peak Fresh",
            ShelfStage::Overripe => "Overripe",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub calories: f64,
    pub carbs: f64,
    pub protein: f64,
    pub fat: f64,
    pub fiber: f64,
    #[serde(default)]
    pub vitamins: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    pub reason: String,
    pub time: String,
    pub difficulty: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceAnalysis {
    pub verdict: String,
    pub difference: f64,
    pub average: f64,
}

impl PriceAnalysis {
    pub fn verdict_kind(&self) -> PriceVerdict {
        PriceVerdict::from_label(&self.verdict)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PriceVerdict {
    GreatDeal,
    FairPrice,
    HighPrice,
    Unknown,
}

impl PriceVerdict {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "great deal" => PriceVerdict::GreatDeal,
            "fair price" => PriceVerdict::FairPrice,
            "high price" => PriceVerdict::HighPrice,
            _ => PriceVerdict::Unknown,
        }
    }
}

// ============================================================================
// Price lookup
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceInfo {
    pub price: String,
    pub quantity: String,
}

impl PriceInfo {
    /// The scraper reports `N/A` when it found nothing.
    pub fn is_available(&self) -> bool {
        let missing = |s: &str| s.trim().is_empty() || s.trim().eq_ignore_ascii_case("n/a");
        !missing(&self.price)
    }
}

// ============================================================================
// Terminal outcome
// ============================================================================

/// User-visible failure of an analysis. Serializes as `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisError {
    pub error: String,
}

impl AnalysisError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Either a result or an error, never both. Terminal for the request that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    Success(AnalysisResult),
    Failure(AnalysisError),
}

impl AnalysisOutcome {
    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            AnalysisOutcome::Success(result) => Some(result),
            AnalysisOutcome::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&AnalysisError> {
        match self {
            AnalysisOutcome::Success(_) => None,
            AnalysisOutcome::Failure(error) => Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisOutcome::Success(_))
    }
}

/// Shape of a 2xx body. The service answers `{"error": ...}` for images that
/// are not produce.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ResponseBody {
    Failure(AnalysisError),
    Success(AnalysisResult),
}

impl From<ResponseBody> for AnalysisOutcome {
    fn from(body: ResponseBody) -> Self {
        match body {
            ResponseBody::Failure(error) => AnalysisOutcome::Failure(error),
            ResponseBody::Success(result) => AnalysisOutcome::Success(result),
        }
    }
}
