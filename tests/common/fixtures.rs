use produce_analyzer::client::client_model::{
    AnalysisResult, Macros, PriceAnalysis, PriceInfo, Recipe, ShelfLife,
};
use produce_analyzer::source::source_model::ImageFile;

/// PNG signature plus a few bytes; enough for content sniffing.
pub const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
];

pub const APPLE_URL: &str = "https://example.com/produce/apple.jpg";

pub fn png_file() -> ImageFile {
    ImageFile::new("apple.png", "image/png", PNG_BYTES.to_vec())
}

pub fn apple_json() -> serde_json::Value {
    serde_json::json!({
        "name": "Apple",
        "quality": 87,
        "moisture": 74,
        "size": "medium",
        "insight": "..."
    })
}

pub fn apple() -> AnalysisResult {
    serde_json::from_value(apple_json()).unwrap()
}

pub fn apple_with_sections() -> AnalysisResult {
    AnalysisResult {
        shelf_life: Some(ShelfLife {
            days: "5-7 days".into(),
            stage: "peak fresh".into(),
            storage_tips: "Keep refrigerated".into(),
        }),
        macros: Some(Macros {
            calories: 95.0,
            carbs: 25.0,
            protein: 0.5,
            fat: 0.3,
            fiber: 4.4,
            vitamins: vec!["Vitamin C".into(), "Potassium".into()],
        }),
        recipes: Some(vec![Recipe {
            name: "Waldorf Salad".into(),
            reason: "Firm flesh holds up when sliced raw".into(),
            time: "15 mins".into(),
            difficulty: "Easy".into(),
        }]),
        price_analysis: Some(PriceAnalysis {
            verdict: "Great Deal".into(),
            difference: -12.0,
            average: 125.0,
        }),
        ..apple()
    }
}

pub fn rupee_price() -> PriceInfo {
    PriceInfo {
        price: "₹110".into(),
        quantity: "1 kg".into(),
    }
}
