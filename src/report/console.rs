use crate::client::client_model::{
    AnalysisOutcome, AnalysisResult, PriceInfo, PriceVerdict, ShelfStage,
};

// ============================================================================
// Console reporter — plain-text rendering of an analysis outcome
// ============================================================================

/// Format an analysis outcome for terminal output.
///
/// Produces output like:
/// ```text
/// === Apple ===
///
/// Quality:   87%
/// Moisture:  74%
/// Size:      medium
/// Price:     ₹110 for 1 kg
///
/// Crisp skin with even coloration.
/// ```
/// followed by one block for each optional section that is present.
pub fn format_console_report(outcome: &AnalysisOutcome) -> String {
    match outcome {
        AnalysisOutcome::Success(result) => format_result(result),
        AnalysisOutcome::Failure(error) => format!("Error: {}\n", error.error),
    }
}

fn format_result(result: &AnalysisResult) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== {} ===\n\n", result.name));
    out.push_str(&format!("Quality:   {}%\n", result.quality));
    out.push_str(&format!("Moisture:  {}%\n", result.moisture));
    out.push_str(&format!("Size:      {}\n", result.size_category().label()));

    if let Some((price, quantity)) = result.price_tag() {
        out.push_str(&format!("Price:     {} for {}\n", price, quantity));
    }

    out.push_str(&format!("\n{}\n", result.insight));

    if let Some(shelf) = &result.shelf_life {
        let stage = shelf.stage_kind();
        let track = ShelfStage::ALL
            .iter()
            .map(|s| {
                if *s == stage {
                    format!("[{}]", s.label())
                } else {
                    s.label().to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" > ");

        out.push_str("\n--- Eat Me When ---\n");
        out.push_str(&format!("{}\n", track));
        out.push_str(&format!("Best within: {}\n", shelf.days));
        out.push_str(&format!("Storage: {}\n", shelf.storage_tips));
    }

    if let Some(macros) = &result.macros {
        out.push_str("\n--- Macros ---\n");
        out.push_str(&format!(
            "{} kcal | carbs {}g | protein {}g | fat {}g | fiber {}g\n",
            macros.calories, macros.carbs, macros.protein, macros.fat, macros.fiber
        ));
        if !macros.vitamins.is_empty() {
            out.push_str(&format!("Rich in: {}\n", macros.vitamins.join(", ")));
        }
    }

    if let Some(recipes) = result.recipes.as_ref().filter(|r| !r.is_empty()) {
        out.push_str("\n--- Recipes ---\n");
        for recipe in recipes {
            out.push_str(&format!(
                "* {} ({}, {})\n    {}\n",
                recipe.name, recipe.time, recipe.difficulty, recipe.reason
            ));
        }
    }

    if let Some(analysis) = &result.price_analysis {
        let verdict = analysis.verdict_kind();
        if verdict != PriceVerdict::Unknown {
            out.push_str("\n--- Market Price ---\n");
            out.push_str(&format!(
                "{} ({:+.0}% vs average {:.0})\n",
                analysis.verdict, analysis.difference, analysis.average
            ));
        }
    }

    out
}

/// One line for the `price` subcommand.
pub fn format_price(product: &str, price: Option<&PriceInfo>) -> String {
    match price {
        Some(info) => format!("{}: {} for {}\n", product, info.price, info.quantity),
        None => format!("{}: No price available\n", product),
    }
}
