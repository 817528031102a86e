//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time and
//! registered with the Composer under matching template names.

/// Query classification prompt
pub const CLASSIFICATION: &str = include_str!("../../prompts/classification.pmt");

/// Initial recommendation prompt
pub const RECOMMEND: &str = include_str!("../../prompts/recommend.pmt");

/// Follow-up question prompt
pub const FOLLOW_UP: &str = include_str!("../../prompts/follow_up.pmt");

/// Day plan itinerary prompt
pub const DAY_PLAN: &str = include_str!("../../prompts/day_plan.pmt");

/// Venue info extraction prompt
pub const EXTRACT: &str = include_str!("../../prompts/extract.pmt");

/// Plan summary prompt
pub const SUMMARY: &str = include_str!("../../prompts/summary.pmt");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_prompt_content() {
        assert!(CLASSIFICATION.contains("Category:"));
        assert!(CLASSIFICATION.contains("Is Preference:"));
        assert!(CLASSIFICATION.contains("Is Generic Food Question:"));
        assert!(CLASSIFICATION.contains("Plan Management"));
    }

    #[test]
    fn test_recommend_prompt_content() {
        assert!(RECOMMEND.contains("tour guide"));
        assert!(RECOMMEND.contains("step by step"));
    }

    #[test]
    fn test_day_plan_prompt_content() {
        assert!(DAY_PLAN.contains("day itinerary"));
        assert!(DAY_PLAN.contains("Travel time between venues"));
    }

    #[test]
    fn test_extract_prompt_lists_all_fields() {
        for field in ["Name:", "Location:", "Type:", "Rating:", "Budget:"] {
            assert!(EXTRACT.contains(field), "missing {}", field);
        }
    }
}
