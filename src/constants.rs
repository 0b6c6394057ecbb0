//! Shared constants for things
//!

/// Default Gemini model for design plans.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Default Gemini API endpoint.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default Unsplash API endpoint.
pub const DEFAULT_UNSPLASH_BASE_URL: &str = "https://api.unsplash.com";

/// Fixed filename for the PDF export.
pub const PDF_FILENAME: &str = "design_plan.pdf";

/// Fixed filename for the plain text export.
pub const TXT_FILENAME: &str = "design_plan.txt";

/// Fixed filename for the JSON export.
pub const JSON_FILENAME: &str = "design_plan.json";

/// Key wrapping the plan text in the JSON export.
pub const JSON_DESIGN_PLAN_KEY: &str = "design_plan";

/// Smallest bedroom/bathroom count the form accepts.
pub const MIN_ROOM_COUNT: u8 = 1;

/// Largest bedroom/bathroom count the form accepts.
pub const MAX_ROOM_COUNT: u8 = 10;

/// Session key holding the current design.
pub const CURRENT_DESIGN_KEY: &str = "current_design";

/// How long an idle session (and its design) is kept, in minutes.
pub const SESSION_INACTIVITY_MINUTES: i64 = 60;

#[cfg(test)]
/// API key used in tests
pub const TEST_API_KEY: &str = "test-key";
