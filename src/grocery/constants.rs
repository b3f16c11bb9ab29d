/// Aisle assigned when nothing in the reference index matches.
pub const OTHER_AISLE: &str = "Other";

/// Store bucket for items without a store.
pub const OTHER_STORE: &str = "Other";

/// Unit used when an ingredient has none.
pub const DEFAULT_UNIT: &str = "CT";

/// Quantity used when an ingredient's quantity is missing or invalid.
pub const DEFAULT_QTY: f64 = 1.0;

/// Multiplier applied to a selected meal without an explicit one.
pub const DEFAULT_MULTIPLIER: u32 = 1;

/// Largest multiplier the interactive prompts offer.
pub const MAX_PROMPT_MULTIPLIER: u32 = 5;

/// Aisle reason the index generator writes when it had nothing to go on.
pub const NO_STRONG_SIGNAL: &str = "no strong signal";

/// Maximum number of autocomplete results returned by a search.
pub const AUTOCOMPLETE_LIMIT: usize = 8;

/// Minimum query length for autocomplete search.
pub const AUTOCOMPLETE_MIN_QUERY: usize = 2;

/// Minimum Jaro-Winkler similarity for fuzzy meal name lookups.
pub const FUZZY_NAME_THRESHOLD: f64 = 0.7;

// ─────────────────────────────────────────────────────────────────────────────
// Aisle match scoring
// ─────────────────────────────────────────────────────────────────────────────

/// Bonus for entries whose aisle is set and is not "Other".
pub const NON_OTHER_AISLE_BONUS: u32 = 10;

/// Cap on the specificity bonus (length of the entry's normalized text).
pub const SPECIFICITY_CAP: usize = 50;

/// Bonus for entries whose aisle came from a strong classification signal.
pub const STRONG_SIGNAL_BONUS: u32 = 20;
