// =============================================================================
// STORE LAYOUT
// =============================================================================

/// Root collection holding donation records (`/donations/{id}`)
pub const DONATIONS_COLLECTION: &str = "donations";

/// Root collection holding user profiles (`/users/{uid}`)
pub const USERS_COLLECTION: &str = "users";

// =============================================================================
// DONATION DEFAULTS
// =============================================================================

/// Stored when a donor submits without picking a location
pub const LOCATION_PLACEHOLDER: &str = "Location will be added later";

/// Smallest portion count a donation may carry
pub const MIN_QUANTITY: i64 = 1;

/// Largest portion count a donation may carry
pub const MAX_QUANTITY: i64 = 10;
