/// Identifiers assigned by the persistence service (Java `Long`).
pub type DbId = i64;

/// The persistence service emits zone-less `LocalDateTime` values
/// (`2025-01-15T14:30:00`).
pub type Timestamp = chrono::NaiveDateTime;
