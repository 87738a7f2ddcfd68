/// Server-issued identifiers are UUIDs.
pub type ServerId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
