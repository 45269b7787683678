/// The Ederaxy backend issues opaque string identifiers for all entities.
pub type EntityId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
