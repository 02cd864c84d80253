/// Database model definitions.
pub mod models;
/// Player score persistence operations.
pub mod score_store;
/// Storage abstraction layer for database operations.
pub mod storage;
