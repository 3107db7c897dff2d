pub mod sqlite;

pub use sqlite::SqliteSheet;
