mod exists;
mod schema;
mod types;

pub use exists::TableCheck;
pub use schema::Database;
pub use types::DatabaseError;
