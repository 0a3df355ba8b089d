pub mod dispatch;
pub mod metadata;
pub mod schema;
