pub mod resolver;
pub mod schema_model;
pub mod store;
