pub mod analytics;
pub mod clean;
pub mod harvest;
pub mod parser;
pub mod record;
pub mod settings;
pub mod store;
pub mod transport;
