pub mod error;
pub mod feature_model;
pub mod loader;
pub mod parser;
pub mod tags;
