pub mod context;
pub mod error;
pub mod outcome;
pub mod pattern;
pub mod registry;
pub mod runner;
