pub mod locator;
pub mod resolve;
pub mod wait;
