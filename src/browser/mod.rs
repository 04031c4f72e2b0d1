pub mod driver;
pub mod error;
pub mod mock;
pub mod session;
pub mod webdriver;
