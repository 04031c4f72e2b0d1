pub mod error;
pub mod page_object;
