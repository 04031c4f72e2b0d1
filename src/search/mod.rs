pub mod definitions;
pub mod mock_site;
pub mod pages;
pub mod steps;
