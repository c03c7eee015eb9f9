pub mod footer;
pub mod json;
pub mod table;
pub mod theme;
