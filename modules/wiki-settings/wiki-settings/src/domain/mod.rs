pub mod color;
pub mod document;
pub mod editor;
pub mod error;
pub mod fields;
pub mod store;
pub mod theme;
