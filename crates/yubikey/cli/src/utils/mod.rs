pub mod display;
pub mod enumerator;
pub mod reader;
