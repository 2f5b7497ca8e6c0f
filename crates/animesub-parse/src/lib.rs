//! Filename decomposition: breaks an anime release file name down into the
//! attributes the rest of the system scores releases on.

pub mod elements;
pub mod keyword;
pub mod parser;
pub mod tokenizer;

pub use elements::DecomposedFileName;
pub use parser::parse;
