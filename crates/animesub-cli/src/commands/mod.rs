pub mod best;
pub mod download;
pub mod find;
pub mod search;
