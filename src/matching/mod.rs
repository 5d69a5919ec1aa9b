// src/matching/mod.rs

pub mod email;
pub mod exact;
pub mod fuzzy;
pub mod manager;
pub mod similarity;
pub mod url;

pub use manager::find_duplicate_groups;
