// src/scoring/mod.rs

pub mod model;
pub mod title;

pub use model::{score_batch, score_lead};
pub use title::{extract_seniority_level, match_seniority, match_title, normalize_title};
