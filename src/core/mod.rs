// src/core/mod.rs

pub mod latin1;
pub mod normalize;

pub use normalize::{ normalize, normalize_key };
