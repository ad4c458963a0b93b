//! Token predicates used by the reconstruction stages.
//!
//! Kept free of layout knowledge so template tuning never touches row assembly.

pub mod money;
pub mod tokens;

pub use money::{extract_money, is_money, is_money_like, parse_money, parse_quantity};
pub use tokens::{correct_leading_a, is_quantity_like, looks_like_code};
