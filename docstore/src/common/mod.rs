//! Common types shared across the crate.

mod constants;
mod fields;
mod sort_order;

pub use constants::*;
pub use fields::*;
pub use sort_order::*;
