mod backend;
mod query;

pub use backend::*;
