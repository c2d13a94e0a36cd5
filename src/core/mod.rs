pub mod cipher;
pub mod climate;
pub mod engine;
pub mod tree;

pub use crate::domain::ports::{Pipeline, Storage};
pub use crate::utils::error::Result;
