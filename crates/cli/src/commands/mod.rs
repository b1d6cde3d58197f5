//! Command implementations.

mod build;
mod compare;
mod info;
mod validate;

pub use build::run_build;
pub use compare::run_compare;
pub use info::run_info;
pub use validate::run_validate;
