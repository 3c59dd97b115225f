pub mod arguments;
pub mod artifact;
pub mod cache;
mod run;

pub use run::{deploy_wrapper, run, start};
