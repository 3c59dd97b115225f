pub mod nodes;
pub mod setup;
