#[cfg(test)]
pub mod node_lifecycle_tests;
#[cfg(test)]
pub mod utils;
