//! Cross-crate integration flows.

#[cfg(test)]
pub mod fixtures;
pub mod lifecycle_flows;
pub mod validation_gate;
