// src/plan/mod.rs
//! Declarative task trees, loaded from files and built against a registry
//! of named workers.
mod loader;
pub mod registry;
mod schema;

pub use registry::{arithmetic, delayed, Operands, WorkerRegistry};
pub use schema::{PlanNode, PlanStats};
