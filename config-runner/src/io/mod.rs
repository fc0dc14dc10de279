//! Side-effecting operations: filesystem probes, transpiling, process execution.

pub mod fs;
pub mod launch;
pub mod process;
pub mod transpile;
