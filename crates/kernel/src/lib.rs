//! Cooperative, single-threaded scheduler for VMIL processes.
//!
//! A [`Runtime`] owns every admitted [`vm::VM`]. Each pass visits the tasks in
//! launch order and grants every Active one up to `priority` steps; finished
//! tasks are reaped at the end of their slice.

pub mod launch;
pub mod run;
pub mod runtime;

pub use run::PassReport;
pub use runtime::Runtime;
