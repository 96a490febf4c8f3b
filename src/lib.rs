// nullwalk: a path-sensitive symbolic executor for a single procedure's
// control-flow graph, flagging possible null dereferences and
// tautological branch conditions.

#![allow(dead_code)]

pub mod cfg;
pub mod cli;
pub mod output;
pub mod platform;
pub mod se;
