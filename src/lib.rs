//! coasterlab - headless coaster, mass-spring, flocking and curve demos
//!
//! The binary picks a demo from the command line or `demo.kind` in the
//! configuration and runs it to completion.

pub mod config;
pub mod demos;
