//! Input sampling root.
//!
//! Turns raw, continuously-polled host signals into per-cycle events:
//! single-shot button edges and the derived cable-connected flag.

pub mod edge;
pub mod sampler;
