//! FIFO lot matching of securities trades into capital gains transfers.
//!
//! Each product's trades are classified as opening or closing in date order,
//! openings are matched against opposite-direction closings, and transfers
//! sharing acquisition and disposal days are consolidated into single
//! reporting lines.

pub mod core;

pub use crate::core::*;
