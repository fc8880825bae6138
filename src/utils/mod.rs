//! # Utilities Module
//!
//! Random sources and graph searches shared by generation and play.

pub mod paths;
pub mod random;

pub use paths::*;
pub use random::*;
