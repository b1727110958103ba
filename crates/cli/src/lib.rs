//! Terminal helpers for wirebench
//!
//! Provides shared CLI functionality:
//! - Status lines and horizontal rules
//! - Size, duration and reduction formatting
//! - Progress spinner for document synthesis

#![warn(missing_docs)]

pub mod output;
pub mod progress;
