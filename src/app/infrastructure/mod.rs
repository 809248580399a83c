//! Infrastructure layer - external integrations and utilities.
//!
//! - FLTK text buffer access
//! - Platform theme detection
//! - Error types

pub mod buffer;
pub mod error;
pub mod platform;
