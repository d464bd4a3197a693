//! Shared helpers for the cross-crate lock tests and fixture binaries.

#![forbid(unsafe_code)]

pub mod grid_helpers;
