//! Shared utilities for the gallery.

pub mod frame_timing;
