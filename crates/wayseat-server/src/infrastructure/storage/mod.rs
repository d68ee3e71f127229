//! File-system persistence for the seat configuration document.

pub mod config;
