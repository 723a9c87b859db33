//! Headless editing session over the blocksmith world crates.
#![forbid(unsafe_code)]

pub mod app;
pub mod collaborators;
pub mod commands;
pub mod config;
pub mod event;
