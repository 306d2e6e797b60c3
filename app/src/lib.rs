//! Command line front end for the photo catalog.

pub mod config;
pub mod render;
