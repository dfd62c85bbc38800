//! Core library components.
//!
//! The release pipeline: descriptors, secured values artifacts, placeholder
//! substitution, subprocess execution and the deploy/vendor/release
//! workflows built on them.

pub mod artifact;
pub mod constants;
pub mod deploy;
pub mod descriptor;
pub mod env;
pub mod image;
pub mod installer;
pub mod manifest;
pub mod probe;
pub mod registry;
pub mod release;
pub mod runner;
pub mod settings;
pub mod substitute;
pub mod vendors;
