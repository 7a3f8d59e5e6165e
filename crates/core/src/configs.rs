//! Configuration parsing for project config files

pub mod project;
