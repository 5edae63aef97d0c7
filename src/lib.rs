//! Regenerates an `index.xml` listing every file under a base directory.

pub mod app;
