mod bundler;
mod graph;
mod stages;
mod types;
mod utils;

pub use crate::{bundler::Bundler, graph::ChunkGraph, types::bundle_output::BundleOutput};
pub use glasspack_common::*;
pub use glasspack_error::{BuildError, BuildResult};
