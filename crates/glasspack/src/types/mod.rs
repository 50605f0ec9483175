pub mod bundle_output;

use std::sync::Arc;

use glasspack_common::NormalizedBundlerOptions;
use glasspack_resolver::Resolver;

pub type SharedOptions = Arc<NormalizedBundlerOptions>;
pub type SharedResolver<F> = Arc<Resolver<F>>;
