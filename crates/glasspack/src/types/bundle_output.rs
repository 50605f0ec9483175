use glasspack_common::OutputAsset;

/// Everything one build produced. `assets` lists the entry bundle first,
/// then the non-entry chunks in planning order.
#[derive(Debug, Default)]
pub struct BundleOutput {
  pub assets: Vec<OutputAsset>,
  pub warnings: Vec<anyhow::Error>,
}
