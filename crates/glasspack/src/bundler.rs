use std::sync::Arc;

use glasspack_common::{BundlerOptions, OutputAsset};
use glasspack_error::BuildResult;
use glasspack_fs::{FileSystem, OsFileSystem};
use glasspack_resolver::Resolver;

use crate::{
  stages::{generate::GenerateStage, plan::PlanStage, scan::ScanStage},
  types::{SharedOptions, SharedResolver, bundle_output::BundleOutput},
  utils::normalize_options::{NormalizeOptionsReturn, normalize_options},
};

/// The pipeline facade: scan -> plan -> generate, then an optional write
/// phase. Stages communicate only through the values they pass forward; a
/// bundler instance holds no state between builds.
pub struct Bundler<F: FileSystem + Clone = OsFileSystem> {
  fs: F,
  options: SharedOptions,
  resolver: SharedResolver<F>,
}

impl Bundler {
  pub fn new(options: BundlerOptions) -> Self {
    Self::with_file_system(options, OsFileSystem)
  }
}

impl<F: FileSystem + Clone> Bundler<F> {
  pub fn with_file_system(options: BundlerOptions, fs: F) -> Self {
    let NormalizeOptionsReturn { options } = normalize_options(options);

    let resolver: SharedResolver<F> = Resolver::new(options.cwd.clone(), fs.clone()).into();

    Bundler { fs, options: Arc::new(options), resolver }
  }

  pub fn build(&mut self, is_write: bool) -> BuildResult<BundleOutput> {
    let scan_stage = ScanStage::new(self.fs.clone(), self.options.clone(), self.resolver.clone());
    let scan_output = scan_stage.scan()?;

    let chunk_graph = PlanStage::new(&scan_output.module_table, scan_output.entry_idx).plan();

    let generate_stage = GenerateStage::new(&self.options, &scan_output.module_table, &chunk_graph);
    let generated = generate_stage.generate()?;

    let mut warnings = scan_output.warnings;
    warnings.extend(generated.warnings);
    let output = BundleOutput { assets: generated.assets, warnings };

    if is_write {
      self.write_assets(&output.assets)?;
    }

    Ok(output)
  }

  fn write_assets(&self, assets: &[OutputAsset]) -> BuildResult<()> {
    self.fs.create_dir_all(&self.options.out_dir).map_err(|err| {
      anyhow::anyhow!("Could not create output directory {}: {err}", self.options.out_dir.display())
    })?;

    for asset in assets {
      let path = self.options.out_dir.join(asset.filename.as_str());
      self
        .fs
        .write(&path, asset.content.as_bytes())
        .map_err(|err| anyhow::anyhow!("Could not write {}: {err}", path.display()))?;
    }

    Ok(())
  }
}
