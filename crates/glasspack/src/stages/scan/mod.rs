pub mod ast_scanner;
mod module_loader;
mod module_task;

use arcstr::ArcStr;
use glasspack_error::BuildResult;
use glasspack_fs::FileSystem;
use glasspack_utils::path_ext::PathExt;
use sugar_path::SugarPath;

use crate::types::{SharedOptions, SharedResolver};

pub use module_loader::ModuleLoaderOutput;

pub type ScanStageOutput = ModuleLoaderOutput;

pub struct ScanStage<F: FileSystem> {
  fs: F,
  options: SharedOptions,
  resolver: SharedResolver<F>,
}

impl<F: FileSystem> ScanStage<F> {
  pub fn new(fs: F, options: SharedOptions, resolver: SharedResolver<F>) -> Self {
    Self { fs, options, resolver }
  }

  pub fn scan(&self) -> BuildResult<ScanStageOutput> {
    let entry_path = self.resolve_user_defined_entry()?;

    let loader = module_loader::ModuleLoader::new(&self.fs, &self.options, &self.resolver);
    loader.fetch_all_modules(entry_path)
  }

  fn resolve_user_defined_entry(&self) -> BuildResult<ArcStr> {
    let Some(entry) = &self.options.entry else {
      Err(anyhow::anyhow!("You must supply an entry module to glasspack"))?
    };

    let entry_path = self.options.cwd.join(entry).normalize();
    if !self.fs.is_file(&entry_path) {
      Err(anyhow::anyhow!("Entry file does not exist: {}", entry_path.display()))?;
    }

    Ok(entry_path.expect_to_str().into())
  }
}
