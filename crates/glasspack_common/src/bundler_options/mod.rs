use std::path::PathBuf;

/// User-facing build options. Everything is optional here; `Bundler::new`
/// normalizes them into `NormalizedBundlerOptions`.
#[derive(Debug, Default)]
pub struct BundlerOptions {
  /// Path of the entry module, resolved against `cwd`.
  pub entry: Option<String>,
  /// Directory the bundles are written to, resolved against `cwd`.
  pub out_dir: Option<String>,
  pub cwd: Option<PathBuf>,
  /// URL prefix the emitted runtime prepends to chunk filenames.
  pub public_path: Option<String>,
}

#[derive(Debug)]
pub struct NormalizedBundlerOptions {
  pub entry: Option<String>,
  pub out_dir: PathBuf,
  pub cwd: PathBuf,
  pub public_path: String,
}
