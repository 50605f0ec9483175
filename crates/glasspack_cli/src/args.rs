use std::path::PathBuf;

use clap::Args;

#[derive(Args)]
pub struct InputArgs {
  /// Entry module, resolved against the current working directory.
  #[clap(long, short = 'e')]
  pub entry: PathBuf,
}

#[derive(Args)]
pub struct OutputArgs {
  /// Directory the bundles are written to (created if absent).
  #[clap(long, short = 'o')]
  pub output: PathBuf,

  /// URL prefix the emitted runtime prepends to chunk filenames.
  #[clap(long)]
  pub public_path: Option<String>,
}
