use glasspack_common::{BundlerOptions, NormalizedBundlerOptions};

pub struct NormalizeOptionsReturn {
  pub options: NormalizedBundlerOptions,
}

pub fn normalize_options(options: BundlerOptions) -> NormalizeOptionsReturn {
  let cwd = options
    .cwd
    .unwrap_or_else(|| std::env::current_dir().expect("process should have a working directory"));

  let out_dir = cwd.join(options.out_dir.as_deref().unwrap_or("dist"));

  NormalizeOptionsReturn {
    options: NormalizedBundlerOptions {
      entry: options.entry,
      out_dir,
      cwd,
      public_path: options.public_path.unwrap_or_default(),
    },
  }
}
