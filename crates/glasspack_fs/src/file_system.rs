use std::{io, path::Path};

/// The filesystem surface the bundler touches: reads during resolution and
/// parsing, writes during emission. Kept as a trait so builds can run
/// against an in-memory tree in tests.
pub trait FileSystem: Send + Sync {
  fn read_to_string(&self, path: &Path) -> io::Result<String>;

  /// Whether `path` exists and is a regular file. Directories are not files;
  /// the resolver relies on that distinction when probing candidates.
  fn is_file(&self, path: &Path) -> bool;

  fn create_dir_all(&self, path: &Path) -> io::Result<()>;

  fn write(&self, path: &Path, content: &[u8]) -> io::Result<()>;
}
