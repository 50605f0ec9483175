use std::{
  io,
  path::{Path, PathBuf},
  sync::{Arc, Mutex},
};

use rustc_hash::FxHashMap;
use sugar_path::SugarPath;

use crate::file_system::FileSystem;

/// An in-memory tree for tests. Lookups normalize the path first so that
/// `/proj/./src/a.js` and `/proj/src/a.js` hit the same entry, matching how
/// the OS filesystem behaves after the resolver joins specifiers.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
  files: Arc<Mutex<FxHashMap<PathBuf, String>>>,
}

impl MemoryFileSystem {
  pub fn new(files: &[(&str, &str)]) -> Self {
    let fs = Self::default();
    for (path, content) in files {
      fs.add_file(Path::new(path), content);
    }
    fs
  }

  pub fn add_file(&self, path: &Path, content: &str) {
    self.files.lock().unwrap().insert(path.normalize(), content.to_string());
  }

  /// Snapshot of every file currently in the tree, written outputs included.
  pub fn all_files(&self) -> FxHashMap<PathBuf, String> {
    self.files.lock().unwrap().clone()
  }
}

impl FileSystem for MemoryFileSystem {
  fn read_to_string(&self, path: &Path) -> io::Result<String> {
    self.files.lock().unwrap().get(&path.normalize()).cloned().ok_or_else(|| {
      io::Error::new(io::ErrorKind::NotFound, format!("No such file: {}", path.display()))
    })
  }

  fn is_file(&self, path: &Path) -> bool {
    self.files.lock().unwrap().contains_key(&path.normalize())
  }

  fn create_dir_all(&self, _path: &Path) -> io::Result<()> {
    Ok(())
  }

  fn write(&self, path: &Path, content: &[u8]) -> io::Result<()> {
    let content = String::from_utf8(content.to_vec())
      .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    self.files.lock().unwrap().insert(path.normalize(), content);
    Ok(())
  }
}

#[test]
fn normalizes_lookup_paths() {
  let fs = MemoryFileSystem::new(&[("/proj/src/a.js", "export {};")]);
  assert!(fs.is_file(Path::new("/proj/./src/a.js")));
  assert!(!fs.is_file(Path::new("/proj/src")));
  assert_eq!(fs.read_to_string(Path::new("/proj/src/../src/a.js")).unwrap(), "export {};");
}
