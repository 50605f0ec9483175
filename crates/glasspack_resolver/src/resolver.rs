use std::path::{Path, PathBuf};

use arcstr::ArcStr;
use glasspack_fs::{FileSystem, OsFileSystem};
use glasspack_utils::{concat_string, path_ext::PathExt};
use sugar_path::SugarPath;

/// Maps `(specifier, importer)` to an absolute file path. Only relative
/// specifiers are accepted; candidates are probed in the order `base`,
/// `base.js`, `base.json`, `base/index.js` and the first regular file wins.
/// Resolution is pure given the filesystem snapshot at invocation.
#[derive(Debug)]
pub struct Resolver<F: FileSystem = OsFileSystem> {
  cwd: PathBuf,
  fs: F,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ResolveReturn {
  pub path: ArcStr,
}

#[derive(Debug)]
pub enum ResolveError {
  /// The specifier does not start with `.`; `node_modules` lookup is not
  /// part of this bundler.
  BareSpecifier { specifier: String },
  /// Every candidate was probed and none is a regular file.
  NotFound { specifier: String, candidates: Vec<PathBuf> },
}

impl std::fmt::Display for ResolveError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ResolveError::BareSpecifier { specifier } => {
        write!(f, "Bare specifier {specifier:?} is not supported; only relative imports resolve")
      }
      ResolveError::NotFound { specifier, candidates } => {
        write!(f, "Cannot resolve {specifier:?}, tried:")?;
        for candidate in candidates {
          write!(f, "\n  - {}", candidate.display())?;
        }
        Ok(())
      }
    }
  }
}

impl<F: FileSystem> Resolver<F> {
  pub fn new(cwd: PathBuf, fs: F) -> Self {
    Self { cwd, fs }
  }

  pub fn cwd(&self) -> &Path {
    &self.cwd
  }

  pub fn resolve(
    &self,
    importer: Option<&Path>,
    specifier: &str,
  ) -> Result<ResolveReturn, ResolveError> {
    if !specifier.starts_with('.') {
      return Err(ResolveError::BareSpecifier { specifier: specifier.to_string() });
    }

    let dir = importer
      .and_then(Path::parent)
      .filter(|parent| parent.components().next().is_some())
      .unwrap_or(self.cwd.as_path());

    let base = dir.join(specifier).normalize();
    let base_str = base.expect_to_str();

    let candidates = [
      base.clone(),
      PathBuf::from(concat_string!(base_str, ".js")),
      PathBuf::from(concat_string!(base_str, ".json")),
      base.join("index.js"),
    ];

    for candidate in &candidates {
      if self.fs.is_file(candidate) {
        return Ok(ResolveReturn { path: candidate.expect_to_str().into() });
      }
    }

    Err(ResolveError::NotFound {
      specifier: specifier.to_string(),
      candidates: candidates.into(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use glasspack_fs::MemoryFileSystem;

  fn resolver(files: &[(&str, &str)]) -> Resolver<MemoryFileSystem> {
    Resolver::new(PathBuf::from("/proj"), MemoryFileSystem::new(files))
  }

  #[test]
  fn exact_path_wins_over_extension_probing() {
    let resolver = resolver(&[("/proj/src/math", "x"), ("/proj/src/math.js", "x")]);
    let ret = resolver.resolve(Some(Path::new("/proj/src/index.js")), "./math").unwrap();
    assert_eq!(&*ret.path, "/proj/src/math");
  }

  #[test]
  fn probes_js_json_then_directory_index() {
    let resolver = resolver(&[
      ("/proj/src/math.js", "x"),
      ("/proj/src/data.json", "x"),
      ("/proj/src/feature/index.js", "x"),
    ]);
    let importer = Path::new("/proj/src/index.js");

    assert_eq!(&*resolver.resolve(Some(importer), "./math").unwrap().path, "/proj/src/math.js");
    assert_eq!(&*resolver.resolve(Some(importer), "./data").unwrap().path, "/proj/src/data.json");
    assert_eq!(
      &*resolver.resolve(Some(importer), "./feature").unwrap().path,
      "/proj/src/feature/index.js"
    );
  }

  #[test]
  fn parent_relative_specifiers_normalize() {
    let resolver = resolver(&[("/proj/shared/util.js", "x")]);
    let ret =
      resolver.resolve(Some(Path::new("/proj/src/feature/a.js")), "../../shared/util.js").unwrap();
    assert_eq!(&*ret.path, "/proj/shared/util.js");
  }

  #[test]
  fn rejects_bare_specifiers() {
    let resolver = resolver(&[]);
    let err = resolver.resolve(Some(Path::new("/proj/src/index.js")), "lodash").unwrap_err();
    assert!(matches!(err, ResolveError::BareSpecifier { .. }));
  }

  #[test]
  fn unresolved_error_lists_every_candidate() {
    let resolver = resolver(&[]);
    let err = resolver.resolve(Some(Path::new("/proj/src/index.js")), "./missing").unwrap_err();
    match err {
      ResolveError::NotFound { candidates, .. } => assert_eq!(candidates.len(), 4),
      other => panic!("expected NotFound, got {other:?}"),
    }
  }
}
