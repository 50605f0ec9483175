use std::path::Path;

use arcstr::ArcStr;
use glasspack_utils::{concat_string, path_ext::PathExt};
use sugar_path::SugarPath;

/// The string key a module is registered under in the emitted bundle: the
/// project-relative POSIX-style path, `./`-prefixed (`./src/utils/math.js`).
/// Derived once per absolute path, so it is injective within a build.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct ModuleId(ArcStr);

impl ModuleId {
  pub fn new(value: impl Into<ArcStr>) -> Self {
    Self(value.into())
  }

  pub fn from_absolute_path(path: &Path, cwd: &Path) -> Self {
    let relative = path.relative(cwd);
    let slashed = relative.as_path().expect_to_slash();
    if slashed.starts_with("..") {
      Self(ArcStr::from(slashed))
    } else {
      Self(ArcStr::from(concat_string!("./", slashed)))
    }
  }

  pub fn inner(&self) -> &ArcStr {
    &self.0
  }
}

impl std::ops::Deref for ModuleId {
  type Target = str;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl AsRef<str> for ModuleId {
  fn as_ref(&self) -> &str {
    self
  }
}

impl std::fmt::Display for ModuleId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    self.0.fmt(f)
  }
}

#[test]
fn derives_project_relative_ids() {
  use std::path::Path;

  let cwd = Path::new("/proj");
  assert_eq!(
    &*ModuleId::from_absolute_path(Path::new("/proj/src/utils/math.js"), cwd),
    "./src/utils/math.js"
  );
  assert_eq!(&*ModuleId::from_absolute_path(Path::new("/proj/index.js"), cwd), "./index.js");
  assert_eq!(&*ModuleId::from_absolute_path(Path::new("/outside/a.js"), cwd), "../outside/a.js");
}
