use std::ops::{Deref, DerefMut};

/// Every failure of a build is carried as a batch. Stages keep going where
/// they can, so one run may surface several independent diagnostics.
#[derive(Debug)]
pub struct BuildError(pub Vec<anyhow::Error>);

impl Deref for BuildError {
  type Target = Vec<anyhow::Error>;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl DerefMut for BuildError {
  fn deref_mut(&mut self) -> &mut Self::Target {
    &mut self.0
  }
}

impl From<anyhow::Error> for BuildError {
  fn from(error: anyhow::Error) -> Self {
    Self(vec![error])
  }
}

impl From<Vec<anyhow::Error>> for BuildError {
  fn from(errors: Vec<anyhow::Error>) -> Self {
    Self(errors)
  }
}

impl IntoIterator for BuildError {
  type Item = anyhow::Error;
  type IntoIter = std::vec::IntoIter<anyhow::Error>;

  fn into_iter(self) -> Self::IntoIter {
    self.0.into_iter()
  }
}

pub type BuildResult<T> = anyhow::Result<T, BuildError>;

#[test]
fn collects_single_and_batched_errors() {
  let single: BuildError = anyhow::anyhow!("boom").into();
  assert_eq!(single.len(), 1);

  let batched: BuildError = vec![anyhow::anyhow!("a"), anyhow::anyhow!("b")].into();
  assert_eq!(batched.iter().count(), 2);
}
