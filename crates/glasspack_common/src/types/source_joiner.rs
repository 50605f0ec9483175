pub trait Source {
  fn content(&self) -> &str;
}

impl Source for String {
  fn content(&self) -> &str {
    self
  }
}

impl Source for &str {
  fn content(&self) -> &str {
    self
  }
}

impl Source for arcstr::ArcStr {
  fn content(&self) -> &str {
    self
  }
}

/// Assembles an output file from ordered fragments, one `\n` between each.
#[derive(Default)]
pub struct SourceJoiner<'source> {
  inner: Vec<Box<dyn Source + Send + 'source>>,
}

impl<'source> SourceJoiner<'source> {
  pub fn append_source<T: Source + Send + 'source>(&mut self, source: T) {
    self.inner.push(Box::new(source));
  }

  pub fn join(&self) -> String {
    let size_hint = self.inner.iter().map(|source| source.content().len() + 1).sum::<usize>();
    let mut ret = String::with_capacity(size_hint.saturating_sub(1));

    for (index, source) in self.inner.iter().enumerate() {
      ret.push_str(source.content());
      if index + 1 < self.inner.len() {
        ret.push('\n');
      }
    }

    ret
  }
}

#[test]
fn joins_with_single_newlines() {
  let mut joiner = SourceJoiner::default();
  joiner.append_source("a");
  joiner.append_source(String::from("b"));
  assert_eq!(joiner.join(), "a\nb");
}
