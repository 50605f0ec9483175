use glasspack_error::BuildResult;
use oxc::span::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Edit {
  start: u32,
  end: u32,
  replacement: String,
}

/// Range-based edits over an immutable source slice. Edits accumulate in any
/// order and are applied back-to-front so earlier offsets stay valid.
///
/// Two rules from the transformer's contract live here: byte-identical
/// duplicate edits collapse to one (an `export { a, b }` statement produces
/// one export record per specifier, each pointing at the same statement
/// range), and any remaining overlap is a bundler bug, not an input error.
#[derive(Debug, Default)]
pub struct PatchBuffer {
  edits: Vec<Edit>,
}

impl PatchBuffer {
  pub fn replace(&mut self, span: Span, replacement: String) {
    self.edits.push(Edit { start: span.start, end: span.end, replacement });
  }

  pub fn remove(&mut self, span: Span) {
    self.replace(span, String::new());
  }

  pub fn apply(mut self, source: &str) -> BuildResult<String> {
    self.edits.sort_by(|a, b| (a.start, a.end).cmp(&(b.start, b.end)));
    self.edits.dedup();

    for window in self.edits.windows(2) {
      let [prev, next] = window else { unreachable!() };
      if next.start < prev.end {
        Err(anyhow::anyhow!(
          "Internal error: overlapping source edits [{}, {}) and [{}, {})",
          prev.start,
          prev.end,
          next.start,
          next.end
        ))?;
      }
    }

    let mut patched = source.to_string();
    for edit in self.edits.iter().rev() {
      patched.replace_range(edit.start as usize..edit.end as usize, &edit.replacement);
    }

    Ok(patched)
  }
}
