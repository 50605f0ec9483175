use arcstr::ArcStr;

/// One emitted file: the entry bundle or a lazy/shared chunk bundle.
#[derive(Debug, Clone)]
pub struct OutputAsset {
  pub filename: ArcStr,
  pub content: String,
}
