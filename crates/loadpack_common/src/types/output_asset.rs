#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
  Chunk,
  SourceMap,
  Asset,
}

#[derive(Debug, Clone)]
pub struct OutputAsset {
  pub filename: String,
  pub content: String,
  pub kind: OutputKind,
}

impl OutputAsset {
  pub fn filename(&self) -> &str {
    &self.filename
  }

  pub fn content_as_bytes(&self) -> &[u8] {
    self.content.as_bytes()
  }

  pub fn is_chunk(&self) -> bool {
    matches!(self.kind, OutputKind::Chunk)
  }
}

/// A rendered entry chunk, as seen by plugins.
#[derive(Debug, Clone)]
pub struct RenderedChunk {
  pub name: String,
  pub filename: String,
  pub modules: Vec<arcstr::ArcStr>,
}
