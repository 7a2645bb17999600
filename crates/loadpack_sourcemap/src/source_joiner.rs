use oxc_sourcemap::{SourceMap, SourceMapBuilder};
use rustc_hash::FxHashMap;

use crate::source::Source;

/// Concatenates sources with `\n` and stitches their maps together, shifting
/// every token by the number of lines emitted before it.
#[derive(Default)]
pub struct SourceJoiner<'source> {
  inner: Vec<Box<dyn Source + Send + 'source>>,
}

impl<'source> SourceJoiner<'source> {
  pub fn append_source<T: Source + Send + 'source>(&mut self, source: T) {
    self.inner.push(Box::new(source));
  }

  pub fn join(&self) -> (String, Option<SourceMap>) {
    let sources = &self.inner;
    let needs_sourcemap = sources.iter().any(|source| source.sourcemap().is_some());

    let size_hint = sources.iter().map(|source| source.content().len() + 1).sum::<usize>();
    let mut content = String::with_capacity(size_hint);
    let mut builder = needs_sourcemap.then(SourceMapBuilder::default);
    let mut source_ids = FxHashMap::<String, u32>::default();
    let mut line_offset = 0u32;

    for (index, source) in sources.iter().enumerate() {
      content.push_str(source.content());

      if let (Some(builder), Some(map)) = (builder.as_mut(), source.sourcemap()) {
        append_sourcemap(builder, &mut source_ids, map, line_offset);
      }

      line_offset += source.lines_count();
      if index < sources.len() - 1 {
        content.push('\n');
        line_offset += 1;
      }
    }

    (content, builder.map(SourceMapBuilder::into_sourcemap))
  }
}

fn append_sourcemap(
  builder: &mut SourceMapBuilder,
  source_ids: &mut FxHashMap<String, u32>,
  map: &SourceMap,
  line_offset: u32,
) {
  let mut local_source_ids = FxHashMap::<u32, u32>::default();
  let mut local_name_ids = FxHashMap::<u32, u32>::default();

  for token in map.get_tokens() {
    let source_id = token.get_source_id().and_then(|id| {
      if let Some(mapped) = local_source_ids.get(&id) {
        return Some(*mapped);
      }
      let source = map.get_source(id)?.to_string();
      let mapped = match source_ids.get(&source) {
        Some(mapped) => *mapped,
        None => {
          let content = map.get_source_content(id).map(ToString::to_string).unwrap_or_default();
          let mapped = builder.add_source_and_content(&source, &content);
          source_ids.insert(source, mapped);
          mapped
        }
      };
      local_source_ids.insert(id, mapped);
      Some(mapped)
    });
    let name_id = token.get_name_id().and_then(|id| {
      if let Some(mapped) = local_name_ids.get(&id) {
        return Some(*mapped);
      }
      let mapped = builder.add_name(&map.get_name(id)?.to_string());
      local_name_ids.insert(id, mapped);
      Some(mapped)
    });

    builder.add_token(
      token.get_dst_line() + line_offset,
      token.get_dst_col(),
      token.get_src_line(),
      token.get_src_col(),
      source_id,
      name_id,
    );
  }
}
