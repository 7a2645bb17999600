use oxc_sourcemap::{SourceMap, SourceMapBuilder};
use rustc_hash::FxHashMap;

/// Reduce a map to line granularity: at most one mapping per generated line,
/// pointing at column zero of the original line.
pub fn to_line_only_sourcemap(map: &SourceMap) -> SourceMap {
  let mut builder = SourceMapBuilder::default();
  let mut source_ids = FxHashMap::<u32, u32>::default();
  let mut last_dst_line = None;

  for token in map.get_tokens() {
    if last_dst_line == Some(token.get_dst_line()) {
      continue;
    }
    let Some(source_id) = token.get_source_id() else {
      continue;
    };
    last_dst_line = Some(token.get_dst_line());

    let mapped = match source_ids.get(&source_id) {
      Some(mapped) => *mapped,
      None => {
        let source = map.get_source(source_id).map(ToString::to_string).unwrap_or_default();
        let content =
          map.get_source_content(source_id).map(ToString::to_string).unwrap_or_default();
        let mapped = builder.add_source_and_content(&source, &content);
        source_ids.insert(source_id, mapped);
        mapped
      }
    };

    builder.add_token(token.get_dst_line(), 0, token.get_src_line(), 0, Some(mapped), None);
  }

  builder.into_sourcemap()
}

#[test]
fn keeps_one_token_per_line() {
  let mut builder = SourceMapBuilder::default();
  let id = builder.add_source_and_content("a.js", "let a = 1; let b = 2;\nlet c;");
  builder.add_token(0, 0, 0, 0, Some(id), None);
  builder.add_token(0, 11, 0, 11, Some(id), None);
  builder.add_token(1, 0, 1, 0, Some(id), None);
  let cheap = to_line_only_sourcemap(&builder.into_sourcemap());

  let tokens = cheap.get_tokens().map(|token| (token.get_dst_line(), token.get_dst_col())).collect::<Vec<_>>();
  assert_eq!(tokens, vec![(0, 0), (1, 0)]);
}
