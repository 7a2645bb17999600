use oxc_sourcemap::{SourceMap, SourceMapBuilder};
use rustc_hash::FxHashMap;

/// Compose a chain of maps into one.
///
/// `chain[0]` maps the first intermediate code back to the original sources and
/// each later map describes a further transformation of the previous output.
/// Tokens of the last map that cannot be traced back through every earlier map
/// are dropped.
pub fn collapse_sourcemaps(chain: &[&SourceMap]) -> Option<SourceMap> {
  let (last_map, rest) = chain.split_last()?;
  if rest.is_empty() {
    return Some((*last_map).clone());
  }

  let lookup_tables = rest.iter().map(|map| map.generate_lookup_table()).collect::<Vec<_>>();
  let first_map = rest[0];

  let mut builder = SourceMapBuilder::default();
  let mut source_ids = FxHashMap::<u32, u32>::default();
  let mut name_ids = FxHashMap::<u32, u32>::default();

  for token in last_map.get_tokens() {
    let mut line = token.get_src_line();
    let mut col = token.get_src_col();
    let mut traced = None;

    for (map, lookup_table) in rest.iter().zip(&lookup_tables).rev() {
      let Some(original) = map.lookup_token(lookup_table, line, col) else {
        traced = None;
        break;
      };
      line = original.get_src_line();
      col = original.get_src_col();
      traced = Some((original.get_source_id(), original.get_name_id()));
    }

    let Some((source_id, name_id)) = traced else {
      continue;
    };

    let source_id = source_id.and_then(|id| {
      if let Some(mapped) = source_ids.get(&id) {
        return Some(*mapped);
      }
      let source = first_map.get_source(id)?.to_string();
      let content = first_map.get_source_content(id).map(ToString::to_string).unwrap_or_default();
      let mapped = builder.add_source_and_content(&source, &content);
      source_ids.insert(id, mapped);
      Some(mapped)
    });
    let name_id = name_id.and_then(|id| {
      if let Some(mapped) = name_ids.get(&id) {
        return Some(*mapped);
      }
      let mapped = builder.add_name(&first_map.get_name(id)?.to_string());
      name_ids.insert(id, mapped);
      Some(mapped)
    });

    builder.add_token(token.get_dst_line(), token.get_dst_col(), line, col, source_id, name_id);
  }

  Some(builder.into_sourcemap())
}
