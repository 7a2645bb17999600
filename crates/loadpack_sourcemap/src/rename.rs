use oxc_sourcemap::{SourceMap, SourceMapBuilder};

/// Rebuild `map` with every source name passed through `rename`. Tokens,
/// names and source contents are kept.
pub fn rename_sources(map: &SourceMap, rename: impl Fn(&str) -> String) -> SourceMap {
  let mut builder = SourceMapBuilder::default();
  let source_ids = map
    .get_sources()
    .enumerate()
    .map(|(id, source)| {
      let content = u32::try_from(id)
        .ok()
        .and_then(|id| map.get_source_content(id))
        .map(ToString::to_string)
        .unwrap_or_default();
      builder.add_source_and_content(&rename(source), &content)
    })
    .collect::<Vec<_>>();
  let name_ids = map.get_names().map(|name| builder.add_name(name)).collect::<Vec<_>>();

  for token in map.get_tokens() {
    builder.add_token(
      token.get_dst_line(),
      token.get_dst_col(),
      token.get_src_line(),
      token.get_src_col(),
      token.get_source_id().and_then(|id| source_ids.get(id as usize).copied()),
      token.get_name_id().and_then(|id| name_ids.get(id as usize).copied()),
    );
  }

  builder.into_sourcemap()
}

#[test]
fn renames_every_source() {
  let mut builder = SourceMapBuilder::default();
  let id = builder.add_source_and_content("app.js", "var x = 1;");
  builder.add_token(0, 0, 0, 0, Some(id), None);
  let renamed = rename_sources(&builder.into_sourcemap(), |source| format!("loadpack:///./src/{source}"));

  assert_eq!(renamed.get_source(0).map(ToString::to_string).as_deref(), Some("loadpack:///./src/app.js"));
  assert_eq!(renamed.get_source_content(0).map(ToString::to_string).as_deref(), Some("var x = 1;"));
  assert_eq!(renamed.get_tokens().count(), 1);
}
