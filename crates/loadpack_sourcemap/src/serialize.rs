use oxc_sourcemap::SourceMap;

#[derive(Debug, Clone, Copy)]
pub struct SourceMapJsonOptions<'a> {
  /// Value of the `file` field.
  pub file: Option<&'a str>,
  /// Whether `sourcesContent` is kept.
  pub include_sources_content: bool,
}

/// Serialize `map` to its JSON text form, adjusting the fields `oxc_sourcemap`
/// doesn't expose setters for.
pub fn sourcemap_to_json(map: &SourceMap, options: SourceMapJsonOptions<'_>) -> String {
  let json = map.to_json_string();
  if options.file.is_none() && options.include_sources_content {
    return json;
  }

  let Ok(serde_json::Value::Object(mut fields)) = serde_json::from_str::<serde_json::Value>(&json)
  else {
    return json;
  };
  if let Some(file) = options.file {
    fields.insert("file".to_string(), file.into());
  }
  if !options.include_sources_content {
    fields.remove("sourcesContent");
  }
  serde_json::Value::Object(fields).to_string()
}

#[test]
fn drops_sources_content_on_request() {
  let mut builder = oxc_sourcemap::SourceMapBuilder::default();
  let id = builder.add_source_and_content("app.js", "var x = 1;");
  builder.add_token(0, 0, 0, 0, Some(id), None);
  let map = builder.into_sourcemap();

  let json = sourcemap_to_json(
    &map,
    SourceMapJsonOptions { file: Some("app.js"), include_sources_content: false },
  );
  let value: serde_json::Value = serde_json::from_str(&json).unwrap();
  assert_eq!(value["file"], "app.js");
  assert!(value.get("sourcesContent").is_none());
  assert_eq!(value["sources"][0], "app.js");
}
