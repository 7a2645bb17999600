mod cheap;
mod collapse;
mod lines_count;
mod rename;
mod serialize;
mod source;
mod source_joiner;

pub use crate::{
  cheap::to_line_only_sourcemap,
  collapse::collapse_sourcemaps,
  lines_count::lines_count,
  rename::rename_sources,
  serialize::{sourcemap_to_json, SourceMapJsonOptions},
  source::{Source, SourceMapSource},
  source_joiner::SourceJoiner,
};
pub use oxc_sourcemap::{SourceMap, SourceMapBuilder};

/// `//# sourceMappingURL=` comment pointing at `url`.
pub fn source_mapping_url_comment(url: &str) -> String {
  loadpack_utils::concat_string!("//# sourceMappingURL=", url)
}

/// The map inlined as a base64 data URL comment.
pub fn inline_sourcemap_comment(map: &SourceMap, options: SourceMapJsonOptions<'_>) -> String {
  source_mapping_url_comment(&loadpack_utils::data_url::json_data_url(&sourcemap_to_json(
    map, options,
  )))
}
