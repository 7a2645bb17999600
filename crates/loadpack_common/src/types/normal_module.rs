use arcstr::ArcStr;
use loadpack_sourcemap::SourceMap;

/// A module after loaders ran and its body was rewritten into the
/// module-function form the runtime expects.
#[derive(Debug)]
pub struct NormalModule {
  /// Stable id, e.g. `./src/app.js`.
  pub id: ArcStr,
  /// Body of `function (module, exports, require) { ... }`.
  pub code: String,
  pub sourcemap: Option<SourceMap>,
  /// Ids of the modules this one requires, in source order, deduplicated.
  pub dependencies: Vec<ArcStr>,
}
