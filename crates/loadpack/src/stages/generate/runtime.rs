use loadpack_utils::{concat_string, ecmascript::to_js_string_literal};

/// Module registry and `require` shared by every chunk. Modules are called
/// as `function (module, exports, require)` with `this` set to `exports`.
const RUNTIME_HEAD: &str = r#"(function (modules) {
  var cache = {};
  var hasOwn = Object.prototype.hasOwnProperty;
  function __loadpack_require__(id) {
    var cached = cache[id];
    if (cached !== undefined) {
      return cached.exports;
    }
    if (!hasOwn.call(modules, id)) {
      throw new Error("Cannot find module '" + id + "'");
    }
    var module = (cache[id] = { id: id, exports: {} });
    modules[id].call(module.exports, module, module.exports, __loadpack_require__);
    return module.exports;
  }
  // Define getters for named exports.
  __loadpack_require__.d = function (exports, getters) {
    for (var key in getters) {
      if (hasOwn.call(getters, key) && !hasOwn.call(exports, key)) {
        Object.defineProperty(exports, key, { enumerable: true, get: getters[key] });
      }
    }
  };
  // Mark exports as coming from an ES module.
  __loadpack_require__.r = function (exports) {
    Object.defineProperty(exports, "__esModule", { value: true });
  };
  // `export * from`: re-export everything but `default` and own names.
  __loadpack_require__.s = function (exports, from) {
    Object.keys(from).forEach(function (key) {
      if (key !== "default" && !hasOwn.call(exports, key)) {
        Object.defineProperty(exports, key, {
          enumerable: true,
          get: function () {
            return from[key];
          }
        });
      }
    });
  };
  // Default import of a module that may not be an ES module.
  __loadpack_require__.n = function (exports) {
    return exports && exports.__esModule ? exports["default"] : exports;
  };
"#;

pub const RUNTIME_TAIL: &str = "});";

/// Everything before the module table: the runtime plus the entry call.
pub fn render_runtime_head(entry_id: &str) -> String {
  concat_string!(
    RUNTIME_HEAD,
    "  return __loadpack_require__(",
    to_js_string_literal(entry_id),
    ");\n})({"
  )
}

/// `"./src/app.js": function (module, exports, require) {`
pub fn render_module_head(module_id: &str) -> String {
  concat_string!(to_js_string_literal(module_id), ": function (module, exports, require) {")
}

pub const MODULE_TAIL: &str = "},";

#[test]
fn runtime_head_calls_the_entry() {
  let head = render_runtime_head("./src/app.js");
  assert!(head.starts_with("(function (modules) {\n"));
  assert!(head.ends_with("  return __loadpack_require__(\"./src/app.js\");\n})({"));
}
