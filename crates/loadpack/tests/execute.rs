mod common;

use std::{path::Path, process::Command, sync::OnceLock};

use pretty_assertions::assert_eq;

use common::{babel_config, options, project};
use loadpack::Bundler;

const APP: &str = r#"import greet from "./greet";
import Counter from "./counter";
import * as all from "./all";
import { total as sum, renamed } from "./all";
import legacy from "./legacy";
const cjs = require("./legacy");

const counter = new Counter(5);
counter.next();
console.log(JSON.stringify([
  greet("x"),
  counter.next(),
  all.triple(3),
  sum(4, 6),
  renamed,
  legacy.value,
  cjs.value,
  typeof all.default,
]));
"#;
const GREET: &str = "export default function (name) {\n  return `hi ${name}`;\n}\n";
const COUNTER: &str = r"export default class {
  constructor(start) {
    this.count = start;
  }
  next() {
    this.count += 1;
    return this.count;
  }
}
";
const ALL: &str = "export * from \"./math\";\nexport { base as renamed } from \"./math\";\n";
const MATH: &str = r"export const triple = (n) => n * 3;
export function total(...xs) {
  let sum = 0;
  for (const x of xs) sum += x;
  return sum;
}
export const base = 2;
export default 99;
";
const LEGACY: &str = "module.exports = { value: 21 };\n";

const EXPECTED: &str = r#"["hi x",7,9,10,2,21,21,"undefined"]"#;

fn node_available() -> bool {
  static AVAILABLE: OnceLock<bool> = OnceLock::new();
  *AVAILABLE.get_or_init(|| {
    Command::new("node").arg("--version").output().is_ok_and(|output| output.status.success())
  })
}

macro_rules! skip_if_no_node {
  () => {
    if !node_available() {
      eprintln!("Skipping test: node is not available");
      return;
    }
  };
}

fn run_node(script: &Path) -> String {
  let output = Command::new("node").arg(script).output().unwrap();
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(output.status.success(), "{}:\n{stderr}", script.display());
  String::from_utf8(output.stdout).unwrap().trim_end().to_string()
}

async fn build_and_run(devtool: &str) -> String {
  let dir = project(&[
    ("src/app.js", APP),
    ("src/greet.js", GREET),
    ("src/counter.js", COUNTER),
    ("src/all.js", ALL),
    ("src/math.js", MATH),
    ("src/legacy.js", LEGACY),
  ]);
  let bundler = Bundler::new(options(dir.path(), &babel_config(devtool))).unwrap();
  bundler.write().await.unwrap_or_else(|err| panic!("{err}"));

  let chunk = dir.path().join("dist/main.js");
  let code = std::fs::read_to_string(&chunk).unwrap();
  assert!(!code.contains("= class"), "{code}");
  assert!(!code.contains("const counter"), "{code}");
  run_node(&chunk)
}

#[tokio::test]
async fn chunk_runs_without_source_maps() {
  skip_if_no_node!();
  assert_eq!(build_and_run("false").await, EXPECTED);
}

#[tokio::test]
async fn chunk_runs_with_every_devtool() {
  skip_if_no_node!();
  for devtool in [
    r#""source-map""#,
    r#""inline-source-map""#,
    r#""cheap-module-source-map""#,
    r#""eval""#,
    r#""eval-source-map""#,
  ] {
    assert_eq!(build_and_run(devtool).await, EXPECTED, "devtool {devtool}");
  }
}

#[tokio::test]
async fn modules_evaluate_once_in_import_order() {
  skip_if_no_node!();
  let dir = project(&[
    ("src/app.js", "import \"./a\";\nimport \"./b\";\nconsole.log(globalThis.order.join(\",\"));\n"),
    ("src/a.js", "import \"./log\";\nglobalThis.order.push(\"a\");\n"),
    ("src/b.js", "import \"./log\";\nimport \"./a\";\nglobalThis.order.push(\"b\");\n"),
    ("src/log.js", "globalThis.order = (globalThis.order || []).concat(\"log\");\n"),
  ]);
  let bundler = Bundler::new(options(dir.path(), &babel_config("false"))).unwrap();
  bundler.write().await.unwrap_or_else(|err| panic!("{err}"));
  assert_eq!(run_node(&dir.path().join("dist/main.js")), "log,a,b");
}
