use std::{path::Path, process::ExitCode};

use loadpack::Bundler;

#[tokio::main]
async fn main() -> ExitCode {
  let config = Path::new(env!("CARGO_MANIFEST_DIR")).join("examples/basic/loadpack.config.json");

  let result = match Bundler::from_config_file(&config) {
    Ok(bundler) => bundler.write().await,
    Err(errors) => Err(errors),
  };

  match result {
    Ok(_) => ExitCode::SUCCESS,
    Err(errors) => {
      for error in errors.iter() {
        eprintln!("{error:#}");
      }
      ExitCode::FAILURE
    }
  }
}
