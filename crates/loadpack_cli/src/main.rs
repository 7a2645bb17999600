mod args;

use std::{process::ExitCode, time::Instant};

use ansi_term::Colour;
use args::{ConfigArgs, OverrideArgs};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use loadpack::{Bundler, BundlerOptions, DevtoolOption, OutputAsset, OutputKind};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Commands {
  #[clap(flatten)]
  config: ConfigArgs,

  #[clap(flatten)]
  overrides: OverrideArgs,
}

fn init_tracing() {
  let filter = EnvFilter::try_from_env("LOADPACK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
  tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn print_output_assets(outputs: &[OutputAsset]) {
  let mut left = 0;
  let mut right = 0;

  let mut assets = Vec::with_capacity(outputs.len());

  for output in outputs {
    let size = format!("{:.2}", output.content.len() as f64 / 1024.0);

    right = right.max(size.len());
    left = left.max(output.filename.len());

    let asset_type = match output.kind {
      OutputKind::Chunk => "chunk",
      OutputKind::SourceMap => "map",
      OutputKind::Asset => "asset",
    };
    // Chunks stand out from the files emitted alongside them.
    let color = if output.is_chunk() { Colour::Cyan } else { Colour::Green };
    assets.push((output.filename(), size, asset_type, color));
  }

  let dim = Colour::White.dimmed();

  for (filename, size, asset_type, color) in assets {
    println!(
      "{}{}{:left$} {}{}{:right$}{} kB",
      dim.paint("<DIR>/"),
      color.paint(filename),
      "",
      dim.paint(format!("{asset_type:5}")),
      dim.paint(" │ size: "),
      "",
      size,
      left = left - filename.len(),
      right = right - size.len()
    );
  }
}

fn load_options(config: &ConfigArgs, overrides: OverrideArgs) -> Result<BundlerOptions, String> {
  let mut options =
    BundlerOptions::from_config_file(&config.config).map_err(|errors| errors.to_string())?;

  if let Some(devtool) = overrides.devtool {
    options.devtool = Some(DevtoolOption::Name(devtool));
  }
  if let Some(path) = overrides.output_path {
    let path = std::path::absolute(&path).map_err(|err| format!("{}: {err}", path.display()))?;
    options.output.get_or_insert_with(Default::default).path = Some(path);
  }

  Ok(options)
}

#[tokio::main]
async fn main() -> ExitCode {
  init_tracing();

  let args = Commands::parse();
  let silent = args.overrides.silent;

  let options = match load_options(&args.config, args.overrides) {
    Ok(options) => options,
    Err(error) => {
      eprintln!("{} {}", Colour::Red.paint("Error:"), error);
      return ExitCode::FAILURE;
    }
  };

  let start = Instant::now();
  let result = match Bundler::new(options) {
    Ok(bundler) => bundler.write().await,
    Err(errors) => Err(errors),
  };

  match result {
    Ok(output) => {
      for warning in &output.warnings {
        eprintln!("{} {}", Colour::Yellow.paint("Warning:"), warning);
      }
      if !silent {
        print_output_assets(&output.assets);
      }

      let elapsed = format!("{:.2} ms", start.elapsed().as_secs_f64() * 1000.0);
      println!("\n{} Finished in {}", Colour::Green.paint("✔"), Colour::White.bold().paint(elapsed));
      ExitCode::SUCCESS
    }
    Err(errors) => {
      for error in &*errors {
        eprintln!("{} {:#}", Colour::Red.paint("Error:"), error);
      }
      ExitCode::FAILURE
    }
  }
}
