mod args;

use std::time::Instant;

use ansi_term::Colour;
use args::{InputArgs, OutputArgs};
use clap::Parser;

use glasspack::{Bundler, BundlerOptions, OutputAsset};

#[derive(Parser)]
#[command(name = "glasspack", version, about = "A teaching-grade JavaScript bundler", long_about = None)]
struct Commands {
  #[clap(flatten)]
  input: InputArgs,

  #[clap(flatten)]
  output: OutputArgs,
}

fn print_output_assets(out_dir: &str, assets: &[OutputAsset]) {
  let mut left = 0;
  let mut right = 0;

  let mut rows = Vec::with_capacity(assets.len());

  for (index, asset) in assets.iter().enumerate() {
    let size = format!("{:.2}", asset.content.len() as f64 / 1024.0);

    if size.len() > right {
      right = size.len();
    }

    if asset.filename.len() > left {
      left = asset.filename.len();
    }

    rows.push((asset.filename.to_string(), size, index == 0));
  }

  let dim = Colour::White.dimmed();
  let color = Colour::Cyan;

  for (filename, size, is_entry) in rows {
    let asset_type = if is_entry { "entry" } else { "chunk" };
    let filename_len = filename.len();

    println!(
      "{}{}{:left$} {}{}{:right$}{} kB",
      dim.paint(format!("{out_dir}/")),
      color.paint(filename),
      "",
      dim.paint(asset_type),
      dim.paint(" │ size: "),
      "",
      size,
      left = left - filename_len,
      right = right - size.len()
    )
  }
}

fn main() {
  let args = Commands::parse();

  let out_dir = args.output.output.to_string_lossy().into_owned();
  let mut bundler = Bundler::new(BundlerOptions {
    entry: Some(args.input.entry.to_string_lossy().into_owned()),
    out_dir: Some(out_dir.clone()),
    cwd: None,
    public_path: args.output.public_path,
  });

  let start = Instant::now();
  match bundler.build(true) {
    Ok(output) => {
      for warning in &output.warnings {
        eprintln!("{} {}", Colour::Yellow.paint("Warning:"), warning);
      }

      if !output.assets.is_empty() {
        print_output_assets(&out_dir, &output.assets);
      }

      let elapsed = format!("{:.2} ms", start.elapsed().as_secs_f64() * 1000.0);
      println!("\n{} Finished in {}", Colour::Green.paint("✔"), Colour::White.bold().paint(elapsed))
    }
    Err(errors) => {
      for error in &*errors {
        eprintln!("{} {}", Colour::Red.paint("Error:"), error);
      }
      std::process::exit(1);
    }
  }
}
