use clap::{Parser, Subcommand};
use gallery_thumbs::manifest::ManifestError;
use gallery_thumbs::process::ProcessError;
use gallery_thumbs::{config, output, process};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gallery-thumbs")]
#[command(about = "Build WebP thumbnails for a JSON photo gallery")]
#[command(long_about = "\
Build WebP thumbnails for a JSON photo gallery

Reads the manifest, writes a thumbnail for every photo stored under the
image root, records each thumbnail path on its photo record, and rewrites
the manifest. Existing thumbnails are never regenerated.

Layout (defaults):

  .
  ├── thumbs.toml                # Optional, see 'gallery-thumbs gen-config'
  ├── data.json                  # {\"photos\": [{\"src\": \"img/dawn.jpg\"}, ...]}
  └── img/
      ├── dawn.jpg
      └── thumbs/
          └── dawn_thumb.webp    # ≤ 500px, WebP quality 80

Source path: \"src\", then \"url\". Paths outside img/ (e.g. external URLs)
are left without a thumbnail.")]
#[command(version)]
struct Cli {
    /// Gallery base directory; all manifest paths are relative to it
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Manifest file, relative to the base directory [default: data.json]
    #[arg(long, global = true)]
    manifest: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Generate missing thumbnails and update the manifest (the default)
    Build,
    /// Print a stock thumbs.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Build) {
        Command::Build => {
            let mut builder_config = config::load_config(&cli.root)?;
            if let Some(manifest) = cli.manifest {
                builder_config.manifest = manifest;
                builder_config.validate()?;
            }

            match process::build(&cli.root, &builder_config, output::print_thumb_event) {
                Ok(stats) => output::print_summary(&stats),
                Err(ProcessError::Manifest(ManifestError::NotFound(_))) => {
                    println!(
                        "{}",
                        output::format_manifest_not_found(&builder_config.manifest)
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
