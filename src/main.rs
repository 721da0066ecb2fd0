use clap::{Parser, Subcommand};
use qr_gifts::{config, output, site};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qr-gifts")]
#[command(about = "Generate personalized greeting pages and QR codes from a CSV table")]
#[command(long_about = "\
Generate personalized greeting pages and QR codes from a CSV table

Every row of the recipient table becomes a static page under the publish
root and a pair of QR images (PNG + SVG) linking to it.

Project layout (all paths configurable in qr-gifts.toml):

  qr-gifts.toml                 # Optional config, see 'qr-gifts gen-config'
  data/recipients.csv           # slug,title,to_name,message,from_name,
                                #   hero_image_url,gallery_urls,video_url,
                                #   video_type,music_url,theme
  static/                       # Copied to docs/static/ (files only)
  docs/                         # Publish root
  ├── index.html                # List of all pages
  └── p/<slug>/index.html       # One page per recipient
  out/qr/<slug>.{png,svg}       # QR codes, keep these private

gallery_urls holds several image URLs separated by '|'.

Running without a command is the same as 'qr-gifts build'.")]
#[command(version)]
struct Cli {
    /// Config file (stock defaults are used when it does not exist)
    #[arg(long, default_value = config::CONFIG_FILE_NAME, global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Generate pages, QR codes and the index (default)
    Build,
    /// Load and summarize recipients without writing anything
    Check {
        /// Print the parsed recipients as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock qr-gifts.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Build) {
        Command::Build => {
            let site = site::Site::new(config::load_config(&cli.config)?);
            let report = site.build()?;
            output::print_build_output(&report);
        }
        Command::Check { json } => {
            let site = site::Site::new(config::load_config(&cli.config)?);
            let recipients = site.load_recipients()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&recipients)?);
            } else {
                let duplicates = site::find_duplicates(&recipients);
                output::print_check_output(&recipients, &duplicates);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Diagnostics go to stderr so stdout stays the build report.
/// Verbosity follows `RUST_LOG`, defaulting to warnings only.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
