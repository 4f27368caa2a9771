use clap::{ArgAction, Parser, Subcommand};
use simple_gal_lightbox::catalog::Catalog;
use simple_gal_lightbox::{config, output, render, session};
use std::path::PathBuf;
use tracing::info;

mod logging;

/// Shared flag for commands that read a photo catalog.
#[derive(clap::Args, Clone)]
struct CatalogArgs {
    /// Catalog manifest (JSON) or a directory of images
    #[arg(long, default_value = "photos")]
    catalog: PathBuf,
}

#[derive(Parser)]
#[command(name = "simple-gal-lightbox")]
#[command(about = "Deep-linkable photo viewer overlay for simple-gal portfolios")]
#[command(long_about = "\
Deep-linkable photo viewer overlay for simple-gal portfolios

Opening a photo writes #photo=<slug> into the address bar, so every photo
has a shareable link. Loading a page with such a link opens the viewer on
that photo, and back/forward move through the viewer like any other page.

Catalogs are either a JSON manifest:

  { \"photos\": [ { \"filename\": \"001-dawn.jpg\", \"caption\": \"First light\" } ] }

or a directory of images ordered by numeric prefix:

  photos/
  ├── 001-dawn.jpg             # slug: 001-dawn
  ├── 001-dawn.txt             # sidecar caption
  └── 010-harbour.png

Sessions are TOML scripts of visitor and browser actions, replayed against a
simulated page. Run 'simple-gal-lightbox gen-config' for a documented
lightbox.toml.")]
#[command(version)]
struct Cli {
    /// Viewer config file (missing file means stock defaults)
    #[arg(long, default_value = "lightbox.toml", global = true)]
    config: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a scripted session and print the viewer state after each step
    Replay {
        /// Session script (TOML)
        script: PathBuf,
        #[command(flatten)]
        catalog: CatalogArgs,
    },
    /// List catalog photos with their slugs and flag photos that cannot be deep-linked
    Check(CatalogArgs),
    /// Print the overlay markup for one photo
    Render {
        /// Slug of the photo to render
        slug: String,
        #[command(flatten)]
        catalog: CatalogArgs,
    },
    /// Print a stock lightbox.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    match cli.command {
        Command::Replay { script, catalog } => {
            let transcript = session::replay_files(&script, &catalog.catalog, &cli.config)?;
            output::print_transcript(&transcript);
        }
        Command::Check(args) => {
            let catalog = Catalog::load(&args.catalog)?;
            info!(photos = catalog.len(), "checking catalog");
            output::print_check_output(&catalog);
        }
        Command::Render { slug, catalog } => {
            let viewer_config = config::load_config(&cli.config)?;
            let catalog = Catalog::load(&catalog.catalog)?;
            let view = render::view_for_slug(&catalog, &slug, &viewer_config.assets.base_url)
                .ok_or_else(|| format!("No photo with slug \"{slug}\""))?;
            println!("{}", render::render_overlay(&view).into_string());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
