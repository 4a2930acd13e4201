//! Command-line interface for building mosaics and managing saved profiles

use crate::algorithm::pipeline::MosaicMaker;
use crate::io::configuration::{
    DEFAULT_EPSILON, DEFAULT_RATIO_HEIGHT, DEFAULT_RATIO_WIDTH, DEFAULT_SETTINGS_FILE,
    DEFAULT_TILE_MULTIPLIER, DEFAULT_UPSCALE,
};
use crate::io::error::{MosaicError, Result};
use crate::io::parameters::MosaicParameters;
use crate::io::progress::ProgressManager;
use crate::io::settings::SettingsStore;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mosaictile")]
#[command(
    author,
    version,
    about = "Build photo mosaics from a directory of tile images"
)]
/// Command-line arguments for the mosaic tool
pub struct Cli {
    /// Action to perform
    #[command(subcommand)]
    pub command: Command,

    /// Profile store location
    #[arg(long, global = true, default_value = DEFAULT_SETTINGS_FILE)]
    pub settings: PathBuf,

    /// Suppress progress output and all logging below errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Number of tile loading threads (defaults to one per core)
    #[arg(long, global = true)]
    pub workers: Option<usize>,

    /// Number tiles by file path instead of load completion order
    #[arg(long, global = true)]
    pub deterministic: bool,
}

/// Top-level actions
#[derive(Subcommand)]
pub enum Command {
    /// Build a mosaic from explicit parameters
    Make(MakeArgs),
    /// Manage saved parameter profiles
    Profile {
        /// Profile action
        #[command(subcommand)]
        action: ProfileCommand,
    },
}

/// Parameters of a single mosaic run
#[derive(Args)]
pub struct MakeArgs {
    /// Target photo to approximate
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Tile directory, optionally ending in a file pattern such as `tiles/*.jpg`
    #[arg(value_name = "TILES")]
    pub tiles: String,

    /// Tile size multiplier applied to the ratio
    #[arg(short, long, default_value_t = DEFAULT_TILE_MULTIPLIER)]
    pub multiplier: u32,

    /// Tile ratio width
    #[arg(long, default_value_t = DEFAULT_RATIO_WIDTH)]
    pub ratio_width: u32,

    /// Tile ratio height
    #[arg(long, default_value_t = DEFAULT_RATIO_HEIGHT)]
    pub ratio_height: u32,

    /// Decay strength discouraging repeated tiles (0 disables)
    #[arg(short, long, default_value_t = DEFAULT_EPSILON)]
    pub epsilon: f64,

    /// Integer upscale applied to the target photo
    #[arg(short, long, default_value_t = DEFAULT_UPSCALE)]
    pub upscale: u32,

    /// Output file name (defaults to `<target>_mosaic.jpg`)
    #[arg(short = 'o', long)]
    pub output_name: Option<String>,

    /// Output directory (defaults to the working directory)
    #[arg(short = 'd', long)]
    pub output_dir: Option<PathBuf>,

    /// Also use every tile rotated by 180°
    #[arg(long)]
    pub mirror: bool,

    /// Save these parameters under a profile name before running
    #[arg(long, value_name = "PROFILE")]
    pub save_profile: Option<String>,
}

impl MakeArgs {
    /// Collect the arguments into a parameter record
    pub fn to_parameters(&self) -> MosaicParameters {
        MosaicParameters {
            target: self.target.clone(),
            tile_pattern: self.tiles.clone(),
            tile_multiplier: self.multiplier,
            ratio_width: self.ratio_width,
            ratio_height: self.ratio_height,
            epsilon: self.epsilon,
            upscale: self.upscale,
            output_name: self.output_name.clone(),
            output_dir: self.output_dir.clone(),
            mirror: self.mirror,
        }
    }
}

/// Profile store actions
#[derive(Subcommand)]
pub enum ProfileCommand {
    /// Build a mosaic from a saved profile
    Run {
        /// Profile name
        name: String,
    },
    /// Print a saved profile as JSON
    Show {
        /// Profile name
        name: String,
    },
    /// List saved profile names
    List,
    /// Delete a saved profile
    Delete {
        /// Profile name
        name: String,
    },
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Executes a parsed command line
pub struct CommandRunner {
    cli: Cli,
}

impl CommandRunner {
    /// Create a runner for the given CLI arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the selected command
    ///
    /// # Errors
    ///
    /// Returns an error if the settings store, parameter validation or the mosaic
    /// pipeline fails
    pub fn run(&self) -> Result<()> {
        match &self.cli.command {
            Command::Make(args) => {
                let parameters = args.to_parameters();
                parameters.validate()?;
                if let Some(profile) = &args.save_profile {
                    let mut store = SettingsStore::open(&self.cli.settings)?;
                    store.save(profile, &parameters)?;
                }
                self.make(parameters).map(|_| ())
            }
            Command::Profile { action } => self.profile(action),
        }
    }

    /// Build one mosaic, returning where it was written
    ///
    /// # Errors
    ///
    /// Returns an error if any pipeline stage fails
    pub fn make(&self, parameters: MosaicParameters) -> Result<PathBuf> {
        let mut maker =
            MosaicMaker::new(parameters)?.with_deterministic_order(self.cli.deterministic);
        if let Some(workers) = self.cli.workers {
            maker = maker.with_workers(workers);
        }
        if self.cli.should_show_progress() {
            maker = maker.with_progress(ProgressManager::new());
        }
        maker.create_mosaic()
    }

    // Allow print for listing and showing profiles on stdout
    #[allow(clippy::print_stdout)]
    fn profile(&self, action: &ProfileCommand) -> Result<()> {
        let mut store = SettingsStore::open(&self.cli.settings)?;
        match action {
            ProfileCommand::Run { name } => {
                let parameters = store.load(name)?;
                self.make(parameters).map(|_| ())
            }
            ProfileCommand::Show { name } => {
                let parameters = store.load(name)?;
                let rendered = serde_json::to_string_pretty(&parameters).map_err(|e| {
                    MosaicError::Settings {
                        path: store.path().to_path_buf(),
                        reason: e.to_string(),
                    }
                })?;
                println!("{rendered}");
                Ok(())
            }
            ProfileCommand::List => {
                for name in store.list() {
                    println!("{name}");
                }
                Ok(())
            }
            ProfileCommand::Delete { name } => {
                if store.delete(name)? {
                    Ok(())
                } else {
                    Err(MosaicError::ProfileNotFound {
                        profile: name.clone(),
                    })
                }
            }
        }
    }
}
