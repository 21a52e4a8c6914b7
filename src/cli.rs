use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "poster-database")]
#[command(about = "Download top-grossing movie posters from TMDB into a local image database")]
pub struct Cli {
    /// Directory that receives the movie list and the poster images
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Config file to read instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Only resize the images already present in the output directory
    #[arg(long)]
    pub normalize_only: bool,
}
