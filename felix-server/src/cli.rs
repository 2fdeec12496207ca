use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[clap(author, version)]
pub struct Arguments {
    /// Specify path for config file.
    #[clap(short, long, default_value = "./config.json")]
    pub config: PathBuf,

    /// Override path for command store file.
    #[clap(short = 's', long)]
    pub store: Option<PathBuf>,
}
