use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Input .json session file
    pub input: PathBuf,
    /// Output directory
    pub output: PathBuf,
    /// Frames per second used to timestamp the action log
    #[arg(long, default_value_t = 60.0)]
    pub tick_rate: f64,
    /// Override the session's initial grid width
    #[arg(long, requires = "height")]
    pub width: Option<i32>,
    /// Override the session's initial grid height
    #[arg(long, requires = "width")]
    pub height: Option<i32>,
}

impl Cli {
    pub fn initial_size(&self) -> Option<(i32, i32)> {
        self.width.zip(self.height)
    }
}
