//! Dump the action log collected during a replay.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

pub const FILE_NAME: &str = "actions.log";

pub fn emit(lines: &[String], out_dir: &Path) -> io::Result<PathBuf> {
    let path = out_dir.join(FILE_NAME);
    let mut w = BufWriter::new(File::create(&path)?);
    for line in lines {
        writeln!(w, "{line}")?;
    }
    w.flush()?;
    Ok(path)
}
