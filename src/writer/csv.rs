//! Level export: grid size on the first line, then one line per object.
//!
//! ```text
//! W,H
//! name,x,y,w,h
//! ```
//!
//! Objects appear in the order they were added. Names are written verbatim,
//! so a name containing a comma cannot be read back unambiguously.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::grid::GridStore;

pub const FILE_NAME: &str = "level.csv";

pub fn format(grid: &GridStore) -> String {
    let mut out = format!("{},{}\n", grid.width(), grid.height());
    for obj in grid.objects() {
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            obj.name(),
            obj.x,
            obj.y,
            obj.width(),
            obj.height()
        ));
    }
    out
}

pub fn emit(grid: &GridStore, out_dir: &Path) -> io::Result<PathBuf> {
    let path = out_dir.join(FILE_NAME);
    fs::write(&path, format(grid))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Layer, SpriteDescriptor};

    #[test]
    fn test_empty_grid() {
        let grid = GridStore::new(4, 6).unwrap();
        assert_eq!(format(&grid), "4,6\n");
    }

    #[test]
    fn test_single_object() {
        let mut grid = GridStore::new(4, 6).unwrap();
        let tree = SpriteDescriptor::new("Tree", 1, 2, Layer::Decorative);
        grid.add_object(&tree, 1, 1, false).unwrap();
        assert_eq!(format(&grid), "4,6\nTree,1,1,1,2\n");
    }

    #[test]
    fn test_insertion_order_not_spatial() {
        let mut grid = GridStore::new(5, 5).unwrap();
        grid.add_object(&SpriteDescriptor::new("Far", 1, 1, Layer::Functional), 4, 4, false);
        grid.add_object(&SpriteDescriptor::new("Near", 2, 1, Layer::Decorative), 0, 0, false);
        grid.add_object(&SpriteDescriptor::new("Gone", 1, 1, Layer::Functional), 2, 2, false);
        grid.remove_object(Layer::Functional, 2, 2);

        assert_eq!(format(&grid), "5,5\nFar,4,4,1,1\nNear,0,0,2,1\n");
    }

    #[test]
    fn test_every_line_terminated() {
        let mut grid = GridStore::new(12, 10).unwrap();
        for x in 0..12 {
            grid.add_object(&SpriteDescriptor::new("Ground", 1, 1, Layer::Functional), x, 0, false);
        }
        let text = format(&grid);

        assert_eq!(text.matches('\n').count(), 13);
        assert!(text.ends_with("Ground,11,0,1,1\n"));
        assert!(text.lines().skip(1).all(|l| l.split(',').count() == 5));
    }
}
