//! One occupancy plane: a row-major `width × height` table of back-references.

use crate::model::ObjectId;

#[derive(Debug, Clone)]
pub(crate) struct Plane {
    width: i32,
    height: i32,
    cells: Vec<Option<ObjectId>>,
}

impl Plane {
    /// Callers guarantee non-negative dimensions.
    pub fn new(width: i32, height: i32) -> Self {
        let len = width.max(0) as usize * height.max(0) as usize;
        Self {
            width,
            height,
            cells: vec![None; len],
        }
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + x as usize)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<ObjectId> {
        self.index(x, y).and_then(|i| self.cells[i])
    }

    /// Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: i32, y: i32, value: Option<ObjectId>) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = value;
        }
    }

    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = None);
    }

    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_is_empty() {
        let mut plane = Plane::new(3, 2);
        plane.set(5, 0, Some(ObjectId(1)));
        plane.set(-1, 0, Some(ObjectId(1)));
        assert_eq!(plane.occupied(), 0);
        assert_eq!(plane.get(3, 0), None);
        assert_eq!(plane.get(0, 2), None);
    }

    #[test]
    fn test_row_major_layout() {
        let mut plane = Plane::new(3, 2);
        plane.set(2, 1, Some(ObjectId(7)));
        assert_eq!(plane.cells[5], Some(ObjectId(7)));
        assert_eq!(plane.get(2, 1), Some(ObjectId(7)));
    }

    #[test]
    fn test_zero_sized_plane() {
        let plane = Plane::new(0, 4);
        assert!(plane.cells.is_empty());
        assert_eq!(plane.get(0, 0), None);
    }
}
