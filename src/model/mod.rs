//! Plain data shared by the grid, the placement controller and the writers.

use serde::Deserialize;

/// One of the two independent occupancy planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Functional,
    Decorative,
}

impl Layer {
    pub const ALL: [Layer; 2] = [Layer::Functional, Layer::Decorative];
}

/// What the sprite menu hands to the editor: footprint, layer and mode.
///
/// Descriptors are immutable; every placed object keeps its own copy so the
/// catalog can change without touching the grid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpriteDescriptor {
    pub name: String,
    pub width: i32,
    pub height: i32,
    pub layer: Layer,
    #[serde(default)]
    pub hold_to_place: bool,
}

impl SpriteDescriptor {
    pub fn new(name: impl Into<String>, width: i32, height: i32, layer: Layer) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            layer,
            hold_to_place: false,
        }
    }

    /// Builder-style toggle for hold-to-place mode.
    pub fn hold_to_place(mut self, hold: bool) -> Self {
        self.hold_to_place = hold;
        self
    }
}

/// Handle the store hands out for each placement. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

/// A single occupant of the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedObject {
    pub id: ObjectId,
    /// Bottom-left cell of the footprint (inclusive).
    pub x: i32,
    pub y: i32,
    pub sprite: SpriteDescriptor,
}

impl PlacedObject {
    pub fn width(&self) -> i32 {
        self.sprite.width
    }

    pub fn height(&self) -> i32 {
        self.sprite.height
    }

    pub fn layer(&self) -> Layer {
        self.sprite.layer
    }

    pub fn name(&self) -> &str {
        &self.sprite.name
    }

    /// Every cell covered by the footprint, column by column.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (self.x..self.x + self.width())
            .flat_map(move |i| (self.y..self.y + self.height()).map(move |j| (i, j)))
    }
}

/// World-space pointer position, in cell units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn lerp(self, to: Point, t: f32) -> Point {
        Point {
            x: self.x + (to.x - self.x) * t,
            y: self.y + (to.y - self.y) * t,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_footprint_cells() {
        let obj = PlacedObject {
            id: ObjectId(0),
            x: 1,
            y: 2,
            sprite: SpriteDescriptor::new("Pipe", 2, 3, Layer::Functional),
        };
        let cells: Vec<_> = obj.cells().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], (1, 2));
        assert_eq!(cells[5], (2, 4));
    }

    #[test]
    fn test_layer_deserialize() {
        let sprite: SpriteDescriptor = serde_json::from_str(
            r#"{ "name": "Tree", "width": 1, "height": 2, "layer": "decorative" }"#,
        )
        .unwrap();
        assert_eq!(sprite.layer, Layer::Decorative);
        assert!(!sprite.hold_to_place);
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(4.0, -2.0);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.25), Point::new(1.0, -0.5));
    }
}
