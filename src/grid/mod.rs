//! Two-layer occupancy index for multi-cell objects.
//!
//! `GridStore` owns every `PlacedObject` (a flat, insertion-ordered list) and
//! keeps one `Plane` per layer whose cells point back at the owning object.
//! Every footprint is fully referenced on its layer, footprints on the same
//! layer never overlap, and every footprint lies inside the grid.

mod plane;

use std::fmt;

use crate::journal::ActionLog;
use crate::model::{Layer, ObjectId, PlacedObject, SpriteDescriptor};
use plane::Plane;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Width or height below zero, or more than `MAX_CELLS` cells.
    InvalidDimensions { width: i32, height: i32 },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::InvalidDimensions { width, height } => {
                write!(f, "invalid grid dimensions {}x{}", width, height)
            }
        }
    }
}

impl std::error::Error for GridError {}

/// Returned by `on_size_changed`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type SizeObserver = Box<dyn FnMut(i32, i32)>;

/// Largest cell count a layer may hold (1024 × 1024).
pub const MAX_CELLS: usize = 1 << 20;

pub struct GridStore {
    width: i32,
    height: i32,
    functional: Plane,
    decorative: Plane,
    objects: Vec<PlacedObject>,
    next_id: u64,
    observers: Vec<(SubscriptionId, SizeObserver)>,
    next_subscription: u64,
    log: ActionLog,
}

/// Accepts sizes a `GridStore` can be created with or resized to.
pub fn check_dimensions(width: i32, height: i32) -> Result<(), GridError> {
    if width < 0 || height < 0 {
        return Err(GridError::InvalidDimensions { width, height });
    }
    match (width as usize).checked_mul(height as usize) {
        Some(cells) if cells <= MAX_CELLS => Ok(()),
        _ => Err(GridError::InvalidDimensions { width, height }),
    }
}

impl GridStore {
    pub fn new(width: i32, height: i32) -> Result<Self, GridError> {
        Self::with_log(width, height, ActionLog::default())
    }

    pub fn with_log(width: i32, height: i32, log: ActionLog) -> Result<Self, GridError> {
        check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            functional: Plane::new(width, height),
            decorative: Plane::new(width, height),
            objects: Vec::new(),
            next_id: 0,
            observers: Vec::new(),
            next_subscription: 0,
            log,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// All occupants in the order they were added.
    pub fn objects(&self) -> &[PlacedObject] {
        &self.objects
    }

    pub fn object(&self, id: ObjectId) -> Option<&PlacedObject> {
        self.position(id).map(|i| &self.objects[i])
    }

    // `objects` stays sorted by id: ids only grow and resize restores in order
    fn position(&self, id: ObjectId) -> Option<usize> {
        self.objects.binary_search_by_key(&id, |o| o.id).ok()
    }

    /// The occupant covering `(x, y)` on `layer`, if any.
    pub fn object_at(&self, layer: Layer, x: i32, y: i32) -> Option<&PlacedObject> {
        self.plane(layer).get(x, y).and_then(|id| self.object(id))
    }

    /// Number of occupied cells on `layer`.
    pub fn occupied_cells(&self, layer: Layer) -> usize {
        self.plane(layer).occupied()
    }

    fn plane(&self, layer: Layer) -> &Plane {
        match layer {
            Layer::Functional => &self.functional,
            Layer::Decorative => &self.decorative,
        }
    }

    fn plane_mut(&mut self, layer: Layer) -> &mut Plane {
        match layer {
            Layer::Functional => &mut self.functional,
            Layer::Decorative => &mut self.decorative,
        }
    }

    /// True iff the whole footprint is in bounds and free on the sprite's layer.
    pub fn can_place(&self, sprite: &SpriteDescriptor, x: i32, y: i32) -> bool {
        if sprite.width <= 0 || sprite.height <= 0 {
            return false;
        }
        // i64 so huge origins cannot overflow the bound check
        let (x64, y64) = (x as i64, y as i64);
        if x < 0 || x64 + sprite.width as i64 > self.width as i64 {
            return false;
        }
        if y < 0 || y64 + sprite.height as i64 > self.height as i64 {
            return false;
        }

        let plane = self.plane(sprite.layer);
        (x..x + sprite.width)
            .all(|i| (y..y + sprite.height).all(|j| plane.get(i, j).is_none()))
    }

    /// Out-of-bounds cells are simply empty.
    pub fn contains_object(&self, layer: Layer, x: i32, y: i32) -> bool {
        self.plane(layer).get(x, y).is_some()
    }

    /// Places `sprite` with its bottom-left cell at `(x, y)`.
    ///
    /// Returns `None` and leaves the grid untouched when the footprint does not
    /// fit or overlaps another occupant on the same layer.
    pub fn add_object(
        &mut self,
        sprite: &SpriteDescriptor,
        x: i32,
        y: i32,
        write_log: bool,
    ) -> Option<ObjectId> {
        let id = ObjectId(self.next_id);
        let placed = PlacedObject {
            id,
            x,
            y,
            sprite: sprite.clone(),
        };
        self.insert(placed)?;
        self.next_id += 1;

        if write_log {
            self.log
                .write(&format!("Added {} at {}, {}", sprite.name, x, y));
        }
        Some(id)
    }

    fn insert(&mut self, placed: PlacedObject) -> Option<ObjectId> {
        if !self.can_place(&placed.sprite, placed.x, placed.y) {
            return None;
        }
        // origin re-check, already implied by can_place
        if self.contains_object(placed.layer(), placed.x, placed.y) {
            return None;
        }

        let id = placed.id;
        let layer = placed.layer();
        let cells: Vec<(i32, i32)> = placed.cells().collect();
        let plane = self.plane_mut(layer);
        for (i, j) in cells {
            plane.set(i, j, Some(id));
        }
        self.objects.push(placed);
        Some(id)
    }

    /// Removes the object covering `(x, y)` on `layer`; any footprint cell works.
    pub fn remove_object(&mut self, layer: Layer, x: i32, y: i32) -> Option<PlacedObject> {
        let id = self.plane(layer).get(x, y)?;
        let pos = self.position(id)?;
        let removed = self.objects.remove(pos);

        let plane = self.plane_mut(layer);
        for (i, j) in removed.cells() {
            plane.set(i, j, None);
        }

        self.log
            .write(&format!("Removed {} at {}, {}", removed.name(), x, y));
        Some(removed)
    }

    /// Drops every occupant and empties both layers.
    pub fn clear(&mut self) {
        self.log.write("Grid cleared");
        self.objects.clear();
        self.functional.clear();
        self.decorative.clear();
    }

    /// Reallocates both layers to `width × height`.
    ///
    /// With `preserve`, previous occupants are re-added in their original order
    /// under the normal placement rules; any that no longer fit (or now collide
    /// with an earlier one) are dropped. Size observers run afterwards in both
    /// cases.
    pub fn resize(&mut self, width: i32, height: i32, preserve: bool) -> Result<(), GridError> {
        check_dimensions(width, height)?;

        let previous = if preserve {
            std::mem::take(&mut self.objects)
        } else {
            Vec::new()
        };

        self.clear();
        self.width = width;
        self.height = height;
        self.functional = Plane::new(width, height);
        self.decorative = Plane::new(width, height);

        let mut dropped = 0;
        for placed in previous {
            if self.insert(placed).is_none() {
                dropped += 1;
            }
        }
        if dropped > 0 {
            log::debug!("resize to {width}x{height} dropped {dropped} object(s)");
        }

        for (_, observer) in self.observers.iter_mut() {
            observer(width, height);
        }
        Ok(())
    }

    /// Registers a callback fired with the new size after every resize.
    pub fn on_size_changed(&mut self, observer: impl FnMut(i32, i32) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }
}

impl fmt::Debug for GridStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridStore")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("objects", &self.objects)
            .field("observers", &self.observers.len())
            .finish()
    }
}
