//! Turns continuous pointer motion into discrete grid edits.
//!
//! Each tick the controller walks from the previous pointer position to the
//! current one in `SUB_STEPS` equal steps and evaluates every step, so a fast
//! drag still touches each cell it crosses.

pub mod preview;

use std::collections::HashSet;

use crate::grid::GridStore;
use crate::model::{Layer, ObjectId, PlacedObject, Point, SpriteDescriptor};
pub use preview::{PreviewSink, RecordingPreview};

pub const SUB_STEPS: u32 = 4;

/// Input collaborator's view of one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerFrame {
    pub position: Point,
    pub primary_held: bool,
    pub secondary_held: bool,
    /// Primary went down this tick.
    pub primary_pressed: bool,
    /// Secondary went up this tick.
    pub secondary_released: bool,
}

/// Cells computed for one interpolation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepTarget {
    /// Footprint origin for the current sprite, centred on the pointer.
    pub origin: (i32, i32),
    /// Single cell under the pointer, used for deletion.
    pub cell: (i32, i32),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub targets: Vec<StepTarget>,
    pub placed: Vec<ObjectId>,
    pub removed: Vec<PlacedObject>,
}

/// Nearest integer, halves rounded up.
#[inline]
fn round_cell(v: f32) -> i32 {
    (v + 0.5).floor() as i32
}

#[derive(Debug)]
pub struct PlacementController<P: PreviewSink> {
    sprite: SpriteDescriptor,
    preview: P,
    shown_sprite: Option<SpriteDescriptor>,
    previous_pointer: Option<Point>,
    /// Chosen on the first occupied cell of a right-drag, kept until release.
    deletion_layer: Option<Layer>,
    locks: HashSet<String>,
}

impl<P: PreviewSink> PlacementController<P> {
    pub fn new(sprite: SpriteDescriptor, preview: P) -> Self {
        Self {
            sprite,
            preview,
            shown_sprite: None,
            previous_pointer: None,
            deletion_layer: None,
            locks: HashSet::new(),
        }
    }

    pub fn sprite(&self) -> &SpriteDescriptor {
        &self.sprite
    }

    pub fn select_sprite(&mut self, sprite: SpriteDescriptor) {
        self.sprite = sprite;
    }

    pub fn preview(&self) -> &P {
        &self.preview
    }

    pub fn deletion_layer(&self) -> Option<Layer> {
        self.deletion_layer
    }

    pub fn previous_pointer(&self) -> Option<Point> {
        self.previous_pointer
    }

    pub fn is_locked(&self) -> bool {
        !self.locks.is_empty()
    }

    /// Suspends all processing until every holder has unlocked.
    pub fn lock(&mut self, holder: &str) {
        self.locks.insert(holder.to_string());
        self.preview.set_visible(false);
    }

    /// Returns false if `holder` did not hold a lock.
    pub fn unlock(&mut self, holder: &str) -> bool {
        self.locks.remove(holder)
    }

    /// The next tick starts fresh instead of interpolating across the gap.
    pub fn focus_changed(&mut self, _has_focus: bool) {
        self.preview.set_visible(false);
        self.previous_pointer = None;
    }

    fn footprint_origin(&self, p: Point) -> (i32, i32) {
        (
            round_cell(p.x - self.sprite.width as f32 / 2.0),
            round_cell(p.y - self.sprite.height as f32 / 2.0),
        )
    }

    pub fn tick(&mut self, grid: &mut GridStore, frame: &PointerFrame) -> TickReport {
        let current = frame.position;
        let previous = *self.previous_pointer.get_or_insert(current);
        let mut report = TickReport::default();

        if self.is_locked() {
            self.previous_pointer = Some(current);
            return report;
        }

        let mut origin = self.footprint_origin(current);
        for step in 1..=SUB_STEPS {
            let p = previous.lerp(current, step as f32 / SUB_STEPS as f32);
            origin = self.footprint_origin(p);
            let cell = (round_cell(p.x - 0.5), round_cell(p.y - 0.5));
            report.targets.push(StepTarget { origin, cell });

            if frame.secondary_held {
                self.erase_at(grid, cell, &mut report);
            } else if frame.primary_held
                && self.sprite.hold_to_place
                && grid.can_place(&self.sprite, origin.0, origin.1)
            {
                if let Some(id) = grid.add_object(&self.sprite, origin.0, origin.1, true) {
                    report.placed.push(id);
                }
            }
        }

        self.update_preview(grid, origin);

        // Single-click placement. For hold-to-place sprites the last sub-step
        // already tried this origin, so this can't place a second object.
        if frame.primary_pressed
            && !frame.secondary_held
            && grid.can_place(&self.sprite, origin.0, origin.1)
        {
            if let Some(id) = grid.add_object(&self.sprite, origin.0, origin.1, true) {
                report.placed.push(id);
            }
        }

        if frame.secondary_released {
            self.deletion_layer = None;
        }

        self.previous_pointer = Some(current);
        report
    }

    fn erase_at(&mut self, grid: &mut GridStore, (x, y): (i32, i32), report: &mut TickReport) {
        if self.deletion_layer.is_none() {
            // functional wins when both layers are occupied
            self.deletion_layer = Layer::ALL
                .into_iter()
                .find(|&layer| grid.contains_object(layer, x, y));
        }

        if let Some(layer) = self.deletion_layer {
            if let Some(removed) = grid.remove_object(layer, x, y) {
                report.removed.push(removed);
            }
        }
    }

    fn update_preview(&mut self, grid: &GridStore, (x, y): (i32, i32)) {
        if self.shown_sprite.as_ref() != Some(&self.sprite) {
            self.preview.set_sprite(&self.sprite);
            self.shown_sprite = Some(self.sprite.clone());
        }
        self.preview.set_position(x, y);
        self.preview
            .set_visible(grid.can_place(&self.sprite, x, y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brick() -> SpriteDescriptor {
        SpriteDescriptor::new("Brick", 1, 1, Layer::Functional).hold_to_place(true)
    }

    fn frame(x: f32, y: f32) -> PointerFrame {
        PointerFrame {
            position: Point::new(x, y),
            ..Default::default()
        }
    }

    fn held(x: f32, y: f32) -> PointerFrame {
        PointerFrame {
            primary_held: true,
            ..frame(x, y)
        }
    }

    fn erasing(x: f32, y: f32) -> PointerFrame {
        PointerFrame {
            secondary_held: true,
            ..frame(x, y)
        }
    }

    fn controller(sprite: SpriteDescriptor) -> PlacementController<RecordingPreview> {
        PlacementController::new(sprite, RecordingPreview::default())
    }

    // ──────────────────────────────────────────────────────────────────
    //  Interpolation
    // ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_fast_drag_visits_every_sub_step() {
        let mut grid = GridStore::new(8, 8).unwrap();
        let mut ctl = controller(brick());

        ctl.tick(&mut grid, &frame(0.0, 0.0));
        let report = ctl.tick(&mut grid, &held(4.0, 0.0));

        let origins: Vec<_> = report.targets.iter().map(|t| t.origin).collect();
        assert_eq!(origins, vec![(1, 0), (2, 0), (3, 0), (4, 0)]);
        assert_eq!(report.placed.len(), 4);
        for x in 1..=4 {
            assert!(grid.contains_object(Layer::Functional, x, 0));
        }
        assert!(!grid.contains_object(Layer::Functional, 0, 0));
    }

    #[test]
    fn test_first_tick_does_not_interpolate() {
        let mut grid = GridStore::new(8, 8).unwrap();
        let mut ctl = controller(brick());

        let report = ctl.tick(&mut grid, &held(5.5, 5.5));
        assert!(report.targets.iter().all(|t| t.origin == (5, 5)));
        assert_eq!(report.placed.len(), 1);
    }

    #[test]
    fn test_focus_loss_resets_previous_position() {
        let mut grid = GridStore::new(10, 10).unwrap();
        let mut ctl = controller(brick());

        ctl.tick(&mut grid, &frame(0.5, 0.5));
        ctl.focus_changed(false);
        assert_eq!(ctl.previous_pointer(), None);
        assert!(!ctl.preview().visible);

        let report = ctl.tick(&mut grid, &held(8.5, 8.5));
        assert_eq!(report.placed.len(), 1);
        assert_eq!(grid.objects()[0].x, 8);
    }

    #[test]
    fn test_origin_centres_footprint_on_pointer() {
        let mut grid = GridStore::new(8, 8).unwrap();
        let mut ctl = controller(SpriteDescriptor::new("Pipe", 2, 2, Layer::Functional));

        let report = ctl.tick(&mut grid, &frame(3.0, 3.0));
        assert_eq!(report.targets[3], StepTarget { origin: (2, 2), cell: (3, 3) });
    }

    // ──────────────────────────────────────────────────────────────────
    //  Placement modes
    // ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_single_click_sprite_places_only_on_press() {
        let mut grid = GridStore::new(8, 8).unwrap();
        let tree = SpriteDescriptor::new("Tree", 1, 2, Layer::Decorative);
        let mut ctl = controller(tree);

        ctl.tick(&mut grid, &frame(1.5, 2.0));
        let report = ctl.tick(&mut grid, &held(3.5, 2.0));
        assert!(report.placed.is_empty(), "holding alone must not place");

        let press = PointerFrame {
            primary_pressed: true,
            ..held(3.5, 2.0)
        };
        let report = ctl.tick(&mut grid, &press);
        assert_eq!(report.placed.len(), 1);
        let tree = &grid.objects()[0];
        assert_eq!((tree.x, tree.y), (3, 1));
    }

    #[test]
    fn test_press_with_hold_to_place_places_once() {
        let mut grid = GridStore::new(8, 8).unwrap();
        let mut ctl = controller(brick());

        let press = PointerFrame {
            primary_pressed: true,
            ..held(2.5, 2.5)
        };
        let report = ctl.tick(&mut grid, &press);
        assert_eq!(report.placed.len(), 1);
        assert_eq!(grid.objects().len(), 1);
    }

    #[test]
    fn test_press_ignored_while_erasing() {
        let mut grid = GridStore::new(8, 8).unwrap();
        let mut ctl = controller(SpriteDescriptor::new("Coin", 1, 1, Layer::Functional));

        let press = PointerFrame {
            primary_pressed: true,
            secondary_held: true,
            ..frame(2.5, 2.5)
        };
        assert!(ctl.tick(&mut grid, &press).placed.is_empty());
        assert!(grid.objects().is_empty());
    }

    // ──────────────────────────────────────────────────────────────────
    //  Deletion
    // ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_deletion_prefers_functional_layer() {
        let mut grid = GridStore::new(6, 6).unwrap();
        grid.add_object(&SpriteDescriptor::new("Bush", 1, 1, Layer::Decorative), 2, 2, false);
        grid.add_object(&SpriteDescriptor::new("Block", 1, 1, Layer::Functional), 2, 2, false);
        let mut ctl = controller(brick());

        let report = ctl.tick(&mut grid, &erasing(2.5, 2.5));
        assert_eq!(ctl.deletion_layer(), Some(Layer::Functional));
        assert_eq!(report.removed.len(), 1);
        assert_eq!(report.removed[0].name(), "Block");
        assert!(grid.contains_object(Layer::Decorative, 2, 2));
    }

    #[test]
    fn test_deletion_layer_sticks_for_whole_drag() {
        let mut grid = GridStore::new(6, 6).unwrap();
        let bush = SpriteDescriptor::new("Bush", 1, 1, Layer::Decorative);
        let block = SpriteDescriptor::new("Block", 1, 1, Layer::Functional);
        grid.add_object(&bush, 0, 0, false);
        grid.add_object(&block, 1, 0, false);
        grid.add_object(&bush, 1, 0, false);
        let mut ctl = controller(brick());

        // drag starts over decorative-only cell
        ctl.tick(&mut grid, &erasing(0.5, 0.5));
        assert_eq!(ctl.deletion_layer(), Some(Layer::Decorative));

        let report = ctl.tick(&mut grid, &erasing(1.5, 0.5));
        assert_eq!(report.removed.len(), 1);
        assert_eq!(report.removed[0].layer(), Layer::Decorative);
        assert!(grid.contains_object(Layer::Functional, 1, 0));

        let release = PointerFrame {
            secondary_released: true,
            ..frame(1.5, 0.5)
        };
        ctl.tick(&mut grid, &release);
        assert_eq!(ctl.deletion_layer(), None);
    }

    #[test]
    fn test_deletion_layer_unset_over_empty_cells() {
        let mut grid = GridStore::new(6, 6).unwrap();
        let mut ctl = controller(brick());
        ctl.tick(&mut grid, &erasing(3.5, 3.5));
        assert_eq!(ctl.deletion_layer(), None);
    }

    #[test]
    fn test_erase_removes_multi_cell_object_from_any_cell() {
        let mut grid = GridStore::new(6, 6).unwrap();
        grid.add_object(&SpriteDescriptor::new("Pipe", 2, 3, Layer::Functional), 1, 1, false);
        let mut ctl = controller(brick());

        let report = ctl.tick(&mut grid, &erasing(2.5, 3.5));
        assert_eq!(report.removed.len(), 1);
        assert_eq!(grid.occupied_cells(Layer::Functional), 0);
    }

    // ──────────────────────────────────────────────────────────────────
    //  Preview and locking
    // ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_preview_tracks_last_origin_and_validity() {
        let mut grid = GridStore::new(4, 4).unwrap();
        let mut ctl = controller(brick());

        ctl.tick(&mut grid, &frame(1.5, 1.5));
        let preview = ctl.preview();
        assert_eq!(preview.sprite.as_deref(), Some("Brick"));
        assert_eq!(preview.position, (1, 1));
        assert!(preview.visible);

        ctl.tick(&mut grid, &frame(9.5, 1.5));
        assert!(!ctl.preview().visible, "out of bounds hides the preview");

        ctl.select_sprite(SpriteDescriptor::new("Tree", 1, 2, Layer::Decorative));
        ctl.tick(&mut grid, &frame(9.5, 1.5));
        ctl.tick(&mut grid, &frame(9.5, 1.5));
        assert_eq!(ctl.preview().sprite.as_deref(), Some("Tree"));
        assert_eq!(ctl.preview().sprite_changes, 2);
    }

    #[test]
    fn test_locked_controller_does_nothing() {
        let mut grid = GridStore::new(8, 8).unwrap();
        grid.add_object(&SpriteDescriptor::new("Block", 1, 1, Layer::Functional), 6, 6, false);
        let mut ctl = controller(brick());

        ctl.lock("dialogue");
        ctl.lock("menu");
        assert!(ctl.is_locked());
        assert!(!ctl.preview().visible);

        let report = ctl.tick(&mut grid, &held(2.5, 2.5));
        assert_eq!(report, TickReport::default());
        let report = ctl.tick(&mut grid, &erasing(6.5, 6.5));
        assert!(report.removed.is_empty());
        assert_eq!(grid.objects().len(), 1);

        assert!(ctl.unlock("dialogue"));
        assert!(!ctl.unlock("dialogue"));
        assert!(ctl.is_locked());
        assert!(ctl.unlock("menu"));

        // pointer kept being tracked while locked
        let report = ctl.tick(&mut grid, &held(6.5, 2.5));
        assert_eq!(report.targets[0].origin, (6, 5));
        assert_eq!(report.placed.len(), 4);
    }
}
