//! The ghost sprite that follows the pointer.

use crate::model::SpriteDescriptor;

/// Display-side collaborator driven by the placement controller.
pub trait PreviewSink {
    fn set_sprite(&mut self, sprite: &SpriteDescriptor);
    fn set_position(&mut self, x: i32, y: i32);
    fn set_visible(&mut self, visible: bool);
}

/// Keeps the last state it was told about. Used by the replay and in tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingPreview {
    pub sprite: Option<String>,
    pub position: (i32, i32),
    pub visible: bool,
    /// How many times the sprite was swapped.
    pub sprite_changes: usize,
}

impl PreviewSink for RecordingPreview {
    fn set_sprite(&mut self, sprite: &SpriteDescriptor) {
        self.sprite = Some(sprite.name.clone());
        self.sprite_changes += 1;
    }

    fn set_position(&mut self, x: i32, y: i32) {
        self.position = (x, y);
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}
