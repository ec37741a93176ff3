use std::collections::HashSet;

use anyhow::{Result, anyhow};
use serde::Deserialize;

use crate::grid::check_dimensions;
use crate::model::{Point, SpriteDescriptor};
use crate::placement::PointerFrame;

/// A recorded editing session, validated and ready to replay.
#[derive(Debug, Clone)]
pub struct Session {
    pub width: i32,
    pub height: i32,
    pub sprites: Vec<SpriteDescriptor>,
    pub events: Vec<SessionEvent>,
}

impl Session {
    pub fn sprite(&self, name: &str) -> Option<&SpriteDescriptor> {
        self.sprites.iter().find(|s| s.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEvent {
    /// Pick the active sprite by catalog name.
    Select(String),
    Frame(FrameInput),
    Resize {
        width: i32,
        height: i32,
        #[serde(default)]
        keep_objects: bool,
    },
    Clear,
    Lock(String),
    Unlock(String),
    Focus(bool),
}

/// One tick of recorded pointer input. Missing flags are false.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct FrameInput {
    pub x: f32,
    pub y: f32,
    pub primary: bool,
    pub secondary: bool,
    pub primary_down: bool,
    pub secondary_up: bool,
}

impl From<FrameInput> for PointerFrame {
    fn from(f: FrameInput) -> Self {
        PointerFrame {
            position: Point::new(f.x, f.y),
            primary_held: f.primary,
            secondary_held: f.secondary,
            primary_pressed: f.primary_down,
            secondary_released: f.secondary_up,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawSession {
    grid: RawGrid,
    sprites: Vec<SpriteDescriptor>,
    #[serde(default)]
    events: Vec<SessionEvent>,
}

#[derive(Debug, Deserialize)]
struct RawGrid {
    width: i32,
    height: i32,
}

/// Parse and validate a session file.
///
/// The file carries the initial grid size, the sprite catalog, and the
/// recorded events in replay order. Anything the replay could not act on
/// (an empty catalog, unknown sprite names, frames before a sprite is
/// chosen, bad sizes) is reported here instead.
pub fn load(json: &str) -> Result<Session> {
    log::debug!("session file loaded, size: {} bytes", json.len());
    let raw: RawSession =
        serde_json::from_str(json).map_err(|e| anyhow!("Failed to parse JSON: {}", e))?;

    check_dimensions(raw.grid.width, raw.grid.height)
        .map_err(|e| anyhow!("grid size rejected: {}", e))?;

    if raw.sprites.is_empty() {
        return Err(anyhow!("sprite catalog is empty"));
    }

    let mut names = HashSet::new();
    for (i, sprite) in raw.sprites.iter().enumerate() {
        if sprite.width <= 0 || sprite.height <= 0 {
            return Err(anyhow!(
                "sprite {} `{}` has non-positive size {}x{}",
                i,
                sprite.name,
                sprite.width,
                sprite.height
            ));
        }
        if !names.insert(sprite.name.as_str()) {
            return Err(anyhow!("sprite `{}` defined twice", sprite.name));
        }
        if sprite.name.contains(',') {
            log::warn!(
                "sprite name `{}` contains a comma; the level export will be ambiguous",
                sprite.name
            );
        }
    }

    let mut selected = false;
    for (i, event) in raw.events.iter().enumerate() {
        match event {
            SessionEvent::Select(name) => {
                if !names.contains(name.as_str()) {
                    return Err(anyhow!("event {} selects unknown sprite `{}`", i, name));
                }
                selected = true;
            }
            SessionEvent::Frame(_) if !selected => {
                return Err(anyhow!("event {} is a frame but no sprite is selected yet", i));
            }
            SessionEvent::Resize { width, height, .. } => {
                check_dimensions(*width, *height)
                    .map_err(|e| anyhow!("event {} resize rejected: {}", i, e))?;
            }
            _ => {}
        }
    }

    log::debug!(
        "session parsed: {} sprites, {} events",
        raw.sprites.len(),
        raw.events.len()
    );
    Ok(Session {
        width: raw.grid.width,
        height: raw.grid.height,
        sprites: raw.sprites,
        events: raw.events,
    })
}
