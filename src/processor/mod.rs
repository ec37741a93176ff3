//! Replays a recorded session through the placement controller.
//!
//! This is the only place that creates the `GridStore` and the
//! `PlacementController`; everything else receives them by reference.
use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result, anyhow};

use crate::grid::GridStore;
use crate::journal::{ActionLog, ManualClock, MemorySink};
use crate::parser::{Session, SessionEvent};
use crate::placement::{PlacementController, PointerFrame, RecordingPreview};

#[derive(Debug, Clone)]
pub struct ReplayConfig {
    /// Frames per second used to timestamp the action log.
    pub tick_rate: f64,
    /// Overrides the session's initial grid size.
    pub initial_size: Option<(i32, i32)>,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            initial_size: None,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplayStats {
    pub frames: usize,
    pub placed: usize,
    pub removed: usize,
    /// Frames that arrived while the controller was locked.
    pub locked_frames: usize,
}

/// Final state handed to `writer`.
#[derive(Debug)]
pub struct ReplayOutcome {
    pub grid: GridStore,
    pub actions: Vec<String>,
    /// Every `(width, height)` announced by the grid, in order.
    pub size_changes: Vec<(i32, i32)>,
    pub preview: RecordingPreview,
    pub stats: ReplayStats,
}

/// Runs every event of `session` and returns the resulting grid.
pub fn run(session: &Session, config: &ReplayConfig) -> Result<ReplayOutcome> {
    if !(config.tick_rate > 0.0) {
        return Err(anyhow!("tick rate must be positive, got {}", config.tick_rate));
    }
    let tick = 1.0 / config.tick_rate;

    let (width, height) = config.initial_size.unwrap_or((session.width, session.height));
    let clock = ManualClock::new();
    let sink = MemorySink::new();
    let mut grid = GridStore::with_log(width, height, ActionLog::new(clock.clone(), sink.clone()))
        .with_context(|| "Creating grid")?;

    let size_changes = Rc::new(RefCell::new(Vec::new()));
    let recorder = size_changes.clone();
    grid.on_size_changed(move |w, h| recorder.borrow_mut().push((w, h)));

    let first = session
        .sprites
        .first()
        .cloned()
        .ok_or_else(|| anyhow!("session has no sprites"))?;
    let mut controller = PlacementController::new(first, RecordingPreview::default());

    let mut stats = ReplayStats::default();
    for (i, event) in session.events.iter().enumerate() {
        match event {
            SessionEvent::Select(name) => {
                let sprite = session
                    .sprite(name)
                    .ok_or_else(|| anyhow!("event {} selects unknown sprite `{}`", i, name))?;
                controller.select_sprite(sprite.clone());
            }
            SessionEvent::Frame(input) => {
                clock.set(stats.frames as f64 * tick);
                stats.frames += 1;
                if controller.is_locked() {
                    stats.locked_frames += 1;
                }

                let frame = PointerFrame::from(*input);
                let report = controller.tick(&mut grid, &frame);
                stats.placed += report.placed.len();
                stats.removed += report.removed.len();
            }
            SessionEvent::Resize {
                width,
                height,
                keep_objects,
            } => {
                grid.resize(*width, *height, *keep_objects)
                    .with_context(|| format!("Applying resize event {}", i))?;
            }
            SessionEvent::Clear => grid.clear(),
            SessionEvent::Lock(holder) => controller.lock(holder),
            SessionEvent::Unlock(holder) => {
                if !controller.unlock(holder) {
                    log::warn!("event {}: `{}` unlocked without holding a lock", i, holder);
                }
            }
            SessionEvent::Focus(has_focus) => controller.focus_changed(*has_focus),
        }
    }

    log::info!(
        "replayed {} frames: {} placed, {} removed, {} objects remain",
        stats.frames,
        stats.placed,
        stats.removed,
        grid.objects().len()
    );

    let size_changes = size_changes.borrow().clone();
    Ok(ReplayOutcome {
        grid,
        actions: sink.lines(),
        size_changes,
        preview: controller.preview().clone(),
        stats,
    })
}
