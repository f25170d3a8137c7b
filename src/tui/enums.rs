//! Enumerations for TUI event routing.

use crossterm::event::KeyEvent;

use crate::error::BacklogError;
use crate::work_item::WorkItem;

/// Everything the event loop can receive from its channel.
///
/// Producers: the terminal reader thread (keys, resizes), the blink ticker,
/// and one worker thread per backend fetch.
#[derive(Debug)]
pub enum AppEvent {
    /// A key press, already filtered to press events.
    Key(KeyEvent),
    /// The terminal was resized.
    Resize { width: u16, height: u16 },
    /// Cursor blink tick.
    Tick,
    /// A backend fetch finished. `generation` identifies the request.
    Fetched {
        generation: u64,
        result: Result<Vec<WorkItem>, BacklogError>,
    },
}

/// Follow-up action a field asks the shell to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCmd {
    /// Start the cursor blink ticker.
    Blink,
}

/// Layout of a single-choice selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}
