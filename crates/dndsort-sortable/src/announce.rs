#![forbid(unsafe_code)]

//! Screen reader announcements for drag lifecycle events.
//!
//! Messages are buffered by the container and drained by the host into a
//! polite live region. Positions are 1-based.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Instructions for the element that describes a sortable item.
pub const SCREEN_READER_INSTRUCTIONS: &str = "To pick up a sortable item, press space or enter. \
While dragging, use the arrow keys to move the item. \
Press space or enter again to drop the item in its new position, or press escape to cancel.";

/// Live region politeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Politeness {
    Polite,
    Assertive,
}

/// One message for the live region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub message: String,
    pub politeness: Politeness,
}

impl Announcement {
    #[must_use]
    pub fn polite(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            politeness: Politeness::Polite,
        }
    }
}

pub fn drag_start(id: &impl Display, index: usize, total: usize) -> Announcement {
    Announcement::polite(format!(
        "Picked up sortable item {id}. Sortable item {id} is in position {} of {total}.",
        index + 1
    ))
}

pub fn drag_over(id: &impl Display, over_index: Option<usize>, total: usize) -> Announcement {
    match over_index {
        Some(index) => Announcement::polite(format!(
            "Sortable item {id} was moved into position {} of {total}.",
            index + 1
        )),
        None => Announcement::polite(format!(
            "Sortable item {id} is no longer over a droppable area."
        )),
    }
}

pub fn drag_end(id: &impl Display, index: Option<usize>, total: usize) -> Announcement {
    match index {
        Some(index) => Announcement::polite(format!(
            "Sortable item {id} was dropped at position {} of {total}.",
            index + 1
        )),
        None => Announcement::polite(format!("Sortable item {id} was dropped.")),
    }
}

pub fn drag_cancel(id: &impl Display) -> Announcement {
    Announcement::polite(format!(
        "Sorting was cancelled. Sortable item {id} was dropped."
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_one_based() {
        assert_eq!(
            drag_start(&5, 4, 8).message,
            "Picked up sortable item 5. Sortable item 5 is in position 5 of 8."
        );
        assert_eq!(
            drag_over(&5, Some(1), 8).message,
            "Sortable item 5 was moved into position 2 of 8."
        );
        assert_eq!(
            drag_end(&5, Some(1), 8).message,
            "Sortable item 5 was dropped at position 2 of 8."
        );
    }

    #[test]
    fn no_target_messages() {
        assert_eq!(
            drag_over(&"x", None, 3).message,
            "Sortable item x is no longer over a droppable area."
        );
        assert_eq!(drag_end(&"x", None, 3).message, "Sortable item x was dropped.");
        assert_eq!(
            drag_cancel(&"x").message,
            "Sorting was cancelled. Sortable item x was dropped."
        );
        assert_eq!(drag_cancel(&"x").politeness, Politeness::Polite);
    }
}
