// Selection and edit-menu state machine.
use std::rc::Rc;

use crate::error::{EditorError, Result};
use crate::model::{Block, Grid, TileCoord};

/// Horizontal gap between the cursor and the edit menu.
pub const MENU_ANCHOR_OFFSET_X: f64 = 10.0;

/// Where the edit menu is placed, in client (page) pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MenuAnchor {
    pub x: f64,
    pub y: f64,
}

impl MenuAnchor {
    pub fn from_pointer(client_x: f64, client_y: f64) -> Self {
        Self {
            x: client_x + MENU_ANCHOR_OFFSET_X,
            y: client_y,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Selection {
    #[default]
    Idle,
    Editing { tile: TileCoord, anchor: MenuAnchor },
}

/// What a pointer-down on a tile did to the selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Idle -> Editing.
    Armed,
    /// Editing one tile -> Editing another; nothing was committed.
    Rearmed,
    /// Same tile again; only the menu anchor moved.
    Reanchored,
    /// Same tile, same pointer position.
    Unchanged,
}

/// Tracks which tile is armed for editing.
///
/// Holds coordinates only, never a tile, so a regenerated grid cannot leave
/// it pointing at storage that no longer exists.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionController {
    state: Selection,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &Selection {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, Selection::Editing { .. })
    }

    /// The armed tile, if it still exists in `grid`.
    pub fn selected(&self, grid: &Grid) -> Option<TileCoord> {
        match self.state {
            Selection::Editing { tile, .. } if grid.contains(tile) => Some(tile),
            _ => None,
        }
    }

    pub fn anchor(&self) -> Option<MenuAnchor> {
        match self.state {
            Selection::Editing { anchor, .. } => Some(anchor),
            Selection::Idle => None,
        }
    }

    pub fn select(&mut self, tile: TileCoord, client_x: f64, client_y: f64) -> SelectOutcome {
        let anchor = MenuAnchor::from_pointer(client_x, client_y);
        let outcome = match &self.state {
            Selection::Idle => SelectOutcome::Armed,
            Selection::Editing { tile: current, anchor: prev } if *current == tile => {
                if *prev == anchor {
                    return SelectOutcome::Unchanged;
                }
                SelectOutcome::Reanchored
            }
            Selection::Editing { .. } => SelectOutcome::Rearmed,
        };
        log::debug!("selection {:?} -> ({}, {})", outcome, tile.x, tile.y);
        self.state = Selection::Editing { tile, anchor };
        outcome
    }

    /// Closes the menu without a change. Returns whether anything was open.
    pub fn dismiss(&mut self) -> bool {
        let was_editing = self.is_editing();
        self.state = Selection::Idle;
        was_editing
    }

    /// Applies `block` to the armed tile and returns the new grid.
    ///
    /// On error the selection is left as it was.
    pub fn commit(&mut self, grid: &Grid, block: Rc<Block>) -> Result<(Grid, TileCoord)> {
        let Selection::Editing { tile, .. } = self.state else {
            return Err(EditorError::NoSelection);
        };
        let next = grid.set_block(tile.x, tile.y, block)?;
        self.state = Selection::Idle;
        Ok((next, tile))
    }

    /// Drops a selection whose tile is no longer part of `grid`.
    pub fn invalidate_stale(&mut self, grid: &Grid) -> bool {
        if self.is_editing() && self.selected(grid).is_none() {
            self.state = Selection::Idle;
            return true;
        }
        false
    }
}
