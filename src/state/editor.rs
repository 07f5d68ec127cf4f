//! Editor store: the grid snapshot, the selection and the hover highlight.
//!
//! Every transition goes through [`EditorAction`]; rejected transitions log a
//! warning and keep the previous state.

use std::rc::Rc;
use yew::Reducible;

use crate::error::{EditorError, Result};
use crate::model::{Block, Grid, TileCoord, generate_grid};
use crate::state::selection::{SelectOutcome, SelectionController};

#[derive(Clone, Debug, PartialEq)]
pub struct EditorState {
    pub grid: Grid,
    pub selection: SelectionController,
    pub hovered: Option<TileCoord>,
    pub catalog: Rc<[Rc<Block>]>,
    /// Bumped on every accepted transition; the canvas redraws on change.
    pub version: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum EditorAction {
    Select {
        tile: TileCoord,
        client_x: f64,
        client_y: f64,
    },
    Commit(Rc<Block>),
    Dismiss,
    HoverEnter(TileCoord),
    HoverLeave(TileCoord),
    /// Rebuilds the grid with the default block; drops selection and hover.
    Regenerate,
}

impl EditorState {
    /// The first catalog entry is the default block.
    pub fn new(width: u32, height: u32, blocks: Vec<Block>) -> Result<Self> {
        let catalog: Rc<[Rc<Block>]> = blocks.into_iter().map(Rc::new).collect();
        let default = catalog
            .first()
            .cloned()
            .ok_or_else(|| EditorError::Config("block catalog is empty".into()))?;
        Ok(Self {
            grid: generate_grid(width, height, default)?,
            selection: SelectionController::new(),
            hovered: None,
            catalog,
            version: 0,
        })
    }

    pub fn default_block(&self) -> Rc<Block> {
        self.catalog[0].clone()
    }

    pub fn selected(&self) -> Option<TileCoord> {
        self.selection.selected(&self.grid)
    }

    /// Selected or hovered tiles are drawn highlighted.
    pub fn is_highlighted(&self, coord: TileCoord) -> bool {
        self.selected() == Some(coord)
            || (self.hovered == Some(coord) && self.grid.contains(coord))
    }

    /// Applies `action`, returning `None` when nothing changed.
    pub fn apply(&self, action: EditorAction) -> Option<EditorState> {
        use EditorAction::*;
        let mut next = self.clone();
        match action {
            Select {
                tile,
                client_x,
                client_y,
            } => {
                if !self.grid.contains(tile) {
                    log::warn!("ignored selection of ({}, {}): off grid", tile.x, tile.y);
                    return None;
                }
                if next.selection.select(tile, client_x, client_y) == SelectOutcome::Unchanged {
                    return None;
                }
            }
            Commit(block) => {
                let url = block.url.clone();
                match next.selection.commit(&self.grid, block) {
                    Ok((grid, at)) => {
                        log::info!("tile ({}, {}) set to {url}", at.x, at.y);
                        next.grid = grid;
                    }
                    Err(err) => {
                        log::warn!("commit ignored: {err}");
                        return None;
                    }
                }
            }
            Dismiss => {
                if !next.selection.dismiss() {
                    return None;
                }
                log::debug!("edit menu dismissed");
            }
            HoverEnter(tile) => {
                if self.hovered == Some(tile) || !self.grid.contains(tile) {
                    return None;
                }
                next.hovered = Some(tile);
            }
            HoverLeave(tile) => {
                if self.hovered != Some(tile) {
                    return None;
                }
                next.hovered = None;
            }
            Regenerate => {
                let size = self.grid.size();
                match generate_grid(size.width, size.height, self.default_block()) {
                    Ok(grid) => next.grid = grid,
                    Err(err) => {
                        log::warn!("regenerate ignored: {err}");
                        return None;
                    }
                }
                next.hovered = None;
                next.selection.dismiss();
            }
        }
        next.selection.invalidate_stale(&next.grid);
        next.version = self.version + 1;
        Some(next)
    }
}

impl Reducible for EditorState {
    type Action = EditorAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match self.apply(action) {
            Some(next) => Rc::new(next),
            None => self,
        }
    }
}
