use std::rc::Rc;

use pretty_assertions::assert_eq;
use yew::Reducible;
use yew_iso_editor::geometry::{TileMetrics, WorldLayout, project};
use yew_iso_editor::model::{Block, TileCoord, generate_grid};
use yew_iso_editor::state::{EditorAction, EditorState, Selection, SelectionController};
use yew_iso_editor::{EditorConfig, EditorError};

fn catalog() -> Vec<Block> {
    vec![Block::new("A", 0.0, 0.0), Block::new("B", -37.0, 17.0)]
}

#[test]
fn three_by_three_select_and_commit() {
    let state = Rc::new(EditorState::new(3, 3, catalog()).unwrap());
    assert_eq!(state.grid.len(), 9);
    assert_eq!(project(1, 1, 93.0, 112.0), (0.0, 112.0));

    let state = state.reduce(EditorAction::Select {
        tile: TileCoord::new(1, 1),
        client_x: 300.0,
        client_y: 200.0,
    });
    let b = state.catalog[1].clone();
    let state = state.reduce(EditorAction::Commit(b));

    assert_eq!(state.selection.state(), &Selection::Idle);
    let urls: Vec<&str> = state.grid.tiles().iter().map(|t| t.block.url.as_str()).collect();
    assert_eq!(urls, vec!["A", "A", "A", "A", "B", "A", "A", "A", "A"]);
}

#[test]
fn set_block_leaves_the_source_grid_alone() {
    let a = Rc::new(Block::new("A", 0.0, 0.0));
    let b = Rc::new(Block::new("B", -37.0, 17.0));
    let grid = generate_grid(4, 2, a).unwrap();
    let edited = grid.set_block(3, 1, b.clone()).unwrap();

    assert!(grid.tiles().iter().all(|t| t.block.url == "A"));
    assert_eq!(edited.len(), grid.len());
    for (before, after) in grid.tiles().iter().zip(edited.tiles()) {
        assert_eq!(before.coord(), after.coord());
        if after.coord() == TileCoord::new(3, 1) {
            assert!(Rc::ptr_eq(&after.block, &b));
        } else {
            assert!(Rc::ptr_eq(&before.block, &after.block));
        }
    }
}

#[test]
fn set_block_outside_grid_is_out_of_range() {
    let grid = generate_grid(2, 2, Rc::new(Block::new("A", 0.0, 0.0))).unwrap();
    let err = grid.set_block(2, 0, Rc::new(Block::new("B", 0.0, 0.0))).unwrap_err();
    assert_eq!(
        err,
        EditorError::OutOfRange {
            x: 2,
            y: 0,
            width: 2,
            height: 2
        }
    );
}

#[test]
fn zero_sized_grid_is_rejected() {
    let err = generate_grid(0, 5, Rc::new(Block::new("A", 0.0, 0.0))).unwrap_err();
    assert!(matches!(err, EditorError::Configuration { .. }));
}

#[test]
fn commit_after_dismiss_changes_nothing() {
    let grid = generate_grid(3, 3, Rc::new(Block::new("A", 0.0, 0.0))).unwrap();
    let mut sel = SelectionController::new();
    sel.select(TileCoord::new(0, 0), 0.0, 0.0);
    assert!(sel.dismiss());
    assert_eq!(
        sel.commit(&grid, Rc::new(Block::new("B", 0.0, 0.0))).unwrap_err(),
        EditorError::NoSelection
    );
    assert!(grid.tiles().iter().all(|t| t.block.url == "A"));
}

#[test]
fn reselecting_moves_the_edit_target() {
    let state = Rc::new(EditorState::new(3, 3, catalog()).unwrap())
        .reduce(EditorAction::Select {
            tile: TileCoord::new(0, 0),
            client_x: 0.0,
            client_y: 0.0,
        })
        .reduce(EditorAction::Select {
            tile: TileCoord::new(2, 1),
            client_x: 50.0,
            client_y: 60.0,
        });
    let b = state.catalog[1].clone();
    let state = state.reduce(EditorAction::Commit(b));
    assert_eq!(state.grid.get(TileCoord::new(0, 0)).unwrap().block.url, "A");
    assert_eq!(state.grid.get(TileCoord::new(2, 1)).unwrap().block.url, "B");
}

#[test]
fn picking_after_an_edit_uses_the_new_block_offsets() {
    let config = EditorConfig {
        grid_size: [1, 1],
        blocks: catalog(),
        ..EditorConfig::default()
    };
    let layout = config.layout().unwrap();
    let state = Rc::new(EditorState::new(1, 1, config.blocks.clone()).unwrap());
    let tile = state.grid.get(TileCoord::new(0, 0)).unwrap();
    let (hx, hy) = layout.hitbox_position(tile);
    // Just below the top vertex of the plain block's hitbox.
    let probe = (hx + 46.5, hy + 5.0);
    assert_eq!(layout.pick(&state.grid, probe.0, probe.1), Some(TileCoord::new(0, 0)));

    let state = state
        .reduce(EditorAction::Select {
            tile: TileCoord::new(0, 0),
            client_x: 0.0,
            client_y: 0.0,
        })
        .reduce(EditorAction::Commit(Rc::new(Block::new("C", 0.0, 40.0))));
    // The hitbox moved 40px down, so the old probe now misses.
    assert_eq!(layout.pick(&state.grid, probe.0, probe.1), None);
}

#[test]
fn layout_matches_world_formula() {
    let layout = WorldLayout::new(
        generate_grid(20, 20, Rc::new(Block::new("A", 0.0, 0.0))).unwrap().size(),
        TileMetrics::new(93.0, 112.0).unwrap(),
    );
    assert_eq!(layout.world_width(), 20.0 * 93.0);
    assert_eq!(layout.world_height(), 20.0 * 56.0 + 112.0);
}
