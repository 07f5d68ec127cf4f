use std::rc::Rc;
use yew::prelude::*;

use super::{block_menu::BlockMenu, grid_view::GridView};
use crate::config::EditorConfig;
use crate::geometry::WorldLayout;
use crate::model::Block;
use crate::state::{EditorAction, EditorState};

#[derive(Properties, PartialEq, Clone)]
pub struct AppProps {
    pub config: Rc<EditorConfig>,
    pub layout: Rc<WorldLayout>,
    /// Validated startup state; the store starts from a copy of it.
    pub initial: Rc<EditorState>,
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let state = {
        let initial = props.initial.clone();
        use_reducer(move || (*initial).clone())
    };

    let on_select = {
        let state = state.clone();
        Callback::from(move |block: Rc<Block>| state.dispatch(EditorAction::Commit(block)))
    };
    let on_dismiss = {
        let state = state.clone();
        Callback::from(move |_: ()| state.dispatch(EditorAction::Dismiss))
    };

    // Only an editing selection that still resolves to a tile opens the menu.
    let menu = match (state.selection.anchor(), state.selected()) {
        (Some(anchor), Some(_)) => html! {
            <BlockMenu blocks={state.catalog.clone()} {anchor} {on_select} {on_dismiss} />
        },
        _ => html! {},
    };

    html! {
        <div style="font-family:sans-serif;">
            <GridView state={state.clone()} config={props.config.clone()} layout={props.layout.clone()} />
            { menu }
        </div>
    }
}
