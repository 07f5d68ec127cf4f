use std::rc::Rc;
use yew::prelude::*;

use crate::model::Block;
use crate::state::MenuAnchor;

#[derive(Properties, PartialEq, Clone)]
pub struct BlockMenuProps {
    pub blocks: Rc<[Rc<Block>]>,
    pub anchor: MenuAnchor,
    pub on_select: Callback<Rc<Block>>,
    pub on_dismiss: Callback<()>,
}

/// Floating block picker shown next to the pointer that selected a tile.
#[function_component(BlockMenu)]
pub fn block_menu(props: &BlockMenuProps) -> Html {
    let style = format!(
        "position:fixed; left:{}px; top:{}px; z-index:10; max-width:320px; background:rgba(22,27,34,0.95); border:1px solid #30363d; border-radius:8px; padding:8px; display:flex; flex-wrap:wrap; gap:4px;",
        props.anchor.x, props.anchor.y
    );
    let close = props.on_dismiss.reform(|_: MouseEvent| ());
    html! {
        <div {style}>
            { for props.blocks.iter().map(|block| {
                let onclick = {
                    let block = block.clone();
                    props.on_select.reform(move |_: MouseEvent| block.clone())
                };
                html! {
                    <button key={block.url.clone()} title={block.url.clone()} {onclick}
                        style="padding:2px; background:transparent; border:1px solid #30363d; border-radius:4px;">
                        <img src={block.url.clone()} width="40" alt={block.url.clone()} />
                    </button>
                }
            }) }
            <button title="Close" onclick={close} style="align-self:flex-start;">{ "✕" }</button>
        </div>
    }
}
