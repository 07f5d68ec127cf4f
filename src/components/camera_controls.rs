use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct CameraControlsProps {
    pub on_zoom_in: Callback<()>,
    pub on_zoom_out: Callback<()>,
    pub on_pan_left: Callback<()>,
    pub on_pan_right: Callback<()>,
    pub on_pan_up: Callback<()>,
    pub on_pan_down: Callback<()>,
    pub on_center: Callback<()>,
    pub on_regenerate: Callback<()>,
}

fn button(label: &'static str, title: &'static str, cb: &Callback<()>) -> Html {
    let onclick = cb.reform(|_: MouseEvent| ());
    html! { <button {title} {onclick}>{ label }</button> }
}

/// Overlay buttons for viewport navigation and grid reset.
#[function_component(CameraControls)]
pub fn camera_controls(props: &CameraControlsProps) -> Html {
    html! {<div style="position:absolute; left:12px; bottom:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px; display:flex; gap:6px; align-items:center;">
        { button("-", "Zoom out", &props.on_zoom_out) }
        { button("+", "Zoom in", &props.on_zoom_in) }
        <span style="width:8px;"></span>
        { button("←", "Pan left", &props.on_pan_left) }
        { button("↑", "Pan up", &props.on_pan_up) }
        { button("↓", "Pan down", &props.on_pan_down) }
        { button("→", "Pan right", &props.on_pan_right) }
        <span style="width:8px;"></span>
        { button("Center", "Center the grid", &props.on_center) }
        { button("Regenerate", "Reset every tile to the default block", &props.on_regenerate) }
    </div>}
}
