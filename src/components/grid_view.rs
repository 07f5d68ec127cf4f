use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, KeyboardEvent, MouseEvent, TouchEvent, WheelEvent,
};
use yew::prelude::*;

use super::bindings::Bindings;
use super::camera_controls::CameraControls;
use crate::config::EditorConfig;
use crate::geometry::WorldLayout;
use crate::render::{DEFAULT_HIGHLIGHT, DrawCommand, Rgb, Tint, frame_commands};
use crate::state::{Camera, EditorAction, EditorState, TouchState};

const PAN_STEP: f64 = 64.0;
const ZOOM_STEP: f64 = 1.25;

#[derive(Properties, PartialEq, Clone)]
pub struct GridViewProps {
    pub state: UseReducerHandle<EditorState>,
    pub config: Rc<EditorConfig>,
    pub layout: Rc<WorldLayout>,
}

/// Loaded sprite images keyed by block url, plus their highlighted copies.
struct SpriteCache {
    tint: Rgb,
    images: HashMap<String, HtmlImageElement>,
    tinted: HashMap<String, HtmlCanvasElement>,
}

impl SpriteCache {
    fn new(tint: Rgb) -> Self {
        Self {
            tint,
            images: HashMap::new(),
            tinted: HashMap::new(),
        }
    }

    /// The image for `url` once it has finished loading.
    fn get(&mut self, url: &str) -> Option<&HtmlImageElement> {
        if !self.images.contains_key(url) {
            let img = HtmlImageElement::new().ok()?;
            img.set_src(url);
            self.images.insert(url.to_string(), img);
        }
        self.images
            .get(url)
            .filter(|img| img.complete() && img.natural_width() > 0)
    }

    /// The sprite for `url` with the highlight tint multiplied in.
    fn tinted(&mut self, url: &str) -> Option<&HtmlCanvasElement> {
        if !self.tinted.contains_key(url) {
            let img = self.get(url)?.clone();
            let canvas = tint_sprite(&img, self.tint)?;
            self.tinted.insert(url.to_string(), canvas);
        }
        self.tinted.get(url)
    }
}

/// Offscreen copy of `img` multiplied by `tint`, alpha preserved.
fn tint_sprite(img: &HtmlImageElement, tint: Rgb) -> Option<HtmlCanvasElement> {
    let canvas = web_sys::window()?
        .document()?
        .create_element("canvas")
        .ok()?
        .dyn_into::<HtmlCanvasElement>()
        .ok()?;
    let (w, h) = (img.natural_width(), img.natural_height());
    canvas.set_width(w);
    canvas.set_height(h);
    let ctx = canvas
        .get_context("2d")
        .ok()??
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()?;
    ctx.draw_image_with_html_image_element(img, 0.0, 0.0).ok()?;
    ctx.set_global_composite_operation("multiply").ok()?;
    ctx.set_fill_style_str(&tint.to_string());
    ctx.fill_rect(0.0, 0.0, w as f64, h as f64);
    ctx.set_global_composite_operation("destination-in").ok()?;
    ctx.draw_image_with_html_image_element(img, 0.0, 0.0).ok()?;
    Some(canvas)
}

fn now_ms() -> f64 {
    js_sys::Date::now()
}

fn draw(
    ctx: &CanvasRenderingContext2d,
    cam: &Camera,
    commands: &[DrawCommand],
    sprites: &mut SpriteCache,
) {
    let opts = cam.options();
    ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).ok();
    ctx.set_fill_style_str("#ffffff");
    ctx.fill_rect(0.0, 0.0, opts.screen_width, opts.screen_height);
    let (ox, oy) = cam.offset();
    let zoom = cam.zoom();
    ctx.set_transform(zoom, 0.0, 0.0, zoom, ox, oy).ok();
    for cmd in commands {
        match cmd {
            DrawCommand::Sprite { url, x, y, tint } => match tint {
                Tint::Default => {
                    if let Some(img) = sprites.get(url) {
                        ctx.draw_image_with_html_image_element(img, *x, *y).ok();
                    }
                }
                Tint::Highlighted => {
                    if let Some(copy) = sprites.tinted(url) {
                        ctx.draw_image_with_html_canvas_element(copy, *x, *y).ok();
                    }
                }
            },
            DrawCommand::HitboxOutline { points } => {
                let Some((&(x0, y0), rest)) = points.split_first() else {
                    continue;
                };
                ctx.begin_path();
                ctx.move_to(x0, y0);
                for &(x, y) in rest {
                    ctx.line_to(x, y);
                }
                ctx.close_path();
                ctx.set_stroke_style_str("#ff0000");
                ctx.set_line_width((1.0 / zoom).max(0.001));
                ctx.stroke();
            }
        }
    }
}

/// Dispatches hover changes for the tile under canvas point `(sx, sy)`.
fn update_hover(state: &UseReducerHandle<EditorState>, layout: &WorldLayout, cam: &Camera, sx: f64, sy: f64) {
    let (wx, wy) = cam.screen_to_world(sx, sy);
    let under = layout.pick(&state.grid, wx, wy);
    if under == state.hovered {
        return;
    }
    if let Some(prev) = state.hovered {
        state.dispatch(EditorAction::HoverLeave(prev));
    }
    if let Some(tile) = under {
        state.dispatch(EditorAction::HoverEnter(tile));
    }
}

/// Selects the tile under canvas point `(sx, sy)`, if any.
fn press(
    state: &UseReducerHandle<EditorState>,
    layout: &WorldLayout,
    cam: &Camera,
    (sx, sy): (f64, f64),
    (client_x, client_y): (f64, f64),
) {
    let (wx, wy) = cam.screen_to_world(sx, sy);
    if let Some(tile) = layout.pick(&state.grid, wx, wy) {
        state.dispatch(EditorAction::Select {
            tile,
            client_x,
            client_y,
        });
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum KeyCommand {
    Pan(f64, f64),
    Zoom(f64),
    Dismiss,
}

fn key_command(key: &str) -> Option<KeyCommand> {
    Some(match key {
        "ArrowLeft" => KeyCommand::Pan(PAN_STEP, 0.0),
        "ArrowRight" => KeyCommand::Pan(-PAN_STEP, 0.0),
        "ArrowUp" => KeyCommand::Pan(0.0, PAN_STEP),
        "ArrowDown" => KeyCommand::Pan(0.0, -PAN_STEP),
        "+" | "=" => KeyCommand::Zoom(ZOOM_STEP),
        "-" | "_" => KeyCommand::Zoom(1.0 / ZOOM_STEP),
        "Escape" => KeyCommand::Dismiss,
        _ => return None,
    })
}

fn touch_point(e: &TouchEvent, i: u32, canvas: &HtmlCanvasElement) -> Option<((f64, f64), (f64, f64))> {
    let t = e.touches().item(i)?;
    let rect = canvas.get_bounding_client_rect();
    let (cx, cy) = (t.client_x() as f64, t.client_y() as f64);
    Some(((cx - rect.left(), cy - rect.top()), (cx, cy)))
}

#[function_component(GridView)]
pub fn grid_view(props: &GridViewProps) -> Html {
    let canvas_ref = use_node_ref();
    let camera = {
        let options = props.config.viewport_options(&props.layout);
        use_mut_ref(move || Camera::new(options))
    };
    let state_ref = use_mut_ref(|| props.state.clone());
    let touch_state = use_mut_ref(TouchState::default);

    // Listeners read the latest store handle through `state_ref`.
    {
        let state_ref = state_ref.clone();
        let handle = props.state.clone();
        use_effect_with(props.state.version, move |_| {
            *state_ref.borrow_mut() = handle;
            || ()
        });
    }

    {
        let canvas_ref = canvas_ref.clone();
        let camera = camera.clone();
        let state_ref = state_ref.clone();
        let touch_state = touch_state.clone();
        let layout = props.layout.clone();
        let config = props.config.clone();

        use_effect_with((), move |_| {
            let mut bindings = Bindings::new();
            let raf_id = Rc::new(RefCell::new(None::<i32>));
            let frame_cell: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
            let window = web_sys::window();
            let canvas = canvas_ref.cast::<HtmlCanvasElement>();
            let ctx = canvas
                .as_ref()
                .and_then(|c| c.get_context("2d").ok().flatten())
                .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok());

            if let (Some(window), Some(canvas), Some(ctx)) = (window.clone(), canvas, ctx) {
                canvas.set_width(config.viewport[0]);
                canvas.set_height(config.viewport[1]);
                camera.borrow_mut().request_initial_center();

                let draw_frame: Rc<dyn Fn()> = {
                    let canvas = canvas.clone();
                    let camera = camera.clone();
                    let state_ref = state_ref.clone();
                    let layout = layout.clone();
                    let tint = config.highlight().unwrap_or_else(|err| {
                        log::warn!("{err}; using the default highlight");
                        DEFAULT_HIGHLIGHT
                    });
                    let sprites = Rc::new(RefCell::new(SpriteCache::new(tint)));
                    let debug = config.debug;
                    Rc::new(move || {
                        if !canvas.is_connected() {
                            return;
                        }
                        let handle = state_ref.borrow().clone();
                        let commands = frame_commands(&handle, &layout, debug);
                        draw(&ctx, &camera.borrow(), &commands, &mut sprites.borrow_mut());
                    })
                };
                draw_frame();

                // Center once the first frame is on screen.
                {
                    let camera = camera.clone();
                    let center = Closure::once_into_js(move || {
                        camera.borrow_mut().run_deferred();
                    });
                    if window
                        .set_timeout_with_callback_and_timeout_and_arguments_0(center.unchecked_ref(), 0)
                        .is_err()
                    {
                        log::warn!("could not schedule initial centering");
                    }
                }

                // Frame loop: glide and redraw.
                {
                    let camera = camera.clone();
                    let raf_id_loop = raf_id.clone();
                    let window_loop = window.clone();
                    let draw_frame = draw_frame.clone();
                    let last_ts = Rc::new(RefCell::new(None::<f64>));
                    let cell_loop = frame_cell.clone();
                    *frame_cell.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
                        if camera.borrow().is_destroyed() {
                            return;
                        }
                        let elapsed = last_ts.borrow().map_or(0.0, |prev| ts - prev);
                        *last_ts.borrow_mut() = Some(ts);
                        camera.borrow_mut().tick(elapsed);
                        draw_frame();
                        if let Some(cb) = cell_loop.borrow().as_ref()
                            && let Ok(id) = window_loop.request_animation_frame(cb.as_ref().unchecked_ref())
                        {
                            *raf_id_loop.borrow_mut() = Some(id);
                        }
                    }) as Box<dyn FnMut(f64)>));
                    if let Some(cb) = frame_cell.borrow().as_ref()
                        && let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref())
                    {
                        *raf_id.borrow_mut() = Some(id);
                    }
                }

                // Page scroll must not eat zoom gestures.
                bindings.listen_active(&window, "wheel", |e: WheelEvent| e.prevent_default());

                {
                    let camera = camera.clone();
                    bindings.listen_active(&canvas, "wheel", move |e: WheelEvent| {
                        e.prevent_default();
                        camera.borrow_mut().wheel(
                            e.delta_y(),
                            e.delta_mode(),
                            e.offset_x() as f64,
                            e.offset_y() as f64,
                        );
                    });
                }

                {
                    let camera = camera.clone();
                    let state_ref = state_ref.clone();
                    let layout = layout.clone();
                    bindings.listen(&canvas, "mousedown", move |e: MouseEvent| {
                        let screen = (e.offset_x() as f64, e.offset_y() as f64);
                        if e.button() == 0 {
                            let state = state_ref.borrow().clone();
                            press(
                                &state,
                                &layout,
                                &camera.borrow(),
                                screen,
                                (e.client_x() as f64, e.client_y() as f64),
                            );
                        }
                        camera.borrow_mut().begin_drag(screen.0, screen.1, now_ms());
                    });
                }

                {
                    let camera = camera.clone();
                    let state_ref = state_ref.clone();
                    let layout = layout.clone();
                    bindings.listen(&canvas, "mousemove", move |e: MouseEvent| {
                        let (sx, sy) = (e.offset_x() as f64, e.offset_y() as f64);
                        {
                            let mut cam = camera.borrow_mut();
                            if cam.is_panning() {
                                cam.drag_to(sx, sy, now_ms());
                                return;
                            }
                        }
                        let state = state_ref.borrow().clone();
                        update_hover(&state, &layout, &camera.borrow(), sx, sy);
                    });
                }

                {
                    let camera = camera.clone();
                    bindings.listen(&window, "mouseup", move |_: MouseEvent| {
                        camera.borrow_mut().end_drag(now_ms());
                    });
                }

                {
                    let state_ref = state_ref.clone();
                    bindings.listen(&canvas, "mouseleave", move |_: MouseEvent| {
                        let state = state_ref.borrow().clone();
                        if let Some(prev) = state.hovered {
                            state.dispatch(EditorAction::HoverLeave(prev));
                        }
                    });
                }

                bindings.listen(&canvas, "contextmenu", |e: web_sys::Event| e.prevent_default());

                {
                    let camera = camera.clone();
                    let state_ref = state_ref.clone();
                    bindings.listen(&window, "keydown", move |e: KeyboardEvent| {
                        let Some(cmd) = key_command(&e.key()) else {
                            return;
                        };
                        e.prevent_default();
                        match cmd {
                            KeyCommand::Pan(dx, dy) => camera.borrow_mut().pan_by(dx, dy),
                            KeyCommand::Zoom(factor) => camera.borrow_mut().zoom_by(factor),
                            KeyCommand::Dismiss => state_ref.borrow().dispatch(EditorAction::Dismiss),
                        }
                    });
                }

                {
                    let camera = camera.clone();
                    let state_ref = state_ref.clone();
                    let touch_state = touch_state.clone();
                    let layout = layout.clone();
                    let canvas_tc = canvas.clone();
                    bindings.listen_active(&canvas, "touchstart", move |e: TouchEvent| {
                        e.prevent_default();
                        let mut cam = camera.borrow_mut();
                        let mut ts = touch_state.borrow_mut();
                        match e.touches().length() {
                            0 => {}
                            1 => {
                                if let Some((screen, client)) = touch_point(&e, 0, &canvas_tc) {
                                    let state = state_ref.borrow().clone();
                                    press(&state, &layout, &cam, screen, client);
                                    ts.single_active = true;
                                    cam.begin_drag(screen.0, screen.1, now_ms());
                                }
                            }
                            _ => {
                                if let (Some((a, _)), Some((b, _))) =
                                    (touch_point(&e, 0, &canvas_tc), touch_point(&e, 1, &canvas_tc))
                                {
                                    cam.end_drag(now_ms());
                                    ts.start_pinch(&cam, a, b);
                                }
                            }
                        }
                    });
                }

                {
                    let camera = camera.clone();
                    let touch_state = touch_state.clone();
                    let canvas_tc = canvas.clone();
                    bindings.listen_active(&canvas, "touchmove", move |e: TouchEvent| {
                        e.prevent_default();
                        let mut cam = camera.borrow_mut();
                        let ts = touch_state.borrow();
                        if e.touches().length() >= 2 {
                            if let (Some((a, _)), Some((b, _))) =
                                (touch_point(&e, 0, &canvas_tc), touch_point(&e, 1, &canvas_tc))
                            {
                                ts.update_pinch(&mut cam, a, b);
                            }
                        } else if ts.single_active {
                            if let Some(((sx, sy), _)) = touch_point(&e, 0, &canvas_tc) {
                                cam.drag_to(sx, sy, now_ms());
                            }
                        }
                    });
                }

                {
                    let camera = camera.clone();
                    let touch_state = touch_state.clone();
                    let canvas_tc = canvas.clone();
                    let on_touch_end = move |e: TouchEvent| {
                        e.prevent_default();
                        let remaining = e.touches().length();
                        let mut cam = camera.borrow_mut();
                        touch_state.borrow_mut().end(remaining);
                        match remaining {
                            0 => cam.end_drag(now_ms()),
                            1 => {
                                if let Some(((sx, sy), _)) = touch_point(&e, 0, &canvas_tc) {
                                    cam.begin_drag(sx, sy, now_ms());
                                }
                            }
                            _ => {}
                        }
                    };
                    bindings.listen_active(&canvas, "touchend", on_touch_end.clone());
                    bindings.listen_active(&canvas, "touchcancel", on_touch_end);
                }
            } else {
                log::error!("canvas 2d context unavailable; editor disabled");
            }

            move || {
                bindings.release();
                if let (Some(window), Some(id)) = (window, raf_id.borrow_mut().take()) {
                    let _ = window.cancel_animation_frame(id);
                }
                // The frame closure holds a handle to its own cell.
                frame_cell.borrow_mut().take();
                camera.borrow_mut().destroy();
            }
        });
    }

    let zoom_by = |factor: f64| {
        let camera = camera.clone();
        Callback::from(move |_: ()| camera.borrow_mut().zoom_by(factor))
    };
    let pan_by = |dx: f64, dy: f64| {
        let camera = camera.clone();
        Callback::from(move |_: ()| camera.borrow_mut().pan_by(dx, dy))
    };
    let center = {
        let camera = camera.clone();
        let (wx, wy) = props.layout.center();
        Callback::from(move |_: ()| camera.borrow_mut().move_center(wx, wy))
    };
    let regenerate = {
        let state = props.state.clone();
        Callback::from(move |_: ()| state.dispatch(EditorAction::Regenerate))
    };

    html! {
        <div style="position:relative; display:inline-block;">
            <canvas
                ref={canvas_ref}
                id="iso-canvas"
                style={format!("display:block; width:{}px; height:{}px; touch-action:none;", props.config.viewport[0], props.config.viewport[1])}
            ></canvas>
            <CameraControls
                on_zoom_in={zoom_by(ZOOM_STEP)}
                on_zoom_out={zoom_by(1.0 / ZOOM_STEP)}
                on_pan_left={pan_by(PAN_STEP, 0.0)}
                on_pan_right={pan_by(-PAN_STEP, 0.0)}
                on_pan_up={pan_by(0.0, PAN_STEP)}
                on_pan_down={pan_by(0.0, -PAN_STEP)}
                on_center={center}
                on_regenerate={regenerate}
            />
        </div>
    }
}
