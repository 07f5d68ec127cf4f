use std::rc::Rc;

use log::LevelFilter;
use yew_iso_editor::components::{App, AppProps};
use yew_iso_editor::state::EditorState;
use yew_iso_editor::util::{init_logging, install_panic_hook};
use yew_iso_editor::{EditorConfig, Result};

const CONFIG: &str = include_str!("../config.json");

fn load_config() -> EditorConfig {
    match EditorConfig::parse(CONFIG) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("config.json unreadable, using defaults: {err}");
            EditorConfig::default()
        }
    }
}

fn startup() -> Result<AppProps> {
    let config = load_config();
    config.validate()?;
    init_logging(config.max_log_level());
    let layout = config.layout()?;
    let [w, h] = config.grid_size;
    let initial = EditorState::new(w, h, config.blocks.clone())?;
    log::info!(
        "world {}x{} for a {w}x{h} grid",
        layout.world_width(),
        layout.world_height()
    );
    Ok(AppProps {
        config: Rc::new(config),
        layout: Rc::new(layout),
        initial: Rc::new(initial),
    })
}

fn main() {
    install_panic_hook();
    init_logging(LevelFilter::Info);
    match startup() {
        Ok(props) => {
            yew::Renderer::<App>::with_props(props).render();
        }
        Err(err) => log::error!("editor not started: {err}"),
    }
}
