mod assets;
mod dom;
mod error;
mod events;
mod gpu;
mod runner;
mod storage;

use std::cell::RefCell;

use earth_engine::{AssetManifest, MessageBoard, Renderer, Scene, SphereGeometry, Viewport};
use wasm_bindgen::prelude::*;

pub use error::{AssetError, GpuError, WebError};
pub use runner::EarthRunner;

use dom::Elements;
use gpu::{GlobeRenderer, GpuContext};
use storage::LocalStore;

thread_local! {
    static RUNNER: RefCell<Option<EarthRunner>> = const { RefCell::new(None) };
}

/// Run `f` against the runner if the globe has booted. Returns `None` before
/// boot or on a re-entrant call.
pub(crate) fn with_runner<R>(f: impl FnOnce(&mut EarthRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| match cell.try_borrow_mut() {
        Ok(mut slot) => slot.as_mut().map(f),
        Err(_) => {
            log::warn!("runner busy, event dropped");
            None
        }
    })
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Boot the page: clock, message board, debug panel and the globe.
///
/// `manifest_json` optionally overrides texture paths and scene constants.
#[wasm_bindgen]
pub async fn earth_init(manifest_json: Option<String>) -> Result<(), JsValue> {
    boot(manifest_json.as_deref()).await.map_err(|err| {
        log::error!("earth: {err}");
        JsValue::from_str(&err.to_string())
    })
}

async fn boot(manifest_json: Option<&str>) -> Result<(), WebError> {
    let manifest = match manifest_json {
        Some(json) => AssetManifest::from_json(json)?,
        None => AssetManifest::default(),
    };

    let window = web_sys::window().ok_or(WebError::NoWindow)?;
    let document = window.document().ok_or(WebError::NoDocument)?;
    let elements = Elements::locate(&document)?;

    dom::clock::start(&window, elements.time.clone())?;

    // The globe still runs when storage is blocked; only the board is lost.
    match open_board(&window) {
        Ok(board) => dom::board::install(&document, &elements, board)?,
        Err(err) => log::error!("board: disabled: {err}"),
    }

    let (width, height, dpr) = events::window_size(&window);
    let viewport = Viewport::new(width, height, dpr);
    let (physical_width, physical_height) = viewport.physical_size();
    runner::size_canvas(&elements.canvas, width, height, physical_width, physical_height);

    let context = GpuContext::new(elements.canvas.clone(), physical_width, physical_height).await?;
    if context.size() != (physical_width, physical_height) {
        let (fitted_width, fitted_height) = context.size();
        runner::size_canvas(&elements.canvas, width, height, fitted_width, fitted_height);
    }
    let images = assets::load_textures(&manifest.textures).await;
    if images.is_degraded() {
        dom::show_degraded(&document, &images.failures)?;
    }

    let config = manifest.scene.clone();
    let geometry = SphereGeometry::new(config.earth_radius, config.sphere_segments, config.sphere_segments);
    let renderer = GlobeRenderer::new(context, &geometry, images, manifest.anisotropy);
    let backend = renderer.backend();
    let scene = Scene::new(config, viewport);

    dom::panel::build(&document, &scene)?;
    RUNNER.with(|cell| *cell.borrow_mut() = Some(EarthRunner::new(scene, renderer, elements.canvas.clone())));

    events::install(&window, &elements.canvas)?;
    events::start_animation_loop(&window)?;
    log::info!("earth: initialized ({backend})");
    Ok(())
}

fn open_board(window: &web_sys::Window) -> Result<MessageBoard<LocalStore>, WebError> {
    let store = LocalStore::open(window)?;
    Ok(MessageBoard::open(store)?)
}
