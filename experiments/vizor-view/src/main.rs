mod display;

use display::{draw_probability_bars, frame_to_argb, window_title};
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use std::env;
use std::path::PathBuf;
use vizor_base::{log, log_fatal};
use vizor_camera::{print_devices, Camera, CameraConfig, CameraError, StillCamera, V4l2Camera};
use vizor_image::Frame;
use vizor_infer::{
    Device, FramePipeline, InferError, ModelCatalog, ModelSelector, OnnxBackend, PipelineConfig,
};

const WIDTH: usize = 640;
const HEIGHT: usize = 480;

const NUMBER_KEYS: [Key; 10] = [
    Key::Key0,
    Key::Key1,
    Key::Key2,
    Key::Key3,
    Key::Key4,
    Key::Key5,
    Key::Key6,
    Key::Key7,
    Key::Key8,
    Key::Key9,
];

/// Where frames come from this run.
enum Source {
    Device(V4l2Camera),
    Still(StillCamera),
}

impl Source {
    async fn try_recv(&mut self) -> Result<Option<Frame>, CameraError> {
        match self {
            Source::Device(camera) => camera.try_recv().await,
            Source::Still(camera) => camera.try_recv().await,
        }
    }
}

fn init_logging() {
    match env::var("VIZOR_LOG_DIR") {
        Ok(dir) => {
            if let Err(e) = vizor_base::init_file_logger(&dir) {
                vizor_base::init_stdout_logger();
                log::warn!("Cannot log to {}: {}, using stdout", dir, e);
            }
        }
        Err(_) => vizor_base::init_stdout_logger(),
    }
}

fn load_catalog() -> Result<ModelCatalog, InferError> {
    match env::var("VIZOR_CATALOG") {
        Ok(path) => {
            log::info!("Catalog: {}", path);
            ModelCatalog::load(path)
        }
        Err(_) => {
            let dir: PathBuf = env::var("VIZOR_MODEL_DIR")
                .unwrap_or_else(|_| "models".to_string())
                .into();
            log::info!("Catalog: built-in, models in {}", dir.display());
            Ok(ModelCatalog::builtin(dir))
        }
    }
}

/// Open the capture device. A failure is logged and the app runs without
/// capture, unless `VIZOR_STILL` names an image to show instead.
fn open_source(config: &CameraConfig) -> Option<Source> {
    if let Ok(path) = env::var("VIZOR_STILL") {
        return match StillCamera::from_file(&path) {
            Ok(camera) => Some(Source::Still(camera.with_fps(config.fps))),
            Err(e) => {
                log::error!("Cannot load still image {}: {}", path, e);
                None
            }
        };
    }

    print_devices();
    match V4l2Camera::new(config.clone()) {
        Ok(camera) => {
            let (w, h) = camera.size();
            log::info!("Camera ready ({}x{})", w, h);
            Some(Source::Device(camera))
        }
        Err(e) => {
            log::error!("Camera init failed: {}, running without capture", e);
            None
        }
    }
}

/// Apply model picker and mirror keys. Returns true if the selection changed.
fn handle_keys(window: &Window, pipeline: &mut FramePipeline) -> bool {
    let before = pipeline.selector().selected();

    for key in window.get_keys_pressed(KeyRepeat::No) {
        let result = match key {
            Key::Right => pipeline.selector_mut().select_next(),
            Key::Left => pipeline.selector_mut().select_previous(),
            Key::M => {
                let config = pipeline.config_mut();
                config.mirror = !config.mirror;
                log::info!("Mirror: {}", config.mirror);
                Ok(())
            }
            key => match NUMBER_KEYS.iter().position(|&k| k == key) {
                Some(index) if index < pipeline.selector().catalog().len() => {
                    pipeline.selector_mut().select(index)
                }
                _ => Ok(()),
            },
        };
        // the previous model stays active
        if let Err(e) = result {
            log::error!("Model selection failed: {}", e);
        }
    }

    pipeline.selector().selected() != before
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let camera_config = match CameraConfig::default()
        .with_size(WIDTH as u32, HEIGHT as u32)
        .with_env()
    {
        Ok(config) => config,
        Err(e) => log_fatal!("Camera settings: {}", e),
    };
    let device: Device = match env::var("VIZOR_DEVICE") {
        Ok(v) => match v.parse() {
            Ok(device) => device,
            Err(e) => log_fatal!("VIZOR_DEVICE: {}", e),
        },
        Err(_) => Device::Cpu,
    };

    let catalog = match load_catalog() {
        Ok(catalog) => catalog,
        Err(e) => log_fatal!("Failed to load catalog: {}", e),
    };
    let initial = match env::args().nth(1) {
        Some(name) => match catalog.find(&name) {
            Some(index) => index,
            None => log_fatal!(
                "Unknown model '{}', available: {}",
                name,
                catalog.names().collect::<Vec<_>>().join(", ")
            ),
        },
        None => 0,
    };

    log::info!("vizor-view");
    log::info!("Device: {}", device);
    log::info!("Models: {}", catalog.names().collect::<Vec<_>>().join(", "));
    log::info!("Controls: 0-9 or Left/Right pick a model, M toggles mirror, ESC exits");

    let backend = OnnxBackend::new(device).with_hints(catalog.hints.clone());
    let selector = match ModelSelector::new(catalog, Box::new(backend), initial) {
        Ok(selector) => selector,
        Err(e) => log_fatal!("Failed to load initial model: {}", e),
    };
    let config = PipelineConfig::default().with_display_size(WIDTH, HEIGHT);
    let mut pipeline = FramePipeline::new(selector, config);

    let mut source = open_source(&camera_config);

    let mut window = Window::new(
        &window_title(&pipeline.selector().active().spec().name, None),
        WIDTH,
        HEIGHT,
        WindowOptions::default(),
    )?;
    window.set_target_fps(camera_config.fps as usize);

    let mut buffer = vec![0u32; WIDTH * HEIGHT];

    while window.is_open() && !window.is_key_down(Key::Escape) {
        if handle_keys(&window, &mut pipeline) {
            window.set_title(&window_title(&pipeline.selector().active().spec().name, None));
        }

        let frame = match source.as_mut() {
            Some(source) => match source.try_recv().await {
                Ok(frame) => frame,
                Err(e) => {
                    log::warn!("Capture failed: {}", e);
                    None
                }
            },
            None => None,
        };

        let Some(frame) = frame else {
            window.update_with_buffer(&buffer, WIDTH, HEIGHT)?;
            continue;
        };

        match pipeline.process(&frame) {
            Ok(output) => {
                buffer = frame_to_argb(output.frame());
                if let Some(classification) = output.classification() {
                    draw_probability_bars(&mut buffer, WIDTH, HEIGHT, classification);
                    window.set_title(&window_title(
                        &pipeline.selector().active().spec().name,
                        Some(classification),
                    ));
                }
            }
            // drop this frame, keep showing the last one
            Err(e) if e.is_retryable() => log::warn!("Inference failed: {}", e),
            Err(e) => log::error!("Frame dropped: {}", e),
        }

        window.update_with_buffer(&buffer, WIDTH, HEIGHT)?;
    }

    log::info!("Exiting...");
    Ok(())
}
