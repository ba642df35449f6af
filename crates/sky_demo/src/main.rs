//! Skyline parallax demo -- main loop and application entry point.
//!
//! Architecture: winit drives the event loop via `ApplicationHandler`. All
//! simulation runs inside `RedrawRequested` using a **fixed-timestep** model
//! (see `TimeState`):
//!
//!   1. `begin_frame()` -- measure wall-clock delta, feed accumulator
//!   2. `while should_step()` -- apply held-key scrolling in fixed-dt slices
//!   3. Write each layer's transform uniform from camera offset x layer speed
//!   4. One render pass: clear to sky blue, draw the shared unit quad once
//!      per layer in registry order (back-to-front)
//!
//! The backdrop definition (ordered image/speed pairs) lives in a JSON file
//! watched via mtime polling; edits reload at fixed-step boundaries, and `R`
//! forces a reload. Startup load failures are fatal, reload failures keep the
//! previous backdrop.

mod backdrop;

use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use backdrop::{load_backdrop_from_path, BackdropFile, BackdropWatcher};
use sky_core::input::{InputState, Key};
use sky_core::scroll::scroll_delta;
use sky_core::time::TimeState;
use sky_platform::window::PlatformConfig;
use sky_render::{
    create_unit_quad, GpuContext, LayerPipeline, ScrollCamera, Texture, UNIT_QUAD_VERTEX_COUNT,
};

const BACKDROP_PATH: &str = "assets/backdrops/daybreak.json";
const FPS_LOG_INTERVAL_FRAMES: u64 = 300;

const SKY_CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.5,
    g: 0.7,
    b: 1.0,
    a: 1.0,
};

/// One registered backdrop layer with its GPU resources. The registry is an
/// ordered `Vec<LayerSlot>`; iteration order is draw order is depth order.
struct LayerSlot {
    id: String,
    speed: f32,
    // The bind group keeps the underlying wgpu texture alive; the decoded
    // image itself is not needed after upload.
    texture_bind_group: wgpu::BindGroup,
    transform_buffer: wgpu::Buffer,
    transform_bind_group: wgpu::BindGroup,
}

/// All mutable engine state. Constructed lazily in
/// `ApplicationHandler::resumed` once the window and GPU surface exist.
struct EngineState {
    window: Arc<Window>,
    gpu: GpuContext,
    time: TimeState,
    input: InputState,
    camera: ScrollCamera,
    layer_pipeline: LayerPipeline,
    quad_buffer: wgpu::Buffer,

    backdrop_path: std::path::PathBuf,
    backdrop_watcher: BackdropWatcher,
    layers: Vec<LayerSlot>,
}

impl EngineState {
    fn new(window: Arc<Window>) -> Self {
        let gpu = GpuContext::new(window.clone());
        let time = TimeState::new();
        let input = InputState::new();
        let camera = ScrollCamera::new();
        let layer_pipeline = LayerPipeline::new(&gpu.device, gpu.surface_format);
        let quad_buffer = create_unit_quad(&gpu.device);

        let backdrop_path = std::path::PathBuf::from(BACKDROP_PATH);
        let backdrop_watcher = BackdropWatcher::new(backdrop_path.clone());
        let backdrop = load_backdrop_from_path(&backdrop_path).unwrap_or_else(|err| {
            panic!(
                "Failed to load initial backdrop '{}': {}",
                backdrop_path.display(),
                err
            );
        });
        let layers =
            build_layer_registry(&gpu, &layer_pipeline, &camera, &backdrop).unwrap_or_else(|err| {
                panic!(
                    "Failed to build layer registry for '{}': {}",
                    backdrop.backdrop_id, err
                );
            });
        log::info!(
            "Backdrop loaded: {} ({} layers)",
            backdrop.backdrop_id,
            layers.len()
        );

        Self {
            window,
            gpu,
            time,
            input,
            camera,
            layer_pipeline,
            quad_buffer,
            backdrop_path,
            backdrop_watcher,
            layers,
        }
    }

    fn reload_backdrop(&mut self, reason: &str) {
        match load_backdrop_from_path(&self.backdrop_path) {
            Ok(backdrop_candidate) => {
                match build_layer_registry(
                    &self.gpu,
                    &self.layer_pipeline,
                    &self.camera,
                    &backdrop_candidate,
                ) {
                    Ok(layers) => {
                        self.layers = layers;
                        log::info!(
                            "Backdrop reloaded ({reason}): {} ({})",
                            backdrop_candidate.backdrop_id,
                            backdrop_candidate.version
                        );
                    }
                    Err(err) => {
                        log::error!("Backdrop reload failed ({reason}): {err}");
                    }
                }
            }
            Err(err) => {
                log::error!("Backdrop reload failed ({reason}): {err}");
            }
        }
    }

    fn write_layer_transforms(&self) {
        for layer in &self.layers {
            let uniform = self.camera.build_uniform(layer.speed);
            self.gpu.queue.write_buffer(
                &layer.transform_buffer,
                0,
                bytemuck::cast_slice(&[uniform]),
            );
        }
    }
}

/// Load every layer texture and allocate its bind groups, in file order.
/// Any unreadable or undecodable image fails the whole registry; a layer is
/// never registered with an invalid texture handle.
fn build_layer_registry(
    gpu: &GpuContext,
    pipeline: &LayerPipeline,
    camera: &ScrollCamera,
    backdrop: &BackdropFile,
) -> Result<Vec<LayerSlot>, String> {
    let mut layers = Vec::with_capacity(backdrop.layers.len());
    for layer_cfg in &backdrop.layers {
        let bytes = std::fs::read(&layer_cfg.asset)
            .map_err(|e| format!("Failed to read layer asset '{}': {e}", layer_cfg.asset))?;
        let texture = Texture::from_bytes(&gpu.device, &gpu.queue, &bytes, &layer_cfg.asset)?;
        let texture_bind_group = pipeline.create_texture_bind_group(&gpu.device, &texture);

        let uniform = camera.build_uniform(layer_cfg.speed);
        let transform_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Layer Transform Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let transform_bind_group =
            pipeline.create_transform_bind_group(&gpu.device, &transform_buffer);

        log::info!(
            "Layer '{}': {} ({}x{}, speed {})",
            layer_cfg.id,
            layer_cfg.asset,
            texture.size.0,
            texture.size.1,
            layer_cfg.speed
        );

        layers.push(LayerSlot {
            id: layer_cfg.id.clone(),
            speed: layer_cfg.speed,
            texture_bind_group,
            transform_buffer,
            transform_bind_group,
        });
    }
    Ok(layers)
}

struct App {
    config: PlatformConfig,
    state: Option<EngineState>,
}

impl App {
    fn new() -> Self {
        Self {
            config: PlatformConfig::default(),
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window = sky_platform::window::create_window(event_loop, &self.config);
        log::info!(
            "Window created: {}x{}",
            self.config.width,
            self.config.height
        );
        self.state = Some(EngineState::new(window));
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.gpu.resize(w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(engine_key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => state.input.key_down(engine_key),
                            ElementState::Released => state.input.key_up(engine_key),
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if state.gpu.size.0 == 0 || state.gpu.size.1 == 0 {
                    return;
                }

                // Fixed-step update phase: scrolling and reloads both happen
                // at step boundaries, never mid-draw.
                state.time.begin_frame();
                while state.time.should_step() {
                    if state.input.is_just_pressed(Key::Escape) {
                        event_loop.exit();
                        return;
                    }
                    if state.input.is_just_pressed(Key::R) {
                        state.reload_backdrop("manual trigger (R)");
                    } else if state.backdrop_watcher.should_reload() {
                        state.reload_backdrop("file watcher");
                    }

                    state.camera.scroll_by(scroll_delta(&state.input));
                }

                // Render phase reads the finalized camera offset.
                state.write_layer_transforms();

                let Some((output, view)) = state.gpu.begin_frame() else {
                    return;
                };

                let mut encoder =
                    state
                        .gpu
                        .device
                        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("Backdrop Encoder"),
                        });

                {
                    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("Backdrop Render Pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(SKY_CLEAR_COLOR),
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: None,
                        ..Default::default()
                    });

                    render_pass.set_pipeline(&state.layer_pipeline.render_pipeline);
                    // The quad is shared by every layer, so it is bound once
                    // per pass rather than once per draw.
                    render_pass.set_vertex_buffer(0, state.quad_buffer.slice(..));

                    for layer in &state.layers {
                        render_pass.set_bind_group(0, &layer.transform_bind_group, &[]);
                        render_pass.set_bind_group(1, &layer.texture_bind_group, &[]);
                        render_pass.draw(0..UNIT_QUAD_VERTEX_COUNT, 0..1);
                        log::trace!("Drew layer '{}'", layer.id);
                    }
                }

                state.gpu.queue.submit(std::iter::once(encoder.finish()));
                output.present();

                if state.time.frame_count % FPS_LOG_INTERVAL_FRAMES == 0 {
                    log::debug!(
                        "{:.1} fps, camera offset {:.2}",
                        state.time.smoothed_fps,
                        state.camera.offset
                    );
                }

                // Only clear edge-triggered input (just_pressed / just_released)
                // after at least one fixed step consumed it. Otherwise a press
                // that lands on a frame with 0 simulation steps is silently lost.
                if state.time.steps_this_frame > 0 {
                    state.input.end_frame();
                }
            }

            _ => {}
        }
    }
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyD => Some(Key::D),
        KeyCode::KeyR => Some(Key::R),
        _ => None,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Skyline parallax demo starting...");

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app).expect("Event loop error");
}
