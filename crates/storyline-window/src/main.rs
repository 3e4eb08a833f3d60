// File: crates/storyline-window/src/main.rs
// Summary: Windowed narrative viewer: renders frames on the CPU and blits them with winit + softbuffer.

use std::num::NonZeroU32;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use storyline_core::{
    FrameLayout, InputEvent, KeyInput, Narrative, NarrativeController, RenderStatus, Stage, Step, StoryConfig,
};
use tracing_subscriber::EnvFilter;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, MouseButton, VirtualKeyCode, WindowEvent};
use winit::event_loop::EventLoop;
use winit::window::WindowBuilder;

/// Redraw cadence while marks or callouts are still animating.
const FRAME: Duration = Duration::from_millis(16);

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Args: [narrative name or .toml] [config.toml]
    let mut args = std::env::args().skip(1);
    let which = args.next().unwrap_or_else(|| "renewables".to_string());
    let config = match args.next() {
        Some(p) => StoryConfig::load(&p).with_context(|| format!("failed to load config '{p}'"))?,
        None => StoryConfig::default(),
    };
    let narrative = Narrative::resolve(&which).with_context(|| format!("failed to load narrative '{which}'"))?;

    let stage = Stage::new(config.theme());
    let (fw, fh) = (config.frame.width.max(1) as u32, config.frame.height.max(1) as u32);
    let mut controller = NarrativeController::builder(narrative).config(config).build();
    let total = controller.state().total();
    let title = match controller.narrative().title() {
        "" => "Storyline".to_string(),
        t => t.to_string(),
    };

    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title(&title)
        .with_inner_size(PhysicalSize::new(fw, fh))
        .build(&event_loop)
        .context("failed to create window")?;
    let context = unsafe { softbuffer::Context::new(&window) }.map_err(|e| anyhow!("softbuffer context: {e}"))?;
    let mut surface = unsafe { softbuffer::Surface::new(&context, &window) }.map_err(|e| anyhow!("softbuffer surface: {e}"))?;

    let mut layout = FrameLayout::for_mount(controller.mount(), total);
    let mut cursor: Option<(f64, f64)> = None;
    let mut hover: Option<String> = None;

    event_loop.run(move |event, _, control_flow| {
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => control_flow.set_exit(),
                WindowEvent::Resized(size) => {
                    let next = FrameLayout::new(size.width as i32, size.height as i32, total);
                    let (cw, ch) = next.chart_size();
                    if let Some(RenderStatus::Failed(kind)) = controller.resize(cw, ch) {
                        tracing::warn!(?kind, "scene could not be redrawn at the new size");
                    }
                    layout = FrameLayout::for_mount(controller.mount(), total);
                    window.request_redraw();
                }
                WindowEvent::KeyboardInput { input, .. } if input.state == ElementState::Pressed => {
                    let key = match input.virtual_keycode {
                        Some(VirtualKeyCode::Escape) => {
                            control_flow.set_exit();
                            return;
                        }
                        Some(VirtualKeyCode::Right) => KeyInput::ArrowRight,
                        Some(VirtualKeyCode::Left) => KeyInput::ArrowLeft,
                        Some(VirtualKeyCode::Space) => KeyInput::Space,
                        _ => KeyInput::Other,
                    };
                    if dispatch(&mut controller, InputEvent::Key(key)) {
                        window.request_redraw();
                    }
                }
                WindowEvent::CursorMoved { position, .. } => {
                    cursor = Some((position.x, position.y));
                }
                WindowEvent::CursorLeft { .. } => {
                    cursor = None;
                }
                WindowEvent::MouseInput { state: ElementState::Pressed, button: MouseButton::Left, .. } => {
                    let control = cursor.and_then(|(x, y)| layout.hit_control(x, y));
                    if let Some(control) = control {
                        if dispatch(&mut controller, InputEvent::Click(control)) {
                            window.request_redraw();
                        }
                    }
                }
                _ => {}
            },
            Event::MainEventsCleared => {
                if controller.pump() > 0 || controller.is_animating() {
                    window.request_redraw();
                }
                let tip = tooltip(&controller, &layout, cursor);
                if tip != hover {
                    match &tip {
                        Some(t) => window.set_title(&format!("{title} | {t}")),
                        None => window.set_title(&title),
                    }
                    hover = tip;
                }
            }
            Event::RedrawRequested(_) => {
                if let Err(e) = present(&stage, &controller, &mut surface) {
                    tracing::error!(error = %e, "present failed");
                    control_flow.set_exit();
                }
            }
            Event::RedrawEventsCleared => {
                if controller.is_animating() {
                    control_flow.set_wait_until(Instant::now() + FRAME);
                } else if let Some(due) = controller.next_deadline() {
                    control_flow.set_wait_until(Instant::now() + due.saturating_sub(controller.now()));
                } else {
                    control_flow.set_wait();
                }
            }
            _ => {}
        }
    })
}

/// Apply an input; true when the frame needs repainting.
fn dispatch(controller: &mut NarrativeController, event: InputEvent) -> bool {
    let Some(cmd) = event.command() else { return false };
    match controller.apply(cmd) {
        Ok(Step::Unchanged) => false,
        Ok(Step::Moved { to, render, .. }) => {
            if let RenderStatus::Failed(kind) = render {
                tracing::warn!(scene = to, ?kind, "showing a notice instead of the chart");
            }
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, "navigation ignored");
            false
        }
    }
}

fn tooltip(controller: &NarrativeController, layout: &FrameLayout, cursor: Option<(f64, f64)>) -> Option<String> {
    let (x, y) = cursor?;
    let (mx, my) = layout.to_mount(x, y)?;
    controller.mount().hit_test(mx, my, controller.now()).map(str::to_string)
}

/// Render the current frame and copy it into the window as 0RGB pixels.
fn present(stage: &Stage, controller: &NarrativeController, surface: &mut softbuffer::Surface) -> Result<()> {
    let (rgba, w, h) = stage.render_rgba8(controller, controller.now())?;
    let (Some(nw), Some(nh)) = (NonZeroU32::new(w as u32), NonZeroU32::new(h as u32)) else {
        return Ok(());
    };
    surface.resize(nw, nh).map_err(|e| anyhow!("resizing surface to {w}x{h}: {e}"))?;
    let mut buffer = surface.buffer_mut().map_err(|e| anyhow!("surface buffer: {e}"))?;
    for (dst, px) in buffer.iter_mut().zip(rgba.chunks_exact(4)) {
        *dst = (px[0] as u32) << 16 | (px[1] as u32) << 8 | px[2] as u32;
    }
    buffer.present().map_err(|e| anyhow!("present: {e}"))?;
    Ok(())
}
