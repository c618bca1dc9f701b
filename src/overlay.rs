// overlay.rs - One click-through trail window per monitor
use std::sync::Arc;

use anyhow::{Context, Result};
use glam::Vec2;
use log::{info, warn};
use winit::event_loop::ActiveEventLoop;
use winit::monitor::MonitorHandle;
use winit::window::{Window, WindowAttributes, WindowId, WindowLevel};

use crate::core::{
    Canvas, DisplaySurface, EventSlot, GpuContext, RendererConfig, SurfaceId, SurfaceRenderer,
    TrailRenderer,
};
use crate::math::ScreenPoint;

/// Borderless, transparent, always-on-top window covering `monitor`
pub fn attributes(monitor: &MonitorHandle, visible: bool) -> WindowAttributes {
    let attributes = Window::default_attributes()
        .with_title("cursor-glow")
        .with_decorations(false)
        .with_transparent(true)
        .with_resizable(false)
        .with_window_level(WindowLevel::AlwaysOnTop)
        .with_position(monitor.position())
        .with_inner_size(monitor.size())
        .with_visible(visible);

    #[cfg(target_os = "windows")]
    let attributes = {
        use winit::platform::windows::WindowAttributesExtWindows;
        attributes.with_skip_taskbar(true)
    };

    attributes
}

/// A display surface with its own renderer, canvas and GPU swapchain
pub struct Overlay {
    id: SurfaceId,
    window: Arc<Window>,
    origin: ScreenPoint,
    renderer: SurfaceRenderer,
    canvas: Canvas,
    trail: TrailRenderer,
    slot: Arc<EventSlot>,
    visible: bool,
}

impl Overlay {
    /// Create the window for `monitor` and attach it to the GPU.
    /// The first overlay opened creates the shared context in `gpu`.
    pub fn open(
        event_loop: &ActiveEventLoop,
        monitor: &MonitorHandle,
        id: SurfaceId,
        gpu: &mut Option<GpuContext>,
        config: RendererConfig,
        visible: bool,
    ) -> Result<Self> {
        let window = Arc::new(
            event_loop
                .create_window(attributes(monitor, visible))
                .with_context(|| format!("failed to create overlay window for {:?}", monitor.name()))?,
        );

        if let Err(e) = window.set_cursor_hittest(false) {
            warn!("overlay {} cannot ignore mouse input: {}", id.0, e);
        }

        let (surface, context) = match gpu {
            Some(context) => (context.create_surface(window.clone())?, context.clone()),
            None => {
                let instance = GpuContext::create_instance();
                let surface = instance
                    .create_surface(window.clone())
                    .context("failed to create overlay surface")?;
                let context = pollster::block_on(GpuContext::new_with_surface(instance, &surface))?;
                info!("using GPU adapter {}", context.adapter().get_info().name);
                *gpu = Some(context.clone());
                (surface, context)
            }
        };

        let size = window.inner_size();
        let renderer = SurfaceRenderer::new(&context, surface, size.width, size.height)?;
        let (width, height) = renderer.dimensions();

        let position = monitor.position();
        let origin = Vec2::new(position.x as f32, position.y as f32);

        info!(
            "overlay {} on {} at ({}, {}) {}x{}",
            id.0,
            monitor.name().unwrap_or_else(|| "unnamed monitor".into()),
            origin.x,
            origin.y,
            width,
            height
        );

        window.request_redraw();

        Ok(Self {
            id,
            window,
            origin,
            renderer,
            canvas: Canvas::new(width, height),
            trail: TrailRenderer::new(config),
            slot: Arc::new(EventSlot::new()),
            visible,
        })
    }

    /// Advance the trail one frame and present it. Hidden overlays get no
    /// redraws; they age through `step_hidden` instead.
    pub fn frame(&mut self) {
        if !self.visible {
            return;
        }

        self.advance();
        if let Err(e) = self.renderer.render(&self.canvas) {
            warn!("overlay {} skipped a frame: {:#}", self.id.0, e);
        }

        self.window.request_redraw();
    }

    /// Age the trail of a hidden overlay without presenting
    pub fn step_hidden(&mut self) {
        if !self.visible {
            self.advance();
        }
    }

    fn advance(&mut self) {
        let ops = self.trail.step(self.slot.take());
        self.canvas.apply(&ops);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.renderer.resize(width, height);
        self.canvas.resize(width, height);
    }

    /// Hiding drops any undelivered event and holds the trail in place.
    /// Showing presents a fresh frame first, so nothing stale flashes up.
    pub fn set_visible(&mut self, visible: bool) {
        if visible == self.visible {
            return;
        }

        self.visible = visible;
        if visible {
            self.frame();
        } else {
            self.slot.take();
            self.trail.hold();
        }
        self.window.set_visible(visible);
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// How the broadcaster addresses this overlay
    pub fn display_surface(&self) -> DisplaySurface {
        DisplaySurface::new(self.id, self.origin)
    }

    pub fn slot(&self) -> &Arc<EventSlot> {
        &self.slot
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn window_id(&self) -> WindowId {
        self.window.id()
    }

    pub fn origin(&self) -> ScreenPoint {
        self.origin
    }

    pub fn live_particles(&self) -> usize {
        self.trail.particles().len()
    }
}
