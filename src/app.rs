// app.rs - Event loop shell: sampler cadence, overlay frames, control commands
use std::collections::HashMap;
use std::io::BufRead;
use std::str::FromStr;
use std::thread;
use std::time::Duration;

use anyhow::anyhow;
use glam::Vec2;
use log::{debug, error, info, warn};
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoopProxy};
use winit::window::WindowId;

use crate::core::{
    Clock, ColorRotator, CursorSampler, FixedInterval, GpuContext, PlatformCursor, RotationRule,
    SamplingPipeline, SurfaceId, Throttled, TickOutcome, TrailConfig, XorShiftHue,
};
use crate::overlay::Overlay;

const STATS_INTERVAL: Duration = Duration::from_secs(5);

/// Commands accepted on the control channel, one per line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    Toggle,
    Enable,
    Disable,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown command {0:?} (expected toggle, enable, disable or quit)")]
pub struct UnknownCommand(String);

impl FromStr for ControlCommand {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "toggle" | "t" => Ok(Self::Toggle),
            "enable" | "on" => Ok(Self::Enable),
            "disable" | "off" => Ok(Self::Disable),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            _ => Err(UnknownCommand(s.trim().to_string())),
        }
    }
}

/// Forward stdin lines to the event loop as control commands.
/// Ends at EOF or once the event loop is gone.
pub fn spawn_control_reader(proxy: EventLoopProxy<ControlCommand>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }

            match line.parse::<ControlCommand>() {
                Ok(command) => {
                    if proxy.send_event(command).is_err() {
                        break;
                    }
                }
                Err(e) => warn!("{}", e),
            }
        }
        debug!("control input closed");
    })
}

pub type Pipeline = SamplingPipeline<PlatformCursor, XorShiftHue>;

pub struct App {
    config: TrailConfig,
    clock: Clock,
    pipeline: Pipeline,
    poll: FixedInterval,
    stats: Throttled,
    gpu: Option<GpuContext>,
    overlays: HashMap<WindowId, Overlay>,
    next_surface: u64,
    error: Option<anyhow::Error>,
}

impl App {
    pub fn new(config: TrailConfig, enabled: bool) -> Self {
        let clock = Clock::new();
        let pipeline = SamplingPipeline::new(
            CursorSampler::new(PlatformCursor::detect(), enabled),
            ColorRotator::new(RotationRule::from(&config.sampler), XorShiftHue::from_time()),
        );

        info!(
            "sampling every {} ms, initial color {}",
            config.sampler.poll_interval_ms,
            pipeline.color()
        );

        Self {
            poll: FixedInterval::new(config.sampler.poll_interval(), clock.now()),
            stats: Throttled::new(STATS_INTERVAL),
            config,
            clock,
            pipeline,
            gpu: None,
            overlays: HashMap::new(),
            next_surface: 0,
            error: None,
        }
    }

    /// Setup error that stopped the event loop, if any
    pub fn take_error(&mut self) -> Option<anyhow::Error> {
        self.error.take()
    }

    pub fn is_enabled(&self) -> bool {
        self.pipeline.is_enabled()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, e: anyhow::Error) {
        error!("{:#}", e);
        self.error = Some(e);
        event_loop.exit();
    }

    fn open_overlays(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let monitors: Vec<_> = event_loop.available_monitors().collect();
        if monitors.is_empty() {
            return Err(anyhow!("no displays found"));
        }
        info!("found {} display(s)", monitors.len());

        let visible = self.pipeline.is_enabled();
        for monitor in &monitors {
            let id = SurfaceId(self.next_surface);
            self.next_surface += 1;

            let overlay = Overlay::open(
                event_loop,
                monitor,
                id,
                &mut self.gpu,
                self.config.renderer,
                visible,
            )?;

            self.pipeline
                .register_surface(overlay.display_surface(), overlay.slot());
            self.overlays.insert(overlay.window_id(), overlay);
        }

        Ok(())
    }

    fn tick(&mut self, now: Duration) {
        if let TickOutcome::Broadcast { delivered: 0, .. } = self.pipeline.tick(now) {
            if !self.overlays.is_empty() {
                warn!("sample reached no surface");
            }
        }

        for overlay in self.overlays.values_mut() {
            overlay.step_hidden();
        }

        if self.stats.try_tick(now) {
            let particles: Vec<usize> = self.overlays.values().map(Overlay::live_particles).collect();
            debug!(
                "{} surface(s), live particles {:?}, color {}, sampling {}",
                self.pipeline.surface_count(),
                particles,
                self.pipeline.color(),
                if self.pipeline.is_enabled() { "on" } else { "off" }
            );
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        if enabled == self.pipeline.is_enabled() {
            return;
        }

        self.pipeline.set_enabled(enabled);
        for overlay in self.overlays.values_mut() {
            overlay.set_visible(enabled);
        }
        info!("trail {}", if enabled { "enabled" } else { "disabled" });
    }

    fn close_overlay(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId) {
        if let Some(overlay) = self.overlays.remove(&window_id) {
            self.pipeline.unregister_surface(overlay.id());
            info!("overlay {} closed", overlay.id().0);
        }

        if self.overlays.is_empty() {
            event_loop.exit();
        }
    }
}

impl ApplicationHandler<ControlCommand> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !self.overlays.is_empty() {
            return;
        }

        if let Err(e) = self.open_overlays(event_loop) {
            self.fail(event_loop, e.context("failed to open overlays"));
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, command: ControlCommand) {
        match command {
            ControlCommand::Toggle => self.set_enabled(!self.pipeline.is_enabled()),
            ControlCommand::Enable => self.set_enabled(true),
            ControlCommand::Disable => self.set_enabled(false),
            ControlCommand::Quit => {
                info!("quit requested");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::RedrawRequested => {
                if let Some(overlay) = self.overlays.get_mut(&window_id) {
                    overlay.frame();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let Some(origin) = self.overlays.get(&window_id).map(Overlay::origin) else {
                    return;
                };
                if let Some(tracked) = self.pipeline.cursor_source_mut().tracked_mut() {
                    tracked.observe_local(origin, Vec2::new(position.x as f32, position.y as f32));
                }
            }
            WindowEvent::Resized(size) => {
                if let Some(overlay) = self.overlays.get_mut(&window_id) {
                    overlay.resize(size.width, size.height);
                }
            }
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                self.close_overlay(event_loop, window_id);
            }
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            if let Some(tracked) = self.pipeline.cursor_source_mut().tracked_mut() {
                tracked.observe_motion(dx, dy);
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = self.clock.now();
        if self.poll.poll(now) {
            self.tick(now);
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(
            self.clock.instant_at(self.poll.deadline()),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_control_commands() {
        assert_eq!("toggle".parse(), Ok(ControlCommand::Toggle));
        assert_eq!("  ON \n".parse(), Ok(ControlCommand::Enable));
        assert_eq!("Disable".parse(), Ok(ControlCommand::Disable));
        assert_eq!("q".parse(), Ok(ControlCommand::Quit));
    }

    #[test]
    fn rejects_unknown_commands() {
        let err = "explode".parse::<ControlCommand>().unwrap_err();
        assert_eq!(err, UnknownCommand("explode".into()));
        assert!(err.to_string().contains("toggle"));
    }
}
