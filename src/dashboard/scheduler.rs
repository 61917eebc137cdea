//! # Render Scheduler
//!
//! Drives the dashboard on two clocks:
//!
//! - the **fast tick** (default 250 ms) advances the animation frame and
//!   repaints the header on every tick;
//! - the **slow clock** (`refresh` in the profile) rebuilds the body, which is
//!   the only step that calls modules.
//!
//! Each tick runs the same steps: advance the frame, rebuild the body if the
//! refresh interval has elapsed, recompute the header, compose the screen and
//! paint it. The body shown in a frame always comes from a single rebuild.

use super::header::{header_node, FrameState};
use super::layout::{build_body, LayoutNode, SplitDirection};
use crate::modules::{ModuleInvocation, ModuleRegistry, RenderContext};
use crate::profile::Profile;
use crate::ui::input::{is_quit, EventReader};
use anyhow::Result;
use chrono::Local;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;

/// Default fast-tick period (4 ticks per second).
pub const DEFAULT_TICK: Duration = Duration::from_millis(250);

/// A full screen tree: header band on top of the body.
pub type Screen = LayoutNode<ModuleInvocation>;

/// Anything that can show a composed screen.
pub trait DisplaySurface {
    fn paint(&mut self, screen: &Screen) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Stopped,
    Running,
}

pub struct Scheduler {
    profile: Arc<Profile>,
    registry: ModuleRegistry,
    tick: Duration,
    frame: FrameState,
    /// When the body was last rebuilt; `None` until the first rebuild.
    last_rebuild: Option<Instant>,
    body: Option<Screen>,
    rebuilds: u64,
    state: SchedulerState,
}

impl Scheduler {
    pub fn new(profile: Arc<Profile>, registry: ModuleRegistry, tick: Duration) -> Self {
        Self {
            profile,
            registry,
            tick,
            frame: FrameState::default(),
            last_rebuild: None,
            body: None,
            rebuilds: 0,
            state: SchedulerState::Stopped,
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn frame(&self) -> FrameState {
        self.frame
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Number of body rebuilds so far.
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// Whether the slow clock has run out at `now`.
    pub fn needs_rebuild(&self, now: Instant) -> bool {
        match self.last_rebuild {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.profile.refresh,
        }
    }

    /// One fast tick, without painting. Returns the composed screen.
    pub async fn tick(&mut self, now: Instant) -> Screen {
        self.frame.advance();
        if self.needs_rebuild(now) {
            self.rebuild(now).await;
        }
        self.compose()
    }

    /// The one-shot path: frame 0, a single rebuild, no loop.
    pub async fn render_once(&mut self) -> Screen {
        self.frame = FrameState::default();
        self.rebuild(Instant::now()).await;
        self.compose()
    }

    async fn rebuild(&mut self, now: Instant) {
        let started = Instant::now();
        let ctx = RenderContext::new(Arc::clone(&self.profile), self.frame.value());
        let body = build_body(&self.profile, &self.registry, &ctx).await;
        self.body = Some(body);
        self.last_rebuild = Some(now);
        self.rebuilds += 1;
        tracing::debug!(
            rebuild = self.rebuilds,
            frame = self.frame.value(),
            elapsed = ?started.elapsed(),
            "rebuilt body"
        );
    }

    /// Header for the current frame on top of the last rebuilt body, with
    /// blinking borders resolved for this frame.
    fn compose(&self) -> Screen {
        let header = header_node(&self.profile, self.frame, Local::now().time());
        let blink_on = self.frame.blink_on();
        let body = match &self.body {
            Some(body) => body.clone().map_leaves(&mut |mut invocation: ModuleInvocation| {
                invocation.content.border = invocation.content.border_at(blink_on);
                invocation
            }),
            None => LayoutNode::Leaf(ModuleInvocation::notice("mirrordash", "starting")),
        };
        LayoutNode::Split {
            direction: SplitDirection::Column,
            children: vec![header, body],
            ratios: None,
        }
    }

    /// Run until a quit key is read or painting fails.
    pub async fn run<S, E>(&mut self, surface: &mut S, events: &mut E) -> Result<()>
    where
        S: DisplaySurface + ?Sized,
        E: EventReader + ?Sized,
    {
        self.state = SchedulerState::Running;
        tracing::info!(
            tick = ?self.tick,
            refresh = ?self.profile.refresh,
            "scheduler running"
        );
        let result = self.run_loop(surface, events).await;
        self.state = SchedulerState::Stopped;
        tracing::info!(rebuilds = self.rebuilds, "scheduler stopped");
        result
    }

    async fn run_loop<S, E>(&mut self, surface: &mut S, events: &mut E) -> Result<()>
    where
        S: DisplaySurface + ?Sized,
        E: EventReader + ?Sized,
    {
        let mut interval = tokio::time::interval(self.tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while self.state == SchedulerState::Running {
            interval.tick().await;
            let screen = self.tick(Instant::now()).await;
            surface.paint(&screen)?;

            while let Some(event) = events.read_event(Duration::ZERO)? {
                if is_quit(&event) {
                    self.state = SchedulerState::Stopped;
                    break;
                }
            }
        }
        Ok(())
    }
}
