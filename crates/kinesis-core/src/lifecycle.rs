//! Visibility-gated lifecycle around one adapter.
//!
//! Bindings exist only while the container is `active` and intersecting the
//! viewport. While bound, moves and scrolls pass through a [`Throttle`] and
//! frame-driven adapters get a self-renewing frame task. Leaving the viewport
//! cancels all of it and resets every child; `destroy` does the same for good.

use crate::adapters::{Adapter, AudioAdapter, Cx, InputEvent};
use crate::config::AttributeSource;
use crate::host::Surface;
use crate::scheduler::{ManualScheduler, Scheduler, TaskHandle, TaskSlot, Throttle};
use std::time::Duration;

pub struct Controller<A: Adapter, S: Scheduler> {
    adapter: A,
    scheduler: S,
    visible: bool,
    bound: bool,
    destroyed: bool,
    throttle: Throttle<InputEvent>,
    frame: TaskSlot,
}

impl<A: Adapter, S: Scheduler> Controller<A, S> {
    /// Mounts the adapter's styles. Nothing is bound until the first
    /// visibility notification reports the container as intersecting.
    pub fn new(mut adapter: A, scheduler: S, surface: &mut dyn Surface) -> Self {
        adapter.mount(surface);
        let throttle = Throttle::new(adapter.container().throttle);
        log::info!("[lifecycle] {} mounted", adapter.name());
        Self {
            adapter,
            scheduler,
            visible: false,
            bound: false,
            destroyed: false,
            throttle,
            frame: TaskSlot::default(),
        }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Whether the continuous frame loop currently has a frame requested.
    pub fn is_looping(&self) -> bool {
        self.frame.is_pending()
    }

    pub fn on_visibility(&mut self, intersecting: bool, surface: &mut dyn Surface) {
        if self.destroyed {
            return;
        }
        self.visible = intersecting;
        self.sync(surface);
    }

    pub fn on_input(&mut self, event: InputEvent, surface: &mut dyn Surface) {
        if !self.bound {
            return;
        }
        if event.is_throttled() {
            self.throttle.push(event, &mut self.scheduler);
            return;
        }
        if event == InputEvent::PointerLeave {
            // A move still waiting in the throttle must not land after the reset.
            self.throttle.cancel(&mut self.scheduler);
        }
        self.deliver(event, surface);
    }

    /// The host fired `handle`. Returns whether it belonged to this
    /// controller; stale and cancelled handles are ignored.
    pub fn on_task(&mut self, handle: TaskHandle, surface: &mut dyn Surface) -> bool {
        if self.destroyed || !self.bound {
            return false;
        }
        if self.frame.take_if(handle) {
            let mut cx = Cx {
                surface: &mut *surface,
                scheduler: &mut self.scheduler,
            };
            self.adapter.frame(&mut cx);
            self.sync_loop();
            return true;
        }
        if let Some(event) = self.throttle.fire(handle) {
            self.deliver(event, surface);
            return true;
        }
        let mut cx = Cx {
            surface,
            scheduler: &mut self.scheduler,
        };
        self.adapter.task(handle, &mut cx)
    }

    /// Apply new configuration in place. Baselines survive; a change of
    /// `active` binds or unbinds accordingly.
    pub fn on_config_changed(&mut self, config: A::Config, surface: &mut dyn Surface) {
        if self.destroyed {
            return;
        }
        self.adapter.reconfigure(config, surface);
        self.throttle.set_mode(self.adapter.container().throttle);
        log::info!("[lifecycle] {} reconfigured", self.adapter.name());
        self.sync(surface);
    }

    /// Re-read configuration from live attributes. Unreadable configuration
    /// keeps the current one.
    pub fn reload(
        &mut self,
        container: &dyn AttributeSource,
        children: &[&dyn AttributeSource],
        surface: &mut dyn Surface,
    ) {
        match A::read_config(container, children) {
            Ok(config) => self.on_config_changed(config, surface),
            Err(e) => log::warn!("[lifecycle] {} keeps its configuration: {e}", self.adapter.name()),
        }
    }

    /// Cancel everything, reset every child and ignore all later calls.
    pub fn destroy(&mut self, surface: &mut dyn Surface) {
        if self.destroyed {
            return;
        }
        self.throttle.cancel(&mut self.scheduler);
        self.frame.cancel(&mut self.scheduler);
        let mut cx = Cx {
            surface,
            scheduler: &mut self.scheduler,
        };
        self.adapter.destroy(&mut cx);
        self.bound = false;
        self.destroyed = true;
        log::info!("[lifecycle] {} destroyed", self.adapter.name());
    }

    fn deliver(&mut self, event: InputEvent, surface: &mut dyn Surface) {
        let mut cx = Cx {
            surface,
            scheduler: &mut self.scheduler,
        };
        self.adapter.input(event, &mut cx);
    }

    fn sync(&mut self, surface: &mut dyn Surface) {
        let want = self.visible && self.adapter.container().active;
        if want != self.bound {
            self.bound = want;
            if want {
                log::info!("[lifecycle] {} bound", self.adapter.name());
                let mut cx = Cx {
                    surface,
                    scheduler: &mut self.scheduler,
                };
                self.adapter.activate(&mut cx);
            } else {
                log::info!("[lifecycle] {} unbound", self.adapter.name());
                self.throttle.cancel(&mut self.scheduler);
                self.frame.cancel(&mut self.scheduler);
                let mut cx = Cx {
                    surface,
                    scheduler: &mut self.scheduler,
                };
                self.adapter.deactivate(&mut cx);
            }
        }
        self.sync_loop();
    }

    /// Keep exactly one frame requested while bound and wanted.
    fn sync_loop(&mut self) {
        if self.bound && self.adapter.wants_frames() {
            if !self.frame.is_pending() {
                let handle = self.scheduler.request_frame();
                self.frame.replace(handle, &mut self.scheduler);
            }
        } else {
            self.frame.cancel(&mut self.scheduler);
        }
    }
}

impl<S: Scheduler> Controller<AudioAdapter, S> {
    /// Start playback; the loop runs once the container is bound.
    pub fn play(&mut self) {
        if self.destroyed {
            return;
        }
        self.adapter.play();
        self.sync_loop();
    }

    /// Stop playback, clear smoothing and reset every child.
    pub fn stop(&mut self, surface: &mut dyn Surface) {
        if self.destroyed {
            return;
        }
        self.adapter.stop(surface);
        self.sync_loop();
    }
}

impl<A: Adapter> Controller<A, ManualScheduler> {
    /// Fire every frame task requested so far. Returns how many were handled.
    pub fn run_frame(&mut self, surface: &mut dyn Surface) -> usize {
        let fired = self.scheduler.take_frame();
        let mut handled = 0;
        for handle in fired {
            if self.on_task(handle, surface) {
                handled += 1;
            }
        }
        handled
    }

    /// Advance the clock and fire due timeouts. Returns how many were handled.
    pub fn advance(&mut self, by: Duration, surface: &mut dyn Surface) -> usize {
        let fired = self.scheduler.advance(by);
        let mut handled = 0;
        for handle in fired {
            if self.on_task(handle, surface) {
                handled += 1;
            }
        }
        handled
    }
}

/// Object-safe view of a controller, so hosts can keep controllers of
/// different adapters side by side.
pub trait Lifecycle {
    fn name(&self) -> &'static str;
    fn on_visibility(&mut self, intersecting: bool, surface: &mut dyn Surface);
    fn on_input(&mut self, event: InputEvent, surface: &mut dyn Surface);
    fn on_task(&mut self, handle: TaskHandle, surface: &mut dyn Surface) -> bool;
    fn reload(
        &mut self,
        container: &dyn AttributeSource,
        children: &[&dyn AttributeSource],
        surface: &mut dyn Surface,
    );
    fn destroy(&mut self, surface: &mut dyn Surface);
    fn is_bound(&self) -> bool;
}

impl<A: Adapter, S: Scheduler> Lifecycle for Controller<A, S> {
    fn name(&self) -> &'static str {
        self.adapter.name()
    }

    fn on_visibility(&mut self, intersecting: bool, surface: &mut dyn Surface) {
        Controller::on_visibility(self, intersecting, surface);
    }

    fn on_input(&mut self, event: InputEvent, surface: &mut dyn Surface) {
        Controller::on_input(self, event, surface);
    }

    fn on_task(&mut self, handle: TaskHandle, surface: &mut dyn Surface) -> bool {
        Controller::on_task(self, handle, surface)
    }

    fn reload(
        &mut self,
        container: &dyn AttributeSource,
        children: &[&dyn AttributeSource],
        surface: &mut dyn Surface,
    ) {
        Controller::reload(self, container, children, surface);
    }

    fn destroy(&mut self, surface: &mut dyn Surface) {
        Controller::destroy(self, surface);
    }

    fn is_bound(&self) -> bool {
        self.bound
    }
}
