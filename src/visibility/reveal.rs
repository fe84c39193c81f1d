//! 交差検知で一度だけ表示状態になるラッチ

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use super::VisibilityState;
use super::observer::{
    ObservationHandle,
    ObserverOptions,
    ViewportObserver,
};
use crate::scheduler::{
    Scheduler,
    TimerHandle,
};
use crate::viewport::{
    Rect,
    RootMargin,
};

/// How and when an element reveals itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealConfig {
    pub threshold: f64,
    pub root_margin: RootMargin,
    /// Wait between the first qualifying intersection and the reveal.
    pub delay: Duration,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self { threshold: 0.2, root_margin: RootMargin::ZERO, delay: Duration::ZERO }
    }
}

impl RevealConfig {
    #[must_use]
    pub const fn new(threshold: f64, delay: Duration) -> Self {
        Self { threshold, root_margin: RootMargin::ZERO, delay }
    }

    #[must_use]
    pub const fn with_root_margin(self, root_margin: RootMargin) -> Self {
        Self { root_margin, ..self }
    }

    /// Observer options derived from this config.
    #[must_use]
    pub const fn observer_options(&self) -> ObserverOptions {
        ObserverOptions { threshold: self.threshold, root_margin: self.root_margin }
    }
}

/// State shared with the intersection callback.
#[derive(Debug, Default)]
struct Latch {
    /// Set on the first qualifying intersection
    triggered: bool,
    /// Delay timer, held so that unmounting cancels it
    pending: Option<TimerHandle>,
}

/// A mounted element that becomes visible once and stays visible.
///
/// Dropping (or [`Reveal::unmount`]) releases the observation and cancels a
/// pending delay, so a reveal that has not fired yet never fires.
#[derive(Debug)]
pub struct Reveal {
    state: VisibilityState,
    latch: Rc<RefCell<Latch>>,
    observation: ObservationHandle,
}

impl Reveal {
    /// Starts observing `target`.
    pub fn mount(
        observer: &ViewportObserver,
        scheduler: &Scheduler,
        target: Rect,
        config: RevealConfig,
    ) -> Self {
        let state = VisibilityState::default();
        let latch = Rc::new(RefCell::new(Latch::default()));

        let weak_latch = Rc::downgrade(&latch);
        let scheduler = scheduler.clone();
        let callback_state = state.clone();
        let delay = config.delay;

        let observation = observer.observe(target, config.observer_options(), move |entry| {
            if !entry.is_intersecting {
                return;
            }
            let Some(latch) = weak_latch.upgrade() else {
                return;
            };
            let mut latch = latch.borrow_mut();
            if latch.triggered {
                return;
            }
            latch.triggered = true;
            tracing::trace!(ratio = entry.ratio, ?delay, "Reveal triggered");

            let state = callback_state.clone();
            latch.pending = Some(scheduler.set_timeout(delay, move || {
                state.latch();
                tracing::trace!("Element revealed");
            }));
        });

        Self { state, latch, observation }
    }

    /// Read handle to the visibility flag.
    #[must_use]
    pub fn state(&self) -> VisibilityState {
        self.state.clone()
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.state.is_visible()
    }

    /// Triggered but still waiting for its delay.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.latch.borrow().pending.as_ref().is_some_and(TimerHandle::is_pending)
    }

    /// Whether the element is still being observed.
    #[must_use]
    pub fn is_observing(&self) -> bool {
        self.observation.is_active()
    }

    /// Tears the element down. Equivalent to dropping it.
    pub fn unmount(self) {
        drop(self);
    }
}
