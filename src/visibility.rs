//! スクロール連動の表示エンジン
//!
//! 各要素は [`ViewportObserver`] を購読し、一度見えたら [`VisibilityState`] を
//! ラッチする。時間に依存する処理はすべて [`crate::scheduler::Scheduler`] 上で動く。

/// Hero stat counters
mod counter;
/// Viewport intersection subscriptions
mod observer;
/// Per-section reveal configurations
mod presets;
/// Scroll progress indicator
mod progress;
/// One-way reveal latch
mod reveal;
/// Typed subtitle and blinking cursor
mod typed_text;

use std::cell::Cell;
use std::rc::Rc;

pub use counter::{
    CounterOptions,
    StatCounter,
};
pub use observer::{
    IntersectionEntry,
    ObservationHandle,
    ObservationId,
    ObserverOptions,
    ViewportObserver,
};
pub use presets::{
    RevealPreset,
    hero_stat_delay,
};
pub use progress::{
    ProgressOptions,
    ProgressSnapshot,
    ScrollProgress,
    ScrollProgressTracker,
    compute_scroll_progress,
};
pub use reveal::{
    Reveal,
    RevealConfig,
};
pub use typed_text::{
    TypedText,
    TypingOptions,
};

/// Visibility flag owned by one mounted element.
///
/// Clones observe the same flag. Only the engine can set it, and it never
/// goes back to hidden.
#[derive(Debug, Clone, Default)]
pub struct VisibilityState(Rc<Cell<bool>>);

impl VisibilityState {
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.0.get()
    }

    pub(crate) fn latch(&self) {
        self.0.set(true);
    }
}
