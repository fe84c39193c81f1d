//! スクロール進捗インジケーター
//!
//! セクションの表示ラッチと違い、インジケーター自体の表示状態は
//! 再計算のたびに評価し直し、双方向に切り替わる。

use std::cell::RefCell;
use std::rc::{
    Rc,
    Weak,
};
use std::time::Duration;

use serde::Serialize;

use crate::scheduler::{
    Scheduler,
    TimerHandle,
};
use crate::viewport::Viewport;

/// Share of the scrollable distance already travelled, in percent.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
pub struct ScrollProgress(f64);

impl ScrollProgress {
    pub const ZERO: Self = Self(0.0);

    /// Clamps `percent` into `[0, 100]`. NaN maps to zero.
    #[must_use]
    pub fn new(percent: f64) -> Self {
        if percent.is_nan() { Self::ZERO } else { Self(percent.clamp(0.0, 100.0)) }
    }

    #[must_use]
    pub const fn percent(self) -> f64 {
        self.0
    }

    /// Whole percent, as rendered in the bar width.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn rounded(self) -> u8 {
        // Clamped to [0, 100] on construction.
        self.0.round() as u8
    }
}

/// `scroll_y / (document_height - height) * 100`, clamped.
///
/// A document that does not overflow the viewport has no progress.
#[must_use]
pub fn compute_scroll_progress(viewport: &Viewport) -> ScrollProgress {
    let max_scroll = viewport.max_scroll();
    if max_scroll <= 0.0 {
        return ScrollProgress::ZERO;
    }
    ScrollProgress::new(viewport.scroll_y / max_scroll * 100.0)
}

/// What the indicator renders.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ProgressSnapshot {
    pub progress: ScrollProgress,
    /// Shown once the page is scrolled past the visibility offset
    pub visible: bool,
}

impl ProgressSnapshot {
    #[must_use]
    pub fn compute(viewport: &Viewport, visibility_offset: f64) -> Self {
        if viewport.max_scroll() <= 0.0 {
            return Self { progress: ScrollProgress::ZERO, visible: false };
        }
        Self {
            progress: compute_scroll_progress(viewport),
            visible: viewport.scroll_y > visibility_offset,
        }
    }
}

/// Tuning of [`ScrollProgressTracker`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressOptions {
    /// Scroll offset above which the indicator is shown
    pub visibility_offset: f64,
    /// Length of one rendering frame; events within a frame are coalesced
    pub frame_interval: Duration,
}

impl Default for ProgressOptions {
    fn default() -> Self {
        Self { visibility_offset: 50.0, frame_interval: Duration::from_millis(16) }
    }
}

#[derive(Debug)]
struct TrackerInner {
    /// Latest viewport reported by scroll/resize events
    viewport: Viewport,
    options: ProgressOptions,
    snapshot: ProgressSnapshot,
    recomputations: usize,
    /// Pending frame, if an event arrived since the last recomputation
    frame: Option<TimerHandle>,
}

impl TrackerInner {
    fn recompute(&mut self) {
        self.snapshot = ProgressSnapshot::compute(&self.viewport, self.options.visibility_offset);
        self.recomputations += 1;
    }
}

/// Mounted scroll progress indicator.
///
/// Scroll and resize events only record the new viewport; the snapshot is
/// recomputed at most once per frame.
#[derive(Debug)]
pub struct ScrollProgressTracker {
    inner: Rc<RefCell<TrackerInner>>,
    scheduler: Scheduler,
}

impl ScrollProgressTracker {
    /// Mounts the indicator and computes the initial snapshot right away.
    #[must_use]
    pub fn mount(scheduler: &Scheduler, viewport: Viewport, options: ProgressOptions) -> Self {
        let mut inner = TrackerInner {
            viewport,
            options,
            snapshot: ProgressSnapshot::default(),
            recomputations: 0,
            frame: None,
        };
        inner.recompute();

        Self { inner: Rc::new(RefCell::new(inner)), scheduler: scheduler.clone() }
    }

    pub fn on_scroll(&self, scroll_y: f64) {
        let viewport = self.inner.borrow().viewport.scrolled_to(scroll_y);
        self.on_viewport(viewport);
    }

    pub fn on_resize(&self, width: f64, height: f64, document_height: f64) {
        let scroll_y = self.inner.borrow().viewport.scroll_y;
        self.on_viewport(Viewport::new(scroll_y, width, height, document_height));
    }

    /// Records `viewport` and requests a frame unless one is already queued.
    fn on_viewport(&self, viewport: Viewport) {
        let mut inner = self.inner.borrow_mut();
        inner.viewport = viewport;
        if inner.frame.as_ref().is_some_and(TimerHandle::is_pending) {
            return;
        }

        let weak: Weak<RefCell<TrackerInner>> = Rc::downgrade(&self.inner);
        let frame_interval = inner.options.frame_interval;
        inner.frame = Some(self.scheduler.set_timeout(frame_interval, move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let mut inner = inner.borrow_mut();
            inner.recompute();
            let finished = inner.frame.take();
            tracing::trace!(
                progress = inner.snapshot.progress.percent(),
                visible = inner.snapshot.visible,
                "Scroll progress recomputed"
            );
            drop(inner);
            drop(finished);
        }));
    }

    #[must_use]
    pub fn progress(&self) -> ScrollProgress {
        self.inner.borrow().snapshot.progress
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.inner.borrow().snapshot.visible
    }

    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        self.inner.borrow().snapshot
    }

    /// How many times the snapshot has been computed, including on mount.
    #[must_use]
    pub fn recomputations(&self) -> usize {
        self.inner.borrow().recomputations
    }

    /// Removes the indicator, dropping any queued frame.
    pub fn unmount(self) {
        drop(self);
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    const VIEWPORT: Viewport = Viewport::new(0.0, 1000.0, 800.0, 4000.0);
    const FRAME: Duration = Duration::from_millis(16);

    #[rstest]
    #[case::top(0.0, 0.0)]
    #[case::half(1600.0, 50.0)]
    #[case::bottom(3200.0, 100.0)]
    #[case::overscroll(4000.0, 100.0)]
    #[case::rubber_band(-40.0, 0.0)]
    fn progress_is_clamped_percentage(#[case] scroll_y: f64, #[case] expected: f64) {
        let progress = compute_scroll_progress(&VIEWPORT.scrolled_to(scroll_y));

        assert_that!(progress.percent(), approx_eq(expected));
    }

    #[rstest]
    fn progress_stays_in_range_for_every_offset() {
        for step in 0..=40 {
            let scroll_y = f64::from(step) * 100.0;
            let percent = compute_scroll_progress(&VIEWPORT.scrolled_to(scroll_y)).percent();
            assert!((0.0..=100.0).contains(&percent), "{scroll_y} -> {percent}");
        }
    }

    #[rstest]
    #[case::equal_height(Viewport::new(0.0, 1000.0, 800.0, 800.0))]
    #[case::short_document(Viewport::new(120.0, 1000.0, 800.0, 500.0))]
    fn no_overflow_means_zero_and_hidden(#[case] viewport: Viewport) {
        let snapshot = ProgressSnapshot::compute(&viewport, 50.0);

        assert_that!(snapshot.progress, eq(ScrollProgress::ZERO));
        assert_that!(snapshot.visible, eq(false));
    }

    #[rstest]
    fn rounded_percent() {
        let progress = compute_scroll_progress(&VIEWPORT.scrolled_to(1601.0));

        assert_that!(progress.rounded(), eq(50));
    }

    #[googletest::test]
    fn indicator_toggles_both_ways() {
        let scheduler = Scheduler::new();
        let tracker = ScrollProgressTracker::mount(&scheduler, VIEWPORT, ProgressOptions::default());
        expect_that!(tracker.is_visible(), eq(false));

        tracker.on_scroll(51.0);
        scheduler.advance(FRAME);
        expect_that!(tracker.is_visible(), eq(true));

        tracker.on_scroll(50.0);
        scheduler.advance(FRAME);
        expect_that!(tracker.is_visible(), eq(false));
    }

    #[googletest::test]
    fn scroll_events_within_a_frame_are_coalesced() {
        let scheduler = Scheduler::new();
        let tracker = ScrollProgressTracker::mount(&scheduler, VIEWPORT, ProgressOptions::default());
        expect_that!(tracker.recomputations(), eq(1));

        for scroll_y in [100.0, 400.0, 900.0, 1600.0] {
            tracker.on_scroll(scroll_y);
        }
        expect_that!(tracker.recomputations(), eq(1));
        expect_that!(scheduler.pending(), eq(1));

        scheduler.advance(FRAME);

        expect_that!(tracker.recomputations(), eq(2));
        expect_that!(tracker.progress().percent(), approx_eq(50.0));
    }

    #[googletest::test]
    fn resize_recomputes_against_new_document_height() {
        let scheduler = Scheduler::new();
        let tracker = ScrollProgressTracker::mount(
            &scheduler,
            VIEWPORT.scrolled_to(800.0),
            ProgressOptions::default(),
        );
        expect_that!(tracker.progress().percent(), approx_eq(25.0));

        tracker.on_resize(1000.0, 800.0, 2400.0);
        scheduler.advance(FRAME);

        expect_that!(tracker.progress().percent(), approx_eq(50.0));

        tracker.on_resize(1000.0, 800.0, 600.0);
        scheduler.advance(FRAME);

        expect_that!(tracker.snapshot(), eq(ProgressSnapshot::default()));
    }

    #[googletest::test]
    fn unmount_drops_queued_frame() {
        let scheduler = Scheduler::new();
        let tracker = ScrollProgressTracker::mount(&scheduler, VIEWPORT, ProgressOptions::default());

        tracker.on_scroll(1600.0);
        tracker.unmount();

        expect_that!(scheduler.pending(), eq(0));
        expect_that!(scheduler.advance(FRAME), eq(0));
    }
}
