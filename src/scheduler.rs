//! シングルスレッドの仮想時間タイマーキュー
//!
//! ページの遅延処理 (表示遅延、タイピング、カーソル点滅、フレーム単位の
//! スクロール再計算) はすべて [`Scheduler`] 上のタイマー。時間は
//! [`Scheduler::advance`] を呼んだときだけ進むので、テストでアニメーションを
//! 決定的に進められる。
//!
//! タイマーは [`TimerHandle`] で解放する。ハンドルを drop / cancel すれば
//! コールバックは二度と呼ばれない。
//!
//! 時刻は [`Duration::MAX`] で飽和する。次の周期がそれを超える
//! 繰り返しタイマーは終了する。

use std::cell::RefCell;
use std::collections::{
    BTreeMap,
    HashMap,
};
use std::fmt;
use std::ops::ControlFlow;
use std::rc::{
    Rc,
    Weak,
};
use std::time::Duration;

/// Ticks a single repeating timer may run within one [`Scheduler::advance`].
/// Further missed ticks are dropped and the timer resumes one period after
/// the window.
const MAX_CATCH_UP_TICKS: u32 = 1024;

/// Identifies one scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Callback of a timer.
enum Task {
    /// Runs once
    Once(Box<dyn FnOnce()>),
    /// Runs every `period` until it breaks or is cancelled
    Repeat { period: Duration, callback: Box<dyn FnMut() -> ControlFlow<()>> },
}

/// Shared queue state.
#[derive(Default)]
struct SchedulerInner {
    /// Current virtual time
    now: Duration,
    /// Next id to hand out
    next_id: u64,
    /// Pending tasks ordered by due time, then registration order
    queue: BTreeMap<(Duration, TimerId), Task>,
    /// Live timers and their next due time
    live: HashMap<TimerId, Duration>,
}

/// Cooperative timer queue driven by virtual time.
///
/// Cloning yields another handle to the same queue.
#[derive(Clone, Default)]
pub struct Scheduler {
    /// Shared queue
    inner: Rc<RefCell<SchedulerInner>>,
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Scheduler")
            .field("now", &inner.now)
            .field("pending", &inner.live.len())
            .finish()
    }
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time since the scheduler was created.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    /// Number of timers that may still fire.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inner.borrow().live.len()
    }

    /// Runs `callback` once after `delay`.
    #[must_use = "dropping the handle cancels the timer"]
    pub fn set_timeout(&self, delay: Duration, callback: impl FnOnce() + 'static) -> TimerHandle {
        self.schedule(delay, Task::Once(Box::new(callback)))
    }

    /// Runs `callback` every `period` until it returns
    /// [`ControlFlow::Break`] or the handle is released.
    ///
    /// A zero period is treated as one millisecond.
    #[must_use = "dropping the handle cancels the timer"]
    pub fn set_interval(
        &self,
        period: Duration,
        callback: impl FnMut() -> ControlFlow<()> + 'static,
    ) -> TimerHandle {
        let period = period.max(Duration::from_millis(1));
        self.schedule(period, Task::Repeat { period, callback: Box::new(callback) })
    }

    /// Enqueues `task` after `delay`.
    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle {
        let mut inner = self.inner.borrow_mut();
        let id = TimerId(inner.next_id);
        inner.next_id += 1;
        let due = inner.now.saturating_add(delay);
        inner.queue.insert((due, id), task);
        inner.live.insert(id, due);
        drop(inner);

        TimerHandle { id, scheduler: Rc::downgrade(&self.inner) }
    }

    /// Moves virtual time forward by `by`, running every timer that falls
    /// due, in due-time order. Returns the number of callbacks run.
    ///
    /// Callbacks may schedule or cancel timers; anything that becomes due
    /// within the window runs in the same call.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now().saturating_add(by);
        let mut fired = 0;
        let mut ticks: HashMap<TimerId, u32> = HashMap::new();

        while let Some((due, id, task)) = self.pop_due(target) {
            fired += 1;
            match task {
                Task::Once(callback) => {
                    self.inner.borrow_mut().live.remove(&id);
                    callback();
                }
                Task::Repeat { period, mut callback } => {
                    let flow = callback();
                    let count = ticks.entry(id).or_default();
                    *count += 1;
                    let next = if *count >= MAX_CATCH_UP_TICKS {
                        target.checked_add(period)
                    } else {
                        due.checked_add(period)
                    };

                    let mut inner = self.inner.borrow_mut();
                    // A callback may have cancelled its own timer.
                    match next {
                        Some(next) if flow.is_continue() && inner.live.contains_key(&id) => {
                            inner.queue.insert((next, id), Task::Repeat { period, callback });
                            inner.live.insert(id, next);
                        }
                        _ => {
                            inner.live.remove(&id);
                            drop(inner);
                            drop(callback);
                        }
                    }
                }
            }
        }

        self.inner.borrow_mut().now = target;
        fired
    }

    /// Runs timers already due without moving time.
    pub fn run_due(&self) -> usize {
        self.advance(Duration::ZERO)
    }

    /// Removes the earliest task due at or before `target` and moves the
    /// clock to its due time.
    fn pop_due(&self, target: Duration) -> Option<(Duration, TimerId, Task)> {
        let mut inner = self.inner.borrow_mut();
        let (&(due, id), _) = inner.queue.first_key_value()?;
        if due > target {
            return None;
        }
        let task = inner.queue.remove(&(due, id))?;
        inner.now = inner.now.max(due);
        Some((due, id, task))
    }
}

/// Releases its timer when cancelled or dropped.
#[must_use = "dropping the handle cancels the timer"]
pub struct TimerHandle {
    /// Timer to release
    id: TimerId,
    /// Owning queue; gone once the scheduler itself is dropped
    scheduler: Weak<RefCell<SchedulerInner>>,
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle").field("id", &self.id).finish_non_exhaustive()
    }
}

impl TimerHandle {
    #[must_use]
    pub const fn id(&self) -> TimerId {
        self.id
    }

    /// Whether the timer can still fire.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.scheduler
            .upgrade()
            .is_some_and(|inner| inner.borrow().live.contains_key(&self.id))
    }

    /// Cancels the timer. Equivalent to dropping the handle.
    pub fn cancel(self) {
        drop(self);
    }

    /// Removes the timer from its queue, if both still exist.
    fn release(&self) {
        let Some(inner) = self.scheduler.upgrade() else {
            return;
        };
        let Ok(mut guard) = inner.try_borrow_mut() else {
            tracing::warn!(id = ?self.id, "Timer released while the queue was borrowed");
            return;
        };
        let removed =
            guard.live.remove(&self.id).and_then(|due| guard.queue.remove(&(due, self.id)));
        drop(guard);
        // Tasks may own other handles, so they are dropped outside the borrow.
        drop(removed);
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use googletest::prelude::*;

    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[googletest::test]
    fn timeout_fires_once_when_due() {
        let scheduler = Scheduler::new();
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let _handle = scheduler.set_timeout(ms(100), move || counter.set(counter.get() + 1));

        scheduler.advance(ms(99));
        expect_that!(count.get(), eq(0));

        scheduler.advance(ms(1));
        expect_that!(count.get(), eq(1));

        scheduler.advance(ms(1000));
        expect_that!(count.get(), eq(1));
        expect_that!(scheduler.pending(), eq(0));
    }

    #[googletest::test]
    fn zero_delay_runs_on_next_turn() {
        let scheduler = Scheduler::new();
        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);
        let _handle = scheduler.set_timeout(Duration::ZERO, move || flag.set(true));

        expect_that!(fired.get(), eq(false));
        expect_that!(scheduler.run_due(), eq(1));
        expect_that!(fired.get(), eq(true));
    }

    #[googletest::test]
    fn dropping_handle_cancels() {
        let scheduler = Scheduler::new();
        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);
        let handle = scheduler.set_timeout(ms(10), move || flag.set(true));

        drop(handle);
        scheduler.advance(ms(100));

        expect_that!(fired.get(), eq(false));
        expect_that!(scheduler.pending(), eq(0));
    }

    #[googletest::test]
    fn timers_fire_in_due_order() {
        let scheduler = Scheduler::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut handles = Vec::new();
        for (label, delay) in [("c", 300), ("a", 100), ("b", 200), ("a2", 100)] {
            let order = Rc::clone(&order);
            handles.push(scheduler.set_timeout(ms(delay), move || order.borrow_mut().push(label)));
        }

        scheduler.advance(ms(300));

        assert_eq!(*order.borrow(), vec!["a", "a2", "b", "c"]);
    }

    #[googletest::test]
    fn interval_repeats_until_break() {
        let scheduler = Scheduler::new();
        let ticks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&ticks);
        let handle = scheduler.set_interval(ms(50), move || {
            counter.set(counter.get() + 1);
            if counter.get() == 3 { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
        });

        scheduler.advance(ms(120));
        expect_that!(ticks.get(), eq(2));

        scheduler.advance(ms(1000));
        expect_that!(ticks.get(), eq(3));
        expect_that!(handle.is_pending(), eq(false));
    }

    #[googletest::test]
    fn callbacks_can_schedule_more_work_in_same_window() {
        let scheduler = Scheduler::new();
        let fired_at = Rc::new(Cell::new(None));
        let slot = Rc::new(RefCell::new(None));

        let inner_scheduler = scheduler.clone();
        let inner_fired = Rc::clone(&fired_at);
        let inner_slot = Rc::clone(&slot);
        let _outer = scheduler.set_timeout(ms(10), move || {
            let at = inner_scheduler.clone();
            let handle =
                inner_scheduler.set_timeout(ms(5), move || inner_fired.set(Some(at.now())));
            *inner_slot.borrow_mut() = Some(handle);
        });

        scheduler.advance(ms(20));

        expect_that!(fired_at.get(), some(eq(ms(15))));
        expect_that!(scheduler.now(), eq(ms(20)));
    }

    #[googletest::test]
    fn interval_can_cancel_itself_through_its_handle() {
        let scheduler = Scheduler::new();
        let slot: Rc<RefCell<Option<TimerHandle>>> = Rc::new(RefCell::new(None));
        let ticks = Rc::new(Cell::new(0));

        let counter = Rc::clone(&ticks);
        let own = Rc::clone(&slot);
        let handle = scheduler.set_interval(ms(10), move || {
            counter.set(counter.get() + 1);
            own.borrow_mut().take();
            ControlFlow::Continue(())
        });
        *slot.borrow_mut() = Some(handle);

        scheduler.advance(ms(100));

        expect_that!(ticks.get(), eq(1));
        expect_that!(scheduler.pending(), eq(0));
    }

    #[googletest::test]
    fn advance_saturates_at_end_of_time() {
        let scheduler = Scheduler::new();
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);
        let _late = scheduler.set_timeout(ms(10), move || counter.set(counter.get() + 1));

        scheduler.advance(ms(5));
        scheduler.advance(Duration::MAX);

        expect_that!(scheduler.now(), eq(Duration::MAX));
        expect_that!(fired.get(), eq(1));

        let counter = Rc::clone(&fired);
        let _after = scheduler.set_timeout(ms(10), move || counter.set(counter.get() + 1));
        scheduler.advance(ms(10));
        expect_that!(fired.get(), eq(2));
    }

    #[googletest::test]
    fn endless_interval_is_bounded_within_one_window() {
        let scheduler = Scheduler::new();
        let ticks = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&ticks);
        let handle = scheduler.set_interval(ms(500), move || {
            counter.set(counter.get() + 1);
            ControlFlow::Continue(())
        });

        scheduler.advance(Duration::MAX);

        expect_that!(ticks.get(), eq(MAX_CATCH_UP_TICKS));
        expect_that!(handle.is_pending(), eq(false));
    }

    #[googletest::test]
    fn missed_ticks_beyond_catch_up_are_dropped() {
        let scheduler = Scheduler::new();
        let ticks = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&ticks);
        let _handle = scheduler.set_interval(ms(1), move || {
            counter.set(counter.get() + 1);
            ControlFlow::Continue(())
        });

        scheduler.advance(ms(5000));
        expect_that!(ticks.get(), eq(MAX_CATCH_UP_TICKS));

        scheduler.advance(ms(1));
        expect_that!(ticks.get(), eq(MAX_CATCH_UP_TICKS + 1));
    }
}
