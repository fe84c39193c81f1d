//! ヒーローの実績カウンター: 遅延のあと `"9+"` を `0+`, `1+`, … と数え上げる

use std::cell::RefCell;
use std::ops::ControlFlow;
use std::rc::Rc;
use std::time::Duration;

use crate::scheduler::{
    Scheduler,
    TimerHandle,
};

/// Animation of [`StatCounter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterOptions {
    /// Number of ticks from zero to the target
    pub steps: u32,
    pub tick: Duration,
}

impl Default for CounterOptions {
    fn default() -> Self {
        Self { steps: 20, tick: Duration::from_millis(50) }
    }
}

#[derive(Debug)]
struct CounterInner {
    /// Text shown once counting ends
    source: String,
    target: u64,
    /// Everything in `source` that is not a digit
    suffix: String,
    display: String,
    visible: bool,
    ticks: u32,
    counting: Option<TimerHandle>,
}

impl CounterInner {
    fn tick(&mut self, steps: u32) -> ControlFlow<()> {
        self.ticks += 1;
        let current = self.target.saturating_mul(u64::from(self.ticks)) / u64::from(steps);
        if current >= self.target {
            self.display.clone_from(&self.source);
            return ControlFlow::Break(());
        }
        self.display = format!("{current}{}", self.suffix);
        ControlFlow::Continue(())
    }
}

/// A stat that appears after `delay` and counts up to its number.
#[derive(Debug)]
pub struct StatCounter {
    inner: Rc<RefCell<CounterInner>>,
    /// Stagger delay
    _start: TimerHandle,
}

impl StatCounter {
    /// Mounts a counter for `number` (e.g. `"100+"`).
    ///
    /// A number without digits counts as zero and shows its text on the
    /// first tick.
    #[must_use]
    pub fn mount(
        scheduler: &Scheduler,
        number: &str,
        delay: Duration,
        options: CounterOptions,
    ) -> Self {
        let digits: String = number.chars().filter(char::is_ascii_digit).collect();
        let target = digits.parse::<u64>().unwrap_or(0);
        let suffix: String = number.chars().filter(|c| !c.is_ascii_digit()).collect();
        let steps = options.steps.max(1);

        let inner = Rc::new(RefCell::new(CounterInner {
            source: number.to_string(),
            target,
            suffix,
            display: "0".to_string(),
            visible: false,
            ticks: 0,
            counting: None,
        }));

        let weak = Rc::downgrade(&inner);
        let ticker = scheduler.clone();
        let start = scheduler.set_timeout(delay, move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            inner.borrow_mut().visible = true;

            let tick_weak = Rc::downgrade(&inner);
            let counting = ticker.set_interval(options.tick, move || {
                let Some(inner) = tick_weak.upgrade() else {
                    return ControlFlow::Break(());
                };
                inner.borrow_mut().tick(steps)
            });
            inner.borrow_mut().counting = Some(counting);
            tracing::trace!(target_value = target, "Stat counter started");
        });

        Self { inner, _start: start }
    }

    #[must_use]
    pub fn display(&self) -> String {
        self.inner.borrow().display.clone()
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.inner.borrow().visible
    }

    /// Whether the count-up is still running.
    #[must_use]
    pub fn is_counting(&self) -> bool {
        self.inner.borrow().counting.as_ref().is_some_and(TimerHandle::is_pending)
    }

    pub fn unmount(self) {
        drop(self);
    }
}
