//! タイピング表示のサブタイトルと点滅カーソル

use std::cell::RefCell;
use std::ops::ControlFlow;
use std::rc::{
    Rc,
    Weak,
};
use std::time::Duration;

use crate::scheduler::{
    Scheduler,
    TimerHandle,
};

/// Timing of [`TypedText`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingOptions {
    /// Time between two revealed characters
    pub char_interval: Duration,
    /// Half period of the cursor blink
    pub cursor_blink: Duration,
}

impl Default for TypingOptions {
    fn default() -> Self {
        Self { char_interval: Duration::from_millis(50), cursor_blink: Duration::from_millis(500) }
    }
}

#[derive(Debug)]
struct TypingInner {
    source: Vec<char>,
    /// Number of characters shown so far
    shown: usize,
    is_typing: bool,
    /// Blink phase
    cursor_on: bool,
    typing: Option<TimerHandle>,
}

/// Reveals a fixed string one character at a time.
///
/// The cursor blinks on its own timer for as long as the text is mounted and
/// is always shown while typing.
#[derive(Debug)]
pub struct TypedText {
    inner: Rc<RefCell<TypingInner>>,
    scheduler: Scheduler,
    options: TypingOptions,
    /// Blink timer, released with the text
    _cursor: TimerHandle,
}

impl TypedText {
    /// Mounts `text` and starts typing from empty.
    #[must_use]
    pub fn mount(scheduler: &Scheduler, text: &str, options: TypingOptions) -> Self {
        let inner = Rc::new(RefCell::new(TypingInner {
            source: Vec::new(),
            shown: 0,
            is_typing: false,
            cursor_on: true,
            typing: None,
        }));

        let weak = Rc::downgrade(&inner);
        let cursor = scheduler.set_interval(options.cursor_blink, move || {
            let Some(inner) = weak.upgrade() else {
                return ControlFlow::Break(());
            };
            let mut inner = inner.borrow_mut();
            inner.cursor_on = !inner.cursor_on;
            ControlFlow::Continue(())
        });

        let typed = Self { inner, scheduler: scheduler.clone(), options, _cursor: cursor };
        typed.retype(text);
        typed
    }

    /// Restarts typing with `text`, discarding the current progress.
    pub fn retype(&self, text: &str) {
        let typing = start_typing(&self.scheduler, Rc::downgrade(&self.inner), self.options);

        let mut inner = self.inner.borrow_mut();
        inner.source = text.chars().collect();
        inner.shown = 0;
        inner.is_typing = true;
        let previous = inner.typing.replace(typing);
        drop(inner);
        drop(previous);

        tracing::trace!(chars = text.chars().count(), "Typing started");
    }

    /// Characters typed so far.
    #[must_use]
    pub fn displayed(&self) -> String {
        let inner = self.inner.borrow();
        inner.source.iter().take(inner.shown).collect()
    }

    /// Full text being typed.
    #[must_use]
    pub fn source(&self) -> String {
        self.inner.borrow().source.iter().collect()
    }

    #[must_use]
    pub fn is_typing(&self) -> bool {
        self.inner.borrow().is_typing
    }

    #[must_use]
    pub fn cursor_visible(&self) -> bool {
        let inner = self.inner.borrow();
        inner.is_typing || inner.cursor_on
    }

    pub fn unmount(self) {
        drop(self);
    }
}

/// One character per tick; the tick after the last character ends typing.
fn start_typing(
    scheduler: &Scheduler,
    weak: Weak<RefCell<TypingInner>>,
    options: TypingOptions,
) -> TimerHandle {
    scheduler.set_interval(options.char_interval, move || {
        let Some(inner) = weak.upgrade() else {
            return ControlFlow::Break(());
        };
        let mut inner = inner.borrow_mut();
        if inner.shown < inner.source.len() {
            inner.shown += 1;
            return ControlFlow::Continue(());
        }
        inner.is_typing = false;
        tracing::trace!("Typing finished");
        ControlFlow::Break(())
    })
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[googletest::test]
    fn reveals_one_character_per_tick() {
        let scheduler = Scheduler::new();
        let text = TypedText::mount(&scheduler, "Hi!", TypingOptions::default());

        let mut frames = vec![text.displayed()];
        for _ in 0..3 {
            scheduler.advance(ms(50));
            frames.push(text.displayed());
        }

        assert_eq!(frames, vec!["", "H", "Hi", "Hi!"]);
        expect_that!(text.is_typing(), eq(true));

        scheduler.advance(ms(50));
        expect_that!(text.is_typing(), eq(false));
        expect_that!(text.displayed(), eq("Hi!"));
    }

    #[googletest::test]
    fn counts_characters_not_bytes() {
        let scheduler = Scheduler::new();
        let text = TypedText::mount(&scheduler, "Développeur", TypingOptions::default());

        scheduler.advance(ms(100));

        expect_that!(text.displayed(), eq("Dé"));
    }

    #[googletest::test]
    fn cursor_shown_while_typing_then_blinks() {
        let scheduler = Scheduler::new();
        let text = TypedText::mount(&scheduler, "ab", TypingOptions::default());

        expect_that!(text.cursor_visible(), eq(true));
        scheduler.advance(ms(150));
        expect_that!(text.is_typing(), eq(false));
        expect_that!(text.cursor_visible(), eq(true));

        scheduler.advance(ms(350));
        expect_that!(text.cursor_visible(), eq(false));
        scheduler.advance(ms(500));
        expect_that!(text.cursor_visible(), eq(true));
        scheduler.advance(ms(500));
        expect_that!(text.cursor_visible(), eq(false));
    }

    #[googletest::test]
    fn retype_restarts_from_empty() {
        let scheduler = Scheduler::new();
        let text = TypedText::mount(&scheduler, "Developer", TypingOptions::default());
        scheduler.advance(ms(200));
        expect_that!(text.displayed(), eq("Deve"));

        text.retype("Dev");
        expect_that!(text.displayed(), eq(""));
        expect_that!(text.source(), eq("Dev"));

        scheduler.advance(ms(50));
        expect_that!(text.displayed(), eq("D"));
        // Old typing timer plus new one would have advanced two characters.
        expect_that!(scheduler.pending(), eq(2));
    }

    #[googletest::test]
    fn empty_text_finishes_on_first_tick() {
        let scheduler = Scheduler::new();
        let text = TypedText::mount(&scheduler, "", TypingOptions::default());

        expect_that!(text.is_typing(), eq(true));
        scheduler.advance(ms(50));
        expect_that!(text.is_typing(), eq(false));
    }

    #[googletest::test]
    fn unmount_releases_both_timers() {
        let scheduler = Scheduler::new();
        let text = TypedText::mount(&scheduler, "Hello", TypingOptions::default());
        expect_that!(scheduler.pending(), eq(2));

        text.unmount();

        expect_that!(scheduler.pending(), eq(0));
    }
}
