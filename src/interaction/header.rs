//! ヘッダーの状態: スクロール済みフラグとモバイルメニュー

use serde::Serialize;

/// Scroll offset (px) past which the header switches to its compact style.
pub const HEADER_SCROLL_OFFSET: f64 = 100.0;

/// Height (px) kept clear above a section when navigating to it.
pub const HEADER_HEIGHT: f64 = 80.0;

/// Sticky header.
///
/// `scrolled` is re-evaluated on every scroll event and toggles both ways.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderState {
    scrolled: bool,
    menu_open: bool,
}

impl HeaderState {
    /// Returns whether the scrolled flag changed.
    pub fn on_scroll(&mut self, scroll_y: f64) -> bool {
        let scrolled = scroll_y > HEADER_SCROLL_OFFSET;
        let changed = scrolled != self.scrolled;
        self.scrolled = scrolled;
        changed
    }

    #[must_use]
    pub const fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    #[must_use]
    pub const fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    /// Hamburger button.
    pub const fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }

    pub const fn close_menu(&mut self) {
        self.menu_open = false;
    }

    /// A click anywhere on the page. Clicks outside the navigation bar close
    /// the open menu.
    pub const fn on_click(&mut self, inside_navigation: bool) {
        if self.menu_open && !inside_navigation {
            self.menu_open = false;
        }
    }

    /// Scroll offset that brings a section starting at `section_top` just
    /// below the header. Closes the menu.
    pub fn navigation_target(&mut self, section_top: f64) -> f64 {
        self.menu_open = false;
        (section_top - HEADER_HEIGHT).max(0.0)
    }
}
