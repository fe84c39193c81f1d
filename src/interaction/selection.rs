//! クリックで開閉する単一選択 (プロジェクト・スキル・経歴カード)

use serde::Serialize;

/// At most one expanded item. Clicking the expanded item collapses it;
/// clicking another one moves the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Selection<T> {
    active: Option<T>,
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Self { active: None }
    }
}

impl<T: Copy + PartialEq> Selection<T> {
    /// Returns the item expanded afterwards.
    pub fn toggle(&mut self, item: T) -> Option<T> {
        self.active = if self.active == Some(item) { None } else { Some(item) };
        self.active
    }

    #[must_use]
    pub const fn active(&self) -> Option<T> {
        self.active
    }

    #[must_use]
    pub fn is_active(&self, item: T) -> bool {
        self.active == Some(item)
    }

    pub const fn clear(&mut self) {
        self.active = None;
    }
}
