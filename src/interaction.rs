//! クリック・スクロールで切り替わる UI 状態
//!
//! ヘッダー、プロジェクトフィルター、カードの開閉、About タブ。
//! どれも同期的な状態遷移で、タイマーは持たない。

/// Sticky header
mod header;
/// Project catalogue and filter
mod projects;
/// Section item identifiers
mod sections;
/// Single expanded item
mod selection;

pub use header::{
    HEADER_HEIGHT,
    HEADER_SCROLL_OFFSET,
    HeaderState,
};
pub use projects::{
    ProjectCategory,
    ProjectFilter,
    ProjectId,
};
pub use sections::{
    AboutTab,
    ExperienceId,
    SkillCategoryId,
};
pub use selection::Selection;
use serde::Serialize;

/// Interactive state of every section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub header: HeaderState,
    pub about_tab: AboutTab,
    pub project_filter: ProjectFilter,
    /// Expanded project card
    pub active_project: Selection<ProjectId>,
    pub active_skill_category: Selection<SkillCategoryId>,
    pub active_experience: Selection<ExperienceId>,
}

impl ViewState {
    /// Projects shown under the current filter.
    #[must_use]
    pub fn visible_projects(&self) -> Vec<ProjectId> {
        self.project_filter.visible_projects()
    }

    /// Changes the project filter. An expanded project hidden by the new
    /// filter stays selected and expands again when shown.
    pub fn set_project_filter(&mut self, filter: ProjectFilter) {
        self.project_filter = filter;
        tracing::debug!(?filter, "Project filter changed");
    }

    pub fn toggle_project(&mut self, project: ProjectId) -> Option<ProjectId> {
        self.active_project.toggle(project)
    }

    pub fn toggle_skill_category(&mut self, category: SkillCategoryId) -> Option<SkillCategoryId> {
        self.active_skill_category.toggle(category)
    }

    pub fn toggle_experience(&mut self, experience: ExperienceId) -> Option<ExperienceId> {
        self.active_experience.toggle(experience)
    }

    pub const fn select_about_tab(&mut self, tab: AboutTab) {
        self.about_tab = tab;
    }
}
