//! プロジェクト一覧のカテゴリフィルター

use serde::Serialize;

use crate::i18n::Language;

/// Kind of engagement a project belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ProjectCategory {
    Migration,
    Deployment,
    Optimization,
    Integration,
}

impl ProjectCategory {
    #[must_use]
    pub const fn label(self, language: Language) -> &'static str {
        match (self, language) {
            (Self::Migration, _) => "Migration",
            (Self::Deployment, Language::En) => "Deployment",
            (Self::Deployment, Language::Fr) => "Déploiement",
            (Self::Optimization, Language::En) => "Optimization",
            (Self::Optimization, Language::Fr) => "Optimisation",
            (Self::Integration, Language::En) => "Integration",
            (Self::Integration, Language::Fr) => "Intégration",
        }
    }
}

/// Showcased projects, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ProjectId {
    Hemap,
    Multicountry,
    Pharmacy,
    Surveillance,
}

impl ProjectId {
    pub const ALL: [Self; 4] = [Self::Hemap, Self::Multicountry, Self::Pharmacy, Self::Surveillance];

    #[must_use]
    pub const fn category(self) -> ProjectCategory {
        match self {
            Self::Hemap => ProjectCategory::Migration,
            Self::Multicountry => ProjectCategory::Deployment,
            Self::Pharmacy => ProjectCategory::Optimization,
            Self::Surveillance => ProjectCategory::Integration,
        }
    }
}

/// Filter button state. Starts on [`ProjectFilter::All`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ProjectFilter {
    #[default]
    All,
    Category(ProjectCategory),
}

impl ProjectFilter {
    /// Buttons shown above the grid: `All`, then each category in order of
    /// first appearance.
    #[must_use]
    pub fn options() -> Vec<Self> {
        let mut options = vec![Self::All];
        for project in ProjectId::ALL {
            let option = Self::Category(project.category());
            if !options.contains(&option) {
                options.push(option);
            }
        }
        options
    }

    #[must_use]
    pub const fn label(self, language: Language) -> &'static str {
        match (self, language) {
            (Self::All, Language::En) => "All",
            (Self::All, Language::Fr) => "Tous",
            (Self::Category(category), _) => category.label(language),
        }
    }

    #[must_use]
    pub const fn matches(self, project: ProjectId) -> bool {
        match self {
            Self::All => true,
            Self::Category(category) => category as u8 == project.category() as u8,
        }
    }

    /// Projects shown under this filter, in display order.
    #[must_use]
    pub fn visible_projects(self) -> Vec<ProjectId> {
        ProjectId::ALL.into_iter().filter(|project| self.matches(*project)).collect()
    }
}
