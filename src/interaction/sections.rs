//! About タブ、スキルカテゴリ、経歴エントリの識別子

use serde::Serialize;

use crate::i18n::Language;

/// Tabs of the About section. Starts on [`AboutTab::Overview`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AboutTab {
    #[default]
    Overview,
    Journey,
    Values,
}

impl AboutTab {
    pub const ALL: [Self; 3] = [Self::Overview, Self::Journey, Self::Values];

    #[must_use]
    pub const fn label(self, language: Language) -> &'static str {
        match (self, language) {
            (Self::Overview, Language::En) => "Professional Overview",
            (Self::Overview, Language::Fr) => "Vue d'ensemble",
            (Self::Journey, Language::En) => "My Journey",
            (Self::Journey, Language::Fr) => "Mon Parcours",
            (Self::Values, Language::En) => "My Values",
            (Self::Values, Language::Fr) => "Mes Valeurs",
        }
    }
}

/// Skill category cards, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SkillCategoryId {
    Health,
    Cloud,
    Data,
    Development,
}

impl SkillCategoryId {
    pub const ALL: [Self; 4] = [Self::Health, Self::Cloud, Self::Data, Self::Development];

    #[must_use]
    pub const fn title_key(self) -> &'static str {
        match self {
            Self::Health => "skills.health.title",
            Self::Cloud => "skills.cloud.title",
            Self::Data => "skills.data.title",
            Self::Development => "skills.development.title",
        }
    }
}

/// Experience timeline entries, most recent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ExperienceId {
    Icrc,
    It4life,
    Rti,
}

impl ExperienceId {
    pub const ALL: [Self; 3] = [Self::Icrc, Self::It4life, Self::Rti];

    #[must_use]
    pub const fn title_key(self) -> &'static str {
        match self {
            Self::Icrc => "experience.icrc.title",
            Self::It4life => "experience.it4life.title",
            Self::Rti => "experience.rti.title",
        }
    }
}
