//! アニメーション要素ごとの表示設定 (しきい値・マージン・遅延)

use std::time::Duration;

use super::RevealConfig;
use crate::viewport::RootMargin;

/// Kinds of elements that reveal on scroll. Indexed variants are staggered
/// siblings; the index is the element's position in its list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RevealPreset {
    SectionHeader,
    AboutCard(u32),
    ProjectCard(u32),
    SkillCategory(u32),
    SkillItem(u32),
    TimelineItem(u32),
    ExperienceStats,
}

impl RevealPreset {
    #[must_use]
    pub const fn config(self) -> RevealConfig {
        match self {
            Self::SectionHeader => RevealConfig::new(0.2, Duration::ZERO),
            Self::AboutCard(index) => RevealConfig::new(0.3, stagger(index, 200))
                .with_root_margin(RootMargin::new(0.0, 0.0, -50.0, 0.0)),
            Self::ProjectCard(index) | Self::SkillCategory(index) => {
                RevealConfig::new(0.3, stagger(index, 200))
            }
            Self::SkillItem(index) => RevealConfig::new(0.5, stagger(index, 100)),
            Self::TimelineItem(index) => RevealConfig::new(0.3, stagger(index, 300)),
            Self::ExperienceStats => RevealConfig::new(0.5, Duration::ZERO),
        }
    }
}

/// Start delay of the hero stat at `index`.
#[must_use]
pub const fn hero_stat_delay(index: u32) -> Duration {
    stagger(index, 200)
}

const fn stagger(index: u32, step_ms: u64) -> Duration {
    Duration::from_millis(index as u64 * step_ms)
}
