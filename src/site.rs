//! ページの組み立て: ローカライズストア、タイマーキュー、ビューポート監視を
//! マウントされた各セクションに結びつける

use std::time::Duration;

use serde::{
    Deserialize,
    Serialize,
};

use crate::config::{
    ConfigError,
    ConfigManager,
    SettingsChanges,
    SiteSettings,
};
use crate::contact::{
    ContactFormState,
    OutboundLink,
    SubmissionStatus,
    outbound_links,
};
use crate::i18n::coverage::{
    MissingTranslation,
    check_keys,
};
use crate::i18n::{
    Context,
    ContextError,
    Dictionary,
    Language,
    LanguageOption,
    LanguageReceiver,
    LocalizationStore,
};
use crate::interaction::{
    ProjectId,
    ViewState,
};
use crate::scheduler::Scheduler;
use crate::viewport::{
    Rect,
    Viewport,
};
use crate::visibility::{
    ProgressSnapshot,
    Reveal,
    RevealPreset,
    ScrollProgressTracker,
    StatCounter,
    TypedText,
    ViewportObserver,
    hero_stat_delay,
};

/// Viewport assumed until the first resize.
pub const DEFAULT_VIEWPORT: Viewport = Viewport::new(0.0, 1280.0, 800.0, 800.0);

/// Hero stats: displayed number and label key.
const HERO_STATS: [(&str, &str); 4] = [
    ("9+", "hero.stats.years"),
    ("11+", "hero.stats.countries"),
    ("100+", "hero.stats.facilities"),
    ("3", "hero.stats.organizations"),
];

/// Every key the page translates, section by section.
const USED_KEYS: &[&str] = &[
    "nav.home",
    "nav.about",
    "nav.projects",
    "nav.skills",
    "nav.experience",
    "nav.contact",
    "hero.title",
    "hero.subtitle",
    "hero.description",
    "hero.cta.work",
    "hero.cta.contact",
    "hero.stats.years",
    "hero.stats.countries",
    "hero.stats.facilities",
    "hero.stats.organizations",
    "about.title",
    "about.who.title",
    "about.who.description",
    "about.what.title",
    "about.what.description",
    "about.impact.title",
    "about.impact.description",
    "projects.title",
    "projects.hemap.title",
    "projects.hemap.subtitle",
    "projects.hemap.challenge",
    "projects.hemap.solution",
    "projects.hemap.impact",
    "projects.pharmacy.title",
    "projects.pharmacy.subtitle",
    "projects.pharmacy.challenge",
    "projects.pharmacy.solution",
    "projects.pharmacy.impact",
    "projects.multicountry.title",
    "projects.multicountry.subtitle",
    "projects.multicountry.challenge",
    "projects.multicountry.solution",
    "projects.multicountry.impact",
    "common.challenge",
    "common.solution",
    "common.impact",
    "skills.title",
    "skills.health.title",
    "skills.data.title",
    "skills.development.title",
    "skills.cloud.title",
    "experience.title",
    "experience.icrc.title",
    "experience.icrc.company",
    "experience.icrc.description",
    "experience.rti.title",
    "experience.rti.company",
    "experience.rti.description",
    "experience.it4life.title",
    "experience.it4life.company",
    "experience.it4life.description",
    "contact.title",
    "contact.description",
    "contact.email",
    "contact.phone",
    "contact.location",
    "contact.location.value",
    "contact.availability.value",
    "contact.form.name",
    "contact.form.email",
    "contact.form.company",
    "contact.form.projectType",
    "contact.form.budget",
    "contact.form.message",
    "contact.form.timeline",
    "contact.form.submit",
    "contact.form.sending",
    "contact.form.success",
    "contact.form.error",
    "contact.form.errors.required",
    "contact.form.errors.email",
    "contact.form.errors.tooShort",
];

/// Page sections in navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Section {
    Hero,
    About,
    Projects,
    Skills,
    Experience,
    Contact,
}

impl Section {
    pub const ALL: [Self; 6] =
        [Self::Hero, Self::About, Self::Projects, Self::Skills, Self::Experience, Self::Contact];

    /// Anchor id used by the navigation links.
    #[must_use]
    pub const fn anchor(self) -> &'static str {
        match self {
            Self::Hero => "home",
            Self::About => "about",
            Self::Projects => "projects",
            Self::Skills => "skills",
            Self::Experience => "experience",
            Self::Contact => "contact",
        }
    }

    #[must_use]
    pub const fn nav_key(self) -> &'static str {
        match self {
            Self::Hero => "nav.home",
            Self::About => "nav.about",
            Self::Projects => "nav.projects",
            Self::Skills => "nav.skills",
            Self::Experience => "nav.experience",
            Self::Contact => "nav.contact",
        }
    }
}

/// Top edge of a section, the navigation target of its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub section: Section,
    pub top: f64,
}

/// A section header box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeaderBox {
    pub section: Section,
    pub rect: Rect,
}

/// Boxes of every element that reveals on scroll, in document coordinates.
///
/// Lists are in display order; an element's position sets its stagger delay.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionLayout {
    pub document_height: f64,
    pub anchors: Vec<Anchor>,
    pub headers: Vec<HeaderBox>,
    pub about_cards: Vec<Rect>,
    pub project_cards: Vec<Rect>,
    pub skill_categories: Vec<Rect>,
    pub skill_items: Vec<Rect>,
    pub timeline_items: Vec<Rect>,
    pub experience_stats: Option<Rect>,
}

impl SectionLayout {
    /// Sections stacked top to bottom, each `section_height` tall, with the
    /// element counts of the portfolio (3 about cards, 4 projects, 4 skill
    /// categories with 4 items shown, 3 timeline entries).
    #[must_use]
    pub fn stacked(section_height: f64) -> Self {
        let top = |section: Section| f64::from(section as u8) * section_height;
        let row = |section: Section, offset: f64, count: u8, width: f64, height: f64| {
            (0..count)
                .map(|index| {
                    Rect::new(f64::from(index) * (width + 20.0), top(section) + offset, width, height)
                })
                .collect::<Vec<_>>()
        };

        Self {
            document_height: top(Section::Contact) + section_height,
            anchors: Section::ALL
                .into_iter()
                .map(|section| Anchor { section, top: top(section) })
                .collect(),
            headers: Section::ALL
                .into_iter()
                .filter(|section| *section != Section::Hero)
                .map(|section| HeaderBox {
                    section,
                    rect: Rect::new(0.0, top(section) + 80.0, 1200.0, 120.0),
                })
                .collect(),
            about_cards: row(Section::About, 260.0, 3, 380.0, 300.0),
            project_cards: row(Section::Projects, 260.0, 4, 280.0, 420.0),
            skill_categories: row(Section::Skills, 240.0, 4, 280.0, 60.0),
            skill_items: row(Section::Skills, 340.0, 4, 280.0, 80.0),
            timeline_items: (0..3u8)
                .map(|index| {
                    Rect::new(0.0, top(Section::Experience) + 240.0 + f64::from(index) * 160.0, 1200.0, 140.0)
                })
                .collect(),
            experience_stats: Some(Rect::new(0.0, top(Section::Experience) + 720.0, 1200.0, 100.0)),
        }
    }
}

/// Navigation link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub anchor: &'static str,
    pub label: String,
}

/// Rendered state of the page at one instant.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSnapshot {
    pub language: Language,
    pub languages: Vec<LanguageOption>,
    pub navigation: Vec<NavItem>,
    pub subtitle: String,
    pub stats: Vec<String>,
    pub progress: ProgressSnapshot,
    pub revealed: usize,
    pub mounted: usize,
    pub contact_status: SubmissionStatus,
    pub view: ViewState,
    pub visible_projects: Vec<ProjectId>,
    pub links: &'static [OutboundLink],
    pub missing_translations: Vec<MissingTranslation>,
}

/// The mounted page.
///
/// Dropping it (or calling [`Site::unmount`]) releases every observation and
/// timer it created.
#[derive(Debug)]
pub struct Site {
    config: ConfigManager,
    context: Context,
    store: LocalizationStore,
    language: LanguageReceiver,
    scheduler: Scheduler,
    observer: ViewportObserver,
    progress: ScrollProgressTracker,
    subtitle: TypedText,
    stats: Vec<StatCounter>,
    reveals: Vec<(RevealPreset, Reveal)>,
    /// Layout the reveals were mounted against
    layout: SectionLayout,
    view: ViewState,
    contact: ContactFormState,
}

impl Site {
    /// Builds the page with a store over `dictionary`, starting in the
    /// configured default language.
    #[must_use]
    pub fn new(config: ConfigManager, dictionary: Dictionary) -> Self {
        let store = LocalizationStore::new(dictionary, config.get_settings().default_language);
        Self::build(config, store)
    }

    /// Builds the page with the store provided by `context`.
    ///
    /// # Errors
    /// [`ContextError::MissingLocalization`] when `context` carries no store.
    pub fn mount(config: ConfigManager, context: &Context) -> Result<Self, ContextError> {
        let store = context.localization("Site")?.clone();
        Ok(Self::build(config, store))
    }

    fn build(config: ConfigManager, store: LocalizationStore) -> Self {
        let settings = config.get_settings();
        let scheduler = Scheduler::new();
        let observer = ViewportObserver::new(DEFAULT_VIEWPORT);
        let progress = ScrollProgressTracker::mount(
            &scheduler,
            DEFAULT_VIEWPORT,
            settings.scroll_progress.options(),
        );
        let subtitle =
            TypedText::mount(&scheduler, store.translate("hero.subtitle"), settings.typing.options());
        let stats = mount_stats(&scheduler, settings);
        let contact = ContactFormState::new(settings.contact.min_message_length);

        tracing::debug!(language = %store.current_language(), "Site mounted");

        Self {
            context: Context::with_localization(store.clone()),
            language: store.subscribe(),
            config,
            store,
            scheduler,
            observer,
            progress,
            subtitle,
            stats,
            reveals: Vec::new(),
            layout: SectionLayout::default(),
            view: ViewState::default(),
            contact,
        }
    }

    /// Mounts a reveal for every element in `layout` and adopts its document
    /// height. Reveals from an earlier layout are released first.
    pub fn mount_sections(&mut self, layout: &SectionLayout) {
        self.reveals.clear();

        let mut mount = |preset: RevealPreset, rect: Rect| {
            let reveal = Reveal::mount(&self.observer, &self.scheduler, rect, preset.config());
            self.reveals.push((preset, reveal));
        };

        for header in &layout.headers {
            mount(RevealPreset::SectionHeader, header.rect);
        }
        for (index, rect) in (0u32..).zip(&layout.about_cards) {
            mount(RevealPreset::AboutCard(index), *rect);
        }
        for (index, rect) in (0u32..).zip(&layout.project_cards) {
            mount(RevealPreset::ProjectCard(index), *rect);
        }
        for (index, rect) in (0u32..).zip(&layout.skill_categories) {
            mount(RevealPreset::SkillCategory(index), *rect);
        }
        for (index, rect) in (0u32..).zip(&layout.skill_items) {
            mount(RevealPreset::SkillItem(index), *rect);
        }
        for (index, rect) in (0u32..).zip(&layout.timeline_items) {
            mount(RevealPreset::TimelineItem(index), *rect);
        }
        if let Some(rect) = layout.experience_stats {
            mount(RevealPreset::ExperienceStats, rect);
        }

        tracing::debug!(count = self.reveals.len(), "Section reveals mounted");

        self.layout = layout.clone();
        let viewport = self.observer.viewport();
        self.resize(viewport.width, viewport.height, layout.document_height);
    }

    pub fn scroll_to(&mut self, scroll_y: f64) {
        self.observer.update(self.observer.viewport().scrolled_to(scroll_y));
        self.progress.on_scroll(scroll_y);
        if self.view.header.on_scroll(scroll_y) {
            tracing::trace!(scrolled = self.view.header.is_scrolled(), "Header style changed");
        }
    }

    /// Scrolls so that `section` starts just below the header, and closes
    /// the mobile menu. Returns `false` when the mounted layout has no
    /// anchor for it.
    pub fn navigate_to(&mut self, section: Section) -> bool {
        let Some(anchor) = self.layout.anchors.iter().find(|anchor| anchor.section == section)
        else {
            return false;
        };
        let target = self.view.header.navigation_target(anchor.top);
        self.scroll_to(target);
        true
    }

    pub fn resize(&self, width: f64, height: f64, document_height: f64) {
        let scroll_y = self.observer.viewport().scroll_y;
        self.observer.update(Viewport::new(scroll_y, width, height, document_height));
        self.progress.on_resize(width, height, document_height);
    }

    /// Moves virtual time forward. Returns the number of timers that fired.
    pub fn advance(&self, by: Duration) -> usize {
        self.scheduler.advance(by)
    }

    /// Switches the active language and re-renders language-dependent state.
    pub fn switch_language(&mut self, language: Language) {
        self.store.switch_language(language);
        self.sync_language();
    }

    /// Applies a language change made through any clone of the store.
    /// Returns whether anything changed.
    pub fn sync_language(&mut self) -> bool {
        if !self.language.has_changed().unwrap_or(false) {
            return false;
        }
        let language = *self.language.borrow_and_update();
        self.subtitle.retype(self.store.translate("hero.subtitle"));
        tracing::debug!(%language, "Site re-rendered for language change");
        true
    }

    #[must_use]
    pub const fn store(&self) -> &LocalizationStore {
        &self.store
    }

    /// Context handed to sections mounted under this page.
    #[must_use]
    pub const fn context(&self) -> &Context {
        &self.context
    }

    #[must_use]
    pub const fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    #[must_use]
    pub const fn settings(&self) -> &SiteSettings {
        self.config.get_settings()
    }

    #[must_use]
    pub const fn config(&self) -> &ConfigManager {
        &self.config
    }

    /// Validates and adopts `settings`, re-mounting the parts whose options
    /// changed. Language and dictionary changes apply on the next start.
    ///
    /// # Errors
    /// Validation errors; nothing changes.
    pub fn apply_settings(&mut self, settings: SiteSettings) -> Result<SettingsChanges, ConfigError> {
        let changes = self.config.update_settings(settings)?;
        self.remount(changes);
        Ok(changes)
    }

    /// Re-reads `.portfolio.json` from the site root and applies it like
    /// [`Site::apply_settings`].
    ///
    /// # Errors
    /// Read, parse or validation errors; nothing changes.
    pub fn reload_settings(&mut self) -> Result<SettingsChanges, ConfigError> {
        let changes = self.config.reload()?;
        self.remount(changes);
        Ok(changes)
    }

    /// Re-mounts the parts whose options changed.
    fn remount(&mut self, changes: SettingsChanges) {
        let settings = self.config.get_settings();
        if changes.typing {
            self.subtitle = TypedText::mount(
                &self.scheduler,
                self.store.translate("hero.subtitle"),
                settings.typing.options(),
            );
        }
        if changes.scroll_progress {
            self.progress = ScrollProgressTracker::mount(
                &self.scheduler,
                self.observer.viewport(),
                settings.scroll_progress.options(),
            );
        }
        if changes.stats {
            self.stats = mount_stats(&self.scheduler, settings);
        }
        if changes.contact {
            self.contact.set_min_message_length(settings.contact.min_message_length);
        }
        if changes.requires_restart() {
            tracing::info!(?changes, "Language and dictionary settings apply on next start");
        }
    }

    #[must_use]
    pub const fn view(&self) -> &ViewState {
        &self.view
    }

    pub const fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    #[must_use]
    pub fn navigation(&self) -> Vec<NavItem> {
        Section::ALL
            .into_iter()
            .map(|section| NavItem {
                anchor: section.anchor(),
                label: self.store.t(section.nav_key()),
            })
            .collect()
    }

    #[must_use]
    pub const fn progress(&self) -> &ScrollProgressTracker {
        &self.progress
    }

    #[must_use]
    pub const fn subtitle(&self) -> &TypedText {
        &self.subtitle
    }

    /// Hero stats as displayed, with their translated labels.
    #[must_use]
    pub fn stats(&self) -> Vec<(String, String)> {
        self.stats
            .iter()
            .zip(HERO_STATS)
            .map(|(counter, (_, label_key))| (counter.display(), self.store.t(label_key)))
            .collect()
    }

    /// Visibility of every mounted reveal, in mount order.
    #[must_use]
    pub fn reveal_states(&self) -> Vec<(RevealPreset, bool)> {
        self.reveals.iter().map(|(preset, reveal)| (*preset, reveal.is_visible())).collect()
    }

    /// Number of mounted reveals already visible.
    #[must_use]
    pub fn revealed(&self) -> usize {
        self.reveals.iter().filter(|(_, reveal)| reveal.is_visible()).count()
    }

    #[must_use]
    pub const fn contact(&self) -> &ContactFormState {
        &self.contact
    }

    pub const fn contact_mut(&mut self) -> &mut ContactFormState {
        &mut self.contact
    }

    /// Submits the contact form through the simulated mailer.
    pub async fn submit_contact(&mut self) -> SubmissionStatus {
        let mailer = self.settings().contact.mailer();
        self.contact.submit(&mailer).await.clone()
    }

    /// Every key the page translates.
    #[must_use]
    pub fn used_keys() -> &'static [&'static str] {
        USED_KEYS
    }

    /// Used keys the dictionary cannot resolve.
    #[must_use]
    pub fn missing_translations(&self) -> Vec<MissingTranslation> {
        check_keys(self.store.dictionary(), Self::used_keys().iter().copied())
    }

    #[must_use]
    pub fn snapshot(&self) -> SiteSnapshot {
        SiteSnapshot {
            language: self.store.current_language(),
            languages: self.store.language_options(),
            navigation: self.navigation(),
            subtitle: self.subtitle.displayed(),
            stats: self.stats.iter().map(StatCounter::display).collect(),
            progress: self.progress.snapshot(),
            revealed: self.revealed(),
            mounted: self.reveals.len(),
            contact_status: self.contact.status().clone(),
            view: self.view.clone(),
            visible_projects: self.view.visible_projects(),
            links: outbound_links(),
            missing_translations: self.missing_translations(),
        }
    }

    /// Tears the page down. Equivalent to dropping it.
    pub fn unmount(self) {
        tracing::debug!(reveals = self.reveals.len(), "Site unmounted");
        drop(self);
    }
}

/// Hero stat counters, staggered.
fn mount_stats(scheduler: &Scheduler, settings: &SiteSettings) -> Vec<StatCounter> {
    (0u32..)
        .zip(HERO_STATS)
        .map(|(index, (number, _))| {
            StatCounter::mount(scheduler, number, hero_stat_delay(index), settings.stats.options())
        })
        .collect()
}
