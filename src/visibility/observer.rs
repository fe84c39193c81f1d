//! ビューポート交差の購読

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{
    Rc,
    Weak,
};

use crate::viewport::{
    Rect,
    RootMargin,
    Viewport,
    intersection_ratio,
};

/// When an observed element counts as intersecting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverOptions {
    /// Fraction of the element's area that must be inside the root box.
    pub threshold: f64,
    /// Adjustment of the viewport box.
    pub root_margin: RootMargin,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self { threshold: 0.0, root_margin: RootMargin::ZERO }
    }
}

impl ObserverOptions {
    #[must_use]
    pub const fn with_threshold(threshold: f64) -> Self {
        Self { threshold, root_margin: RootMargin::ZERO }
    }

    /// Whether `ratio` qualifies under these options.
    #[must_use]
    pub fn qualifies(&self, ratio: f64) -> bool {
        ratio > 0.0 && ratio >= self.threshold
    }
}

/// Delivered to a subscriber when its element crosses the threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub ratio: f64,
    pub is_intersecting: bool,
}

/// Identifies one observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObservationId(u64);

/// Subscriber callback.
type Callback = Rc<RefCell<dyn FnMut(IntersectionEntry)>>;

/// One observed element.
struct Registration {
    /// Element box in document coordinates
    target: Rect,
    options: ObserverOptions,
    /// Last delivered intersecting state; `None` before the first delivery
    last: Option<bool>,
    callback: Callback,
}

/// Shared observer state.
struct ObserverInner {
    viewport: Viewport,
    next_id: u64,
    registrations: BTreeMap<ObservationId, Registration>,
}

/// Tracks observed elements against the current viewport.
///
/// Each subscriber is told once right after subscribing, then again every
/// time its element crosses the configured threshold in either direction.
/// Cloning yields another handle to the same observer.
#[derive(Clone)]
pub struct ViewportObserver {
    /// Shared state
    inner: Rc<RefCell<ObserverInner>>,
}

impl fmt::Debug for ViewportObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ViewportObserver")
            .field("viewport", &inner.viewport)
            .field("observed", &inner.registrations.len())
            .finish()
    }
}

impl ViewportObserver {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObserverInner {
                viewport,
                next_id: 0,
                registrations: BTreeMap::new(),
            })),
        }
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.inner.borrow().viewport
    }

    /// Number of live observations.
    #[must_use]
    pub fn observed(&self) -> usize {
        self.inner.borrow().registrations.len()
    }

    /// Starts observing `target`. The initial state is delivered before
    /// this returns.
    #[must_use = "dropping the handle stops the observation"]
    pub fn observe(
        &self,
        target: Rect,
        options: ObserverOptions,
        callback: impl FnMut(IntersectionEntry) + 'static,
    ) -> ObservationHandle {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = ObservationId(inner.next_id);
            inner.next_id += 1;
            inner.registrations.insert(
                id,
                Registration { target, options, last: None, callback: Rc::new(RefCell::new(callback)) },
            );
            id
        };
        tracing::trace!(?id, threshold = options.threshold, "Observing element");

        self.flush();
        ObservationHandle { id, observer: Rc::downgrade(&self.inner) }
    }

    /// Applies a new viewport (scroll or resize) and notifies every element
    /// whose intersecting state changed.
    pub fn update(&self, viewport: Viewport) {
        self.inner.borrow_mut().viewport = viewport;
        self.flush();
    }

    /// Computes pending notifications and delivers them outside the borrow,
    /// so callbacks may subscribe or cancel freely.
    ///
    /// A notification whose callback is still running further up the stack
    /// is not delivered, and its element keeps the previous state so the
    /// next flush reports the change again.
    fn flush(&self) {
        let notifications: Vec<Notification> = {
            let mut inner = self.inner.borrow_mut();
            let viewport = inner.viewport;
            inner
                .registrations
                .iter_mut()
                .filter_map(|(id, registration)| {
                    let ratio = intersection_ratio(
                        &registration.target,
                        &viewport,
                        &registration.options.root_margin,
                    );
                    let is_intersecting = registration.options.qualifies(ratio);
                    if registration.last == Some(is_intersecting) {
                        return None;
                    }
                    let previous = registration.last.replace(is_intersecting);
                    Some(Notification {
                        id: *id,
                        previous,
                        callback: Rc::clone(&registration.callback),
                        entry: IntersectionEntry { ratio, is_intersecting },
                    })
                })
                .collect()
        };

        for Notification { id, previous, callback, entry } in notifications {
            // An earlier callback in this batch may have cancelled it.
            if !self.inner.borrow().registrations.contains_key(&id) {
                continue;
            }
            let Ok(mut callback) = callback.try_borrow_mut() else {
                tracing::debug!(?id, "Deferring re-entrant intersection callback");
                if let Some(registration) = self.inner.borrow_mut().registrations.get_mut(&id) {
                    registration.last = previous;
                }
                continue;
            };
            (*callback)(entry);
        }
    }
}

/// A state change waiting to be delivered.
struct Notification {
    id: ObservationId,
    /// State to restore if delivery is skipped
    previous: Option<bool>,
    callback: Callback,
    entry: IntersectionEntry,
}

/// Stops its observation when cancelled or dropped.
#[must_use = "dropping the handle stops the observation"]
pub struct ObservationHandle {
    id: ObservationId,
    observer: Weak<RefCell<ObserverInner>>,
}

impl fmt::Debug for ObservationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservationHandle").field("id", &self.id).finish_non_exhaustive()
    }
}

impl ObservationHandle {
    #[must_use]
    pub const fn id(&self) -> ObservationId {
        self.id
    }

    /// Whether the observation is still registered.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.observer
            .upgrade()
            .is_some_and(|inner| inner.borrow().registrations.contains_key(&self.id))
    }

    /// Stops observing. Equivalent to dropping the handle.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for ObservationHandle {
    fn drop(&mut self) {
        let Some(inner) = self.observer.upgrade() else {
            return;
        };
        let Ok(mut guard) = inner.try_borrow_mut() else {
            tracing::warn!(id = ?self.id, "Observation released while the observer was borrowed");
            return;
        };
        let removed = guard.registrations.remove(&self.id);
        drop(guard);
        if removed.is_some() {
            tracing::trace!(id = ?self.id, "Stopped observing element");
        }
    }
}
