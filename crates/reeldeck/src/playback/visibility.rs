use hashbrown::HashMap;
use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use crate::{
    config::DEFAULT_VISIBILITY_THRESHOLD,
    playback::{MediaElement, MountedMedia, PlayAttempt},
    PlayError,
};

/// A change in visibility of one observed element.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionEntry {
    pub id: String,
    pub ratio: f32,
    pub is_intersecting: bool,
}

/// Reports elements whose visible ratio crossed the threshold.
///
/// An element counts as visible while its ratio is at or above the
/// threshold. Newly observed elements are reported on the next update
/// regardless.
#[derive(Debug, Clone)]
pub struct IntersectionWatcher {
    threshold: f32,
    observed: IndexMap<String, Option<bool>>,
}

impl Default for IntersectionWatcher {
    fn default() -> Self {
        Self::new(DEFAULT_VISIBILITY_THRESHOLD)
    }
}

impl IntersectionWatcher {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            observed: IndexMap::new(),
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn observe(&mut self, id: impl Into<String>) {
        self.observed.entry(id.into()).or_insert(None);
    }

    pub fn disconnect(&mut self) {
        self.observed.clear();
    }

    pub fn len(&self) -> usize {
        self.observed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    pub fn is_observing(&self, id: &str) -> bool {
        self.observed.contains_key(id)
    }

    /// Last reported visibility of `id`.
    pub fn is_visible(&self, id: &str) -> bool {
        matches!(self.observed.get(id), Some(Some(true)))
    }

    /// Takes fresh visible ratios and returns the elements that changed
    /// side of the threshold.
    pub fn update(&mut self, ratio_of: impl Fn(&str) -> f32) -> Vec<IntersectionEntry> {
        let mut entries = Vec::new();

        for (id, last) in self.observed.iter_mut() {
            let ratio = ratio_of(id.as_str());
            let ratio = if ratio.is_nan() {
                0.0
            } else {
                ratio.clamp(0.0, 1.0)
            };

            let visible = ratio >= self.threshold;
            if *last == Some(visible) {
                continue;
            }

            *last = Some(visible);
            entries.push(IntersectionEntry {
                id: id.clone(),
                ratio,
                is_intersecting: visible,
            });
        }

        entries
    }
}

struct PendingAutoplay {
    attempt: PlayAttempt,
    /// the muted fallback attempt, never unmuted nor retried
    retried: bool,
}

/// Plays whatever scrolled into view and silences whatever left it.
///
/// Elements are started muted so autoplay policies let them through, and
/// unmuted once playback actually began.
pub struct VisibilityPlayback {
    watcher: IntersectionWatcher,
    generation: Option<u64>,
    pending: HashMap<String, PendingAutoplay>,
}

impl Default for VisibilityPlayback {
    fn default() -> Self {
        Self::new(DEFAULT_VISIBILITY_THRESHOLD)
    }
}

impl VisibilityPlayback {
    pub fn new(threshold: f32) -> Self {
        Self {
            watcher: IntersectionWatcher::new(threshold),
            generation: None,
            pending: HashMap::new(),
        }
    }

    pub fn watcher(&self) -> &IntersectionWatcher {
        &self.watcher
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Runs once per frame after layout.
    pub fn update<E: MediaElement>(
        &mut self,
        mounted: &mut MountedMedia<E>,
        ratio_of: impl Fn(&str) -> f32,
    ) -> Vec<IntersectionEntry> {
        if self.generation != Some(mounted.generation()) {
            self.rebuild(mounted);
        }

        let entries = self.watcher.update(ratio_of);
        for entry in &entries {
            let Some(element) = mounted.get_mut(&entry.id) else {
                continue;
            };

            if entry.is_intersecting {
                self.enter(&entry.id, element);
            } else {
                leave(&entry.id, element);
            }
        }

        self.poll(mounted);
        entries
    }

    fn rebuild<E: MediaElement>(&mut self, mounted: &MountedMedia<E>) {
        self.watcher.disconnect();
        for id in mounted.ids() {
            self.watcher.observe(id);
        }

        self.pending.retain(|id, _| {
            let keep = mounted.contains(id);
            if !keep {
                debug!("dropping play attempt of unmounted {id}");
            }
            keep
        });

        trace!(
            "watching {} media elements, generation {}",
            self.watcher.len(),
            mounted.generation()
        );
        self.generation = Some(mounted.generation());
    }

    fn enter(&mut self, id: &str, element: &mut impl MediaElement) {
        if !element.is_paused() {
            return;
        }

        debug!("{id} entered view, autoplaying");
        element.set_muted(true);
        self.pending.insert(
            id.to_owned(),
            PendingAutoplay {
                attempt: element.play(),
                retried: false,
            },
        );
    }

    fn poll<E: MediaElement>(&mut self, mounted: &mut MountedMedia<E>) {
        for (id, pending) in std::mem::take(&mut self.pending) {
            let Some(element) = mounted.get_mut(&id) else {
                debug!("dropping play attempt of unmounted {id}");
                continue;
            };

            let PendingAutoplay { attempt, retried } = pending;
            match attempt.try_take() {
                Err(attempt) => {
                    self.pending.insert(id, PendingAutoplay { attempt, retried });
                }

                Ok(Ok(())) => {
                    if !self.watcher.is_visible(&id) {
                        // scrolled away before playback began
                        leave(&id, element);
                    } else if !retried && !element.is_paused() {
                        element.set_muted(false);
                    }
                }

                Ok(Err(PlayError::NotAllowed)) if !retried => {
                    warn!("autoplay of {id} was blocked, retrying muted");
                    element.set_muted(true);
                    let attempt = element.play();
                    self.pending.insert(
                        id,
                        PendingAutoplay {
                            attempt,
                            retried: true,
                        },
                    );
                }

                Ok(Err(PlayError::Aborted)) => trace!("play of {id} interrupted by pause"),

                Ok(Err(err)) => warn!("autoplay of {id} failed: {err}"),
            }
        }
    }
}

fn leave(id: &str, element: &mut impl MediaElement) {
    debug!("{id} left view");
    if !element.is_paused() {
        element.pause();
        element.set_current_time(0.0);
    }
    element.set_muted(true);
}
