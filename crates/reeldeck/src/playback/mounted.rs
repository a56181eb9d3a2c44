use indexmap::IndexMap;
use tracing::debug;

use crate::playback::{ControlState, MediaElement, VideoControl};

struct Mounted<E> {
    element: E,
    control: ControlState,
}

/// Media elements currently alive in the carousel, keyed by video id.
///
/// Every mount or unmount bumps the generation so observers of the set can
/// tell when to rebuild.
pub struct MountedMedia<E> {
    entries: IndexMap<String, Mounted<E>>,
    generation: u64,
}

impl<E> Default for MountedMedia<E> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
            generation: 0,
        }
    }
}

impl<E: MediaElement> MountedMedia<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns false if an element with this id is already mounted.
    pub fn mount(&mut self, id: impl Into<String>, element: E) -> bool {
        let id = id.into();
        if self.entries.contains_key(&id) {
            return false;
        }

        debug!("mounting media {id}");
        let control = ControlState::bound_to(&element);
        self.entries.insert(id, Mounted { element, control });
        self.generation += 1;
        true
    }

    pub fn unmount(&mut self, id: &str) -> Option<E> {
        let mounted = self.entries.shift_remove(id)?;
        debug!("unmounted media {id}");
        self.generation += 1;
        Some(mounted.element)
    }

    /// Unmounts everything `keep` rejects. Returns how many went away.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|id, _| keep(id));

        let removed = before - self.entries.len();
        if removed > 0 {
            debug!("unmounted {removed} media elements");
            self.generation += 1;
        }
        removed
    }

    pub fn get(&self, id: &str) -> Option<&E> {
        self.entries.get(id).map(|m| &m.element)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut E> {
        self.entries.get_mut(id).map(|m| &mut m.element)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut E)> {
        self.entries
            .iter_mut()
            .map(|(id, m)| (id.as_str(), &mut m.element))
    }

    pub fn control_state(&self, id: &str) -> Option<&ControlState> {
        self.entries.get(id).map(|m| &m.control)
    }

    pub fn control(&mut self, id: &str) -> Option<VideoControl<'_, E>> {
        self.entries
            .get_mut(id)
            .map(|m| VideoControl::new(Some(&mut m.element), &mut m.control))
    }

    /// Mirrors element notifications into every control and settles their
    /// pending play attempts.
    pub fn sync_controls(&mut self) {
        for mounted in self.entries.values_mut() {
            let mut control = VideoControl::new(Some(&mut mounted.element), &mut mounted.control);
            control.sync_events();
            control.poll();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::{fake::FakeMedia, MediaEvent};

    #[test]
    fn generation_tracks_changes() {
        let mut mounted = MountedMedia::new();
        assert_eq!(mounted.generation(), 0);

        assert!(mounted.mount("a", FakeMedia::new()));
        assert!(mounted.mount("b", FakeMedia::new()));
        assert_eq!(mounted.generation(), 2);

        // already there, nothing changes
        assert!(!mounted.mount("a", FakeMedia::new()));
        assert_eq!(mounted.generation(), 2);

        assert!(mounted.unmount("a").is_some());
        assert!(mounted.unmount("a").is_none());
        assert_eq!(mounted.generation(), 3);
        assert_eq!(mounted.ids().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn retain_bumps_once() {
        let mut mounted = MountedMedia::new();
        for id in ["a", "b", "c", "d"] {
            mounted.mount(id, FakeMedia::new());
        }

        assert_eq!(mounted.retain(|id| id == "c"), 3);
        assert_eq!(mounted.generation(), 5);
        assert_eq!(mounted.retain(|_| true), 0);
        assert_eq!(mounted.generation(), 5);
        assert_eq!(mounted.len(), 1);
    }

    #[test]
    fn controls_follow_their_element() {
        let mut mounted = MountedMedia::new();
        mounted.mount("a", FakeMedia::new());
        mounted.mount("b", FakeMedia::new());

        if let Some(mut control) = mounted.control("b") {
            control.play();
        }
        mounted.sync_controls();

        assert!(mounted.control_state("b").is_some_and(|c| c.playback().is_playing));
        assert!(mounted.control_state("a").is_some_and(|c| !c.playback().is_playing));
        assert!(mounted.get("b").is_some_and(|m| m.events.is_empty()));

        if let Some(media) = mounted.get_mut("a") {
            media.events.push(MediaEvent::Ended);
        }
        mounted.sync_controls();
        assert!(mounted.control("missing").is_none());
    }
}
