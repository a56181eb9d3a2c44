use std::{cell::RefCell, collections::VecDeque, rc::Rc, time::Instant};

use hashbrown::{HashMap, HashSet};
use tracing::{debug, info};

use crate::{
    carousel::{visible_ratio, InteractionController, PreloadWindow, SlotKind, Transform},
    input::{FeedInput, InputChannel, ListenerHandle},
    paging::{FileUrls, PageLoader, PageOutcome, PagedVideoStore, VideoRecord, VideoSource},
    playback::{MediaElement, MountedMedia, VideoControl, VisibilityPlayback},
    FeedConfig,
};

/// The swipe feed as a whole: paging, navigation, mounted players and
/// autoplay, driven once per frame by the shell.
///
/// Input arrives through the [`InputChannel`] the reel was mounted on and is
/// applied on the next [`Reel::update`]. Dropping the reel unsubscribes it.
pub struct Reel<S, E> {
    config: FeedConfig,
    store: PagedVideoStore<S>,
    controller: InteractionController,
    window: PreloadWindow,
    mounted: MountedMedia<E>,
    playback: VisibilityPlayback,
    queue: Rc<RefCell<VecDeque<FeedInput>>>,
    _listener: ListenerHandle<FeedInput>,
}

impl<S: VideoSource, E: MediaElement> Reel<S, E> {
    pub fn mount(
        config: &FeedConfig,
        source: S,
        input: &InputChannel<FeedInput>,
        page_height: f32,
    ) -> Self {
        let config = config.clone().sanitized();
        let files = FileUrls::new(config.static_base());
        let mut store = PagedVideoStore::new(source, config.page_size, files);

        let queue = Rc::new(RefCell::new(VecDeque::new()));
        let listener = {
            let queue = Rc::clone(&queue);
            input.subscribe(move |event: &FeedInput| queue.borrow_mut().push_back(*event))
        };

        info!(
            "mounting reel, {} items per page from {}{}",
            config.page_size, config.api_base, config.list_path
        );
        store.request_next_page();

        Self {
            controller: InteractionController::from_config(&config, page_height),
            window: PreloadWindow::new(config.preload_radius),
            playback: VisibilityPlayback::new(config.visibility_threshold),
            mounted: MountedMedia::new(),
            config,
            store,
            queue,
            _listener: listener,
        }
    }

    /// Applies queued input, merges settled pages and runs autoplay against
    /// the visible ratios reported by `ratio_of`.
    pub fn update(&mut self, now: Instant, ratio_of: impl Fn(&str) -> f32) -> Vec<PageOutcome> {
        let inputs: Vec<FeedInput> = self.queue.borrow_mut().drain(..).collect();
        for input in inputs {
            self.controller.handle_input(input, now, &mut self.store);
        }

        let mut outcomes = Vec::new();
        if let Some(outcome) = self.store.poll() {
            outcomes.push(outcome);
        }
        self.controller.sync_total(self.store.len());

        self.mounted.sync_controls();
        self.playback.update(&mut self.mounted, ratio_of);

        outcomes
    }

    /// Mounts elements for the records inside the preload window and
    /// unmounts the ones that fell out of it.
    pub fn sync_mounted(&mut self, mut make: impl FnMut(&VideoRecord) -> E) {
        let range = self
            .window
            .range(self.controller.current_index(), self.store.len());
        let Some(records) = self.store.items().get(range) else {
            return;
        };

        let wanted: HashSet<&str> = records
            .iter()
            .filter(|r| r.is_playable())
            .map(|r| r.id.as_str())
            .collect();
        self.mounted.retain(|id| wanted.contains(id));

        for record in records.iter().filter(|r| r.is_playable()) {
            if !self.mounted.contains(&record.id) {
                self.mounted.mount(record.id.clone(), make(record));
            }
        }
    }

    /// Visible ratio of every mounted element with the track at `offset_y`.
    pub fn visibility_at(&self, offset_y: f32) -> HashMap<String, f32> {
        let page_height = self.controller.page_height();
        let range = self
            .window
            .range(self.controller.current_index(), self.store.len());

        range
            .filter_map(|index| {
                let record = self.store.get(index)?;
                if !self.mounted.contains(&record.id) {
                    return None;
                }
                Some((
                    record.id.clone(),
                    visible_ratio(index, offset_y, page_height),
                ))
            })
            .collect()
    }

    pub fn go_to_next(&mut self) -> Option<usize> {
        self.controller.go_to_next(&mut self.store)
    }

    pub fn go_to_prev(&mut self) -> Option<usize> {
        self.controller.go_to_prev(&mut self.store)
    }

    pub fn go_to(&mut self, index: usize) -> Option<usize> {
        let target = i64::try_from(index).unwrap_or(i64::MAX);
        self.controller.go_to(target, &mut self.store)
    }

    pub fn set_page_height(&mut self, page_height: f32) {
        self.controller.set_page_height(page_height);
    }

    pub fn slot(&self, index: usize) -> SlotKind {
        let playable = self.store.get(index).is_some_and(|r| r.is_playable());
        self.window
            .slot(self.controller.current_index(), index, playable)
    }

    pub fn control(&mut self, id: &str) -> Option<VideoControl<'_, E>> {
        self.mounted.control(id)
    }

    pub fn current(&self) -> Option<&VideoRecord> {
        self.store.get(self.controller.current_index())
    }

    pub fn current_index(&self) -> usize {
        self.controller.current_index()
    }

    pub fn transform(&self) -> Transform {
        self.controller.transform()
    }

    pub fn items(&self) -> &[VideoRecord] {
        self.store.items()
    }

    pub fn has_more(&self) -> bool {
        self.store.has_more()
    }

    pub fn is_fetching(&self) -> bool {
        self.store.is_fetching()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.store.last_error()
    }

    /// Re-issues the page request after a failure or an empty start.
    pub fn retry(&mut self) -> bool {
        let requested = self.store.request_next_page();
        if requested {
            debug!("retrying page {}", self.store.page());
        }
        requested
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn store(&self) -> &PagedVideoStore<S> {
        &self.store
    }

    pub fn mounted(&self) -> &MountedMedia<E> {
        &self.mounted
    }

    pub fn mounted_mut(&mut self) -> &mut MountedMedia<E> {
        &mut self.mounted
    }

    pub fn playback(&self) -> &VisibilityPlayback {
        &self.playback
    }

    pub fn window(&self) -> PreloadWindow {
        self.window
    }
}
