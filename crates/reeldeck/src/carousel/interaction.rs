use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::{
    carousel::{resolve_swipe, Cursor, SwipeThresholds, TouchState},
    config::{DEFAULT_FETCH_THRESHOLD, DEFAULT_THROTTLE_MS},
    input::{FeedInput, NavKey},
    paging::PageLoader,
    FeedConfig, Throttle,
};

/// Vertical offset of the carousel track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub offset_y: f32,
    /// false while the finger is down, so the track follows it directly
    pub animated: bool,
}

/// Owns the current index of the carousel and turns gestures into index
/// transitions. Asks the feed for more pages as the index nears the end.
#[derive(Debug, Clone)]
pub struct InteractionController {
    cursor: Cursor,
    page_height: f32,
    fetch_threshold: usize,
    thresholds: SwipeThresholds,
    wheel_gate: Throttle,
    key_gate: Throttle,
    touch: TouchState,
    transform: Transform,
}

impl InteractionController {
    pub fn new(page_height: f32) -> Self {
        let interval = Duration::from_millis(DEFAULT_THROTTLE_MS);
        Self {
            cursor: Cursor::default(),
            page_height,
            fetch_threshold: DEFAULT_FETCH_THRESHOLD,
            thresholds: SwipeThresholds::default(),
            wheel_gate: Throttle::new(interval),
            key_gate: Throttle::new(interval),
            touch: TouchState::Idle,
            transform: Transform {
                offset_y: 0.0,
                animated: true,
            },
        }
    }

    pub fn from_config(config: &FeedConfig, page_height: f32) -> Self {
        Self::new(page_height)
            .fetch_threshold(config.fetch_threshold)
            .throttle(config.throttle_interval())
            .swipe_thresholds(config.swipe_thresholds())
    }

    pub fn fetch_threshold(mut self, fetch_threshold: usize) -> Self {
        self.fetch_threshold = fetch_threshold;
        self
    }

    pub fn throttle(mut self, interval: Duration) -> Self {
        self.wheel_gate = self.wheel_gate.with_interval(interval);
        self.key_gate = self.key_gate.with_interval(interval);
        self
    }

    pub fn swipe_thresholds(mut self, thresholds: SwipeThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn current_index(&self) -> usize {
        self.cursor.index()
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn touch_state(&self) -> &TouchState {
        &self.touch
    }

    pub fn page_height(&self) -> f32 {
        self.page_height
    }

    /// Offset at which the current item fills the viewport.
    pub fn resting_offset(&self) -> f32 {
        -(self.cursor.index() as f32) * self.page_height
    }

    pub fn set_page_height(&mut self, page_height: f32) {
        if page_height <= 0.0 || page_height == self.page_height {
            return;
        }

        self.page_height = page_height;
        if !self.touch.is_dragging() {
            self.transform.offset_y = self.resting_offset();
        }
    }

    /// Keeps the cursor in step with a list that grew since the last event.
    pub fn sync_total(&mut self, total: usize) {
        if self.cursor.total() == total {
            return;
        }

        self.cursor.set_total(total);
        if !self.touch.is_dragging() {
            self.transform.offset_y = self.resting_offset();
        }
    }

    /// Moves to `target`, clamped to the list. Returns the new index if it
    /// changed. The track always ends up at the resting offset of whatever
    /// the current index is afterwards.
    pub fn go_to(&mut self, target: i64, feed: &mut impl PageLoader) -> Option<usize> {
        self.cursor.set_total(feed.len());

        let changed = self.cursor.go_to(target);
        if let Some(index) = changed {
            debug!("carousel moved to {index}/{}", self.cursor.total());
            self.maybe_prefetch(feed);
        }

        if !self.touch.is_dragging() {
            self.transform = Transform {
                offset_y: self.resting_offset(),
                animated: true,
            };
        }

        changed
    }

    pub fn go_to_next(&mut self, feed: &mut impl PageLoader) -> Option<usize> {
        self.go_to(self.cursor.index() as i64 + 1, feed)
    }

    pub fn go_to_prev(&mut self, feed: &mut impl PageLoader) -> Option<usize> {
        self.go_to(self.cursor.index() as i64 - 1, feed)
    }

    fn maybe_prefetch(&self, feed: &mut impl PageLoader) {
        if !feed.has_more() || feed.is_fetching() {
            return;
        }

        if self.cursor.remaining() <= self.fetch_threshold && feed.request_next_page() {
            debug!(
                "{} items left after {}, loading next page",
                self.cursor.remaining(),
                self.cursor.index()
            );
        }
    }

    pub fn handle_input(
        &mut self,
        input: FeedInput,
        now: Instant,
        feed: &mut impl PageLoader,
    ) -> Option<usize> {
        let index = self.cursor.index() as i64;

        match input {
            FeedInput::Wheel { delta_y } => {
                let step = if delta_y > 0.0 {
                    1
                } else if delta_y < 0.0 {
                    -1
                } else {
                    return None;
                };

                if !self.wheel_gate.try_accept_at(now) {
                    trace!("wheel event throttled");
                    return None;
                }

                self.go_to(index + step, feed)
            }

            FeedInput::Key(key) => {
                if !self.key_gate.try_accept_at(now) {
                    trace!("key event throttled");
                    return None;
                }

                let step = match key {
                    NavKey::Down => 1,
                    NavKey::Up => -1,
                };
                self.go_to(index + step, feed)
            }

            FeedInput::TouchStart { y } => {
                self.touch = TouchState::Dragging {
                    start_y: y,
                    last_y: y,
                    started_at: now,
                };
                self.transform.animated = false;
                None
            }

            FeedInput::TouchMove { y } => {
                if let TouchState::Dragging { last_y, .. } = &mut self.touch {
                    *last_y = y;
                    // not clamped, the track may be pulled past either end
                    self.transform = Transform {
                        offset_y: self.resting_offset() + self.touch.delta(),
                        animated: false,
                    };
                }
                None
            }

            FeedInput::TouchEnd | FeedInput::TouchCancel => self.end_touch(now, feed),
        }
    }

    fn end_touch(&mut self, now: Instant, feed: &mut impl PageLoader) -> Option<usize> {
        let TouchState::Dragging { started_at, .. } = self.touch else {
            return None;
        };

        let delta = self.touch.delta();
        self.touch = TouchState::Idle;
        self.transform.animated = true;

        let elapsed = now.saturating_duration_since(started_at);
        let direction = resolve_swipe(delta, elapsed, self.thresholds);
        trace!("swipe of {delta}px over {elapsed:?} resolved to {direction:?}");

        self.go_to(self.cursor.index() as i64 + direction.step(), feed)
    }
}
