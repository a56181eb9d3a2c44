use std::time::{Duration, Instant};

use crate::config::{DEFAULT_SWIPE_DISTANCE, DEFAULT_SWIPE_VELOCITY};

/// Minimum travel (px) or speed (px/ms) for a drag to count as a swipe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeThresholds {
    pub distance: f32,
    pub velocity: f32,
}

impl Default for SwipeThresholds {
    fn default() -> Self {
        Self {
            distance: DEFAULT_SWIPE_DISTANCE,
            velocity: DEFAULT_SWIPE_VELOCITY,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SwipeDirection {
    Next,
    Prev,
    Stay,
}

impl SwipeDirection {
    pub fn step(self) -> i64 {
        match self {
            SwipeDirection::Next => 1,
            SwipeDirection::Prev => -1,
            SwipeDirection::Stay => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum TouchState {
    #[default]
    Idle,
    Dragging {
        start_y: f32,
        last_y: f32,
        started_at: Instant,
    },
}

impl TouchState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, TouchState::Dragging { .. })
    }

    /// Drag distance so far, negative when the finger moved up.
    pub fn delta(&self) -> f32 {
        match self {
            TouchState::Idle => 0.0,
            TouchState::Dragging { start_y, last_y, .. } => last_y - start_y,
        }
    }
}

/// Classifies a finished drag. Dragging up (negative delta) reveals the
/// next item. Sub-millisecond drags count as one millisecond.
pub fn resolve_swipe(
    delta_y: f32,
    elapsed: Duration,
    thresholds: SwipeThresholds,
) -> SwipeDirection {
    let elapsed_ms = (elapsed.as_secs_f32() * 1000.0).max(1.0);
    let velocity = delta_y.abs() / elapsed_ms;
    let fast = velocity > thresholds.velocity;

    if delta_y < -thresholds.distance || (delta_y < 0.0 && fast) {
        SwipeDirection::Next
    } else if delta_y > thresholds.distance || (delta_y > 0.0 && fast) {
        SwipeDirection::Prev
    } else {
        SwipeDirection::Stay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn long_slow_drag_up_is_next() {
        let dir = resolve_swipe(-80.0, ms(2000), SwipeThresholds::default());
        assert_eq!(dir, SwipeDirection::Next);
    }

    #[test]
    fn short_flick_counts_by_velocity() {
        // 20px in 40ms is 0.5 px/ms
        assert_eq!(
            resolve_swipe(-20.0, ms(40), SwipeThresholds::default()),
            SwipeDirection::Next
        );
        assert_eq!(
            resolve_swipe(20.0, ms(40), SwipeThresholds::default()),
            SwipeDirection::Prev
        );
    }

    #[test]
    fn small_slow_drag_stays() {
        // 10px in 100ms is 0.1 px/ms
        assert_eq!(
            resolve_swipe(-10.0, ms(100), SwipeThresholds::default()),
            SwipeDirection::Stay
        );
        assert_eq!(
            resolve_swipe(10.0, ms(100), SwipeThresholds::default()),
            SwipeDirection::Stay
        );
    }

    #[test]
    fn zero_delta_stays_even_when_instant() {
        assert_eq!(
            resolve_swipe(0.0, Duration::ZERO, SwipeThresholds::default()),
            SwipeDirection::Stay
        );
    }

    #[test]
    fn zero_elapsed_is_not_infinite() {
        // 0.2px at the 1ms floor stays below 0.3 px/ms
        assert_eq!(
            resolve_swipe(-0.2, Duration::ZERO, SwipeThresholds::default()),
            SwipeDirection::Stay
        );
    }

    #[test]
    fn touch_state_delta() {
        let now = Instant::now();
        let state = TouchState::Dragging {
            start_y: 300.0,
            last_y: 240.0,
            started_at: now,
        };
        assert!(state.is_dragging());
        assert_eq!(state.delta(), -60.0);
        assert_eq!(TouchState::Idle.delta(), 0.0);
    }
}
