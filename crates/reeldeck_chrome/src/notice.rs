use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

use egui::{Align2, Color32, RichText};

pub const NOTICE_TTL: Duration = Duration::from_secs(3);

struct Notice {
    message: String,
    shown_at: Instant,
}

/// Transient messages shown at the bottom of the window, newest on top.
pub struct Notices {
    ttl: Duration,
    items: VecDeque<Notice>,
}

impl Default for Notices {
    fn default() -> Self {
        Self::new(NOTICE_TTL)
    }
}

impl Notices {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            items: VecDeque::new(),
        }
    }

    /// Re-posting a live message only restarts its timer.
    pub fn push_at(&mut self, message: impl Into<String>, now: Instant) {
        let message = message.into();
        self.items.retain(|n| n.message != message);
        self.items.push_back(Notice {
            message,
            shown_at: now,
        });
    }

    pub fn expire(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.items
            .retain(|n| now.saturating_duration_since(n.shown_at) < ttl);
    }

    pub fn latest(&self) -> Option<&str> {
        self.items.back().map(|n| n.message.as_str())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Time until the next notice expires.
    fn next_expiry(&self, now: Instant) -> Option<Duration> {
        self.items
            .iter()
            .map(|n| self.ttl.saturating_sub(now.saturating_duration_since(n.shown_at)))
            .min()
    }

    pub fn show(&mut self, ctx: &egui::Context, now: Instant) {
        self.expire(now);

        let Some(message) = self.latest() else {
            return;
        };

        egui::Area::new(egui::Id::new("reeldeck_notice"))
            .order(egui::Order::Foreground)
            .anchor(Align2::CENTER_BOTTOM, [0.0, -96.0])
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style())
                    .fill(Color32::from_black_alpha(220))
                    .show(ui, |ui| {
                        ui.label(RichText::new(message).color(Color32::WHITE));
                    });
            });

        if let Some(wait) = self.next_expiry(now) {
            ctx.request_repaint_after(wait);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_expire_after_ttl() {
        let t0 = Instant::now();
        let mut notices = Notices::default();
        notices.push_at("could not load videos", t0);
        notices.push_at("still offline", t0 + Duration::from_secs(2));

        notices.expire(t0 + Duration::from_millis(2999));
        assert_eq!(notices.len(), 2);

        notices.expire(t0 + Duration::from_secs(3));
        assert_eq!(notices.latest(), Some("still offline"));

        notices.expire(t0 + Duration::from_secs(5));
        assert!(notices.is_empty());
    }

    #[test]
    fn repeated_notice_restarts_timer() {
        let t0 = Instant::now();
        let mut notices = Notices::default();
        notices.push_at("offline", t0);
        notices.push_at("offline", t0 + Duration::from_secs(2));
        assert_eq!(notices.len(), 1);

        notices.expire(t0 + Duration::from_secs(4));
        assert_eq!(notices.latest(), Some("offline"));
        assert_eq!(
            notices.next_expiry(t0 + Duration::from_secs(4)),
            Some(Duration::from_secs(1))
        );
    }
}
