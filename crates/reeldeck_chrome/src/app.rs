use std::time::{Duration, Instant};

use egui::{
    pos2, vec2, Align, Align2, Button, Color32, FontId, Key, Layout, Rect, Response, Sense, Ui,
    UiBuilder,
};
use reeldeck::{
    FeedConfig, FeedInput, HttpVideoSource, InputChannel, NavKey, PageOutcome, Reel, SlotKind,
};
use tracing::{debug, error, info};

use crate::{
    controls::show_controls,
    media::{ClockMedia, UserActivation, DEFAULT_CLIP_SECS},
    notice::Notices,
};

type VideoReel = Reel<HttpVideoSource, ClockMedia>;

const NAV_RAIL_WIDTH: f32 = 72.0;
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// The swipe feed window.
pub struct ReelApp {
    config: FeedConfig,
    input: InputChannel<FeedInput>,
    reel: Option<VideoReel>,
    activation: UserActivation,
    notices: Notices,
    /// where the track is drawn this frame, trails the controller while
    /// animating
    offset_y: f32,
    show_rail: bool,
}

impl ReelApp {
    pub fn new(ctx: &egui::Context, config: FeedConfig, is_mobile: bool) -> Self {
        egui_extras::install_image_loaders(ctx);
        ctx.set_visuals(egui::Visuals::dark());

        let input = InputChannel::new();
        let mut notices = Notices::default();

        let reel = match HttpVideoSource::from_config(&config) {
            Ok(source) => Some(Reel::mount(&config, source, &input, 1.0)),
            Err(err) => {
                error!("invalid feed endpoint '{}': {err}", config.api_base);
                notices.push_at(format!("Invalid feed endpoint: {err}"), Instant::now());
                None
            }
        };

        info!("reeldeck ready, mobile layout: {is_mobile}");

        Self {
            config,
            input,
            reel,
            activation: UserActivation::new(),
            notices,
            offset_y: 0.0,
            show_rail: !is_mobile,
        }
    }

    pub fn reel(&self) -> Option<&VideoReel> {
        self.reel.as_ref()
    }

    pub fn input(&self) -> &InputChannel<FeedInput> {
        &self.input
    }

    #[profiling::function]
    fn ui(&mut self, ui: &mut Ui, now: Instant) {
        let Some(reel) = self.reel.as_mut() else {
            ui.centered_and_justified(|ui| {
                ui.colored_label(Color32::LIGHT_RED, "The feed endpoint is not configured");
            });
            return;
        };

        let full = ui.available_rect_before_wrap();
        let rail_width = if self.show_rail { NAV_RAIL_WIDTH } else { 0.0 };
        let carousel = Rect::from_min_max(full.min, pos2(full.max.x - rail_width, full.max.y));
        let rail = Rect::from_min_max(pos2(carousel.max.x, full.min.y), full.max);

        reel.set_page_height(carousel.height());

        let response = ui.interact(carousel, ui.id().with("carousel"), Sense::drag());
        dispatch_input(ui, &response, full, &self.input, &self.activation);

        let ratios = reel.visibility_at(self.offset_y);
        for outcome in reel.update(now, |id| ratios.get(id).copied().unwrap_or(0.0)) {
            if let PageOutcome::Failed { error, .. } = outcome {
                self.notices
                    .push_at(format!("Could not load videos: {error}"), now);
            }
        }

        let activation = self.activation.clone();
        reel.sync_mounted(|record| {
            debug!("mounting player for {} ({})", record.id, record.url);
            ClockMedia::new(DEFAULT_CLIP_SECS, activation.clone())
        });
        for (_, media) in reel.mounted_mut().iter_mut() {
            media.tick(now);
        }

        let transform = reel.transform();
        let animation_time = if transform.animated {
            self.config.transition().as_secs_f32()
        } else {
            0.0
        };
        self.offset_y = ui.ctx().animate_value_with_time(
            ui.id().with("track_offset"),
            transform.offset_y,
            animation_time,
        );

        let mut track = ui.new_child(UiBuilder::new().max_rect(carousel));
        track.set_clip_rect(carousel);
        track_ui(&mut track, reel, carousel, self.offset_y);

        if self.show_rail {
            let mut rail_ui = ui.new_child(
                UiBuilder::new()
                    .max_rect(rail)
                    .layout(Layout::top_down(Align::Center)),
            );
            nav_rail(&mut rail_ui, reel, rail);
        }
    }
}

impl eframe::App for ReelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        profiling::finish_frame!();
        let now = Instant::now();

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(Color32::BLACK))
            .show(ctx, |ui| self.ui(ui, now));

        self.notices.show(ctx, now);

        // the media clock only moves when we repaint
        ctx.request_repaint_after(FRAME_INTERVAL);
    }
}

/// Turns this frame's wheel, key and pointer activity into feed input.
/// The wheel counts anywhere over `viewport`, pointer drags on the carousel
/// stand in for touches.
fn dispatch_input(
    ui: &Ui,
    response: &Response,
    viewport: Rect,
    input: &InputChannel<FeedInput>,
    activation: &UserActivation,
) {
    let (scroll, over_viewport, down, up, pressed) = ui.input(|i| {
        (
            i.raw_scroll_delta.y,
            i.pointer.hover_pos().is_some_and(|pos| viewport.contains(pos)),
            i.key_pressed(Key::ArrowDown),
            i.key_pressed(Key::ArrowUp),
            i.pointer.any_pressed() || !i.keys_down.is_empty(),
        )
    });

    if pressed {
        activation.activate();
    }

    // egui reports wheel-down as a negative delta
    if scroll != 0.0 && over_viewport {
        input.dispatch(&FeedInput::Wheel { delta_y: -scroll });
    }

    if down {
        input.dispatch(&FeedInput::Key(NavKey::Down));
    }
    if up {
        input.dispatch(&FeedInput::Key(NavKey::Up));
    }

    if let Some(pos) = response.interact_pointer_pos() {
        if response.drag_started() {
            input.dispatch(&FeedInput::TouchStart { y: pos.y });
        } else if response.dragged() {
            input.dispatch(&FeedInput::TouchMove { y: pos.y });
        }
    }

    if response.drag_stopped() {
        input.dispatch(&FeedInput::TouchEnd);
    }
}

fn track_ui(ui: &mut Ui, reel: &mut VideoReel, carousel: Rect, offset_y: f32) {
    let total = reel.items().len();
    let page_height = carousel.height().max(1.0);

    if total == 0 {
        empty_feed(ui, reel, carousel);
        return;
    }

    let scrolled = -offset_y;
    let first = (scrolled / page_height).floor().max(0.0) as usize;
    let last = ((scrolled + page_height) / page_height).ceil().max(0.0) as usize;

    for index in first..last.min(total) {
        let top = carousel.top() + index as f32 * page_height + offset_y;
        let rect = Rect::from_min_size(pos2(carousel.left(), top), carousel.size());
        slot_ui(ui, reel, index, rect);
    }

    if !reel.has_more() {
        let top = carousel.top() + total as f32 * page_height + offset_y;
        let marker = Rect::from_min_size(
            pos2(carousel.left(), top),
            vec2(carousel.width(), page_height / 2.0),
        );
        if marker.intersects(carousel) {
            ui.painter().rect_filled(marker, 0.0, Color32::from_gray(51));
            ui.painter().text(
                marker.center(),
                Align2::CENTER_CENTER,
                "You've reached the end",
                FontId::proportional(18.0),
                Color32::WHITE,
            );
        }
    }

    if reel.is_fetching() {
        let spinner = Rect::from_center_size(
            pos2(carousel.center().x, carousel.bottom() - 112.0),
            vec2(28.0, 28.0),
        );
        ui.put(spinner, egui::Spinner::new().color(Color32::WHITE));
    }
}

fn slot_ui(ui: &mut Ui, reel: &mut VideoReel, index: usize, rect: Rect) {
    let Some(record) = reel.items().get(index).cloned() else {
        return;
    };

    match reel.slot(index) {
        SlotKind::Placeholder => {
            ui.painter().rect_filled(rect, 0.0, Color32::BLACK);
            ui.painter().text(
                rect.center(),
                Align2::CENTER_CENTER,
                "…",
                FontId::proportional(20.0),
                Color32::GRAY,
            );
        }

        SlotKind::Invalid => {
            ui.painter().rect_filled(rect, 0.0, Color32::BLACK);
            ui.painter().text(
                rect.center(),
                Align2::CENTER_CENTER,
                "This video failed to load or has no valid path",
                FontId::proportional(16.0),
                Color32::WHITE,
            );
        }

        SlotKind::Player => {
            ui.painter().rect_filled(rect, 0.0, Color32::from_gray(12));

            let poster = record
                .cover_url
                .as_deref()
                .or(record.thumbnail_url.as_deref());
            if let Some(poster) = poster {
                ui.put(rect, egui::Image::new(poster).fit_to_exact_size(rect.size()));
            }

            if index == reel.current_index() {
                if let Some(mut control) = reel.control(&record.id) {
                    show_controls(ui, rect, &mut control);
                }
            }
        }
    }
}

fn empty_feed(ui: &mut Ui, reel: &mut VideoReel, carousel: Rect) {
    let mut ui = ui.new_child(
        UiBuilder::new()
            .max_rect(carousel)
            .layout(Layout::centered_and_justified(egui::Direction::TopDown)),
    );

    if reel.is_fetching() {
        ui.add(egui::Spinner::new().size(48.0).color(Color32::WHITE));
        return;
    }

    ui.vertical_centered(|ui| {
        ui.add_space(carousel.height() / 2.0 - 32.0);
        ui.colored_label(Color32::WHITE, "No videos yet");
        if reel.has_more() && ui.button("Retry").clicked() {
            reel.retry();
        }
    });
}

fn nav_rail(ui: &mut Ui, reel: &mut VideoReel, rail: Rect) {
    let total = reel.items().len();
    let index = reel.current_index();
    let size = vec2(36.0, 40.0);

    ui.add_space((rail.height() / 2.0 - size.y).max(0.0));

    let prev = ui.add_enabled(index > 0, Button::new("⏶").min_size(size));
    if prev.clicked() {
        reel.go_to_prev();
    }

    let next = ui.add_enabled(index + 1 < total, Button::new("⏷").min_size(size));
    if next.clicked() {
        reel.go_to_next();
    }
}
