use egui::{vec2, Align, Align2, Color32, FontId, Layout, Rect, Sense, Ui, UiBuilder};
use reeldeck::{format_time, MediaElement, VideoControl};

const BAR_HEIGHT: f32 = 72.0;
const RATES: [f32; 5] = [0.5, 1.0, 1.25, 1.5, 2.0];

/// Overlay for the active video: tap to toggle, seek bar, volume and speed.
pub fn show_controls<E: MediaElement>(
    ui: &mut Ui,
    rect: Rect,
    control: &mut VideoControl<'_, E>,
) {
    let tap = ui.interact(rect, ui.id().with("video_toggle"), Sense::click());
    if tap.clicked() {
        control.toggle_play();
    }

    let state = *control.state();
    if !state.is_playing {
        ui.painter().text(
            rect.center(),
            Align2::CENTER_CENTER,
            "▶",
            FontId::proportional(72.0),
            Color32::from_white_alpha(200),
        );
    }

    let bar = Rect::from_min_size(
        rect.left_bottom() - vec2(0.0, BAR_HEIGHT),
        vec2(rect.width(), BAR_HEIGHT),
    );
    ui.painter().rect_filled(bar, 0.0, Color32::from_black_alpha(150));

    let mut bar_ui = ui.new_child(UiBuilder::new().max_rect(bar.shrink(8.0)));
    bar_ui.style_mut().spacing.slider_width = (bar.width() - 32.0).max(64.0);

    seek_bar(&mut bar_ui, control);

    bar_ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
        let play_label = if state.is_playing { "⏸" } else { "▶" };
        if ui.button(play_label).clicked() {
            control.toggle_play();
        }

        ui.colored_label(
            Color32::WHITE,
            format!(
                "{} / {}",
                format_time(state.current_time),
                format_time(state.duration)
            ),
        );

        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            let mut rate = state.playback_rate;
            egui::ComboBox::from_id_salt("playback_rate")
                .width(56.0)
                .selected_text(format!("{rate}x"))
                .show_ui(ui, |ui| {
                    for option in RATES {
                        ui.selectable_value(&mut rate, option, format!("{option}x"));
                    }
                });
            if rate != state.playback_rate {
                control.set_playback_rate(rate);
            }

            let mut volume = if state.is_muted { 0.0 } else { state.volume };
            let volume_resp = ui.add_sized(
                [80.0, 16.0],
                egui::Slider::new(&mut volume, 0.0..=1.0).show_value(false),
            );
            if volume_resp.changed() {
                control.set_volume(volume);
            }

            let mute_label = if state.is_muted { "🔇" } else { "🔊" };
            if ui.button(mute_label).clicked() {
                control.toggle_mute();
            }
        });
    });
}

fn seek_bar<E: MediaElement>(ui: &mut Ui, control: &mut VideoControl<'_, E>) {
    let state = *control.state();
    let mut time = state.current_time;
    let max = state.duration.max(0.01);

    let resp = ui.add_enabled(
        state.duration > 0.0,
        egui::Slider::new(&mut time, 0.0..=max).show_value(false),
    );

    if resp.dragged() || resp.changed() {
        control.seek(time);
    }

    if resp.drag_stopped() || (resp.changed() && !resp.dragged()) {
        control.end_seek();
    }
}
