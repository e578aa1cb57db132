use eframe::egui::{self, Align2, Color32, FontId, Sense, Shape, Stroke, Ui};
use egui_plot::{Bar, BarChart, Plot};

use crate::color::CategoryColors;
use crate::data::aggregate::Distribution;
use crate::state::GraphKind;

// ---------------------------------------------------------------------------
// Distribution charts (central panel)
// ---------------------------------------------------------------------------

/// Two side-by-side panels comparing the raw and filtered target
/// distributions, bar or pie per the form's graph selector. Stateless
/// pass-through: no retries, nothing cached.
pub fn distribution_charts(
    ui: &mut Ui,
    kind: GraphKind,
    raw: &Distribution,
    filtered: &Distribution,
) {
    // One shared color map so a category keeps its color in both panels.
    let colors = CategoryColors::new(raw.keys().chain(filtered.keys()).map(String::as_str));

    ui.columns(2, |cols: &mut [Ui]| {
        chart_panel(&mut cols[0], kind, "Raw data", raw, &colors);
        chart_panel(&mut cols[1], kind, "Filtered data", filtered, &colors);
    });
}

fn chart_panel(
    ui: &mut Ui,
    kind: GraphKind,
    title: &str,
    dist: &Distribution,
    colors: &CategoryColors,
) {
    match kind {
        GraphKind::Barras => {
            // An empty distribution gets no panel rather than an empty plot.
            if dist.is_empty() {
                return;
            }
            ui.strong(title);
            bar_panel(ui, title, dist, colors);
        }
        GraphKind::Pizza => {
            ui.strong(title);
            pie_panel(ui, dist, colors);
        }
    }
}

fn bar_panel(ui: &mut Ui, id: &str, dist: &Distribution, colors: &CategoryColors) {
    let labels: Vec<String> = dist.keys().cloned().collect();
    let bars: Vec<Bar> = dist
        .values()
        .enumerate()
        .map(|(i, pct)| {
            Bar::new(i as f64, *pct)
                .width(0.6)
                .name(labels[i].as_str())
                .fill(colors.color_for(&labels[i]))
        })
        .collect();

    let axis_labels = labels.clone();
    Plot::new(id)
        .height(220.0)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show_grid(true)
        .y_axis_label("percent")
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            axis_labels
                .get(idx as usize)
                .cloned()
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

fn pie_panel(ui: &mut Ui, dist: &Distribution, colors: &CategoryColors) {
    let side = ui.available_width().min(240.0).max(120.0);
    let (rect, _) = ui.allocate_exact_size(egui::vec2(side, side), Sense::hover());
    let painter = ui.painter_at(rect);
    let center = rect.center();
    let radius = side * 0.45;

    let mut start = -std::f32::consts::FRAC_PI_2;
    for (label, pct) in dist {
        let sweep = (*pct as f32 / 100.0) * std::f32::consts::TAU;
        painter.add(pie_slice(center, radius, start, sweep, colors.color_for(label)));

        let mid = start + sweep / 2.0;
        let text_pos = center + egui::vec2(mid.cos(), mid.sin()) * (radius * 0.6);
        painter.text(
            text_pos,
            Align2::CENTER_CENTER,
            format!("{label} {pct:.2}%"),
            FontId::proportional(12.0),
            Color32::WHITE,
        );

        start += sweep;
    }
}

/// Build one filled slice as a fan from the center. Slices wider than a
/// quarter turn are tessellated in convex chunks.
fn pie_slice(
    center: egui::Pos2,
    radius: f32,
    start: f32,
    sweep: f32,
    color: Color32,
) -> Vec<Shape> {
    let mut shapes = Vec::new();
    let mut a0 = start;
    let end = start + sweep;

    while a0 < end - 1e-4 {
        let a1 = (a0 + std::f32::consts::FRAC_PI_2).min(end);
        let steps = 16;
        let mut points = vec![center];
        for s in 0..=steps {
            let a = a0 + (a1 - a0) * s as f32 / steps as f32;
            points.push(center + egui::vec2(a.cos(), a.sin()) * radius);
        }
        shapes.push(Shape::convex_polygon(points, color, Stroke::NONE));
        a0 = a1;
    }
    shapes
}
