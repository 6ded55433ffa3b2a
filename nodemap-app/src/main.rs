use anyhow::{bail, Context};
use nodemap::{
    core::{config::MapViewConfig, geo::Point, map::MapView},
    data::{dataset::Dataset, params::DisplayParams},
    layers::{
        filter::AgeFilter,
        marker::{MarkerIcon, MarkerId},
    },
    traits::MapBackend,
    HeadlessMap, LatLngBounds,
};

const MARKER_RADIUS: f32 = 7.0;
const CLUSTER_CELL: f32 = 60.0;

/// Command line: `nodemap-app <dataset.json> [address] [--config cfg.json]`
struct Args {
    dataset: String,
    address: String,
    config: Option<String>,
}

impl Args {
    fn parse() -> anyhow::Result<Self> {
        let mut dataset = None;
        let mut address = None;
        let mut config = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    config = Some(args.next().context("--config needs a path")?);
                }
                _ if dataset.is_none() => dataset = Some(arg),
                _ if address.is_none() => address = Some(arg),
                _ => bail!("unexpected argument {:?}", arg),
            }
        }

        Ok(Self {
            dataset: dataset
                .context("usage: nodemap-app <dataset.json> [address] [--config cfg.json]")?,
            address: address.unwrap_or_default(),
            config,
        })
    }
}

/// Standalone node map viewer
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse()?;
    let dataset = Dataset::from_path(&args.dataset)
        .with_context(|| format!("loading dataset {}", args.dataset))?;
    let config = match &args.config {
        Some(path) => {
            MapViewConfig::from_path(path).with_context(|| format!("loading config {}", path))?
        }
        None => MapViewConfig::default(),
    };

    let size = [config.viewport.width as f32, config.viewport.height as f32];
    let mut map = HeadlessMap::new(&config.viewport);
    let view = MapView::initialize(
        &dataset,
        DisplayParams::from_address(&args.address),
        config,
        &mut map,
    );
    log::info!("loaded {} markers from {}", view.markers().len(), args.dataset);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(size)
            .with_title("Node Map"),
        ..Default::default()
    };

    eframe::run_native(
        "nodemap-app",
        options,
        Box::new(move |_cc| Box::new(NodeMapApp { view, map })),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {}", e))
}

struct NodeMapApp {
    view: MapView,
    map: HeadlessMap,
}

/// Markers close together on screen, drawn as one bubble when clustering
struct ScreenGroup {
    pos: egui::Pos2,
    members: Vec<MarkerId>,
    bounds: LatLngBounds,
    icon: MarkerIcon,
}

fn icon_color(icon: MarkerIcon) -> egui::Color32 {
    let [r, g, b] = icon.rgb();
    egui::Color32::from_rgb(r, g, b)
}

/// Popup markup as plain lines
fn popup_text(content: &str) -> String {
    let mut text = String::with_capacity(content.len());
    let mut in_tag = false;
    let mut tag = String::new();

    for c in content.chars() {
        match c {
            '<' => {
                in_tag = true;
                tag.clear();
            }
            '>' if in_tag => {
                in_tag = false;
                if tag.eq_ignore_ascii_case("br") || tag.eq_ignore_ascii_case("br/") {
                    text.push('\n');
                }
            }
            _ if in_tag => tag.push(c),
            _ => text.push(c),
        }
    }
    text
}

impl NodeMapApp {
    fn screen_pos(&self, origin: egui::Pos2, marker: MarkerId) -> Option<egui::Pos2> {
        let marker = self.map.marker(marker)?;
        let p = self.map.viewport().lat_lng_to_pixel(&marker.position());
        Some(origin + egui::vec2(p.x as f32, p.y as f32))
    }

    fn groups(&self, origin: egui::Pos2) -> Vec<ScreenGroup> {
        let mut groups: Vec<ScreenGroup> = Vec::new();
        // Past the cluster max zoom every marker is shown on its own
        let zoom = self.map.zoom();
        let clustered = self
            .map
            .clusterer()
            .is_some_and(|c| zoom <= f64::from(c.options().max_zoom));

        for marker in self.map.visible_markers() {
            let Some(pos) = self.screen_pos(origin, marker.id()) else {
                continue;
            };
            let existing = if clustered {
                groups
                    .iter()
                    .position(|g| (g.pos - pos).length() < CLUSTER_CELL)
            } else {
                None
            };

            match existing {
                Some(index) => {
                    let group = &mut groups[index];
                    group.members.push(marker.id());
                    group.bounds.extend(&marker.position());
                }
                None => groups.push(ScreenGroup {
                    pos,
                    members: vec![marker.id()],
                    bounds: marker.bounds(),
                    icon: marker.icon(),
                }),
            }
        }
        groups
    }

    fn side_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("panel").resizable(false).show(ctx, |ui| {
            ui.heading("Legend");
            for (icon, label) in [
                (MarkerIcon::Red, "This node"),
                (MarkerIcon::Green, "Voice channel"),
                (MarkerIcon::Blue, "Other"),
            ] {
                ui.horizontal(|ui| {
                    let (rect, _) =
                        ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
                    ui.painter()
                        .circle_filled(rect.center(), MARKER_RADIUS - 1.0, icon_color(icon));
                    ui.label(label);
                });
            }

            ui.separator();
            ui.heading("Last heard");
            for filter in AgeFilter::ALL {
                let selected = self.view.age_threshold() == Some(filter.threshold_secs());
                if ui.selectable_label(selected, filter.label()).clicked() {
                    self.view.apply_filter(filter, &mut self.map);
                }
            }

            ui.separator();
            let shown = self.view.visible_markers().count();
            ui.label(format!("{} of {} shown", shown, self.view.markers().len()));
        });
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click());
        let rect = response.rect;
        self.map.resize(f64::from(rect.width()), f64::from(rect.height()));

        painter.rect_filled(rect, 0.0, egui::Color32::from_rgb(230, 230, 230));

        let groups = self.groups(rect.min);
        for group in &groups {
            if group.members.len() > 1 {
                painter.circle_filled(
                    group.pos,
                    MARKER_RADIUS * 2.5,
                    egui::Color32::from_rgb(255, 200, 60),
                );
                painter.text(
                    group.pos,
                    egui::Align2::CENTER_CENTER,
                    group.members.len().to_string(),
                    egui::FontId::proportional(13.0),
                    egui::Color32::BLACK,
                );
            } else {
                painter.circle_filled(group.pos, MARKER_RADIUS, icon_color(group.icon));
                painter.circle_stroke(
                    group.pos,
                    MARKER_RADIUS,
                    egui::Stroke::new(1.0, egui::Color32::BLACK),
                );
            }
        }

        if response.clicked() {
            if let Some(pointer) = response.interact_pointer_pos() {
                self.on_click(pointer, &groups, rect.min);
            }
        }

        if response.hovered() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                self.map.zoom_by(if scroll > 0.0 { 1.0 } else { -1.0 });
                self.view.pump(&mut self.map);
            }
        }

        let zoom = self.map.zoom();
        painter.text(
            rect.right_bottom() - egui::vec2(8.0, 8.0),
            egui::Align2::RIGHT_BOTTOM,
            format!("zoom {}", zoom),
            egui::FontId::monospace(12.0),
            egui::Color32::DARK_GRAY,
        );

        self.popup(ui.ctx(), rect.min);
    }

    fn on_click(&mut self, pointer: egui::Pos2, groups: &[ScreenGroup], origin: egui::Pos2) {
        let hit_group = groups
            .iter()
            .find(|g| g.members.len() > 1 && (g.pos - pointer).length() <= MARKER_RADIUS * 2.5);
        if let Some(group) = hit_group {
            self.map.click_cluster(group.bounds.clone());
        } else {
            let local = pointer - origin;
            let pixel = Point::new(f64::from(local.x), f64::from(local.y));
            if let Some(id) = self.map.marker_at(pixel, f64::from(MARKER_RADIUS) + 2.0) {
                self.map.click_marker(id);
            }
        }
        self.view.pump(&mut self.map);
    }

    fn popup(&mut self, ctx: &egui::Context, origin: egui::Pos2) {
        let Some(popup) = self.map.popup().cloned() else {
            return;
        };
        let Some(anchor) = self.screen_pos(origin, popup.anchor) else {
            return;
        };

        let mut close = false;
        egui::Area::new(egui::Id::new("marker_popup"))
            .fixed_pos(anchor + egui::vec2(MARKER_RADIUS + 4.0, -MARKER_RADIUS))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(popup_text(&popup.content));
                        close = ui.small_button("x").clicked();
                    });
                });
            });

        if close {
            self.map.dismiss_popup();
            self.view.pump(&mut self.map);
        }
    }
}

impl eframe::App for NodeMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.map.panel_visible() {
            self.side_panel(ctx);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.canvas(ui));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clustered_app() -> NodeMapApp {
        let dataset = Dataset::from_json_str(
            r#"{
                "node": { "user_id": "N1", "lat": 10, "lng": 10, "age": 0 },
                "user": [ { "user_id": "U1", "lat": 10, "lng": 10, "age": 60 } ]
            }"#,
        )
        .unwrap();
        let (view, map) = nodemap::MapViewBuilder::new()
            .dataset(dataset)
            .address("?style=cluster")
            .build_headless()
            .unwrap();
        NodeMapApp { view, map }
    }

    fn group_sizes(app: &NodeMapApp) -> Vec<usize> {
        app.groups(egui::Pos2::ZERO)
            .iter()
            .map(|g| g.members.len())
            .collect()
    }

    #[test]
    fn test_colocated_markers_split_after_cluster_click() {
        let mut app = clustered_app();
        app.map.set_zoom(10.0);
        app.view.pump(&mut app.map);
        assert_eq!(group_sizes(&app), vec![2]);

        let groups = app.groups(egui::Pos2::ZERO);
        app.on_click(groups[0].pos, &groups, egui::Pos2::ZERO);
        assert_eq!(app.map.zoom(), 18.0);
        assert_eq!(group_sizes(&app), vec![1, 1]);

        let groups = app.groups(egui::Pos2::ZERO);
        app.on_click(groups[1].pos, &groups, egui::Pos2::ZERO);
        assert_eq!(app.view.popup().map(|p| p.anchor), Some(MarkerId(1)));
    }

    #[test]
    fn test_grouping_holds_up_to_cluster_max_zoom() {
        let mut app = clustered_app();
        app.map.set_zoom(17.0);
        assert_eq!(group_sizes(&app), vec![2]);
        app.map.set_zoom(18.0);
        assert_eq!(group_sizes(&app), vec![1, 1]);
    }

    #[test]
    fn test_popup_text_breaks_lines() {
        assert_eq!(
            popup_text("<b>N1</b><br>This Node<br>VE4N(1)"),
            "N1\nThis Node\nVE4N(1)"
        );
        assert_eq!(popup_text("plain"), "plain");
    }
}
