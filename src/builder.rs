//! The builder call surface shared by pending and live maps.
//!
//! Every method turns its arguments into an operation and hands it to
//! [`MapTarget::dispatch`], so the same chain of calls either configures a map
//! before first render or updates one that is already on screen:
//!
//! ```no_run
//! use mapbridge::{
//!     MapBuilder, MapOptions, MapWidget,
//!     control::{Placement, ZoomControlOptions},
//!     operations::layers::{Layer, LayerType},
//! };
//!
//! let mut map = MapWidget::new(MapOptions::default());
//! map.add_layer(Layer::new("quakes", LayerType::Circle, "quakes"))
//!     .add_control(ZoomControlOptions::default(), Placement::default())
//!     .set_zoom(4.0);
//! ```

use crate::{
    control::{ControlKind, ControlOptions, Placement},
    error::MapError,
    feature::GeoJsonData,
    operations::{
        controls::{
            AddStandaloneControl, DeleteDrawnShape, HideDrawControls, RemoveControl,
            ShowDrawControls, ToggleControl,
        },
        export::{DownloadMapImage, ImageFormat},
        layers::{
            AddLayer, HideLayer, Layer, SetLayoutProperty, SetPaintProperty, ShowLayer,
            ToggleClustering,
        },
        panels::{
            AddControlGroup, AddControlPanel, AddControlToPanel, GroupDescriptor, PanelControl,
            PanelOptions, RemoveControlFromPanel, RemoveControlGroup,
        },
        routes::{AnimateRoute, PauseRoute, RemoveRoute, Route},
        sources::{FeatureServerSource, ImageSource, Source, SourceOptions, UpdateSourceData},
        view::{LatLngGrid, SelectTiles, SetBounds, SetZoom, ToggleLatLngGrid},
    },
    target::MapTarget,
};
use log::{error, warn};
use serde_json::Value;

/// Envelope fields a standalone control's options may not carry.
const STANDALONE_RESERVED_KEYS: [&str; 2] = ["id", "position"];

pub trait MapBuilder: MapTarget {
    fn add_source(&mut self, source_id: &str, options: SourceOptions) -> &mut Self {
        self.dispatch(Source::new(source_id, options))
    }

    fn add_geojson_source(&mut self, source_id: &str, data: GeoJsonData) -> &mut Self {
        self.add_source(source_id, SourceOptions::geojson(data))
    }

    fn add_feature_server_source(
        &mut self,
        source_id: &str,
        url: &str,
        options: SourceOptions,
    ) -> &mut Self {
        self.dispatch(FeatureServerSource {
            source_id: source_id.to_string(),
            url: url.to_string(),
            source_options: options,
        })
    }

    fn add_image_source(
        &mut self,
        source_id: &str,
        url: &str,
        coordinates: [[f64; 2]; 4],
    ) -> &mut Self {
        self.dispatch(ImageSource {
            source_id: source_id.to_string(),
            url: url.to_string(),
            coordinates,
        })
    }

    fn update_source_data(&mut self, source_id: &str, data: GeoJsonData) -> &mut Self {
        self.dispatch(UpdateSourceData {
            source_id: source_id.to_string(),
            data,
        })
    }

    fn add_layer(&mut self, layer: Layer) -> &mut Self {
        self.dispatch(AddLayer { layer })
    }

    fn hide_layer(&mut self, layer_id: &str) -> &mut Self {
        self.dispatch(HideLayer {
            layer_id: layer_id.to_string(),
        })
    }

    fn show_layer(&mut self, layer_id: &str) -> &mut Self {
        self.dispatch(ShowLayer {
            layer_id: layer_id.to_string(),
        })
    }

    fn set_selected_tiles(&mut self, tiles: &str) -> &mut Self {
        self.dispatch(SelectTiles {
            tiles: tiles.to_string(),
        })
    }

    fn toggle_clustering(&mut self, layer_id: &str, enabled: bool) -> &mut Self {
        self.dispatch(ToggleClustering {
            layer_id: layer_id.to_string(),
            enabled,
        })
    }

    fn set_paint_property(
        &mut self,
        layer_id: &str,
        property: &str,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.dispatch(SetPaintProperty {
            layer_id: layer_id.to_string(),
            property: property.to_string(),
            value: value.into(),
        })
    }

    fn set_layout_property(
        &mut self,
        layer_id: &str,
        property: &str,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.dispatch(SetLayoutProperty {
            layer_id: layer_id.to_string(),
            property: property.to_string(),
            value: value.into(),
        })
    }

    fn add_lat_lng_grid(&mut self, grid: LatLngGrid) -> &mut Self {
        self.dispatch(grid)
    }

    fn toggle_lat_lng_grid(&mut self, visible: bool) -> &mut Self {
        self.dispatch(ToggleLatLngGrid { visible })
    }

    fn set_zoom(&mut self, zoom: f64) -> &mut Self {
        self.dispatch(SetZoom { zoom })
    }

    /// Fit the view to `[west, south, east, north]`.
    fn set_bounds(&mut self, bounds: [f64; 4], padding: Option<f64>) -> &mut Self {
        self.dispatch(SetBounds {
            bounds,
            padding,
            animate: false,
        })
    }

    /// Add a control of any kind, in a map corner or inside a panel.
    fn add_control<C: ControlOptions>(&mut self, options: C, placement: Placement) -> &mut Self {
        if let Err(errors) = options.validate() {
            error!(
                "{}",
                MapError::invalid_input(format!("{} control: {errors}", C::KIND))
            );
            return self;
        }

        match serde_json::to_value(&options) {
            Ok(options) => self.add_control_value(C::KIND, options, placement),
            Err(e) => {
                error!("failed to serialize {} control options: {e}", C::KIND);
                self
            }
        }
    }

    /// Add a control from untyped options. A non-blank panel id redirects the
    /// control into that panel; otherwise it goes to its kind's corner slot.
    fn add_control_value(
        &mut self,
        kind: ControlKind,
        options: Value,
        placement: Placement,
    ) -> &mut Self {
        if kind == ControlKind::Group {
            error!("{}", MapError::invalid_input("groups are added with add_control_group"));
            return self;
        }
        if !options.is_object() {
            error!(
                "{}",
                MapError::invalid_input(format!("{kind} control options must be an object"))
            );
            return self;
        }

        let position = placement.position();
        match placement {
            Placement::Panel {
                panel_id,
                panel_title,
                group_id,
            } if !panel_id.trim().is_empty() => self.add_control_to_panel(
                &panel_id,
                PanelControl {
                    control_type: kind,
                    control_options: options,
                    panel_title,
                    group_id,
                },
            ),
            placement => {
                // standalone options share the message object with the envelope
                if let Some(key) = STANDALONE_RESERVED_KEYS
                    .iter()
                    .find(|key| options.get(**key).is_some())
                {
                    error!(
                        "{}",
                        MapError::invalid_input(format!(
                            "{kind} control options must not contain {key:?}"
                        ))
                    );
                    return self;
                }
                if let Placement::Panel { .. } = placement {
                    warn!("blank panel id, placing {kind} control at its default position");
                }

                self.dispatch(AddStandaloneControl {
                    kind,
                    position: position.unwrap_or_else(|| kind.default_position()),
                    options,
                })
            }
        }
    }

    fn add_control_panel(&mut self, panel_id: &str, options: PanelOptions) -> &mut Self {
        self.dispatch(AddControlPanel {
            panel_id: panel_id.to_string(),
            options,
        })
    }

    fn add_control_group(&mut self, panel_id: &str, group: GroupDescriptor) -> &mut Self {
        self.dispatch(AddControlGroup {
            panel_id: panel_id.to_string(),
            group,
        })
    }

    fn remove_control_group(&mut self, panel_id: &str, group_id: &str) -> &mut Self {
        self.dispatch(RemoveControlGroup {
            panel_id: panel_id.to_string(),
            group_id: group_id.to_string(),
        })
    }

    fn add_control_to_panel(&mut self, panel_id: &str, control: PanelControl) -> &mut Self {
        self.dispatch(AddControlToPanel {
            panel_id: panel_id.to_string(),
            control,
        })
    }

    fn remove_control_from_panel(&mut self, panel_id: &str, control_id: &str) -> &mut Self {
        self.dispatch(RemoveControlFromPanel {
            panel_id: panel_id.to_string(),
            control_id: control_id.to_string(),
        })
    }

    fn toggle_control(&mut self, control_id: &str, visible: bool) -> &mut Self {
        self.dispatch(ToggleControl {
            control_id: control_id.to_string(),
            visible,
        })
    }

    fn remove_control(&mut self, control_id: &str) -> &mut Self {
        self.dispatch(RemoveControl {
            control_id: control_id.to_string(),
        })
    }

    /// Remove a standalone control by kind, resolving the id the browser
    /// runtime gave it. Per-layer kinds need `layer_id`.
    fn remove_control_of_kind(&mut self, kind: ControlKind, layer_id: Option<&str>) -> &mut Self {
        match kind.control_id(self.map_id(), layer_id) {
            Some(control_id) => self.remove_control(&control_id),
            None => {
                error!(
                    "{}",
                    MapError::invalid_input(format!("cannot resolve the id of a {kind} control"))
                );
                self
            }
        }
    }

    fn remove_zoom_control(&mut self) -> &mut Self {
        self.remove_control_of_kind(ControlKind::Zoom, None)
    }

    fn remove_cursor_control(&mut self) -> &mut Self {
        self.remove_control_of_kind(ControlKind::Cursor, None)
    }

    fn remove_draw_control(&mut self) -> &mut Self {
        self.remove_control_of_kind(ControlKind::Draw, None)
    }

    fn remove_timeline_control(&mut self) -> &mut Self {
        self.remove_control_of_kind(ControlKind::Timeline, None)
    }

    fn remove_speed_control(&mut self) -> &mut Self {
        self.remove_control_of_kind(ControlKind::Speed, None)
    }

    fn remove_tile_selector(&mut self) -> &mut Self {
        self.remove_control_of_kind(ControlKind::TileSelector, None)
    }

    fn remove_layer_selector(&mut self) -> &mut Self {
        self.remove_control_of_kind(ControlKind::LayerSelector, None)
    }

    fn remove_cluster_toggle(&mut self, layer_id: &str) -> &mut Self {
        self.remove_control_of_kind(ControlKind::ClusterToggle, Some(layer_id))
    }

    fn remove_visibility_toggle(&mut self, layer_id: &str) -> &mut Self {
        self.remove_control_of_kind(ControlKind::VisibilityToggle, Some(layer_id))
    }

    fn delete_drawn_shape(&mut self, shape_id: &str) -> &mut Self {
        self.dispatch(DeleteDrawnShape {
            shape_id: shape_id.to_string(),
        })
    }

    fn hide_draw_controls(&mut self) -> &mut Self {
        self.dispatch(HideDrawControls {})
    }

    fn show_draw_controls(&mut self) -> &mut Self {
        self.dispatch(ShowDrawControls {})
    }

    fn add_route(&mut self, route: Route) -> &mut Self {
        self.dispatch(route)
    }

    fn animate_route(
        &mut self,
        route_id: &str,
        duration_ms: Option<u64>,
        loop_animation: bool,
    ) -> &mut Self {
        self.dispatch(AnimateRoute {
            route_id: route_id.to_string(),
            duration_ms,
            loop_animation,
        })
    }

    fn pause_route(&mut self, route_id: &str) -> &mut Self {
        self.dispatch(PauseRoute {
            route_id: route_id.to_string(),
        })
    }

    fn remove_route(&mut self, route_id: &str) -> &mut Self {
        self.dispatch(RemoveRoute {
            route_id: route_id.to_string(),
        })
    }

    fn download_map_image(&mut self, filename: &str, format: ImageFormat) -> &mut Self {
        self.dispatch(DownloadMapImage {
            filename: filename.to_string(),
            format,
        })
    }
}

impl<M: MapTarget + ?Sized> MapBuilder for M {}
