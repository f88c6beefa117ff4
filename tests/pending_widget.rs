use mapbridge::{
    MapBuilder, MapOptions, MapWidget,
    control::{Placement, Position, VisibilityToggleOptions, ZoomControlOptions},
    expression::{boolean_switch, step_colours},
    feature::GeoJsonData,
    filter::parse_filter,
    operations::{
        layers::{Layer, LayerType},
        panels::{GroupDescriptor, PanelOptions},
        routes::Route,
        sources::SourceOptions,
        view::LatLngGrid,
    },
};
use serde_json::{Value, json};
use tempfile::TempDir;

fn widget() -> MapWidget {
    MapWidget::with_id("map1", MapOptions::default()).sized("100%", "400px")
}

fn quakes() -> GeoJsonData {
    GeoJsonData::inline(json!({
        "type": "Point",
        "coordinates": [174.7, -36.8],
    }))
    .unwrap()
}

#[test]
fn full_configuration_lands_in_first_render_payload() {
    let mut map = widget();

    map.add_geojson_source("quakes", quakes())
        .add_layer(
            Layer::new("quakes", LayerType::Circle, "quakes")
                .paint(
                    "circle-color",
                    step_colours("mag", [4, 6], ["green", "orange", "red"]).unwrap(),
                )
                .paint("circle-stroke-color", boolean_switch("felt", "black", "white"))
                .filter(parse_filter(&["mag>=4"]).unwrap())
                .popup("place"),
        )
        .add_control(ZoomControlOptions::default(), Placement::default())
        .add_control(
            VisibilityToggleOptions {
                layer_id: "quakes".to_string(),
                initially_visible: true,
                ..Default::default()
            },
            Placement::panel("layers").titled("Earthquakes"),
        )
        .add_lat_lng_grid(LatLngGrid::default())
        .set_selected_tiles("osm")
        .set_zoom(5.0);

    let payload: Value = serde_json::from_str(&map.into_payload().to_json().unwrap()).unwrap();
    let x = &payload["x"];

    assert_eq!(payload["elementId"], "map1");
    assert_eq!(x["sources"][0]["sourceId"], "quakes");
    assert_eq!(
        x["sources"][0]["sourceOptions"]["data"]["type"],
        "FeatureCollection"
    );
    assert_eq!(x["layers"][0]["filter"], json!(["mag", ">=", "4"]));
    assert_eq!(
        x["layers"][0]["paint"]["circle-color"],
        json!(["step", ["get", "mag"], "green", 4, "orange", 6, "red"])
    );
    assert_eq!(x["zoomControl"]["position"], "top-right");
    assert_eq!(
        x["controlPanels"]["layers"]["options"]["panelControls"][0]["type"],
        "control"
    );
    assert_eq!(x["initialTileLayer"], "osm");
    assert_eq!(x["setZoom"], 5.0);
    assert!(x["latLngGrid"].is_object());
}

#[test]
fn layer_order_follows_calls_and_before_id_is_verbatim() {
    let mut map = widget();

    for id in ["water", "roads", "labels"] {
        map.add_layer(Layer::new(id, LayerType::Line, "base"));
    }
    map.add_layer(Layer::new("parks", LayerType::Fill, "base").before("roads"))
        .add_layer(Layer::new("ghost", LayerType::Fill, "base").before("missing"));

    let layers = &map.config().layers;
    let ids: Vec<&str> = layers.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, ["water", "roads", "labels", "parks", "ghost"]);
    assert_eq!(layers[3].before_id.as_deref(), Some("roads"));
    assert_eq!(layers[4].before_id.as_deref(), Some("missing"));
}

#[test]
fn panel_upsert_never_drops_entries() {
    let mut map = widget();

    map.add_control_panel("tools", PanelOptions::default())
        .add_control_group(
            "tools",
            GroupDescriptor {
                group_id: "g1".to_string(),
                title: Some("Group".to_string()),
                ..Default::default()
            },
        )
        .add_control(
            ZoomControlOptions::default(),
            Placement::panel("tools").in_group("g1"),
        )
        .add_control_panel(
            "tools",
            PanelOptions {
                position: Position::TopRight,
                ..Default::default()
            },
        );

    let panel = map.config().panel("tools").unwrap();
    assert_eq!(panel.options.panel_controls.len(), 2);
    assert_eq!(panel.options.position, Position::BottomLeft);
}

#[test]
fn singleton_slots_keep_first_declaration() {
    let mut map = widget();

    map.add_lat_lng_grid(LatLngGrid {
        spacing: 5.0,
        ..Default::default()
    })
    .add_lat_lng_grid(LatLngGrid {
        spacing: 20.0,
        ..Default::default()
    })
    .toggle_lat_lng_grid(false);

    let grid = map.config().lat_lng_grid.get().unwrap();
    assert_eq!(grid.spacing, 5.0);
    assert!(!grid.visible);
}

#[test]
fn pending_layer_mutations_update_the_declared_layer() {
    let mut map = widget();

    map.add_source("quakes", SourceOptions::geojson(quakes()).clustered(50, 14))
        .add_layer(Layer::new("quakes", LayerType::Circle, "quakes").clusterable())
        .hide_layer("quakes")
        .set_paint_property("quakes", "circle-radius", 6)
        .toggle_clustering("quakes", true);

    let layer = map.config().layer("quakes").unwrap();
    assert_eq!(layer.layout["visibility"], "none");
    assert_eq!(layer.paint["circle-radius"], 6);
    assert_eq!(layer.clustered, Some(true));
}

#[test]
fn routes_can_be_marked_for_autoplay() {
    let mut map = widget();

    map.add_route(Route::new("trip", vec![[0.0, 0.0], [1.0, 1.0]]))
        .animate_route("trip", Some(2000), true);

    let route = &map.config().routes[0];
    assert!(route.autoplay);
    assert_eq!(route.duration_ms, 2000);
    assert!(route.loop_animation);
}

#[test]
fn payload_is_written_to_file() {
    let dir = TempDir::new().expect("failed to create temp directory");
    let path = dir.path().join("map.json");
    let mut map = widget();
    map.set_zoom(3.0);

    map.into_payload().write_to(&path).unwrap();

    let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written["elementId"], "map1");
    assert_eq!(written["height"], "400px");
    assert_eq!(written["x"]["setZoom"], 3.0);
}

#[test]
fn payload_write_to_missing_directory_fails() {
    let dir = TempDir::new().expect("failed to create temp directory");
    let path = dir.path().join("missing").join("map.json");

    assert!(widget().into_payload().write_to(&path).is_err());
}
