use seed::{prelude::*, virtual_dom::AtValue, *};
use serde_wasm_bindgen::to_value;
use shared::{HeatPoint, IncidentRecord, RouteData, RoutePayload};
use wasm_bindgen::prelude::{wasm_bindgen, JsValue};

pub mod overlay;
pub mod safety;

use crate::overlay::{heat_options, plan_incident_markers, plan_route, weigh_heat_points, RoutePlan};
use crate::safety::{color_for_score, format_distance, format_time, meter_fill_width, SafetyLevel};

#[wasm_bindgen(module = "/leaflet_map.js")]
extern "C" {
    #[wasm_bindgen(js_name = initMap)]
    fn init_map(lat: f64, lon: f64, zoom: f64);
    #[wasm_bindgen(js_name = setBaseLayer)]
    fn set_base_layer(url: String);
    #[wasm_bindgen(js_name = replaceRoute)]
    fn replace_route_js(plan: JsValue);
    #[wasm_bindgen(js_name = addIncidentMarkers)]
    fn add_incident_markers_js(markers: JsValue);
    #[wasm_bindgen(js_name = buildHeatLayer)]
    fn build_heat_layer_js(points: JsValue, options: JsValue);
    #[wasm_bindgen(js_name = setHeatLayerVisible)]
    fn set_heat_layer_visible(visible: bool);
    #[wasm_bindgen(js_name = setMapView)]
    fn set_map_view(lat: f64, lon: f64, zoom: f64);
}

const DEFAULT_CENTER: (f64, f64) = (36.096, -80.244);
const DEFAULT_ZOOM: f64 = 15.0;

const LIGHT_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const DARK_TILE_URL: &str =
    "https://tiles.stadiamaps.com/tiles/alidade_smooth_dark/{z}/{x}/{y}{r}.png";

const GENERIC_ERROR: &str = "Something went wrong";

fn api_root() -> String {
    if let Some(url) = option_env!("FRONTEND_API_ROOT") {
        return url.trim_end_matches('/').to_string();
    }
    "http://localhost:8080".to_string()
}

fn tile_url(is_dark: bool) -> &'static str {
    if is_dark {
        DARK_TILE_URL
    } else {
        LIGHT_TILE_URL
    }
}

pub struct Model {
    form: RouteForm,
    pending: bool,
    /// Tag of the most recently issued route request. Responses carrying
    /// an older tag lost the race and are dropped.
    request_seq: u64,
    route: Option<RouteData>,
    distance_text: Option<String>,
    time_text: Option<String>,
    error: Option<String>,
    dark_theme: bool,
    heatmap: HeatmapState,
    about_open: bool,
}

#[derive(Default, Clone)]
struct RouteForm {
    start: String,
    end: String,
}

impl RouteForm {
    fn to_query(&self) -> Result<(String, String), String> {
        let start = self.start.trim();
        let end = self.end.trim();
        if start.is_empty() || end.is_empty() {
            return Err("Please enter both locations".to_string());
        }
        Ok((start.to_string(), end.to_string()))
    }
}

/// The density layer is fetched and built at most once, then only toggled.
#[derive(Default, Clone, Copy)]
struct HeatmapState {
    built: bool,
    loading: bool,
    visible: bool,
}

pub enum Msg {
    StartChanged(String),
    EndChanged(String),
    Submit,
    RouteFetched {
        seq: u64,
        result: Result<RouteData, String>,
    },
    IncidentsFetched(Result<Vec<IncidentRecord>, String>),
    ToggleHeatmap,
    HeatDataFetched(Result<Vec<HeatPoint>, String>),
    ToggleTheme,
    Recenter,
    SetAboutOpen(bool),
}

pub fn init(_: Url, orders: &mut impl Orders<Msg>) -> Model {
    let dark_theme = detect_preferred_theme();
    if dark_theme {
        apply_map_theme(true);
    }
    orders.perform_cmd(fetch_incidents());

    Model {
        form: RouteForm::default(),
        pending: false,
        request_seq: 0,
        route: None,
        distance_text: None,
        time_text: None,
        error: None,
        dark_theme,
        heatmap: HeatmapState::default(),
        about_open: false,
    }
}

pub fn update(msg: Msg, model: &mut Model, orders: &mut impl Orders<Msg>) {
    match msg {
        Msg::StartChanged(value) => model.form.start = value,
        Msg::EndChanged(value) => model.form.end = value,
        Msg::Submit => match model.form.to_query() {
            Ok((start, end)) => {
                model.request_seq += 1;
                model.pending = true;
                model.error = None;
                orders.perform_cmd(fetch_route(model.request_seq, start, end));
            }
            Err(message) => model.error = Some(message),
        },
        Msg::RouteFetched { seq, result } => {
            if seq != model.request_seq {
                // A newer request was issued while this one was in flight.
                return;
            }
            model.pending = false;
            match result {
                Ok(route) => match plan_route(&route) {
                    Some(plan) => {
                        push_route_to_map(&plan);
                        if let Some(meters) = route.distance {
                            model.distance_text = Some(format_distance(meters));
                        }
                        if let Some(seconds) = route.duration {
                            model.time_text = Some(format_time(seconds));
                        }
                        model.route = Some(route);
                        model.error = None;
                    }
                    None => {
                        model.error = Some("The route has no drawable geometry".to_string());
                    }
                },
                Err(message) => model.error = Some(message),
            }
        }
        Msg::IncidentsFetched(result) => match result {
            Ok(records) => {
                if let Ok(markers) = to_value(&plan_incident_markers(&records)) {
                    add_incident_markers_js(markers);
                }
            }
            Err(message) => {
                web_sys::console::error_1(&format!("Error loading incidents: {message}").into());
            }
        },
        Msg::ToggleHeatmap => {
            if model.heatmap.visible {
                set_heat_layer_visible(false);
            } else if model.heatmap.built {
                set_heat_layer_visible(true);
            } else if !model.heatmap.loading {
                model.heatmap.loading = true;
                orders.perform_cmd(fetch_heat_data());
            }
            model.heatmap.visible = !model.heatmap.visible;
        }
        Msg::HeatDataFetched(result) => {
            model.heatmap.loading = false;
            match result {
                Ok(points) => {
                    build_heat_layer(&points);
                    model.heatmap.built = true;
                    if model.heatmap.visible {
                        set_heat_layer_visible(true);
                    }
                }
                Err(message) => {
                    web_sys::console::error_1(
                        &format!("Error loading heat data: {message}").into(),
                    );
                }
            }
        }
        Msg::ToggleTheme => {
            model.dark_theme = !model.dark_theme;
            apply_map_theme(model.dark_theme);
        }
        Msg::Recenter => set_map_view(DEFAULT_CENTER.0, DEFAULT_CENTER.1, DEFAULT_ZOOM),
        Msg::SetAboutOpen(open) => model.about_open = open,
    }
}

async fn fetch_route(seq: u64, start: String, end: String) -> Msg {
    let url = format!(
        "{}/route?start={}&end={}",
        api_root(),
        encode_query(&start),
        encode_query(&end)
    );
    // Domain errors arrive as `{"error": …}` bodies on 4xx/5xx statuses,
    // so the body is parsed regardless of status.
    let result = match Request::new(url).fetch().await {
        Err(err) => {
            web_sys::console::error_1(&format!("route fetch failed: {err:?}").into());
            Err(GENERIC_ERROR.to_string())
        }
        Ok(response) => match response.json::<RoutePayload>().await {
            Err(err) => {
                web_sys::console::error_1(&format!("route payload unreadable: {err:?}").into());
                Err(GENERIC_ERROR.to_string())
            }
            Ok(RoutePayload::Failure(failure)) => Err(failure.error),
            Ok(RoutePayload::Route(route)) => Ok(route),
        },
    };

    Msg::RouteFetched { seq, result }
}

async fn fetch_incidents() -> Msg {
    Msg::IncidentsFetched(get_json("/incidents").await)
}

async fn fetch_heat_data() -> Msg {
    Msg::HeatDataFetched(get_json("/safety-data").await)
}

async fn get_json<T: serde::de::DeserializeOwned + 'static>(path: &str) -> Result<T, String> {
    match Request::new(format!("{}{path}", api_root())).fetch().await {
        Err(err) => Err(format!("{err:?}")),
        Ok(raw) => match raw.check_status() {
            Err(status_err) => Err(format!("{status_err:?}")),
            Ok(response) => match response.json::<T>().await {
                Ok(value) => Ok(value),
                Err(err) => Err(format!("{err:?}")),
            },
        },
    }
}

fn encode_query(value: &str) -> String {
    js_sys::encode_uri_component(value).into()
}

fn push_route_to_map(plan: &RoutePlan) {
    if let Ok(value) = to_value(plan) {
        replace_route_js(value);
    }
}

fn build_heat_layer(points: &[HeatPoint]) {
    let weighted = weigh_heat_points(points);
    if let (Ok(points), Ok(options)) = (to_value(&weighted), to_value(&heat_options())) {
        build_heat_layer_js(points, options);
    }
}

fn apply_map_theme(is_dark: bool) {
    set_base_layer(tile_url(is_dark).to_string());
}

fn detect_preferred_theme() -> bool {
    web_sys::window()
        .and_then(|window| {
            window
                .match_media("(prefers-color-scheme: dark)")
                .ok()
                .flatten()
        })
        .map(|query| query.matches())
        .unwrap_or(false)
}

pub fn view(model: &Model) -> Node<Msg> {
    div![
        C!["app-container", IF!(model.dark_theme => "dark-theme")],
        view_topbar(model),
        view_search(model),
        view_results(model),
        view_about(model),
        view_loading(model),
    ]
}

fn view_topbar(model: &Model) -> Node<Msg> {
    header![
        C!["topbar"],
        h1!["Safe Route Finder"],
        div![
            C!["map-controls"],
            button![
                C!["theme-toggle"],
                attrs! { At::Title => "Toggle theme" },
                if model.dark_theme { "☀️" } else { "🌙" },
                ev(Ev::Click, |event| {
                    event.prevent_default();
                    Msg::ToggleTheme
                }),
            ],
            button![
                C!["heatmap-toggle", IF!(model.heatmap.visible => "active")],
                attrs! { At::Title => "Toggle heatmap" },
                "🔥",
                ev(Ev::Click, |event| {
                    event.prevent_default();
                    Msg::ToggleHeatmap
                }),
            ],
            button![
                C!["recenter"],
                attrs! { At::Title => "Recenter map" },
                "📍",
                ev(Ev::Click, |event| {
                    event.prevent_default();
                    Msg::Recenter
                }),
            ],
            a![
                C!["about-link"],
                attrs! { At::Href => "#" },
                "About",
                ev(Ev::Click, |event| {
                    event.prevent_default();
                    Msg::SetAboutOpen(true)
                }),
            ],
        ],
    ]
}

fn view_search(model: &Model) -> Node<Msg> {
    let location_input = |placeholder: &str, value: &str, msg: fn(String) -> Msg| {
        div![
            C!["input-group"],
            input![
                attrs! {
                    At::Value => value,
                    At::Placeholder => placeholder,
                    At::AutoComplete => "off",
                },
                input_ev(Ev::Input, msg),
                keyboard_ev(Ev::KeyDown, |event| {
                    IF!(event.key() == "Enter" => Msg::Submit)
                }),
            ],
        ]
    };

    div![
        C!["search-panel"],
        location_input("Start location", &model.form.start, Msg::StartChanged),
        location_input("End location", &model.form.end, Msg::EndChanged),
        button![
            "Find Route",
            attrs! { At::Disabled => bool_attr(model.pending) },
            ev(Ev::Click, |event| {
                event.prevent_default();
                Msg::Submit
            }),
        ],
        if let Some(error) = &model.error {
            p![C!["error"], error]
        } else {
            empty![]
        },
    ]
}

fn view_results(model: &Model) -> Node<Msg> {
    let Some(route) = &model.route else {
        return div![C!["route-info", "hidden"]];
    };
    let score = route.safety_score;
    let color = color_for_score(score);

    div![
        C!["route-info"],
        div![
            C!["score-row"],
            span![C!["score-label"], "Safety score"],
            span![
                C!["score-value"],
                style! { St::Color => color },
                format!("{score}"),
            ],
        ],
        div![
            C!["safety-meter"],
            div![
                C!["safety-meter-fill"],
                style! {
                    St::Width => meter_fill_width(score),
                    St::BackgroundColor => color,
                },
            ],
        ],
        div![
            C!["trip-stats"],
            span![
                C!["distance-value"],
                model.distance_text.clone().unwrap_or_default()
            ],
            span![
                C!["time-value"],
                model.time_text.clone().unwrap_or_default()
            ],
        ],
        view_safety_tips(score),
    ]
}

fn view_safety_tips(score: f64) -> Node<Msg> {
    let level = SafetyLevel::from_score(score);
    div![
        C!["safety-tips"],
        h3!["Safety tips"],
        ul![level.tips().iter().map(|tip| li![*tip])],
    ]
}

fn view_about(model: &Model) -> Node<Msg> {
    div![
        C!["modal", IF!(!model.about_open => "hidden")],
        div![
            C!["modal-content"],
            span![
                C!["close-btn"],
                "×",
                ev(Ev::Click, |_| Msg::SetAboutOpen(false)),
            ],
            h2!["About Safe Route Finder"],
            p!["Routes are scored 0–10 against recent incident reports. \
                Green segments are the safest, red ones the riskiest."],
            p!["Toggle the heatmap to see where incidents concentrate."],
        ],
    ]
}

fn view_loading(model: &Model) -> Node<Msg> {
    div![
        C!["loading-overlay", IF!(!model.pending => "hidden")],
        div![C!["spinner"]],
        p!["Finding the safest route…"],
    ]
}

#[wasm_bindgen(start)]
pub fn start() {
    init_map(DEFAULT_CENTER.0, DEFAULT_CENTER.1, DEFAULT_ZOOM);
    App::start("app", init, update, view);
}

fn bool_attr(value: bool) -> AtValue {
    if value {
        AtValue::Some("true".into())
    } else {
        AtValue::Ignored
    }
}
