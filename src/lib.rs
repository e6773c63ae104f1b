#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod components;
pub mod geom;
pub mod graph;

use std::fmt;

use components::reflect::{
    META_EPSILON, META_UNBOUNDED, PIN_FACE_NORMALS, PIN_HIT_POINTS, PIN_LINES_IN, PIN_LINES_OUT,
    PIN_VECS_INPUT, PIN_VECS_REF,
};
use components::{ComponentError, ComponentRegistry, OutputMap};
use graph::node::{MetaMap, MetaValue};
use graph::value::Value;
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

/// GUID waaronder het Reflect-component in GHX-bestanden voorkomt.
pub const REFLECT_GUID: &str = "6e0a5ae8-4c78-4211-8ec3-d26302152e71";

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {}

#[macro_export]
macro_rules! debug_log {
    ($($t:tt)*) => {{
        #[cfg(feature = "debug_logs")]
        {
            #[cfg(target_arch = "wasm32")]
            {
                ::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*)));
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                println!("{}", format!($($t)*));
            }
        }
    }};
}

/// Invoer voor [`reflect_lines`] zoals die vanuit JavaScript binnenkomt.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectRequest {
    pub lines: Vec<[[f64; 3]; 2]>,
    pub vertices: Vec<[f64; 3]>,
    pub faces: Vec<Vec<u32>>,
    pub reference_length: f64,
    #[serde(default)]
    pub epsilon: Option<f64>,
    #[serde(default)]
    pub unbounded: bool,
}

/// Uitvoer van [`reflect_lines`]; alle lijsten zijn even lang.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectResponse {
    pub hit_points: Vec<[f64; 3]>,
    pub lines_in: Vec<[[f64; 3]; 2]>,
    pub lines_out: Vec<[[f64; 3]; 2]>,
    pub vecs_input: Vec<[f64; 3]>,
    pub vecs_ref: Vec<[f64; 3]>,
    pub face_normals: Vec<[f64; 3]>,
}

/// Spiegelt de lijnen uit `request` aan de meegegeven mesh.
#[wasm_bindgen(js_name = reflectLines)]
pub fn reflect_lines(request: JsValue) -> Result<JsValue, JsValue> {
    let request: ReflectRequest = serde_wasm_bindgen::from_value(request).map_err(to_js_error)?;
    let response = evaluate_request(&ComponentRegistry::default(), &request).map_err(to_js_error)?;
    debug_log!("reflectLines: {} treffers", response.hit_points.len());
    serde_wasm_bindgen::to_value(&response).map_err(to_js_error)
}

/// Evalueert een [`ReflectRequest`] via het geregistreerde Reflect-component.
pub fn evaluate_request(
    registry: &ComponentRegistry,
    request: &ReflectRequest,
) -> Result<ReflectResponse, ComponentError> {
    let component = registry
        .resolve(Some(REFLECT_GUID), None, None)
        .ok_or_else(|| ComponentError::new("Reflect-component is niet geregistreerd"))?;

    let lines = request
        .lines
        .iter()
        .map(|[p1, p2]| Value::CurveLine { p1: *p1, p2: *p2 })
        .collect();
    let inputs = [
        Value::List(lines),
        Value::Surface {
            vertices: request.vertices.clone(),
            faces: request.faces.clone(),
        },
        Value::Number(request.reference_length),
    ];

    let mut meta = MetaMap::new();
    if let Some(epsilon) = request.epsilon {
        meta.insert(META_EPSILON.to_owned(), MetaValue::Number(epsilon));
    }
    meta.insert(META_UNBOUNDED.to_owned(), MetaValue::Boolean(request.unbounded));

    let outputs = component.evaluate(&inputs, &meta)?;
    response_from_outputs(&outputs)
}

fn response_from_outputs(outputs: &OutputMap) -> Result<ReflectResponse, ComponentError> {
    Ok(ReflectResponse {
        hit_points: collect_pin(outputs, PIN_HIT_POINTS, Value::expect_point)?,
        lines_in: collect_pin(outputs, PIN_LINES_IN, line_endpoints)?,
        lines_out: collect_pin(outputs, PIN_LINES_OUT, line_endpoints)?,
        vecs_input: collect_pin(outputs, PIN_VECS_INPUT, Value::expect_vector)?,
        vecs_ref: collect_pin(outputs, PIN_VECS_REF, Value::expect_vector)?,
        face_normals: collect_pin(outputs, PIN_FACE_NORMALS, Value::expect_vector)?,
    })
}

fn line_endpoints(value: &Value) -> Result<[[f64; 3]; 2], graph::value::ValueError> {
    value.expect_curve_line().map(|(p1, p2)| [p1, p2])
}

fn collect_pin<T>(
    outputs: &OutputMap,
    pin: &str,
    convert: impl Fn(&Value) -> Result<T, graph::value::ValueError>,
) -> Result<Vec<T>, ComponentError> {
    let Some(value) = outputs.get(pin) else {
        return Ok(Vec::new());
    };
    value
        .expect_list()?
        .iter()
        .map(|item| convert(item).map_err(ComponentError::from))
        .collect()
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}
