use js_sys::Reflect;
use wasm_bindgen::prelude::*;

use crate::error::LimitSetError;
use crate::limit_set::GenerationState;
use crate::presets::Geometry;
use crate::primitive::Mapping;
use crate::settings::Settings;

#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
use wasm_bindgen_rayon::init_thread_pool;

#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
#[wasm_bindgen]
pub fn init_threads(n: usize) -> js_sys::Promise {
    init_thread_pool(n)
}

#[wasm_bindgen(start)]
pub fn initialize() {
    init_logger();
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {}

fn read_number(value: &JsValue, key: &str) -> Option<f64> {
    Reflect::get(value, &JsValue::from_str(key)).ok()?.as_f64()
}

fn read_count(value: &JsValue, key: &'static str) -> Result<Option<usize>, LimitSetError> {
    read_number(value, key).map(|n| count_value(key, n)).transpose()
}

/// A JS number used as a count, only non-negative integers are accepted.
pub(crate) fn count_value(key: &'static str, n: f64) -> Result<usize, LimitSetError> {
    if n >= 0.0 && n.is_finite() && n.fract() == 0.0 && n <= usize::MAX as f64 {
        Ok(n as usize)
    } else {
        Err(LimitSetError::InvalidSetting { name: key, value: n })
    }
}

/// Mapping primitives from flat `[center..., radius, ...]` tuples of `D + 1` numbers.
/// Radii are checked when the limit set is built.
pub(crate) fn mappings_from_flat<const D: usize, M: Mapping<D>>(values: &[f64]) -> Result<Vec<M>, LimitSetError> {
    if values.len() % (D + 1) != 0 {
        return Err(LimitSetError::InvalidSetting {
            name: "mappings",
            value: values.len() as f64,
        });
    }
    Ok(values
        .chunks_exact(D + 1)
        .map(|tuple| M::new(std::array::from_fn(|i| tuple[i]), tuple[D]))
        .collect())
}

/// Settings from a JS object or a JSON string. Missing fields keep their defaults,
/// `undefined` and `null` give the default settings.
pub fn settings_from_js(value: &JsValue) -> Result<Settings, LimitSetError> {
    if value.is_undefined() || value.is_null() {
        return Ok(Settings::default());
    }
    if let Some(json) = value.as_string() {
        return Settings::from_json(&json);
    }

    let mut settings = Settings::default();
    if let Some(scale) = read_number(value, "scale") {
        settings.scale = scale;
    }
    if let Some(min_radius) = read_number(value, "min_radius") {
        settings.min_radius = min_radius;
    }
    if let Some(eps) = read_number(value, "eps") {
        settings.eps = eps;
    }
    if let Some(generations) = read_count(value, "generations")? {
        settings.generations = generations;
    }
    if let Some(max_elements) = read_count(value, "max_elements")? {
        settings.max_elements = max_elements;
    }
    if let Some(name) = Reflect::get(value, &JsValue::from_str("geometry")).ok().and_then(|g| g.as_string()) {
        settings.geometry = Geometry::from_name(&name).ok_or(LimitSetError::UnknownGeometry { name })?;
    }
    settings.validate()?;
    Ok(settings)
}

pub fn state_name(state: GenerationState) -> String {
    match state {
        GenerationState::Seed => "seed".to_string(),
        GenerationState::Gen0 => "gen0".to_string(),
        GenerationState::Gen1 => "gen1".to_string(),
        GenerationState::GenN(n) => format!("gen{}", n),
        GenerationState::Truncated { .. } => "truncated".to_string(),
        GenerationState::Complete => "complete".to_string(),
    }
}
