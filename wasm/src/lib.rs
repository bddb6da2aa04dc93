use dataflow_layout::layout_dump::LayoutDump;
use dataflow_layout::{BlockId, LayoutConfig, Point, Program, apply_drop, calculate_program_layout};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutOptions {
    cluster_gap: Option<f32>,
    layer_gap: Option<f32>,
    layer_margin: Option<f32>,
}

fn build_layout_config(options: LayoutOptions) -> LayoutConfig {
    let mut config = LayoutConfig::default();
    if let Some(cluster_gap) = options.cluster_gap {
        config.cluster_gap = cluster_gap;
    }
    if let Some(layer_gap) = options.layer_gap {
        config.layer_gap = layer_gap;
    }
    if let Some(layer_margin) = options.layer_margin {
        config.layer_margin = layer_margin;
    }
    config
}

fn parse_options(options_json: Option<String>) -> Result<LayoutOptions, String> {
    match options_json {
        Some(raw_options) => {
            serde_json::from_str::<LayoutOptions>(&raw_options).map_err(|error| error.to_string())
        }
        None => Ok(LayoutOptions::default()),
    }
}

fn parse_program(program_json: &str) -> Result<Program, String> {
    let program: Program = serde_json::from_str(program_json).map_err(|error| error.to_string())?;
    program.validate().map_err(|error| error.to_string())?;
    Ok(program)
}

fn layout_json(program_json: &str, config: &LayoutConfig) -> Result<String, String> {
    let program = parse_program(program_json)?;
    let layout = calculate_program_layout(&program, config).map_err(|error| error.to_string())?;
    serde_json::to_string(&LayoutDump::from_layout(&layout, &program))
        .map_err(|error| error.to_string())
}

fn drop_json(
    program_json: &str,
    block_id: &str,
    at: Point,
    config: &LayoutConfig,
) -> Result<String, String> {
    let program = parse_program(program_json)?;
    let layout = calculate_program_layout(&program, config).map_err(|error| error.to_string())?;
    let edited = apply_drop(&program, &BlockId::from(block_id), at, &layout, config)
        .map_err(|error| error.to_string())?
        .unwrap_or(program);
    serde_json::to_string(&edited).map_err(|error| error.to_string())
}

/// Lays out a program given as JSON and returns the layout dump as JSON.
#[wasm_bindgen]
pub fn layout_program(program_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let config = build_layout_config(parse_options(options_json).map_err(|e| JsValue::from_str(&e))?);
    layout_json(program_json, &config).map_err(|error| JsValue::from_str(&error))
}

/// Drops `block_id` at a model-space point and returns the edited program as
/// JSON. A drop onto the block's own slot returns the program unchanged.
#[wasm_bindgen]
pub fn drop_block(
    program_json: &str,
    block_id: &str,
    x: f32,
    y: f32,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    let config = build_layout_config(parse_options(options_json).map_err(|e| JsValue::from_str(&e))?);
    drop_json(program_json, block_id, Point::new(x, y), &config)
        .map_err(|error| JsValue::from_str(&error))
}
