use crate::layout::Size;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub integer_literal_size: Size,
    pub reference_size: Size,
    /// Stand-in for a non-nested dependency inside its dependent's shape; the
    /// incoming line attaches to its center.
    pub placeholder_size: Size,
    pub function_call_gap: f32,
    pub function_call_padding: f32,
    pub function_call_margin: f32,
    pub array_gap: f32,
    pub array_padding: f32,
    pub array_margin: f32,
    pub cluster_gap: f32,
    pub layer_gap: f32,
    /// How far above and below a layer band the pointer still counts as
    /// inside the layer.
    pub layer_margin: f32,
    pub cluster_margin: f32,
    pub insertion_guide_length: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            integer_literal_size: Size::new(40.0, 20.0),
            reference_size: Size::new(80.0, 20.0),
            placeholder_size: Size::new(10.0, 10.0),
            function_call_gap: 20.0,
            function_call_padding: 10.0,
            function_call_margin: 20.0,
            array_gap: 10.0,
            array_padding: 10.0,
            array_margin: 20.0,
            cluster_gap: 40.0,
            layer_gap: 80.0,
            layer_margin: 20.0,
            cluster_margin: 20.0,
            insertion_guide_length: 200.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub layout: LayoutConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    integer_literal_size: Option<Size>,
    reference_size: Option<Size>,
    placeholder_size: Option<Size>,
    function_call_gap: Option<f32>,
    function_call_padding: Option<f32>,
    function_call_margin: Option<f32>,
    array_gap: Option<f32>,
    array_padding: Option<f32>,
    array_margin: Option<f32>,
    cluster_gap: Option<f32>,
    layer_gap: Option<f32>,
    layer_margin: Option<f32>,
    cluster_margin: Option<f32>,
    insertion_guide_length: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    layout: Option<LayoutConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = serde_json::from_str(&contents)?;
    if let Some(file) = parsed.layout {
        apply_layout_overrides(&mut config.layout, file);
    }
    Ok(config)
}

fn apply_layout_overrides(layout: &mut LayoutConfig, file: LayoutConfigFile) {
    if let Some(v) = file.integer_literal_size {
        layout.integer_literal_size = v;
    }
    if let Some(v) = file.reference_size {
        layout.reference_size = v;
    }
    if let Some(v) = file.placeholder_size {
        layout.placeholder_size = v;
    }
    if let Some(v) = file.function_call_gap {
        layout.function_call_gap = v;
    }
    if let Some(v) = file.function_call_padding {
        layout.function_call_padding = v;
    }
    if let Some(v) = file.function_call_margin {
        layout.function_call_margin = v;
    }
    if let Some(v) = file.array_gap {
        layout.array_gap = v;
    }
    if let Some(v) = file.array_padding {
        layout.array_padding = v;
    }
    if let Some(v) = file.array_margin {
        layout.array_margin = v;
    }
    if let Some(v) = file.cluster_gap {
        layout.cluster_gap = v;
    }
    if let Some(v) = file.layer_gap {
        layout.layer_gap = v;
    }
    if let Some(v) = file.layer_margin {
        layout.layer_margin = v;
    }
    if let Some(v) = file.cluster_margin {
        layout.cluster_margin = v;
    }
    if let Some(v) = file.insertion_guide_length {
        layout.insertion_guide_length = v;
    }
}
