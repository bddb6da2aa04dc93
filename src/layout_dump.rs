use crate::ir::{BlockKind, Program};
use crate::layout::ProgramLayout;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub width: f32,
    pub height: f32,
    pub blocks: Vec<BlockDump>,
    pub lines: Vec<LineDump>,
    pub layers: Vec<LayerDump>,
}

#[derive(Debug, Serialize)]
pub struct BlockDump {
    pub id: String,
    pub kind: String,
    pub label: Option<String>,
    pub nested: bool,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Serialize)]
pub struct LineDump {
    pub from: String,
    pub to: String,
    pub points: Vec<[f32; 2]>,
}

#[derive(Debug, Serialize)]
pub struct LayerDump {
    pub index: usize,
    pub top: f32,
    pub bottom: f32,
    pub clusters: Vec<String>,
}

impl LayoutDump {
    pub fn from_layout(layout: &ProgramLayout, program: &Program) -> Self {
        let blocks = layout
            .block_layouts
            .iter()
            .filter_map(|(id, block_layout)| {
                let block = program.blocks.get(id)?;
                Some(BlockDump {
                    id: id.to_string(),
                    kind: kind_name(&block.kind).to_string(),
                    label: block.label(),
                    nested: block.nested,
                    x: block_layout.top_left.x,
                    y: block_layout.top_left.y,
                    width: block_layout.size.width,
                    height: block_layout.size.height,
                })
            })
            .collect();

        // Lines whose source block was not placed are dropped from the dump.
        let lines = layout
            .line_connection_layouts
            .iter()
            .filter_map(|line| {
                let source = layout.block_layouts.get(&line.dependency_block_id)?;
                Some(LineDump {
                    from: line.dependency_block_id.to_string(),
                    to: line.dependent_block_id.to_string(),
                    points: vec![
                        [source.output.x, source.output.y],
                        [line.endpoint.x, line.endpoint.y],
                    ],
                })
            })
            .collect();

        let layers = program
            .layers
            .iter()
            .zip(&layout.layer_intervals)
            .enumerate()
            .map(|(index, (layer, interval))| LayerDump {
                index,
                top: interval.left,
                bottom: interval.right,
                clusters: layer.iter().map(ToString::to_string).collect(),
            })
            .collect();

        LayoutDump {
            width: layout.width,
            height: layout.height,
            blocks,
            lines,
            layers,
        }
    }
}

fn kind_name(kind: &BlockKind) -> &'static str {
    match kind {
        BlockKind::IntegerLiteral { .. } => "IntegerLiteral",
        BlockKind::Reference { .. } => "Reference",
        BlockKind::FunctionCall { .. } => "FunctionCall",
        BlockKind::Array { .. } => "Array",
    }
}

pub fn write_json<T: Serialize>(value: &T, output: Option<&Path>, pretty: bool) -> anyhow::Result<()> {
    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    if pretty {
        serde_json::to_writer_pretty(&mut writer, value)?;
    } else {
        serde_json::to_writer(&mut writer, value)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

pub fn write_layout_dump(
    output: Option<&Path>,
    layout: &ProgramLayout,
    program: &Program,
    pretty: bool,
) -> anyhow::Result<()> {
    let dump = LayoutDump::from_layout(layout, program);
    write_json(&dump, output, pretty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::layout::calculate_program_layout;

    #[test]
    fn dump_lists_blocks_lines_and_layers() {
        let program = Program::demo();
        let layout = calculate_program_layout(&program, &LayoutConfig::default()).unwrap();
        let dump = LayoutDump::from_layout(&layout, &program);
        assert_eq!(dump.blocks.len(), 14);
        assert_eq!(dump.lines.len(), 6);
        assert_eq!(dump.layers.len(), 3);
        assert_eq!(dump.layers[1].clusters, vec!["block6", "block14", "block11"]);

        let plus = dump.blocks.iter().find(|b| b.id == "block4").unwrap();
        assert_eq!(plus.kind, "Reference");
        assert_eq!(plus.label.as_deref(), Some("plus"));
        assert!(plus.nested);

        let json = serde_json::to_value(&dump).unwrap();
        assert!(json["lines"][0]["points"].as_array().is_some_and(|p| p.len() == 2));
    }

    #[test]
    fn dump_writes_to_file() {
        let program = Program::demo();
        let layout = calculate_program_layout(&program, &LayoutConfig::default()).unwrap();
        let file = tempfile::NamedTempFile::new().unwrap();
        write_layout_dump(Some(file.path()), &layout, &program, true).unwrap();
        let written = std::fs::read_to_string(file.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["blocks"].as_array().map(Vec::len), Some(14));
    }
}
