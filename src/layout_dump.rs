use crate::ir::EdgeKey;
use crate::layout::Layout;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub intersections: usize,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
    pub selected: Option<String>,
    pub highlighted: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub level: usize,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub key: String,
    pub from: String,
    pub to: String,
    pub highlighted: bool,
    pub points: Vec<[f32; 2]>,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout, selected: Option<&str>, highlighted: &BTreeSet<EdgeKey>) -> Self {
        let nodes = layout
            .positions
            .iter()
            .map(|(id, pos)| NodeDump {
                id: id.clone(),
                level: layout.levels.get(id).copied().unwrap_or(0),
                x: pos.x,
                y: pos.y,
            })
            .collect();

        let edges = layout
            .edges
            .iter()
            .map(|edge| EdgeDump {
                key: edge.key.to_string(),
                from: edge.from.clone(),
                to: edge.to.clone(),
                highlighted: highlighted.contains(&edge.key),
                points: edge.points.iter().map(|(x, y)| [*x, *y]).collect(),
            })
            .collect();

        LayoutDump {
            intersections: layout.intersections,
            nodes,
            edges,
            selected: selected.map(str::to_string),
            highlighted: highlighted.iter().map(ToString::to_string).collect(),
        }
    }
}

pub fn write_layout_dump(path: Option<&Path>, dump: &LayoutDump) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut writer, dump)?;
            writer.flush()?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            serde_json::to_writer_pretty(&mut handle, dump)?;
            handle.write_all(b"\n")?;
        }
    }
    Ok(())
}
