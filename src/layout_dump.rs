use crate::layout::{Layout, PlacedDiagram, Rect};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Debug view of a computed slide: the frame geometry up front, the full
/// diagram layout underneath.
#[derive(Debug, Serialize)]
pub struct LayoutDump<'a> {
    pub kind: String,
    pub width: f32,
    pub height: f32,
    pub texts: Vec<TextDump>,
    pub diagram: Option<DiagramDump<'a>>,
    pub blocks: Vec<BlockDump<'a>>,
}

#[derive(Debug, Serialize)]
pub struct TextDump {
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub lines: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DiagramDump<'a> {
    pub family: &'static str,
    pub frame: [f32; 4],
    pub viewbox: [f32; 2],
    pub scale: f32,
    pub layout: &'a crate::layout::DiagramData,
}

#[derive(Debug, Serialize)]
pub struct BlockDump<'a> {
    pub id: String,
    pub block_type: &'static str,
    pub rect: [f32; 4],
    pub texts: usize,
    pub diagram: Option<DiagramDump<'a>>,
}

fn rect_array(rect: Rect) -> [f32; 4] {
    [rect.x, rect.y, rect.width, rect.height]
}

impl<'a> DiagramDump<'a> {
    fn from_placed(placed: &'a PlacedDiagram) -> Self {
        let (w, h) = placed.data.viewbox();
        let scale = if w > 0.0 && h > 0.0 {
            (placed.frame.width / w).min(placed.frame.height / h)
        } else {
            0.0
        };
        DiagramDump {
            family: placed.data.family(),
            frame: rect_array(placed.frame),
            viewbox: [w, h],
            scale,
            layout: &placed.data,
        }
    }
}

impl<'a> LayoutDump<'a> {
    pub fn from_layout(layout: &'a Layout) -> Self {
        let texts = layout
            .texts
            .iter()
            .map(|label| TextDump {
                x: label.x,
                y: label.y,
                font_size: label.font_size,
                lines: label.text.lines.clone(),
            })
            .collect();

        let blocks = layout
            .blocks
            .iter()
            .map(|block| BlockDump {
                id: block.id.clone(),
                block_type: block.block_type,
                rect: rect_array(block.rect),
                texts: block.texts.len(),
                diagram: block.diagram.as_ref().map(DiagramDump::from_placed),
            })
            .collect();

        LayoutDump {
            kind: layout.kind.to_string(),
            width: layout.width,
            height: layout.height,
            texts,
            diagram: layout.diagram.as_ref().map(DiagramDump::from_placed),
            blocks,
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::convert::create_default_slide;
    use crate::ir::SlideKind;
    use crate::layout::compute_layout;
    use crate::theme::Theme;

    #[test]
    fn dump_reports_family_and_scale() {
        let layout = compute_layout(
            &create_default_slide(SlideKind::Cycle),
            &Theme::swiss(),
            &LayoutConfig::default(),
        );
        let dump = LayoutDump::from_layout(&layout);
        assert_eq!(dump.kind, "cycle");
        let diagram = dump.diagram.as_ref().unwrap();
        assert_eq!(diagram.family, "cycle");
        assert!(diagram.scale > 0.0);

        let json = serde_json::to_value(&dump).unwrap();
        assert_eq!(json["diagram"]["layout"]["family"], "cycle");
    }
}
