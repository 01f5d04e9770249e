//! Plain-text rendering of recorded draw calls.
//!
//! [`ops_to_string`] prints one call per line, indenting by save depth, which
//! keeps paint-order assertions readable in snapshots.

use super::surface::DrawOp;

/// Render recorded calls as indented text. Color and line-width changes are
/// skipped unless `with_style` is set.
pub fn ops_to_string(ops: &[DrawOp], with_style: bool) -> String {
    let mut out = Vec::with_capacity(ops.len());
    let mut depth = 0usize;
    for op in ops {
        if matches!(op, DrawOp::Restore) {
            depth = depth.saturating_sub(1);
        }
        let line = match op {
            DrawOp::Save => "save".to_owned(),
            DrawOp::Restore => "restore".to_owned(),
            DrawOp::Translate(x, y) => format!("translate {x} {y}"),
            DrawOp::Scale(x, y) => format!("scale {x} {y}"),
            DrawOp::Rotate(r) => format!("rotate {r}"),
            DrawOp::BeginPath => "begin_path".to_owned(),
            DrawOp::Rect(x, y, w, h) => format!("rect {x},{y} {w}x{h}"),
            DrawOp::Clip => "clip".to_owned(),
            DrawOp::Fill => "fill".to_owned(),
            DrawOp::Stroke => "stroke".to_owned(),
            DrawOp::FillRect(x, y, w, h) => format!("fill_rect {x},{y} {w}x{h}"),
            DrawOp::StrokeRect(x, y, w, h) => format!("stroke_rect {x},{y} {w}x{h}"),
            DrawOp::ClearRect(x, y, w, h) => format!("clear_rect {x},{y} {w}x{h}"),
            DrawOp::FillColor(c) if with_style => format!("fill_color #{:02x}{:02x}{:02x}{:02x}", c.r, c.g, c.b, c.a),
            DrawOp::StrokeColor(c) if with_style => {
                format!("stroke_color #{:02x}{:02x}{:02x}{:02x}", c.r, c.g, c.b, c.a)
            }
            DrawOp::LineWidth(w) if with_style => format!("line_width {w}"),
            DrawOp::FillColor(_) | DrawOp::StrokeColor(_) | DrawOp::LineWidth(_) => continue,
        };
        out.push(format!("{}{line}", "  ".repeat(depth)));
        if matches!(op, DrawOp::Save) {
            depth += 1;
        }
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::Color;

    #[test]
    fn indents_by_depth() {
        let ops = vec![
            DrawOp::Save,
            DrawOp::Translate(10.0, 5.0),
            DrawOp::FillColor(Color::WHITE),
            DrawOp::FillRect(0, 0, 4, 4),
            DrawOp::Restore,
        ];
        insta::assert_snapshot!(ops_to_string(&ops, false), @r"
        save
          translate 10 5
          fill_rect 0,0 4x4
        restore
        ");
    }

    #[test]
    fn style_ops_on_request() {
        let ops = vec![DrawOp::FillColor(Color::rgb(255, 0, 16)), DrawOp::LineWidth(2.0)];
        assert_eq!(ops_to_string(&ops, true), "fill_color #ff0010ff\nline_width 2");
        assert_eq!(ops_to_string(&ops, false), "");
    }
}
