/// SVG serialization of the display list (raster capture input)

use std::fmt::Write;

use quick_xml::escape::escape;

use super::layout::Canvas;
use super::paint::{Anchor, PaintCommand, Weight};

pub const FONT_FAMILY: &str = "'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif";

fn anchor(a: Anchor) -> &'static str {
    match a {
        Anchor::Start => "start",
        Anchor::Middle => "middle",
        Anchor::End => "end",
    }
}

fn weight(w: Weight) -> u16 {
    match w {
        Weight::Normal => 400,
        Weight::Medium => 500,
        Weight::Bold => 700,
    }
}

/// Serialize `commands` into a standalone SVG document.
pub fn to_svg(commands: &[PaintCommand], canvas: Canvas) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" id="certificate" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{font}">"#,
        w = canvas.width,
        h = canvas.height,
        font = escape(FONT_FAMILY),
    );
    for cmd in commands {
        match cmd {
            PaintCommand::Rect { x, y, width, height, radius, fill, stroke, opacity } => {
                let fill = fill.map(|c| c.hex()).unwrap_or_else(|| "none".to_string());
                let _ = write!(
                    out,
                    r#"<rect x="{x}" y="{y}" width="{width}" height="{height}" rx="{radius}" fill="{fill}" opacity="{opacity}""#
                );
                if let Some((color, w)) = stroke {
                    let _ = write!(out, r#" stroke="{}" stroke-width="{}""#, color.hex(), w);
                }
                out.push_str("/>");
            }
            PaintCommand::Circle { cx, cy, r, fill, opacity } => {
                let _ = write!(
                    out,
                    r#"<circle cx="{cx}" cy="{cy}" r="{r}" fill="{}" opacity="{opacity}"/>"#,
                    fill.hex()
                );
            }
            PaintCommand::Polyline { points, stroke, width, opacity } => {
                let pts = points
                    .iter()
                    .map(|(x, y)| format!("{},{}", x, y))
                    .collect::<Vec<_>>()
                    .join(" ");
                let _ = write!(
                    out,
                    r#"<polyline points="{pts}" fill="none" stroke="{}" stroke-width="{width}" stroke-linecap="round" stroke-linejoin="round" opacity="{opacity}"/>"#,
                    stroke.hex()
                );
            }
            PaintCommand::Text { x, y, size, anchor: a, italic, runs } => {
                let _ = write!(
                    out,
                    r#"<text x="{x}" y="{y}" font-size="{size}" text-anchor="{}""#,
                    anchor(*a)
                );
                if *italic {
                    out.push_str(r#" font-style="italic""#);
                }
                out.push('>');
                for run in runs {
                    let _ = write!(
                        out,
                        r#"<tspan fill="{}" font-weight="{}""#,
                        run.fill.hex(),
                        weight(run.weight)
                    );
                    if run.underline {
                        out.push_str(r#" text-decoration="underline""#);
                    }
                    let _ = write!(out, ">{}</tspan>", escape(run.text.as_str()));
                }
                out.push_str("</text>");
            }
        }
    }
    out.push_str("</svg>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::paint::{Color, TextRun};

    #[test]
    fn text_is_escaped() {
        let cmds = vec![PaintCommand::Text {
            x: 0.0,
            y: 10.0,
            size: 12.0,
            anchor: Anchor::Start,
            italic: false,
            runs: vec![TextRun::plain("R&D <Lab>", Color::GRAY_700)],
        }];
        let svg = to_svg(&cmds, Canvas::default());
        assert!(svg.contains("R&amp;D &lt;Lab&gt;"));
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn svg_declares_canvas_size() {
        let svg = to_svg(&[], Canvas { width: 400, height: 300 });
        assert!(svg.contains(r#"width="400" height="300""#));
        assert!(svg.contains(r#"viewBox="0 0 400 300""#));
    }
}
