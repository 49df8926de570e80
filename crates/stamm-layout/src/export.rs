//! Export a scene as SVG.

use crate::scene::{Line, Scene};
use std::fmt::{self, Write};

const PARENT_STROKE: &str = "black";
const SPOUSE_STROKE: &str = "red";
const STROKE_WIDTH: u32 = 2;
const LABEL_INSET: f64 = 10.0;

/// Escape text for use in SVG content and attribute values.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Write `scene` as an SVG document. `label` maps a person id to the text
/// drawn in its box.
pub fn write_svg<W, F>(out: &mut W, scene: &Scene, label: F) -> fmt::Result
where
    W: Write,
    F: Fn(&str) -> String,
{
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = scene.width,
        h = scene.height
    )?;
    writeln!(out, r#"  <rect width="100%" height="100%" fill="white"/>"#)?;

    // Lines first so boxes are drawn over line ends
    writeln!(out, r#"  <g class="parent-lines" stroke="{PARENT_STROKE}" stroke-width="{STROKE_WIDTH}">"#)?;
    for line in &scene.parent_lines {
        write_line(out, line)?;
    }
    writeln!(out, "  </g>")?;
    writeln!(out, r#"  <g class="spouse-lines" stroke="{SPOUSE_STROKE}" stroke-width="{STROKE_WIDTH}">"#)?;
    for line in &scene.spouse_lines {
        write_line(out, line)?;
    }
    writeln!(out, "  </g>")?;

    writeln!(out, r#"  <g class="persons" font-family="sans-serif" font-size="14">"#)?;
    for person in &scene.boxes {
        let rect = &person.rect;
        writeln!(out, r#"    <g data-id="{}">"#, escape_xml(&person.id))?;
        writeln!(
            out,
            r#"      <rect x="{}" y="{}" width="{}" height="{}" fill="white" stroke="black" stroke-width="{STROKE_WIDTH}"/>"#,
            rect.origin.x, rect.origin.y, rect.width, rect.height
        )?;
        writeln!(
            out,
            r#"      <text x="{}" y="{}" dominant-baseline="hanging">{}</text>"#,
            rect.origin.x + LABEL_INSET,
            rect.origin.y + rect.height / 4.0,
            escape_xml(&label(person.id.as_str()))
        )?;
        writeln!(out, "    </g>")?;
    }
    writeln!(out, "  </g>")?;
    writeln!(out, "</svg>")
}

fn write_line<W: Write>(out: &mut W, line: &Line) -> fmt::Result {
    writeln!(
        out,
        r#"    <line x1="{}" y1="{}" x2="{}" y2="{}"/>"#,
        line.start.x, line.start.y, line.end.x, line.end.y
    )
}

/// Render `scene` to an SVG string.
pub fn to_svg<F>(scene: &Scene, label: F) -> String
where
    F: Fn(&str) -> String,
{
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_svg(&mut out, scene, label);
    out
}
