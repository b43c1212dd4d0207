use crate::metrics::{FontMetrics, PT_TO_MM};
use crate::paginate::{DrawOp, PaginatedDocument};

const RULE_STROKE_MM: f64 = 0.2;

/// Convert a laid-out document to Typst markup.
///
/// Pages have no margin of their own; every op is placed at the absolute
/// position the paginator computed, in the family `metrics` measured.
pub fn document_to_typst(doc: &PaginatedDocument, metrics: &FontMetrics) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "#set page(width: {:.2}mm, height: {:.2}mm, margin: 0mm)\n",
        doc.width_mm, doc.height_mm
    ));
    out.push_str("#set text(font: ");
    string_literal(metrics.family(), &mut out);
    out.push_str(", fallback: true)\n\n");

    for (index, page) in doc.pages.iter().enumerate() {
        if index > 0 {
            out.push_str("#pagebreak()\n");
        }
        for op in &page.ops {
            emit_op(op, metrics, &mut out);
        }
    }

    out
}

fn emit_op(op: &DrawOp, metrics: &FontMetrics, out: &mut String) {
    match op {
        DrawOp::Text {
            x,
            y,
            size,
            bold,
            text,
        } => {
            // text is placed by its top edge, which sits at cap height
            let top = y - size * metrics.cap_height(*bold) * PT_TO_MM;
            out.push_str(&format!(
                "#place(top + left, dx: {x:.2}mm, dy: {top:.2}mm, text(size: {size}pt, weight: \"{}\", ",
                if *bold { "bold" } else { "regular" }
            ));
            string_literal(text, out);
            out.push_str("))\n");
        }
        DrawOp::Line { x1, y1, x2, y2 } => {
            out.push_str(&format!(
                "#place(top + left, line(start: ({x1:.2}mm, {y1:.2}mm), end: ({x2:.2}mm, {y2:.2}mm), stroke: {RULE_STROKE_MM}mm))\n"
            ));
        }
    }
}

/// Write `text` as a Typst string literal, which needs far less escaping than markup
fn string_literal(text: &str, out: &mut String) {
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => {}
            _ => out.push(ch),
        }
    }
    out.push('"');
}
