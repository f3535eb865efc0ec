//! PDF painting via `printpdf`.

use std::io::BufWriter;

use printpdf::{BuiltinFont, Color, Mm, PdfDocument, Rgb};

use super::layout::{DocumentLayout, FontWeight};
use super::{ExportError, ExportResult};

/// Paint a laid-out document and return the PDF bytes.
pub fn render_pdf(layout: &DocumentLayout) -> ExportResult<Vec<u8>> {
    let width = Mm(layout.setup.width_mm());
    let height = Mm(layout.setup.height_mm());

    let (doc, first_page, first_layer) = PdfDocument::new(&layout.title, width, height, "Layer 1");
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Pdf(format!("font error: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ExportError::Pdf(format!("font error: {e}")))?;

    let mut targets = vec![(first_page, first_layer)];
    for _ in 1..layout.pages.len() {
        targets.push(doc.add_page(width, height, "Layer 1"));
    }

    for (page, (page_index, layer_index)) in layout.pages.iter().zip(targets) {
        let layer = doc.get_page(page_index).get_layer(layer_index);
        for run in &page.runs {
            let (r, g, b) = run.color.rgb();
            layer.set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
            let font = match run.weight {
                FontWeight::Regular => &regular,
                FontWeight::Bold => &bold,
            };
            layer.use_text(&run.text, run.size_pt, Mm(run.x_mm), Mm(run.y_mm), font);
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ExportError::Pdf(format!("save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| ExportError::Pdf(format!("buffer error: {e}")))
}
