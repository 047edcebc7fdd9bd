//! Print-ready HTML rendering of a composed report.

use crate::composer::ComposedReport;
use crate::embed::EmbeddedImage;
use crate::record::ItemStatus;
use crate::sections::*;
use tracing::info;
use vi_annotate::SeverityBand;

/// Renders a [`ComposedReport`] as a single self-contained HTML document.
///
/// Every page-starting section opens a `.page` block; the watermark and the
/// footer disclaimer are repeated on each page. Images are inlined as data
/// URIs so the output has no external references.
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer {
    minify: Option<bool>,
}

impl HtmlRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force minification on or off; by default only release builds minify.
    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = Some(minify);
        self
    }

    /// Render the report.
    pub fn render(&self, report: &ComposedReport) -> String {
        let html = self.generate_html(report);

        let minify = self.minify.unwrap_or(!cfg!(debug_assertions));
        let output = if minify {
            let cfg = minify_html::Cfg {
                minify_css: true,
                ..Default::default()
            };
            String::from_utf8(minify_html::minify(html.as_bytes(), &cfg)).unwrap_or(html)
        } else {
            html
        };

        info!(
            bytes = output.len(),
            title = %report.title,
            "Report rendered"
        );
        output
    }

    fn generate_html(&self, report: &ComposedReport) -> String {
        let watermark = match report.watermark.data_uri() {
            Some(uri) => format!(r#"<img class="watermark" src="{}" alt="">"#, uri),
            None => String::new(),
        };
        let footer = format!(
            r#"<footer class="disclaimer">{}</footer>"#,
            html_escape(&report.footer)
        );

        let mut pages = String::new();
        let mut body = String::new();
        for section in &report.sections {
            if section.starts_page() && !body.is_empty() {
                pages.push_str(&page(&watermark, &body, &footer));
                body.clear();
            }
            body.push_str(&self.render_section(section));
        }
        if !body.is_empty() {
            pages.push_str(&page(&watermark, &body, &footer));
        }

        format!(
            r##"<!DOCTYPE html>
<html lang="es">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <meta name="generator" content="vi-report {version}">
    <style>
        @page {{ size: A4; margin: 0; }}
        body {{
            margin: 0;
            font-family: Arial, Helvetica, sans-serif;
            font-size: 11pt;
            color: #212121;
        }}
        .page {{
            position: relative;
            width: 210mm;
            min-height: 297mm;
            padding: 15mm 15mm 30mm;
            box-sizing: border-box;
            page-break-after: always;
            overflow: hidden;
        }}
        .watermark {{
            position: absolute;
            top: 50%;
            left: 50%;
            transform: translate(-50%, -50%);
            max-width: 70%;
            opacity: 0.08;
            z-index: 0;
        }}
        .content {{ position: relative; z-index: 1; }}
        .disclaimer {{
            position: absolute;
            bottom: 10mm;
            left: 15mm;
            right: 15mm;
            font-size: 7pt;
            color: #757575;
            text-align: justify;
        }}
        h1 {{ font-size: 18pt; margin: 0; }}
        h2 {{
            font-size: 13pt;
            border-bottom: 2px solid #1E88E5;
            padding-bottom: 2mm;
        }}
        table {{ width: 100%; border-collapse: collapse; }}
        th, td {{ border: 1px solid #E0E0E0; padding: 1.5mm 2mm; text-align: left; }}
        th {{ background: #F5F5F5; }}
        .header {{ display: flex; align-items: center; gap: 6mm; }}
        .logo {{ max-width: 60mm; max-height: 30mm; }}
        .contact {{ font-size: 9pt; color: #616161; }}
        .photo {{ max-width: 100%; max-height: 110mm; }}
        .no-image {{
            display: flex;
            align-items: center;
            justify-content: center;
            min-height: 40mm;
            border: 1px dashed #BDBDBD;
            color: #9E9E9E;
        }}
        .badge {{
            display: inline-block;
            padding: 0.5mm 2mm;
            border-radius: 2mm;
            color: #FFFFFF;
            font-weight: bold;
            font-size: 9pt;
        }}
        .diagram {{ position: relative; margin: 0 auto; }}
        .diagram > img {{ width: 100%; height: 100%; }}
        .dot {{
            position: absolute;
            width: 10px;
            height: 10px;
            margin: -5px 0 0 -5px;
            border-radius: 50%;
        }}
        .leader {{
            position: absolute;
            height: 1px;
            background: #424242;
            transform-origin: 0 0;
        }}
        .leader-label {{
            position: absolute;
            font-size: 8pt;
            font-weight: bold;
            white-space: nowrap;
        }}
        .photo-grid {{ display: grid; grid-template-rows: 1fr 1fr; gap: 6mm; }}
        .verdict {{ font-size: 20pt; font-weight: bold; text-align: center; padding: 6mm; }}
        .verdict.approved {{ color: #43A047; }}
        .verdict.rejected {{ color: #E53935; }}
        .verdict.pending {{ color: #757575; }}
    </style>
</head>
<body>
{pages}
</body>
</html>
"##,
            title = html_escape(&report.title),
            version = env!("CARGO_PKG_VERSION"),
            pages = pages,
        )
    }

    fn render_section(&self, section: &ReportSection) -> String {
        match section {
            ReportSection::Header(h) => render_header(h),
            ReportSection::Ingress(i) => format!(
                r#"<section><h2>{}</h2><p>{} &middot; {}</p></section>"#,
                html_escape(&section.title()),
                html_escape(&i.date),
                html_escape(&i.time)
            ),
            ReportSection::VehicleIdentity(v) => grid_section(&section.title(), &v.rows),
            ReportSection::VehiclePhoto(p) => format!(
                r#"<section><h2>{}</h2>{}</section>"#,
                html_escape(&section.title()),
                image_tag(&p.image, "photo", "Vehículo")
            ),
            ReportSection::SuggestedPrice(p) => format!(
                r#"<section><h2>{}</h2><p><strong>{}</strong></p></section>"#,
                html_escape(&section.title()),
                html_escape(&p.formatted)
            ),
            ReportSection::History(h) => grid_section(&section.title(), &h.rows),
            ReportSection::Diagnosis(d) => {
                let items: String = d
                    .suggestions
                    .iter()
                    .map(|s| format!("<li>{}</li>", html_escape(s)))
                    .collect();
                format!(
                    r#"<section><h2>{}</h2><ul>{}</ul></section>"#,
                    html_escape(&section.title()),
                    items
                )
            }
            ReportSection::Checklist(page) => render_checklist(&section.title(), page),
            ReportSection::BodyDiagram(b) => render_body(&section.title(), b),
            ReportSection::TireDiagram(t) => render_tires(&section.title(), t),
            ReportSection::Battery(b) => {
                let mut rows = vec![GridRow::new("Estado", b.condition.label())];
                rows.push(GridRow::optional("Voltaje", b.voltage.as_ref()));
                rows.push(GridRow::optional("Observación", b.observation.as_ref()));
                grid_section(&section.title(), &rows)
            }
            ReportSection::BrakeFluid(b) => grid_section(
                &section.title(),
                &[
                    GridRow::new("Estado", b.condition.label()),
                    GridRow::optional("Observación", b.observation.as_ref()),
                ],
            ),
            ReportSection::Photos(page) => render_photos(&section.title(), page),
            ReportSection::Verdict(v) => {
                let class = match v.outcome {
                    Some(crate::record::VerdictOutcome::Approved) => "approved",
                    Some(crate::record::VerdictOutcome::Rejected) => "rejected",
                    None => "pending",
                };
                let notes = v
                    .notes
                    .as_deref()
                    .map(|n| format!("<p>{}</p>", html_escape(n)))
                    .unwrap_or_default();
                let inspector = v
                    .inspector
                    .as_deref()
                    .map(|i| format!("<p>Inspector: {}</p>", html_escape(i)))
                    .unwrap_or_default();
                format!(
                    r#"<section><h2>{}</h2><div class="verdict {}">{}</div>{}{}</section>"#,
                    html_escape(&section.title()),
                    class,
                    v.label(),
                    notes,
                    inspector
                )
            }
        }
    }
}

fn page(watermark: &str, body: &str, footer: &str) -> String {
    format!(
        r#"<div class="page">{}<div class="content">{}</div>{}</div>
"#,
        watermark, body, footer
    )
}

fn render_header(h: &HeaderSection) -> String {
    let contact: String = h
        .contact_lines
        .iter()
        .map(|line| format!("<div>{}</div>", html_escape(line)))
        .collect();
    let inspector = h
        .inspector
        .as_deref()
        .map(|i| format!("<div>Inspector: {}</div>", html_escape(i)))
        .unwrap_or_default();
    format!(
        r#"<header class="header">{logo}<div><h1>{name}</h1><div class="contact">{contact}<div>Inspección {id}</div>{inspector}</div></div></header>"#,
        logo = image_tag(&h.logo, "logo", "Logo"),
        name = html_escape(&h.company_name),
        contact = contact,
        id = html_escape(&h.inspection_id),
        inspector = inspector,
    )
}

fn grid_section(title: &str, rows: &[GridRow]) -> String {
    let body: String = rows
        .iter()
        .map(|r| {
            format!(
                "<tr><th>{}</th><td>{}</td></tr>",
                html_escape(&r.label),
                html_escape(&r.value)
            )
        })
        .collect();
    format!(
        r#"<section><h2>{}</h2><table>{}</table></section>"#,
        html_escape(title),
        body
    )
}

fn render_checklist(title: &str, page: &ChecklistPage) -> String {
    let rows: String = page
        .rows
        .iter()
        .map(|r| {
            format!(
                r#"<tr><td>{}</td><td><span class="badge" style="background:{}">{}</span></td><td>{}</td></tr>"#,
                html_escape(&r.name),
                status_color(r.status),
                r.status.label(),
                html_escape(r.observation.as_deref().unwrap_or(""))
            )
        })
        .collect();
    let c = page.counts;
    format!(
        r#"<section><h2>{}</h2><table><tr><th>Ítem</th><th>Estado</th><th>Observación</th></tr>{}</table><p class="contact">Bueno: {} &middot; Regular: {} &middot; Malo: {} &middot; N/A: {}</p></section>"#,
        html_escape(title),
        rows,
        c.good,
        c.regular,
        c.bad,
        c.not_applicable
    )
}

fn render_body(title: &str, b: &BodyDiagramSection) -> String {
    let rows: String = b
        .rows
        .iter()
        .map(|r| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                r.sequence,
                html_escape(&r.label),
                html_escape(r.observation.as_deref().unwrap_or(""))
            )
        })
        .collect();
    let notes = b
        .notes
        .as_deref()
        .map(|n| format!("<p>{}</p>", html_escape(n)))
        .unwrap_or_default();
    format!(
        r#"<section><h2>{}</h2>{}<table><tr><th>#</th><th>Daño</th><th>Observación</th></tr>{}</table>{}</section>"#,
        html_escape(title),
        image_tag(&b.diagram.image, "photo", "Diagrama de carrocería"),
        rows,
        notes
    )
}

fn render_tires(title: &str, t: &TireDiagramSection) -> String {
    // A synthesized diagram has no readings baked in; draw them over it.
    let diagram = if t.diagram.synthesized {
        let overlay: String = t
            .rows
            .iter()
            .map(|r| {
                let l = &r.leader;
                format!(
                    concat!(
                        r#"<div class="dot" style="left:{ox:.1}px;top:{oy:.1}px;background:{color}"></div>"#,
                        r#"<div class="leader" style="left:{ox:.1}px;top:{oy:.1}px;width:{len:.1}px;transform:{rot}"></div>"#,
                        r#"<div class="leader-label" style="left:{lx:.1}px;top:{ly:.1}px">{value:.1} mm</div>"#
                    ),
                    ox = l.origin_x,
                    oy = l.origin_y,
                    len = l.length,
                    rot = l.css_transform(),
                    lx = l.label_x,
                    ly = l.label_y,
                    color = r.band.color(),
                    value = r.value,
                )
            })
            .collect();
        format!(
            r#"<div class="diagram" style="width:{:.0}px;height:{:.0}px">{}{}</div>"#,
            t.frame.width,
            t.frame.height,
            image_tag(&t.diagram.image, "", "Diagrama de llantas"),
            overlay
        )
    } else {
        image_tag(&t.diagram.image, "photo", "Diagrama de llantas")
    };
    let rows: String = t
        .rows
        .iter()
        .map(|r| {
            format!(
                "<tr><td>{}</td><td>{:.1} mm</td><td>{}</td></tr>",
                html_escape(&r.title),
                r.value,
                band_badge(r.band)
            )
        })
        .collect();
    format!(
        r#"<section><h2>{}</h2>{}<table><tr><th>Llanta</th><th>Profundidad</th><th>Estado</th></tr>{}</table><p>Estado general: {}</p></section>"#,
        html_escape(title),
        diagram,
        rows,
        band_badge(t.worst_band)
    )
}

fn render_photos(title: &str, page: &PhotoPage) -> String {
    let mut cells: String = page
        .slots
        .iter()
        .map(|slot| {
            let caption = match &slot.description {
                Some(d) => format!("{} - {}", slot.label, d),
                None => slot.label.clone(),
            };
            format!(
                "<figure>{}<figcaption>{}</figcaption></figure>",
                image_tag(&slot.image, "photo", &caption),
                html_escape(&caption)
            )
        })
        .collect();
    for _ in 0..page.empty_slots() {
        cells.push_str(r#"<figure class="empty"></figure>"#);
    }
    format!(
        r#"<section><h2>{}</h2><div class="photo-grid">{}</div></section>"#,
        html_escape(title),
        cells
    )
}

fn image_tag(image: &EmbeddedImage, class: &str, alt: &str) -> String {
    match image.data_uri() {
        Some(uri) => format!(
            r#"<img class="{}" src="{}" alt="{}">"#,
            class,
            uri,
            html_escape(alt)
        ),
        None => r#"<div class="no-image">Sin imagen</div>"#.to_string(),
    }
}

fn band_badge(band: SeverityBand) -> String {
    format!(
        r#"<span class="badge" style="background:{}">{}</span>"#,
        band.color(),
        band.label()
    )
}

fn status_color(status: ItemStatus) -> &'static str {
    match status {
        ItemStatus::Good => "#43A047",
        ItemStatus::Regular => "#FB8C00",
        ItemStatus::Bad => "#E53935",
        ItemStatus::NotApplicable => "#9E9E9E",
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(sections: Vec<ReportSection>) -> ComposedReport {
        ComposedReport {
            title: "Informe <ABC123>".to_string(),
            file_name: "inspeccion_ABC123_20240315.pdf".to_string(),
            watermark: EmbeddedImage::Placeholder,
            footer: "Aviso legal".to_string(),
            sections,
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
    }

    #[test]
    fn test_placeholder_renders_no_image_box() {
        assert!(image_tag(&EmbeddedImage::Placeholder, "photo", "x").contains("Sin imagen"));
        let tag = image_tag(&EmbeddedImage::new("image/png", vec![1]), "photo", "x");
        assert!(tag.contains("src=\"data:image/png;base64,AQ==\""));
    }

    #[test]
    fn test_footer_on_every_page() {
        let sections = vec![
            ReportSection::SuggestedPrice(SuggestedPriceSection::new(Some(1_000))),
            ReportSection::Verdict(VerdictSection::new(None, None)),
        ];
        let html = HtmlRenderer::new().with_minify(false).render(&report(sections));
        assert_eq!(html.matches(r#"<div class="page">"#).count(), 2);
        assert_eq!(html.matches("Aviso legal").count(), 2);
        assert!(html.contains("Informe &lt;ABC123&gt;"));
        assert!(html.contains("PENDIENTE"));
    }
}
