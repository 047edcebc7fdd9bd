//! Rendered HTML checks on a composed report.

use chrono::NaiveDate;
use vi_annotate::{upsert_tire_measurement, TirePosition};
use vi_report::record::{InspectionPhoto, TireInspection, VehicleInfo};
use vi_report::{compose_report, CompanySettings, HtmlRenderer, InspectionRecord};

fn record() -> InspectionRecord {
    let at = NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap();
    let mut record = InspectionRecord::new(
        "INS-7",
        at,
        VehicleInfo {
            plate: "XYZ987".to_string(),
            ..VehicleInfo::default()
        },
    );
    record.tires = Some(TireInspection {
        measurements: upsert_tire_measurement(&[], TirePosition::FrontRight, 1.2).unwrap(),
        ..TireInspection::default()
    });
    record.photos = vec![InspectionPhoto {
        label: "1".to_string(),
        image: String::new(),
        description: None,
    }];
    record
}

#[tokio::test]
async fn test_rendered_document() {
    let settings = CompanySettings {
        disclaimer: Some("Sin garantía <futura>".to_string()),
        ..CompanySettings::new("Autos & Cía")
    };
    let report = compose_report(Some(&record()), &settings).await.unwrap();
    let html = HtmlRenderer::new().with_minify(false).render(&report);

    let pages = html.matches(r#"<div class="page">"#).count();
    assert!(pages >= 4, "expected header, tire, photo and verdict pages, got {}", pages);
    assert_eq!(html.matches("Sin garantía &lt;futura&gt;").count(), pages);
    assert!(html.contains("Autos &amp; Cía"));
    assert!(html.contains("CRÍTICO"));
    assert!(html.contains("rotate(-35.54deg)"));
    assert!(html.contains("Sin imagen"));
    assert!(html.contains(r#"<figure class="empty"></figure>"#));
}

#[tokio::test]
async fn test_minified_output_keeps_content() {
    let report = compose_report(Some(&record()), &CompanySettings::new("Taller"))
        .await
        .unwrap();
    let full = HtmlRenderer::new().with_minify(false).render(&report);
    let minified = HtmlRenderer::new().with_minify(true).render(&report);
    assert!(minified.len() < full.len());
    assert!(minified.contains("PENDIENTE"));
}
