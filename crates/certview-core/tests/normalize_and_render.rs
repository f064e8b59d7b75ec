//! # Normalize → Render Pipeline Tests
//!
//! Drives mixed-generation certificate documents through the normalizer and
//! the summary renderer together, the way the query service does.

use certview_core::{normalize, render, DocValue, Document, Role};
use chrono::{TimeZone, Utc};
use serde_json::json;

fn mixed_batch() -> Vec<Document> {
    vec![
        Document::from_json(json!({
            "certificateId": "CERT-A",
            "issuedAt": {"$date": "2024-03-15T08:00:00Z"},
            "status": "ISSUED",
            "pdfUrl": "https://cdn.example/a.pdf",
            "verificationUrl": "https://verify.example/CERT-A",
            "student": {"fullName": "Asha Verma", "course": "B.Tech", "cgpa": 8.7, "email": "asha@example.edu"}
        }))
        .unwrap(),
        Document::from_json(json!({
            "certificate_id": "CERT-B",
            "issue_date": "2019-06-01",
            "status": "VALID",
            "student_name": "Imran Qureshi",
            "course_name": "Diploma",
            "grade": "A"
        }))
        .unwrap(),
    ]
}

#[test]
fn structured_date_of_2024_03_15_normalizes_to_literal() {
    let dt = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
    for key in ["issuedAt", "issue_date"] {
        let doc = Document::new().with(key, dt);
        assert_eq!(normalize(&doc).issue_date, "2024-03-15", "key {key}");
    }
}

#[test]
fn absent_issue_date_normalizes_to_placeholder() {
    let doc = Document::new().with("certificateId", "CERT-X");
    assert_eq!(normalize(&doc).issue_date, "N/A");
}

#[test]
fn normalization_is_repeatable() {
    for doc in mixed_batch() {
        assert_eq!(normalize(&doc), normalize(&doc));
    }
}

#[test]
fn missing_student_object_uses_flat_fallbacks_for_every_alias() {
    let doc = Document::new()
        .with("student_name", "Flat Name")
        .with("course_name", "Flat Course")
        .with("grade", "B+")
        .with("department", "Mech")
        .with("roll_number", "ME-7")
        .with("student_email", "flat@example.edu");
    let r = normalize(&doc);
    assert_eq!(r.name.as_deref(), Some("Flat Name"));
    assert_eq!(r.course.as_deref(), Some("Flat Course"));
    assert_eq!(r.grade, Some(json!("B+")));
    assert_eq!(r.department.as_deref(), Some("Mech"));
    assert_eq!(r.roll_number.as_deref(), Some("ME-7"));
    assert_eq!(r.student_email.as_deref(), Some("flat@example.edu"));
}

#[test]
fn individual_summary_over_mixed_batch() {
    let records: Vec<_> = mixed_batch().iter().map(normalize).collect();
    let text = render(Role::Student, "Asha Verma", &records);

    assert!(text.contains("Certificates Issued: 2"));
    assert!(text.contains("1. Asha Verma - B.Tech"));
    assert!(text.contains("   Certificate ID: CERT-A"));
    assert!(text.contains("   Issued: 2024-03-15, Status: ISSUED"));
    assert!(text.contains("   Grade/CGPA: 8.7"));
    assert!(text.contains("   PDF Download: https://cdn.example/a.pdf"));
    assert!(text.contains("2. Imran Qureshi - Diploma"));
    assert!(text.contains("   Issued: 2019-06-01, Status: VALID"));
    assert!(text.contains("   Grade/CGPA: A"));
}

#[test]
fn ministry_summary_of_twenty_records() {
    let records: Vec<_> = (0..20)
        .map(|i| {
            normalize(
                &Document::new()
                    .with("certificateId", format!("CERT-{i}"))
                    .with("student_name", format!("Holder {i}"))
                    .with("status", DocValue::from("ISSUED")),
            )
        })
        .collect();
    let text = render(Role::Moe, "Secretary", &records);

    let detail = text.lines().filter(|l| l.contains("(Issued: N/A")).count();
    assert_eq!(detail, 15);
    let remainder: Vec<_> = text.lines().filter(|l| l.starts_with("...and")).collect();
    assert_eq!(
        remainder,
        vec!["...and 5 more certificates across all institutions."]
    );
}
