//! # Summary Renderer
//!
//! Formats canonical records into a role-appropriate plain-text report.
//!
//! | Role                  | Header                           | Listed records |
//! |-----------------------|----------------------------------|----------------|
//! | `MOE`                 | system-wide overview             | first 15       |
//! | `ADMIN`/`INSTITUTION` | institution admin profile + role | first 10       |
//! | individual            | personal profile                 | all, expanded  |
//!
//! The preview caps are fixed policy. Records are listed in input order.
//! Rendering never propagates a failure: if writing the report fails the
//! caller receives `Error retrieving data for {name}`.

use std::fmt::{self, Write};

use crate::caller::Role;
use crate::profile::StudentProfile;
use crate::record::{CanonicalCertificateRecord, NOT_AVAILABLE};

/// Records listed in the ministry overview.
pub const MOE_PREVIEW_LIMIT: usize = 15;

/// Records listed in the institution overview.
pub const INSTITUTION_PREVIEW_LIMIT: usize = 10;

/// Render a summary for `display_name` over `records`.
pub fn render(role: Role, display_name: &str, records: &[CanonicalCertificateRecord]) -> String {
    render_with_profile(role, display_name, records, None)
}

/// Render a summary, including the academic profile block for individual
/// callers when a profile is available.
pub fn render_with_profile(
    role: Role,
    display_name: &str,
    records: &[CanonicalCertificateRecord],
    profile: Option<&StudentProfile>,
) -> String {
    let mut out = String::new();
    let result = write_summary(&mut out, role, display_name, records, profile);
    finish(display_name, result.map(|()| out))
}

/// Fallback text used whenever a summary cannot be produced.
pub fn failure_message(display_name: &str) -> String {
    format!("Error retrieving data for {display_name}")
}

/// Write the summary into any formatter sink.
pub fn write_summary<W: Write>(
    out: &mut W,
    role: Role,
    display_name: &str,
    records: &[CanonicalCertificateRecord],
    profile: Option<&StudentProfile>,
) -> fmt::Result {
    match role {
        Role::Moe => write_ministry(out, display_name, records),
        Role::Admin | Role::Institution => write_institution(out, role, display_name, records),
        Role::Student => write_individual(out, display_name, records, profile),
    }
}

fn finish(display_name: &str, result: Result<String, fmt::Error>) -> String {
    match result {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(subject = %display_name, error = %e, "failed to render certificate summary");
            failure_message(display_name)
        }
    }
}

fn write_ministry<W: Write>(
    out: &mut W,
    display_name: &str,
    records: &[CanonicalCertificateRecord],
) -> fmt::Result {
    let total = records.len();
    writeln!(out, "Ministry of Education - System Overview for {display_name}:")?;
    writeln!(out)?;
    writeln!(out, "Role: Ministry of Education (MOE)")?;
    writeln!(out, "Total Certificates in System: {total}")?;

    if total > 0 {
        writeln!(out)?;
        writeln!(out, "Recent Certificates (showing up to {MOE_PREVIEW_LIMIT}):")?;
        write_overview_lines(out, records, MOE_PREVIEW_LIMIT)?;
        if total > MOE_PREVIEW_LIMIT {
            writeln!(out)?;
            writeln!(
                out,
                "...and {} more certificates across all institutions.",
                total - MOE_PREVIEW_LIMIT
            )?;
        }
    }
    Ok(())
}

fn write_institution<W: Write>(
    out: &mut W,
    role: Role,
    display_name: &str,
    records: &[CanonicalCertificateRecord],
) -> fmt::Result {
    let total = records.len();
    writeln!(out, "Institution Admin Profile for {display_name}:")?;
    writeln!(out)?;
    writeln!(out, "Role: {}", role.as_str())?;
    writeln!(out, "Total Certificates Issued: {total}")?;

    if total > 0 {
        writeln!(out)?;
        writeln!(out, "Recent Certificates (showing up to {INSTITUTION_PREVIEW_LIMIT}):")?;
        write_overview_lines(out, records, INSTITUTION_PREVIEW_LIMIT)?;
        if total > INSTITUTION_PREVIEW_LIMIT {
            writeln!(out)?;
            writeln!(
                out,
                "...and {} more certificates.",
                total - INSTITUTION_PREVIEW_LIMIT
            )?;
        }
    }
    Ok(())
}

/// One line per record: name, email, course, issue date, status.
fn write_overview_lines<W: Write>(
    out: &mut W,
    records: &[CanonicalCertificateRecord],
    limit: usize,
) -> fmt::Result {
    for (i, cert) in records.iter().take(limit).enumerate() {
        writeln!(
            out,
            "{}. {} ({}) - {} (Issued: {}, Status: {})",
            i + 1,
            or_na(&cert.name),
            or_na(&cert.student_email),
            or_na(&cert.course),
            cert.issue_date,
            or_na(&cert.status),
        )?;
    }
    Ok(())
}

fn write_individual<W: Write>(
    out: &mut W,
    display_name: &str,
    records: &[CanonicalCertificateRecord],
    profile: Option<&StudentProfile>,
) -> fmt::Result {
    writeln!(out, "Student Profile for {display_name}:")?;
    writeln!(out)?;

    if let Some(p) = profile {
        writeln!(out, "Enrollment Number: {}", or_na(&p.enrollment_number))?;
        writeln!(out, "Department: {}", or_na(&p.department))?;
        writeln!(out, "Current Semester: {}", json_or(&p.current_semester, NOT_AVAILABLE))?;
        writeln!(out, "Total Credits: {}", json_or(&p.total_credits, "0"))?;
        writeln!(out, "Courses Enrolled: {}", p.courses_enrolled.len())?;
    }

    writeln!(out)?;
    writeln!(out, "Certificates Issued: {}", records.len())?;

    if records.is_empty() {
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "Certificate Details:")?;
    for (i, cert) in records.iter().enumerate() {
        writeln!(out)?;
        writeln!(out, "{}. {} - {}", i + 1, or_na(&cert.name), or_na(&cert.course))?;
        writeln!(out, "   Certificate ID: {}", or_na(&cert.certificate_id))?;
        writeln!(
            out,
            "   Issued: {}, Status: {}",
            cert.issue_date,
            or_na(&cert.status)
        )?;
        writeln!(
            out,
            "   Grade/CGPA: {}",
            cert.grade_text().as_deref().unwrap_or(NOT_AVAILABLE)
        )?;
        if let Some(url) = cert.cloudinary_url.as_deref().filter(|u| !u.is_empty()) {
            writeln!(out, "   PDF Download: {url}")?;
        }
        if let Some(url) = cert.verification_url.as_deref().filter(|u| !u.is_empty()) {
            writeln!(out, "   Verify: {url}")?;
        }
    }
    Ok(())
}

fn or_na(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(NOT_AVAILABLE)
}

fn json_or(value: &Option<serde_json::Value>, default: &str) -> String {
    match value {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Null) | None => default.to_string(),
        Some(other) => other.to_string(),
    }
}
