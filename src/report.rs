//! 보고서 출력: JSON, CSV, 텍스트.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::checker::ApplicationReport;
use crate::pipeline::PipelineReport;
use crate::selector::Ranking;
use crate::unifier::UnifiedRecords;
use crate::validator::ValidationReport;

/// CSV에서 결측 칸 표기.
pub const MISSING_CELL: &str = "missing data";

pub fn to_json(report: &PipelineReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

pub fn write_json(report: &PipelineReport, path: impl AsRef<Path>) -> std::io::Result<()> {
    let json = to_json(report)?;
    fs::write(path, json)
}

fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// 통합 데이터 CSV. 첫 열은 `Alloy Name`, 값이 없는 칸은 `missing data`로 쓴다.
pub fn unified_to_csv(unified: &UnifiedRecords) -> String {
    let columns: Vec<&str> = unified.property_names().into_iter().collect();
    let mut output = String::new();

    let mut header = vec!["Alloy Name".to_string()];
    header.extend(columns.iter().map(|c| csv_field(c)));
    let _ = writeln!(output, "{}", header.join(","));

    for (code, props) in &unified.records {
        let mut row = vec![csv_field(code)];
        for column in &columns {
            let cell = match props.get(*column) {
                Some(Some(v)) => csv_field(&v.to_string()),
                _ => MISSING_CELL.to_string(),
            };
            row.push(cell);
        }
        let _ = writeln!(output, "{}", row.join(","));
    }
    output
}

pub fn write_unified_csv(unified: &UnifiedRecords, path: impl AsRef<Path>) -> std::io::Result<()> {
    fs::write(path, unified_to_csv(unified))
}

/// 순위 CSV.
pub fn ranking_to_csv(ranking: &Ranking) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "rank,code,application,score,status,missing");
    for (i, e) in ranking.entries.iter().enumerate() {
        let _ = writeln!(
            output,
            "{},{},{},{:.4},{},{}",
            i + 1,
            csv_field(&e.code),
            e.application,
            e.score,
            if e.passed { "Pass" } else { "Fail" },
            csv_field(&e.missing.join(";")),
        );
    }
    output
}

/// 여러 용도의 순위를 하나의 CSV로 쓴다.
pub fn write_rankings_csv(report: &PipelineReport, path: impl AsRef<Path>) -> std::io::Result<()> {
    let mut output = String::new();
    for (i, outcome) in report.applications.values().enumerate() {
        let csv = ranking_to_csv(&outcome.ranking);
        if i == 0 {
            output.push_str(&csv);
        } else {
            // 헤더는 한 번만 쓴다.
            output.extend(csv.lines().skip(1).map(|l| format!("{l}\n")));
        }
    }
    fs::write(path, output)
}

/// 재료별 2차 검사 결과를 `SS.166: Fail (Reason: ...)` 형식으로 나열한다.
pub fn render_check_report(report: &ApplicationReport) -> String {
    let mut output = String::new();
    for r in &report.results {
        if r.passed() {
            let _ = writeln!(output, "{}: Pass", r.code);
        } else {
            let reasons: Vec<String> = r.failed.iter().map(ToString::to_string).collect();
            let _ = writeln!(output, "{}: Fail (Reason: {})", r.code, reasons.join("; "));
        }
    }
    output
}

pub fn render_validation_report(report: &ValidationReport) -> String {
    if report.is_clean() {
        return "No issues found. All alloy data is complete and valid.\n".to_string();
    }
    let mut output = String::new();
    for issue in &report.issues {
        let state = if issue.excluded { "excluded" } else { "kept" };
        let _ = write!(output, "{} [{state}]", issue.code);
        if !issue.missing.is_empty() {
            let _ = write!(output, " missing: {}", issue.missing.join(", "));
        }
        for f in &issue.invalid {
            let _ = write!(output, " invalid {}='{}' ({})", f.property, f.value, f.reason);
        }
        if issue.unrecognized_code {
            let _ = write!(output, " unrecognized code format");
        }
        output.push('\n');
    }
    for d in &report.discrepancies {
        let _ = writeln!(
            output,
            "{}: {} text={} graph={} (text value used)",
            d.code, d.property, d.text_value, d.graph_value
        );
    }
    output
}

/// 파이프라인 전체 요약 텍스트.
pub fn render_summary(report: &PipelineReport) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "== Validation ==");
    output.push_str(&render_validation_report(&report.validation));
    for (app, outcome) in &report.applications {
        let _ = writeln!(output, "\n== {app} ==");
        output.push_str(&render_check_report(&outcome.check));
        let _ = writeln!(output, "-- ranking --");
        for (i, e) in outcome.ranking.entries.iter().enumerate() {
            let status = if e.passed { "Pass" } else { "Fail" };
            let _ = write!(output, "{:>2}. {} {:.4} {status}", i + 1, e.code, e.score);
            if !e.missing.is_empty() {
                let _ = write!(output, " (missing: {})", e.missing.join(", "));
            }
            output.push('\n');
        }
    }
    for (app, reason) in &report.failed_applications {
        let _ = writeln!(output, "\n== {app} == skipped: {reason}");
    }
    output
}
