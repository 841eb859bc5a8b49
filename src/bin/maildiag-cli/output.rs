#[cfg(any(feature = "with-serde", feature = "with-csv"))]
use anyhow::Context;
use anyhow::{Result, bail};

use crate::args::Cli;
use maildiag_lib::{Diagnosis, Kind, ParseReport};

#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
pub struct OutputRow {
    #[cfg_attr(feature = "with-serde", serde(flatten))]
    pub report: ParseReport,
    pub valid: bool,
    #[cfg_attr(feature = "with-serde", serde(skip_serializing_if = "Option::is_none"))]
    pub expected: Option<Kind>,
    #[cfg_attr(feature = "with-serde", serde(skip_serializing_if = "Option::is_none"))]
    pub matched: Option<bool>,
}

impl OutputRow {
    pub fn new(report: ParseReport, expected: Option<Kind>) -> Self {
        let valid = report.is_valid();
        let matched = expected.map(|kind| report.worst.kind() == kind);
        Self {
            report,
            valid,
            expected,
            matched,
        }
    }

    /// Avec --expect, la correspondance remplace le verdict.
    pub fn passed(&self) -> bool {
        self.matched.unwrap_or(self.valid)
    }
}

/// Niveau de détail de la sortie humaine.
#[derive(Debug, Clone, Copy, Default)]
pub struct Detail {
    pub diagnose: bool,
    pub all: bool,
}

impl Detail {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            diagnose: cli.diagnose,
            all: cli.all,
        }
    }
}

pub fn write_reports(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    match cli.format.as_str() {
        "human" => write_human(rows, Detail::from_cli(cli)),
        "json" => write_json(rows, cli),
        "ndjson" => write_ndjson(rows, cli),
        "csv" => write_csv(rows, cli),
        other => bail!("unknown --format '{other}', use: human|json|ndjson|csv"),
    }
}

pub fn any_failed(rows: &[OutputRow]) -> bool {
    rows.iter().any(|row| !row.passed())
}

pub fn human_lines(row: &OutputRow, detail: Detail) -> Vec<String> {
    let report = &row.report;
    let address = report.address.escape_debug();
    let mut lines = Vec::new();

    if row.valid {
        lines.push(format!("[OK]    {address}"));
    } else {
        lines.push(format!("[INVALID] {address} :: {}", report.worst.tag()));
    }

    if detail.diagnose {
        lines.extend(explain_lines(&report.worst));
    }

    if detail.all {
        for diagnosis in &report.diagnoses {
            lines.push(format!(
                "        - {} ({})",
                diagnosis.tag(),
                diagnosis.code()
            ));
        }
    }

    if let (Some(expected), Some(matched)) = (row.expected, row.matched) {
        let verdict = if matched { "match" } else { "mismatch" };
        lines.push(format!(
            "        expect: {expected} -> {verdict} (got {})",
            report.worst.tag()
        ));
    }

    lines
}

/// Description d'un diagnostic, une ligne par référence.
pub fn explain_lines(diagnosis: &Diagnosis) -> Vec<String> {
    let mut lines = vec![
        format!("        {diagnosis}"),
        format!(
            "        band: {} ({})",
            diagnosis.band(),
            diagnosis.band().description()
        ),
    ];
    for reference in diagnosis.references() {
        lines.push(format!(
            "        ref: {} <{}>",
            reference.citation, reference.link
        ));
    }
    lines
}

fn write_human(rows: &[OutputRow], detail: Detail) -> Result<()> {
    for row in rows {
        for line in human_lines(row, detail) {
            println!("{line}");
        }
    }
    Ok(())
}

#[cfg(feature = "with-serde")]
fn write_json(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    let s = serde_json::to_string_pretty(rows)?;
    if let Some(path) = &cli.out {
        write_all_atomically(path, s.as_bytes())?;
    } else {
        println!("{s}");
    }
    Ok(())
}

#[cfg(not(feature = "with-serde"))]
fn write_json(_: &[OutputRow], _: &Cli) -> Result<()> {
    bail!("format=json nécessite la feature 'with-serde'")
}

#[cfg(feature = "with-serde")]
fn write_ndjson(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.out {
        let mut buf = Vec::new();
        for row in rows {
            let line = serde_json::to_string(row)?;
            buf.extend_from_slice(line.as_bytes());
            buf.push(b'\n');
        }
        write_all_atomically(path, &buf)?;
    } else {
        for row in rows {
            println!("{}", serde_json::to_string(row)?);
        }
    }
    Ok(())
}

#[cfg(not(feature = "with-serde"))]
fn write_ndjson(_: &[OutputRow], _: &Cli) -> Result<()> {
    bail!("format=ndjson nécessite la feature 'with-serde'")
}

#[cfg(feature = "with-serde")]
pub fn write_explain_json(diagnosis: &Diagnosis) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(diagnosis)?);
    Ok(())
}

#[cfg(not(feature = "with-serde"))]
pub fn write_explain_json(_: &Diagnosis) -> Result<()> {
    bail!("format=json nécessite la feature 'with-serde'")
}

#[cfg(feature = "with-csv")]
fn write_csv(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.out {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        for row in rows {
            wtr.write_record(csv_record(row))?;
        }
        let data = wtr.into_inner()?;
        write_all_atomically(path, &data)?;
    } else {
        let mut wtr = csv::Writer::from_writer(std::io::stdout());
        for row in rows {
            wtr.write_record(csv_record(row))?;
        }
        wtr.flush()?;
    }
    Ok(())
}

#[cfg(not(feature = "with-csv"))]
fn write_csv(_: &[OutputRow], _: &Cli) -> Result<()> {
    bail!("format=csv nécessite la feature 'with-csv'")
}

// colonnes stables : address, valid, band, tag, code, message [, expected, matched]
#[cfg(feature = "with-csv")]
fn csv_record(row: &OutputRow) -> Vec<String> {
    let worst = &row.report.worst;
    let mut record = vec![
        row.report.address.clone(),
        row.valid.to_string(),
        worst.band().to_string(),
        worst.tag(),
        worst.code().to_string(),
        worst.message().to_string(),
    ];
    if let (Some(expected), Some(matched)) = (row.expected, row.matched) {
        record.push(expected.tag());
        record.push(matched.to_string());
    }
    record
}

#[cfg(any(feature = "with-serde", feature = "with-csv"))]
fn write_all_atomically(path: &str, bytes: &[u8]) -> Result<()> {
    use std::io::Write;

    let tmp = format!("{path}.tmp");
    {
        let mut f = std::fs::File::create(&tmp).with_context(|| format!("create {tmp}"))?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    std::fs::rename(&tmp, path).with_context(|| format!("rename {tmp} -> {path}"))?;
    Ok(())
}
