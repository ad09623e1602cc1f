use crate::core::reports;
use crate::core::season::Season;
use crate::utils::error::Result;
use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Report {
    Standings,
    Constructors,
    Podiums,
    Circuits,
    DriverCircuits,
    FreeAgents,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

#[derive(Debug, Serialize)]
struct FreeAgentRow {
    race_number: u32,
    driver: String,
}

/// A report as header plus rows, ready for either output format.
struct Rendered<T: Serialize> {
    headers: &'static [&'static str],
    rows: Vec<T>,
    cells: fn(&T) -> Vec<String>,
}

impl<T: Serialize> Rendered<T> {
    fn write(&self, format: OutputFormat, mut out: impl Write) -> Result<()> {
        match format {
            OutputFormat::Csv => {
                let mut writer = csv::Writer::from_writer(out);
                for row in &self.rows {
                    writer.serialize(row)?;
                }
                writer.flush()?;
                Ok(())
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut out, &self.rows)?;
                writeln!(out)?;
                Ok(())
            }
            OutputFormat::Table => {
                let cells: Vec<Vec<String>> = self.rows.iter().map(self.cells).collect();
                write_table(out, self.headers, &cells)
            }
        }
    }
}

fn write_table(mut out: impl Write, headers: &[&str], rows: &[Vec<String>]) -> Result<()> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<String>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    writeln!(out, "{}", line(headers.iter().map(|h| h.to_string()).collect()))?;
    writeln!(
        out,
        "{}",
        widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  ")
    )?;
    for row in rows {
        writeln!(out, "{}", line(row.clone()))?;
    }
    Ok(())
}

pub fn render(
    season: &Season,
    report: Report,
    format: OutputFormat,
    today: NaiveDate,
    out: impl Write,
) -> Result<()> {
    match report {
        Report::Standings => Rendered {
            headers: &["pos", "number", "driver", "points"],
            rows: reports::ranking(season),
            cells: |s| {
                vec![
                    s.position.to_string(),
                    s.race_number.to_string(),
                    s.driver.clone(),
                    s.points.to_string(),
                ]
            },
        }
        .write(format, out),
        Report::Constructors => Rendered {
            headers: &["pos", "team", "points"],
            rows: reports::constructor_standings(season),
            cells: |s| vec![s.position.to_string(), s.team.clone(), s.points.to_string()],
        }
        .write(format, out),
        Report::Podiums => Rendered {
            headers: &["number", "driver", "podiums", "victories"],
            rows: reports::podium_counts(season),
            cells: |t| {
                vec![
                    t.race_number.to_string(),
                    t.driver.clone(),
                    t.podiums.to_string(),
                    t.victories.to_string(),
                ]
            },
        }
        .write(format, out),
        Report::Circuits => Rendered {
            headers: &["circuit", "country", "races"],
            rows: reports::races_per_circuit(season),
            cells: |t| vec![t.circuit.clone(), t.country.clone(), t.races.to_string()],
        }
        .write(format, out),
        Report::DriverCircuits => Rendered {
            headers: &["number", "circuit", "country", "participations"],
            rows: reports::driver_circuit_participations(season),
            cells: |t| {
                vec![
                    t.race_number.to_string(),
                    t.circuit.clone(),
                    t.country.clone(),
                    t.participations.to_string(),
                ]
            },
        }
        .write(format, out),
        Report::FreeAgents => Rendered {
            headers: &["number", "driver"],
            rows: season
                .free_agents(today)
                .into_iter()
                .map(|d| FreeAgentRow {
                    race_number: d.race_number,
                    driver: d.full_name(),
                })
                .collect(),
            cells: |r| vec![r.race_number.to_string(), r.driver.clone()],
        }
        .write(format, out),
    }
}
