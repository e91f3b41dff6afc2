//! Status subcommand - per-unit state table

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, CellAlignment, Color};

use confcollect_acquire::{UnitReport, UnitState};
use confcollect_store::UnitStatus;

use super::table;
use crate::config::Config;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Catalog root directory
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Only show units without a terminal marker
    #[arg(long)]
    pub pending: bool,
}

fn state_color(state: &UnitState) -> Color {
    match state {
        UnitState::Done(UnitStatus::Processed) => Color::Green,
        UnitState::Done(UnitStatus::AllFailed) | UnitState::Unreadable(_) => Color::Red,
        UnitState::Done(_) => Color::DarkGrey,
        UnitState::InProgress { .. } => Color::Yellow,
        UnitState::Unseen => Color::Reset,
    }
}

fn row(report: &UnitReport) -> Vec<Cell> {
    vec![
        Cell::new(&report.venue),
        Cell::new(&report.period),
        Cell::new(report.records).set_alignment(CellAlignment::Right),
        Cell::new(report.queued).set_alignment(CellAlignment::Right),
        Cell::new(report.failures.map_or_else(|| "-".to_string(), |n| n.to_string()))
            .set_alignment(CellAlignment::Right),
        Cell::new(report.state.to_string()).fg(state_color(&report.state)),
    ]
}

pub fn run(args: StatusArgs, config: &Config) -> Result<ExitCode> {
    let root = args.root.unwrap_or_else(|| config.catalog.root.clone());
    let reports = confcollect_acquire::scan(&root)?;
    if reports.is_empty() {
        eprintln!("No work units under {}", root.display());
        return Ok(ExitCode::SUCCESS);
    }

    let mut done = 0;
    let mut table = table(&["Venue", "Period", "Records", "Queue", "Not acquired", "State"]);
    for report in &reports {
        let is_done = matches!(report.state, UnitState::Done(_));
        if is_done {
            done += 1;
        }
        if args.pending && is_done {
            continue;
        }
        table.add_row(row(report));
    }

    eprintln!("\n{table}");
    eprintln!("{done}/{} units done", reports.len());
    Ok(ExitCode::SUCCESS)
}
