mod cli;
mod commands;
mod controller;
mod datekey;
mod model;
mod storage;
mod ui;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let command = args.command.unwrap_or(cli::Command::Tui { year: None });
    match command {
        cli::Command::Init => commands::init(),
        cli::Command::Tui { year } => commands::tui(year),
        cli::Command::Notes => commands::notes(),
        cli::Command::Stats { year } => commands::stats(year),
        cli::Command::Select { from, to } => commands::select(from, to),
        cli::Command::Month { month } => commands::month(month),
        cli::Command::Note { content } => commands::note(content),
        cli::Command::Delete { note_id } => commands::delete(note_id),
        cli::Command::Clear => commands::clear(),
    }
}
