use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "yeargrid",
    version,
    about = "Terminal yearly calendar for marking days and attaching notes"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a project-scoped calendar in the current directory
    Init,
    /// Launch the interactive calendar
    Tui {
        /// Year to display (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
    },
    /// Print saved notes
    Notes,
    /// Print selection statistics
    Stats {
        /// Year used for the percent-of-year figure
        #[arg(long)]
        year: Option<i32>,
    },
    /// Select a day or an inclusive range of days
    Select {
        /// Start date, YYYY-MM-DD with a zero-based month (00-11)
        from: String,
        /// Optional end date, same format
        #[arg(long)]
        to: Option<String>,
    },
    /// Toggle selection of a whole month
    Month {
        /// Month key, YYYY-MM with a zero-based month (00-11)
        month: String,
    },
    /// Attach a note to the currently selected days
    Note {
        /// Note text
        content: String,
    },
    /// Delete a note by id
    Delete {
        /// Note id (shown by `notes`)
        note_id: String,
    },
    /// Clear the day and month selection
    Clear,
}
