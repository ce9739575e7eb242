use clap::{Parser, Subcommand};

/// Club activity scheduling from the command line
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Add a new activity
    Add(AddCommand),
    /// List everything happening in a time window
    List(ListCommand),
    /// Show a single occurrence by its key
    Show(ShowCommand),
    /// Edit an activity (affects its whole series)
    Edit(EditCommand),
    /// Delete an activity and, with it, its whole series
    Delete(DeleteCommand),
    /// Manage teams
    Team(TeamCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    /// The title of the activity
    pub title: String,
    /// When it starts (e.g. "2024-03-05 18:00" or "next tuesday 6pm")
    #[clap(short, long)]
    pub start: String,
    /// When it ends
    #[clap(long, conflicts_with = "duration")]
    pub end: Option<String>,
    /// Length in minutes, as an alternative to --end
    #[clap(long)]
    pub duration: Option<i64>,
    /// A longer description
    #[clap(short, long)]
    pub description: Option<String>,
    /// Where it takes place
    #[clap(short, long)]
    pub location: Option<String>,
    /// Kind of activity (training, game, tournament, other)
    #[clap(short, long)]
    pub kind: Option<String>,
    /// Who sees it (club, team)
    #[clap(long)]
    pub visibility: Option<String>,
    /// The owning team, by name
    #[clap(short, long)]
    pub team: Option<String>,
    /// Repeat cadence (daily, weekly, monthly)
    #[clap(long, requires = "until")]
    pub every: Option<String>,
    /// Weekdays for weekly repeats (e.g. "mon,wed,fri")
    #[clap(long, requires = "every")]
    pub on: Option<String>,
    /// Last date of the series, inclusive (e.g. "2024-06-30")
    #[clap(long, requires = "every")]
    pub until: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ListCommand {
    /// Window start (defaults to now)
    #[clap(long)]
    pub from: Option<String>,
    /// Window end (defaults to the configured window length after --from)
    #[clap(long)]
    pub to: Option<String>,
    /// Only activities of this team, by name
    #[clap(short, long)]
    pub team: Option<String>,
    /// Only activities of this kind
    #[clap(short, long)]
    pub kind: Option<String>,
    /// Emit JSON instead of a table
    #[clap(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ShowCommand {
    /// An occurrence key as printed by `list`: a bare activity id or
    /// "<id>-YYYYMMDD"
    pub key: String,
}

#[derive(Parser, Debug, Clone)]
pub struct EditCommand {
    /// The ID (or unique prefix) of the activity to edit
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, conflicts_with = "description")]
    pub description_clear: bool,

    #[arg(long)]
    pub location: Option<String>,
    #[arg(long, conflicts_with = "location")]
    pub location_clear: bool,

    #[arg(long)]
    pub start: Option<String>,

    #[arg(long)]
    pub end: Option<String>,
    #[arg(long, conflicts_with = "end")]
    pub end_clear: bool,

    #[arg(long)]
    pub kind: Option<String>,

    #[arg(long)]
    pub visibility: Option<String>,

    #[arg(long)]
    pub team: Option<String>,
    #[arg(long, conflicts_with = "team")]
    pub team_clear: bool,

    /// Change the repeat cadence (daily, weekly, monthly)
    #[arg(long)]
    pub every: Option<String>,
    /// Change the weekdays of a weekly repeat
    #[arg(long)]
    pub on: Option<String>,
    /// Change the last date of the series
    #[arg(long)]
    pub until: Option<String>,
    /// Convert the series back to a one-off activity
    #[arg(long, conflicts_with_all = ["every", "on", "until"])]
    pub no_repeat: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCommand {
    /// The ID (or unique prefix) of the activity to delete
    pub id: String,
    /// Skip the confirmation prompt
    #[clap(short, long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct TeamCommand {
    #[command(subcommand)]
    pub action: TeamAction,
}

#[derive(Subcommand, Debug, Clone)]
pub enum TeamAction {
    /// Add a team
    Add {
        name: String,
        #[clap(short, long)]
        description: Option<String>,
    },
    /// List teams
    List,
    /// Delete a team (only when no activities reference it)
    Delete {
        name: String,
        #[clap(short, long)]
        force: bool,
    },
}
