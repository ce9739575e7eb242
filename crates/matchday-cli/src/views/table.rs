use chrono::{DateTime, Utc};
use chrono_humanize::Humanize;
use comfy_table::{Attribute, Cell, Color, Row, Table};
use matchday_core::models::{ActivityType, Team};

#[derive(Debug, Clone)]
pub struct ViewOccurrence {
    pub key: String,
    pub title: String,
    pub kind: ActivityType,
    pub start_at: DateTime<Utc>,
    pub end_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub team_name: Option<String>,
    pub is_derived: bool,
}

pub fn display_occurrences(occurrences: &[ViewOccurrence]) {
    if occurrences.is_empty() {
        println!("Nothing scheduled in this window.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Key", "When", "Title", "Kind", "Team", "Location"]);

    for occurrence in occurrences {
        let mut row = Row::new();
        row.add_cell(Cell::new(&occurrence.key));

        let when = match occurrence.end_at {
            Some(end) => format!(
                "{} - {}",
                occurrence.start_at.format("%a %Y-%m-%d %H:%M"),
                end.format("%H:%M")
            ),
            None => occurrence.start_at.format("%a %Y-%m-%d %H:%M").to_string(),
        };
        let when_cell = if occurrence.start_at.date_naive() == Utc::now().date_naive() {
            Cell::new(format!("{} ({})", when, occurrence.start_at.humanize()))
                .fg(Color::Yellow)
        } else {
            Cell::new(when)
        };
        row.add_cell(when_cell);

        let mut display_title = String::new();
        if occurrence.is_derived {
            display_title.push('↻'); // Generated instance of a series
            display_title.push(' ');
        }
        display_title.push_str(&occurrence.title);

        let title_cell = match occurrence.kind {
            ActivityType::Game => Cell::new(display_title)
                .fg(Color::Red)
                .add_attribute(Attribute::Bold),
            ActivityType::Tournament => Cell::new(display_title).fg(Color::Magenta),
            ActivityType::Training => Cell::new(display_title).fg(Color::Green),
            ActivityType::Other => Cell::new(display_title),
        };
        row.add_cell(title_cell);

        row.add_cell(Cell::new(occurrence.kind.to_string()));
        row.add_cell(Cell::new(occurrence.team_name.as_deref().unwrap_or("-")));
        row.add_cell(Cell::new(occurrence.location.as_deref().unwrap_or("-")));

        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_teams(teams: &[Team]) {
    if teams.is_empty() {
        println!("No teams yet.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Description"]);

    for team in teams {
        let mut row = Row::new();
        row.add_cell(Cell::new(&team.id.to_string()[..8]));
        row.add_cell(Cell::new(&team.name).add_attribute(Attribute::Bold));
        row.add_cell(Cell::new(team.description.as_deref().unwrap_or("-")));
        table.add_row(row);
    }

    println!("{table}");
}
