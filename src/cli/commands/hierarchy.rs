//! Enterprise hierarchy spreadsheet commands
//!
//! Every edit reads the xlsx file, applies one document command and writes
//! the file back.

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use colored::*;
use log::info;
use std::path::{Path, PathBuf};

use crate::cli::prompts::{confirm_overwrite, success};
use cxgen::config::Config;
use cxgen::hierarchy::{self, Direction, HierarchyDocument, LOCATION_COLUMN, spreadsheet};

#[derive(Args)]
pub struct HierarchyCommands {
    #[command(subcommand)]
    pub command: HierarchySubcommands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Side {
    Left,
    Right,
}

impl From<Side> for Direction {
    fn from(side: Side) -> Self {
        match side {
            Side::Left => Direction::Left,
            Side::Right => Direction::Right,
        }
    }
}

#[derive(Subcommand)]
pub enum HierarchySubcommands {
    /// Create a new spreadsheet with one row per location
    New {
        /// Location names, one row each
        #[arg(short, long = "location", required = true)]
        locations: Vec<String>,
        /// Extra columns after Location
        #[arg(short, long = "column")]
        columns: Vec<String>,
        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Overwrite without asking
        #[arg(short, long)]
        force: bool,
    },
    /// Print the sheet as a table
    Show { file: PathBuf },
    /// Append a column
    AddColumn { file: PathBuf, name: String },
    /// Remove a column by name
    RemoveColumn { file: PathBuf, name: String },
    /// Swap a column with its neighbour
    MoveColumn {
        file: PathBuf,
        name: String,
        #[arg(value_enum)]
        direction: Side,
    },
    /// Append a row
    AddRow {
        file: PathBuf,
        /// Cell values as Column=Value
        #[arg(short, long = "set")]
        values: Vec<String>,
    },
    /// Remove a row by its 0-based index
    RemoveRow { file: PathBuf, index: usize },
    /// Set one cell
    SetCell {
        file: PathBuf,
        row: usize,
        column: String,
        value: String,
    },
}

pub fn handle_hierarchy_command(args: HierarchyCommands, config: &Config) -> Result<()> {
    match args.command {
        HierarchySubcommands::New {
            locations,
            columns,
            output,
            force,
        } => {
            let path = output.unwrap_or_else(|| config.output.resolve(hierarchy::DEFAULT_FILE_NAME));
            new_command(&locations, &columns, &path, force)
        }
        HierarchySubcommands::Show { file } => show_command(&file),
        HierarchySubcommands::AddColumn { file, name } => edit(&file, |doc| {
            doc.add_column(&name)?;
            Ok(format!("Added column '{}'", name))
        }),
        HierarchySubcommands::RemoveColumn { file, name } => edit(&file, |doc| {
            let id = column_id(doc, &name)?;
            doc.remove_column(&id)?;
            Ok(format!("Removed column '{}'", name))
        }),
        HierarchySubcommands::MoveColumn { file, name, direction } => edit(&file, |doc| {
            let index = doc
                .columns()
                .iter()
                .position(|c| c.name == name)
                .with_context(|| format!("Column '{}' not found", name))?;
            doc.move_column(index, direction.into());
            Ok(format!("Moved column '{}'", name))
        }),
        HierarchySubcommands::AddRow { file, values } => edit(&file, |doc| {
            let assignments = parse_assignments(doc, &values)?;
            let row = doc.add_row();
            for (id, value) in assignments {
                doc.edit_cell(row, &id, value)?;
            }
            Ok(format!("Added row {}", row))
        }),
        HierarchySubcommands::RemoveRow { file, index } => edit(&file, |doc| {
            doc.remove_row(index)?;
            Ok(format!("Removed row {}", index))
        }),
        HierarchySubcommands::SetCell {
            file,
            row,
            column,
            value,
        } => edit(&file, |doc| {
            let id = column_id(doc, &column)?;
            doc.edit_cell(row, &id, value.clone())?;
            Ok(format!("Set row {} {} = '{}'", row, column, value))
        }),
    }
}

fn new_command(locations: &[String], columns: &[String], path: &Path, force: bool) -> Result<()> {
    let mut doc = HierarchyDocument::new();
    for name in columns {
        doc.add_column(name)?;
    }

    let location_id = column_id(&doc, LOCATION_COLUMN)?;
    for (i, location) in locations.iter().enumerate() {
        let row = if i == 0 { 0 } else { doc.add_row() };
        doc.edit_cell(row, &location_id, location.trim())?;
    }

    if !confirm_overwrite(path, force)? {
        println!("Operation cancelled.");
        return Ok(());
    }
    spreadsheet::write_file(&doc, path)?;
    success(format!("Created {} with {} row(s)", path.display(), doc.rows().len()));
    Ok(())
}

fn show_command(file: &Path) -> Result<()> {
    let doc = spreadsheet::read_file(file)?;

    let widths: Vec<usize> = doc
        .columns()
        .iter()
        .map(|col| {
            doc.rows()
                .iter()
                .map(|row| row.get(&col.id).map_or(0, |v| v.chars().count()))
                .chain(std::iter::once(col.name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = doc
        .columns()
        .iter()
        .zip(&widths)
        .map(|(col, w)| format!("{:<w$}", col.name, w = *w))
        .collect();
    println!("    {}", header.join("  ").bright_cyan().bold());

    for (index, row) in doc.rows().iter().enumerate() {
        let cells: Vec<String> = doc
            .columns()
            .iter()
            .zip(&widths)
            .map(|(col, w)| format!("{:<w$}", row.get(&col.id).map(String::as_str).unwrap_or(""), w = *w))
            .collect();
        println!("{:>3} {}", index.to_string().dimmed(), cells.join("  "));
    }
    Ok(())
}

/// Load, apply, save
fn edit<F>(file: &Path, apply: F) -> Result<()>
where
    F: FnOnce(&mut HierarchyDocument) -> Result<String>,
{
    let mut doc = spreadsheet::read_file(file)?;
    let message = apply(&mut doc)?;
    spreadsheet::write_file(&doc, file)?;
    info!("{}: {}", file.display(), message);
    success(message);
    Ok(())
}

fn column_id(doc: &HierarchyDocument, name: &str) -> Result<String> {
    doc.column_by_name(name)
        .map(|c| c.id.clone())
        .with_context(|| format!("Column '{}' not found", name))
}

/// `Column=Value` pairs resolved to column ids, checked before anything changes
fn parse_assignments(doc: &HierarchyDocument, values: &[String]) -> Result<Vec<(String, String)>> {
    values
        .iter()
        .map(|pair| {
            let (name, value) = pair
                .split_once('=')
                .with_context(|| format!("Expected Column=Value, got '{}'", pair))?;
            Ok((column_id(doc, name.trim())?, value.to_string()))
        })
        .collect()
}
