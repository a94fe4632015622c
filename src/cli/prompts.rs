use anyhow::Result;
use colored::*;
use dialoguer::Select;
use std::io::IsTerminal;
use std::path::Path;

/// Arrow-key Yes/No prompt
pub fn prompt_confirmation(prompt: &str, default_yes: bool) -> Result<bool> {
    let items = vec!["Yes", "No"];
    let default_index = if default_yes { 0 } else { 1 };

    let selection = Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(default_index)
        .interact()?;

    Ok(selection == 0)
}

/// Ask before replacing an existing file. Without a terminal the answer is no
/// unless `force` is set.
pub fn confirm_overwrite(path: &Path, force: bool) -> Result<bool> {
    if force || !path.exists() {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        println!(
            "{} {} already exists, pass --force to overwrite",
            "!".bright_yellow().bold(),
            path.display()
        );
        return Ok(false);
    }
    prompt_confirmation(&format!("{} already exists. Overwrite?", path.display()), false)
}

pub fn success(message: impl AsRef<str>) {
    println!("{} {}", "✓".bright_green().bold(), message.as_ref());
}
