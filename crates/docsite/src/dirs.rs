use crate::prelude::{println, *};
use crate::store::Store;
use colored::Colorize;
use docsite_core::directory::{parse_unit_path, DirectoryGroup, Directories};

#[derive(Debug, clap::Args, Clone)]
pub struct DirsOptions {
    /// Unit path, optionally pinned to a version (e.g. "example.com/web@v1.2.0")
    pub path: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Include internal directories
    #[arg(long)]
    pub internal: bool,
}

pub async fn run(options: DirsOptions, global: crate::Global) -> Result<()> {
    let (path, version) = parse_unit_path(&options.path)?;

    if global.verbose {
        println!("Reading {} from {}", options.path, global.db.display());
    }

    let store = Store::open(&global.db)?;
    let directories = store
        .run(move |store| {
            let unit = store
                .unit(&path, version.as_deref())?
                .ok_or_else(|| Error::NotFound(path.clone()))?;
            crate::views::directories(store, &unit, version.as_deref())
        })
        .await?;

    if options.json {
        println!("{}", format_dirs_json(&directories)?);
    } else {
        anstream::print!("{}", format_dirs_text(&directories, options.internal));
    }

    Ok(())
}

fn format_dirs_json(directories: &Directories) -> Result<String> {
    serde_json::to_string_pretty(directories)
        .map_err(|e| eyre!("JSON serialization failed: {}", e))
}

fn format_group_text(out: &mut String, group: &DirectoryGroup, internal: bool) {
    if !internal && group.is_all_internal() {
        return;
    }

    let synopsis = group
        .root
        .as_ref()
        .map(|r| r.synopsis.as_str())
        .unwrap_or_default();
    out.push_str(&format!(
        "  {} {}\n",
        group.prefix.bright_cyan().bold(),
        synopsis.bright_black()
    ));

    for child in &group.children {
        if child.is_internal && !internal {
            continue;
        }
        let marker = if child.is_module { " (module)" } else { "" };
        out.push_str(&format!(
            "    {}{} {}\n",
            child.suffix.white(),
            marker.yellow(),
            child.synopsis.bright_black()
        ));
    }
}

/// Convert a directory listing to indented text with colors
fn format_dirs_text(directories: &Directories, internal: bool) -> String {
    let mut out = String::new();

    if directories.is_empty() {
        out.push_str(&format!("{}\n", "No subdirectories.".yellow()));
        return out;
    }

    for (title, groups) in [
        ("PACKAGES", &directories.packages),
        ("COMMANDS", &directories.commands),
    ] {
        if groups.is_empty() {
            continue;
        }
        out.push_str(&format!("{}\n", title.bright_yellow().bold()));
        for group in groups {
            format_group_text(&mut out, group, internal);
        }
    }

    out
}
