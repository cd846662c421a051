//! Mailcraft command line: render, lint, and scaffold email templates.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use mc_core::{BlockKey, LintSeverity, Template, lint_template};
use mc_editor::{Editor, ExportError, ExportSink, ExportTarget, MemoryStore, NoticeLevel};
use std::fs;
use std::path::{Path, PathBuf};

/// Mailcraft - email template compiler
#[derive(Parser, Debug)]
#[command(name = "mailcraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a template JSON file to email-safe HTML
    Render {
        /// Template JSON file
        input: PathBuf,

        /// Output directory; the file is named after the template.
        /// Prints to stdout when omitted.
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },

    /// Check a template for structural problems
    Lint {
        /// Template JSON file
        input: PathBuf,
    },

    /// Create a template from palette keys, in order
    New {
        /// Template name
        #[arg(short, long, default_value = "Untitled Template")]
        name: String,

        /// Block keys (text, image, button, columns-2, ...)
        keys: Vec<String>,

        /// Write the JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the palette block keys
    Keys,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match Cli::parse().command {
        Command::Render { input, out_dir } => render(&input, out_dir),
        Command::Lint { input } => lint(&input),
        Command::New { name, keys, output } => scaffold(&name, &keys, output.as_deref()),
        Command::Keys => {
            for key in BlockKey::ALL {
                println!("{key}");
            }
            Ok(())
        }
    }
}

fn read_template(path: &Path) -> Result<Template> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("could not read {}", path.display()))?;
    Template::from_json(&raw).with_context(|| format!("{} is not a valid template", path.display()))
}

fn render(input: &Path, out_dir: Option<PathBuf>) -> Result<()> {
    let mut editor = Editor::new(Box::new(MemoryStore::new()));
    editor.load(read_template(input)?);

    let Some(dir) = out_dir else {
        print!("{}", editor.render_html());
        return Ok(());
    };
    let mut sink = FsSink { dir };
    let notice = editor.export(&mut sink, ExportTarget::Download);
    match notice.level {
        NoticeLevel::Success => {
            log::info!("{}", notice.message);
            println!("{}", sink.dir.join(editor.download_filename()).display());
            Ok(())
        }
        NoticeLevel::Error => bail!("{}", notice.message),
    }
}

fn lint(input: &Path) -> Result<()> {
    let template = read_template(input)?;
    let diags = lint_template(&template);
    for diag in &diags {
        println!("{diag}");
    }
    let warnings = diags
        .iter()
        .filter(|d| d.severity == LintSeverity::Warning)
        .count();
    if warnings > 0 {
        bail!("{warnings} warning(s) in {}", input.display());
    }
    Ok(())
}

fn scaffold(name: &str, keys: &[String], output: Option<&Path>) -> Result<()> {
    let mut editor = Editor::new(Box::new(MemoryStore::new()));
    editor.rename(name);
    for key in keys {
        if BlockKey::parse(key).is_none() {
            bail!("unknown block key `{key}` (see `mailcraft keys`)");
        }
        editor.add_block(key, None);
    }
    let json = serde_json::to_string_pretty(editor.template())?;
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("could not write {}", path.display()))?
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Writes downloads into a directory. The terminal has no clipboard or
/// preview window.
struct FsSink {
    dir: PathBuf,
}

impl ExportSink for FsSink {
    fn copy_html(&mut self, _html: &str) -> Result<(), ExportError> {
        Err(ExportError::Clipboard("no clipboard in the terminal".into()))
    }

    fn save_html(&mut self, filename: &str, html: &str) -> Result<(), ExportError> {
        let path = self.dir.join(filename);
        fs::create_dir_all(&self.dir)
            .and_then(|()| fs::write(&path, html))
            .map_err(|e| ExportError::Save {
                filename: path.display().to_string(),
                reason: e.to_string(),
            })
    }

    fn preview(&mut self, _html: &str) -> Result<(), ExportError> {
        Err(ExportError::PreviewBlocked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_new_with_keys() {
        let cli = Cli::parse_from(["mailcraft", "new", "-n", "Promo", "header", "button"]);
        let Command::New { name, keys, output } = cli.command else {
            panic!("expected new");
        };
        assert_eq!(name, "Promo");
        assert_eq!(keys, ["header", "button"]);
        assert!(output.is_none());
    }
}
