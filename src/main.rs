use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use vaultkit::{Vault, VaultPath, WikiLink, extract_tags, extract_wikilinks};

#[derive(Debug, Parser)]
#[command(
    name = "vk",
    version,
    about = "Query and refactor links in a markdown note vault"
)]
struct Cli {
    /// Path to the vault root.
    #[arg(long, env = "VAULTKIT_VAULT", global = true)]
    vault: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a note with code, comments and math blanked out.
    Mask {
        /// Note path (relative to vault) or title.
        note: String,
    },
    /// List wikilinks and embeds of a note.
    Links {
        /// Note path (relative to vault) or title.
        note: String,

        /// Only show embeds (![[..]]).
        #[arg(long)]
        only_embeds: bool,
    },
    /// List inline tags of one note, or tag counts across the vault.
    Tags {
        /// Note path (relative to vault) or title.
        #[arg(long)]
        note: Option<String>,

        /// How many tags to print for the vault-wide listing.
        #[arg(long, default_value_t = 50)]
        top: usize,
    },
    /// Notes linking to a title.
    Backlinks {
        /// Target title.
        title: String,
    },
    /// Notes nothing else links to.
    Orphans,
    /// Link titles that match no note or alias.
    Unresolved,
    /// Resolve a title to a note path.
    Resolve {
        /// Title, alias, or path.
        title: String,
    },
    /// Rename a note and rewrite links to it.
    Rename {
        /// Note path (relative to vault) or title.
        note: String,

        /// New title (file name without extension).
        new_title: String,
    },
    /// Move a note and rewrite links to it.
    Move {
        /// Note path (relative to vault) or title.
        note: String,

        /// Destination note path, or a folder to keep the file name.
        to: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let vault = Vault::open(require_vault(cli.vault)?)?;

    match cli.command {
        Command::Mask { note } => {
            let rel = locate_note(&vault, &note)?;
            print!("{}", vault.pipeline().mask(&vault.read_note(&rel)?));
        }
        Command::Links { note, only_embeds } => {
            let rel = locate_note(&vault, &note)?;
            let content = vault.read_note(&rel)?;
            for link in extract_wikilinks(&content, vault.pipeline()) {
                if only_embeds && !link.embed {
                    continue;
                }
                print_link(&link);
            }
        }
        Command::Tags { note, top } => handle_tags(&vault, note, top)?,
        Command::Backlinks { title } => {
            for path in vault.backlinks(&title)? {
                println!("{}", path.as_str_lossy());
            }
        }
        Command::Orphans => {
            for path in vault.orphans()? {
                println!("{}", path.as_str_lossy());
            }
        }
        Command::Unresolved => {
            for u in vault.unresolved_links()? {
                let sources: Vec<_> = u.sources.iter().map(|p| p.as_str_lossy()).collect();
                println!("{}\t{}", u.title, sources.join(", "));
            }
        }
        Command::Resolve { title } => {
            let resolved = vault.resolve_note(&title)?;
            println!("{}", resolved.abs.display());
        }
        Command::Rename { note, new_title } => {
            let rel = locate_note(&vault, &note)?;
            let report = vault.rename_note(&rel, &new_title)?;
            print_move(&report);
        }
        Command::Move { note, to } => {
            let rel = locate_note(&vault, &note)?;
            let to = destination(&vault, &rel, &to)?;
            let report = vault.move_note(&rel, &to)?;
            print_move(&report);
        }
    }

    Ok(())
}

fn handle_tags(vault: &Vault, note: Option<String>, top: usize) -> anyhow::Result<()> {
    if let Some(note) = note {
        let rel = locate_note(vault, &note)?;
        for tag in extract_tags(&vault.read_note(&rel)?, vault.pipeline()) {
            println!("#{}", tag.0);
        }
        return Ok(());
    }

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for path in vault.notes()? {
        let content = vault.read_note(&path)?;
        let mut seen: Vec<String> = extract_tags(&content, vault.pipeline())
            .iter()
            .map(|t| t.normalized())
            .collect();
        seen.sort();
        seen.dedup();
        for tag in seen {
            *counts.entry(tag).or_default() += 1;
        }
    }

    let mut rows: Vec<(String, usize)> = counts.into_iter().collect();
    rows.sort_by(|(a_tag, a_n), (b_tag, b_n)| b_n.cmp(a_n).then_with(|| a_tag.cmp(b_tag)));
    for (tag, n) in rows.into_iter().take(top) {
        println!("{n}\t#{tag}");
    }
    Ok(())
}

/// Accepts an absolute note path, a vault-relative note path, or a title.
fn locate_note(vault: &Vault, note: &str) -> anyhow::Result<VaultPath> {
    if Path::new(note).is_absolute() {
        return Ok(vault.to_rel(Path::new(note))?);
    }
    if let Ok(rel) = VaultPath::try_from(note)
        && vault.is_note_rel(rel.as_path())
        && vault.to_abs(&rel).is_file()
    {
        return Ok(rel);
    }
    Ok(vault.resolve_note(note)?.path)
}

fn destination(vault: &Vault, from: &VaultPath, to: &Path) -> anyhow::Result<VaultPath> {
    let ext = &vault.config().note_extension;
    let is_note = to
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|e| e == ext);
    if is_note {
        return Ok(VaultPath::try_from(to)?);
    }
    let Some(file_name) = from.as_path().file_name() else {
        anyhow::bail!("source has no file name: {}", from.as_str_lossy());
    };
    Ok(VaultPath::try_from(to.join(file_name).as_path())?)
}

fn require_vault(vault: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    vault.ok_or_else(|| anyhow::anyhow!("--vault is required (or set VAULTKIT_VAULT)"))
}

fn print_link(l: &WikiLink) {
    println!(
        "{}:{}\tembed={}\ttitle={:?}\theading={:?}\tblock={:?}\tdisplay={:?}\traw={:?}",
        l.location.line,
        l.location.column,
        l.embed,
        l.title,
        l.heading(),
        l.block_id(),
        l.display,
        l.raw
    );
}

fn print_move(report: &vaultkit::MoveReport) {
    println!(
        "{} -> {}",
        report.from.as_str_lossy(),
        report.to.as_str_lossy()
    );
    println!("  files modified: {}", report.files_modified);
    println!("  wikilinks rewritten: {}", report.wikilinks_rewritten);
    println!(
        "  markdown links rewritten: {}",
        report.markdown_links_rewritten
    );
}
