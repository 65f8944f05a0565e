mod backlinks;
mod config;
mod error;
mod links;
pub mod mask;
pub mod parse;
mod refactor;
mod resolve;
pub mod rewrite;
mod vault;

pub use crate::backlinks::UnresolvedLink;
pub use crate::config::{CONFIG_FILE_NAME, VaultConfig};
pub use crate::error::{Error, Result};
pub use crate::links::{LinkLocation, LinkTarget, MarkdownLink, Rewritten, Subpath, WikiLink};
pub use crate::mask::{MaskPass, MaskPipeline};
pub use crate::parse::{Tag, extract_tags, extract_wikilinks};
pub use crate::refactor::MoveReport;
pub use crate::resolve::{NoteResolver, ResolvedNote, ResolvedVia};
pub use crate::rewrite::{rewrite_markdown_links, rewrite_note_links, rewrite_title_links};
pub use crate::vault::{Vault, VaultPath};
