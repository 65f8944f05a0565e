pub mod frontmatter;
pub mod markdown_links;
pub mod tags;
pub mod wikilinks;

pub use frontmatter::{Frontmatter, frontmatter_aliases, split_frontmatter};
pub use markdown_links::parse_markdown_links;
pub use tags::{Tag, extract_tags, parse_tags};
pub use wikilinks::{extract_wikilinks, parse_wikilinks};
