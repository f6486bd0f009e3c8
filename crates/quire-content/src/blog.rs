//! Blog posts and paragraph-level block segmentation.
//!
//! Blog content is stored as flat text where blocks are separated by a blank
//! line. Each block is classified on its own by its leading characters; there
//! is no state carried from one block to the next.
//!
//! A code fence has to open and close inside one block. Code that contains a
//! blank line is split into several blocks and comes out mangled.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::Split;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Separator between blocks of a post body.
const BLOCK_SEPARATOR: &str = "\n\n";

/// Opening of a fenced code block.
const FENCE: &str = "```";

/// Marker that makes a list ordered when it starts the block.
const ORDERED_MARKER: &str = "1. ";

/// Marker of an unordered list.
const BULLET_MARKER: &str = "- ";

/// A single blog post from the posts dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    /// URL slug, unique across posts
    #[serde(default)]
    pub slug: String,

    /// Post title
    pub title: String,

    /// Short summary shown in listings and under the title
    #[serde(default)]
    pub excerpt: String,

    /// Publication date, as written by the author
    #[serde(default)]
    pub date: String,

    /// Reading time label, e.g. "5 min read"
    #[serde(default)]
    pub read_time: String,

    /// Category label
    #[serde(default)]
    pub category: String,

    /// Post body
    pub content: String,
}

impl BlogPost {
    /// Segment the post body into content blocks.
    ///
    /// Every call starts a fresh pass over the content.
    pub fn blocks(&self) -> Blocks<'_> {
        segment(&self.content)
    }
}

/// One classified block of a blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentBlock<'a> {
    /// `## ` heading
    Heading2 { text: &'a str },

    /// `### ` heading
    Heading3 { text: &'a str },

    /// Fenced code, without the fence lines
    CodeBlock { code: &'a str },

    /// Ordered or bullet list, one item per line
    List { ordered: bool, items: Vec<&'a str> },

    /// Anything else, verbatim
    Paragraph { text: &'a str },
}

/// Lazy iterator over the blocks of a post body.
#[derive(Debug, Clone)]
pub struct Blocks<'a> {
    paragraphs: Split<'a, &'static str>,
}

impl<'a> Iterator for Blocks<'a> {
    type Item = ContentBlock<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.paragraphs.next().map(classify)
    }
}

/// Split a post body on blank lines and classify each block.
pub fn segment(content: &str) -> Blocks<'_> {
    Blocks {
        paragraphs: content.split(BLOCK_SEPARATOR),
    }
}

/// Classify a block by its leading characters.
fn classify(paragraph: &str) -> ContentBlock<'_> {
    if let Some(text) = paragraph.strip_prefix("## ") {
        return ContentBlock::Heading2 { text };
    }

    if let Some(text) = paragraph.strip_prefix("### ") {
        return ContentBlock::Heading3 { text };
    }

    if paragraph.starts_with(FENCE) {
        return ContentBlock::CodeBlock {
            code: fenced_code(paragraph),
        };
    }

    if paragraph.starts_with(ORDERED_MARKER) || paragraph.starts_with(BULLET_MARKER) {
        // Every line is an item, whatever marker it has
        return ContentBlock::List {
            ordered: paragraph.starts_with(ORDERED_MARKER),
            items: paragraph.split('\n').map(strip_list_marker).collect(),
        };
    }

    ContentBlock::Paragraph { text: paragraph }
}

/// Lines strictly between the first and the last line of the block.
fn fenced_code(paragraph: &str) -> &str {
    match (paragraph.find('\n'), paragraph.rfind('\n')) {
        (Some(first), Some(last)) if first < last => &paragraph[first + 1..last],
        _ => "",
    }
}

fn strip_list_marker(item: &str) -> &str {
    static MARKER_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^([0-9]+\.\s|-\s)").expect("Invalid list marker regex"));

    MARKER_RE.find(item).map_or(item, |m| &item[m.end()..])
}

/// Errors that can occur when loading the posts dataset.
#[derive(Debug, thiserror::Error)]
pub enum BlogError {
    #[error("Failed to read posts from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid posts dataset: {0}")]
    Parse(#[from] serde_json::Error),
}

/// All blog posts, keyed by slug, in dataset order.
#[derive(Debug, Clone, Default)]
pub struct BlogStore {
    posts: Vec<BlogPost>,
    by_slug: HashMap<String, usize>,
}

impl BlogStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the posts dataset from a JSON file.
    pub fn load(path: &Path) -> Result<Self, BlogError> {
        let json = fs::read_to_string(path).map_err(|source| BlogError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let store = Self::from_json(&json)?;
        tracing::debug!("Loaded {} blog posts from {}", store.len(), path.display());

        Ok(store)
    }

    /// Parse a JSON object mapping slugs to posts.
    pub fn from_json(json: &str) -> Result<Self, BlogError> {
        let records: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;

        let mut store = Self::new();
        for (slug, value) in records {
            let mut post: BlogPost = serde_json::from_value(value)?;
            if post.slug != slug {
                if !post.slug.is_empty() {
                    tracing::warn!(
                        "Blog post keyed '{}' declares slug '{}', using the key",
                        slug,
                        post.slug
                    );
                }
                post.slug = slug;
            }
            store.insert(post);
        }

        Ok(store)
    }

    /// Add a post, replacing any post with the same slug.
    pub fn insert(&mut self, post: BlogPost) {
        match self.by_slug.get(&post.slug) {
            Some(&index) => self.posts[index] = post,
            None => {
                self.by_slug.insert(post.slug.clone(), self.posts.len());
                self.posts.push(post);
            }
        }
    }

    /// Look up a post by slug.
    pub fn get(&self, slug: &str) -> Option<&BlogPost> {
        self.by_slug.get(slug).map(|&index| &self.posts[index])
    }

    /// All posts in dataset order.
    pub fn posts(&self) -> &[BlogPost] {
        &self.posts
    }

    /// All slugs in dataset order.
    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.posts.iter().map(|post| post.slug.as_str())
    }

    /// Number of posts.
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Whether the store has no posts.
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}
