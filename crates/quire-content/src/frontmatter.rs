//! Frontmatter extraction.

use serde::Serialize;

/// Line that opens and closes a frontmatter block.
const DELIMITER: &str = "---";

/// Metadata parsed from the leading `---` block of a docs page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Frontmatter {
    /// Page title
    pub title: String,

    /// Page description, shown under the title and in search results
    pub description: String,
}

/// Split a document into its frontmatter and the body that follows it.
///
/// A block is only recognised when the very first line is `---` and a later
/// line closes it with `---`. A `---` directly after the opening line does
/// not close the block, so `---\n---` alone is not frontmatter. Fields are read from `key: "value"` lines; any
/// field that is missing or not a double-quoted scalar comes back empty.
/// Without a complete leading block the body is the input unchanged.
pub fn extract_frontmatter(source: &str) -> (Frontmatter, &str) {
    let Some((block, body)) = split_block(source) else {
        return (Frontmatter::default(), source);
    };

    let frontmatter = Frontmatter {
        title: quoted_field(block, "title").unwrap_or_default().to_string(),
        description: quoted_field(block, "description")
            .unwrap_or_default()
            .to_string(),
    };

    (frontmatter, body)
}

/// Locate the frontmatter block, returning `(block, body)`.
fn split_block(source: &str) -> Option<(&str, &str)> {
    let mut lines = source.split_inclusive('\n');

    let opening = lines.next()?;
    if !is_delimiter(opening) {
        return None;
    }

    let block_start = opening.len();
    let mut offset = block_start;

    for line in lines {
        // The closing line needs at least one line break before it
        if is_delimiter(line) && offset > block_start {
            let block = &source[block_start..offset];
            let body = &source[offset + line.len()..];
            return Some((block, body));
        }
        offset += line.len();
    }

    // No closing delimiter
    None
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end_matches('\n').trim_end_matches('\r') == DELIMITER
}

/// Value of the first `key: "value"` line in the block.
fn quoted_field<'a>(block: &'a str, key: &str) -> Option<&'a str> {
    block.lines().find_map(|line| {
        let value = line
            .trim_start()
            .strip_prefix(key)?
            .strip_prefix(':')?
            .trim_start();
        let quoted = value.strip_prefix('"')?;
        let end = quoted.find('"')?;
        (end > 0).then(|| &quoted[..end])
    })
}
