//! Internal link normalization.

/// Start of a root-relative Markdown link target.
const LINK_OPEN: &str = "](/";

/// Path prefix the docs are mounted under, without the leading slash.
pub const DOCS_PREFIX: &str = "docs/";

/// Rewrite root-relative links so they resolve under the docs mount.
///
/// `](/getting-started)` becomes `](/docs/getting-started)`. Targets that
/// already start with `/docs/` and absolute URLs are left alone. A link target
/// runs up to the first `)`; skipped and rewritten links are both consumed as
/// a whole, which keeps the rewrite idempotent.
pub fn normalize_links(source: &str) -> String {
    let mut output = String::with_capacity(source.len());
    let mut cursor = 0;

    while let Some(found) = source[cursor..].find(LINK_OPEN) {
        let path_start = cursor + found + LINK_OPEN.len();
        let Some(path_len) = source[path_start..].find(')') else {
            break;
        };
        let path_end = path_start + path_len;
        let path = &source[path_start..path_end];

        output.push_str(&source[cursor..path_start]);
        if !path.starts_with(DOCS_PREFIX) {
            output.push_str(DOCS_PREFIX);
        }
        output.push_str(path);
        output.push(')');

        cursor = path_end + 1;
    }

    output.push_str(&source[cursor..]);
    output
}
