use std::fmt::Write as _;

use crate::error::Error;
use crate::xml::MAX_DEPTH_LIMIT;

/// ANSI bold for headings on stderr.
pub const BOLD: &str = "\x1b[1m";
/// ANSI reset.
pub const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
    return;
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where the user can
/// act on it, how to fix it.
pub fn render_error(e: &Error) -> String {
    return match e {
        Error::EmptyQuery => render_empty_query(),
        Error::FileNotFound { path } => render_file_not_found(&path.display().to_string()),
        Error::InvalidTitleToken { token } => render_invalid_title(token),
        Error::LfsPlaceholder { file } => render_lfs_placeholder(file),
        Error::MetadataIncomplete { file } => render_metadata_incomplete(&file.display().to_string()),
        Error::TooDeep { file, max_depth } => render_too_deep(file, *max_depth),
        _ => render_generic(e),
    };
}

/// Variants with nothing to add beyond a heading and the message.
fn render_generic(e: &Error) -> String {
    let heading = match e {
        Error::InvalidConfig { .. } => "Invalid Config",
        Error::InvalidLink { .. } => "Invalid Link",
        Error::Io(_) => "I/O",
        Error::Json(_) => "Invalid Catalog JSON",
        Error::NoStructuralRoot { .. } => "No Structural Root",
        Error::TomlDe(_) => "Invalid TOML",
        Error::XmlMalformed { .. } => "Malformed XML",
        _ => return format!("# Error\n\n{e}\n"),
    };
    return format!("# Error: {heading}\n\n{e}\n");
}

fn render_empty_query() -> String {
    return "\
# Error: Empty Query

Enter a keyword to search.
"
    .to_string();
}

fn render_file_not_found(path: &str) -> String {
    return format!("\
# Error: File Not Found

`{path}` does not exist.

## Fix

Generate the catalog from the XML directory:

    uscnav catalog
");
}

fn render_invalid_title(token: &str) -> String {
    return format!("\
# Error: Invalid Title

`{token}` does not name a title number.

## Fix

List the available titles:

    uscnav titles
");
}

fn render_lfs_placeholder(file: &str) -> String {
    return format!("\
# Error: Content Not Available

`{file}` uses Git LFS storage and is not checked out.

## Fix

Fetch the file contents:

    git lfs pull --include \"{file}\"
");
}

fn render_metadata_incomplete(file: &str) -> String {
    return format!("\
# Error: Metadata Incomplete

Unable to extract the title number, label, and heading from `{file}`.
");
}

fn render_too_deep(file: &str, max_depth: usize) -> String {
    let mut out = format!("\
# Error: Document Too Deep

`{file}` nests elements deeper than {max_depth}.
");
    if max_depth < MAX_DEPTH_LIMIT {
        let suggested = max_depth.saturating_mul(2).min(MAX_DEPTH_LIMIT);
        let _ = write!(out, "\
\n## Fix

Raise the limit in `.uscnav.toml`:

    max_depth = {suggested}
");
    } else {
        let _ = writeln!(out, "\n{MAX_DEPTH_LIMIT} is the deepest nesting uscnav reads.");
    }
    return out;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_suggests_lfs_pull() {
        let md = render_error(&Error::LfsPlaceholder { file: "usc/usc42.xml".to_string() });
        assert!(md.starts_with("# Error: Content Not Available"));
        assert!(md.contains("git lfs pull --include \"usc/usc42.xml\""));
    }

    #[test]
    fn depth_suggestion_never_exceeds_ceiling() {
        let md = render_error(&Error::TooDeep { file: "usc05.xml".to_string(), max_depth: 512 });
        assert!(md.contains(&format!("max_depth = {MAX_DEPTH_LIMIT}")));

        let md = render_error(&Error::TooDeep { file: "usc05.xml".to_string(), max_depth: 200 });
        assert!(md.contains("max_depth = 400"));

        let md = render_error(&Error::TooDeep { file: "usc05.xml".to_string(), max_depth: MAX_DEPTH_LIMIT });
        assert!(!md.contains("## Fix"));
        assert!(md.contains("is the deepest nesting uscnav reads"));
    }

    #[test]
    fn generic_variants_keep_the_message() {
        let md = render_error(&Error::malformed("usc07.xml", "unexpected end"));
        assert!(md.starts_with("# Error: Malformed XML"));
        assert!(md.contains("malformed XML in usc07.xml: unexpected end"));
    }
}
