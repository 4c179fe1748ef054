//! Line-list and template readers.
//!
//! List files hold one item per line. Lines are trimmed and blank lines are
//! dropped; order and duplicates are preserved.

use std::path::Path;

use crate::error::{io_err, InputError};
use crate::types::Template;

/// Parse newline-separated items, skipping blank lines.
pub fn parse_lines<T: From<String>>(text: &str) -> Vec<T> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| T::from(line.to_owned()))
        .collect()
}

/// Read a list file at `path`.
pub fn read_list_at<T: From<String>>(path: &Path) -> Result<Vec<T>, InputError> {
    let text = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    Ok(parse_lines(&text))
}

/// Read the template at `path`.
///
/// A missing file and a zero-length file are both errors; whitespace-only
/// content is a valid (if unusual) template.
pub fn read_template_at(path: &Path) -> Result<Template, InputError> {
    let text = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    if text.is_empty() {
        return Err(InputError::Empty {
            what: "template",
            path: path.to_path_buf(),
        });
    }
    Ok(Template::from(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AttributeName, EntityId};
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case("page1\npage2\n", &["page1", "page2"])]
    #[case("page1\n\n\npage2", &["page1", "page2"])]
    #[case("page1\r\npage2\r\n", &["page1", "page2"])]
    #[case("  page1  \n   \n", &["page1"])]
    #[case("", &[])]
    #[case("a\na\n", &["a", "a"])]
    fn parse_lines_cases(#[case] text: &str, #[case] expected: &[&str]) {
        let ids: Vec<EntityId> = parse_lines(text);
        let expected: Vec<EntityId> = expected.iter().map(|s| EntityId::from(*s)).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn read_list_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let err = read_list_at::<AttributeName>(&tmp.path().join("props.txt")).unwrap_err();
        assert!(matches!(err, InputError::Io { .. }));
    }

    #[test]
    fn read_list_preserves_order() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("props.txt");
        std::fs::write(&path, "title\nbody\nfooter\n").unwrap();
        let props: Vec<AttributeName> = read_list_at(&path).unwrap();
        let names: Vec<&str> = props.iter().map(AttributeName::as_str).collect();
        assert_eq!(names, ["title", "body", "footer"]);
    }

    #[test]
    fn empty_template_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("template.txt");
        std::fs::write(&path, "").unwrap();
        let err = read_template_at(&path).unwrap_err();
        assert!(matches!(err, InputError::Empty { what: "template", .. }));
    }

    #[test]
    fn template_read_verbatim() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("template.txt");
        std::fs::write(&path, "<h1>{title}</h1>\n").unwrap();
        let template = read_template_at(&path).unwrap();
        assert_eq!(template.as_str(), "<h1>{title}</h1>\n");
    }
}
