//! Assembles the text of one user turn: the question, an instructional
//! prefix from an optional template, the code selection, and labeled
//! sections for any extra context files.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::errors::TurnError;

/// Prefix used between question and code when no template is configured.
const DEFAULT_PREFIX: &str = "Detail:";

/// Optional prompt template, loaded from a JSON file once before the
/// first turn.
#[derive(Debug, Clone, Deserialize)]
pub struct PromptTemplate {
    /// Instructional text inserted between the user's question and the
    /// supplied code or file content.
    pub prefix: String,
}

impl PromptTemplate {
    pub fn load(path: &Path) -> Result<Self, TurnError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            TurnError::Configuration(format!(
                "Failed to read template file {}: {}",
                path.display(),
                e
            ))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            TurnError::Configuration(format!(
                "Invalid template file {}: {}",
                path.display(),
                e
            ))
        })
    }
}

/// A single context file that could not be read. Reported individually;
/// never aborts the other files or the turn.
#[derive(Error, Debug)]
#[error("Failed to read {}: {message}", path.display())]
pub struct FileReadError {
    pub path: PathBuf,
    pub message: String,
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Reads each path as text and formats it as a `File: <name>` section.
/// Failures are collected alongside the successes.
pub fn read_file_sections(paths: &[PathBuf]) -> (Vec<String>, Vec<FileReadError>) {
    let mut sections = Vec::new();
    let mut errors = Vec::new();

    for path in paths {
        match fs::read_to_string(path) {
            Ok(content) => {
                sections.push(format!("File: {}\n{}", file_label(path), content));
            }
            Err(e) => errors.push(FileReadError {
                path: path.clone(),
                message: e.to_string(),
            }),
        }
    }

    (sections, errors)
}

/// Builds the content of one user message.
pub fn build_user_content(
    question: &str,
    template: Option<&PromptTemplate>,
    code: Option<&str>,
    file_sections: &[String],
) -> String {
    let prefix = template.map_or(DEFAULT_PREFIX, |t| t.prefix.as_str());

    let mut content = question.to_string();
    if let Some(code) = code {
        content.push_str(&format!("\n\n{}\n\n{}", prefix, code));
    }
    for section in file_sections {
        content.push_str(&format!("\n\n{}", section));
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_bare_question() {
        let content = build_user_content("Explain this", None, None, &[]);
        assert_eq!(content, "Explain this");
    }

    #[test]
    fn test_question_with_code_uses_default_prefix() {
        let content = build_user_content("Explain this", None, Some("fn main() {}"), &[]);
        assert_eq!(content, "Explain this\n\nDetail:\n\nfn main() {}");
    }

    #[test]
    fn test_template_prefix_replaces_default() {
        let template = PromptTemplate {
            prefix: "Consider the following code:".to_string(),
        };
        let content = build_user_content("Why?", Some(&template), Some("x = 1"), &[]);
        assert_eq!(content, "Why?\n\nConsider the following code:\n\nx = 1");
    }

    #[test]
    fn test_file_sections_appended_in_order() {
        let sections = vec![
            "File: a.rs\nfn a() {}".to_string(),
            "File: b.rs\nfn b() {}".to_string(),
        ];
        let content = build_user_content("Q", None, None, &sections);
        assert_eq!(content, "Q\n\nFile: a.rs\nfn a() {}\n\nFile: b.rs\nfn b() {}");
    }

    #[test]
    fn test_read_file_sections_labels_by_file_name() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "hello").unwrap();

        let (sections, errors) = read_file_sections(&[file.path().to_path_buf()]);
        assert!(errors.is_empty());
        assert_eq!(sections.len(), 1);
        let expected_label = format!("File: {}", file_label(file.path()));
        assert!(sections[0].starts_with(&expected_label));
        assert!(sections[0].ends_with("hello\n"));
    }

    #[test]
    fn test_one_bad_file_does_not_abort_the_rest() {
        let mut good = NamedTempFile::new().unwrap();
        write!(good, "content").unwrap();

        let paths = vec![
            PathBuf::from("/definitely/not/a/real/path.txt"),
            good.path().to_path_buf(),
        ];
        let (sections, errors) = read_file_sections(&paths);
        assert_eq!(sections.len(), 1);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, PathBuf::from("/definitely/not/a/real/path.txt"));
    }

    #[test]
    fn test_template_load_missing_file_is_configuration_error() {
        let result = PromptTemplate::load(Path::new("/no/such/template.json"));
        assert!(matches!(result, Err(TurnError::Configuration(_))));
    }

    #[test]
    fn test_template_load_invalid_json_is_configuration_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let result = PromptTemplate::load(file.path());
        assert!(matches!(result, Err(TurnError::Configuration(_))));
    }

    #[test]
    fn test_template_load_parses_prefix() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{\"prefix\": \"Look at this:\"}}").unwrap();
        let template = PromptTemplate::load(file.path()).unwrap();
        assert_eq!(template.prefix, "Look at this:");
    }
}
