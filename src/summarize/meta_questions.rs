use crate::llm::{GenerationParams, LLMClient};
use crate::types::Result;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const DEFAULT_INPUT_DIR: &str = "docs/neo4j_graph";
pub const DEFAULT_OUTPUT: &str = "doc/meta_questions.md";

/// Characters of each document sent to the model
pub const MAX_DOCUMENT_CHARS: usize = 8000;

pub const EMPTY_DOCUMENT: &str = "- Document is empty.";
pub const NO_QUESTIONS: &str = "- No specific questions could be generated.";
pub const GENERATION_FAILED: &str = "- Error generating questions for this document.";

const SYSTEM_PROMPT: &str =
    "You are an assistant skilled at summarizing document content into high-level questions.";

/// Low temperature and a short completion keep the lists focused
pub fn generation_params() -> GenerationParams {
    GenerationParams::default()
        .with_temperature(0.2)
        .with_max_tokens(150)
}

pub fn build_prompt(filename: &str, content: &str) -> String {
    let excerpt: String = content.chars().take(MAX_DOCUMENT_CHARS).collect();
    format!(
        "Read the following document content from the file '{filename}'.\n\
         Based *only* on the information present in this document, generate a concise list of 3-5 high-level questions that this document aims to answer or address.\n\
         Phrase the questions clearly and focus on the main topics or themes discussed.\n\
         Do not ask questions about information not present in the text.\n\
         Format the output as a bulleted list.\n\n\
         Document Content:\n---\n{excerpt}\n---\n\n\
         Meta-Questions:\n"
    )
}

/// Make sure the model output is a bulleted list
pub fn normalize_bullets(raw: &str) -> String {
    let text = raw.trim();
    if text.starts_with('*') || text.starts_with('-') {
        return text.to_string();
    }

    let bulleted: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| format!("- {}", l))
        .collect();

    if bulleted.is_empty() {
        NO_QUESTIONS.to_string()
    } else {
        bulleted.join("\n")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SummaryReport {
    pub files_found: usize,
    pub processed: usize,
    /// `None` when nothing was written
    pub output: Option<PathBuf>,
}

pub struct MetaQuestionGenerator {
    llm: Arc<dyn LLMClient>,
}

impl MetaQuestionGenerator {
    /// `llm` should be created with [`generation_params`]
    pub fn new(llm: Arc<dyn LLMClient>) -> Self {
        Self { llm }
    }

    /// Questions for one document. Never fails: errors become a placeholder bullet.
    pub async fn questions_for(&self, filename: &str, content: &str) -> String {
        if content.trim().is_empty() {
            tracing::warn!("File {} is empty. Skipping.", filename);
            return EMPTY_DOCUMENT.to_string();
        }

        match self
            .llm
            .generate_with_system(SYSTEM_PROMPT, &build_prompt(filename, content))
            .await
        {
            Ok(raw) => normalize_bullets(&raw),
            Err(e) => {
                tracing::error!("Error while processing {}: {}", filename, e);
                GENERATION_FAILED.to_string()
            }
        }
    }

    /// Write meta-questions for every `*.md` file in `input_dir` to `output`,
    /// appending one section per file as it completes.
    pub async fn run(&self, input_dir: &Path, output: &Path) -> Result<SummaryReport> {
        if !input_dir.is_dir() {
            tracing::error!("Input directory not found: {}", input_dir.display());
            return Ok(SummaryReport::default());
        }

        let files = markdown_files(input_dir)?;
        if files.is_empty() {
            tracing::warn!("No markdown files found in {}", input_dir.display());
            return Ok(SummaryReport::default());
        }
        tracing::info!("Found {} markdown files in {}.", files.len(), input_dir.display());

        if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(
            output,
            format!("# Meta-Questions from Documents in {}\n\n", input_dir.display()),
        )?;

        let total = files.len();
        let mut processed = 0;
        for path in &files {
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            tracing::info!("Processing file: {} ({}/{})", filename, processed + 1, total);

            let content = match std::fs::read_to_string(path) {
                Ok(content) => content,
                Err(e) => {
                    tracing::error!("Failed to process file {}: {}", filename, e);
                    continue;
                }
            };

            let questions = self.questions_for(&filename, &content).await;
            let mut file = std::fs::OpenOptions::new().append(true).open(output)?;
            write!(file, "## {}\n\n{}\n\n---\n\n", filename, questions)?;

            processed += 1;
            tracing::info!("Finished processing {}. Questions added to {}", filename, output.display());
        }

        tracing::info!("Processing complete. Meta-questions saved to {}", output.display());
        Ok(SummaryReport {
            files_found: total,
            processed,
            output: Some(output.to_path_buf()),
        })
    }
}

/// `*.md` files directly inside `dir`, sorted by name
fn markdown_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "md"))
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("- What?\n- Why?", "- What?\n- Why?")]
    #[case("  * Starred", "* Starred")]
    #[case("What?\n\n  Why?  ", "- What?\n- Why?")]
    #[case("   ", NO_QUESTIONS)]
    fn test_normalize_bullets(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_bullets(raw), expected);
    }

    #[test]
    fn test_prompt_truncates_document() {
        let content = "é".repeat(MAX_DOCUMENT_CHARS + 10);
        let prompt = build_prompt("a.md", &content);
        assert!(prompt.contains("from the file 'a.md'"));
        assert_eq!(prompt.matches('é').count(), MAX_DOCUMENT_CHARS);
        assert!(prompt.ends_with("Meta-Questions:\n"));
    }

    #[test]
    fn test_generation_params() {
        let params = generation_params();
        assert_eq!(params.temperature, Some(0.2));
        assert_eq!(params.max_tokens, Some(150));
    }

    #[test]
    fn test_markdown_files_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.md", "a.md", "notes.txt"] {
            std::fs::write(dir.path().join(name), "x").unwrap();
        }
        std::fs::create_dir(dir.path().join("sub.md")).unwrap();

        let files = markdown_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.md", "b.md"]);
    }
}
