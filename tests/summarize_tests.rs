//! Meta-question report generation over a temporary document directory.

mod common;

use agentlab::summarize::meta_questions::{EMPTY_DOCUMENT, GENERATION_FAILED};
use agentlab::summarize::MetaQuestionGenerator;
use common::mocks::MockLLMClient;

#[tokio::test]
async fn test_report_has_one_section_per_document() {
    let docs = tempfile::tempdir().unwrap();
    std::fs::write(docs.path().join("b_graph.md"), "Neo4j stores nodes and relationships.").unwrap();
    std::fs::write(docs.path().join("a_empty.md"), "   \n").unwrap();
    std::fs::write(docs.path().join("skip.txt"), "not markdown").unwrap();

    let llm = MockLLMClient::new("What is a node?\nHow are relationships stored?").into_arc();
    let out = tempfile::tempdir().unwrap();
    let report_path = out.path().join("nested").join("meta_questions.md");

    let report = MetaQuestionGenerator::new(llm.clone())
        .run(docs.path(), &report_path)
        .await
        .unwrap();

    assert_eq!(report.files_found, 2);
    assert_eq!(report.processed, 2);
    assert_eq!(report.output.as_deref(), Some(report_path.as_path()));
    // the empty document is not sent to the model
    assert_eq!(llm.call_count(), 1);

    let text = std::fs::read_to_string(&report_path).unwrap();
    let expected = format!(
        "# Meta-Questions from Documents in {}\n\n\
         ## a_empty.md\n\n{}\n\n---\n\n\
         ## b_graph.md\n\n- What is a node?\n- How are relationships stored?\n\n---\n\n",
        docs.path().display(),
        EMPTY_DOCUMENT
    );
    assert_eq!(text, expected);

    let call = &llm.calls()[0];
    assert!(call.system().unwrap().contains("summarizing document content"));
    assert!(call
        .first_user()
        .unwrap()
        .contains("from the file 'b_graph.md'"));
}

#[tokio::test]
async fn test_model_errors_become_placeholder() {
    let docs = tempfile::tempdir().unwrap();
    std::fs::write(docs.path().join("doc.md"), "content").unwrap();
    let report_path = docs.path().join("out.md");

    let report = MetaQuestionGenerator::new(MockLLMClient::failing().into_arc())
        .run(docs.path(), &report_path)
        .await
        .unwrap();

    assert_eq!(report.processed, 1);
    let text = std::fs::read_to_string(&report_path).unwrap();
    assert!(text.contains(&format!("## doc.md\n\n{}\n\n---\n\n", GENERATION_FAILED)));
}

#[tokio::test]
async fn test_missing_directory_writes_nothing() {
    let out = tempfile::tempdir().unwrap();
    let report_path = out.path().join("meta.md");

    let report = MetaQuestionGenerator::new(MockLLMClient::new("x").into_arc())
        .run(&out.path().join("does-not-exist"), &report_path)
        .await
        .unwrap();

    assert!(report.output.is_none());
    assert!(!report_path.exists());
}

#[tokio::test]
async fn test_directory_without_markdown_writes_nothing() {
    let docs = tempfile::tempdir().unwrap();
    std::fs::write(docs.path().join("notes.txt"), "plain").unwrap();
    let report_path = docs.path().join("meta.md");

    let report = MetaQuestionGenerator::new(MockLLMClient::new("x").into_arc())
        .run(docs.path(), &report_path)
        .await
        .unwrap();

    assert_eq!(report.files_found, 0);
    assert!(!report_path.exists());
}
