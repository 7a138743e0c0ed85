mod common;

use std::sync::Arc;

use common::{pipeline_with, ScriptedProvider};
use pricematch::{
    CollectingWriter, InquiryItem, JsonReportFile, NoProgress, PipelineError, ReconciledMatch,
    ReconciliationWriter, ReferenceItem, ReportError, SemanticError,
};

fn one_reference() -> Vec<ReferenceItem> {
    vec![ReferenceItem::new("steel rebar 12mm", 500.0)]
}

fn one_inquiry() -> Vec<InquiryItem> {
    vec![InquiryItem::new("rebar", "row-1")]
}

#[tokio::test]
async fn empty_pricelist_rejected_before_any_provider_call() {
    let provider = Arc::new(ScriptedProvider::default());
    let pipeline = pipeline_with(provider.clone(), 96, 1);
    let mut writer = CollectingWriter::new();

    let err = pipeline
        .run(Vec::new(), one_inquiry(), &mut writer, &NoProgress)
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::EmptyReferences));
    assert!(err.is_validation());
    assert_eq!(provider.call_count(), 0);
    assert!(writer.matches().is_empty());
}

#[tokio::test]
async fn empty_inquiry_rejected_before_any_provider_call() {
    let provider = Arc::new(ScriptedProvider::default());
    let pipeline = pipeline_with(provider.clone(), 96, 1);

    let err = pipeline
        .reconcile(one_reference(), Vec::new(), &NoProgress)
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::EmptyInquiries));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn provider_failure_on_second_batch_reports_its_range() {
    let provider = Arc::new(ScriptedProvider {
        fail_on_call: Some(1),
        ..Default::default()
    });
    let pipeline = pipeline_with(provider.clone(), 96, 1);
    let references: Vec<ReferenceItem> = (0..97)
        .map(|i| ReferenceItem::new(format!("item {i}"), 10.0 + i as f64))
        .collect();
    let mut writer = CollectingWriter::new();

    let err = pipeline
        .run(references, one_inquiry(), &mut writer, &NoProgress)
        .await
        .unwrap_err();

    match err {
        PipelineError::Embedding(SemanticError::Provider {
            batch_index,
            start,
            end,
            ref source,
        }) => {
            assert_eq!(batch_index, 1);
            assert_eq!((start, end), (96, 97));
            assert!(source.is_transient());
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // No query batch after the failed document batch, and nothing written.
    assert_eq!(provider.call_count(), 2);
    assert!(writer.matches().is_empty());
}

#[tokio::test]
async fn short_provider_response_is_a_count_mismatch() {
    let provider = Arc::new(ScriptedProvider {
        drop_last: true,
        ..Default::default()
    });
    let pipeline = pipeline_with(provider, 96, 1);

    let err = pipeline
        .reconcile(one_reference(), one_inquiry(), &NoProgress)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Embedding(SemanticError::CountMismatch {
            batch_index: 0,
            expected: 1,
            actual: 0
        })
    ));
    assert!(!err.is_validation());
}

struct FailingWriter;

impl ReconciliationWriter for FailingWriter {
    fn write(&mut self, _matches: &[ReconciledMatch]) -> Result<(), ReportError> {
        Err(ReportError::Io(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "report sink closed",
        )))
    }
}

#[tokio::test]
async fn writer_failure_surfaces_as_report_error() {
    let pipeline = pipeline_with(Arc::new(ScriptedProvider::default()), 96, 1);

    let err = pipeline
        .run(one_reference(), one_inquiry(), &mut FailingWriter, &NoProgress)
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Report(_)));
    assert!(err.to_string().contains("report sink closed"));
}

#[test]
fn invalid_top_k_rejected_when_building_pipeline() {
    let pipeline = pipeline_with(Arc::new(ScriptedProvider::default()), 96, 1);
    let err = pipeline
        .with_matcher(pricematch::MatcherConfig { top_k: 0 })
        .unwrap_err();
    assert!(matches!(err, PipelineError::Match(_)));
}

#[tokio::test]
async fn failed_run_does_not_create_report_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    let provider = Arc::new(ScriptedProvider {
        drop_last: true,
        ..Default::default()
    });
    let pipeline = pipeline_with(provider, 96, 1);
    let mut writer = JsonReportFile::new(&path);

    let err = pipeline
        .run(one_reference(), one_inquiry(), &mut writer, &NoProgress)
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Embedding(_)));
    assert!(!path.exists());
}

#[tokio::test]
async fn failed_run_keeps_previous_report() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    std::fs::write(&path, "[]\n").unwrap();
    let provider = Arc::new(ScriptedProvider {
        drop_last: true,
        ..Default::default()
    });
    let pipeline = pipeline_with(provider, 96, 1);
    let mut writer = JsonReportFile::new(&path);

    assert!(pipeline
        .run(one_reference(), one_inquiry(), &mut writer, &NoProgress)
        .await
        .is_err());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]\n");
}
