mod common;

use std::sync::Arc;

use common::{pipeline_with, ScriptedProvider};
use pricematch::{normalize, InquiryItem, NoProgress, ReferenceItem};

fn references() -> Vec<ReferenceItem> {
    [
        ("Steel Rebar 12mm", 500.0),
        ("Steel Rebar 16MM.", 520.0),
        ("Cement OPC 53 Grade", 350.0),
        ("R.C.C. M25 slab", 7200.0),
        ("PVC pipe 110mm dia", 180.0),
    ]
    .into_iter()
    .map(|(desc, rate)| ReferenceItem::new(desc, rate))
    .collect()
}

fn inquiries() -> Vec<InquiryItem> {
    [
        "reinforced cement concrete M25 slab",
        "rebar 16 mm",
        "PVC pipe 110MM. dia",
        "opc cement",
    ]
    .into_iter()
    .enumerate()
    .map(|(i, desc)| InquiryItem::new(desc, format!("row-{}", i + 1)))
    .collect()
}

#[tokio::test]
async fn repeated_runs_produce_identical_matches() {
    let pipeline = pipeline_with(Arc::new(ScriptedProvider::default()), 2, 2);

    let (first, _) = pipeline
        .reconcile(references(), inquiries(), &NoProgress)
        .await
        .expect("first run");
    for _ in 0..5 {
        let (again, _) = pipeline
            .reconcile(references(), inquiries(), &NoProgress)
            .await
            .expect("repeat run");
        assert_eq!(again, first);
    }
}

#[tokio::test]
async fn batch_size_does_not_change_results() {
    let (baseline, _) = pipeline_with(Arc::new(ScriptedProvider::default()), 96, 1)
        .reconcile(references(), inquiries(), &NoProgress)
        .await
        .unwrap();

    for batch in [1, 2, 3, 4] {
        let (matches, _) = pipeline_with(Arc::new(ScriptedProvider::default()), batch, 1)
            .reconcile(references(), inquiries(), &NoProgress)
            .await
            .unwrap();
        assert_eq!(matches, baseline, "batch size {batch} diverged");
    }
}

#[tokio::test]
async fn rcc_spellings_meet_after_normalization() {
    let pipeline = pipeline_with(Arc::new(ScriptedProvider::default()), 96, 1);
    let (matches, _) = pipeline
        .reconcile(references(), inquiries(), &NoProgress)
        .await
        .unwrap();

    assert_eq!(matches[0].reference_index, 3);
    assert_eq!(matches[0].matched_description, "rcc m25 slab");
    assert!((matches[0].score - 1.0).abs() < 1e-5);
    assert_eq!(matches[2].reference_index, 4);
}

#[test]
fn normalization_is_idempotent_over_loader_samples() {
    for item in references() {
        let once = normalize(&item.description);
        assert_eq!(normalize(&once), once);
    }
    for item in inquiries() {
        let once = normalize(&item.raw_description);
        assert_eq!(normalize(&once), once);
    }
}
