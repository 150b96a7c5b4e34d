//! End-to-end playthroughs: rules crate and narrative layer together.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use narrative_core::{
    spawn_intel, spawn_summary, EnrichmentLookup, NarrativeBackend, NarrativeError,
    NarrativeService, TemplateBackend, UnavailableBackend, STATIC_INTEL_FALLBACK,
    STATIC_SUMMARY_FALLBACK,
};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use threat_deck::{
    BacklogItem, Card, Catalog, GameConfig, Phase, SessionController, EMPTY_LEDGER_SUMMARY,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn controller(config: &GameConfig) -> SessionController {
    let catalog = Arc::new(Catalog::builtin().expect("builtin catalog"));
    SessionController::with_rng(catalog, config.session.clone(), StdRng::seed_from_u64(42))
}

/// Backend that answers slowly, so a reset can overtake it.
struct Slow;

#[async_trait]
impl NarrativeBackend for Slow {
    async fn summarize(&self, _ledger: &[BacklogItem]) -> narrative_core::Result<String> {
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok("late summary".to_string())
    }

    async fn elaborate(&self, _card: &Card) -> narrative_core::Result<String> {
        tokio::time::sleep(Duration::from_millis(50)).await;
        Err(NarrativeError::Backend("timed out".to_string()))
    }
}

#[tokio::test]
async fn test_failing_backend_keeps_summary_phase() {
    init_tracing();
    let config = GameConfig::default();
    let mut controller = controller(&config);
    let service = Arc::new(NarrativeService::new(
        Arc::new(UnavailableBackend),
        config.narrative.clone(),
    ));

    let ticket = controller.start_deck("deck-api").unwrap();
    let mut accepted = 0;
    while let Some(card) = controller.current_card().cloned() {
        let intel = spawn_intel(service.clone(), ticket, card).join().await;
        assert_eq!(intel.text, STATIC_INTEL_FALLBACK);

        if accepted % 2 == 0 {
            controller.accept_top();
        } else {
            controller.dismiss_top();
        }
        accepted += 1;
    }
    assert_eq!(controller.phase(), Phase::Summary);

    let request = controller.summary_request().unwrap();
    assert!(controller.summary_request().is_none());
    assert_eq!(request.ledger.len(), controller.ledger().len());

    let delivery = spawn_summary(service, request).join().await;
    assert!(delivery.apply_to(&mut controller));

    assert_eq!(controller.phase(), Phase::Summary);
    assert_eq!(controller.summary(), Some(STATIC_SUMMARY_FALLBACK));

    let report = controller.report().unwrap();
    assert!(report.to_text().contains(STATIC_SUMMARY_FALLBACK));
}

#[tokio::test]
async fn test_reset_discards_in_flight_summary() {
    init_tracing();
    let config = GameConfig::default();
    let mut controller = controller(&config);
    let service = Arc::new(NarrativeService::new(Arc::new(Slow), config.narrative.clone()));

    controller.start_deck("deck-infra").unwrap();
    while controller.accept_top().is_some() {}
    let task = spawn_summary(service, controller.summary_request().unwrap());

    controller.reset();
    let new_ticket = controller.start_deck("deck-vault").unwrap();

    let delivery = task.join().await;
    assert_eq!(delivery.text, "late summary");
    assert!(!delivery.is_current(&controller));
    assert!(!delivery.apply_to(&mut controller));

    assert!(controller.is_current(&new_ticket));
    assert_eq!(controller.summary(), None);
    assert_eq!(controller.phase(), Phase::Playing);
}

#[tokio::test]
async fn test_empty_ledger_needs_no_narrative() {
    init_tracing();
    let mut controller = controller(&GameConfig::default());

    controller.start_deck("deck-vault").unwrap();
    while controller.dismiss_top().is_some() {}

    assert_eq!(controller.phase(), Phase::Summary);
    assert!(controller.summary_request().is_none());
    assert_eq!(controller.summary(), Some(EMPTY_LEDGER_SUMMARY));
}

#[tokio::test]
async fn test_template_backend_with_enrichment() {
    init_tracing();
    let config = GameConfig::parse(
        r#"
        [narrative]
        fallback = "digest"
        image_dir = "cards"
        "#,
    )
    .unwrap();
    let enrichment = Arc::new(
        EnrichmentLookup::from_json_str(
            r#"{"security_details": {"vault-01": {
                "name": "Exposed Secrets",
                "how_to_identify": ["Scan repositories for keys"]
            }}}"#,
        )
        .unwrap(),
    );
    let service = Arc::new(NarrativeService::new(
        Arc::new(TemplateBackend::new(enrichment)),
        config.narrative.clone(),
    ));
    let mut controller = controller(&config);

    let ticket = controller.start_deck("deck-vault").unwrap();
    let card = controller.current_card().cloned().unwrap();
    assert_eq!(service.illustrate(card.code()), "cards/VAULT-01.png");

    let intel = spawn_intel(service.clone(), ticket, card.clone()).join().await;
    assert!(intel.text.contains("How to identify:\n- Scan repositories for keys"));
    assert_eq!(
        service.cached_intel(card.code()).await.as_deref(),
        Some(intel.text.as_str())
    );

    controller.accept_top();
    let delivery = spawn_summary(service, controller.summary_request().unwrap())
        .join()
        .await;
    assert!(delivery.text.starts_with("Highest priority:"));
    assert!(delivery.apply_to(&mut controller));
}
