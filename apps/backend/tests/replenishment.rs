//! Background replenishment tests, driven through the quiz service.

mod common;

use pretty_assertions::assert_eq;

use common::fixtures;
use common::{wait_for_snapshot, wait_until, ScriptedGenerator, Step, TestContext};
use prepoflex_backend::models::SessionStatus;
use prepoflex_core::{fallback_cards, DegradedReason, SupplyError};

/// Test the initial load runs once per session.
#[tokio::test]
async fn test_initial_load_only_once() {
    let ctx = TestContext::loaded(vec![Step::Cards(fixtures::batch("gen", 5))]).await;

    let second = ctx.quiz.load_initial().await;
    assert_eq!(second, Err(SupplyError::AlreadyLoaded));
    assert_eq!(ctx.generator.calls(), 1);
}

/// Test an empty first batch yields exactly the fallback deck.
#[tokio::test]
async fn test_empty_initial_batch_uses_fallback() {
    let ctx = TestContext::new(ScriptedGenerator::new(vec![Step::Cards(Vec::new())]));

    let reason = ctx.quiz.load_initial().await.unwrap();
    assert_eq!(reason, Some(DegradedReason::EmptyBatch));

    let snapshot = ctx.quiz.snapshot().await;
    assert!(snapshot.offline);
    assert_eq!(snapshot.card_count, fallback_cards().len());
    assert_eq!(snapshot.card.unwrap().id, "fallback-1");
}

/// Test only one replenishment is in flight at a time.
#[tokio::test]
async fn test_single_replenishment_in_flight() {
    let generator = ScriptedGenerator::gated(vec![
        Step::Cards(fixtures::batch("init", 5)),
        Step::Cards(fixtures::batch("more", 5)),
    ]);
    generator.release(1);
    let ctx = TestContext::new(generator);
    ctx.quiz.load_initial().await.unwrap();

    ctx.quiz.advance().await;
    ctx.quiz.advance().await;
    assert_eq!(ctx.generator.calls(), 1);

    // Position 3 of 5 crosses the threshold.
    let snapshot = ctx.quiz.advance().await;
    assert_eq!(snapshot.position, 3);
    assert!(snapshot.fetching_more);

    let generator = ctx.generator.clone();
    wait_until(|| generator.calls() == 2).await;

    assert!(ctx.quiz.ensure_ahead().await.is_none());
    ctx.quiz.advance().await;
    tokio::task::yield_now().await;
    assert_eq!(ctx.generator.calls(), 2);

    ctx.generator.release(1);
    wait_for_snapshot(&ctx.quiz, |s| !s.fetching_more).await;

    let snapshot = ctx.quiz.snapshot().await;
    assert_eq!(snapshot.card_count, 10);
    assert_eq!(snapshot.position, 4);
    assert!(!snapshot.offline);
}

/// Test a failed replenishment leaves the deck alone and retries at the next crossing.
#[tokio::test]
async fn test_failed_replenishment_retries_on_next_advance() {
    let ctx = TestContext::loaded(vec![
        Step::Cards(fixtures::batch("init", 5)),
        Step::Fail,
        Step::Cards(fixtures::batch("more", 5)),
    ])
    .await;

    for _ in 0..3 {
        ctx.quiz.advance().await;
    }
    wait_for_snapshot(&ctx.quiz, |s| !s.fetching_more).await;

    let snapshot = ctx.quiz.snapshot().await;
    assert_eq!(snapshot.card_count, 5);
    assert!(!snapshot.offline);
    assert_eq!(ctx.generator.calls(), 2);

    ctx.quiz.advance().await;
    wait_for_snapshot(&ctx.quiz, |s| !s.fetching_more).await;

    let snapshot = ctx.quiz.snapshot().await;
    assert_eq!(snapshot.card_count, 10);
    assert_eq!(ctx.generator.calls(), 3);
}

/// Test a short batch that leaves the cursor near the end triggers another fetch.
#[tokio::test]
async fn test_short_batch_fetches_again() {
    let generator = ScriptedGenerator::gated(vec![
        Step::Cards(fixtures::batch("init", 5)),
        Step::Cards(fixtures::batch("short", 1)),
        Step::Cards(fixtures::batch("more", 5)),
    ]);
    generator.release(1);
    let ctx = TestContext::new(generator);
    ctx.quiz.load_initial().await.unwrap();

    for _ in 0..4 {
        ctx.quiz.advance().await;
    }
    let generator = ctx.generator.clone();
    wait_until(|| generator.calls() == 2).await;

    // Position 4 of 6 is still inside the prefetch margin.
    ctx.generator.release(1);
    wait_until(|| generator.calls() == 3).await;

    let snapshot = ctx.quiz.snapshot().await;
    assert_eq!(snapshot.position, 4);
    assert_eq!(snapshot.card_count, 6);
    assert!(snapshot.fetching_more);

    ctx.generator.release(1);
    wait_for_snapshot(&ctx.quiz, |s| !s.fetching_more).await;

    let snapshot = ctx.quiz.snapshot().await;
    assert_eq!(snapshot.card_count, 11);
    assert_eq!(ctx.generator.calls(), 3);
}

/// Test a failed fetch is not retried until the cursor moves.
#[tokio::test]
async fn test_failed_replenishment_waits_for_advance() {
    let ctx = TestContext::loaded(vec![
        Step::Cards(fixtures::batch("init", 2)),
        Step::Fail,
        Step::Cards(fixtures::batch("more", 5)),
    ])
    .await;

    wait_for_snapshot(&ctx.quiz, |s| !s.fetching_more).await;
    tokio::task::yield_now().await;

    let snapshot = ctx.quiz.snapshot().await;
    assert_eq!(snapshot.card_count, 2);
    assert_eq!(ctx.generator.calls(), 2);
}

/// Test appended cards are reached instead of wrapping.
#[tokio::test]
async fn test_appended_cards_follow_on() {
    let ctx = TestContext::loaded(vec![
        Step::Cards(fixtures::batch("init", 5)),
        Step::Cards(fixtures::batch("more", 5)),
    ])
    .await;

    for _ in 0..3 {
        ctx.quiz.advance().await;
    }
    wait_for_snapshot(&ctx.quiz, |s| s.card_count == 10).await;

    ctx.quiz.advance().await;
    let snapshot = ctx.quiz.advance().await;
    assert_eq!(snapshot.position, 5);
    assert_eq!(snapshot.card.unwrap().id, "more-0");
}

/// Test cards fetched for a discarded session never reach the new one.
#[tokio::test]
async fn test_restart_drops_stale_replenishment() {
    let generator = ScriptedGenerator::gated(vec![
        Step::Cards(fixtures::batch("init", 2)),
        Step::Cards(fixtures::batch("stale", 5)),
        Step::Cards(fixtures::batch("fresh", 5)),
    ]);
    generator.release(1);
    let ctx = TestContext::new(generator);
    ctx.quiz.load_initial().await.unwrap();

    // A two-card deck is already at the threshold, so loading queued a fetch.
    let generator = ctx.generator.clone();
    wait_until(|| generator.calls() == 2).await;

    let reload = ctx.quiz.restart().await;
    wait_until(|| generator.calls() == 3).await;

    // The old session's fetch is first in line for the gate.
    ctx.generator.release(1);
    wait_until(|| generator.remaining() == 1).await;
    ctx.generator.release(1);
    reload.await.unwrap();

    let snapshot = ctx.quiz.snapshot().await;
    assert_eq!(snapshot.card.unwrap().id, "fresh-0");
    assert_eq!(snapshot.card_count, 5);
    assert_eq!(snapshot.game.score, 0);
}

/// Test a restart during the first load discards that load's cards.
#[tokio::test]
async fn test_restart_during_initial_load() {
    let generator = ScriptedGenerator::gated(vec![
        Step::Cards(fixtures::batch("old", 5)),
        Step::Cards(fixtures::batch("fresh", 5)),
    ]);
    let ctx = TestContext::new(generator);

    let quiz = ctx.quiz.clone();
    let first = tokio::spawn(async move { quiz.load_initial().await });
    let generator = ctx.generator.clone();
    wait_until(|| generator.calls() == 1).await;

    let reload = ctx.quiz.restart().await;
    wait_until(|| generator.calls() == 2).await;

    // The first load is first in line for the gate and gets the old batch.
    ctx.generator.release(1);
    let result = first.await.unwrap();
    assert!(matches!(result, Err(SupplyError::StaleRequest { .. })));

    let snapshot = ctx.quiz.snapshot().await;
    assert_eq!(snapshot.status, SessionStatus::Loading);
    assert_eq!(snapshot.card_count, 0);
    assert!(snapshot.card.is_none());

    ctx.generator.release(1);
    reload.await.unwrap();

    let snapshot = ctx.quiz.snapshot().await;
    assert_eq!(snapshot.status, SessionStatus::Ready);
    assert_eq!(snapshot.card.unwrap().id, "fresh-0");
    assert_eq!(snapshot.card_count, 5);
    assert_eq!(ctx.generator.calls(), 2);
}
