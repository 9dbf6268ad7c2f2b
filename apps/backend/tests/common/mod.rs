//! Common test utilities for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - ScriptedGenerator, a fake card generator with canned results and an optional gate
//! - TestContext for wiring a quiz service and router around it
//! - Polling helpers for background loads

pub mod fixtures;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum_test::TestServer;
use tokio::sync::Semaphore;

use prepoflex_backend::generator::{CardGenerator, GeneratorError};
use prepoflex_backend::models::Flashcard;
use prepoflex_backend::services::quiz::QuizService;
use prepoflex_backend::{app, AppState};

/// One canned generator result.
pub enum Step {
    Cards(Vec<Flashcard>),
    Fail,
}

/// Generator that replays a script. Once the script runs out it returns
/// empty batches.
pub struct ScriptedGenerator {
    script: Mutex<VecDeque<Step>>,
    calls: AtomicUsize,
    gate: Option<Semaphore>,
}

impl ScriptedGenerator {
    pub fn new(script: Vec<Step>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    /// Every call blocks until a permit is released with [`Self::release`].
    pub fn gated(script: Vec<Step>) -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::new(script)
        }
    }

    pub fn release(&self, calls: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(calls);
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Steps not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.lock().unwrap().len()
    }
}

#[async_trait]
impl CardGenerator for ScriptedGenerator {
    async fn generate(&self, _count: usize) -> Result<Vec<Flashcard>, GeneratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        let step = self.script.lock().unwrap().pop_front();
        match step {
            Some(Step::Cards(cards)) => Ok(cards),
            Some(Step::Fail) => Err(GeneratorError::Network("connection refused".to_string())),
            None => Ok(Vec::new()),
        }
    }
}

/// Test context holding the quiz service, its generator and the router.
pub struct TestContext {
    pub quiz: QuizService,
    pub generator: Arc<ScriptedGenerator>,
    app: Router,
}

impl TestContext {
    /// Create a context whose initial load has not run yet.
    pub fn new(generator: ScriptedGenerator) -> Self {
        let generator = Arc::new(generator);
        let quiz = QuizService::new(generator.clone(), 5);
        let app = app(AppState { quiz: quiz.clone() });

        Self {
            quiz,
            generator,
            app,
        }
    }

    /// Create a context and run the initial load to completion.
    pub async fn loaded(script: Vec<Step>) -> Self {
        let ctx = Self::new(ScriptedGenerator::new(script));
        ctx.quiz
            .load_initial()
            .await
            .expect("initial load should run once");
        ctx
    }

    /// Get a test server for the router.
    pub fn server(&self) -> TestServer {
        TestServer::new(self.app.clone()).unwrap()
    }
}

/// Poll `check` until it holds, failing the test after two seconds.
pub async fn wait_until<F>(mut check: F)
where
    F: FnMut() -> bool,
{
    for _ in 0..400 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}

/// Poll the service until its snapshot satisfies `check`.
pub async fn wait_for_snapshot<F>(quiz: &QuizService, check: F)
where
    F: Fn(&prepoflex_backend::models::QuizSnapshot) -> bool,
{
    for _ in 0..400 {
        if check(&quiz.snapshot().await) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("snapshot condition not reached in time");
}
