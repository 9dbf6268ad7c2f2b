//! Quiz service: owns the live session and drives generator calls.

use std::sync::Arc;

use prepoflex_core::{
    BatchRequest, CardSupply, DegradedReason, Preposition, QuizSession, Replenishment,
    SessionError, SupplyError,
};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::generator::CardGenerator;
use crate::models::QuizSnapshot;

/// Inner state shared across clones.
struct QuizServiceInner {
    generator: Arc<dyn CardGenerator>,
    session: Mutex<QuizSession>,
}

/// Handle to the quiz session.
///
/// Clone-able; the session lock is never held across a generator call.
#[derive(Clone)]
pub struct QuizService {
    inner: Arc<QuizServiceInner>,
}

impl QuizService {
    pub fn new(generator: Arc<dyn CardGenerator>, batch_size: usize) -> Self {
        Self {
            inner: Arc::new(QuizServiceInner {
                generator,
                session: Mutex::new(QuizSession::new(CardSupply::new(batch_size))),
            }),
        }
    }

    /// Current session state for the UI.
    pub async fn snapshot(&self) -> QuizSnapshot {
        QuizSnapshot::from_session(&*self.inner.session.lock().await)
    }

    /// Run the initial load in the background.
    pub fn start(&self) -> JoinHandle<()> {
        let service = self.clone();
        tokio::spawn(async move {
            if let Err(e) = service.load_initial().await {
                tracing::debug!("Initial load abandoned: {}", e);
            }
        })
    }

    /// Fetch the first batch, falling back to the static deck on failure.
    pub async fn load_initial(&self) -> Result<Option<DegradedReason>, SupplyError> {
        let request = self
            .inner
            .session
            .lock()
            .await
            .supply_mut()
            .begin_initial_load()?;

        tracing::info!("Generating initial batch of {} cards", request.count);
        let outcome = self.inner.generator.generate(request.count).await;
        if let Err(e) = &outcome {
            tracing::warn!("Initial generation failed: {}", e);
        }

        let reason = self
            .inner
            .session
            .lock()
            .await
            .supply_mut()
            .finish_initial_load(&request, outcome)?;

        match &reason {
            Some(reason) => tracing::warn!("Using fallback cards: {}", reason.banner()),
            None => tracing::info!("Initial batch loaded"),
        }

        self.ensure_ahead().await;
        Ok(reason)
    }

    /// Start a background replenishment if the cursor is near the end.
    ///
    /// Returns the task handle when a request was issued.
    pub async fn ensure_ahead(&self) -> Option<JoinHandle<()>> {
        let request = self.inner.session.lock().await.supply_mut().ensure_ahead()?;
        let service = self.clone();
        Some(tokio::spawn(async move { service.replenish(request).await }))
    }

    /// Run replenishment requests until the deck is far enough ahead.
    ///
    /// A short batch can leave the cursor inside the prefetch margin, so the
    /// threshold is checked again after every append. Failures stop the loop;
    /// the next advance retries.
    async fn replenish(&self, mut request: BatchRequest) {
        loop {
            tracing::info!("Fetching {} more cards", request.count);
            let outcome = self.inner.generator.generate(request.count).await;

            let mut session = self.inner.session.lock().await;
            let supply = session.supply_mut();
            match supply.finish_replenishment(&request, outcome) {
                Replenishment::Appended(count) => {
                    tracing::info!("Appended {} cards, deck now holds {}", count, supply.len())
                }
                Replenishment::Empty => {
                    tracing::error!("Failed to fetch more cards: generator returned none");
                    return;
                }
                Replenishment::Failed(e) => {
                    tracing::error!("Failed to fetch more cards: {}", e);
                    return;
                }
                Replenishment::Stale => {
                    tracing::debug!("Dropping cards fetched for a restarted session");
                    return;
                }
            }

            match supply.ensure_ahead() {
                Some(next) => request = next,
                None => return,
            }
        }
    }

    /// Answer the current card. Repeated answers leave the state unchanged.
    pub async fn submit_answer(&self, selected: Preposition) -> Result<QuizSnapshot, SessionError> {
        let mut session = self.inner.session.lock().await;
        match session.submit_answer(selected)? {
            Some(feedback) => tracing::debug!(
                "Answered {} ({}), +{} points",
                selected,
                if feedback.correct { "correct" } else { "incorrect" },
                feedback.points_awarded
            ),
            None => tracing::debug!("Ignoring repeated answer"),
        }
        Ok(QuizSnapshot::from_session(&session))
    }

    /// Move to the next card and top up the deck if needed.
    pub async fn advance(&self) -> QuizSnapshot {
        self.inner.session.lock().await.advance_card();
        self.ensure_ahead().await;
        self.snapshot().await
    }

    /// Throw the session away and load a fresh one in the background.
    pub async fn restart(&self) -> JoinHandle<()> {
        let mut session = self.inner.session.lock().await;
        let fresh = QuizSession::new(CardSupply::new(session.supply().batch_size()));
        tracing::info!("Restarting quiz session {}", fresh.supply().session_id());
        *session = fresh;
        drop(session);
        self.start()
    }
}
