//! Async driver for one edit session.
//!
//! Wires an [`EditSession`] to a [`CatalogService`] and a [`NoticeBoard`].
//! The session lock is never held across an `.await`, so the front end can
//! keep calling in (and be refused) while a request is in flight.

use std::sync::{Mutex, MutexGuard, PoisonError};

use gamestall_catalog::{CatalogService, Credentials, GameId};
use gamestall_notify::{Notice, NoticeBoard};
use tracing::{debug, info, warn};

use crate::error::EditorError;
use crate::model::{EditableGame, FieldEdit, GameField};
use crate::session::{EditSession, LoadOutcome, Phase, SubmitOutcome};

/// Alert raised when the record cannot be fetched.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load game details";

/// Notice raised after a successful update.
pub const UPDATED_MESSAGE: &str = "Game updated successfully!";

/// Drives loading, editing and submitting one listing.
pub struct EditFlow<S> {
    service: S,
    game_id: GameId,
    session: Mutex<EditSession>,
    notices: Mutex<NoticeBoard>,
}

impl<S: CatalogService> EditFlow<S> {
    pub fn new(service: S, game_id: GameId, dashboard_route: impl Into<String>) -> Self {
        let session = EditSession::new(game_id.clone(), dashboard_route);
        Self {
            service,
            game_id,
            session: Mutex::new(session),
            notices: Mutex::new(NoticeBoard::new()),
        }
    }

    fn session(&self) -> MutexGuard<'_, EditSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notices(&self) -> MutexGuard<'_, NoticeBoard> {
        self.notices.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn game_id(&self) -> &GameId {
        &self.game_id
    }

    /// Fetches and normalizes the record.
    ///
    /// A failed fetch raises a blocking alert and leaves a blank, editable
    /// form rather than an error.
    pub async fn load(&self) -> Result<LoadOutcome, EditorError> {
        self.session().begin_load()?;

        let result = self.service.fetch_game(&self.game_id).await;
        let outcome = self.session().finish_load(result);

        match &outcome {
            LoadOutcome::Loaded => info!(game_id = %self.game_id, "game record loaded"),
            LoadOutcome::Degraded(e) => {
                warn!(game_id = %self.game_id, error = %e, "failed to load game record");
                self.notices().alert(LOAD_FAILED_MESSAGE);
            }
            LoadOutcome::Ignored => {}
        }
        Ok(outcome)
    }

    /// Replaces one field of the draft.
    pub fn edit(&self, edit: FieldEdit) -> Result<(), EditorError> {
        self.session().apply(edit)
    }

    /// Validates the draft and sends it with `credentials`.
    ///
    /// Refused with [`EditorError::SubmitInProgress`] while another
    /// submission is outstanding; no request is sent in that case.
    pub async fn submit(&self, credentials: &Credentials) -> Result<SubmitOutcome, EditorError> {
        let ticket = self.session().begin_submit();
        let ticket = match ticket {
            Ok(ticket) => ticket,
            Err(EditorError::Validation(e)) => {
                debug!(game_id = %self.game_id, field = %e.field(), error = %e, "draft invalid");
                self.notices().error(e.to_string());
                return Err(e.into());
            }
            Err(e) => return Err(e),
        };

        debug!(game_id = %self.game_id, attempt = ticket.attempt(), "dispatching update");
        let result = self
            .service
            .update_game(&self.game_id, ticket.update(), credentials)
            .await;
        let outcome = self.session().finish_submit(ticket, result);

        match &outcome {
            SubmitOutcome::Navigated(route) => {
                info!(game_id = %self.game_id, %route, "game updated");
                self.notices().success(UPDATED_MESSAGE);
            }
            SubmitOutcome::Rejected(message) => {
                warn!(game_id = %self.game_id, %message, "game update failed");
                self.notices().error(message.clone());
            }
            SubmitOutcome::Ignored => {
                debug!(game_id = %self.game_id, "update result arrived after leaving the form");
            }
        }
        Ok(outcome)
    }

    /// Leaves without saving; returns the route to navigate to.
    pub fn cancel(&self) -> String {
        info!(game_id = %self.game_id, "edit cancelled");
        self.session().cancel()
    }

    pub fn phase(&self) -> Phase {
        self.session().phase()
    }

    /// A copy of the values currently on screen.
    pub fn game(&self) -> Option<EditableGame> {
        self.session().game().cloned()
    }

    pub fn dirty_fields(&self) -> Vec<GameField> {
        self.session().dirty_fields()
    }

    pub fn is_degraded(&self) -> bool {
        self.session().is_degraded()
    }

    pub fn can_submit(&self) -> bool {
        self.session().can_submit()
    }

    pub fn last_error(&self) -> Option<String> {
        self.session().last_error().map(str::to_string)
    }

    /// Takes every queued notice, oldest first.
    pub fn drain_notices(&self) -> Vec<Notice> {
        self.notices().drain()
    }

    /// A copy of the queued notices, left in place.
    pub fn pending_notices(&self) -> NoticeBoard {
        self.notices().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamestall_catalog::{GameUpdate, LoadError, RawGameRecord, SubmitError};
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Arc;
    use tokio::sync::Semaphore;

    const DASHBOARD: &str = "/developer/dashboard";

    /// Mock catalog that records requests and returns canned responses.
    ///
    /// Updates wait on `gate` when it is closed, so tests can observe the
    /// session mid-flight.
    struct MockCatalog {
        loads: Mutex<Vec<Result<RawGameRecord, LoadError>>>,
        updates: Mutex<Vec<Result<(), SubmitError>>>,
        sent: Mutex<Vec<(String, GameUpdate, String)>>,
        gate: Option<Semaphore>,
    }

    impl MockCatalog {
        fn new(
            loads: Vec<Result<RawGameRecord, LoadError>>,
            updates: Vec<Result<(), SubmitError>>,
        ) -> Self {
            Self {
                loads: Mutex::new(loads),
                updates: Mutex::new(updates),
                sent: Mutex::new(Vec::new()),
                gate: None,
            }
        }

        fn gated(mut self) -> Self {
            self.gate = Some(Semaphore::new(0));
            self
        }

        fn open_gate(&self) {
            self.gate.as_ref().unwrap().add_permits(1);
        }

        fn update_count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }

        fn last_sent(&self) -> (String, GameUpdate, String) {
            self.sent.lock().unwrap().last().unwrap().clone()
        }
    }

    impl CatalogService for MockCatalog {
        fn fetch_game<'a>(
            &'a self,
            _id: &'a GameId,
        ) -> Pin<Box<dyn Future<Output = Result<RawGameRecord, LoadError>> + Send + 'a>> {
            Box::pin(async move {
                let mut loads = self.loads.lock().unwrap();
                if loads.is_empty() {
                    Err(LoadError::Status {
                        status: 404,
                        message: None,
                    })
                } else {
                    loads.remove(0)
                }
            })
        }

        fn update_game<'a>(
            &'a self,
            id: &'a GameId,
            update: &'a GameUpdate,
            credentials: &'a Credentials,
        ) -> Pin<Box<dyn Future<Output = Result<(), SubmitError>> + Send + 'a>> {
            self.sent.lock().unwrap().push((
                id.to_string(),
                update.clone(),
                credentials.token().to_string(),
            ));

            Box::pin(async move {
                if let Some(gate) = &self.gate {
                    gate.acquire().await.unwrap().forget();
                }
                let mut updates = self.updates.lock().unwrap();
                if updates.is_empty() {
                    Ok(())
                } else {
                    updates.remove(0)
                }
            })
        }
    }

    fn record() -> RawGameRecord {
        serde_json::from_str(
            r#"{"title":"Star Forge","description":"Build fleets.","genre":"Strategy",
                "price":4.99,"coverImage":"","media":{"images":["https://example.com/x.png"]},
                "downloadLink":"https://example.com/d","_id":"g1"}"#,
        )
        .unwrap()
    }

    fn creds() -> Credentials {
        Credentials::bearer("tok-1")
    }

    async fn loaded_flow(catalog: MockCatalog) -> EditFlow<MockCatalog> {
        let flow = EditFlow::new(catalog, GameId::new("g1"), DASHBOARD);
        let outcome = flow.load().await.unwrap();
        assert!(matches!(outcome, LoadOutcome::Loaded));
        flow
    }

    async fn wait_for_phase<S: CatalogService>(flow: &EditFlow<S>, phase: Phase) {
        while flow.phase() != phase {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn load_normalizes_mixed_record() {
        let flow = loaded_flow(MockCatalog::new(vec![Ok(record())], vec![])).await;

        let game = flow.game().unwrap();
        assert_eq!(game.cover_image_url, "https://example.com/x.png");
        assert_eq!(game.download_url, "https://example.com/d");
        assert_eq!(game.price, "4.99");
        assert!(flow.can_submit());
        assert!(flow.drain_notices().is_empty());
    }

    #[tokio::test]
    async fn failed_load_alerts_and_shows_blank_form() {
        let flow = EditFlow::new(MockCatalog::new(vec![], vec![]), GameId::new("g1"), DASHBOARD);
        let outcome = flow.load().await.unwrap();

        assert!(matches!(outcome, LoadOutcome::Degraded(_)));
        assert_eq!(flow.phase(), Phase::Ready);
        assert!(flow.is_degraded());
        assert_eq!(flow.game(), Some(EditableGame::default()));

        let notices = flow.pending_notices();
        let alert = notices.pending_alert().unwrap();
        assert_eq!(alert.text, LOAD_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn degraded_form_never_reaches_service() {
        let catalog = MockCatalog::new(
            vec![Err(LoadError::Status {
                status: 503,
                message: None,
            })],
            vec![],
        );
        let flow = EditFlow::new(catalog, GameId::new("g1"), DASHBOARD);
        assert!(matches!(flow.load().await.unwrap(), LoadOutcome::Degraded(_)));
        flow.drain_notices();

        flow.edit(FieldEdit::Title("T".into())).unwrap();
        flow.edit(FieldEdit::Description("D".into())).unwrap();
        flow.edit(FieldEdit::Genre("Action".into())).unwrap();
        flow.edit(FieldEdit::Price("1".into())).unwrap();
        assert!(!flow.can_submit());

        assert_eq!(flow.submit(&creds()).await, Err(EditorError::Degraded));
        assert_eq!(flow.service().update_count(), 0);
        assert_eq!(flow.phase(), Phase::Ready);
        assert!(flow.drain_notices().is_empty());
    }

    #[tokio::test]
    async fn second_load_refused() {
        let flow = loaded_flow(MockCatalog::new(vec![Ok(record())], vec![])).await;
        assert!(matches!(flow.load().await, Err(EditorError::AlreadyLoaded)));
    }

    #[tokio::test]
    async fn rejection_message_shown_verbatim_and_values_kept() {
        let catalog = MockCatalog::new(
            vec![Ok(record())],
            vec![Err(SubmitError::Rejected {
                status: 400,
                message: "Price too low".into(),
            })],
        );
        let flow = loaded_flow(catalog).await;
        flow.edit(FieldEdit::Price("9.99".into())).unwrap();
        let before = flow.game().unwrap();

        let outcome = flow.submit(&creds()).await.unwrap();

        assert_eq!(outcome, SubmitOutcome::Rejected("Price too low".into()));
        assert_eq!(flow.phase(), Phase::Ready);
        assert_eq!(flow.game(), Some(before));
        assert_eq!(flow.game().unwrap().price, "9.99");
        assert_eq!(flow.last_error().as_deref(), Some("Price too low"));

        let notices = flow.drain_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].text, "Price too low");
        assert!(!notices[0].blocking);
    }

    #[tokio::test]
    async fn transport_failure_uses_generic_message() {
        let catalog = MockCatalog::new(vec![Ok(record())], vec![Err(SubmitError::InvalidToken)]);
        let flow = loaded_flow(catalog).await;

        let outcome = flow.submit(&creds()).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Rejected("Error updating game".into()));
    }

    #[tokio::test]
    async fn success_navigates_once_and_freezes_form() {
        let flow = loaded_flow(MockCatalog::new(vec![Ok(record())], vec![Ok(())])).await;
        flow.edit(FieldEdit::Title("Star Forge II".into())).unwrap();

        let outcome = flow.submit(&creds()).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Navigated(DASHBOARD.into()));
        assert_eq!(flow.phase(), Phase::Navigated);

        let (id, update, token) = flow.service().last_sent();
        assert_eq!(id, "g1");
        assert_eq!(update.title, "Star Forge II");
        assert_eq!(update.cover_image, "https://example.com/x.png");
        assert_eq!(token, "tok-1");

        assert_eq!(
            flow.edit(FieldEdit::Title("late".into())),
            Err(EditorError::NotEditable(Phase::Navigated))
        );
        assert_eq!(
            flow.submit(&creds()).await,
            Err(EditorError::NotEditable(Phase::Navigated))
        );
        assert_eq!(flow.service().update_count(), 1);

        let notices = flow.drain_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].text, UPDATED_MESSAGE);
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_service() {
        let flow = loaded_flow(MockCatalog::new(vec![Ok(record())], vec![])).await;
        flow.edit(FieldEdit::Genre("Racing".into())).unwrap();

        let err = flow.submit(&creds()).await.unwrap_err();
        assert!(matches!(err, EditorError::Validation(_)));
        assert_eq!(flow.service().update_count(), 0);
        assert_eq!(flow.phase(), Phase::Ready);
        assert_eq!(
            flow.drain_notices()[0].text,
            "unknown genre: Racing"
        );
    }

    #[tokio::test]
    async fn concurrent_submit_dispatches_one_request() {
        let catalog = MockCatalog::new(vec![Ok(record())], vec![Ok(())]).gated();
        let flow = Arc::new(loaded_flow(catalog).await);

        let first = {
            let flow = Arc::clone(&flow);
            tokio::spawn(async move { flow.submit(&creds()).await })
        };
        wait_for_phase(&flow, Phase::Submitting).await;

        assert_eq!(
            flow.submit(&creds()).await,
            Err(EditorError::SubmitInProgress)
        );
        assert_eq!(
            flow.edit(FieldEdit::Title("mid-flight".into())),
            Err(EditorError::NotEditable(Phase::Submitting))
        );
        assert_eq!(flow.service().update_count(), 1);

        flow.service().open_gate();
        let outcome = first.await.unwrap().unwrap();
        assert_eq!(outcome, SubmitOutcome::Navigated(DASHBOARD.into()));
        assert_eq!(flow.service().update_count(), 1);
    }

    #[tokio::test]
    async fn cancel_during_submit_discards_late_result() {
        let catalog = MockCatalog::new(vec![Ok(record())], vec![Ok(())]).gated();
        let flow = Arc::new(loaded_flow(catalog).await);

        let pending = {
            let flow = Arc::clone(&flow);
            tokio::spawn(async move { flow.submit(&creds()).await })
        };
        wait_for_phase(&flow, Phase::Submitting).await;

        assert_eq!(flow.cancel(), DASHBOARD);
        flow.service().open_gate();

        assert_eq!(pending.await.unwrap().unwrap(), SubmitOutcome::Ignored);
        assert!(flow.drain_notices().is_empty());
    }
}
