//! Edit session state machine.
//!
//! `Loading -> Ready -> Submitting -> (Ready | Navigated)`, with `cancel`
//! leaving from any phase. The session is synchronous and owns no I/O: the
//! caller performs the request named by a [`SubmitTicket`] and reports the
//! result back.

use std::fmt;

use gamestall_catalog::{GameId, GameUpdate, LoadError, RawGameRecord, SubmitError};
use tracing::{debug, warn};

use crate::error::EditorError;
use crate::model::{EditableGame, FieldEdit, GameField};
use crate::normalize::normalize;

/// Externally visible phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    Submitting,
    Navigated,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Submitting => "submitting",
            Self::Navigated => "navigated",
        })
    }
}

#[derive(Debug, Clone)]
struct Draft {
    loaded: EditableGame,
    current: EditableGame,
    degraded: bool,
}

#[derive(Debug)]
enum State {
    Loading { in_flight: bool },
    Ready(Draft),
    Submitting { draft: Draft, attempt: u64 },
    Navigated,
}

/// Permission to dispatch exactly one update request.
#[derive(Debug)]
pub struct SubmitTicket {
    attempt: u64,
    update: GameUpdate,
}

impl SubmitTicket {
    pub fn update(&self) -> &GameUpdate {
        &self.update
    }

    pub fn attempt(&self) -> u64 {
        self.attempt
    }
}

/// What a load result did to the session.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded,
    /// The fetch failed; the session is editable with blank values.
    Degraded(LoadError),
    /// The session was no longer loading.
    Ignored,
}

/// What a submission result did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Saved; the session is finished and the user goes to this route.
    Navigated(String),
    /// Not saved; the session is back in `Ready` and this is the message to show.
    Rejected(String),
    /// The result belonged to a stale attempt or a finished session.
    Ignored,
}

/// State for editing one listing.
#[derive(Debug)]
pub struct EditSession {
    game_id: GameId,
    dashboard_route: String,
    state: State,
    attempts: u64,
    last_error: Option<String>,
}

impl EditSession {
    pub fn new(game_id: GameId, dashboard_route: impl Into<String>) -> Self {
        Self {
            game_id,
            dashboard_route: dashboard_route.into(),
            state: State::Loading { in_flight: false },
            attempts: 0,
            last_error: None,
        }
    }

    pub fn game_id(&self) -> &GameId {
        &self.game_id
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            State::Loading { .. } => Phase::Loading,
            State::Ready(_) => Phase::Ready,
            State::Submitting { .. } => Phase::Submitting,
            State::Navigated => Phase::Navigated,
        }
    }

    fn draft(&self) -> Option<&Draft> {
        match &self.state {
            State::Ready(draft) | State::Submitting { draft, .. } => Some(draft),
            State::Loading { .. } | State::Navigated => None,
        }
    }

    /// Current values, while the form is on screen.
    pub fn game(&self) -> Option<&EditableGame> {
        self.draft().map(|d| &d.current)
    }

    /// Whether the form is showing blank defaults after a failed load.
    pub fn is_degraded(&self) -> bool {
        self.draft().is_some_and(|d| d.degraded)
    }

    /// Fields changed since the record was loaded.
    pub fn dirty_fields(&self) -> Vec<GameField> {
        self.draft()
            .map(|d| d.current.diff(&d.loaded))
            .unwrap_or_default()
    }

    /// Message from the most recent failed submission, until the next attempt.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        matches!(&self.state, State::Ready(draft) if !draft.degraded)
    }

    /// Marks the single load request as dispatched.
    pub fn begin_load(&mut self) -> Result<(), EditorError> {
        match self.state {
            State::Loading { in_flight: false } => {
                self.state = State::Loading { in_flight: true };
                Ok(())
            }
            State::Loading { in_flight: true } => Err(EditorError::LoadInProgress),
            State::Navigated => Err(EditorError::NotEditable(Phase::Navigated)),
            State::Ready(_) | State::Submitting { .. } => Err(EditorError::AlreadyLoaded),
        }
    }

    /// Applies the load result. A failure still opens the form, blank.
    pub fn finish_load(&mut self, result: Result<RawGameRecord, LoadError>) -> LoadOutcome {
        if !matches!(self.state, State::Loading { .. }) {
            warn!(game_id = %self.game_id, phase = %self.phase(), "ignoring late load result");
            return LoadOutcome::Ignored;
        }

        let (game, outcome) = match result {
            Ok(record) => (normalize(&record), LoadOutcome::Loaded),
            Err(e) => (EditableGame::default(), LoadOutcome::Degraded(e)),
        };
        let degraded = matches!(outcome, LoadOutcome::Degraded(_));
        self.state = State::Ready(Draft {
            loaded: game.clone(),
            current: game,
            degraded,
        });
        outcome
    }

    /// Replaces one field of the draft.
    pub fn apply(&mut self, edit: FieldEdit) -> Result<(), EditorError> {
        let phase = self.phase();
        match &mut self.state {
            State::Ready(draft) => {
                debug!(game_id = %self.game_id, field = %edit.field(), "field edited");
                draft.current = draft.current.with(edit);
                Ok(())
            }
            _ => Err(EditorError::NotEditable(phase)),
        }
    }

    /// Validates the draft and enters `Submitting`.
    ///
    /// Only one ticket can be outstanding; a second call while submitting
    /// fails without changing anything. A validation failure leaves the
    /// session in `Ready`. A degraded session never submits.
    pub fn begin_submit(&mut self) -> Result<SubmitTicket, EditorError> {
        match std::mem::replace(&mut self.state, State::Navigated) {
            State::Ready(draft) if draft.degraded => {
                self.state = State::Ready(draft);
                Err(EditorError::Degraded)
            }
            State::Ready(draft) => match draft.current.validate() {
                Ok(update) => {
                    self.attempts += 1;
                    self.last_error = None;
                    self.state = State::Submitting {
                        draft,
                        attempt: self.attempts,
                    };
                    Ok(SubmitTicket {
                        attempt: self.attempts,
                        update,
                    })
                }
                Err(e) => {
                    self.state = State::Ready(draft);
                    Err(e.into())
                }
            },
            other => {
                self.state = other;
                Err(match self.phase() {
                    Phase::Submitting => EditorError::SubmitInProgress,
                    phase => EditorError::NotEditable(phase),
                })
            }
        }
    }

    /// Applies a submission result for `ticket`.
    pub fn finish_submit(
        &mut self,
        ticket: SubmitTicket,
        result: Result<(), SubmitError>,
    ) -> SubmitOutcome {
        match std::mem::replace(&mut self.state, State::Navigated) {
            State::Submitting { draft, attempt } if attempt == ticket.attempt => match result {
                Ok(()) => SubmitOutcome::Navigated(self.dashboard_route.clone()),
                Err(e) => {
                    let message = e.user_message();
                    self.last_error = Some(message.clone());
                    self.state = State::Ready(draft);
                    SubmitOutcome::Rejected(message)
                }
            },
            other => {
                self.state = other;
                warn!(
                    game_id = %self.game_id,
                    attempt = ticket.attempt,
                    phase = %self.phase(),
                    "ignoring stale submit result"
                );
                SubmitOutcome::Ignored
            }
        }
    }

    /// Leaves the form without saving. Returns the route to go to.
    pub fn cancel(&mut self) -> String {
        self.state = State::Navigated;
        self.dashboard_route.clone()
    }
}
