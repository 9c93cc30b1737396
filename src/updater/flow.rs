//! State machine for a single update check.
//!
//! ```text
//! Idle -> Checking -> NoUpdate
//!                  -> OfferUpdate -> Declined(Update)
//!                                 -> Elevate -> Declined(Elevation)
//!                                            -> Applying -> Done -> Restart
//!                                                                -> Later
//! any non-terminal state --Fail--> Failed
//! ```
//!
//! Transitions are pure. The checker performs the side effect belonging to the
//! current state, turns its result into a [`FlowEvent`], and asks for the next
//! state.

use crate::core::UpdateError;

/// Which confirmation the user declined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclinedAt {
    /// The "download and install?" prompt.
    Update,
    /// The elevated-privileges prompt.
    Elevation,
}

/// A state of the update flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateState {
    Idle,
    /// Querying the release feed.
    Checking,
    /// Feed has nothing newer than the running build.
    NoUpdate,
    /// Asking whether to download and install `pending` releases.
    OfferUpdate {
        pending: usize,
    },
    /// Asking for elevated privileges.
    Elevate,
    /// Downloading and applying the release.
    Applying,
    /// Update applied, asking whether to restart now.
    Done,
    /// User asked for an immediate restart.
    Restart,
    /// User will restart later.
    Later,
    Declined(DeclinedAt),
    Failed,
}

/// Input driving the flow forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowEvent {
    /// Start a check.
    Begin,
    /// The feed query finished with this many pending releases.
    FeedChecked {
        pending: usize,
    },
    /// The user answered the current prompt.
    Answer(bool),
    /// The update was downloaded and applied.
    Applied,
    /// A step failed.
    Fail,
}

impl UpdateState {
    /// Compute the state following `event`.
    ///
    /// # Errors
    ///
    /// Returns [`UpdateError::InvalidTransition`] when `event` has no meaning in
    /// the current state, including any event on a terminal state.
    pub fn next(self, event: FlowEvent) -> Result<Self, UpdateError> {
        let next = match (self, event) {
            (Self::Idle, FlowEvent::Begin) => Self::Checking,
            (Self::Checking, FlowEvent::FeedChecked {
                pending: 0,
            }) => Self::NoUpdate,
            (Self::Checking, FlowEvent::FeedChecked {
                pending,
            }) => Self::OfferUpdate {
                pending,
            },
            (Self::OfferUpdate {
                ..
            }, FlowEvent::Answer(true)) => Self::Elevate,
            (Self::OfferUpdate {
                ..
            }, FlowEvent::Answer(false)) => Self::Declined(DeclinedAt::Update),
            (Self::Elevate, FlowEvent::Answer(true)) => Self::Applying,
            (Self::Elevate, FlowEvent::Answer(false)) => Self::Declined(DeclinedAt::Elevation),
            (Self::Applying, FlowEvent::Applied) => Self::Done,
            (Self::Done, FlowEvent::Answer(true)) => Self::Restart,
            (Self::Done, FlowEvent::Answer(false)) => Self::Later,
            (state, FlowEvent::Fail) if !state.is_terminal() => Self::Failed,
            (from, event) => {
                return Err(UpdateError::InvalidTransition {
                    from,
                    event,
                });
            }
        };
        Ok(next)
    }

    /// Whether the flow stops in this state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::NoUpdate | Self::Declined(_) | Self::Later | Self::Restart | Self::Failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(events: &[FlowEvent]) -> Result<UpdateState, UpdateError> {
        events.iter().try_fold(UpdateState::Idle, |state, event| state.next(*event))
    }

    #[test]
    fn test_no_pending_releases_ends_in_no_update() {
        let state = walk(&[FlowEvent::Begin, FlowEvent::FeedChecked {
            pending: 0,
        }])
        .unwrap();
        assert_eq!(state, UpdateState::NoUpdate);
        assert!(state.is_terminal());
    }

    #[test]
    fn test_pending_releases_offer_update() {
        let state = walk(&[FlowEvent::Begin, FlowEvent::FeedChecked {
            pending: 3,
        }])
        .unwrap();
        assert_eq!(state, UpdateState::OfferUpdate {
            pending: 3
        });
        assert!(!state.is_terminal());
    }

    #[test]
    fn test_declining_offer_skips_elevation() {
        let state = UpdateState::OfferUpdate {
            pending: 1,
        }
        .next(FlowEvent::Answer(false))
        .unwrap();
        assert_eq!(state, UpdateState::Declined(DeclinedAt::Update));
    }

    #[test]
    fn test_declining_elevation_skips_apply() {
        let state = UpdateState::Elevate.next(FlowEvent::Answer(false)).unwrap();
        assert_eq!(state, UpdateState::Declined(DeclinedAt::Elevation));
    }

    #[test]
    fn test_full_accept_path_reaches_restart() {
        let state = walk(&[
            FlowEvent::Begin,
            FlowEvent::FeedChecked {
                pending: 2,
            },
            FlowEvent::Answer(true),
            FlowEvent::Answer(true),
            FlowEvent::Applied,
            FlowEvent::Answer(true),
        ])
        .unwrap();
        assert_eq!(state, UpdateState::Restart);
    }

    #[test]
    fn test_declining_restart_is_later() {
        assert_eq!(UpdateState::Done.next(FlowEvent::Answer(false)).unwrap(), UpdateState::Later);
    }

    #[test]
    fn test_failure_from_any_active_state() {
        for state in [
            UpdateState::Idle,
            UpdateState::Checking,
            UpdateState::OfferUpdate {
                pending: 1,
            },
            UpdateState::Elevate,
            UpdateState::Applying,
            UpdateState::Done,
        ] {
            assert_eq!(state.next(FlowEvent::Fail).unwrap(), UpdateState::Failed);
        }
    }

    #[test]
    fn test_terminal_states_reject_events() {
        let err = UpdateState::Later.next(FlowEvent::Fail).unwrap_err();
        assert!(matches!(err, UpdateError::InvalidTransition {
            from: UpdateState::Later,
            ..
        }));
        assert!(UpdateState::NoUpdate.next(FlowEvent::Begin).is_err());
    }

    #[test]
    fn test_out_of_order_event_rejected() {
        assert!(UpdateState::Checking.next(FlowEvent::Applied).is_err());
        assert!(UpdateState::Applying.next(FlowEvent::Answer(true)).is_err());
    }
}
