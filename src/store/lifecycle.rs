//! Three-phase lifecycle shared by every remote operation.
//!
//! A single invocation dispatches `Pending` first and then exactly one of
//! `Fulfilled` or `Rejected`. [`Loadable`] applies those phases to slice data,
//! leaving the payload-specific merge to the caller.

use crate::error::RequestError;

/// Progress of one remote operation invocation
#[derive(Debug, Clone, PartialEq)]
pub enum Phase<T> {
    Pending,
    Fulfilled(T),
    /// Structured error from the transport, `None` when the failure had no shape
    Rejected(Option<RequestError>),
}

impl<T> Phase<T> {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Pending => "pending",
            Phase::Fulfilled(_) => "fulfilled",
            Phase::Rejected(_) => "rejected",
        }
    }
}

/// Remote data plus its loading/error flags
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Loadable<T> {
    data: T,
    is_loading: bool,
    error: Option<RequestError>,
}

impl<T> Loadable<T> {
    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&RequestError> {
        self.error.as_ref()
    }

    /// Apply one lifecycle phase.
    ///
    /// Pending keeps the previous data visible while the request is in flight.
    /// `merge` runs only on fulfillment.
    pub fn apply<P>(&mut self, phase: Phase<P>, merge: impl FnOnce(&mut T, P)) {
        match phase {
            Phase::Pending => {
                self.is_loading = true;
                self.error = None;
            }
            Phase::Fulfilled(payload) => {
                merge(&mut self.data, payload);
                self.is_loading = false;
                self.error = None;
            }
            Phase::Rejected(rejection) => {
                self.is_loading = false;
                self.error = Some(RequestError::normalize(rejection));
            }
        }
    }
}
