//! Status-tagged payload wrapper shared by every stream in the crate.
//!
//! A [`DataState`] says how fresh and healthy a value is, independently of the
//! value itself. Derived views compute their status from their sources with
//! [`combine`], which applies a fixed severity order:
//!
//! ```text
//! Error > NoNetwork > Loading > Pending > Loaded
//! ```
//!
//! A failed or disconnected source dominates even when the other source is
//! fully loaded, and `Loading` hides a stale reading from a source that has
//! not produced its first value yet.

use crate::error::StateError;

#[derive(Debug, Clone, PartialEq)]
pub enum DataState<T> {
    /// No payload yet.
    Loading,
    /// Fresh, fully available payload.
    Loaded(T),
    /// Payload available while a refresh is in flight.
    Pending(T),
    /// A connectivity-dependent source is unavailable. The last known payload
    /// may be absent.
    NoNetwork(Option<T>),
    /// The source failed. The last known payload is carried when available.
    Error { error: StateError, data: Option<T> },
}

impl<T> Default for DataState<T> {
    fn default() -> Self {
        DataState::Loading
    }
}

impl<T> DataState<T> {
    pub fn error(error: StateError, data: Option<T>) -> Self {
        DataState::Error { error, data }
    }

    /// Borrow the payload, if this state carries one.
    pub fn data(&self) -> Option<&T> {
        match self {
            DataState::Loading => None,
            DataState::Loaded(data) | DataState::Pending(data) => Some(data),
            DataState::NoNetwork(data) | DataState::Error { data, .. } => data.as_ref(),
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            DataState::Loading => None,
            DataState::Loaded(data) | DataState::Pending(data) => Some(data),
            DataState::NoNetwork(data) | DataState::Error { data, .. } => data,
        }
    }

    pub fn error_value(&self) -> Option<&StateError> {
        match self {
            DataState::Error { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, DataState::Loading)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, DataState::Loaded(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, DataState::Error { .. })
    }

    pub fn is_no_network(&self) -> bool {
        matches!(self, DataState::NoNetwork(_))
    }

    /// Transform the payload, keeping the variant tag and any error.
    ///
    /// `Loading` has no payload and passes through untouched.
    pub fn map<R, F>(self, f: F) -> DataState<R>
    where
        F: FnOnce(T) -> R,
    {
        match self {
            DataState::Loading => DataState::Loading,
            DataState::Loaded(data) => DataState::Loaded(f(data)),
            DataState::Pending(data) => DataState::Pending(f(data)),
            DataState::NoNetwork(data) => DataState::NoNetwork(data.map(f)),
            DataState::Error { error, data } => DataState::Error {
                error,
                data: data.map(f),
            },
        }
    }

    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            DataState::Loading => "loading",
            DataState::Loaded(_) => "loaded",
            DataState::Pending(_) => "pending",
            DataState::NoNetwork(_) => "no_network",
            DataState::Error { .. } => "error",
        }
    }
}

/// Merge the states of two independent sources.
///
/// The status follows the severity order documented at module level; when both
/// are `Error`, `a` wins. The payload `f(a, b)` is only computed when both
/// sides carry one, otherwise the winning variant is left without payload.
pub fn combine<A, B, R, F>(a: DataState<A>, b: DataState<B>, f: F) -> DataState<R>
where
    F: FnOnce(A, B) -> R,
{
    match (a, b) {
        (DataState::Error { error, data }, b) => DataState::Error {
            error,
            data: zip_with(data, b.into_data(), f),
        },
        (a, DataState::Error { error, data }) => DataState::Error {
            error,
            data: zip_with(a.into_data(), data, f),
        },
        (a, b) if a.is_no_network() || b.is_no_network() => {
            DataState::NoNetwork(zip_with(a.into_data(), b.into_data(), f))
        }
        (DataState::Loading, _) | (_, DataState::Loading) => DataState::Loading,
        (DataState::Loaded(a), DataState::Loaded(b)) => DataState::Loaded(f(a, b)),
        // Remaining pairs are Loaded/Pending mixes, both with payload.
        (a, b) => match zip_with(a.into_data(), b.into_data(), f) {
            Some(data) => DataState::Pending(data),
            None => DataState::Loading,
        },
    }
}

/// Fold any number of states into one list-valued state with [`combine`].
///
/// An empty input is `Loaded(vec![])`.
pub fn combine_all<T, I>(states: I) -> DataState<Vec<T>>
where
    I: IntoIterator<Item = DataState<T>>,
{
    states
        .into_iter()
        .fold(DataState::Loaded(Vec::new()), |acc, state| {
            combine(acc, state, |mut list, item| {
                list.push(item);
                list
            })
        })
}

fn zip_with<A, B, R, F>(a: Option<A>, b: Option<B>, f: F) -> Option<R>
where
    F: FnOnce(A, B) -> R,
{
    match (a, b) {
        (Some(a), Some(b)) => Some(f(a, b)),
        _ => None,
    }
}
