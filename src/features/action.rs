//! Loading/error/data tracking for one-off calls that do not belong in the
//! session, such as fetching or editing another user by id. Same lifecycle as
//! the session store: clear the error and raise `is_loading`, run, then record
//! the data or the error and hand the result back.

use crate::http::ApiError;
use std::future::Future;
use tokio::sync::watch;

#[derive(Clone, Debug)]
pub struct ActionState<T> {
    pub data: Option<T>,
    pub error: Option<ApiError>,
    pub is_loading: bool,
}

impl<T> Default for ActionState<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            is_loading: false,
        }
    }
}

/// Lowers a loading flag when dropped, so a call abandoned mid-flight (timeout,
/// `select!`, aborted task) does not leave it raised.
pub(crate) struct LoadingGuard<'a, S> {
    state: &'a watch::Sender<S>,
    flag: fn(&mut S) -> &mut bool,
}

impl<'a, S> LoadingGuard<'a, S> {
    /// Raises the flag and clears nothing else; callers reset their own fields.
    pub(crate) fn raise(state: &'a watch::Sender<S>, flag: fn(&mut S) -> &mut bool) -> Self {
        state.send_modify(|value| *flag(value) = true);
        Self { state, flag }
    }
}

impl<S> Drop for LoadingGuard<'_, S> {
    fn drop(&mut self) {
        let flag = self.flag;
        // Only notifies when the flag is still up.
        self.state
            .send_if_modified(|value| std::mem::replace(flag(value), false));
    }
}

fn loading_flag<T>(state: &mut ActionState<T>) -> &mut bool {
    &mut state.is_loading
}

#[derive(Debug)]
pub struct ActionTracker<T> {
    state: watch::Sender<ActionState<T>>,
}

impl<T> Default for ActionTracker<T> {
    fn default() -> Self {
        let (state, _) = watch::channel(ActionState::default());
        Self { state }
    }
}

impl<T: Clone> ActionTracker<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `action`, keeping the last successful result in `data`.
    /// # Errors
    /// Returns the action's error after recording it; `data` keeps its prior value.
    pub async fn execute<F>(&self, action: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        self.state.send_modify(|state| state.error = None);
        let _loading = LoadingGuard::raise(&self.state, loading_flag::<T>);

        let result = action.await;

        self.state.send_modify(|state| {
            state.is_loading = false;
            match &result {
                Ok(value) => state.data = Some(value.clone()),
                Err(err) => state.error = Some(err.clone()),
            }
        });

        result
    }

    /// Forgets the last result and error.
    pub fn reset(&self) {
        self.state.send_modify(|state| {
            state.data = None;
            state.error = None;
        });
    }

    #[must_use]
    pub fn snapshot(&self) -> ActionState<T> {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn data(&self) -> Option<T> {
        self.state.borrow().data.clone()
    }

    #[must_use]
    pub fn error(&self) -> Option<ApiError> {
        self.state.borrow().error.clone()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ActionState<T>> {
        self.state.subscribe()
    }
}
