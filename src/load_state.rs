// ⏳ Load State - one state machine for every list view
//
//   Idle ──Start──▶ Loading ──Succeed──▶ Ready
//                      │
//                      └────Fail──────▶ Failed
//
// Ready/Failed accept Start again (reload). Reset goes back to Idle from
// anywhere. Every other (state, event) pair is ignored.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "lowercase")]
pub enum LoadState<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadEvent<T> {
    Start,
    Succeed(T),
    Fail(String),
    Reset,
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Idle
    }
}

impl<T> LoadState<T> {
    /// The single transition function.
    pub fn transition(self, event: LoadEvent<T>) -> LoadState<T> {
        match (self, event) {
            (_, LoadEvent::Reset) => LoadState::Idle,
            (LoadState::Loading, LoadEvent::Succeed(value)) => LoadState::Ready(value),
            (LoadState::Loading, LoadEvent::Fail(reason)) => LoadState::Failed(reason),
            (LoadState::Loading, LoadEvent::Start) => LoadState::Loading,
            (_, LoadEvent::Start) => LoadState::Loading,
            (state, _) => state,
        }
    }

    /// Start, then settle with the outcome of `result`.
    pub fn resolve<E: std::fmt::Display>(self, result: Result<T, E>) -> LoadState<T> {
        let loading = self.transition(LoadEvent::Start);
        match result {
            Ok(value) => loading.transition(LoadEvent::Succeed(value)),
            Err(e) => loading.transition(LoadEvent::Fail(e.to_string())),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready(_))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> LoadState<U> {
        match self {
            LoadState::Idle => LoadState::Idle,
            LoadState::Loading => LoadState::Loading,
            LoadState::Ready(value) => LoadState::Ready(f(value)),
            LoadState::Failed(reason) => LoadState::Failed(reason),
        }
    }
}

impl<R> LoadState<Vec<R>> {
    /// Failed and unfinished loads render as an empty collection.
    pub fn items_or_empty(&self) -> &[R] {
        match self {
            LoadState::Ready(items) => items,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type State = LoadState<Vec<u32>>;

    #[test]
    fn test_happy_path() {
        let state = State::default()
            .transition(LoadEvent::Start)
            .transition(LoadEvent::Succeed(vec![1, 2]));
        assert!(state.is_ready());
        assert_eq!(state.items_or_empty(), &[1, 2]);
    }

    #[test]
    fn test_failure_degrades_to_empty() {
        let state = State::Idle
            .transition(LoadEvent::Start)
            .transition(LoadEvent::Fail("network".to_string()));
        assert_eq!(state.error(), Some("network"));
        assert!(state.items_or_empty().is_empty());
    }

    #[test]
    fn test_ignored_transitions() {
        // Outcomes only count while loading
        assert_eq!(State::Idle.transition(LoadEvent::Succeed(vec![1])), State::Idle);
        assert_eq!(
            State::Ready(vec![1]).transition(LoadEvent::Fail("late".to_string())),
            State::Ready(vec![1])
        );
        assert_eq!(
            State::Failed("x".to_string()).transition(LoadEvent::Succeed(vec![2])),
            State::Failed("x".to_string())
        );
    }

    #[test]
    fn test_reload_and_reset() {
        let ready = State::Ready(vec![1]);
        assert_eq!(ready.clone().transition(LoadEvent::Start), State::Loading);
        assert_eq!(ready.transition(LoadEvent::Reset), State::Idle);
        assert_eq!(State::Loading.transition(LoadEvent::Start), State::Loading);
    }

    #[test]
    fn test_resolve() {
        let ok = State::Idle.resolve::<String>(Ok(vec![3]));
        assert_eq!(ok.value(), Some(&vec![3]));

        let failed = State::Ready(vec![1]).resolve(Err::<Vec<u32>, _>("boom"));
        assert_eq!(failed.error(), Some("boom"));
    }
}
