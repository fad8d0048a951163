use crate::error::FetchError;

/// Outcome of an asynchronous load.  `Deferred` carries the request it is
/// waiting for, so a late result of an older request is not mistaken for the
/// current one.
#[derive(Clone, Debug)]
pub enum Promise<T, D = (), E = FetchError> {
    Empty,
    Deferred(D),
    Resolved(T),
    Rejected(E),
}

impl<T, D, E> Promise<T, D, E> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }

    pub fn is_deferred(&self, def: &D) -> bool
    where
        D: PartialEq,
    {
        matches!(self, Self::Deferred(d) if d == def)
    }

    pub fn deferred(&self) -> Option<&D> {
        match self {
            Self::Deferred(def) => Some(def),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&E> {
        match self {
            Self::Rejected(err) => Some(err),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::Empty;
    }

    pub fn defer(&mut self, def: D) {
        *self = Self::Deferred(def);
    }

    pub fn resolve_or_reject(&mut self, res: Result<T, E>) {
        *self = match res {
            Ok(ok) => Self::Resolved(ok),
            Err(err) => Self::Rejected(err),
        };
    }

    /// Settle the promise with `res`, but only if it is still waiting for
    /// `def`.  Returns whether the result was taken.
    pub fn update(&mut self, (def, res): (D, Result<T, E>)) -> bool
    where
        D: PartialEq,
    {
        if self.is_deferred(&def) {
            self.resolve_or_reject(res);
            true
        } else {
            false
        }
    }

    /// Take a resolved value out, leaving the promise empty.  Other states are
    /// kept.
    pub fn take_resolved(&mut self) -> Option<T> {
        match std::mem::take(self) {
            Self::Resolved(val) => Some(val),
            other => {
                *self = other;
                None
            }
        }
    }
}

impl<T, D, E> Default for Promise<T, D, E> {
    fn default() -> Self {
        Self::Empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_ignores_other_requests() {
        let mut promise: Promise<u32, u64, FetchError> = Promise::Empty;
        promise.defer(2);
        assert!(!promise.update((1, Ok(10))));
        assert!(promise.is_deferred(&2));
        assert!(promise.update((2, Err(FetchError::NotFound))));
        assert_eq!(promise.error(), Some(&FetchError::NotFound));
    }

    #[test]
    fn take_resolved_leaves_empty() {
        let mut promise: Promise<u32, u64> = Promise::Resolved(7);
        assert_eq!(promise.take_resolved(), Some(7));
        assert!(matches!(promise, Promise::Empty));

        let mut rejected: Promise<u32, u64> = Promise::Rejected(FetchError::NotFound);
        assert_eq!(rejected.take_resolved(), None);
        assert_eq!(rejected.error(), Some(&FetchError::NotFound));
    }
}
