use std::alloc::Layout;
use std::convert::Infallible;
use std::fmt;

/// Errors reported by the structural operations of a [`List`](crate::List).
///
/// Both kinds are detected before the list is touched, so a returned error
/// always means the list is exactly as it was before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListError {
    /// Growing the list by `additional` nodes would make it longer than `max`.
    LengthExceeded {
        len: usize,
        additional: usize,
        max: usize,
    },
    /// The node provider could not hand out a slot for a node.
    AllocFailed { layout: Layout },
}

impl ListError {
    /// Escalate the error the way the infallible std collections do: abort through
    /// the allocation error hook, or panic on a length overflow.
    #[cold]
    #[track_caller]
    pub(crate) fn raise(self) -> ! {
        match self {
            ListError::AllocFailed { layout } => std::alloc::handle_alloc_error(layout),
            err => panic!("{}", err),
        }
    }
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListError::LengthExceeded {
                len,
                additional,
                max,
            } => write!(
                f,
                "list length {} plus {} would exceed the maximum of {}",
                len, additional, max
            ),
            ListError::AllocFailed { layout } => write!(
                f,
                "failed to allocate a list node of {} bytes",
                layout.size()
            ),
        }
    }
}

impl std::error::Error for ListError {}

/// Error of the `try_*` constructors and batch inserts that build values with a
/// fallible closure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TryBuildError<E> {
    /// The list itself refused the operation.
    List(ListError),
    /// The element constructor failed.
    Construct(E),
}

impl<E> TryBuildError<E> {
    /// Returns the constructor error, if that is what failed.
    pub fn into_construct(self) -> Option<E> {
        match self {
            TryBuildError::Construct(err) => Some(err),
            TryBuildError::List(_) => None,
        }
    }
}

impl TryBuildError<Infallible> {
    #[cold]
    #[track_caller]
    pub(crate) fn raise(self) -> ! {
        match self {
            TryBuildError::List(err) => err.raise(),
            TryBuildError::Construct(never) => match never {},
        }
    }

    pub(crate) fn into_list_error(self) -> ListError {
        match self {
            TryBuildError::List(err) => err,
            TryBuildError::Construct(never) => match never {},
        }
    }
}

impl<E> From<ListError> for TryBuildError<E> {
    fn from(err: ListError) -> Self {
        TryBuildError::List(err)
    }
}

impl<E: fmt::Display> fmt::Display for TryBuildError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TryBuildError::List(err) => err.fmt(f),
            TryBuildError::Construct(err) => write!(f, "failed to construct a list element: {}", err),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for TryBuildError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TryBuildError::List(err) => Some(err),
            TryBuildError::Construct(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = ListError::LengthExceeded {
            len: 3,
            additional: 2,
            max: 4,
        };
        assert_eq!(
            err.to_string(),
            "list length 3 plus 2 would exceed the maximum of 4"
        );

        let err: TryBuildError<&str> = TryBuildError::Construct("boom");
        assert_eq!(err.to_string(), "failed to construct a list element: boom");
        assert_eq!(err.into_construct(), Some("boom"));
    }

    #[test]
    fn list_error_is_the_source() {
        use std::error::Error;
        let err: TryBuildError<String> = ListError::AllocFailed {
            layout: Layout::new::<u64>(),
        }
        .into();
        assert!(err.source().is_some());
        assert_eq!(err.into_construct(), None);
    }

    #[test]
    #[should_panic(expected = "would exceed the maximum")]
    fn raise_length_panics() {
        ListError::LengthExceeded {
            len: 1,
            additional: 1,
            max: 1,
        }
        .raise();
    }
}
