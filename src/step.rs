/// One step of a suspended computation: either it handed out a value and can be
/// resumed, or it has finished with a final outcome.
///
/// `Step` is the message type of every session's data channel and the return
/// type of [`Sans::next`](crate::Sans::next).
///
/// ```rust
/// use yielder::Step;
///
/// let done: Step<u32, u8> = Step::Complete(2);
/// assert_eq!(done.map_complete(|d| d * 10), Step::Complete(20));
/// assert_eq!(Step::<u32, u8>::Yielded(7).unwrap_yielded(), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step<Y, D> {
    /// A value was handed out; the computation waits to be resumed
    Yielded(Y),
    /// The computation is over
    Complete(D),
}

impl<Y, D> Step<Y, D> {
    pub const fn is_yielded(&self) -> bool {
        matches!(self, Step::Yielded(_))
    }

    pub const fn is_complete(&self) -> bool {
        matches!(self, Step::Complete(_))
    }

    /// Transform the final outcome, passing a yielded value through.
    pub fn map_complete<D2, F>(self, f: F) -> Step<Y, D2>
    where
        F: FnOnce(D) -> D2,
    {
        match self {
            Step::Yielded(y) => Step::Yielded(y),
            Step::Complete(d) => Step::Complete(f(d)),
        }
    }

    /// # Panics
    ///
    /// Panics if the computation had already completed.
    pub fn unwrap_yielded(self) -> Y {
        match self {
            Step::Yielded(y) => y,
            Step::Complete(_) => panic!("called `Step::unwrap_yielded()` on a `Complete` value"),
        }
    }

    /// # Panics
    ///
    /// Panics if the computation yielded instead of completing.
    pub fn unwrap_complete(self) -> D {
        match self {
            Step::Yielded(_) => panic!("called `Step::unwrap_complete()` on a `Yielded` value"),
            Step::Complete(d) => d,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_complete_leaves_yielded_alone() {
        let value: Step<&str, u8> = Step::Yielded("foo");
        let done: Step<&str, u8> = Step::Complete(3);

        assert_eq!(value.map_complete(|d| d + 1), Step::Yielded("foo"));
        assert_eq!(done.map_complete(|d| d + 1), Step::Complete(4));
        assert!(value.is_yielded() && !value.is_complete());
        assert!(done.is_complete() && !done.is_yielded());
    }

    #[test]
    #[should_panic(expected = "called `Step::unwrap_complete()` on a `Yielded` value")]
    fn test_unwrap_complete_on_yielded_panics() {
        Step::<i32, ()>::Yielded(1).unwrap_complete();
    }

    #[test]
    #[should_panic(expected = "called `Step::unwrap_yielded()` on a `Complete` value")]
    fn test_unwrap_yielded_on_complete_panics() {
        Step::<(), i32>::Complete(1).unwrap_yielded();
    }
}
