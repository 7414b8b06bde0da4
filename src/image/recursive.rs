//! Generic recursive data structure, used to generalize over an arbitrary, fixed
//! number of channels at compile time. A tuple such as `(Sample, Sample, Sample)`
//! is converted into nested `Recursive` values, allowing channel-generic code
//! (readers, writers, channel descriptions) to be implemented once and applied to
//! any channel count via trait recursion instead of runtime dispatch.

/// The end of a recursive type, marking that there are no more channels.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NoneMore;

/// A recursive data structure, containing one value and a reference to the previous values.
/// Mainly used to represent an exr image with an arbitrary number of channels, at compile time,
/// without allocating a vector. The number of recursion levels equals the number of channels.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct Recursive<Inner, Value> {

    /// The remaining values of this recursive iterator
    pub inner: Inner,

    /// The most recently added value of this recursive iterator
    pub value: Value,
}

impl<Inner, Value> Recursive<Inner, Value> {
    /// Create a new recursive data structure, adding a new value to the inner value.
    pub fn new(inner: Inner, value: Value) -> Self { Self { inner, value } }
}

/// Convert a flat tuple into the nested `Recursive` representation used internally
/// to generalize over an arbitrary number of channels.
pub trait IntoRecursive {

    /// The recursive type that represents this tuple.
    type Recursive;

    /// Create a recursive type from this tuple, offering a generic interface for any channel count.
    fn into_recursive(self) -> Self::Recursive;
}

impl IntoRecursive for NoneMore {
    type Recursive = Self;
    fn into_recursive(self) -> Self::Recursive { self }
}

impl<Inner, Value> IntoRecursive for Recursive<Inner, Value> {
    type Recursive = Self;
    fn into_recursive(self) -> Self::Recursive { self }
}

impl IntoRecursive for () {
    type Recursive = NoneMore;
    fn into_recursive(self) -> Self::Recursive { NoneMore }
}

impl<T> IntoRecursive for (T,) {
    type Recursive = Recursive<NoneMore, T>;
    fn into_recursive(self) -> Self::Recursive { Recursive::new(NoneMore, self.0) }
}

impl<T1, T2> IntoRecursive for (T1, T2) {
    type Recursive = Recursive<Recursive<NoneMore, T1>, T2>;
    fn into_recursive(self) -> Self::Recursive {
        Recursive::new(Recursive::new(NoneMore, self.0), self.1)
    }
}

impl<T1, T2, T3> IntoRecursive for (T1, T2, T3) {
    type Recursive = Recursive<Recursive<Recursive<NoneMore, T1>, T2>, T3>;
    fn into_recursive(self) -> Self::Recursive {
        Recursive::new(Recursive::new(Recursive::new(NoneMore, self.0), self.1), self.2)
    }
}

impl<T1, T2, T3, T4> IntoRecursive for (T1, T2, T3, T4) {
    type Recursive = Recursive<Recursive<Recursive<Recursive<NoneMore, T1>, T2>, T3>, T4>;
    fn into_recursive(self) -> Self::Recursive {
        Recursive::new(
            Recursive::new(Recursive::new(Recursive::new(NoneMore, self.0), self.1), self.2),
            self.3,
        )
    }
}

/// Convert the recursive `Recursive<.., Value>` representation back into a flat tuple.
pub trait IntoNonRecursive {

    /// The flat tuple equivalent of this recursive type.
    type NonRecursive;

    /// Flatten the nested `Recursive` type back into a plain tuple.
    fn into_non_recursive(self) -> Self::NonRecursive;
}

impl IntoNonRecursive for NoneMore {
    type NonRecursive = ();
    fn into_non_recursive(self) -> Self::NonRecursive {}
}

impl<T> IntoNonRecursive for Recursive<NoneMore, T> {
    type NonRecursive = (T,);
    fn into_non_recursive(self) -> Self::NonRecursive { (self.value,) }
}

impl<T1, T2> IntoNonRecursive for Recursive<Recursive<NoneMore, T1>, T2> {
    type NonRecursive = (T1, T2);
    fn into_non_recursive(self) -> Self::NonRecursive { (self.inner.value, self.value) }
}

impl<T1, T2, T3> IntoNonRecursive for Recursive<Recursive<Recursive<NoneMore, T1>, T2>, T3> {
    type NonRecursive = (T1, T2, T3);
    fn into_non_recursive(self) -> Self::NonRecursive {
        (self.inner.inner.value, self.inner.value, self.value)
    }
}

impl<T1, T2, T3, T4> IntoNonRecursive for Recursive<Recursive<Recursive<Recursive<NoneMore, T1>, T2>, T3>, T4> {
    type NonRecursive = (T1, T2, T3, T4);
    fn into_non_recursive(self) -> Self::NonRecursive {
        (self.inner.inner.inner.value, self.inner.inner.value, self.inner.value, self.value)
    }
}
