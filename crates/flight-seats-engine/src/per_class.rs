//! Fixed-size map from fare class to a value

use std::ops::{Index, IndexMut};

use flight_seats_core::FareClass;

/// One `T` per fare class, stored in cabin order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PerClass<T>([T; 3]);

impl<T> PerClass<T> {
    /// Build the map by calling `f` once per class, in cabin order
    pub fn from_fn(mut f: impl FnMut(FareClass) -> T) -> Self {
        Self(std::array::from_fn(|i| f(FareClass::ALL[i])))
    }

    /// Iterate over `(class, value)` pairs in cabin order
    pub fn iter(&self) -> impl Iterator<Item = (FareClass, &T)> {
        FareClass::ALL.into_iter().zip(self.0.iter())
    }
}

impl<T> Index<FareClass> for PerClass<T> {
    type Output = T;

    #[inline]
    fn index(&self, class: FareClass) -> &T {
        &self.0[class.index()]
    }
}

impl<T> IndexMut<FareClass> for PerClass<T> {
    #[inline]
    fn index_mut(&mut self, class: FareClass) -> &mut T {
        &mut self.0[class.index()]
    }
}
