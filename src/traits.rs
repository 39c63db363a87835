use crate::Array;

/// Implements collect to `Array`.
pub trait ArrayIterator: Iterator {
    /// Collects into an `Array`, sizing the first allocation from the lower size hint.
    fn into_array(self) -> Array<Self::Item>;

    /// Collects `Ok` items into an `Array`, stopping at the first `Err`.
    fn into_result_array<I, E>(self) -> Result<Array<I>, E>
        where
            Self: Iterator<Item=Result<I, E>>;
}

impl<Q: Iterator> ArrayIterator for Q {
    fn into_array(self) -> Array<Self::Item> {
        let (lower, _) = self.size_hint();
        let mut array = Array::with_capacity(lower);
        for item in self {
            array.push_back(item);
        }
        array
    }

    fn into_result_array<I, E>(self) -> Result<Array<I>, E>
        where
            Self: Iterator<Item=Result<I, E>>
    {
        let (lower, _) = self.size_hint();
        let mut array = Array::with_capacity(lower);
        for item in self {
            array.push_back(item?);
        }
        Ok(array)
    }
}

impl<T> FromIterator<T> for Array<T> {
    fn from_iter<I: IntoIterator<Item=T>>(iter: I) -> Array<T> {
        iter.into_iter().into_array()
    }
}
