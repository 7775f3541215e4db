use futures::stream::BoxStream;
use futures::StreamExt;

/// A window over an ordered stream: skip `offset` items, then yield at most `limit` items.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Slice {
    pub offset: usize,
    /// `None` means unbounded.
    pub limit: Option<usize>,
}

impl Slice {
    pub fn new(offset: usize, limit: Option<usize>) -> Self {
        Self { offset, limit }
    }

    /// Creates a slice from signed bounds. A negative offset is treated as zero and a negative
    /// limit means unbounded.
    pub fn from_signed(limit: i64, offset: i64) -> Self {
        Self {
            offset: usize::try_from(offset).unwrap_or(0),
            limit: usize::try_from(limit).ok(),
        }
    }

    /// Applies the slice to `stream`.
    pub fn apply<'a, T: Send + 'a>(self, stream: BoxStream<'a, T>) -> BoxStream<'a, T> {
        let stream = stream.skip(self.offset);
        match self.limit {
            Some(limit) => stream.take(limit).boxed(),
            None => stream.boxed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    async fn collect(slice: Slice, len: usize) -> Vec<usize> {
        slice
            .apply(stream::iter(0..len).boxed())
            .collect::<Vec<_>>()
            .await
    }

    #[tokio::test]
    async fn yields_the_expected_window() {
        for len in 0..5 {
            for offset in 0..6 {
                for limit in 0..6 {
                    let result = collect(Slice::new(offset, Some(limit)), len).await;
                    let expected = limit.min(len.saturating_sub(offset));
                    assert_eq!(result.len(), expected);
                    assert!(result.iter().copied().eq(offset..offset + expected));
                }
            }
        }
    }

    #[test]
    fn negative_bounds_are_normalized() {
        assert_eq!(Slice::from_signed(-1, -5), Slice::new(0, None));
        assert_eq!(Slice::from_signed(3, 2), Slice::new(2, Some(3)));
    }

    #[tokio::test]
    async fn unbounded_limit_yields_the_rest() {
        assert_eq!(collect(Slice::new(2, None), 5).await, vec![2, 3, 4]);
    }
}
