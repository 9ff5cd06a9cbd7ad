use std::ops::Range;

/// Identity of one worker inside a fixed pool of `workers` threads.
///
/// Workers never reach into shared loop bounds; they derive every owned
/// index range from this descriptor via [`span`](Self::span).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionDescriptor {
    pub id: usize,
    pub workers: usize,
}

impl PartitionDescriptor {
    pub fn new(id: usize, workers: usize) -> Self {
        assert!(workers > 0, "worker pool cannot be empty");
        assert!(id < workers, "worker id out of range");
        Self { id, workers }
    }

    /// Half-open index range owned by this worker over `extent` items:
    /// `[id * extent / workers, min((id + 1) * extent / workers, extent))`.
    ///
    /// The spans of all workers tile `[0, extent)` exactly. When
    /// `workers > extent` some spans are empty.
    pub fn span(&self, extent: usize) -> Range<usize> {
        let start = self.id * extent / self.workers;
        let end = ((self.id + 1) * extent / self.workers).min(extent);
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::PartitionDescriptor;

    #[test]
    fn spans_tile_the_extent_exactly() {
        for extent in [0usize, 1, 2, 3, 5, 7, 8, 16, 17, 100, 2048] {
            for workers in 1..=12usize {
                let mut covered = Vec::new();
                let mut prev_end = 0;
                for id in 0..workers {
                    let span = PartitionDescriptor::new(id, workers).span(extent);
                    assert!(span.start <= span.end);
                    assert_eq!(span.start, prev_end, "gap or overlap at worker {id}");
                    prev_end = span.end;
                    covered.extend(span);
                }
                assert_eq!(prev_end, extent);
                assert_eq!(covered, (0..extent).collect::<Vec<_>>());
            }
        }
    }

    #[test]
    fn more_workers_than_items_yields_empty_spans() {
        let spans: Vec<_> = (0..8)
            .map(|id| PartitionDescriptor::new(id, 8).span(3))
            .collect();
        let non_empty = spans.iter().filter(|s| !s.is_empty()).count();
        assert_eq!(non_empty, 3);
        assert_eq!(spans.last().map(|s| s.end), Some(3));
    }

    #[test]
    fn even_split_of_2048_rows_over_4_workers() {
        let spans: Vec<_> = (0..4)
            .map(|id| PartitionDescriptor::new(id, 4).span(2048))
            .collect();
        assert_eq!(spans, vec![0..512, 512..1024, 1024..1536, 1536..2048]);
    }

    #[test]
    #[should_panic(expected = "worker id out of range")]
    fn id_must_be_below_worker_count() {
        let _ = PartitionDescriptor::new(4, 4);
    }
}
