use std::future::Future;

use futures::future::join_all;
use indicatif::ProgressBar;

use crate::license::resolver::Resolution;
use crate::models::{Coordinate, Dependency};

/// Resolve every coordinate and return one row each, sorted by id.
///
/// Coordinates are resolved `batch_size` at a time; completion order within a
/// batch does not matter because the rows are sorted at the end.
pub async fn aggregate<F, Fut>(
    coordinates: &[Coordinate],
    batch_size: usize,
    progress: Option<&ProgressBar>,
    resolve: F,
) -> Vec<Dependency>
where
    F: Fn(Coordinate) -> Fut,
    Fut: Future<Output = Resolution>,
{
    let mut rows = Vec::with_capacity(coordinates.len());

    for batch in coordinates.chunks(batch_size.max(1)) {
        let resolutions = join_all(batch.iter().cloned().map(&resolve)).await;

        for (coordinate, resolution) in batch.iter().zip(resolutions) {
            rows.push(Dependency {
                id: coordinate.to_string(),
                licenses: resolution.licenses(),
                source: resolution.source(),
            });
            if let Some(pb) = progress {
                pb.inc(1);
            }
        }
    }

    rows.sort_by(|a, b| a.id.cmp(&b.id));
    rows
}
