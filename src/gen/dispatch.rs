use rayon::iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};

use crate::error::Result;

/// Run `job(index, item)` for every item on a dedicated thread pool.
///
/// `nproc == 0` sizes the pool to the host's available parallelism. Results are
/// index-aligned with `items` whatever order the jobs finish in.
pub fn dispatch<T, R, F>(items: &[T], nproc: usize, job: F) -> Result<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Fn(usize, &T) -> R + Sync,
{
    let threadpool = rayon::ThreadPoolBuilder::new()
        .num_threads(nproc)
        .build()?;
    Ok(threadpool.install(|| {
        items
            .par_iter()
            .enumerate()
            .map(|(i, item)| job(i, item))
            .collect()
    }))
}
