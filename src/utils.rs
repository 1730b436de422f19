use itertools::Itertools;

/// Estimates how many elements of `T` fit in the L1 cache of a single core.
///
/// Used to decide the chunk size of parallel loops so that each task works on a
/// cache-resident slice. Approximates the L1 cache by 32 KB (128 KB on Apple Silicon).
#[must_use]
pub const fn workload_size<T: Sized>() -> usize {
    #[cfg(all(target_arch = "aarch64", target_os = "macos"))]
    const CACHE_SIZE: usize = 1 << 17;

    #[cfg(not(all(target_arch = "aarch64", target_os = "macos")))]
    const CACHE_SIZE: usize = 1 << 15;

    CACHE_SIZE / size_of::<T>()
}

/// Sorts and deduplicates a list of query indices.
///
/// Both parties must see the exact same list, so this is the only place where raw sampled
/// indices are turned into the set of positions the prover has to open.
#[must_use]
pub fn dedup_sorted(indices: Vec<usize>) -> Vec<usize> {
    indices.into_iter().sorted_unstable().dedup().collect()
}
