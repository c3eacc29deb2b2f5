//! Benchmarking support.
//!
//! Deterministic name sets for the criterion benchmarks, shaped like content
//! names: a few shared top-level components fanning out into longer tails.

/// Generates `count` distinct names.
///
/// The same `seed` always yields the same names in the same order.
pub fn synthetic_names(count: usize, seed: u64) -> Vec<String> {
    const ROOTS: [&str; 4] = ["ndn", "ccn", "edu", "org"];
    const SITES: [&str; 6] = ["uofa", "ucla", "mit", "cmu", "epfl", "kaist"];
    const SECTIONS: [&str; 5] = ["cs", "ece", "math", "lib", "admin"];

    let mut rng = fastrand::Rng::with_seed(seed);

    (0..count)
        .map(|i| {
            let root = ROOTS[rng.usize(..ROOTS.len())];
            let site = SITES[rng.usize(..SITES.len())];
            let section = SECTIONS[rng.usize(..SECTIONS.len())];
            format!("/{root}/{site}/{section}/obj{:x}/v{i}", rng.u16(..0x1000))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_names_are_deterministic_and_distinct() {
        let a = synthetic_names(100, 7);
        assert_eq!(a, synthetic_names(100, 7));

        let mut sorted = a.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 100);
        assert!(a.iter().all(|name| name.starts_with('/')));
    }
}
