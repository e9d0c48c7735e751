use crate::core::models::vector::ModificationVector;
use itertools::Itertools;

/// Binomial coefficient C(n, k); zero when `k > n`.
pub fn binomial(n: usize, k: usize) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    (0..k).fold(1u64, |acc, i| acc * (n - i) as u64 / (i + 1) as u64)
}

/// All vectors over `sites` sites with exactly `grade` oxidized sites, in
/// lexicographic order of the oxidized site indices.
///
/// For three sites and grade one this yields `[100]`, `[010]`, `[001]`.
pub fn vectors_of_grade(sites: usize, grade: usize) -> Vec<ModificationVector> {
    if grade > sites {
        return Vec::new();
    }
    (0..sites)
        .combinations(grade)
        .map(|chosen| ModificationVector::from_sites(chosen, sites))
        .collect()
}
