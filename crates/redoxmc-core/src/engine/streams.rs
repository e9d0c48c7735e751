use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Random stream owned by a single molecule for the whole run.
pub type MoleculeRng = Xoshiro256PlusPlus;

/// Derives one independent stream per molecule from a master seed.
///
/// Stream `i` always belongs to molecule `i`, so a run is reproducible for a given
/// seed no matter how molecules are scheduled across threads.
pub fn from_seed(seed: u64, molecules: usize) -> Vec<MoleculeRng> {
    let mut master = Xoshiro256PlusPlus::seed_from_u64(seed);
    (0..molecules)
        .map(|_| Xoshiro256PlusPlus::seed_from_u64(master.r#gen()))
        .collect()
}

/// Like [`from_seed`] with a master seed drawn from the thread-local generator.
/// The chosen seed is returned so the run can be repeated.
pub fn from_entropy(molecules: usize) -> (u64, Vec<MoleculeRng>) {
    let seed: u64 = rand::thread_rng().r#gen();
    (seed, from_seed(seed, molecules))
}
