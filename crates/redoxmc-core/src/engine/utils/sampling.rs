use rand::Rng;

/// Draws `u ~ U[0, 1)` and reports whether `u < probability`.
///
/// Exactly one value is consumed from `rng` regardless of the outcome, so the
/// number of draws per molecule step depends only on which branches are attempted.
#[inline]
pub fn draw_event<R: Rng + ?Sized>(probability: f64, rng: &mut R) -> bool {
    rng.r#gen::<f64>() < probability
}

/// Picks one element uniformly; `None` for an empty slice, without consuming randomness.
#[inline]
pub fn choose_uniform<'a, T, R: Rng + ?Sized>(items: &'a [T], rng: &mut R) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..items.len());
    items.get(index)
}
