/// A per-slot version counter whose low bit records slot liveness.
///
/// The counter starts at zero (dead). Constructing a value in the slot sets the
/// alive bit; removing the value clears it and advances the counter by two, so
/// the counter increases monotonically (modulo wrap) across the slot's whole
/// insert/remove history. A handle that captured an earlier generation can never
/// match the slot again, no matter how often the slot is reused.
///
/// The wrap is at 128 removals: after that, a handle from exactly 128 cycles ago
/// would match again. The counter is deliberately one byte wide to keep the
/// generation sub-array dense for bulk liveness scans; callers needing longer
/// protection windows should size capacity so handles do not outlive 128 reuses
/// of one slot.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Generation(u8);

impl Generation {
    const ALIVE_MASK: u8 = 1;

    /// The raw counter value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Whether the slot this counter belongs to holds a constructed value.
    #[inline]
    #[must_use]
    pub const fn is_alive(self) -> bool {
        self.0 & Self::ALIVE_MASK != 0
    }

    /// Marks the slot alive. Called exactly once per construction.
    #[inline]
    pub(crate) const fn set_alive(&mut self) {
        self.0 |= Self::ALIVE_MASK;
    }

    /// Clears the alive bit and advances the counter by two.
    ///
    /// This single bump is what invalidates every handle that captured the
    /// slot's previous generation.
    #[inline]
    pub(crate) const fn set_dead_and_advance(&mut self) {
        self.0 = (self.0 & !Self::ALIVE_MASK).wrapping_add(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_dead_at_zero() {
        let generation = Generation::default();
        assert_eq!(generation.value(), 0);
        assert!(!generation.is_alive());
    }

    #[test]
    fn alive_bit_round_trip() {
        let mut generation = Generation::default();

        generation.set_alive();
        assert!(generation.is_alive());
        assert_eq!(generation.value(), 1);

        generation.set_dead_and_advance();
        assert!(!generation.is_alive());
        assert_eq!(generation.value(), 2);
    }

    #[test]
    fn advancing_never_repeats_within_the_window() {
        let mut generation = Generation::default();
        let mut seen = std::collections::HashSet::new();

        for _ in 0..128 {
            generation.set_alive();
            assert!(seen.insert(generation.value()), "generation repeated early");
            generation.set_dead_and_advance();
            assert!(seen.insert(generation.value()), "generation repeated early");
        }
    }

    #[test]
    fn wraps_after_the_window() {
        let mut generation = Generation::default();
        for _ in 0..128 {
            generation.set_dead_and_advance();
        }
        assert_eq!(generation.value(), 0);
    }
}
