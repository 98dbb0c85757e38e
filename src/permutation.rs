//! Seeded permutation table for gradient noise hashing
//!
//! Holds the values 0-255 shuffled by a linear congruential generator,
//! followed by a verbatim copy so that `table[table[x] + y + 1]` never
//! needs a modulo.

const LCG_MULTIPLIER: u64 = 1_103_515_245;
const LCG_INCREMENT: u64 = 12_345;
const LCG_MODULUS: u64 = 1 << 31;

/// Number of distinct entries before the wrap-around copy
pub const PERMUTATION_SIZE: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermutationTable {
    values: [u8; PERMUTATION_SIZE * 2],
}

impl PermutationTable {
    /// Build the table for a seed
    ///
    /// # Arguments
    /// * `seed` - Any integer; only its absolute value modulo 2^31 matters
    ///
    /// # Returns
    /// * `PermutationTable` - 512 entries, every byte value exactly twice
    pub fn new(seed: i64) -> Self {
        let mut values = [0u8; PERMUTATION_SIZE * 2];
        for (i, value) in values.iter_mut().take(PERMUTATION_SIZE).enumerate() {
            *value = i as u8;
        }

        let mut state = seed.unsigned_abs() % LCG_MODULUS;

        // Fisher-Yates, walking down from the last index
        for i in (1..PERMUTATION_SIZE).rev() {
            state = (LCG_MULTIPLIER * state + LCG_INCREMENT) % LCG_MODULUS;
            let j = (state % (i as u64 + 1)) as usize;
            values.swap(i, j);
        }

        values.copy_within(0..PERMUTATION_SIZE, PERMUTATION_SIZE);

        PermutationTable { values }
    }

    /// Look up an entry; `index` must be below 512
    #[inline]
    pub fn get(&self, index: usize) -> u8 {
        self.values[index]
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_length() {
        let table = PermutationTable::new(12345);
        assert_eq!(table.as_slice().len(), 512);
    }

    #[test]
    fn test_every_value_appears_twice() {
        for seed in [0, 1, 42, -42, 99999, i64::MAX, i64::MIN] {
            let table = PermutationTable::new(seed);
            let mut counts = [0u32; 256];
            for &value in table.as_slice() {
                counts[value as usize] += 1;
            }
            assert!(counts.iter().all(|&c| c == 2), "seed {} has uneven counts", seed);
        }
    }

    #[test]
    fn test_second_half_copies_first() {
        let table = PermutationTable::new(7);
        let values = table.as_slice();
        assert_eq!(&values[..256], &values[256..]);
    }

    #[test]
    fn test_same_seed_is_deterministic() {
        assert_eq!(PermutationTable::new(99999), PermutationTable::new(99999));
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = PermutationTable::new(111);
        let b = PermutationTable::new(222);
        assert_ne!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn test_negative_seed_matches_positive() {
        assert_eq!(PermutationTable::new(-31337), PermutationTable::new(31337));
    }
}
