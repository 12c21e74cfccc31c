// A Registers struct.
//
// Contains a `count` of 5-bit registers packed into `u32` integers. Register
// values never exceed 32 - 4 + 1 = 29, so five bits are enough for every
// supported precision.
#[derive(Clone, Debug, PartialEq)]
pub struct Registers {
    // A buffer containing registers.
    buf:   Vec<u32>,
    // The number of registers stored in buf.
    count: usize,
}

impl Registers {
    // The register's size (in bits).
    pub const SIZE: usize = 5;
    // The number of registers that fit in a 32-bit integer.
    const COUNT_PER_WORD: usize = 32 / Self::SIZE;
    // A mask to get the lower register (from LSB).
    const MASK: u32 = (1 << Self::SIZE) - 1;

    // Creates a new Registers struct with capacity `count` registers.
    pub fn with_count(count: usize) -> Registers {
        Registers {
            buf:   vec![0; ceil(count, Self::COUNT_PER_WORD)],
            count: count,
        }
    }

    #[inline] // Returns an iterator that emits Register values.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.buf
            .iter()
            .flat_map(|val| {
                (0..Self::COUNT_PER_WORD)
                    .map(move |i| (val >> (i * Self::SIZE)) & Self::MASK)
            })
            .take(self.count)
    }

    #[inline] // Returns the value of the Register at `index`.
    #[allow(dead_code)]
    pub fn get(&self, index: usize) -> u32 {
        let (qu, rm) =
            (index / Self::COUNT_PER_WORD, index % Self::COUNT_PER_WORD);

        (self.buf[qu] >> (rm * Self::SIZE)) & Self::MASK
    }

    #[inline] // Sets the value of the Register at `index` to `value`,
              // if `value` is greater than its current value.
    pub fn set_greater(&mut self, index: usize, value: u32) {
        let (qu, rm) =
            (index / Self::COUNT_PER_WORD, index % Self::COUNT_PER_WORD);

        let cur = (self.buf[qu] >> (rm * Self::SIZE)) & Self::MASK;

        if value > cur {
            let mask = Self::MASK << (rm * Self::SIZE);

            self.buf[qu] =
                (self.buf[qu] & !mask) | ((value & Self::MASK) << (rm * Self::SIZE));
        }
    }

    #[inline] // Returns the size of the Registers in bytes.
    pub fn size_in_bytes(&self) -> usize {
        4 * self.buf.len()
    }
}

// Estimation helpers shared by the HyperLogLog estimator.
pub trait HyperLogLogCommon {
    #[inline] // Returns the "raw" HyperLogLog estimate as defined by
              // P. Flajolet et al. for `count` registers.
              //
              // Also returns the count of registers set to 0.
    fn estimate_raw<I>(registers: I, count: usize, alpha: f64) -> (f64, usize)
    where
        I: Iterator<Item = u32>,
    {
        let (mut raw, mut zeros) = (0.0, 0);

        for value in registers {
            raw += 1.0 / (1u64 << value) as f64;
            zeros += if value == 0 { 1 } else { 0 };
        }

        raw = alpha * (count * count) as f64 / raw;

        (raw, zeros)
    }

    #[inline] // Estimates the count of distinct elements using linear
              // counting.
    fn linear_count(count: usize, zeros: usize) -> f64 {
        count as f64 * (count as f64 / zeros as f64).ln()
    }

    #[inline] // Returns the alpha constant based on the register count.
    fn alpha(count: usize) -> f64 {
        match count {
            16 => 0.673,
            32 => 0.697,
            64 => 0.709,
            _ => 0.7213 / (1.0 + 1.079 / count as f64),
        }
    }

    #[inline] // Returns the number of registers based on precision.
    fn register_count(precision: u8) -> usize {
        1 << precision
    }
}

#[inline] // Returns the int ceil of num, denom.
pub fn ceil(num: usize, denom: usize) -> usize {
    (num + denom - 1) / denom
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Common;

    impl HyperLogLogCommon for Common {}

    #[test]
    fn test_registers_set_greater() {
        let mut registers = Registers::with_count(10);

        assert_eq!(registers.buf.len(), 2);

        registers.set_greater(1, 0);

        assert_eq!(registers.buf, vec![0, 0]);

        registers.set_greater(1, 0b11);

        assert_eq!(registers.buf, vec![0b1100000, 0]);
        assert_eq!(registers.get(1), 0b11);

        registers.set_greater(9, 0x7);

        assert_eq!(registers.buf, vec![0b1100000, 0x7 << 15]);

        registers.set_greater(1, 0b10);

        assert_eq!(registers.get(1), 0b11);

        registers.set_greater(9, 29);

        assert_eq!(registers.get(9), 29);
        assert_eq!(registers.get(8), 0);
        assert_eq!(registers.get(0), 0);
    }

    #[test]
    fn test_registers_iter() {
        let mut registers = Registers::with_count(13);

        for i in 0..13 {
            registers.set_greater(i, (i as u32) + 1);
        }

        let values: Vec<u32> = registers.iter().collect();

        assert_eq!(values, (1..=13).collect::<Vec<u32>>());
        assert_eq!(registers.size_in_bytes(), 12);
    }

    #[test]
    fn test_alpha() {
        assert_eq!(Common::alpha(16), 0.673);
        assert_eq!(Common::alpha(32), 0.697);
        assert_eq!(Common::alpha(64), 0.709);
        assert_eq!(Common::alpha(1024), 0.7213 / (1.0 + 1.079 / 1024.0));
    }

    #[test]
    fn test_estimate_raw() {
        let registers = vec![0u32; 16];

        let (raw, zeros) =
            Common::estimate_raw(registers.into_iter(), 16, Common::alpha(16));

        assert_eq!(zeros, 16);
        assert!((raw - 0.673 * 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_count() {
        assert_eq!(Common::linear_count(1024, 1024), 0.0);
        assert!((Common::linear_count(16, 8) - 16.0 * 2f64.ln()).abs() < 1e-12);
    }
}
