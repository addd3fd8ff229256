use crate::registers::BRR;
use tock_registers::fields::FieldValue;

/// USART baud-rate divisor in units of 1/16 of the peripheral clock.
///
/// The divisor is the peripheral clock divided by the baud rate, rounded to the nearest
/// integer (halves round up). With 16x oversampling the upper bits form the BRR mantissa and the
/// low four bits the fraction.
///
/// A divisor of zero, or one whose mantissa does not fit in 12 bits, means the requested baud
/// rate cannot be produced from this clock. That is a configuration mistake; the bits that do
/// not fit are dropped when programming BRR.
#[derive(Clone, Copy, Debug, PartialEq, Eq, defmt::Format)]
pub struct BaudDivisor(u32);

impl BaudDivisor {
    /// Divisor for `baud_rate` from a peripheral clock of `pclk` Hz.
    ///
    /// `baud_rate` must be non-zero.
    pub const fn new(pclk: u32, baud_rate: u32) -> Self {
        Self(div_round_closest(pclk, baud_rate))
    }

    /// The whole divisor.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Integer part, `divisor / 16`.
    pub const fn mantissa(self) -> u32 {
        self.0 / 16
    }

    /// Fractional part in sixteenths, `divisor % 16`.
    pub const fn fraction(self) -> u32 {
        self.0 % 16
    }

    /// The BRR fields for this divisor.
    pub fn brr(self) -> FieldValue<u32, BRR::Register> {
        BRR::DIV_MANTISSA.val(self.mantissa()) + BRR::DIV_FRACTION.val(self.fraction())
    }

    /// Baud rate the hardware actually produces from `pclk` with this divisor, rounded to the
    /// nearest integer. Zero if the divisor is zero.
    pub const fn actual_baud(self, pclk: u32) -> u32 {
        if self.0 == 0 {
            return 0;
        }
        div_round_closest(pclk, self.0)
    }
}

/// `n / d` rounded to the nearest integer, halves away from zero.
const fn div_round_closest(n: u32, d: u32) -> u32 {
    let n = n as u64;
    let d = d as u64;
    ((n + d / 2) / d) as u32
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rounds_to_nearest() {
        // 416.67 truncates to 416.
        assert_eq!(BaudDivisor::new(48_000_000, 115_200).get(), 417);
        // 729.17
        assert_eq!(BaudDivisor::new(84_000_000, 115_200).get(), 729);
        assert_eq!(BaudDivisor::new(84_000_000, 250_000).get(), 336);
    }

    #[test]
    fn exact_half_rounds_up() {
        assert_eq!(BaudDivisor::new(100, 8).get(), 13);
        assert_eq!(BaudDivisor::new(99, 8).get(), 12);
    }

    #[test]
    fn no_overflow_near_u32_max() {
        assert_eq!(BaudDivisor::new(u32::MAX, 1).get(), u32::MAX);
        assert_eq!(BaudDivisor::new(u32::MAX, 2).get(), 1 << 31);
    }

    #[test]
    fn splits_into_mantissa_and_fraction() {
        let div = BaudDivisor::new(48_000_000, 115_200);
        assert_eq!(div.mantissa(), 26);
        assert_eq!(div.fraction(), 1);
        // With the mantissa at bit 4 the register value equals the divisor.
        assert_eq!(div.brr().value, 417);
    }

    #[test]
    fn oversized_mantissa_is_masked() {
        // 16 MHz / 100 baud = 160000, mantissa 10000 needs 14 bits.
        let div = BaudDivisor::new(16_000_000, 100);
        assert_eq!(div.brr().value, 160_000 & 0xFFFF);
    }

    #[test]
    fn actual_baud_from_divisor() {
        let div = BaudDivisor::new(48_000_000, 115_200);
        assert_eq!(div.actual_baud(48_000_000), 115_108);
        assert_eq!(BaudDivisor::new(10, 100).actual_baud(10), 0);
    }
}
