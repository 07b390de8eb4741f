//! Blinded division.
//!
//! The coprocessor can only divide a ciphertext by a cleartext. To evaluate `N / D`
//! with both operands encrypted, both are multiplied by the same secret factor `r`,
//! only `D·r` is decrypted, and the quotient is rebuilt as `(N·r) / clear(D·r)`.
//! Division invariance makes the result equal to `⌊N / D⌋`.
//!
//! Every product formed here must fit in 128 bits. Call sites prove this at compile
//! time with [`fits_u128`] against [`MAX_BALANCE`] and the domain's largest factor.

use confidential_amm_primitives::{Cipher, FheOps, FheType};
use frame_support::pallet_prelude::RuntimeDebug;

/// Largest amount, reserve or LP supply the pair admits (48-bit, i.e. the whole supply
/// of a 6-decimal token capped at ~281M units). Staged amounts that would cross it are
/// handed back, see [`crate::math::Admission`].
pub const MAX_BALANCE: u128 = (1 << 48) - 1;

/// Swap fee, folded into the blinding factor: the numerator is blinded by `r·99` and
/// the denominator by `r·100`.
pub const FEE_NUMERATOR: u128 = 99;
pub const FEE_DENOMINATOR: u128 = 100;

/// Range `[low, low + span)` a blinding factor is drawn from.
#[derive(Clone, Copy, PartialEq, Eq, RuntimeDebug)]
pub struct BlindingDomain {
    pub low: u128,
    pub span: u128,
}

impl BlindingDomain {
    pub const fn new(low: u128, span: u128) -> Self {
        assert!(low > 0, "a zero blinding factor would decrypt to zero");
        assert!(span.is_power_of_two(), "coprocessor randomness is bounded by powers of two");
        Self { low, span }
    }

    /// Largest factor the domain can produce.
    pub const fn max_factor(&self) -> u128 {
        self.low + self.span - 1
    }

    /// Fresh encrypted factor, 128-bit wide.
    pub fn draw<F: FheOps>(&self) -> Cipher {
        let r = F::random_bounded(self.span, FheType::U128);
        F::add_scalar(&r, self.low)
    }
}

/// Domain shared by every ratio the pair computes.
pub const BLINDING: BlindingDomain = BlindingDomain::new(1, 1 << 16);

/// `true` iff the product of `factors` does not overflow `u128`.
pub const fn fits_u128(factors: &[u128]) -> bool {
    let mut acc: u128 = 1;
    let mut i = 0;
    while i < factors.len() {
        match acc.checked_mul(factors[i]) {
            Some(next) => acc = next,
            None => return false,
        }
        i += 1;
    }
    true
}

/// Numerator and denominator multiplied by the same secret factor.
#[derive(Clone, Copy, PartialEq, Eq, RuntimeDebug)]
pub struct BlindedRatio {
    /// Stays encrypted until settlement.
    pub numerator: Cipher,
    /// Sent to the gateway for decryption.
    pub denominator: Cipher,
}

impl BlindedRatio {
    pub fn new<F: FheOps>(numerator: &Cipher, denominator: &Cipher, factor: &Cipher) -> Self {
        Self {
            numerator: F::mul(&widen::<F>(numerator), factor),
            denominator: F::mul(&widen::<F>(denominator), factor),
        }
    }

    /// Same as [`BlindedRatio::new`] but resolving to `⌊99·N / (100·D)⌋`.
    pub fn with_fee<F: FheOps>(numerator: &Cipher, denominator: &Cipher, factor: &Cipher) -> Self {
        let numerator_factor = F::mul_scalar(factor, FEE_NUMERATOR);
        let denominator_factor = F::mul_scalar(factor, FEE_DENOMINATOR);
        Self {
            numerator: F::mul(&widen::<F>(numerator), &numerator_factor),
            denominator: F::mul(&widen::<F>(denominator), &denominator_factor),
        }
    }
}

/// Rebuild the encrypted quotient from a blinded numerator and the decrypted blinded
/// denominator. `None` when the denominator decrypted to zero.
pub fn unblind<F: FheOps>(numerator: &Cipher, denominator: u128, out: FheType) -> Option<Cipher> {
    if denominator == 0 {
        return None;
    }
    Some(F::cast(&F::div_scalar(numerator, denominator), out))
}

/// Lift to the 128-bit width all blinded products live in.
pub fn widen<F: FheOps>(ct: &Cipher) -> Cipher {
    if ct.ty == FheType::U128 {
        *ct
    } else {
        F::cast(ct, FheType::U128)
    }
}
