//! Obfuscated reserves.
//!
//! After every reserve change the pair publishes `reserve × factor × multiplier` per
//! axis. `factor` is a random perturbation of ±0.70 %..3.25 % (never the identity) and
//! `multiplier` a random integer in `[1, 3]`; both are drawn independently for each axis,
//! and the two axes take complementary branches of their coin flips, so the mirrors carry
//! no common multiplicative bias. Anyone may obtain decrypt rights to them. The ratio of
//! the two values is the noisy price add-liquidity sizes deposits with.

use crate::{
    blinding::{self, widen, MAX_BALANCE},
    pallet::{Config, ObfuscatedReserves, Pallet},
    LOG_TARGET,
};
use confidential_amm_primitives::{Cipher, FheAcl, FheOps, FheType};
use frame_support::traits::Get;

/// Fixed-point one.
pub const OBFUSCATION_SCALE: u128 = 1_000_000;
/// Smallest perturbation, in basis points.
pub const NOISE_FLOOR_BPS: u128 = 70;
/// Number of distinct perturbations above the floor.
pub const NOISE_SPAN: u128 = 256;
/// Basis points expressed in `OBFUSCATION_SCALE` units.
pub const NOISE_STEP: u128 = 100;
/// Number of distinct multipliers, `1..=MULTIPLIER_RANGE`.
pub const MULTIPLIER_RANGE: u128 = 3;
/// The multiplier is `1 + rand[0, MULTIPLIER_DRAW_SPAN) mod MULTIPLIER_RANGE`. The span is
/// not a multiple of the range, which skews the draw by less than `2^-20`.
pub const MULTIPLIER_DRAW_SPAN: u128 = 1 << 20;

pub const MIN_OFFSET: u128 = NOISE_FLOOR_BPS * NOISE_STEP;
pub const MAX_OFFSET: u128 = (NOISE_FLOOR_BPS + NOISE_SPAN - 1) * NOISE_STEP;
pub const MAX_FACTOR: u128 = OBFUSCATION_SCALE + MAX_OFFSET;
pub const MAX_MULTIPLIER: u128 = MULTIPLIER_RANGE;

/// Largest value an obfuscated reserve can take.
pub const MAX_OBFUSCATED: u128 = MAX_BALANCE * MAX_FACTOR * MAX_MULTIPLIER;

const _: () = assert!(MAX_OFFSET < OBFUSCATION_SCALE);
const _: () = assert!(MULTIPLIER_DRAW_SPAN <= u32::MAX as u128);
const _: () = assert!(blinding::fits_u128(&[MAX_BALANCE, MAX_FACTOR, MAX_MULTIPLIER]));

/// Random factor `SCALE ± offset`. Which branch `coin` picks is flipped by `invert`.
fn noise_factor<F: FheOps>(invert: bool) -> Cipher {
    let p = F::cast(&F::random_bounded(NOISE_SPAN, FheType::U16), FheType::U128);
    let offset = F::mul_scalar(&F::add_scalar(&p, NOISE_FLOOR_BPS), NOISE_STEP);
    let upper = F::add_scalar(&offset, OBFUSCATION_SCALE);
    let lower = F::sub(&F::trivial_encrypt(OBFUSCATION_SCALE, FheType::U128), &offset);
    let coin = F::random_bool();
    if invert {
        F::select(&coin, &lower, &upper)
    } else {
        F::select(&coin, &upper, &lower)
    }
}

/// Random integer in `[1, MULTIPLIER_RANGE]`, 128-bit wide.
fn noise_multiplier<F: FheOps>() -> Cipher {
    let draw = F::random_bounded(MULTIPLIER_DRAW_SPAN, FheType::U32);
    let quotient = F::div_scalar(&draw, MULTIPLIER_RANGE);
    let residue = F::sub(&draw, &F::mul_scalar(&quotient, MULTIPLIER_RANGE));
    F::cast(&F::add_scalar(&residue, 1), FheType::U128)
}

/// `reserve × factor × multiplier` with fresh draws for this axis.
fn mirror<F: FheOps>(reserve: &Cipher, invert: bool) -> Cipher {
    let factor = noise_factor::<F>(invert);
    let multiplier = noise_multiplier::<F>();
    F::mul(&F::mul(&widen::<F>(reserve), &factor), &multiplier)
}

/// Noisy 128-bit mirrors of `(reserve0, reserve1)`.
pub fn obfuscate<F: FheOps>(reserve0: &Cipher, reserve1: &Cipher) -> (Cipher, Cipher) {
    (mirror::<F>(reserve0, false), mirror::<F>(reserve1, true))
}

impl<T: Config> Pallet<T> {
    /// Recompute and store the obfuscated reserves for freshly written reserves.
    pub(crate) fn refresh_obfuscated_reserves(reserve0: &Cipher, reserve1: &Cipher) {
        let (obfuscated0, obfuscated1) = obfuscate::<T::Fhe>(reserve0, reserve1);
        T::Fhe::allow_this(&obfuscated0);
        T::Fhe::allow_this(&obfuscated1);
        if let Some(scanner) = T::PriceScanner::get() {
            T::Fhe::allow(&obfuscated0, &scanner);
            T::Fhe::allow(&obfuscated1, &scanner);
        }
        ObfuscatedReserves::<T>::put((obfuscated0, obfuscated1));
        log::trace!(target: LOG_TARGET, "obfuscated reserves refreshed");
    }
}
