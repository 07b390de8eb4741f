//! Swap and liquidity arithmetic.
//!
//! Pure functions over ciphertexts: the request side builds blinded ratios whose
//! denominators are sent for decryption, the settlement side rebuilds the encrypted
//! results from the decrypted values. Nothing here touches storage.
//!
//! The overflow checks below hold because no operand ever exceeds [`MAX_BALANCE`]:
//! staged amounts pass through [`Admission`] first, so reserves stay within the bound,
//! and LP supply stays below `√(reserve0 · reserve1)`.

use crate::{
    blinding::{fits_u128, unblind, widen, BlindedRatio, BLINDING, FEE_DENOMINATOR, MAX_BALANCE},
    obfuscation::MAX_OBFUSCATED,
};
use confidential_amm_primitives::{Cipher, FheOps, FheType};
use frame_support::pallet_prelude::RuntimeDebug;

/// Decrypted prices are shifted down to this many bits before use.
pub const PRICE_BITS: u32 = 32;

const R: u128 = BLINDING.max_factor();

// in · reserve_out · r · 100
const _: () = assert!(fits_u128(&[MAX_BALANCE, MAX_BALANCE, R, FEE_DENOMINATOR]));
// (reserve_in + in) · r · 100
const _: () = assert!(fits_u128(&[2 * MAX_BALANCE, R, FEE_DENOMINATOR]));
// obfuscated reserve · r
const _: () = assert!(fits_u128(&[MAX_OBFUSCATED, R]));
// amount · normalised price
const _: () = assert!(fits_u128(&[MAX_BALANCE, 1 << PRICE_BITS]));
// used amount · supply · r
const _: () = assert!(fits_u128(&[MAX_BALANCE, MAX_BALANCE, R]));
// liquidity · r · reserve
const _: () = assert!(fits_u128(&[MAX_BALANCE, R, MAX_BALANCE]));

/// A staged amount split into the part the pair takes and the part handed back.
#[derive(Clone, Copy, PartialEq, Eq, RuntimeDebug)]
pub struct Admission {
    pub accepted: Cipher,
    pub rejected: Cipher,
}

impl Admission {
    /// All or nothing: `amount` is taken only if it does not exceed `headroom`.
    pub fn new<F: FheOps>(amount: &Cipher, headroom: &Cipher) -> Self {
        let fits = F::ge(headroom, amount);
        let accepted = F::select(&fits, amount, &F::trivial_encrypt(0, amount.ty));
        Self { rejected: F::sub(amount, &accepted), accepted }
    }
}

/// Room left below [`MAX_BALANCE`] for a 64-bit reserve; the whole range when the pair
/// is empty.
pub fn headroom<F: FheOps>(reserve: Option<&Cipher>) -> Cipher {
    let max = F::trivial_encrypt(MAX_BALANCE, FheType::U64);
    match reserve {
        Some(reserve) => F::sub(&max, reserve),
        None => max,
    }
}

/// Both swap directions, blinded.
#[derive(Clone, Copy, PartialEq, Eq, RuntimeDebug)]
pub struct SwapRequest {
    /// `99·in1·reserve0 / 100·(reserve1 + in1)`
    pub out0: BlindedRatio,
    /// `99·in0·reserve1 / 100·(reserve0 + in0)`
    pub out1: BlindedRatio,
}

impl SwapRequest {
    pub fn new<F: FheOps>(
        amount0_in: &Cipher,
        amount1_in: &Cipher,
        reserve0: &Cipher,
        reserve1: &Cipher,
    ) -> Self {
        let direction = |amount_in: &Cipher, reserve_in: &Cipher, reserve_out: &Cipher| {
            let amount_in = widen::<F>(amount_in);
            let numerator = F::mul(&amount_in, &widen::<F>(reserve_out));
            let denominator = F::add(&widen::<F>(reserve_in), &amount_in);
            BlindedRatio::with_fee::<F>(&numerator, &denominator, &BLINDING.draw::<F>())
        };
        Self {
            out0: direction(amount1_in, reserve1, reserve0),
            out1: direction(amount0_in, reserve0, reserve1),
        }
    }

    /// Ciphertexts to decrypt, in callback order.
    pub fn denominators(&self) -> [Cipher; 2] {
        [self.out0.denominator, self.out1.denominator]
    }
}

/// Encrypted 64-bit `(amount0_out, amount1_out)`.
pub fn swap_outputs<F: FheOps>(
    numerator0: &Cipher,
    numerator1: &Cipher,
    [denominator0, denominator1]: [u128; 2],
) -> Option<(Cipher, Cipher)> {
    Some((
        unblind::<F>(numerator0, denominator0, FheType::U64)?,
        unblind::<F>(numerator1, denominator1, FheType::U64)?,
    ))
}

/// First deposit into an empty pair.
#[derive(Clone, Copy, PartialEq, Eq, RuntimeDebug)]
pub struct InitialDeposit {
    pub liquidity: Cipher,
    /// Encrypted `liquidity >= minimum`, the only value decrypted.
    pub meets_minimum: Cipher,
}

impl InitialDeposit {
    pub fn new<F: FheOps>(amount0: &Cipher, amount1: &Cipher, minimum: u64) -> Self {
        let liquidity = F::min(amount0, amount1);
        Self { meets_minimum: F::ge_scalar(&liquidity, minimum.into()), liquidity }
    }
}

/// Deposit into an initialised pair.
#[derive(Clone, Copy, PartialEq, Eq, RuntimeDebug)]
pub struct DepositRequest {
    /// `obfuscated0 · r`
    pub price0: Cipher,
    /// `obfuscated1 · r`, same `r`
    pub price1: Cipher,
    /// `supply / reserve0`
    pub share0: BlindedRatio,
    /// `supply / reserve1`
    pub share1: BlindedRatio,
}

impl DepositRequest {
    pub fn new<F: FheOps>(
        obfuscated: (&Cipher, &Cipher),
        reserves: (&Cipher, &Cipher),
        supply: &Cipher,
    ) -> Self {
        let r = BLINDING.draw::<F>();
        Self {
            price0: F::mul(obfuscated.0, &r),
            price1: F::mul(obfuscated.1, &r),
            share0: BlindedRatio::new::<F>(supply, reserves.0, &BLINDING.draw::<F>()),
            share1: BlindedRatio::new::<F>(supply, reserves.1, &BLINDING.draw::<F>()),
        }
    }

    pub fn denominators(&self) -> [Cipher; 4] {
        [self.price0, self.price1, self.share0.denominator, self.share1.denominator]
    }
}

/// Scale a decrypted price ratio down to `PRICE_BITS` per side, keeping both non-zero.
pub fn normalize_price(price0: u128, price1: u128) -> (u128, u128) {
    let bits = (u128::BITS - price0.max(price1).leading_zeros()).saturating_sub(PRICE_BITS);
    ((price0 >> bits).max(1), (price1 >> bits).max(1))
}

/// Outcome of a proportional deposit.
#[derive(Clone, Copy, PartialEq, Eq, RuntimeDebug)]
pub struct DepositSettlement {
    pub used0: Cipher,
    pub used1: Cipher,
    pub excess0: Cipher,
    pub excess1: Cipher,
    pub liquidity: Cipher,
}

/// Size a deposit against the decrypted price and mint the smaller of the two
/// per-side LP amounts. `None` if any decrypted value is zero.
pub fn settle_deposit<F: FheOps>(
    amount0: &Cipher,
    amount1: &Cipher,
    supply_blinded0: &Cipher,
    supply_blinded1: &Cipher,
    [price0, price1, reserve_blinded0, reserve_blinded1]: [u128; 4],
) -> Option<DepositSettlement> {
    if price0 == 0 || price1 == 0 {
        return None;
    }
    let (price0, price1) = normalize_price(price0, price1);
    let (wide0, wide1) = (widen::<F>(amount0), widen::<F>(amount1));

    let target1 = F::div_scalar(&F::mul_scalar(&wide0, price1), price0);
    let target0 = F::div_scalar(&F::mul_scalar(&wide1, price0), price1);
    let used0 = F::min(&target0, &wide0);
    let used1 = F::min(&target1, &wide1);

    let lp0 = unblind::<F>(&F::mul(&used0, supply_blinded0), reserve_blinded0, FheType::U64)?;
    let lp1 = unblind::<F>(&F::mul(&used1, supply_blinded1), reserve_blinded1, FheType::U64)?;

    let used0 = F::cast(&used0, FheType::U64);
    let used1 = F::cast(&used1, FheType::U64);
    Some(DepositSettlement {
        excess0: F::sub(amount0, &used0),
        excess1: F::sub(amount1, &used1),
        used0,
        used1,
        liquidity: F::min(&lp0, &lp1),
    })
}

/// Proportional withdrawal, blinded by one shared factor.
#[derive(Clone, Copy, PartialEq, Eq, RuntimeDebug)]
pub struct WithdrawRequest {
    /// `liquidity · r · reserve0`
    pub numerator0: Cipher,
    /// `liquidity · r · reserve1`
    pub numerator1: Cipher,
    /// `supply · r`
    pub denominator: Cipher,
}

impl WithdrawRequest {
    pub fn new<F: FheOps>(
        liquidity: &Cipher,
        reserve0: &Cipher,
        reserve1: &Cipher,
        supply: &Cipher,
    ) -> Self {
        let r = BLINDING.draw::<F>();
        let share = F::mul(&widen::<F>(liquidity), &r);
        Self {
            numerator0: F::mul(&share, &widen::<F>(reserve0)),
            numerator1: F::mul(&share, &widen::<F>(reserve1)),
            denominator: F::mul(&widen::<F>(supply), &r),
        }
    }
}

/// Encrypted 64-bit payouts `(amount0_out, amount1_out)`.
pub fn withdraw_outputs<F: FheOps>(
    numerator0: &Cipher,
    numerator1: &Cipher,
    denominator: u128,
) -> Option<(Cipher, Cipher)> {
    Some((
        unblind::<F>(numerator0, denominator, FheType::U64)?,
        unblind::<F>(numerator1, denominator, FheType::U64)?,
    ))
}
