//! Ciphertext arithmetic capability injected by the runtime.
//!
//! Every operation is evaluated by the coprocessor; the pallet only ever holds
//! handles. Arithmetic wraps at the operand width, exactly like the underlying
//! FHE integers, so callers must prove their operands cannot overflow.

use crate::{Cipher, ExternalCipher, FheType, InputProof};
use sp_runtime::DispatchError;

pub trait FheOps {
    /// Encrypt a public constant (no secret randomness, value is public).
    fn trivial_encrypt(value: u128, ty: FheType) -> Cipher;

    fn add(a: &Cipher, b: &Cipher) -> Cipher;
    fn sub(a: &Cipher, b: &Cipher) -> Cipher;
    fn mul(a: &Cipher, b: &Cipher) -> Cipher;

    fn add_scalar(a: &Cipher, b: u128) -> Cipher;
    fn sub_scalar(a: &Cipher, b: u128) -> Cipher;
    fn mul_scalar(a: &Cipher, b: u128) -> Cipher;
    /// Ciphertext divided by a cleartext. `divisor` must be non-zero.
    fn div_scalar(a: &Cipher, divisor: u128) -> Cipher;

    /// Encrypted `a >= b`.
    fn ge(a: &Cipher, b: &Cipher) -> Cipher;
    /// Encrypted `a >= b` against a cleartext.
    fn ge_scalar(a: &Cipher, b: u128) -> Cipher;
    fn min(a: &Cipher, b: &Cipher) -> Cipher;
    fn max_scalar(a: &Cipher, b: u128) -> Cipher;
    /// `cond ? if_true : if_false`, `cond` being an encrypted boolean.
    fn select(cond: &Cipher, if_true: &Cipher, if_false: &Cipher) -> Cipher;

    /// Re-encrypt at another width (truncating when narrowing).
    fn cast(a: &Cipher, to: FheType) -> Cipher;

    /// Uniform secure random value in `[0, upper_bound)`; `upper_bound` is a power of two.
    fn random_bounded(upper_bound: u128, ty: FheType) -> Cipher;
    fn random_bool() -> Cipher;

    /// Check a user-supplied ciphertext against its input proof.
    fn verify_input(
        input: &ExternalCipher,
        proof: &InputProof,
        expected: FheType,
    ) -> Result<Cipher, DispatchError>;
}

/// Per-handle decrypt permissions.
pub trait FheAcl<AccountId> {
    /// Let the calling pallet keep using `ct` in later transactions.
    fn allow_this(ct: &Cipher);
    /// Grant `who` the right to decrypt `ct`.
    fn allow(ct: &Cipher, who: &AccountId);
}
