//! Primitives shared between the confidential pair pallet and the runtime adapters
//! that provide its ciphertext, decryption and token collaborators.
#![cfg_attr(not(feature = "std"), no_std)]

pub mod fhe;
pub mod oracle;
pub mod token;

pub use fhe::*;
pub use oracle::*;
pub use token::*;

use frame_support::pallet_prelude::*;

/// Opaque 32-byte ciphertext handle, as issued by the FHE coprocessor.
pub type Handle = [u8; 32];

/// Correlation id of an outstanding decryption request.
pub type RequestId = u64;

/// Proof attached to user-supplied ciphertexts.
pub type MaxProofLen = ConstU32<8192>;
pub type InputProof = BoundedVec<u8, MaxProofLen>;

/// Signature bundle returned by the gateway along with cleartexts.
pub type DecryptionProof = BoundedVec<u8, MaxProofLen>;

/// Max cleartexts a single decryption request may carry.
pub type MaxCleartexts = ConstU32<4>;
pub type Cleartexts = BoundedVec<u128, MaxCleartexts>;

/// Encrypted integer widths understood by the coprocessor.
#[derive(
    Encode, Decode, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, RuntimeDebug, MaxEncodedLen, TypeInfo,
)]
pub enum FheType {
    Bool,
    U16,
    U32,
    U64,
    U128,
}

impl FheType {
    pub const fn bits(self) -> u32 {
        match self {
            FheType::Bool => 1,
            FheType::U16 => 16,
            FheType::U32 => 32,
            FheType::U64 => 64,
            FheType::U128 => 128,
        }
    }

    /// Largest cleartext representable at this width.
    pub const fn max_value(self) -> u128 {
        match self {
            FheType::U128 => u128::MAX,
            other => (1u128 << other.bits()) - 1,
        }
    }
}

/// Typed handle to an encrypted value living in the coprocessor.
#[derive(Encode, Decode, Clone, Copy, PartialEq, Eq, RuntimeDebug, MaxEncodedLen, TypeInfo)]
pub struct Cipher {
    pub ty: FheType,
    pub handle: Handle,
}

impl Cipher {
    pub const fn new(ty: FheType, handle: Handle) -> Self {
        Self { ty, handle }
    }
}

/// User-supplied ciphertext that has not yet been checked against its input proof
/// (analogous to `externalEuint64`).
#[derive(Encode, Decode, Clone, Copy, PartialEq, Eq, RuntimeDebug, MaxEncodedLen, TypeInfo)]
pub struct ExternalCipher(pub Cipher);
