//! Decryption gateway boundary.
use crate::{Cipher, RequestId};
use sp_runtime::DispatchError;

/// Asynchronous decryption oracle.
///
/// A request is fire-and-forget: the gateway decrypts off-chain and later submits the
/// cleartexts, in request order, through the consumer's fulfilment call.
pub trait DecryptionGateway {
    /// Queue `cts` for decryption and return the correlation id of the request.
    fn request_decryption(cts: &[Cipher]) -> Result<RequestId, DispatchError>;

    /// Check that `proof` authenticates `cleartexts` as the decryption of the
    /// ciphertexts named in `request`.
    fn verify_decryption(request: RequestId, cleartexts: &[u128], proof: &[u8]) -> bool;
}
