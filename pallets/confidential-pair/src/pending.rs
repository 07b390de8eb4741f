//! The single in-flight decryption request of the pair.

use crate::{
    pallet::{Config, Error, Pending, Pallet},
    LOG_TARGET,
};
use confidential_amm_primitives::{Cipher, RequestId};
use frame_support::{ensure, pallet_prelude::*};
use parity_scale_codec::{Decode, Encode, MaxEncodedLen};
use scale_info::TypeInfo;

#[derive(Clone, Copy, Encode, Decode, PartialEq, Eq, RuntimeDebug, MaxEncodedLen, TypeInfo)]
pub enum OperationKind {
    AddLiquidity,
    RemoveLiquidity,
    Swap,
}

/// What an add-liquidity settlement needs.
#[derive(Clone, Encode, Decode, PartialEq, Eq, RuntimeDebug, MaxEncodedLen, TypeInfo)]
pub enum Deposit {
    /// Empty pair. Only `liquidity >= MinimumLiquidity` was sent for decryption.
    Initial { amount0: Cipher, amount1: Cipher, liquidity: Cipher },
    /// Sized against the price, `supply_blinded_i = supply · r_i`.
    Proportional {
        amount0: Cipher,
        amount1: Cipher,
        supply_blinded0: Cipher,
        supply_blinded1: Cipher,
    },
}

/// Ciphertexts kept between request and callback.
#[derive(Clone, Encode, Decode, PartialEq, Eq, RuntimeDebug, MaxEncodedLen, TypeInfo)]
pub enum PendingOperation<AccountId> {
    Swap {
        from: AccountId,
        to: AccountId,
        amount0_in: Cipher,
        amount1_in: Cipher,
        numerator0: Cipher,
        numerator1: Cipher,
    },
    AddLiquidity { who: AccountId, deposit: Deposit },
    RemoveLiquidity { who: AccountId, liquidity: Cipher, numerator0: Cipher, numerator1: Cipher },
}

impl<AccountId> PendingOperation<AccountId> {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Swap { .. } => OperationKind::Swap,
            Self::AddLiquidity { .. } => OperationKind::AddLiquidity,
            Self::RemoveLiquidity { .. } => OperationKind::RemoveLiquidity,
        }
    }

    /// Account whose funds are staged for this operation.
    pub fn owner(&self) -> &AccountId {
        match self {
            Self::Swap { from, .. } => from,
            Self::AddLiquidity { who, .. } | Self::RemoveLiquidity { who, .. } => who,
        }
    }
}

#[derive(Clone, Encode, Decode, PartialEq, Eq, RuntimeDebug, MaxEncodedLen, TypeInfo)]
pub struct PendingDecryption<AccountId> {
    pub request_id: RequestId,
    /// Unix seconds.
    pub created_at: u64,
    pub operation: PendingOperation<AccountId>,
}

impl<AccountId> PendingDecryption<AccountId> {
    /// Strictly past the timeout: a record exactly `timeout` seconds old still blocks.
    pub fn is_expired(&self, now: u64, timeout: u64) -> bool {
        now > self.created_at.saturating_add(timeout)
    }
}

/// Lock state derived from the stored record and the clock.
#[derive(Clone, PartialEq, Eq, RuntimeDebug)]
pub enum PendingState<AccountId> {
    Idle,
    Live(PendingDecryption<AccountId>),
    Stale(PendingDecryption<AccountId>),
}

impl<T: Config> Pallet<T> {
    pub fn pending_state(now: u64) -> PendingState<T::AccountId> {
        match Pending::<T>::get() {
            None => PendingState::Idle,
            Some(record) if record.is_expired(now, T::MaxDecryptionTime::get()) =>
                PendingState::Stale(record),
            Some(record) => PendingState::Live(record),
        }
    }

    /// A new operation may start only while no live request exists.
    pub(crate) fn ensure_can_start(now: u64) -> DispatchResult {
        match Self::pending_state(now) {
            PendingState::Idle => Ok(()),
            PendingState::Live(_) => Err(Error::<T>::PendingOperationInProgress.into()),
            PendingState::Stale(stale) => {
                log::warn!(
                    target: LOG_TARGET,
                    "superseding request {} created at {} without callback",
                    stale.request_id,
                    stale.created_at,
                );
                Ok(())
            },
        }
    }

    pub(crate) fn begin_pending(
        request_id: RequestId,
        now: u64,
        operation: PendingOperation<T::AccountId>,
    ) {
        Pending::<T>::put(PendingDecryption { request_id, created_at: now, operation });
    }

    /// The stored record, if it is the one `request_id` answers. Stale records still match.
    pub(crate) fn matching_pending(
        request_id: RequestId,
    ) -> Result<PendingDecryption<T::AccountId>, DispatchError> {
        let record = Pending::<T>::get().ok_or(Error::<T>::RequestIdMismatch)?;
        ensure!(record.request_id == request_id, Error::<T>::RequestIdMismatch);
        Ok(record)
    }

    /// Drop the stored record if it belongs to `request_id`.
    pub(crate) fn clear_pending_if(request_id: RequestId) -> bool {
        let matches = Pending::<T>::get().is_some_and(|record| record.request_id == request_id);
        if matches {
            Pending::<T>::kill();
        }
        matches
    }
}
