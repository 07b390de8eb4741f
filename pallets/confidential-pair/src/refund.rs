//! Funds staged in pair custody until their operation settles.

use crate::{
    pallet::{Config, Error, Event, Pallet, Refunds, Tokens},
    pending::OperationKind,
    LOG_TARGET,
};
use confidential_amm_primitives::{Cipher, ConfidentialTokens, RequestId};
use frame_support::pallet_prelude::*;
use parity_scale_codec::{Decode, Encode, MaxEncodedLen};
use scale_info::TypeInfo;

/// Exactly what was taken from the user for one request.
#[derive(Clone, Encode, Decode, PartialEq, Eq, RuntimeDebug, MaxEncodedLen, TypeInfo)]
pub enum RefundRecord {
    Swap { amount0: Cipher, amount1: Cipher },
    AddLiquidity { amount0: Cipher, amount1: Cipher },
    RemoveLiquidity { liquidity: Cipher },
}

impl RefundRecord {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Swap { .. } => OperationKind::Swap,
            Self::AddLiquidity { .. } => OperationKind::AddLiquidity,
            Self::RemoveLiquidity { .. } => OperationKind::RemoveLiquidity,
        }
    }
}

impl<T: Config> Pallet<T> {
    pub(crate) fn stage_refund(who: &T::AccountId, request_id: RequestId, record: RefundRecord) {
        Refunds::<T>::insert((who, request_id), record);
    }

    /// Settlement consumed the staged funds.
    pub(crate) fn release_refund(who: &T::AccountId, request_id: RequestId) {
        Refunds::<T>::remove((who, request_id));
    }

    /// Return the staged funds of `(who, request_id)` if they were staged for `kind`.
    ///
    /// Only the existence of the record is checked, so a live request can be cancelled
    /// before its timeout.
    pub(crate) fn claim_refund(
        who: T::AccountId,
        request_id: RequestId,
        kind: OperationKind,
    ) -> DispatchResult {
        let record = Refunds::<T>::get((&who, request_id))
            .filter(|record| record.kind() == kind)
            .ok_or(Error::<T>::NoRefundAvailable)?;
        let (token0, token1) = Tokens::<T>::get().ok_or(Error::<T>::NotInitialized)?;
        let pair = Self::account_id();

        match record {
            RefundRecord::Swap { amount0, amount1 } |
            RefundRecord::AddLiquidity { amount0, amount1 } => {
                T::Tokens::transfer(token0, &pair, &who, &amount0)?;
                T::Tokens::transfer(token1, &pair, &who, &amount1)?;
            },
            RefundRecord::RemoveLiquidity { liquidity } => {
                T::Tokens::transfer(T::LpToken::get(), &pair, &who, &liquidity)?;
            },
        }

        Refunds::<T>::remove((&who, request_id));
        if Self::clear_pending_if(request_id) {
            log::debug!(target: LOG_TARGET, "request {request_id} cancelled by refund");
        }
        log::debug!(target: LOG_TARGET, "refunded {kind:?} request {request_id}");
        Self::deposit_event(Event::Refunded {
            from: who,
            block: frame_system::Pallet::<T>::block_number(),
            request_id,
        });
        Ok(())
    }
}
