//! Confidential constant-product AMM pair.
//!
//! Reserves, LP supply and every user amount are encrypted. Division needs a cleartext
//! denominator, so each operation runs in two phases: the call stages the user's funds,
//! builds blinded ratios and asks the gateway to decrypt the blinded denominators; the
//! gateway later answers through [`Pallet::fulfill_decryption`], which rebuilds the
//! encrypted results and settles. At most one request is in flight per pair. A request
//! nobody answers times out after `MaxDecryptionTime` and the staged funds can be
//! reclaimed through the refund calls.
#![cfg_attr(not(feature = "std"), no_std)]

pub use pallet::*;

pub mod blinding;
mod ledger;
pub mod math;
pub mod obfuscation;
pub mod pending;
pub mod refund;

#[cfg(test)]
mod mock;

pub(crate) const LOG_TARGET: &str = "runtime::confidential-pair";

#[frame_support::pallet]
pub mod pallet {
    use crate::{
        blinding::MAX_BALANCE,
        math::{self, Admission, DepositRequest, InitialDeposit, SwapRequest, WithdrawRequest},
        pending::{Deposit, OperationKind, PendingDecryption, PendingOperation},
        refund::RefundRecord,
        LOG_TARGET,
    };
    use confidential_amm_primitives::{
        Cipher, Cleartexts, ConfidentialTokens, DecryptionGateway, DecryptionProof,
        ExternalCipher, FheAcl, FheOps, FheType, InputProof, RequestId,
    };
    use frame_support::{
        pallet_prelude::*,
        traits::{EnsureOrigin, UnixTime},
        PalletId,
    };
    use frame_system::pallet_prelude::*;
    use sp_runtime::traits::AccountIdConversion;
    use sp_std::{vec, vec::Vec};

    #[pallet::config]
    pub trait Config: frame_system::Config {
        type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

        type AssetId: Parameter + Member + Copy + MaxEncodedLen;

        /// Ciphertext arithmetic and decrypt permissions.
        type Fhe: FheOps + FheAcl<Self::AccountId>;
        /// Asynchronous decryption oracle.
        type Gateway: DecryptionGateway;
        /// Balances of both pair assets and of the LP asset.
        type Tokens: ConfidentialTokens<Self::AccountId, Self::AssetId>;

        /// Origin allowed to bind the pair to its two assets.
        type FactoryOrigin: EnsureOrigin<Self::RuntimeOrigin>;
        /// Origin relaying gateway answers.
        type FulfillOrigin: EnsureOrigin<Self::RuntimeOrigin>;

        type UnixTime: UnixTime;

        /// Custody account of the pair.
        #[pallet::constant]
        type PalletId: Get<PalletId>;

        /// Asset minted to liquidity providers.
        #[pallet::constant]
        type LpToken: Get<Self::AssetId>;

        /// Seconds after which an unanswered request stops blocking the pair.
        #[pallet::constant]
        type MaxDecryptionTime: Get<u64>;

        /// LP units the first deposit must produce. They stay locked in the pair account.
        #[pallet::constant]
        type MinimumLiquidity: Get<u64>;

        /// Account permanently allowed to decrypt the obfuscated reserves.
        type PriceScanner: Get<Option<Self::AccountId>>;

        type WeightInfo: WeightData;
    }

    pub trait WeightData {
        fn initialize() -> Weight;
        fn swap_tokens() -> Weight;
        fn add_liquidity() -> Weight;
        fn remove_liquidity() -> Weight;
        fn fulfill_decryption() -> Weight;
        fn refund() -> Weight;
        fn request_reserve_disclosure() -> Weight;
    }
    impl WeightData for () {
        fn initialize() -> Weight {
            Weight::from_parts(10_000, 0)
        }
        fn swap_tokens() -> Weight {
            Weight::from_parts(50_000, 0)
        }
        fn add_liquidity() -> Weight {
            Weight::from_parts(50_000, 0)
        }
        fn remove_liquidity() -> Weight {
            Weight::from_parts(40_000, 0)
        }
        fn fulfill_decryption() -> Weight {
            Weight::from_parts(60_000, 0)
        }
        fn refund() -> Weight {
            Weight::from_parts(30_000, 0)
        }
        fn request_reserve_disclosure() -> Weight {
            Weight::from_parts(10_000, 0)
        }
    }

    #[pallet::pallet]
    pub struct Pallet<T>(_);

    // ---------------------------
    // Storage
    // ---------------------------

    /// `(token0, token1)`, set once by the factory.
    #[pallet::storage]
    pub type Tokens<T: Config> = StorageValue<_, (T::AssetId, T::AssetId), OptionQuery>;

    /// Encrypted 64-bit `(reserve0, reserve1)`. Absent until the first deposit settles.
    #[pallet::storage]
    pub type Reserves<T: Config> = StorageValue<_, (Cipher, Cipher), OptionQuery>;

    /// Encrypted 64-bit LP supply, the locked minimum included.
    #[pallet::storage]
    pub type LpSupply<T: Config> = StorageValue<_, Cipher, OptionQuery>;

    /// Noisy 128-bit mirrors of the reserves.
    #[pallet::storage]
    pub type ObfuscatedReserves<T: Config> = StorageValue<_, (Cipher, Cipher), OptionQuery>;

    /// The in-flight decryption request, if any.
    #[pallet::storage]
    pub type Pending<T: Config> = StorageValue<_, PendingDecryption<T::AccountId>, OptionQuery>;

    /// (user, request id) -> funds staged for that request
    #[pallet::storage]
    pub type Refunds<T: Config> =
        StorageMap<_, Blake2_128Concat, (T::AccountId, RequestId), RefundRecord, OptionQuery>;

    // ---------------------------
    // Events / Errors
    // ---------------------------

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        Initialized {
            token0: T::AssetId,
            token1: T::AssetId,
        },
        DecryptionRequested {
            who: T::AccountId,
            block: BlockNumberFor<T>,
            request_id: RequestId,
        },
        LiquidityMinted {
            block: BlockNumberFor<T>,
            who: T::AccountId,
        },
        LiquidityBurnt {
            block: BlockNumberFor<T>,
            who: T::AccountId,
        },
        Swap {
            from: T::AccountId,
            amount0_in: Cipher,
            amount1_in: Cipher,
            amount0_out: Cipher,
            amount1_out: Cipher,
            to: T::AccountId,
        },
        Refunded {
            from: T::AccountId,
            block: BlockNumberFor<T>,
            request_id: RequestId,
        },
        ReservesDisclosed {
            block: BlockNumberFor<T>,
            who: T::AccountId,
            reserve0: Cipher,
            reserve1: Cipher,
        },
    }

    #[pallet::error]
    pub enum Error<T> {
        /// The call's deadline has passed.
        Expired,
        /// Another decryption request is live.
        PendingOperationInProgress,
        /// Caller lacks the required role.
        Unauthorized,
        /// The answer does not belong to the live request.
        RequestIdMismatch,
        /// Nothing of this kind is staged for the caller under this request id.
        NoRefundAvailable,
        /// The first deposit would mint less than `MinimumLiquidity`.
        InsufficientInitialLiquidity,
        AlreadyInitialized,
        NotInitialized,
        IdenticalTokens,
        /// The pair holds no liquidity yet.
        NoLiquidity,
        InvalidDecryptionProof,
        /// Wrong number of cleartexts for the live request.
        UnexpectedCleartexts,
        /// A blinded denominator decrypted to zero.
        ZeroDenominator,
    }

    #[pallet::hooks]
    impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
        fn integrity_test() {
            assert!(T::MaxDecryptionTime::get() > 0, "requests must be able to time out");
            assert!(
                u128::from(T::MinimumLiquidity::get()) <= MAX_BALANCE,
                "minimum liquidity exceeds the supported balance range"
            );
        }
    }

    // ---------------------------
    // Calls (extrinsics)
    // ---------------------------

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        /// Bind the pair to its two assets. Factory only, once.
        #[pallet::call_index(0)]
        #[pallet::weight(T::WeightInfo::initialize())]
        pub fn initialize(
            origin: OriginFor<T>,
            token0: T::AssetId,
            token1: T::AssetId,
        ) -> DispatchResult {
            T::FactoryOrigin::ensure_origin(origin).map_err(|_| Error::<T>::Unauthorized)?;
            ensure!(token0 != token1, Error::<T>::IdenticalTokens);
            ensure!(Tokens::<T>::get().is_none(), Error::<T>::AlreadyInitialized);

            Tokens::<T>::put((token0, token1));
            Self::deposit_event(Event::Initialized { token0, token1 });
            Ok(())
        }

        /// Swap in either or both directions. Outputs are paid to `to` on settlement.
        ///
        /// The pair account must be an approved operator of the caller on both assets.
        /// An input that would lift its reserve past [`MAX_BALANCE`] is handed straight
        /// back and that direction swaps nothing.
        #[pallet::call_index(1)]
        #[pallet::weight(T::WeightInfo::swap_tokens())]
        pub fn swap_tokens(
            origin: OriginFor<T>,
            amount0_in: ExternalCipher,
            amount1_in: ExternalCipher,
            input_proof: InputProof,
            to: T::AccountId,
            deadline: u64,
        ) -> DispatchResult {
            let from = ensure_signed(origin)?;
            let now = Self::ensure_not_expired(deadline)?;
            let (token0, token1) = Self::tokens()?;
            Self::ensure_can_start(now)?;
            let (reserve0, reserve1) = Self::current_reserves()?;

            let amount0 = T::Fhe::verify_input(&amount0_in, &input_proof, FheType::U64)?;
            let amount1 = T::Fhe::verify_input(&amount1_in, &input_proof, FheType::U64)?;
            let pair = Self::account_id();
            let sent0 = T::Tokens::transfer_from(token0, &pair, &from, &pair, &amount0)?;
            let sent1 = T::Tokens::transfer_from(token1, &pair, &from, &pair, &amount1)?;
            let sent0 = Self::admit(token0, &from, &sent0, Some(&reserve0))?;
            let sent1 = Self::admit(token1, &from, &sent1, Some(&reserve1))?;

            let request = SwapRequest::new::<T::Fhe>(&sent0, &sent1, &reserve0, &reserve1);
            let operation = PendingOperation::Swap {
                from: from.clone(),
                to,
                amount0_in: sent0,
                amount1_in: sent1,
                numerator0: request.out0.numerator,
                numerator1: request.out1.numerator,
            };
            Self::open_request(
                from,
                now,
                &request.denominators(),
                RefundRecord::Swap { amount0: sent0, amount1: sent1 },
                operation,
            )
        }

        /// Deposit both assets. The first deposit opens the pair; later ones are sized
        /// against the obfuscated price and the unused excess is returned on settlement.
        /// An amount that would lift its reserve past [`MAX_BALANCE`] is handed straight
        /// back.
        #[pallet::call_index(2)]
        #[pallet::weight(T::WeightInfo::add_liquidity())]
        pub fn add_liquidity(
            origin: OriginFor<T>,
            amount0: ExternalCipher,
            amount1: ExternalCipher,
            input_proof: InputProof,
            deadline: u64,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            let now = Self::ensure_not_expired(deadline)?;
            let (token0, token1) = Self::tokens()?;
            Self::ensure_can_start(now)?;

            let amount0 = T::Fhe::verify_input(&amount0, &input_proof, FheType::U64)?;
            let amount1 = T::Fhe::verify_input(&amount1, &input_proof, FheType::U64)?;
            let pair = Self::account_id();
            let sent0 = T::Tokens::transfer_from(token0, &pair, &who, &pair, &amount0)?;
            let sent1 = T::Tokens::transfer_from(token1, &pair, &who, &pair, &amount1)?;
            let reserves = Reserves::<T>::get();
            let sent0 = Self::admit(token0, &who, &sent0, reserves.as_ref().map(|r| &r.0))?;
            let sent1 = Self::admit(token1, &who, &sent1, reserves.as_ref().map(|r| &r.1))?;

            let (deposit, to_decrypt): (Deposit, Vec<Cipher>) = match reserves {
                None => {
                    let initial = InitialDeposit::new::<T::Fhe>(
                        &sent0,
                        &sent1,
                        T::MinimumLiquidity::get(),
                    );
                    let deposit = Deposit::Initial {
                        amount0: sent0,
                        amount1: sent1,
                        liquidity: initial.liquidity,
                    };
                    (deposit, vec![initial.meets_minimum])
                },
                Some((reserve0, reserve1)) => {
                    let (obfuscated0, obfuscated1) =
                        ObfuscatedReserves::<T>::get().ok_or(Error::<T>::NoLiquidity)?;
                    let supply = Self::current_supply()?;
                    let request = DepositRequest::new::<T::Fhe>(
                        (&obfuscated0, &obfuscated1),
                        (&reserve0, &reserve1),
                        &supply,
                    );
                    let deposit = Deposit::Proportional {
                        amount0: sent0,
                        amount1: sent1,
                        supply_blinded0: request.share0.numerator,
                        supply_blinded1: request.share1.numerator,
                    };
                    (deposit, request.denominators().to_vec())
                },
            };

            Self::open_request(
                who.clone(),
                now,
                &to_decrypt,
                RefundRecord::AddLiquidity { amount0: sent0, amount1: sent1 },
                PendingOperation::AddLiquidity { who, deposit },
            )
        }

        /// Return LP units for a proportional share of both reserves. More units than the
        /// current supply are handed straight back.
        #[pallet::call_index(3)]
        #[pallet::weight(T::WeightInfo::remove_liquidity())]
        pub fn remove_liquidity(
            origin: OriginFor<T>,
            liquidity: ExternalCipher,
            input_proof: InputProof,
            deadline: u64,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            let now = Self::ensure_not_expired(deadline)?;
            Self::tokens()?;
            Self::ensure_can_start(now)?;
            let (reserve0, reserve1) = Self::current_reserves()?;
            let supply = Self::current_supply()?;

            let liquidity = T::Fhe::verify_input(&liquidity, &input_proof, FheType::U64)?;
            let pair = Self::account_id();
            let lp = T::LpToken::get();
            let taken = T::Tokens::transfer_from(lp, &pair, &who, &pair, &liquidity)?;
            let taken = Admission::new::<T::Fhe>(&taken, &supply);
            T::Tokens::transfer(lp, &pair, &who, &taken.rejected)?;
            let taken = taken.accepted;

            let request = WithdrawRequest::new::<T::Fhe>(&taken, &reserve0, &reserve1, &supply);
            let operation = PendingOperation::RemoveLiquidity {
                who: who.clone(),
                liquidity: taken,
                numerator0: request.numerator0,
                numerator1: request.numerator1,
            };
            Self::open_request(
                who,
                now,
                &[request.denominator],
                RefundRecord::RemoveLiquidity { liquidity: taken },
                operation,
            )
        }

        /// Gateway answer for the live request.
        ///
        /// A rejected answer leaves the request live, so a correct one may follow
        /// until the request is refunded or superseded.
        #[pallet::call_index(4)]
        #[pallet::weight(T::WeightInfo::fulfill_decryption())]
        pub fn fulfill_decryption(
            origin: OriginFor<T>,
            request_id: RequestId,
            cleartexts: Cleartexts,
            proof: DecryptionProof,
        ) -> DispatchResult {
            T::FulfillOrigin::ensure_origin(origin)?;
            let record = Self::matching_pending(request_id).inspect_err(|_| {
                log::warn!(target: LOG_TARGET, "rejected answer for request {request_id}");
            })?;
            ensure!(
                T::Gateway::verify_decryption(request_id, &cleartexts, &proof),
                Error::<T>::InvalidDecryptionProof
            );

            let owner = record.operation.owner().clone();
            match record.operation {
                PendingOperation::Swap {
                    from,
                    to,
                    amount0_in,
                    amount1_in,
                    numerator0,
                    numerator1,
                } => Self::settle_swap(
                    from,
                    to,
                    (amount0_in, amount1_in),
                    (numerator0, numerator1),
                    Self::cleartexts(&cleartexts)?,
                )?,
                PendingOperation::AddLiquidity { who, deposit } =>
                    Self::settle_add_liquidity(who, deposit, &cleartexts)?,
                PendingOperation::RemoveLiquidity { who, liquidity, numerator0, numerator1 } =>
                    Self::settle_remove_liquidity(
                        who,
                        liquidity,
                        (numerator0, numerator1),
                        Self::cleartexts(&cleartexts)?,
                    )?,
            }

            Pending::<T>::kill();
            Self::release_refund(&owner, request_id);
            log::debug!(target: LOG_TARGET, "request {request_id} settled");
            Ok(())
        }

        /// Reclaim the funds staged by an unsettled swap.
        #[pallet::call_index(5)]
        #[pallet::weight(T::WeightInfo::refund())]
        pub fn refund_swap(origin: OriginFor<T>, request_id: RequestId) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::claim_refund(who, request_id, OperationKind::Swap)
        }

        /// Reclaim the funds staged by an unsettled deposit.
        #[pallet::call_index(6)]
        #[pallet::weight(T::WeightInfo::refund())]
        pub fn refund_add_liquidity(origin: OriginFor<T>, request_id: RequestId) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::claim_refund(who, request_id, OperationKind::AddLiquidity)
        }

        /// Reclaim the LP units staged by an unsettled withdrawal.
        #[pallet::call_index(7)]
        #[pallet::weight(T::WeightInfo::refund())]
        pub fn refund_remove_liquidity(
            origin: OriginFor<T>,
            request_id: RequestId,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::claim_refund(who, request_id, OperationKind::RemoveLiquidity)
        }

        /// Grant the caller decrypt rights on the current obfuscated reserves.
        #[pallet::call_index(8)]
        #[pallet::weight(T::WeightInfo::request_reserve_disclosure())]
        pub fn request_reserve_disclosure(origin: OriginFor<T>) -> DispatchResult {
            let who = ensure_signed(origin)?;
            let (reserve0, reserve1) =
                ObfuscatedReserves::<T>::get().ok_or(Error::<T>::NoLiquidity)?;
            T::Fhe::allow(&reserve0, &who);
            T::Fhe::allow(&reserve1, &who);
            Self::deposit_event(Event::ReservesDisclosed {
                block: frame_system::Pallet::<T>::block_number(),
                who,
                reserve0,
                reserve1,
            });
            Ok(())
        }
    }

    // ---------------------------
    // Internals
    // ---------------------------

    impl<T: Config> Pallet<T> {
        pub fn account_id() -> T::AccountId {
            T::PalletId::get().into_account_truncating()
        }

        /// Unix seconds.
        pub fn now() -> u64 {
            T::UnixTime::now().as_secs()
        }

        fn ensure_not_expired(deadline: u64) -> Result<u64, DispatchError> {
            let now = Self::now();
            ensure!(now <= deadline, Error::<T>::Expired);
            Ok(now)
        }

        fn tokens() -> Result<(T::AssetId, T::AssetId), DispatchError> {
            Ok(Tokens::<T>::get().ok_or(Error::<T>::NotInitialized)?)
        }

        fn cleartexts<const N: usize>(values: &[u128]) -> Result<[u128; N], DispatchError> {
            <[u128; N]>::try_from(values).map_err(|_| Error::<T>::UnexpectedCleartexts.into())
        }

        /// Keep the staged `amount` only if `reserve + amount` stays within
        /// [`MAX_BALANCE`]; otherwise hand all of it back to `who`.
        fn admit(
            asset: T::AssetId,
            who: &T::AccountId,
            amount: &Cipher,
            reserve: Option<&Cipher>,
        ) -> Result<Cipher, DispatchError> {
            let admission = Admission::new::<T::Fhe>(amount, &math::headroom::<T::Fhe>(reserve));
            T::Tokens::transfer(asset, &Self::account_id(), who, &admission.rejected)?;
            Ok(admission.accepted)
        }

        /// Send `to_decrypt` to the gateway, stage `refund` and lock the pair.
        fn open_request(
            who: T::AccountId,
            now: u64,
            to_decrypt: &[Cipher],
            refund: RefundRecord,
            operation: PendingOperation<T::AccountId>,
        ) -> DispatchResult {
            for ct in to_decrypt {
                T::Fhe::allow_this(ct);
            }
            let request_id = T::Gateway::request_decryption(to_decrypt)?;
            Self::stage_refund(&who, request_id, refund);
            log::debug!(
                target: LOG_TARGET,
                "request {request_id}: {:?} for {who:?}, {} ciphertexts",
                operation.kind(),
                to_decrypt.len(),
            );
            Self::begin_pending(request_id, now, operation);
            Self::deposit_event(Event::DecryptionRequested {
                who,
                block: frame_system::Pallet::<T>::block_number(),
                request_id,
            });
            Ok(())
        }

        fn settle_swap(
            from: T::AccountId,
            to: T::AccountId,
            (amount0_in, amount1_in): (Cipher, Cipher),
            (numerator0, numerator1): (Cipher, Cipher),
            denominators: [u128; 2],
        ) -> DispatchResult {
            let (amount0_out, amount1_out) =
                math::swap_outputs::<T::Fhe>(&numerator0, &numerator1, denominators)
                    .ok_or(Error::<T>::ZeroDenominator)?;
            Self::apply_swap_settlement(&amount0_in, &amount1_in, &amount0_out, &amount1_out)?;

            let (token0, token1) = Self::tokens()?;
            let pair = Self::account_id();
            T::Tokens::transfer(token0, &pair, &to, &amount0_out)?;
            T::Tokens::transfer(token1, &pair, &to, &amount1_out)?;

            Self::deposit_event(Event::Swap {
                from,
                amount0_in,
                amount1_in,
                amount0_out,
                amount1_out,
                to,
            });
            Ok(())
        }

        fn settle_add_liquidity(
            who: T::AccountId,
            deposit: Deposit,
            cleartexts: &[u128],
        ) -> DispatchResult {
            let lp = T::LpToken::get();
            let pair = Self::account_id();
            match deposit {
                Deposit::Initial { amount0, amount1, liquidity } => {
                    let [meets_minimum] = Self::cleartexts::<1>(cleartexts)?;
                    Self::apply_initial_mint(&amount0, &amount1, &liquidity, meets_minimum != 0)?;

                    let minimum = T::MinimumLiquidity::get();
                    let locked = T::Fhe::trivial_encrypt(minimum.into(), FheType::U64);
                    T::Tokens::mint(lp, &pair, &locked)?;
                    T::Tokens::mint(lp, &who, &T::Fhe::sub_scalar(&liquidity, minimum.into()))?;
                },
                Deposit::Proportional { amount0, amount1, supply_blinded0, supply_blinded1 } => {
                    let settled = math::settle_deposit::<T::Fhe>(
                        &amount0,
                        &amount1,
                        &supply_blinded0,
                        &supply_blinded1,
                        Self::cleartexts(cleartexts)?,
                    )
                    .ok_or(Error::<T>::ZeroDenominator)?;
                    Self::apply_liquidity_mint(&settled.used0, &settled.used1, &settled.liquidity)?;

                    let (token0, token1) = Self::tokens()?;
                    T::Tokens::mint(lp, &who, &settled.liquidity)?;
                    T::Tokens::transfer(token0, &pair, &who, &settled.excess0)?;
                    T::Tokens::transfer(token1, &pair, &who, &settled.excess1)?;
                },
            }

            Self::deposit_event(Event::LiquidityMinted {
                block: frame_system::Pallet::<T>::block_number(),
                who,
            });
            Ok(())
        }

        fn settle_remove_liquidity(
            who: T::AccountId,
            liquidity: Cipher,
            (numerator0, numerator1): (Cipher, Cipher),
            [denominator]: [u128; 1],
        ) -> DispatchResult {
            let (amount0_out, amount1_out) =
                math::withdraw_outputs::<T::Fhe>(&numerator0, &numerator1, denominator)
                    .ok_or(Error::<T>::ZeroDenominator)?;
            Self::apply_liquidity_burn(&liquidity, &amount0_out, &amount1_out)?;

            let (token0, token1) = Self::tokens()?;
            let pair = Self::account_id();
            T::Tokens::burn(T::LpToken::get(), &pair, &liquidity)?;
            T::Tokens::transfer(token0, &pair, &who, &amount0_out)?;
            T::Tokens::transfer(token1, &pair, &who, &amount1_out)?;

            Self::deposit_event(Event::LiquidityBurnt {
                block: frame_system::Pallet::<T>::block_number(),
                who,
            });
            Ok(())
        }
    }
}
