//! Encrypted reserves and LP supply. Written only by settlement callbacks.

use crate::pallet::{Config, Error, LpSupply, Pallet, Reserves};
use confidential_amm_primitives::{Cipher, FheAcl, FheOps};
use frame_support::pallet_prelude::*;

impl<T: Config> Pallet<T> {
    pub fn current_reserves() -> Result<(Cipher, Cipher), DispatchError> {
        Ok(Reserves::<T>::get().ok_or(Error::<T>::NoLiquidity)?)
    }

    pub fn current_supply() -> Result<Cipher, DispatchError> {
        Ok(LpSupply::<T>::get().ok_or(Error::<T>::NoLiquidity)?)
    }

    /// `reserve_i += in_i - out_i`
    pub(crate) fn apply_swap_settlement(
        amount0_in: &Cipher,
        amount1_in: &Cipher,
        amount0_out: &Cipher,
        amount1_out: &Cipher,
    ) -> DispatchResult {
        let (reserve0, reserve1) = Self::current_reserves()?;
        let reserve0 = T::Fhe::sub(&T::Fhe::add(&reserve0, amount0_in), amount0_out);
        let reserve1 = T::Fhe::sub(&T::Fhe::add(&reserve1, amount1_in), amount1_out);
        Self::store_reserves(reserve0, reserve1);
        Ok(())
    }

    /// Open the pair. `meets_minimum` is the decrypted `liquidity >= MinimumLiquidity`.
    pub(crate) fn apply_initial_mint(
        amount0: &Cipher,
        amount1: &Cipher,
        liquidity: &Cipher,
        meets_minimum: bool,
    ) -> DispatchResult {
        ensure!(meets_minimum, Error::<T>::InsufficientInitialLiquidity);
        ensure!(Reserves::<T>::get().is_none(), Error::<T>::AlreadyInitialized);
        Self::store_supply(*liquidity);
        Self::store_reserves(*amount0, *amount1);
        Ok(())
    }

    pub(crate) fn apply_liquidity_mint(
        amount0: &Cipher,
        amount1: &Cipher,
        liquidity: &Cipher,
    ) -> DispatchResult {
        let (reserve0, reserve1) = Self::current_reserves()?;
        let supply = Self::current_supply()?;
        Self::store_supply(T::Fhe::add(&supply, liquidity));
        Self::store_reserves(T::Fhe::add(&reserve0, amount0), T::Fhe::add(&reserve1, amount1));
        Ok(())
    }

    pub(crate) fn apply_liquidity_burn(
        liquidity: &Cipher,
        amount0_out: &Cipher,
        amount1_out: &Cipher,
    ) -> DispatchResult {
        let (reserve0, reserve1) = Self::current_reserves()?;
        let supply = Self::current_supply()?;
        Self::store_supply(T::Fhe::sub(&supply, liquidity));
        Self::store_reserves(
            T::Fhe::sub(&reserve0, amount0_out),
            T::Fhe::sub(&reserve1, amount1_out),
        );
        Ok(())
    }

    fn store_reserves(reserve0: Cipher, reserve1: Cipher) {
        T::Fhe::allow_this(&reserve0);
        T::Fhe::allow_this(&reserve1);
        Reserves::<T>::put((reserve0, reserve1));
        Self::refresh_obfuscated_reserves(&reserve0, &reserve1);
    }

    fn store_supply(supply: Cipher) {
        T::Fhe::allow_this(&supply);
        LpSupply::<T>::put(supply);
    }
}
