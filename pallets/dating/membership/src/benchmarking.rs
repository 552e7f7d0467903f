//! # Dating Membership Pallet Benchmarking
//!
//! 交友会员模块基准测试

#![cfg(feature = "runtime-benchmarks")]

use super::*;
use frame_benchmarking::v2::*;
use frame_support::traits::EnsureOrigin;
use frame_system::RawOrigin;
use pallet::*;
use pallet_dating_common::SubscriptionTier;

#[benchmarks]
mod benchmarks {
    use super::*;

    #[benchmark]
    fn register() {
        let caller: T::AccountId = whitelisted_caller();

        #[extrinsic_call]
        _(RawOrigin::Signed(caller.clone()));

        assert!(Pallet::<T>::is_registered(&caller));
    }

    #[benchmark]
    fn grant_subscription() -> Result<(), BenchmarkError> {
        let who: T::AccountId = account("member", 0, 0);
        Pallet::<T>::register(RawOrigin::Signed(who.clone()).into())?;
        let origin = T::AdminOrigin::try_successful_origin()
            .map_err(|_| BenchmarkError::Weightless)?;
        let expires_at = Some(Pallet::<T>::now().saturating_add(30 * pallet_dating_common::DAY_SECS));

        #[extrinsic_call]
        _(origin as T::RuntimeOrigin, who.clone(), SubscriptionTier::Gold, expires_at);

        assert_eq!(Pallet::<T>::current_tier(&who), Some(SubscriptionTier::Gold));
        Ok(())
    }

    #[benchmark]
    fn refresh_subscription() -> Result<(), BenchmarkError> {
        let caller: T::AccountId = whitelisted_caller();
        let who: T::AccountId = account("member", 0, 0);
        Pallet::<T>::register(RawOrigin::Signed(who.clone()).into())?;

        #[extrinsic_call]
        _(RawOrigin::Signed(caller), who);

        Ok(())
    }

    impl_benchmark_test_suite!(Pallet, crate::mock::new_test_ext(), crate::mock::Test);
}
