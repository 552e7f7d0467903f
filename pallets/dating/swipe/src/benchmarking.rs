//! # Dating Swipe Pallet Benchmarking
//!
//! 交友滑动模块基准测试

#![cfg(feature = "runtime-benchmarks")]

use super::*;
use frame_benchmarking::v2::*;
use frame_system::RawOrigin;
use pallet::*;
use pallet_dating_common::{QuotaTracker, SubscriptionTier, SwipeAction};

#[benchmarks]
mod benchmarks {
    use super::*;

    /// 最重路径：超级喜欢触发匹配
    #[benchmark]
    fn swipe() -> Result<(), BenchmarkError> {
        let caller: T::AccountId = whitelisted_caller();
        let target: T::AccountId = account("target", 0, 0);
        T::Quota::prepare_member(&caller, SubscriptionTier::Platinum);
        T::Quota::prepare_member(&target, SubscriptionTier::Platinum);
        Pallet::<T>::record(&target, &caller, SwipeAction::Like, false)?;

        #[extrinsic_call]
        _(RawOrigin::Signed(caller.clone()), target.clone(), SwipeAction::SuperLike);

        assert!(Pallet::<T>::match_between(&caller, &target).is_some());
        Ok(())
    }

    /// 最重路径：撤销并解除匹配
    #[benchmark]
    fn undo_swipe() -> Result<(), BenchmarkError> {
        let caller: T::AccountId = whitelisted_caller();
        let target: T::AccountId = account("target", 0, 0);
        T::Quota::prepare_member(&caller, SubscriptionTier::Platinum);
        T::Quota::prepare_member(&target, SubscriptionTier::Platinum);
        Pallet::<T>::record(&target, &caller, SwipeAction::Like, false)?;
        Pallet::<T>::do_swipe(&caller, &target, SwipeAction::Like)?;

        #[extrinsic_call]
        _(RawOrigin::Signed(caller.clone()));

        assert!(Pallet::<T>::match_between(&caller, &target).is_none());
        Ok(())
    }

    #[benchmark]
    fn flush_notifications(n: Linear<0, { T::MaxPendingNotifications::get() }>) -> Result<(), BenchmarkError> {
        for i in 0..n {
            let from: T::AccountId = account("liker", i, 0);
            let to: T::AccountId = account("liked", i, 0);
            T::Quota::prepare_member(&from, SubscriptionTier::Gold);
            T::Quota::prepare_member(&to, SubscriptionTier::Free);
            Pallet::<T>::do_swipe(&from, &to, SwipeAction::SuperLike)?;
        }

        #[block]
        {
            Pallet::<T>::flush_notifications();
        }

        assert!(PendingNotifications::<T>::get().is_empty());
        Ok(())
    }

    impl_benchmark_test_suite!(Pallet, crate::mock::new_test_ext(), crate::mock::Test);
}
