//! # 交友会员模块 (Dating Membership)
//!
//! 订阅等级管理与每日配额追踪。
//!
//! ## 功能概述
//!
//! - **注册**：新账户为免费用户，所有配额计数从 0 开始
//! - **订阅授予**：由管理员（支付回调）设置付费等级和到期时间
//! - **惰性降级**：付费等级过期后，下一次检查时自动降为免费用户
//! - **配额追踪**：按 (用户, 动作) 计数，24 小时滚动窗口，首次使用时惰性重置
//!
//! ## 每日限额
//!
//! | 动作 | Free | Gold | Platinum |
//! |------|------|------|----------|
//! | 滑动 | 25 | 无限 | 无限 |
//! | 超级喜欢 | 1 | 5 | 10 |
//! | 撤销滑动 | 0 | 5 | 无限 |
//! | 分享动态 | 3 | 10 | 无限 |
//! | 动态互动 | 30 | 100 | 无限 |
//!
//! 限额为 0 表示该等级无此功能；无限的动作不计数。

#![cfg_attr(not(feature = "std"), no_std)]

pub use pallet::*;

#[cfg(test)]
mod mock;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub mod types;
pub mod weights;

pub use types::*;
pub use weights::*;

const LOG_TARGET: &str = "runtime::dating-membership";

#[frame_support::pallet]
pub mod pallet {
    use super::*;
    use frame_support::{
        pallet_prelude::*,
        storage::with_storage_layer,
        traits::{PalletInfoAccess, UnixTime},
    };
    use frame_system::pallet_prelude::*;
    use pallet_dating_common::{
        ErrorKind, Feature, Limit, PolicyError, QuotaTracker, SubscriptionTier, TierPolicy,
        UsageAction, UsageState,
    };

    #[pallet::pallet]
    pub struct Pallet<T>(_);

    /// Pallet 配置
    #[pallet::config]
    pub trait Config: frame_system::Config {
        /// 运行时事件类型
        type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

        /// 权重信息
        type WeightInfo: WeightInfo;

        /// 时钟
        type TimeProvider: UnixTime;

        /// 等级限额策略
        type Policy: TierPolicy;

        /// 授予订阅的权限（支付回调 / 管理员）
        type AdminOrigin: EnsureOrigin<Self::RuntimeOrigin>;

        /// 配额滚动窗口长度（秒）
        #[pallet::constant]
        type UsageWindow: Get<u64>;
    }

    // ========================================================================
    // 存储
    // ========================================================================

    /// 账户订阅信息
    #[pallet::storage]
    pub type Accounts<T: Config> = StorageMap<
        _,
        Blake2_128Concat,
        T::AccountId,
        AccountInfo,
    >;

    /// 配额使用计数
    ///
    /// Key1: 用户
    /// Key2: 动作类型
    #[pallet::storage]
    pub type Usages<T: Config> = StorageDoubleMap<
        _,
        Blake2_128Concat,
        T::AccountId,
        Blake2_128Concat,
        UsageAction,
        UsageState,
    >;

    /// 各等级账户数
    #[pallet::storage]
    pub type TierStats<T: Config> = StorageValue<_, TierCounts, ValueQuery>;

    // ========================================================================
    // 事件
    // ========================================================================

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        /// 新用户注册
        Registered {
            who: T::AccountId,
        },
        /// 订阅已授予
        SubscriptionGranted {
            who: T::AccountId,
            tier: SubscriptionTier,
            expires_at: Option<u64>,
        },
        /// 订阅已过期并降级
        SubscriptionExpired {
            who: T::AccountId,
            old_tier: SubscriptionTier,
        },
        /// 配额已消耗
        AllowanceConsumed {
            who: T::AccountId,
            action: UsageAction,
            used: u32,
            limit: u32,
        },
        /// 配额已归还
        AllowanceRestored {
            who: T::AccountId,
            action: UsageAction,
            used: u32,
        },
    }

    // ========================================================================
    // 错误
    // ========================================================================

    #[pallet::error]
    pub enum Error<T> {
        /// 用户不存在
        UserNotFound,
        /// 已经注册
        AlreadyRegistered,
        /// 当前等级无此功能
        FeatureUnavailable,
        /// 等级不足
        TierTooLow,
        /// 当日配额已用完
        QuotaExceeded,
        /// 未登记的动作类型
        UnknownAction,
        /// 到期时间早于当前时间
        ExpiryInPast,
    }

    impl<T> Error<T> {
        /// 对外的稳定错误分类
        pub fn kind(&self) -> ErrorKind {
            match self {
                Error::UserNotFound => ErrorKind::NotFound,
                Error::AlreadyRegistered => ErrorKind::Conflict,
                Error::FeatureUnavailable | Error::TierTooLow => ErrorKind::PermissionDenied,
                Error::QuotaExceeded => ErrorKind::QuotaExceeded,
                Error::ExpiryInPast => ErrorKind::InvalidOperation,
                _ => ErrorKind::Internal,
            }
        }
    }

    impl<T> From<PolicyError> for Error<T> {
        fn from(error: PolicyError) -> Self {
            match error {
                PolicyError::UnknownAction => Error::UnknownAction,
            }
        }
    }

    // ========================================================================
    // Extrinsics
    // ========================================================================

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        /// 注册
        ///
        /// 创建免费账户，并把所有动作的计数初始化为 `{0, now}`。
        #[pallet::call_index(0)]
        #[pallet::weight(T::WeightInfo::register())]
        pub fn register(origin: OriginFor<T>) -> DispatchResult {
            let who = ensure_signed(origin)?;

            ensure!(!Accounts::<T>::contains_key(&who), Error::<T>::AlreadyRegistered);

            let now = Self::now();
            Accounts::<T>::insert(&who, AccountInfo::new(now));
            for action in UsageAction::ALL {
                Usages::<T>::insert(&who, action, UsageState::fresh(now));
            }
            TierStats::<T>::mutate(|stats| stats.add(SubscriptionTier::Free));

            Self::deposit_event(Event::Registered { who });

            Ok(())
        }

        /// 授予订阅
        ///
        /// # 参数
        /// - `tier`: 新等级，`Free` 时忽略到期时间
        /// - `expires_at`: 到期时间（Unix 秒），None 表示不过期
        #[pallet::call_index(1)]
        #[pallet::weight(T::WeightInfo::grant_subscription())]
        pub fn grant_subscription(
            origin: OriginFor<T>,
            who: T::AccountId,
            tier: SubscriptionTier,
            expires_at: Option<u64>,
        ) -> DispatchResult {
            T::AdminOrigin::ensure_origin(origin)?;

            let expires_at = if tier.is_paid() { expires_at } else { None };
            if let Some(expiry) = expires_at {
                ensure!(expiry > Self::now(), Error::<T>::ExpiryInPast);
            }

            Accounts::<T>::try_mutate(&who, |maybe_info| -> DispatchResult {
                let info = maybe_info.as_mut().ok_or(Error::<T>::UserNotFound)?;
                let old_tier = info.tier;
                info.tier = tier;
                info.expires_at = expires_at;
                TierStats::<T>::mutate(|stats| stats.moved(old_tier, tier));
                Ok(())
            })?;

            Self::deposit_event(Event::SubscriptionGranted { who, tier, expires_at });

            Ok(())
        }

        /// 刷新订阅状态
        ///
        /// 任何人都可以调用，把已过期的付费等级落盘降级。
        #[pallet::call_index(2)]
        #[pallet::weight(T::WeightInfo::refresh_subscription())]
        pub fn refresh_subscription(origin: OriginFor<T>, who: T::AccountId) -> DispatchResult {
            ensure_signed(origin)?;
            Self::ensure_effective_tier(&who)?;
            Ok(())
        }
    }

    // ========================================================================
    // 辅助函数
    // ========================================================================

    impl<T: Config> Pallet<T> {
        /// 当前时间（Unix 秒）
        pub fn now() -> u64 {
            T::TimeProvider::now().as_secs()
        }

        pub fn is_registered(who: &T::AccountId) -> bool {
            Accounts::<T>::contains_key(who)
        }

        /// 有效等级（只读，不触发降级）
        pub fn current_tier(who: &T::AccountId) -> Option<SubscriptionTier> {
            let now = Self::now();
            Accounts::<T>::get(who).map(|info| info.effective_tier(now))
        }

        /// 有效等级；过期的付费等级会被降级并写回存储
        pub fn ensure_effective_tier(who: &T::AccountId) -> Result<SubscriptionTier, DispatchError> {
            let mut info = Accounts::<T>::get(who).ok_or(Error::<T>::UserNotFound)?;

            if info.is_expired(Self::now()) {
                let old_tier = info.tier;
                info.downgrade();
                Accounts::<T>::insert(who, &info);
                TierStats::<T>::mutate(|stats| stats.moved(old_tier, SubscriptionTier::Free));

                log::info!(
                    target: LOG_TARGET,
                    "subscription of {:?} expired, {:?} -> Free",
                    who,
                    old_tier,
                );
                Self::deposit_event(Event::SubscriptionExpired { who: who.clone(), old_tier });
            }

            Ok(info.tier)
        }

        /// 检查功能门槛
        pub fn ensure_feature(who: &T::AccountId, feature: Feature) -> DispatchResult {
            with_storage_layer(|| {
                let tier = Self::ensure_effective_tier(who)?;
                ensure!(
                    T::Policy::meets_requirement(tier, feature.required_tier()),
                    Error::<T>::TierTooLow
                );
                Ok(())
            })
        }

        /// 检查并消耗一次配额
        ///
        /// 检查、重置与递增在同一次 `try_mutate` 中完成；失败时连同惰性降级一起回滚。
        /// 返回 `false` 表示该动作在当前等级不限次数，没有计数。
        pub fn consume_allowance(who: &T::AccountId, action: UsageAction) -> Result<bool, DispatchError> {
            with_storage_layer(|| Self::do_consume(who, action))
        }

        fn do_consume(who: &T::AccountId, action: UsageAction) -> Result<bool, DispatchError> {
            let tier = Self::ensure_effective_tier(who)?;

            let limit = match T::Policy::limit_for(tier, action) {
                Limit::Unlimited => return Ok(false),
                Limit::Daily(0) => return Err(Error::<T>::FeatureUnavailable.into()),
                Limit::Daily(limit) => limit,
            };

            let now = Self::now();
            let window = T::UsageWindow::get();

            let used = Usages::<T>::try_mutate(who, action, |maybe_usage| -> Result<u32, DispatchError> {
                let usage = maybe_usage.get_or_insert_with(|| UsageState::fresh(now));
                usage.roll(now, window);
                ensure!(usage.count < limit, Error::<T>::QuotaExceeded);
                usage.count = usage.count.saturating_add(1);
                Ok(usage.count)
            })?;

            Self::deposit_event(Event::AllowanceConsumed {
                who: who.clone(),
                action,
                used,
                limit,
            });

            Ok(true)
        }

        /// 按动作名消耗配额
        pub fn consume_by_key(who: &T::AccountId, key: &str) -> Result<bool, DispatchError> {
            let action = UsageAction::from_key(key).map_err(Error::<T>::from)?;
            Self::consume_allowance(who, action)
        }

        /// 归还一次配额
        ///
        /// 计数不会低于 0，也不会移动窗口起点。
        pub fn restore_allowance(who: &T::AccountId, action: UsageAction) {
            let restored = Usages::<T>::mutate(who, action, |maybe_usage| match maybe_usage {
                Some(usage) if usage.count > 0 => {
                    usage.count -= 1;
                    Some(usage.count)
                },
                _ => None,
            });

            if let Some(used) = restored {
                Self::deposit_event(Event::AllowanceRestored {
                    who: who.clone(),
                    action,
                    used,
                });
            }
        }

        /// 当前窗口剩余次数，None 表示不限
        pub fn remaining_allowance(
            who: &T::AccountId,
            action: UsageAction,
        ) -> Result<Option<u32>, DispatchError> {
            let tier = Self::current_tier(who).ok_or(Error::<T>::UserNotFound)?;

            let limit = match T::Policy::limit_for(tier, action) {
                Limit::Unlimited => return Ok(None),
                Limit::Daily(limit) => limit,
            };

            let now = Self::now();
            let mut usage = Usages::<T>::get(who, action).unwrap_or_else(|| UsageState::fresh(now));
            usage.roll(now, T::UsageWindow::get());

            Ok(Some(limit.saturating_sub(usage.count)))
        }

        /// 识别本模块的错误
        pub fn classify_error(error: &DispatchError) -> Option<ErrorKind> {
            let DispatchError::Module(module_error) = error else {
                return None;
            };
            if module_error.index as usize != <Pallet<T> as PalletInfoAccess>::index() {
                return None;
            }
            Error::<T>::decode(&mut &module_error.error[..]).ok().map(|e| e.kind())
        }
    }

    // ========================================================================
    // Trait 实现
    // ========================================================================

    impl<T: Config> QuotaTracker<T::AccountId> for Pallet<T> {
        fn is_registered(who: &T::AccountId) -> bool {
            Self::is_registered(who)
        }

        fn effective_tier(who: &T::AccountId) -> Result<SubscriptionTier, DispatchError> {
            Self::ensure_effective_tier(who)
        }

        fn meets_requirement(who: &T::AccountId, required: SubscriptionTier) -> Result<bool, DispatchError> {
            let tier = Self::ensure_effective_tier(who)?;
            Ok(T::Policy::meets_requirement(tier, required))
        }

        fn consume(who: &T::AccountId, action: UsageAction) -> Result<bool, DispatchError> {
            Self::consume_allowance(who, action)
        }

        fn restore(who: &T::AccountId, action: UsageAction) {
            Self::restore_allowance(who, action)
        }

        fn classify(error: &DispatchError) -> Option<ErrorKind> {
            Self::classify_error(error)
        }

        #[cfg(feature = "runtime-benchmarks")]
        fn prepare_member(who: &T::AccountId, tier: SubscriptionTier) {
            let now = Self::now();
            if !Self::is_registered(who) {
                Accounts::<T>::insert(who, AccountInfo::new(now));
                TierStats::<T>::mutate(|stats| stats.add(SubscriptionTier::Free));
            }
            Accounts::<T>::mutate(who, |maybe_info| {
                if let Some(info) = maybe_info {
                    TierStats::<T>::mutate(|stats| stats.moved(info.tier, tier));
                    info.tier = tier;
                    info.expires_at = None;
                }
            });
        }
    }
}
