//! # 交友模块 - Trait 定义
//!
//! 等级策略、配额追踪，以及核心依赖的外部协作方（聊天会话、推送通知）。

use crate::types::*;
use frame_support::pallet_prelude::*;

/// 等级策略
///
/// 纯查询：等级 → 每日限额，等级 → 序号。
pub trait TierPolicy {
    /// 某等级下某动作的每日限额
    fn limit_for(tier: SubscriptionTier, action: UsageAction) -> Limit;

    /// 按动作名查询限额
    fn limit_for_key(tier: SubscriptionTier, key: &str) -> Result<Limit, PolicyError> {
        UsageAction::from_key(key).map(|action| Self::limit_for(tier, action))
    }

    fn rank_of(tier: SubscriptionTier) -> u8 {
        tier.rank()
    }

    fn meets_requirement(user_tier: SubscriptionTier, required: SubscriptionTier) -> bool {
        Self::rank_of(user_tier) >= Self::rank_of(required)
    }
}

/// 默认策略表
pub struct DefaultTierPolicy;

impl TierPolicy for DefaultTierPolicy {
    fn limit_for(tier: SubscriptionTier, action: UsageAction) -> Limit {
        TierLimits::for_tier(tier).limit_for(action)
    }
}

/// 配额追踪
///
/// 由会员模块实现；滑动模块只通过此接口读写使用计数。
pub trait QuotaTracker<AccountId> {
    /// 用户是否已注册
    fn is_registered(who: &AccountId) -> bool;

    /// 有效等级；付费等级过期时会顺带把存储降级为免费
    fn effective_tier(who: &AccountId) -> Result<SubscriptionTier, DispatchError>;

    /// 有效等级是否达到 `required`
    fn meets_requirement(who: &AccountId, required: SubscriptionTier) -> Result<bool, DispatchError>;

    /// 检查并消耗一次配额；返回是否真的计了数（不限次数的动作不计数）
    fn consume(who: &AccountId, action: UsageAction) -> Result<bool, DispatchError>;

    /// 归还一次配额；计数已为 0 时什么也不做
    fn restore(who: &AccountId, action: UsageAction);

    /// 将本模块产生的错误归类，不认识的返回 None
    fn classify(error: &DispatchError) -> Option<ErrorKind>;

    /// 基准测试用：确保账户已注册并处于 `tier`
    #[cfg(feature = "runtime-benchmarks")]
    fn prepare_member(who: &AccountId, tier: SubscriptionTier);
}

/// 聊天会话提供者
pub trait ConversationProvider<AccountId> {
    /// 为两人开启私聊；未接入聊天模块时返回 None
    fn open_direct(a: &AccountId, b: &AccountId) -> Result<Option<ConversationId>, DispatchError>;
}

impl<AccountId> ConversationProvider<AccountId> for () {
    fn open_direct(_a: &AccountId, _b: &AccountId) -> Result<Option<ConversationId>, DispatchError> {
        Ok(None)
    }
}

/// 推送失败原因
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NotifyError {
    /// 用户没有可用的推送设备
    NoDevice,
    /// 推送通道不可用
    Unavailable,
}

/// 推送通知
///
/// 只发不等：失败由调用方记录日志后丢弃。
pub trait Notifier<AccountId> {
    fn notify(who: &AccountId, notification: &Notification<AccountId>) -> Result<(), NotifyError>;
}

impl<AccountId> Notifier<AccountId> for () {
    fn notify(_who: &AccountId, _notification: &Notification<AccountId>) -> Result<(), NotifyError> {
        Ok(())
    }
}
