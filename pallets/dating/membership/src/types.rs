//! # 交友会员模块 - 类型定义
//!
//! 定义账户订阅信息、等级统计等类型。

use codec::{Decode, Encode, MaxEncodedLen};
use pallet_dating_common::SubscriptionTier;
use scale_info::TypeInfo;

/// 账户订阅信息
#[derive(Clone, Encode, Decode, TypeInfo, MaxEncodedLen, PartialEq, Eq, Debug)]
pub struct AccountInfo {
    /// 存储中的订阅等级（可能已过期，未降级）
    pub tier: SubscriptionTier,
    /// 到期时间（Unix 秒），None 表示不过期
    pub expires_at: Option<u64>,
    /// 注册时间（Unix 秒）
    pub registered_at: u64,
}

impl AccountInfo {
    /// 新注册的免费账户
    pub fn new(now: u64) -> Self {
        Self {
            tier: SubscriptionTier::Free,
            expires_at: None,
            registered_at: now,
        }
    }

    /// 付费等级且到期时间已过
    pub fn is_expired(&self, now: u64) -> bool {
        self.tier.is_paid() && self.expires_at.map_or(false, |expiry| expiry < now)
    }

    /// 按当前时间计算的有效等级（不修改存储）
    pub fn effective_tier(&self, now: u64) -> SubscriptionTier {
        if self.is_expired(now) {
            SubscriptionTier::Free
        } else {
            self.tier
        }
    }

    /// 降级为免费用户
    pub fn downgrade(&mut self) {
        self.tier = SubscriptionTier::Free;
        self.expires_at = None;
    }
}

/// 各等级账户数
#[derive(Clone, Encode, Decode, TypeInfo, MaxEncodedLen, PartialEq, Eq, Debug, Default)]
pub struct TierCounts {
    pub free: u64,
    pub gold: u64,
    pub platinum: u64,
}

impl TierCounts {
    fn slot(&mut self, tier: SubscriptionTier) -> &mut u64 {
        match tier {
            SubscriptionTier::Free => &mut self.free,
            SubscriptionTier::Gold => &mut self.gold,
            SubscriptionTier::Platinum => &mut self.platinum,
        }
    }

    pub fn add(&mut self, tier: SubscriptionTier) {
        let slot = self.slot(tier);
        *slot = slot.saturating_add(1);
    }

    /// 账户从 `from` 迁移到 `to`
    pub fn moved(&mut self, from: SubscriptionTier, to: SubscriptionTier) {
        if from == to {
            return;
        }
        let slot = self.slot(from);
        *slot = slot.saturating_sub(1);
        self.add(to);
    }
}
