//! # 交友模块 - 共享类型定义
//!
//! 订阅等级、配额动作、每日限额、滑动信号、匹配记录等核心数据结构。

use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use scale_info::TypeInfo;

/// 一天的秒数（滚动窗口的默认长度）
pub const DAY_SECS: u64 = 24 * 60 * 60;

/// 会话句柄（由聊天模块分配）
pub type ConversationId = u64;

// ============================================================================
// 订阅等级
// ============================================================================

/// 订阅等级
///
/// 序号越大权限越高，功能门槛按序号比较。
#[derive(
    Clone, Copy, Encode, Decode, DecodeWithMemTracking, TypeInfo, MaxEncodedLen, PartialEq, Eq, Debug, Default,
)]
pub enum SubscriptionTier {
    /// 免费用户
    #[default]
    Free = 0,
    /// 黄金会员
    Gold = 1,
    /// 白金会员
    Platinum = 2,
}

impl SubscriptionTier {
    /// 等级序号
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    /// 是否达到 `required` 要求的等级
    pub fn meets(&self, required: SubscriptionTier) -> bool {
        self.rank() >= required.rank()
    }

    pub fn is_paid(&self) -> bool {
        *self != SubscriptionTier::Free
    }
}

// ============================================================================
// 配额动作
// ============================================================================

/// 受每日配额约束的动作类型
///
/// 每个 (用户, 动作) 拥有独立的滚动窗口。
#[derive(
    Clone, Copy, Encode, Decode, DecodeWithMemTracking, TypeInfo, MaxEncodedLen, PartialEq, Eq, Debug,
)]
pub enum UsageAction {
    /// 普通滑动（喜欢 / 不喜欢）
    Swipe,
    /// 超级喜欢
    SuperLike,
    /// 撤销上一次滑动
    UndoSwipe,
    /// 分享动态
    PostShare,
    /// 动态互动（点赞、评论等）
    Interaction,
}

impl UsageAction {
    pub const ALL: [UsageAction; 5] = [
        UsageAction::Swipe,
        UsageAction::SuperLike,
        UsageAction::UndoSwipe,
        UsageAction::PostShare,
        UsageAction::Interaction,
    ];

    /// 外部接口使用的动作名
    pub fn key(&self) -> &'static str {
        match self {
            Self::Swipe => "swipe",
            Self::SuperLike => "superLike",
            Self::UndoSwipe => "undoSwipe",
            Self::PostShare => "postShare",
            Self::Interaction => "interaction",
        }
    }

    /// 按动作名解析；未知动作名属于配置错误
    pub fn from_key(key: &str) -> Result<Self, PolicyError> {
        Self::ALL
            .iter()
            .copied()
            .find(|action| action.key() == key)
            .ok_or(PolicyError::UnknownAction)
    }
}

/// 策略表错误
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PolicyError {
    /// 未登记的动作类型
    UnknownAction,
}

// ============================================================================
// 每日限额
// ============================================================================

/// 单项每日限额
#[derive(
    Clone, Copy, Encode, Decode, DecodeWithMemTracking, TypeInfo, MaxEncodedLen, PartialEq, Eq, Debug,
)]
pub enum Limit {
    /// 不限次数（不计数）
    Unlimited,
    /// 每个窗口最多 n 次，0 表示该等级不可用
    Daily(u32),
}

impl Limit {
    /// 0 次即功能关闭
    pub fn is_disabled(&self) -> bool {
        matches!(self, Limit::Daily(0))
    }
}

/// 等级限额表的一行
#[derive(Clone, Copy, Encode, Decode, TypeInfo, MaxEncodedLen, PartialEq, Eq, Debug)]
pub struct TierLimits {
    pub daily_swipes: Limit,
    pub daily_super_likes: Limit,
    pub daily_undo_swipes: Limit,
    pub daily_post_shares: Limit,
    pub daily_interactions: Limit,
}

impl TierLimits {
    pub fn free_tier() -> Self {
        Self {
            daily_swipes: Limit::Daily(25),
            daily_super_likes: Limit::Daily(1),
            daily_undo_swipes: Limit::Daily(0),
            daily_post_shares: Limit::Daily(3),
            daily_interactions: Limit::Daily(30),
        }
    }

    pub fn gold_tier() -> Self {
        Self {
            daily_swipes: Limit::Unlimited,
            daily_super_likes: Limit::Daily(5),
            daily_undo_swipes: Limit::Daily(5),
            daily_post_shares: Limit::Daily(10),
            daily_interactions: Limit::Daily(100),
        }
    }

    pub fn platinum_tier() -> Self {
        Self {
            daily_swipes: Limit::Unlimited,
            daily_super_likes: Limit::Daily(10),
            daily_undo_swipes: Limit::Unlimited,
            daily_post_shares: Limit::Unlimited,
            daily_interactions: Limit::Unlimited,
        }
    }

    /// 根据订阅等级获取限额
    pub fn for_tier(tier: SubscriptionTier) -> Self {
        match tier {
            SubscriptionTier::Free => Self::free_tier(),
            SubscriptionTier::Gold => Self::gold_tier(),
            SubscriptionTier::Platinum => Self::platinum_tier(),
        }
    }

    pub fn limit_for(&self, action: UsageAction) -> Limit {
        match action {
            UsageAction::Swipe => self.daily_swipes,
            UsageAction::SuperLike => self.daily_super_likes,
            UsageAction::UndoSwipe => self.daily_undo_swipes,
            UsageAction::PostShare => self.daily_post_shares,
            UsageAction::Interaction => self.daily_interactions,
        }
    }
}

// ============================================================================
// 功能门槛
// ============================================================================

/// 需要付费等级才能使用的功能
#[derive(
    Clone, Copy, Encode, Decode, DecodeWithMemTracking, TypeInfo, MaxEncodedLen, PartialEq, Eq, Debug,
)]
pub enum Feature {
    SuperLike,
    SeeWhoLikedMe,
    AdvancedDatingFilters,
    PinPostToProfile,
    AdvancedPostAnalytics,
}

impl Feature {
    /// 使用该功能所需的最低等级
    pub fn required_tier(&self) -> SubscriptionTier {
        match self {
            Self::SuperLike => SubscriptionTier::Gold,
            Self::SeeWhoLikedMe => SubscriptionTier::Platinum,
            Self::AdvancedDatingFilters => SubscriptionTier::Platinum,
            Self::PinPostToProfile => SubscriptionTier::Gold,
            Self::AdvancedPostAnalytics => SubscriptionTier::Platinum,
        }
    }
}

// ============================================================================
// 配额使用状态
// ============================================================================

/// 单个 (用户, 动作) 的使用计数
#[derive(Clone, Copy, Encode, Decode, DecodeWithMemTracking, TypeInfo, MaxEncodedLen, PartialEq, Eq, Debug, Default)]
pub struct UsageState {
    /// 当前窗口内已使用次数
    pub count: u32,
    /// 窗口起点（Unix 秒）
    pub last_reset: u64,
}

impl UsageState {
    pub fn fresh(now: u64) -> Self {
        Self { count: 0, last_reset: now }
    }

    /// 距上次重置是否已满一个窗口
    pub fn window_elapsed(&self, now: u64, window: u64) -> bool {
        now.saturating_sub(self.last_reset) >= window
    }

    /// 窗口已过则惰性重置，返回是否发生了重置
    pub fn roll(&mut self, now: u64, window: u64) -> bool {
        if self.window_elapsed(now, window) {
            *self = Self::fresh(now);
            return true;
        }
        false
    }
}

// ============================================================================
// 滑动信号
// ============================================================================

/// 滑动动作
#[derive(
    Clone, Copy, Encode, Decode, DecodeWithMemTracking, TypeInfo, MaxEncodedLen, PartialEq, Eq, Debug,
)]
pub enum SwipeAction {
    /// 喜欢
    Like,
    /// 不喜欢
    Dislike,
    /// 超级喜欢
    SuperLike,
}

impl SwipeAction {
    /// 喜欢和超级喜欢都算正向信号
    pub fn is_positive(&self) -> bool {
        matches!(self, SwipeAction::Like | SwipeAction::SuperLike)
    }

    /// 该动作消耗的配额类型
    pub fn usage_action(&self) -> UsageAction {
        match self {
            SwipeAction::SuperLike => UsageAction::SuperLike,
            _ => UsageAction::Swipe,
        }
    }
}

/// 单向滑动记录
///
/// 每个有序对 (swiper, swiped) 最多一条。
#[derive(Clone, Copy, Encode, Decode, DecodeWithMemTracking, TypeInfo, MaxEncodedLen, PartialEq, Eq, Debug)]
pub struct SwipeSignal {
    pub action: SwipeAction,
    /// 创建时间（Unix 秒）
    pub created_at: u64,
    /// 在发起者滑动日志中的位置，撤销按它而非时间取最新
    pub seq: u32,
    /// 创建时是否计入了配额，撤销时只归还计过数的
    pub charged: bool,
}

// ============================================================================
// 匹配
// ============================================================================

/// 规范化的无序对键：较小的账户在前
pub fn pair_key<AccountId: Ord + Clone>(a: &AccountId, b: &AccountId) -> (AccountId, AccountId) {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

/// 匹配记录
#[derive(Clone, Encode, Decode, DecodeWithMemTracking, TypeInfo, MaxEncodedLen, PartialEq, Eq, Debug)]
pub struct MatchRecord<AccountId> {
    /// 规范化后的双方
    pub users: (AccountId, AccountId),
    /// 会话句柄（聊天模块未接入时为空）
    pub conversation: Option<ConversationId>,
    /// 匹配时间（Unix 秒）
    pub created_at: u64,
}

impl<AccountId: PartialEq> MatchRecord<AccountId> {
    pub fn involves(&self, who: &AccountId) -> bool {
        self.users.0 == *who || self.users.1 == *who
    }
}

/// 一次滑动的结果
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SwipeOutcome<AccountId> {
    pub matched: bool,
    pub record: Option<MatchRecord<AccountId>>,
}

impl<AccountId> SwipeOutcome<AccountId> {
    pub fn unmatched() -> Self {
        Self { matched: false, record: None }
    }

    pub fn matched(record: MatchRecord<AccountId>) -> Self {
        Self { matched: true, record: Some(record) }
    }
}

/// 撤销回执
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct UndoReceipt<AccountId> {
    /// 被撤销信号的目标
    pub target: AccountId,
    pub signal: SwipeSignal,
    /// 撤销是否解除了已有匹配
    pub unmatched: bool,
}

// ============================================================================
// 通知
// ============================================================================

/// 推送给用户的通知内容
#[derive(Clone, Encode, Decode, DecodeWithMemTracking, TypeInfo, MaxEncodedLen, PartialEq, Eq, Debug)]
pub enum Notification<AccountId> {
    /// 新匹配
    NewMatch {
        with: AccountId,
        /// 由超级喜欢促成
        super_like: bool,
        conversation: Option<ConversationId>,
    },
    /// 收到超级喜欢（尚未匹配）
    SuperLiked { from: AccountId },
}

// ============================================================================
// 错误分类
// ============================================================================

/// 面向外部接口的稳定错误分类
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ErrorKind {
    /// 非法操作（如对自己滑动）
    InvalidOperation,
    /// 等级不足、功能未开放、订阅过期
    PermissionDenied,
    /// 当日配额已用完
    QuotaExceeded,
    /// 重复信号
    Conflict,
    /// 无可撤销记录、未知用户
    NotFound,
    /// 配置错误或存储故障
    Internal,
}
