//! 交友滑动模块测试 Mock

use crate as pallet_dating_swipe;
use core::cell::RefCell;
use frame_support::{
    derive_impl,
    traits::{ConstU32, ConstU64},
};
use frame_system::EnsureRoot;
use pallet_dating_common::{
    ConversationId, ConversationProvider, DefaultTierPolicy, Notification, Notifier, NotifyError,
    DAY_SECS,
};
use sp_runtime::{BuildStorage, DispatchError};

type Block = frame_system::mocking::MockBlock<Test>;

// 配置测试运行时
frame_support::construct_runtime!(
    pub enum Test {
        System: frame_system,
        Timestamp: pallet_timestamp,
        Membership: pallet_dating_membership,
        Swipe: pallet_dating_swipe,
    }
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
    type Block = Block;
}

impl pallet_timestamp::Config for Test {
    type Moment = u64;
    type OnTimestampSet = ();
    type MinimumPeriod = ConstU64<1>;
    type WeightInfo = ();
}

impl pallet_dating_membership::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type WeightInfo = ();
    type TimeProvider = Timestamp;
    type Policy = DefaultTierPolicy;
    type AdminOrigin = EnsureRoot<u64>;
    type UsageWindow = ConstU64<DAY_SECS>;
}

impl pallet_dating_swipe::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type WeightInfo = ();
    type TimeProvider = Timestamp;
    type Quota = Membership;
    type Conversations = TestConversations;
    type Notifier = TestNotifier;
    type MaxPendingNotifications = ConstU32<4>;
}

thread_local! {
    static NEXT_CONVERSATION: RefCell<ConversationId> = RefCell::new(100);
    static CHAT_DOWN: RefCell<bool> = RefCell::new(false);
    static SENT: RefCell<Vec<(u64, Notification<u64>)>> = RefCell::new(Vec::new());
}

/// 顺序分配会话号的聊天模块
pub struct TestConversations;
impl ConversationProvider<u64> for TestConversations {
    fn open_direct(_a: &u64, _b: &u64) -> Result<Option<ConversationId>, DispatchError> {
        if CHAT_DOWN.with(|down| *down.borrow()) {
            return Err(DispatchError::Other("chat unavailable"));
        }
        Ok(Some(NEXT_CONVERSATION.with(|next| {
            let id = *next.borrow();
            *next.borrow_mut() = id + 1;
            id
        })))
    }
}

/// 记录已发送通知；发给 `NO_DEVICE` 的通知失败
pub struct TestNotifier;
impl Notifier<u64> for TestNotifier {
    fn notify(who: &u64, notification: &Notification<u64>) -> Result<(), NotifyError> {
        if *who == NO_DEVICE {
            return Err(NotifyError::NoDevice);
        }
        SENT.with(|sent| sent.borrow_mut().push((*who, notification.clone())));
        Ok(())
    }
}

pub fn set_chat_down(down: bool) {
    CHAT_DOWN.with(|flag| *flag.borrow_mut() = down);
}

/// 已送达的通知
pub fn sent_notifications() -> Vec<(u64, Notification<u64>)> {
    SENT.with(|sent| sent.borrow().clone())
}

/// 测试起始时间（Unix 秒）
pub const GENESIS_SECS: u64 = 1_700_000_000;

/// 构建测试外部环境
pub fn new_test_ext() -> sp_io::TestExternalities {
    let t = frame_system::GenesisConfig::<Test>::default()
        .build_storage()
        .unwrap();
    let mut ext = sp_io::TestExternalities::new(t);
    ext.execute_with(|| {
        System::set_block_number(1);
        set_now(GENESIS_SECS);
    });
    ext
}

/// 设置当前时间（秒）
pub fn set_now(secs: u64) {
    Timestamp::set_timestamp(secs * 1_000);
}

/// 时间前进（秒）
pub fn advance(secs: u64) {
    set_now(Membership::now() + secs);
}

/// 测试账户
pub const ALICE: u64 = 1;
pub const BOB: u64 = 2;
pub const CHARLIE: u64 = 3;
pub const DAVE: u64 = 4;
/// 没有推送设备的账户
pub const NO_DEVICE: u64 = 9;
