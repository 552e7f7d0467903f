//! 交友会员模块测试 Mock

use crate as pallet_dating_membership;
use frame_support::{derive_impl, traits::ConstU64};
use frame_system::EnsureRoot;
use pallet_dating_common::{DefaultTierPolicy, DAY_SECS};
use sp_runtime::BuildStorage;

type Block = frame_system::mocking::MockBlock<Test>;

// 配置测试运行时
frame_support::construct_runtime!(
    pub enum Test {
        System: frame_system,
        Timestamp: pallet_timestamp,
        Membership: pallet_dating_membership,
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
