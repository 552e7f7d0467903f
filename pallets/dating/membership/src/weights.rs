//! # 交友会员模块 - 权重定义
//!
//! 定义各个 extrinsic 的权重。

use frame_support::weights::Weight;

pub trait WeightInfo {
    fn register() -> Weight;
    fn grant_subscription() -> Weight;
    fn refresh_subscription() -> Weight;
}

/// 默认权重实现
pub struct SubstrateWeight<T>(core::marker::PhantomData<T>);

impl<T: frame_system::Config> WeightInfo for SubstrateWeight<T> {
    fn register() -> Weight {
        // 账户 + 5 项计数 + 统计
        Weight::from_parts(45_000_000, 0)
    }

    fn grant_subscription() -> Weight {
        Weight::from_parts(30_000_000, 0)
    }

    fn refresh_subscription() -> Weight {
        Weight::from_parts(20_000_000, 0)
    }
}

/// 单元测试权重
impl WeightInfo for () {
    fn register() -> Weight {
        Weight::from_parts(45_000_000, 0)
    }

    fn grant_subscription() -> Weight {
        Weight::from_parts(30_000_000, 0)
    }

    fn refresh_subscription() -> Weight {
        Weight::from_parts(20_000_000, 0)
    }
}
