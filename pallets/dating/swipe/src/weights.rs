//! # 交友滑动模块 - 权重定义
//!
//! 定义各个 extrinsic 的权重。

use frame_support::weights::Weight;

pub trait WeightInfo {
    fn swipe() -> Weight;
    fn undo_swipe() -> Weight;
    fn flush_notifications(n: u32) -> Weight;
}

/// 默认权重实现
pub struct SubstrateWeight<T>(core::marker::PhantomData<T>);

impl<T: frame_system::Config> WeightInfo for SubstrateWeight<T> {
    fn swipe() -> Weight {
        // 配额 + 信号 + 日志 + 可能的匹配
        Weight::from_parts(80_000_000, 0)
    }

    fn undo_swipe() -> Weight {
        Weight::from_parts(60_000_000, 0)
    }

    fn flush_notifications(n: u32) -> Weight {
        Weight::from_parts(5_000_000, 0)
            .saturating_add(Weight::from_parts(2_000_000, 0).saturating_mul(n as u64))
    }
}

/// 单元测试权重
impl WeightInfo for () {
    fn swipe() -> Weight {
        Weight::from_parts(80_000_000, 0)
    }

    fn undo_swipe() -> Weight {
        Weight::from_parts(60_000_000, 0)
    }

    fn flush_notifications(n: u32) -> Weight {
        Weight::from_parts(5_000_000, 0)
            .saturating_add(Weight::from_parts(2_000_000, 0).saturating_mul(n as u64))
    }
}
