//! # 交友模块 - 滑动与匹配
//!
//! 本模块实现滑动配对：记录单向滑动信号，检测双向喜欢并创建匹配。
//!
//! ## 功能概述
//!
//! - **滑动**：喜欢 / 不喜欢 / 超级喜欢，每个有序对最多一条信号
//! - **匹配检测**：双方都发出正向信号时创建唯一的匹配记录并开启会话
//! - **撤销**：撤销自己最近一次滑动，归还对应配额
//! - **谁喜欢了我**：喜欢我但我尚未回应的用户
//!
//! ## 一致性
//!
//! - 匹配按规范化的无序对键存储，只在空位写入（insert-if-absent），保证同一对只有一条
//! - 滑动和撤销整体在一个存储层内执行，任一步失败都会回滚全部写入
//! - 通知在区块结束时统一发送，回滚的调用不会产生通知

#![cfg_attr(not(feature = "std"), no_std)]

pub use pallet::*;

#[cfg(test)]
mod mock;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub mod weights;
pub use weights::WeightInfo;

const LOG_TARGET: &str = "runtime::dating-swipe";

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
        pair_key, ConversationProvider, ConversationId, ErrorKind, Feature, MatchRecord,
        Notification, Notifier, QuotaTracker, SwipeAction, SwipeOutcome, SwipeSignal,
        UndoReceipt, UsageAction,
    };
    use sp_std::vec::Vec;

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

        /// 等级与配额（会员模块）
        type Quota: QuotaTracker<Self::AccountId>;

        /// 匹配成功后开启私聊
        type Conversations: ConversationProvider<Self::AccountId>;

        /// 推送通知
        type Notifier: Notifier<Self::AccountId>;

        /// 每个区块最多排队的通知数，超出的丢弃并记录日志
        #[pallet::constant]
        type MaxPendingNotifications: Get<u32>;
    }

    // ========================================================================
    // 存储
    // ========================================================================

    /// 滑动信号
    ///
    /// Key1: 发起者
    /// Key2: 目标
    #[pallet::storage]
    pub type Swipes<T: Config> = StorageDoubleMap<
        _,
        Blake2_128Concat,
        T::AccountId,
        Blake2_128Concat,
        T::AccountId,
        SwipeSignal,
    >;

    /// 滑动日志（按位置记录目标，撤销时取最后一条）
    #[pallet::storage]
    pub type SwipeJournal<T: Config> = StorageDoubleMap<
        _,
        Blake2_128Concat,
        T::AccountId,
        Twox64Concat,
        u32,
        T::AccountId,
    >;

    /// 滑动日志长度
    #[pallet::storage]
    pub type SwipeJournalLen<T: Config> = StorageMap<_, Blake2_128Concat, T::AccountId, u32, ValueQuery>;

    /// 收到的正向信号
    ///
    /// Key1: 被喜欢的用户
    /// Key2: 喜欢者
    #[pallet::storage]
    pub type Likers<T: Config> = StorageDoubleMap<
        _,
        Blake2_128Concat,
        T::AccountId,
        Blake2_128Concat,
        T::AccountId,
        (),
    >;

    /// 匹配记录，键为 (较小账户, 较大账户)
    #[pallet::storage]
    pub type Matches<T: Config> = StorageMap<
        _,
        Blake2_128Concat,
        (T::AccountId, T::AccountId),
        MatchRecord<T::AccountId>,
    >;

    /// 用户 → 匹配对象 索引
    #[pallet::storage]
    pub type MatchesOf<T: Config> = StorageDoubleMap<
        _,
        Blake2_128Concat,
        T::AccountId,
        Blake2_128Concat,
        T::AccountId,
        (),
    >;

    /// 待发送的通知（区块结束时清空）
    #[pallet::storage]
    pub type PendingNotifications<T: Config> = StorageValue<
        _,
        BoundedVec<(T::AccountId, Notification<T::AccountId>), T::MaxPendingNotifications>,
        ValueQuery,
    >;

    // ========================================================================
    // 事件
    // ========================================================================

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        /// 已滑动
        Swiped {
            who: T::AccountId,
            target: T::AccountId,
            action: SwipeAction,
        },
        /// 匹配成功
        Matched {
            users: (T::AccountId, T::AccountId),
            conversation: Option<ConversationId>,
        },
        /// 匹配因撤销而解除
        MatchDissolved {
            users: (T::AccountId, T::AccountId),
        },
        /// 滑动已撤销
        SwipeUndone {
            who: T::AccountId,
            target: T::AccountId,
            action: SwipeAction,
            unmatched: bool,
        },
    }

    // ========================================================================
    // 错误
    // ========================================================================

    #[pallet::error]
    pub enum Error<T> {
        /// 不能对自己滑动
        CannotSwipeSelf,
        /// 超级喜欢需要升级会员
        SuperLikeRequiresUpgrade,
        /// 已经滑动过该用户
        AlreadySwiped,
        /// 没有可撤销的滑动
        NothingToUndo,
        /// 用户不存在
        UnknownUser,
        /// 滑动日志已满
        JournalFull,
    }

    impl<T> Error<T> {
        /// 对外的稳定错误分类
        pub fn kind(&self) -> ErrorKind {
            match self {
                Error::CannotSwipeSelf => ErrorKind::InvalidOperation,
                Error::SuperLikeRequiresUpgrade => ErrorKind::PermissionDenied,
                Error::AlreadySwiped => ErrorKind::Conflict,
                Error::NothingToUndo | Error::UnknownUser => ErrorKind::NotFound,
                _ => ErrorKind::Internal,
            }
        }
    }

    // ========================================================================
    // Hooks
    // ========================================================================

    #[pallet::hooks]
    impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
        fn on_initialize(_n: BlockNumberFor<T>) -> Weight {
            T::WeightInfo::flush_notifications(T::MaxPendingNotifications::get())
        }

        /// 区块内的调用均已提交，此时发送通知
        fn on_finalize(_n: BlockNumberFor<T>) {
            Self::flush_notifications();
        }
    }

    // ========================================================================
    // Extrinsics
    // ========================================================================

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        /// 滑动
        ///
        /// # 参数
        /// - `target`: 目标用户
        /// - `action`: 喜欢 / 不喜欢 / 超级喜欢
        #[pallet::call_index(0)]
        #[pallet::weight(T::WeightInfo::swipe())]
        pub fn swipe(origin: OriginFor<T>, target: T::AccountId, action: SwipeAction) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::do_swipe(&who, &target, action)?;
            Ok(())
        }

        /// 撤销最近一次滑动
        #[pallet::call_index(1)]
        #[pallet::weight(T::WeightInfo::undo_swipe())]
        pub fn undo_swipe(origin: OriginFor<T>) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::do_undo(&who)?;
            Ok(())
        }
    }

    // ========================================================================
    // 编排
    // ========================================================================

    impl<T: Config> Pallet<T> {
        pub fn now() -> u64 {
            T::TimeProvider::now().as_secs()
        }

        /// 滑动：校验 → 配额 → 记录 → 匹配检测
        pub fn do_swipe(
            swiper: &T::AccountId,
            swiped: &T::AccountId,
            action: SwipeAction,
        ) -> Result<SwipeOutcome<T::AccountId>, DispatchError> {
            with_storage_layer(|| {
                ensure!(swiper != swiped, Error::<T>::CannotSwipeSelf);
                ensure!(T::Quota::is_registered(swiper), Error::<T>::UnknownUser);
                ensure!(T::Quota::is_registered(swiped), Error::<T>::UnknownUser);

                if action == SwipeAction::SuperLike {
                    ensure!(
                        T::Quota::meets_requirement(swiper, Feature::SuperLike.required_tier())?,
                        Error::<T>::SuperLikeRequiresUpgrade
                    );
                }

                let charged = T::Quota::consume(swiper, action.usage_action())?;
                Self::record(swiper, swiped, action, charged)?;

                Self::deposit_event(Event::Swiped {
                    who: swiper.clone(),
                    target: swiped.clone(),
                    action,
                });

                Self::check_and_create(swiper, swiped, action)
            })
        }

        /// 撤销：消耗撤销配额 → 弹出最近信号 → 归还原配额
        pub fn do_undo(user: &T::AccountId) -> Result<UndoReceipt<T::AccountId>, DispatchError> {
            with_storage_layer(|| {
                T::Quota::consume(user, UsageAction::UndoSwipe)?;

                let (target, signal) = Self::pop_most_recent_by(user)?;
                if signal.charged {
                    T::Quota::restore(user, signal.action.usage_action());
                }

                let unmatched = signal.action.is_positive() && Self::dissolve_match(user, &target);

                Self::deposit_event(Event::SwipeUndone {
                    who: user.clone(),
                    target: target.clone(),
                    action: signal.action,
                    unmatched,
                });

                Ok(UndoReceipt { target, signal, unmatched })
            })
        }

        /// 喜欢我但我尚未回应的用户
        pub fn who_liked_me(user: &T::AccountId) -> Result<Vec<T::AccountId>, DispatchError> {
            ensure!(T::Quota::is_registered(user), Error::<T>::UnknownUser);
            Ok(Self::likers_of(user))
        }

        /// 把任意调度错误归入稳定分类
        pub fn error_kind(error: &DispatchError) -> ErrorKind {
            if let DispatchError::Module(module_error) = error {
                if module_error.index as usize == <Pallet<T> as PalletInfoAccess>::index() {
                    if let Ok(e) = Error::<T>::decode(&mut &module_error.error[..]) {
                        return e.kind();
                    }
                }
            }

            T::Quota::classify(error).unwrap_or_else(|| {
                log::error!(target: LOG_TARGET, "unclassified dispatch error: {:?}", error);
                ErrorKind::Internal
            })
        }
    }

    // ========================================================================
    // 滑动记录
    // ========================================================================

    impl<T: Config> Pallet<T> {
        /// 记录一条单向信号；同一有序对只能有一条
        ///
        /// `charged` 表示这次滑动是否计入了配额。
        pub fn record(
            swiper: &T::AccountId,
            swiped: &T::AccountId,
            action: SwipeAction,
            charged: bool,
        ) -> Result<SwipeSignal, DispatchError> {
            ensure!(swiper != swiped, Error::<T>::CannotSwipeSelf);
            ensure!(!Swipes::<T>::contains_key(swiper, swiped), Error::<T>::AlreadySwiped);

            let seq = SwipeJournalLen::<T>::get(swiper);
            let next = seq.checked_add(1).ok_or(Error::<T>::JournalFull)?;

            let signal = SwipeSignal { action, created_at: Self::now(), seq, charged };
            Swipes::<T>::insert(swiper, swiped, signal);
            SwipeJournal::<T>::insert(swiper, seq, swiped);
            SwipeJournalLen::<T>::insert(swiper, next);
            if action.is_positive() {
                Likers::<T>::insert(swiped, swiper, ());
            }

            Ok(signal)
        }

        pub fn signal(swiper: &T::AccountId, swiped: &T::AccountId) -> Option<SwipeSignal> {
            Swipes::<T>::get(swiper, swiped)
        }

        /// `swiped` 是否已对 `swiper` 发出正向信号
        pub fn reciprocal_exists(swiper: &T::AccountId, swiped: &T::AccountId) -> bool {
            Swipes::<T>::get(swiped, swiper).map_or(false, |signal| signal.action.is_positive())
        }

        /// 删除并返回发起者最近的一条信号
        pub fn pop_most_recent_by(swiper: &T::AccountId) -> Result<(T::AccountId, SwipeSignal), DispatchError> {
            let len = SwipeJournalLen::<T>::get(swiper);
            let seq = len.checked_sub(1).ok_or(Error::<T>::NothingToUndo)?;

            let target = SwipeJournal::<T>::take(swiper, seq).ok_or(Error::<T>::NothingToUndo)?;
            let signal = Swipes::<T>::take(swiper, &target).ok_or(Error::<T>::NothingToUndo)?;
            Likers::<T>::remove(&target, swiper);

            if seq == 0 {
                SwipeJournalLen::<T>::remove(swiper);
            } else {
                SwipeJournalLen::<T>::insert(swiper, seq);
            }

            Ok((target, signal))
        }

        /// 对 `user` 发出正向信号、且 `user` 尚未回应的用户
        pub fn likers_of(user: &T::AccountId) -> Vec<T::AccountId> {
            Likers::<T>::iter_key_prefix(user)
                .filter(|liker| !Swipes::<T>::contains_key(user, liker))
                .collect()
        }

        /// 用户已滑动过的目标，按滑动顺序
        pub fn swiped_targets(user: &T::AccountId) -> Vec<T::AccountId> {
            (0..SwipeJournalLen::<T>::get(user))
                .filter_map(|seq| SwipeJournal::<T>::get(user, seq))
                .collect()
        }
    }

    // ========================================================================
    // 匹配
    // ========================================================================

    impl<T: Config> Pallet<T> {
        /// 检测并创建匹配
        ///
        /// 匹配在同一次 `try_mutate` 中只写入空位；已存在的匹配视为成功，直接返回原记录。
        pub fn check_and_create(
            swiper: &T::AccountId,
            swiped: &T::AccountId,
            action: SwipeAction,
        ) -> Result<SwipeOutcome<T::AccountId>, DispatchError> {
            if !action.is_positive() {
                return Ok(SwipeOutcome::unmatched());
            }

            let Some(reciprocal) = Swipes::<T>::get(swiped, swiper).filter(|s| s.action.is_positive()) else {
                if action == SwipeAction::SuperLike {
                    Self::queue_notification(swiped, Notification::SuperLiked { from: swiper.clone() });
                }
                return Ok(SwipeOutcome::unmatched());
            };

            let key = pair_key(swiper, swiped);
            let mut created = false;
            let record = Matches::<T>::try_mutate(&key, |slot| -> Result<_, DispatchError> {
                if let Some(existing) = slot {
                    return Ok(existing.clone());
                }
                let record = MatchRecord {
                    users: key.clone(),
                    conversation: T::Conversations::open_direct(&key.0, &key.1)?,
                    created_at: Self::now(),
                };
                *slot = Some(record.clone());
                created = true;
                Ok(record)
            })?;
            if !created {
                return Ok(SwipeOutcome::matched(record));
            }

            let conversation = record.conversation;
            MatchesOf::<T>::insert(&key.0, &key.1, ());
            MatchesOf::<T>::insert(&key.1, &key.0, ());

            Self::deposit_event(Event::Matched { users: key, conversation });

            let super_like =
                action == SwipeAction::SuperLike || reciprocal.action == SwipeAction::SuperLike;
            Self::queue_notification(
                swiper,
                Notification::NewMatch { with: swiped.clone(), super_like, conversation },
            );
            Self::queue_notification(
                swiped,
                Notification::NewMatch { with: swiper.clone(), super_like, conversation },
            );

            Ok(SwipeOutcome::matched(record))
        }

        /// 解除匹配，返回是否存在过
        fn dissolve_match(a: &T::AccountId, b: &T::AccountId) -> bool {
            let key = pair_key(a, b);
            if Matches::<T>::take(&key).is_none() {
                return false;
            }
            MatchesOf::<T>::remove(&key.0, &key.1);
            MatchesOf::<T>::remove(&key.1, &key.0);

            Self::deposit_event(Event::MatchDissolved { users: key });
            true
        }

        pub fn match_between(a: &T::AccountId, b: &T::AccountId) -> Option<MatchRecord<T::AccountId>> {
            Matches::<T>::get(pair_key(a, b))
        }

        pub fn matches_of(user: &T::AccountId) -> Vec<MatchRecord<T::AccountId>> {
            MatchesOf::<T>::iter_key_prefix(user)
                .filter_map(|other| Matches::<T>::get(pair_key(user, &other)))
                .collect()
        }
    }

    // ========================================================================
    // 通知
    // ========================================================================

    impl<T: Config> Pallet<T> {
        fn queue_notification(who: &T::AccountId, notification: Notification<T::AccountId>) {
            PendingNotifications::<T>::mutate(|queue| {
                if queue.try_push((who.clone(), notification)).is_err() {
                    log::warn!(
                        target: LOG_TARGET,
                        "notification queue full, dropping notification for {:?}",
                        who,
                    );
                }
            });
        }

        /// 发送并清空待发通知；失败只记录日志
        pub fn flush_notifications() {
            for (who, notification) in PendingNotifications::<T>::take() {
                if let Err(e) = T::Notifier::notify(&who, &notification) {
                    log::warn!(
                        target: LOG_TARGET,
                        "failed to notify {:?} ({:?}): {:?}",
                        who,
                        notification,
                        e,
                    );
                }
            }
        }
    }
}
