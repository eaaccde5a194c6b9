//! 事务管理
//!
//! 所有事务性写入都经由 [`TransactionManager`]：
//! - `execute_in_transaction`：单个操作，成功提交，失败回滚并返回原始错误
//! - `execute_multiple_in_transaction`：多个操作共享同一事务，任一失败整体回滚
//! - `execute_with_rollback_on_failure`：带补偿步骤，失败时按逆序补偿后再回滚事务
//! - `create_transaction_context`：手动驱动的事务上下文
//!
//! 管理器以序号登记所有未结束的上下文，`force_rollback_all` 用于退出或测试清理时
//! 回滚遗留事务。

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use parking_lot::Mutex;
use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};
use serde::{Deserialize, Serialize};
use tokio::sync::{MappedMutexGuard, Mutex as AsyncMutex, MutexGuard};

use crate::error::{IngestError, Result};

// ==================== 类型定义 ====================

/// 事务上下文状态，committed 与 rolled_back 互斥且为终态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Active,
    Committed,
    RolledBack,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionStatus::Active => "active",
            TransactionStatus::Committed => "committed",
            TransactionStatus::RolledBack => "rolled back",
        };
        f.write_str(label)
    }
}

/// 事务开启、提交、回滚过程中的错误
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    #[error("Failed to begin transaction: {0}")]
    Begin(#[source] DbErr),

    #[error("Failed to commit transaction #{sequence}: {source}")]
    Commit { sequence: u64, source: DbErr },

    #[error("Failed to roll back transaction #{sequence}: {source}")]
    Rollback { sequence: u64, source: DbErr },

    #[error("Transaction #{sequence} already finalized ({status})")]
    AlreadyFinalized {
        sequence: u64,
        status: TransactionStatus,
    },
}

/// 事务内操作返回的 future，生命周期与事务句柄绑定
pub type TxnFuture<'c, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'c>>;

/// 可装箱的事务内操作，参数为事务句柄与事务序号
pub type TxnOperation<T> =
    Box<dyn for<'c> FnOnce(&'c DatabaseTransaction, u64) -> TxnFuture<'c, T> + Send>;

/// 将闭包装箱为 [`TxnOperation`]，保留其对事务句柄生命周期的泛型
pub fn boxed_operation<T, F>(operation: F) -> TxnOperation<T>
where
    F: for<'c> FnOnce(&'c DatabaseTransaction, u64) -> TxnFuture<'c, T> + Send + 'static,
{
    Box::new(operation)
}

/// 带补偿逻辑的步骤
///
/// `rollback` 用于撤销 `execute` 中无法随数据库事务回滚的副作用。
#[async_trait]
pub trait RollbackStep<T: Send>: Send {
    async fn execute(&mut self, txn: &DatabaseTransaction, sequence: u64) -> Result<T>;

    async fn rollback(&mut self) -> Result<()>;
}

type Registry = Mutex<BTreeMap<u64, Arc<ContextState>>>;

// ==================== 事务上下文 ====================

struct ContextState {
    sequence: u64,
    txn: AsyncMutex<Option<DatabaseTransaction>>,
    status: Mutex<TransactionStatus>,
    /// 终结后从管理器的活动集合中注销
    on_finalize: Box<dyn Fn(u64) + Send + Sync>,
}

impl ContextState {
    fn already_finalized(&self) -> TransactionError {
        TransactionError::AlreadyFinalized {
            sequence: self.sequence,
            status: *self.status.lock(),
        }
    }

    async fn commit(&self) -> std::result::Result<(), TransactionError> {
        let mut slot = self.txn.lock().await;
        let txn = slot.take().ok_or_else(|| self.already_finalized())?;

        let outcome = txn.commit().await;
        // 提交失败时事务已被丢弃，数据库侧等同回滚
        *self.status.lock() = if outcome.is_ok() {
            TransactionStatus::Committed
        } else {
            TransactionStatus::RolledBack
        };
        (self.on_finalize)(self.sequence);

        outcome.map_err(|source| TransactionError::Commit {
            sequence: self.sequence,
            source,
        })
    }

    async fn rollback(&self) -> std::result::Result<(), TransactionError> {
        let mut slot = self.txn.lock().await;
        let txn = slot.take().ok_or_else(|| self.already_finalized())?;

        let outcome = txn.rollback().await;
        *self.status.lock() = TransactionStatus::RolledBack;
        (self.on_finalize)(self.sequence);

        outcome.map_err(|source| TransactionError::Rollback {
            sequence: self.sequence,
            source,
        })
    }
}

/// 手动驱动的事务上下文
///
/// commit 与 rollback 只有一个能成功，之后的任何终结操作都返回
/// [`TransactionError::AlreadyFinalized`]。
pub struct TransactionContext {
    state: Arc<ContextState>,
}

impl TransactionContext {
    /// 事务序号（单调递增）
    pub fn sequence(&self) -> u64 {
        self.state.sequence
    }

    pub fn status(&self) -> TransactionStatus {
        *self.state.status.lock()
    }

    pub fn is_active(&self) -> bool {
        self.status() == TransactionStatus::Active
    }

    pub fn is_committed(&self) -> bool {
        self.status() == TransactionStatus::Committed
    }

    pub fn is_rolled_back(&self) -> bool {
        self.status() == TransactionStatus::RolledBack
    }

    /// 获取事务句柄，持有期间 commit / rollback 会等待
    pub async fn handle(
        &self,
    ) -> std::result::Result<MappedMutexGuard<'_, DatabaseTransaction>, TransactionError> {
        let guard = self.state.txn.lock().await;
        MutexGuard::try_map(guard, |slot| slot.as_mut())
            .map_err(|_| self.state.already_finalized())
    }

    pub async fn commit(&self) -> std::result::Result<(), TransactionError> {
        self.state.commit().await
    }

    pub async fn rollback(&self) -> std::result::Result<(), TransactionError> {
        self.state.rollback().await
    }
}

impl fmt::Debug for TransactionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionContext")
            .field("sequence", &self.sequence())
            .field("status", &self.status())
            .finish()
    }
}

// ==================== 事务管理器 ====================

/// 事务管理器
pub struct TransactionManager {
    db: DatabaseConnection,
    next_sequence: AtomicU64,
    active: Arc<Registry>,
}

impl TransactionManager {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            next_sequence: AtomicU64::new(0),
            active: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }

    /// 开启事务并返回手动驱动的上下文
    pub async fn create_transaction_context(
        &self,
    ) -> std::result::Result<TransactionContext, TransactionError> {
        let txn = self.db.begin().await.map_err(TransactionError::Begin)?;
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst) + 1;

        let registry: Weak<Registry> = Arc::downgrade(&self.active);
        let state = Arc::new(ContextState {
            sequence,
            txn: AsyncMutex::new(Some(txn)),
            status: Mutex::new(TransactionStatus::Active),
            on_finalize: Box::new(move |sequence| {
                if let Some(registry) = registry.upgrade() {
                    registry.lock().remove(&sequence);
                }
            }),
        });

        self.active.lock().insert(sequence, Arc::clone(&state));
        log::debug!("开启事务 #{}", sequence);

        Ok(TransactionContext { state })
    }

    /// 在事务中执行单个操作
    ///
    /// 成功则提交；失败则回滚并返回操作的原始错误，回滚失败只记录日志。
    pub async fn execute_in_transaction<T, F>(&self, operation: F) -> Result<T>
    where
        F: for<'c> FnOnce(&'c DatabaseTransaction, u64) -> TxnFuture<'c, T> + Send,
        T: Send,
    {
        let context = self.create_transaction_context().await?;
        let sequence = context.sequence();

        let outcome = {
            let handle = context.handle().await?;
            operation(&*handle, sequence).await
        };

        Self::settle(&context, outcome).await
    }

    /// 在同一事务中依次执行多个操作，任一失败则全部回滚
    pub async fn execute_multiple_in_transaction<T>(
        &self,
        operations: Vec<TxnOperation<T>>,
    ) -> Result<Vec<T>>
    where
        T: Send,
    {
        let context = self.create_transaction_context().await?;
        let sequence = context.sequence();

        let outcome = {
            let handle = context.handle().await?;
            Self::run_operations(&handle, sequence, operations).await
        };

        Self::settle(&context, outcome).await
    }

    /// 带补偿的多步骤执行
    ///
    /// 任一步骤失败时，已执行的步骤按逆序调用 `rollback`，随后回滚事务，
    /// 最终返回触发失败的原始错误。提交失败同样触发补偿。
    pub async fn execute_with_rollback_on_failure<T>(
        &self,
        mut steps: Vec<Box<dyn RollbackStep<T>>>,
    ) -> Result<Vec<T>>
    where
        T: Send,
    {
        let context = self.create_transaction_context().await?;
        let sequence = context.sequence();
        let mut results = Vec::with_capacity(steps.len());

        let failure = match context.handle().await {
            Ok(handle) => Self::run_steps(&handle, sequence, &mut steps, &mut results)
                .await
                .err(),
            Err(err) => Some(IngestError::from(err)),
        };
        let executed = results.len();

        match failure {
            None => {
                if let Err(err) = context.commit().await {
                    Self::compensate(&mut steps[..executed], sequence).await;
                    return Err(err.into());
                }
                Ok(results)
            }
            Some(err) => {
                Self::compensate(&mut steps[..executed], sequence).await;
                if let Err(rollback_err) = context.rollback().await {
                    log::error!("{}（原始错误: {}）", rollback_err, err);
                }
                Err(err)
            }
        }
    }

    /// 回滚所有仍处于活动状态的事务，返回成功回滚的数量
    pub async fn force_rollback_all(&self) -> usize {
        let open: Vec<Arc<ContextState>> = self.active.lock().values().cloned().collect();
        let mut rolled_back = 0;

        for state in open {
            match state.rollback().await {
                Ok(()) => rolled_back += 1,
                // 快照之后被其他调用方终结
                Err(TransactionError::AlreadyFinalized { .. }) => {}
                Err(err) => log::error!("强制回滚失败: {}", err),
            }
        }

        if rolled_back > 0 {
            log::warn!("已强制回滚 {} 个未结束的事务", rolled_back);
        }
        rolled_back
    }

    pub fn has_active_transactions(&self) -> bool {
        !self.active.lock().is_empty()
    }

    pub fn active_transaction_count(&self) -> usize {
        self.active.lock().len()
    }

    // ==================== 私有方法 ====================

    async fn settle<T>(context: &TransactionContext, outcome: Result<T>) -> Result<T> {
        match outcome {
            Ok(value) => {
                context.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = context.rollback().await {
                    log::error!("{}（原始错误: {}）", rollback_err, err);
                }
                Err(err)
            }
        }
    }

    async fn run_operations<T>(
        txn: &DatabaseTransaction,
        sequence: u64,
        operations: Vec<TxnOperation<T>>,
    ) -> Result<Vec<T>>
    where
        T: Send,
    {
        let mut results = Vec::with_capacity(operations.len());
        for operation in operations {
            results.push(operation(txn, sequence).await?);
        }
        Ok(results)
    }

    async fn run_steps<T>(
        txn: &DatabaseTransaction,
        sequence: u64,
        steps: &mut [Box<dyn RollbackStep<T>>],
        results: &mut Vec<T>,
    ) -> Result<()>
    where
        T: Send,
    {
        for step in steps.iter_mut() {
            results.push(step.execute(txn, sequence).await?);
        }
        Ok(())
    }

    async fn compensate<T>(steps: &mut [Box<dyn RollbackStep<T>>], sequence: u64)
    where
        T: Send,
    {
        for (index, step) in steps.iter_mut().enumerate().rev() {
            if let Err(err) = step.rollback().await {
                log::warn!("事务 #{} 第 {} 步补偿失败: {}", sequence, index + 1, err);
            }
        }
    }
}
