//! 去重渲染队列
//!
//! 先进先出队列加键索引。队列本身不加锁，由调度器放在同一个 `Mutex` 里，
//! 因此"检查是否已存在 + 插入"和出队对所有线程都是原子的。

use crate::task::{RenderTask, TaskKey, UpdateScope};
use std::collections::{HashSet, VecDeque};

#[derive(Debug, Default)]
pub struct RenderQueue {
    tasks: VecDeque<RenderTask>,
    keys: HashSet<TaskKey>,
}

impl RenderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// 入队
    ///
    /// 同键任务已在队列中时不会创建第二个任务。
    /// 地图更新例外：若待执行的更新不能覆盖本次请求（范围更小或未强制），
    /// 则就地扩大其范围或升级为强制更新，并返回 `true`。
    pub fn push(&mut self, task: RenderTask) -> bool {
        let key = task.key();
        if !self.keys.contains(&key) {
            self.keys.insert(key);
            self.tasks.push_back(task);
            return true;
        }

        match task {
            RenderTask::MapUpdate { scope, force, .. } => self.widen_update(&key, scope, force),
            _ => false,
        }
    }

    fn widen_update(&mut self, key: &TaskKey, scope: UpdateScope, force: bool) -> bool {
        let TaskKey::Update(map_id) = key else {
            return false;
        };

        let pending = self.tasks.iter_mut().find_map(|task| match task {
            RenderTask::MapUpdate { map, scope, force } if map.id() == map_id => {
                Some((scope, force))
            }
            _ => None,
        });

        let Some((pending_scope, pending_force)) = pending else {
            return false;
        };

        if pending_scope.covers(&scope) && (*pending_force || !force) {
            return false;
        }

        pending_scope.merge(scope);
        *pending_force |= force;
        true
    }

    /// 出队，同时释放该任务的键
    pub fn pop(&mut self) -> Option<RenderTask> {
        let task = self.tasks.pop_front()?;
        self.keys.remove(&task.key());
        Some(task)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn contains(&self, key: &TaskKey) -> bool {
        self.keys.contains(key)
    }
}
