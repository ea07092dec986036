//! 渲染调度接口
//!
//! 状态机：`STOPPED ⇄ RUNNING`，由 [`RenderApi::start`] / [`RenderApi::pause`] 切换，
//! 两者都是幂等的。暂停只阻止取出新任务，正在执行的任务会继续完成。
//!
//! 所有入队操作都去重：同一 (地图, 瓦片) 最多只有一个待执行任务，
//! "已在队列中"通过返回值表达，不是错误。

use crate::error::RenderError;
use crate::map::MapInfo;
use crate::task::UpdateScope;
use mapmark_core::math::Vector2i;

pub trait RenderApi {
    /// 安排渲染地图的一个瓦片
    ///
    /// 若该瓦片已有待执行的渲染任务，不会创建第二个。
    fn enqueue_tile_render(&self, map_id: &str, tile: Vector2i) -> Result<(), RenderError>;

    /// 安排更新地图的指定范围
    ///
    /// 返回 `true` 表示接受了新的工作，`false` 表示已有等价的更新任务在队列中。
    fn schedule_map_update_in(
        &self,
        map_id: &str,
        scope: UpdateScope,
        force: bool,
    ) -> Result<bool, RenderError>;

    /// 安排更新整张地图
    fn schedule_map_update(&self, map_id: &str, force: bool) -> Result<bool, RenderError> {
        self.schedule_map_update_in(map_id, UpdateScope::All, force)
    }

    /// 安排清除地图的全部渲染结果，清除完成后会自动安排一次强制更新
    ///
    /// 存储不可用时返回 [`RenderError::Io`]。
    fn schedule_map_purge(&self, map_id: &str) -> Result<bool, RenderError>;

    /// 待执行任务数
    fn render_queue_size(&self) -> usize;

    /// 渲染线程数
    fn render_thread_count(&self) -> usize;

    fn is_running(&self) -> bool;

    /// 启动渲染，已在运行时无操作
    fn start(&self);

    /// 暂停渲染，已暂停时无操作
    fn pause(&self);

    /// 以地图对象安排渲染瓦片
    fn enqueue_map_tile_render(&self, map: &MapInfo, tile: Vector2i) -> Result<(), RenderError> {
        self.enqueue_tile_render(map.id(), tile)
    }
}
