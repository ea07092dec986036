//! 渲染调度器
//!
//! [`RenderApi`] 的具体实现：一个去重队列加固定数量的渲染线程。
//!
//! - 队列、运行状态和执行中计数放在同一个 `Mutex` 里，入队去重与出队互斥
//! - 工作线程运行在 rayon 线程池上，没有任务或已暂停时在 `Condvar` 上等待
//! - 暂停只阻止取出新任务，正在执行的任务会完成
//! - 调度器被丢弃时通知所有工作线程退出

use crate::api::RenderApi;
use crate::backend::{FileMapStorage, MapStorage, RenderBackend};
use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::map::{MapInfo, MapRegistry};
use crate::queue::RenderQueue;
use crate::task::{RenderTask, UpdateScope};
use mapmark_core::math::Vector2i;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, error, info, warn};

struct State {
    queue: RenderQueue,
    running: bool,
    shutdown: bool,
    in_flight: usize,
}

impl State {
    fn is_idle(&self) -> bool {
        self.queue.is_empty() && self.in_flight == 0
    }
}

struct Shared {
    state: Mutex<State>,
    /// 有新任务或运行状态改变
    work_available: Condvar,
    /// 队列清空且没有执行中的任务
    idle: Condvar,
    backend: Arc<dyn RenderBackend>,
    storage: Arc<dyn MapStorage>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, task: RenderTask) -> bool {
        let added = self.lock().queue.push(task);
        if added {
            self.work_available.notify_one();
        }
        added
    }

    /// 取出下一个任务，暂停或队列为空时阻塞；调度器关闭时返回 `None`
    fn next_task(&self) -> Option<RenderTask> {
        let mut state = self.lock();
        loop {
            if state.shutdown {
                return None;
            }
            if state.running {
                if let Some(task) = state.queue.pop() {
                    state.in_flight += 1;
                    return Some(task);
                }
            }
            state = self
                .work_available
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn finish_task(&self) {
        let mut state = self.lock();
        state.in_flight -= 1;
        if state.is_idle() {
            self.idle.notify_all();
        }
    }

    fn is_shutdown(&self) -> bool {
        self.lock().shutdown
    }

    fn execute(&self, task: RenderTask) {
        match task {
            RenderTask::Tile { map, tile } => {
                if let Err(e) = self.backend.render_tile(&map, tile) {
                    warn!("Failed to render tile {:?} of map '{}': {}", tile, map.id(), e);
                }
            }
            RenderTask::MapUpdate { map, scope, force } => self.update_map(&map, scope, force),
            RenderTask::MapPurge { map } => {
                match self.storage.purge(&map) {
                    Ok(()) => info!("Purged map '{}'", map.id()),
                    Err(e) => warn!("Failed to purge map '{}': {}", map.id(), e),
                }

                // 清除后总是重新渲染，地图不会停留在空状态
                self.push(RenderTask::MapUpdate {
                    map,
                    scope: UpdateScope::All,
                    force: true,
                });
            }
        }
    }

    fn update_map(&self, map: &MapInfo, scope: UpdateScope, force: bool) {
        let mut regions = match scope {
            UpdateScope::All => match self.backend.regions(map) {
                Ok(regions) => regions,
                Err(e) => {
                    warn!("Failed to list regions of map '{}': {}", map.id(), e);
                    return;
                }
            },
            UpdateScope::Regions(regions) => regions.into_iter().collect(),
        };
        regions.sort_by_key(|r| (r.y, r.x));

        debug!(
            "Updating {} regions of map '{}' (force: {})",
            regions.len(),
            map.id(),
            force
        );

        for region in regions {
            if self.is_shutdown() {
                debug!("Update of map '{}' interrupted by shutdown", map.id());
                return;
            }
            if let Err(e) = self.backend.render_region(map, region, force) {
                warn!(
                    "Failed to update region {:?} of map '{}': {}",
                    region,
                    map.id(),
                    e
                );
            }
        }
    }
}

fn worker_loop(shared: Arc<Shared>, index: usize) {
    debug!("Render thread #{} started", index);
    while let Some(task) = shared.next_task() {
        let key = task.key();
        if panic::catch_unwind(AssertUnwindSafe(|| shared.execute(task))).is_err() {
            error!("Render thread #{} panicked while executing {:?}", index, key);
        }
        shared.finish_task();
    }
    debug!("Render thread #{} stopped", index);
}

/// 渲染调度器
pub struct RenderScheduler {
    shared: Arc<Shared>,
    registry: Arc<MapRegistry>,
    thread_count: usize,
    _pool: rayon::ThreadPool,
}

impl RenderScheduler {
    /// 创建调度器并启动渲染线程
    pub fn new(
        config: &RenderConfig,
        registry: Arc<MapRegistry>,
        backend: Arc<dyn RenderBackend>,
        storage: Arc<dyn MapStorage>,
    ) -> Result<Self, RenderError> {
        config.validate()?;
        let thread_count = config.effective_render_threads();

        let shared = Arc::new(Shared {
            state: Mutex::new(State {
                queue: RenderQueue::new(),
                running: !config.start_paused,
                shutdown: false,
                in_flight: 0,
            }),
            work_available: Condvar::new(),
            idle: Condvar::new(),
            backend,
            storage,
        });

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(thread_count)
            .thread_name(|i| format!("render-{i}"))
            .build()?;

        for index in 0..thread_count {
            let shared = Arc::clone(&shared);
            pool.spawn(move || worker_loop(shared, index));
        }

        info!(
            "Render scheduler created with {} threads ({})",
            thread_count,
            if config.start_paused { "paused" } else { "running" }
        );

        Ok(Self {
            shared,
            registry,
            thread_count,
            _pool: pool,
        })
    }

    /// 使用配置中的存储根目录创建基于文件系统的存储
    pub fn with_file_storage(
        config: &RenderConfig,
        registry: Arc<MapRegistry>,
        backend: Arc<dyn RenderBackend>,
    ) -> Result<Self, RenderError> {
        let storage = Arc::new(FileMapStorage::new(&config.storage_root));
        Self::new(config, registry, backend, storage)
    }

    pub fn registry(&self) -> &Arc<MapRegistry> {
        &self.registry
    }

    /// 等待队列清空且没有执行中的任务
    ///
    /// 超时返回 `false`。暂停状态下队列非空时会一直等到超时。
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let state = self.shared.lock();
        let (_state, result) = self
            .shared
            .idle
            .wait_timeout_while(state, timeout, |s| !s.is_idle())
            .unwrap_or_else(PoisonError::into_inner);
        !result.timed_out()
    }
}

impl RenderApi for RenderScheduler {
    fn enqueue_tile_render(&self, map_id: &str, tile: Vector2i) -> Result<(), RenderError> {
        let map = self.registry.map(map_id)?;
        if !self.shared.push(RenderTask::Tile { map, tile }) {
            debug!("Tile {:?} of map '{}' is already scheduled", tile, map_id);
        }
        Ok(())
    }

    fn schedule_map_update_in(
        &self,
        map_id: &str,
        scope: UpdateScope,
        force: bool,
    ) -> Result<bool, RenderError> {
        let map = self.registry.map(map_id)?;
        let scheduled = self.shared.push(RenderTask::MapUpdate { map, scope, force });
        if scheduled {
            info!("Scheduled update of map '{}' (force: {})", map_id, force);
        } else {
            debug!("Update of map '{}' is already scheduled", map_id);
        }
        Ok(scheduled)
    }

    fn schedule_map_purge(&self, map_id: &str) -> Result<bool, RenderError> {
        let map = self.registry.map(map_id)?;
        self.shared.storage.check_available(&map)?;

        let scheduled = self.shared.push(RenderTask::MapPurge { map });
        if scheduled {
            info!("Scheduled purge of map '{}'", map_id);
        }
        Ok(scheduled)
    }

    fn render_queue_size(&self) -> usize {
        self.shared.lock().queue.len()
    }

    fn render_thread_count(&self) -> usize {
        self.thread_count
    }

    fn is_running(&self) -> bool {
        self.shared.lock().running
    }

    fn start(&self) {
        let mut state = self.shared.lock();
        if !state.running {
            state.running = true;
            self.shared.work_available.notify_all();
            info!("Render threads started");
        }
    }

    fn pause(&self) {
        let mut state = self.shared.lock();
        if state.running {
            state.running = false;
            info!("Render threads paused");
        }
    }
}

impl Drop for RenderScheduler {
    fn drop(&mut self) {
        self.shared.lock().shutdown = true;
        self.shared.work_available.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::map::World;
    use std::collections::HashSet;
    use std::io;
    use std::path::PathBuf;
    use uuid::Uuid;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[derive(Default)]
    struct RecordingBackend {
        tiles: Mutex<Vec<(String, Vector2i)>>,
        regions: Mutex<Vec<(String, Vector2i, bool)>>,
    }

    impl RenderBackend for RecordingBackend {
        fn render_tile(&self, map: &MapInfo, tile: Vector2i) -> io::Result<()> {
            self.tiles.lock().unwrap().push((map.id().to_string(), tile));
            Ok(())
        }

        fn regions(&self, _map: &MapInfo) -> io::Result<Vec<Vector2i>> {
            Ok(vec![Vector2i::new(1, 0), Vector2i::new(0, 0)])
        }

        fn render_region(&self, map: &MapInfo, region: Vector2i, force: bool) -> io::Result<()> {
            self.regions
                .lock()
                .unwrap()
                .push((map.id().to_string(), region, force));
            Ok(())
        }
    }

    struct UnavailableStorage;

    impl MapStorage for UnavailableStorage {
        fn check_available(&self, _map: &MapInfo) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "storage offline"))
        }

        fn purge(&self, _map: &MapInfo) -> io::Result<()> {
            Ok(())
        }
    }

    fn registry() -> Arc<MapRegistry> {
        let world = Uuid::new_v4();
        let mut registry = MapRegistry::new();
        registry.add_world(World::new(world, "Overworld"));
        let tiles = Grid::new(Vector2i::new(500, 500), Vector2i::zeros()).unwrap();
        registry
            .add_map(MapInfo::new("world", "World", world, tiles).unwrap())
            .unwrap();
        registry
            .add_map(MapInfo::new("flat", "Flat", world, tiles).unwrap())
            .unwrap();
        Arc::new(registry)
    }

    fn config(threads: usize, paused: bool, root: PathBuf) -> RenderConfig {
        RenderConfig {
            render_threads: threads,
            start_paused: paused,
            storage_root: root,
            ..RenderConfig::default()
        }
    }

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("mapmark-scheduler-{}", Uuid::new_v4()))
    }

    fn scheduler(threads: usize, paused: bool) -> (RenderScheduler, Arc<RecordingBackend>) {
        let backend = Arc::new(RecordingBackend::default());
        let scheduler = RenderScheduler::with_file_storage(
            &config(threads, paused, temp_root()),
            registry(),
            backend.clone(),
        )
        .unwrap();
        (scheduler, backend)
    }

    #[test]
    fn test_start_pause_idempotent() {
        let (scheduler, _) = scheduler(2, true);
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.render_thread_count(), 2);

        scheduler.pause();
        assert!(!scheduler.is_running());

        scheduler.start();
        scheduler.start();
        assert!(scheduler.is_running());

        scheduler.pause();
        assert!(!scheduler.is_running());
    }

    #[test]
    fn test_tile_render_dedup_while_paused() {
        let (scheduler, backend) = scheduler(2, true);

        scheduler.enqueue_tile_render("world", Vector2i::new(0, 0)).unwrap();
        scheduler.enqueue_tile_render("world", Vector2i::new(0, 0)).unwrap();
        scheduler.enqueue_tile_render("flat", Vector2i::new(0, 0)).unwrap();
        assert_eq!(scheduler.render_queue_size(), 2);

        std::thread::sleep(Duration::from_millis(50));
        assert!(backend.tiles.lock().unwrap().is_empty());

        scheduler.start();
        assert!(scheduler.wait_idle(TIMEOUT));
        assert_eq!(backend.tiles.lock().unwrap().len(), 2);
        assert_eq!(scheduler.render_queue_size(), 0);
    }

    #[test]
    fn test_concurrent_requests_create_one_task() {
        let (scheduler, backend) = scheduler(4, true);
        let tile = Vector2i::new(3, -7);

        std::thread::scope(|s| {
            for _ in 0..16 {
                s.spawn(|| {
                    for _ in 0..100 {
                        scheduler.enqueue_tile_render("world", tile).unwrap();
                    }
                });
            }
        });
        assert_eq!(scheduler.render_queue_size(), 1);

        scheduler.start();
        assert!(scheduler.wait_idle(TIMEOUT));
        assert_eq!(
            *backend.tiles.lock().unwrap(),
            vec![("world".to_string(), tile)]
        );
    }

    #[test]
    fn test_unknown_map() {
        let (scheduler, _) = scheduler(1, true);

        assert!(matches!(
            scheduler.enqueue_tile_render("nope", Vector2i::zeros()),
            Err(RenderError::UnknownMap(_))
        ));
        assert!(matches!(
            scheduler.schedule_map_update("nope", false),
            Err(RenderError::UnknownMap(_))
        ));
        assert!(matches!(
            scheduler.schedule_map_purge("nope"),
            Err(RenderError::UnknownMap(_))
        ));
    }

    #[test]
    fn test_map_update_dedup_and_execution() {
        let (scheduler, backend) = scheduler(1, true);

        assert!(scheduler.schedule_map_update("world", false).unwrap());
        assert!(!scheduler.schedule_map_update("world", false).unwrap());
        assert!(!scheduler
            .schedule_map_update_in("world", UpdateScope::regions([Vector2i::new(0, 0)]), false)
            .unwrap());
        assert_eq!(scheduler.render_queue_size(), 1);

        scheduler.start();
        assert!(scheduler.wait_idle(TIMEOUT));

        // 区域按 (z, x) 排序执行
        assert_eq!(
            *backend.regions.lock().unwrap(),
            vec![
                ("world".to_string(), Vector2i::new(0, 0), false),
                ("world".to_string(), Vector2i::new(1, 0), false),
            ]
        );
    }

    #[test]
    fn test_region_scoped_update() {
        let (scheduler, backend) = scheduler(1, true);
        let scope = UpdateScope::covering_blocks(Vector2i::new(-10, 5), Vector2i::new(10, 5));

        assert!(scheduler.schedule_map_update_in("flat", scope, true).unwrap());
        scheduler.start();
        assert!(scheduler.wait_idle(TIMEOUT));

        let updated: HashSet<_> = backend
            .regions
            .lock()
            .unwrap()
            .iter()
            .map(|(_, region, force)| (*region, *force))
            .collect();
        assert_eq!(
            updated,
            HashSet::from([(Vector2i::new(-1, 0), true), (Vector2i::new(0, 0), true)])
        );
    }

    #[test]
    fn test_purge_then_update() {
        let root = temp_root();
        let backend = Arc::new(RecordingBackend::default());
        let scheduler = RenderScheduler::with_file_storage(
            &config(2, true, root.clone()),
            registry(),
            backend.clone(),
        )
        .unwrap();

        let tile_dir = root.join("world").join("tiles");
        std::fs::create_dir_all(&tile_dir).unwrap();
        std::fs::write(tile_dir.join("x0z0.png"), b"png").unwrap();

        assert!(scheduler.schedule_map_purge("world").unwrap());
        assert!(!scheduler.schedule_map_purge("world").unwrap());

        scheduler.start();
        assert!(scheduler.wait_idle(TIMEOUT));

        assert!(!root.join("world").exists());
        let regions = backend.regions.lock().unwrap();
        assert_eq!(regions.len(), 2);
        assert!(regions.iter().all(|(map, _, force)| map == "world" && *force));

        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_purge_fails_when_storage_unavailable() {
        let scheduler = RenderScheduler::new(
            &config(1, true, temp_root()),
            registry(),
            Arc::new(RecordingBackend::default()),
            Arc::new(UnavailableStorage),
        )
        .unwrap();

        assert!(matches!(
            scheduler.schedule_map_purge("world"),
            Err(RenderError::Io(_))
        ));
        assert_eq!(scheduler.render_queue_size(), 0);
    }

    struct PanickingBackend {
        inner: RecordingBackend,
    }

    impl RenderBackend for PanickingBackend {
        fn render_tile(&self, map: &MapInfo, tile: Vector2i) -> io::Result<()> {
            if tile == Vector2i::zeros() {
                panic!("backend failure");
            }
            self.inner.render_tile(map, tile)
        }

        fn regions(&self, map: &MapInfo) -> io::Result<Vec<Vector2i>> {
            self.inner.regions(map)
        }
    }

    #[test]
    fn test_backend_panic_does_not_stop_worker() {
        let backend = Arc::new(PanickingBackend {
            inner: RecordingBackend::default(),
        });
        let scheduler = RenderScheduler::with_file_storage(
            &config(1, true, temp_root()),
            registry(),
            backend.clone(),
        )
        .unwrap();

        scheduler.enqueue_tile_render("world", Vector2i::zeros()).unwrap();
        scheduler.enqueue_tile_render("world", Vector2i::new(1, 0)).unwrap();
        scheduler.start();

        assert!(scheduler.wait_idle(TIMEOUT));
        assert_eq!(
            *backend.inner.tiles.lock().unwrap(),
            vec![("world".to_string(), Vector2i::new(1, 0))]
        );

        // 同一个瓦片可以再次入队
        scheduler.enqueue_tile_render("world", Vector2i::zeros()).unwrap();
        assert!(scheduler.wait_idle(TIMEOUT));
    }

    #[test]
    fn test_wait_idle_times_out_while_paused() {
        let (scheduler, _) = scheduler(1, true);
        scheduler.enqueue_tile_render("world", Vector2i::zeros()).unwrap();
        assert!(!scheduler.wait_idle(Duration::from_millis(50)));
    }
}
