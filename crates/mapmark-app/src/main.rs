//! MapMark 演示程序
//!
//! 用法：`mapmark [config.json]`
//!
//! 创建一个演示世界和两张地图，安排若干渲染任务并等待完成，
//! 最后输出演示标记集的 JSON。

use anyhow::Result;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use uuid::Uuid;

use mapmark_core::export::marker_sets_to_json;
use mapmark_core::prelude::*;
use mapmark_render::{
    Grid, MapInfo, MapRegistry, RenderApi, RenderBackend, RenderConfig, RenderScheduler,
    UpdateScope, World,
};

const DEFAULT_CONFIG: &str = "mapmark.json";

/// 只记录日志的渲染后端
struct LoggingBackend {
    regions: Vec<Vector2i>,
}

impl RenderBackend for LoggingBackend {
    fn render_tile(&self, map: &MapInfo, tile: Vector2i) -> io::Result<()> {
        debug!("Rendering tile ({}, {}) of map '{}'", tile.x, tile.y, map.id());
        std::thread::sleep(Duration::from_millis(2));
        Ok(())
    }

    fn regions(&self, _map: &MapInfo) -> io::Result<Vec<Vector2i>> {
        Ok(self.regions.clone())
    }
}

fn demo_registry() -> Result<MapRegistry> {
    let world = Uuid::new_v4();
    let mut registry = MapRegistry::new();
    registry.add_world(World::new(world, "Overworld"));

    let hires = Grid::new(Vector2i::new(500, 500), Vector2i::zeros())?;
    let lowres = Grid::new(Vector2i::new(2000, 2000), Vector2i::zeros())?;
    registry.add_map(MapInfo::new("world", "World", world, hires)?)?;
    registry.add_map(MapInfo::new("world_flat", "World (flat)", world, lowres)?)?;
    Ok(registry)
}

fn demo_marker_sets() -> Result<Vec<MarkerSet>> {
    let mut places = MarkerSet::new("places").with_label("Places");
    places
        .create_poi_marker("spawn", "world", Vector3::new(0.0, 64.0, 0.0))
        .set_detail(Some("<b>Spawn</b>".to_string()));
    places.create_html_marker_at("sign", "world", 12.0, 70.0, -8.0, "<div>Welcome!</div>");

    let mut areas = MarkerSet::new("areas").with_label("Areas");
    areas.set_default_hidden(true);
    areas
        .create_shape_marker_centered(
            "farm",
            "world",
            Shape::create_rect_xy(-40.0, -40.0, 40.0, 40.0),
            63.0,
        )
        .set_colors(Color::GREEN, Color::GREEN.with_alpha(0.25));
    areas.create_extrude_marker_centered(
        "tower",
        "world",
        Shape::create_circle_xy(100.0, 100.0, 8.0, 16)?,
        64.0,
        120.0,
    );

    let mut routes = MarkerSet::new("routes").with_label("Routes");
    let road = Line::new(vec![
        Vector3::new(0.0, 64.0, 0.0),
        Vector3::new(100.0, 64.0, 0.0),
        Vector3::new(100.0, 64.0, 100.0),
    ])?;
    routes
        .create_line_marker_centered("road", "world", road)
        .set_line_width(4);

    Ok(vec![places, areas, routes])
}

fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let config = RenderConfig::load(&config_path)?;

    // 初始化日志
    let level = config.log_level.parse::<Level>().unwrap_or(Level::INFO);
    tracing::subscriber::set_global_default(FmtSubscriber::builder().with_max_level(level).finish())?;
    if !config.log_level.eq_ignore_ascii_case(level.as_str()) {
        warn!("Unknown log level '{}', using {}", config.log_level, level);
    }

    info!("Starting MapMark...");

    let registry = Arc::new(demo_registry()?);
    let backend = Arc::new(LoggingBackend {
        regions: vec![Vector2i::new(0, 0), Vector2i::new(-1, 0), Vector2i::new(0, -1)],
    });
    let scheduler = RenderScheduler::with_file_storage(&config, Arc::clone(&registry), backend)?;

    for z in -1..=1 {
        for x in -1..=1 {
            scheduler.enqueue_tile_render("world", Vector2i::new(x, z))?;
        }
    }
    scheduler.schedule_map_update_in(
        "world_flat",
        UpdateScope::covering_blocks(Vector2i::new(-100, -100), Vector2i::new(100, 100)),
        false,
    )?;
    scheduler.schedule_map_purge("world_flat")?;

    info!(
        "{} tasks queued on {} render threads",
        scheduler.render_queue_size(),
        scheduler.render_thread_count()
    );

    scheduler.start();
    if !scheduler.wait_idle(Duration::from_secs(60)) {
        warn!("Rendering did not finish in time");
    }

    let sets = demo_marker_sets()?;
    println!("{}", marker_sets_to_json(&sets)?);

    info!("MapMark finished");
    Ok(())
}
