//! 无窗口的 render graph 演示
//!
//! 读取工作区根目录下的 `vesper.toml`（可选），逐帧构建延迟渲染管线并打印统计。
//! `RUST_LOG=debug` 可以看到每个 barrier 的细节。

use vesper_crate_tools::init_log::init_log;
use vesper_crate_tools::resource::VesperPath;
use vesper_headless_app::app::HeadlessApp;
use vesper_headless_app::app_config::AppConfig;

fn main() -> anyhow::Result<()> {
    init_log();

    let config = AppConfig::from_file(VesperPath::config_path(AppConfig::FILE_NAME))?;
    log::info!(
        "frame-graph-demo: {} frames at {}x{}, bloom: {}, frames in flight: {}",
        config.frames,
        config.width,
        config.height,
        config.bloom_enabled,
        config.pool.frames_in_flight
    );

    let mut app = HeadlessApp::new(config);
    app.run()?;
    app.destroy();

    Ok(())
}
