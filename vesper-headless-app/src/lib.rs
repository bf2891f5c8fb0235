//! 不依赖窗口和 GPU 的 render graph 演示程序
//!
//! 使用 [`vesper_gfx::headless`] 中的内存设备，逐帧构建并执行一条延迟渲染管线，
//! 输出执行计划、barrier 统计和资源池的复用情况。

pub mod app;
pub mod app_config;
pub mod deferred;
