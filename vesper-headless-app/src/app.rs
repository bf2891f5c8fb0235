use vesper_gfx::headless::{HeadlessDevice, RecordingCommandBuffer};
use vesper_render_graph::render_graph::{RenderGraph, RgError, RgFrameResources, RgResourcePool};

use crate::app_config::AppConfig;
use crate::deferred::DeferredPipeline;

/// 单帧的统计
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frame: u64,
    pub pass_count: usize,
    pub recorded_commands: usize,
    pub image_barriers: usize,
    pub buffer_barriers: usize,
    pub live_textures: usize,
    pub live_buffers: usize,
}

/// 驱动 headless 后端逐帧执行 render graph
pub struct HeadlessApp {
    config: AppConfig,
    pipeline: DeferredPipeline,

    device: HeadlessDevice,
    pool: RgResourcePool,
    cmd: RecordingCommandBuffer,
}

// new & init
impl HeadlessApp {
    pub fn new(config: AppConfig) -> Self {
        let pipeline = DeferredPipeline::new(&config);
        let pool = RgResourcePool::new(&config.pool);

        Self {
            config,
            pipeline,
            device: HeadlessDevice::new(),
            pool,
            cmd: RecordingCommandBuffer::new(),
        }
    }
}

// update
impl HeadlessApp {
    /// 运行配置中的全部帧
    pub fn run(&mut self) -> anyhow::Result<()> {
        for _ in 0..self.config.frames {
            let stats = self.run_frame()?;
            log::info!(
                "frame {}: {} passes, {} commands, {} image / {} buffer barriers, live {} textures / {} buffers",
                stats.frame,
                stats.pass_count,
                stats.recorded_commands,
                stats.image_barriers,
                stats.buffer_barriers,
                stats.live_textures,
                stats.live_buffers
            );
        }

        log::info!(
            "pool: {} shared textures, {} shared buffers, {} bytes of buffers, created {} textures / {} buffers",
            self.pool.shared_texture_count(),
            self.pool.shared_buffer_count(),
            self.pool.total_buffer_bytes(),
            self.device.textures_created(),
            self.device.buffers_created()
        );
        Ok(())
    }

    /// 构建并执行一帧
    ///
    /// 第一帧执行后打印执行计划。
    pub fn run_frame(&mut self) -> Result<FrameStats, RgError> {
        let _span = tracy_client::span!("HeadlessApp::run_frame");

        self.cmd.take_commands();
        self.pool.tick(&mut self.device);

        let mut graph = RenderGraph::new(self.config.render_graph.clone());
        self.pipeline.record(&mut graph);
        graph.try_build()?;
        graph.execute(&mut RgFrameResources::new(&mut self.pool, &mut self.device, &mut self.cmd));

        if self.pool.frame_number() == 1 {
            graph.print_execution_plan();
        }

        let mut stats = FrameStats {
            frame: self.pool.frame_number(),
            pass_count: graph.pass_count(),
            recorded_commands: self.cmd.commands().len(),
            live_textures: self.device.live_texture_count(),
            live_buffers: self.device.live_buffer_count(),
            ..Default::default()
        };
        for pass_stats in (0..graph.pass_count()).filter_map(|i| graph.barrier_stats(i)) {
            stats.image_barriers += pass_stats.image_barriers;
            stats.buffer_barriers += pass_stats.buffer_barriers;
        }
        Ok(stats)
    }
}

// getters
impl HeadlessApp {
    #[inline]
    pub fn device(&self) -> &HeadlessDevice {
        &self.device
    }

    #[inline]
    pub fn pool(&self) -> &RgResourcePool {
        &self.pool
    }

    #[inline]
    pub fn commands(&self) -> &RecordingCommandBuffer {
        &self.cmd
    }
}

// destroy
impl HeadlessApp {
    pub fn destroy(&mut self) {
        self.pool.release_all(&mut self.device);
        log::info!(
            "released render graph resources, {} textures / {} buffers still alive",
            self.device.live_texture_count(),
            self.device.live_buffer_count()
        );
    }
}
