//! RenderGraph 构建器和执行器
//!
//! 每帧的使用流程：
//!
//! 1. 创建 graph: `RenderGraph::new(settings)`
//! 2. 添加 Pass: `graph.add_pass(...)` / `graph.add_rg_pass(...)`，setup 立即执行
//! 3. 构建: `graph.build()`，依赖分析 + 拓扑排序
//! 4. 执行: `graph.execute(&mut frame)`，按顺序分配资源、插入 barrier、录制命令
//!
//! graph 每帧重建，跨帧的只有 [`RgResourcePool`]。

use std::collections::{HashMap, HashSet};

use ash::vk;
use itertools::Itertools;
use vesper_gfx::basic::color::LabelColor;
use vesper_gfx::commands::barrier::{GfxBufferBarrier, GfxImageBarrier};
use vesper_gfx::commands::command_buffer::GfxCommandBuffer;
use vesper_gfx::commands::rendering_info::{GfxRenderingAttachment, GfxRenderingInfo};
use vesper_gfx::device::GfxDevice;
use vesper_gfx::handles::{GfxBufferHandle, GfxTextureHandle};
use vesper_gfx::resources::format;

use crate::render_graph::barrier::{self, RgAccessMask};
use crate::render_graph::builder::RgBuilder;
use crate::render_graph::context::{RgFrameResources, RgPassContext};
use crate::render_graph::error::RgError;
use crate::render_graph::graph::RgDependencyGraph;
use crate::render_graph::pass::{
    RgClosureExecutor, RgDepthStencilInfo, RgPass, RgPassAccess, RgPassExecutor, RgPassExecutorWrapper, RgPassNode,
    RgPassType, RgRenderTargetInfo, RgViewport,
};
use crate::render_graph::resource_handle::{RgBufferId, RgTextureId};
use crate::render_graph::resource_pool::RgResourcePool;
use crate::render_graph::resource_registry::RgResourceRegistry;
use crate::render_graph::resource_state::RgImageState;
use crate::render_graph::settings::RenderGraphSettings;

/// 单个 pass 在执行时插入的 barrier 数量
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RgPassBarrierStats {
    pub buffer_barriers: usize,
    pub image_barriers: usize,
}

/// 渲染图
///
/// # 生命周期
///
/// `'a` 是 Pass 可以借用的外部资源的生命周期。
/// 这允许 Pass 直接引用外部的 pipeline、geometry 等资源，
/// 而不需要使用 Rc/Arc 包装。
pub struct RenderGraph<'a> {
    settings: RenderGraphSettings,

    /// 资源注册表
    resources: RgResourceRegistry,
    /// Pass 节点列表（按添加顺序）
    passes: Vec<RgPassNode<'a>>,

    /// 依赖图，build 之后有效
    dependency_graph: Option<RgDependencyGraph>,
    /// 执行顺序（拓扑排序后）
    execution_order: Vec<usize>,

    executed: bool,
    /// 按 pass 下标记录，execute 之后有效
    barrier_stats: Vec<RgPassBarrierStats>,
}

impl Default for RenderGraph<'_> {
    fn default() -> Self {
        Self::new(RenderGraphSettings::default())
    }
}

// new & init
impl RenderGraph<'_> {
    pub fn new(settings: RenderGraphSettings) -> Self {
        Self {
            settings,
            resources: RgResourceRegistry::new(),
            passes: Vec::new(),
            dependency_graph: None,
            execution_order: Vec::new(),
            executed: false,
            barrier_stats: Vec::new(),
        }
    }
}

// 添加 pass
impl<'a> RenderGraph<'a> {
    /// 添加闭包形式的 Pass
    ///
    /// # 参数
    /// - `name`: Pass 名称，在同一个 graph 中唯一
    /// - `pass_type`: 决定 barrier 的 stage / access / layout
    /// - `setup`: 立即调用，填充 pass 数据并声明资源访问
    /// - `execute`: 在 [`Self::execute`] 中按拓扑顺序调用
    pub fn add_pass<D: Default + 'a>(
        &mut self,
        name: &str,
        pass_type: RgPassType,
        setup: impl FnOnce(&mut D, &mut RgBuilder<'_>),
        execute: impl Fn(&D, &RgPassContext<'_>, &mut dyn GfxCommandBuffer) + 'a,
    ) -> &mut Self {
        let mut data = D::default();
        let node = self.record_pass(name, pass_type, |builder| setup(&mut data, builder));
        self.push_pass(node, Box::new(RgClosureExecutor { data, execute }))
    }

    /// 添加实现了 [`RgPass`] 的 Pass
    pub fn add_rg_pass<P: RgPass + 'a>(&mut self, name: &str, pass_type: RgPassType, mut pass: P) -> &mut Self {
        let node = self.record_pass(name, pass_type, |builder| pass.setup(builder));
        self.push_pass(node, Box::new(RgPassExecutorWrapper { pass }))
    }

    /// 运行 setup，收集 pass 的声明
    fn record_pass(
        &mut self,
        name: &str,
        pass_type: RgPassType,
        setup: impl FnOnce(&mut RgBuilder<'_>),
    ) -> RgPassDeclaration {
        assert!(
            self.dependency_graph.is_none(),
            "RenderGraph: cannot add pass \"{}\" after build, rebuild the graph for the next frame",
            name
        );
        assert!(
            self.passes.iter().all(|p| p.name != name),
            "RenderGraph: pass \"{}\" is already registered",
            name
        );

        let mut builder = RgBuilder::new(self.passes.len(), name, pass_type, &mut self.resources);
        setup(&mut builder);

        RgPassDeclaration {
            name: name.to_string(),
            pass_type,
            access: builder.access,
            render_targets: builder.render_targets,
            depth_stencil: builder.depth_stencil,
            viewport: builder.viewport,
        }
    }

    fn push_pass(&mut self, declaration: RgPassDeclaration, executor: Box<dyn RgPassExecutor + 'a>) -> &mut Self {
        log::debug!("RenderGraph: add {} pass \"{}\"", declaration.pass_type, declaration.name);

        self.passes.push(RgPassNode {
            name: declaration.name,
            pass_type: declaration.pass_type,
            access: declaration.access,
            render_targets: declaration.render_targets,
            depth_stencil: declaration.depth_stencil,
            viewport: declaration.viewport,
            executor,
        });
        self
    }
}

/// setup 阶段的产物，和执行器组合成 [`RgPassNode`]
struct RgPassDeclaration {
    name: String,
    pass_type: RgPassType,
    access: RgPassAccess,
    render_targets: Vec<RgRenderTargetInfo>,
    depth_stencil: Option<RgDepthStencilInfo>,
    viewport: Option<RgViewport>,
}

// build
impl RenderGraph<'_> {
    /// 构建依赖图并排序
    ///
    /// # Panics
    /// 如果检测到循环依赖
    pub fn build(&mut self) {
        if let Err(err) = self.try_build() {
            panic!("RenderGraph: {}", err);
        }
    }

    /// 构建依赖图并排序，存在环时返回错误
    pub fn try_build(&mut self) -> Result<(), RgError> {
        let _span = tracy_client::span!("RenderGraph::build");

        let accesses = self.passes.iter().map(|p| &p.access).collect_vec();
        let dependency_graph = RgDependencyGraph::analyze(&accesses);

        let execution_order = dependency_graph.topological_sort().map_err(|cycle| RgError::Cycle {
            passes: cycle.iter().map(|&i| self.passes[i].name.clone()).collect(),
        })?;

        log::debug!(
            "RenderGraph: execution order [{}]",
            execution_order.iter().map(|&i| self.passes[i].name.as_str()).join(" -> ")
        );

        self.dependency_graph = Some(dependency_graph);
        self.execution_order = execution_order;

        if self.settings.dump_graphviz {
            let path = self.settings.graphviz_output_path();
            if let Err(err) = self.write_graphviz(&path) {
                log::warn!("RenderGraph: {}", err);
            }
        }

        Ok(())
    }

    /// 依赖图的 Graphviz dot 文本
    ///
    /// # Panics
    /// 尚未 build
    pub fn to_graphviz(&self) -> String {
        let names = self.passes.iter().map(|p| p.name.as_str()).collect_vec();
        self.built_graph().to_graphviz(&names)
    }

    /// 把 dot 文本写入文件，目录不存在时自动创建
    pub fn write_graphviz(&self, path: &std::path::Path) -> Result<(), RgError> {
        let to_io_error = |source| RgError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(to_io_error)?;
        }
        std::fs::write(path, self.to_graphviz()).map_err(to_io_error)?;

        log::debug!("RenderGraph: graphviz dump written to {}", path.display());
        Ok(())
    }

    fn built_graph(&self) -> &RgDependencyGraph {
        self.dependency_graph.as_ref().unwrap_or_else(|| panic!("RenderGraph: build() must be called first"))
    }
}

// execute
impl RenderGraph<'_> {
    /// 执行渲染图
    ///
    /// 按拓扑顺序对每个 pass：
    /// 1. 分配本 pass 声明的资源，并把句柄同步给别名
    /// 2. 先写后读，计算缓冲区和纹理的 barrier，一次性插入
    /// 3. 带 attachment 的 graphics pass 在 dynamic rendering 中执行回调
    ///
    /// # Panics
    /// 尚未 build、重复执行，或 pass 声明违反约束（见各 panic 信息）
    pub fn execute(&mut self, frame: &mut RgFrameResources<'_>) {
        let _span = tracy_client::span!("RenderGraph::execute");

        assert!(self.dependency_graph.is_some(), "RenderGraph: build() must be called first");
        assert!(!self.executed, "RenderGraph: a graph can only be executed once, rebuild it for the next frame");
        self.executed = true;

        let order = self.execution_order.clone();
        let mut executed = vec![false; self.passes.len()];
        let mut image_states: HashMap<GfxTextureHandle, RgImageState> = HashMap::new();
        self.barrier_stats = vec![RgPassBarrierStats::default(); self.passes.len()];

        for pass_index in order {
            let pass_name = self.passes[pass_index].name.clone();
            frame.cmd.begin_label(&pass_name, LabelColor::from_name(&pass_name));

            self.materialize(pass_index, frame.pool, frame.device);

            let buffer_barriers = self.sync_buffers(pass_index, &*frame.device, &executed);
            let image_barriers = self.sync_textures(pass_index, frame.device, &executed, &mut image_states);
            if !buffer_barriers.is_empty() || !image_barriers.is_empty() {
                log::debug!(
                    "RenderGraph: pass \"{}\" inserts {} buffer barriers, {} image barriers",
                    pass_name,
                    buffer_barriers.len(),
                    image_barriers.len()
                );
                frame.cmd.insert_barriers(&buffer_barriers, &image_barriers);
            }
            self.barrier_stats[pass_index] = RgPassBarrierStats {
                buffer_barriers: buffer_barriers.len(),
                image_barriers: image_barriers.len(),
            };

            self.run_pass(pass_index, &*frame.device, frame.cmd);

            frame.cmd.end_label();
            executed[pass_index] = true;
        }
    }

    /// 为 pass 声明的资源分配物理资源
    fn materialize(&mut self, pass_index: usize, pool: &mut RgResourcePool, device: &mut dyn GfxDevice) {
        let Self { passes, resources, .. } = self;
        let access = &passes[pass_index].access;

        for &id in &access.texture_creates {
            let texture = resources.textures.get(id);
            let handle = pool.allocate_texture(device, &texture.desc, &texture.name);
            resources.textures.assign_handle(id, handle);
        }
        for &id in &access.buffer_creates {
            let buffer = resources.buffers.get(id);
            let handle = pool.allocate_buffer(device, &buffer.desc, &buffer.name);
            resources.buffers.assign_handle(id, handle);
        }
    }

    fn buffer_handle(&self, id: RgBufferId, pass_index: usize) -> GfxBufferHandle {
        self.resources.buffers.resolve_handle(id).unwrap_or_else(|| {
            panic!(
                "RenderGraph: buffer \"{}\" used by pass \"{}\" is not allocated, no earlier pass declares it",
                self.resources.buffers.name(id),
                self.passes[pass_index].name
            )
        })
    }

    fn texture_handle(&self, id: RgTextureId, pass_index: usize) -> GfxTextureHandle {
        self.resources.textures.resolve_handle(id).unwrap_or_else(|| {
            panic!(
                "RenderGraph: texture \"{}\" used by pass \"{}\" is not allocated, no earlier pass declares it",
                self.resources.textures.name(id),
                self.passes[pass_index].name
            )
        })
    }

    /// 已经执行、且尚未同步过的写入 pass，包括别名链上的源资源
    ///
    /// 返回的写入 pass 会被标记为已同步，同一次写入只产生一次 barrier。
    fn take_pending_buffer_writers(&mut self, id: RgBufferId, executed: &[bool]) -> Vec<usize> {
        let chain = self.resources.buffers.alias_chain(id).collect_vec();
        let mut writers = Vec::new();
        for current in chain {
            let buffer = self.resources.buffers.get_mut(current);
            for &writer in &buffer.write_passes {
                if executed[writer] && buffer.synced_with.insert(writer) {
                    writers.push(writer);
                }
            }
        }
        writers
    }

    fn take_pending_texture_writers(&mut self, id: RgTextureId, executed: &[bool]) -> Vec<usize> {
        let chain = self.resources.textures.alias_chain(id).collect_vec();
        let mut writers = Vec::new();
        for current in chain {
            let texture = self.resources.textures.get_mut(current);
            for &writer in &texture.write_passes {
                if executed[writer] && texture.synced_with.insert(writer) {
                    writers.push(writer);
                }
            }
        }
        writers
    }

    /// 计算缓冲区 barrier，先处理写入再处理读取
    fn sync_buffers(
        &mut self,
        pass_index: usize,
        device: &dyn GfxDevice,
        executed: &[bool],
    ) -> Vec<GfxBufferBarrier> {
        let pass_type = self.passes[pass_index].pass_type;
        let access = &self.passes[pass_index].access;
        let targets = access.buffer_writes.iter().chain(access.buffer_reads.iter()).copied().collect_vec();

        let mut barriers = Vec::new();
        for id in targets {
            let handle = self.buffer_handle(id, pass_index);
            let buffer = self.resources.buffers.get(id);
            if buffer.capacity() == 0 {
                continue;
            }
            let usage = buffer.desc.spec.usage;

            let writers = self.take_pending_buffer_writers(id, executed);
            if writers.is_empty() {
                continue;
            }

            let buffer_name = self.resources.buffers.name(id);
            let src = writers.iter().fold(RgAccessMask::default(), |mask, &writer| {
                let writer = &self.passes[writer];
                mask.union(barrier::buffer_src_mask(writer.pass_type, &writer.name, buffer_name))
            });
            let state = self.passes[pass_index].access.buffer_state(id);
            let dst = barrier::buffer_dst_mask(pass_type, usage, state);

            log::debug!(
                "RenderGraph: buffer barrier \"{}\" ({:?} -> {:?})",
                buffer_name,
                src.stage,
                dst.stage
            );
            barriers.push(
                GfxBufferBarrier::new()
                    .buffer(device.vk_buffer(handle), 0, vk::WHOLE_SIZE)
                    .src_mask(src.stage, src.access)
                    .dst_mask(dst.stage, dst.access),
            );
        }
        barriers
    }

    /// 计算纹理 barrier，先处理写入再处理读取
    ///
    /// - 有未同步的写入 pass：以写入 pass 的 stage / access 为源端
    /// - 本 pass 声明的纹理第一次写入：从 `UNDEFINED` 转换，丢弃旧内容
    /// - 只有 layout 不同：单纯的 layout 转换
    ///
    /// 本 pass 同时写入同一物理纹理时跳过读取一侧。
    fn sync_textures(
        &mut self,
        pass_index: usize,
        device: &mut dyn GfxDevice,
        executed: &[bool],
        image_states: &mut HashMap<GfxTextureHandle, RgImageState>,
    ) -> Vec<GfxImageBarrier> {
        let pass_type = self.passes[pass_index].pass_type;
        let access = &self.passes[pass_index].access;
        let writes = access.texture_writes.iter().copied().collect_vec();
        let reads = access.texture_reads.iter().copied().collect_vec();

        let written_handles: HashSet<GfxTextureHandle> =
            writes.iter().map(|&id| self.texture_handle(id, pass_index)).collect();

        let mut barriers = Vec::new();
        let targets = writes.into_iter().map(|id| (id, true)).chain(reads.into_iter().map(|id| (id, false)));
        for (id, is_write) in targets {
            let handle = self.texture_handle(id, pass_index);
            if !is_write && written_handles.contains(&handle) {
                continue;
            }

            let format = self.resources.textures.get(id).format();
            let target = if is_write {
                barrier::texture_write_state(pass_type, format)
            } else {
                barrier::texture_read_state(pass_type, self.passes[pass_index].access.texture_state(id))
            };

            let current = *image_states.entry(handle).or_insert_with(|| {
                RgImageState::new(
                    vk::PipelineStageFlags2::TOP_OF_PIPE,
                    vk::AccessFlags2::NONE,
                    device.texture_layout(handle),
                )
            });

            let writers = self.take_pending_texture_writers(id, executed);
            let (old_layout, src) = if !writers.is_empty() {
                let src = writers.iter().fold(RgAccessMask::default(), |mask, &writer| {
                    mask.union(barrier::texture_src_mask(self.passes[writer].pass_type, format))
                });
                (current.layout, src)
            } else if self.passes[pass_index].access.texture_creates.contains(&id) {
                (
                    vk::ImageLayout::UNDEFINED,
                    RgAccessMask::new(vk::PipelineStageFlags2::TOP_OF_PIPE, vk::AccessFlags2::NONE),
                )
            } else if current.layout != target.layout {
                (current.layout, RgAccessMask::new(current.stage, current.src_access()))
            } else {
                let tracked = image_states.entry(handle).or_insert(current);
                tracked.stage |= target.stage;
                tracked.access |= target.access;
                continue;
            };

            log::debug!(
                "RenderGraph: image barrier \"{}\" {:?} -> {:?}",
                self.resources.textures.name(id),
                old_layout,
                target.layout
            );
            barriers.push(
                GfxImageBarrier::new()
                    .image(device.vk_image(handle))
                    .image_aspect_flag(format::infer_aspect(format))
                    .layout_transfer(old_layout, target.layout)
                    .src_mask(src.stage, src.access)
                    .dst_mask(target.stage, target.access),
            );

            image_states.insert(handle, target);
            device.set_texture_layout(handle, target.layout);
        }
        barriers
    }

    /// 调用 pass 的执行回调，必要时包在 dynamic rendering 中
    fn run_pass(&self, pass_index: usize, device: &dyn GfxDevice, cmd: &mut dyn GfxCommandBuffer) {
        let pass = &self.passes[pass_index];
        let ctx = RgPassContext::new(&pass.name, device, &self.resources);

        if pass.pass_type != RgPassType::Graphics || !pass.has_attachments() {
            pass.executor.execute(&ctx, cmd);
            return;
        }

        let viewport = pass.viewport.unwrap_or_else(|| {
            panic!("RenderGraph: graphics pass \"{}\" has attachments but no viewport/scissor", pass.name)
        });
        let render_area = viewport.to_rect();

        let mut rendering_info = GfxRenderingInfo::new(render_area);
        for rt in &pass.render_targets {
            let handle = self.texture_handle(rt.texture, pass_index);
            let format = self.resources.textures.get(rt.texture).format();
            rendering_info.color_attachments.push(GfxRenderingAttachment {
                image: device.vk_image(handle),
                image_view: device.vk_image_view(handle),
                image_layout: barrier::texture_write_state(RgPassType::Graphics, format).layout,
                load_op: rt.load_op,
                store_op: rt.store_op,
                stencil_load_op: vk::AttachmentLoadOp::DONT_CARE,
                stencil_store_op: vk::AttachmentStoreOp::DONT_CARE,
                clear_value: rt.clear_value,
            });
        }
        if let Some(ds) = &pass.depth_stencil {
            let handle = self.texture_handle(ds.texture, pass_index);
            let format = self.resources.textures.get(ds.texture).format();
            rendering_info.depth_stencil_attachment = Some(GfxRenderingAttachment {
                image: device.vk_image(handle),
                image_view: device.vk_image_view(handle),
                image_layout: vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL,
                load_op: ds.depth_load_op,
                store_op: ds.depth_store_op,
                stencil_load_op: ds.stencil_load_op,
                stencil_store_op: ds.stencil_store_op,
                clear_value: ds.clear_value,
            });
            rendering_info.has_stencil = format::has_stencil_component(format);
        }

        cmd.begin_rendering(&rendering_info);
        cmd.set_viewport_and_scissor(render_area);
        pass.executor.execute(&ctx, cmd);
        cmd.end_rendering();
    }
}

// getters
impl<'a> RenderGraph<'a> {
    #[inline]
    pub fn pass(&self, index: usize) -> &RgPassNode<'a> {
        &self.passes[index]
    }
}

impl RenderGraph<'_> {
    #[inline]
    pub fn settings(&self) -> &RenderGraphSettings {
        &self.settings
    }

    #[inline]
    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    #[inline]
    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn find_pass(&self, name: &str) -> Option<usize> {
        self.passes.iter().position(|p| p.name == name)
    }

    /// 执行顺序（pass 下标），build 之前为空
    #[inline]
    pub fn execution_order(&self) -> &[usize] {
        &self.execution_order
    }

    /// 按执行顺序排列的 pass 名字
    pub fn execution_order_names(&self) -> Vec<&str> {
        self.execution_order.iter().map(|&i| self.passes[i].name.as_str()).collect()
    }

    /// 邻接表，build 之前为空
    pub fn adjacency(&self) -> &[Vec<usize>] {
        self.dependency_graph.as_ref().map(|g| g.adjacency()).unwrap_or(&[])
    }

    #[inline]
    pub fn dependency_graph(&self) -> Option<&RgDependencyGraph> {
        self.dependency_graph.as_ref()
    }

    #[inline]
    pub fn resources(&self) -> &RgResourceRegistry {
        &self.resources
    }

    #[inline]
    pub fn find_texture(&self, name: &str) -> Option<RgTextureId> {
        self.resources.textures.find(name)
    }

    #[inline]
    pub fn find_buffer(&self, name: &str) -> Option<RgBufferId> {
        self.resources.buffers.find(name)
    }

    /// 纹理解析后的物理句柄，尚未分配时为 None
    #[inline]
    pub fn get_texture(&self, id: RgTextureId) -> Option<GfxTextureHandle> {
        self.resources.textures.resolve_handle(id)
    }

    #[inline]
    pub fn get_buffer(&self, id: RgBufferId) -> Option<GfxBufferHandle> {
        self.resources.buffers.resolve_handle(id)
    }

    /// 某个 pass 在上一次执行中插入的 barrier 数量
    #[inline]
    pub fn barrier_stats(&self, pass_index: usize) -> Option<RgPassBarrierStats> {
        self.barrier_stats.get(pass_index).copied()
    }
}

// 调试方法
impl RenderGraph<'_> {
    /// 打印执行计划（用于调试）
    ///
    /// 输出每个 Pass 的执行顺序、读写的资源名字、attachment，以及执行过后插入的 barrier 数量。
    pub fn print_execution_plan(&self) {
        log::info!("╔══════════════════════════════════════════════════════════════════╗");
        log::info!("║              RenderGraph Execution Plan                          ║");
        log::info!("╠══════════════════════════════════════════════════════════════════╣");
        log::info!(
            "║ Total Passes: {}  |  Execution Order: [{}]",
            self.passes.len(),
            self.execution_order_names().join(" → ")
        );
        log::info!("╚══════════════════════════════════════════════════════════════════╝");

        let textures = &self.resources.textures;
        let buffers = &self.resources.buffers;
        for (order, &pass_index) in self.execution_order.iter().enumerate() {
            let pass = &self.passes[pass_index];
            let access = &pass.access;

            log::info!("");
            log::info!("┌─────────────────────────────────────────────────────────────────┐");
            log::info!("│ [{}/{}] {} Pass: \"{}\"", order + 1, self.execution_order.len(), pass.pass_type, pass.name);
            log::info!("├─────────────────────────────────────────────────────────────────┤");

            if !access.texture_creates.is_empty() || !access.buffer_creates.is_empty() {
                let created = access
                    .texture_creates
                    .iter()
                    .map(|&id| textures.name(id))
                    .chain(access.buffer_creates.iter().map(|&id| buffers.name(id)))
                    .join(", ");
                log::info!("│ Creates: {}", created);
            }
            for &id in &access.texture_reads {
                log::info!("│   📖 texture \"{}\" ({:?})", textures.name(id), access.texture_state(id));
            }
            for &id in &access.texture_writes {
                let alias = textures.get(id).alias_of.map(|src| format!(" (alias of \"{}\")", textures.name(src)));
                log::info!("│   ✏️  texture \"{}\"{}", textures.name(id), alias.unwrap_or_default());
            }
            for &id in &access.buffer_reads {
                log::info!("│   📖 buffer \"{}\" ({:?})", buffers.name(id), access.buffer_state(id));
            }
            for &id in &access.buffer_writes {
                log::info!("│   ✏️  buffer \"{}\"", buffers.name(id));
            }

            if pass.has_attachments() {
                let targets = pass.render_targets.iter().map(|rt| textures.name(rt.texture)).join(", ");
                let depth = pass.depth_stencil.map(|ds| textures.name(ds.texture)).unwrap_or("-");
                log::info!("│ Attachments: color [{}], depth-stencil {}", targets, depth);
            }

            if let Some(stats) = self.barrier_stats.get(pass_index) {
                log::info!("│ Barriers: {} image, {} buffer", stats.image_barriers, stats.buffer_barriers);
            }
            log::info!("└─────────────────────────────────────────────────────────────────┘");
        }
    }
}
