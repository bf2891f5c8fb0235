//! Pass 定义
//!
//! 一个 pass 由两部分组成：
//! - setup 阶段通过 [`RgBuilder`] 声明的资源访问和 attachment（[`RgPassNode`]）
//! - 执行阶段调用的回调，可以是闭包（`RenderGraph::add_pass`）或实现了 [`RgPass`] 的对象

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use ash::vk;
use vesper_gfx::commands::command_buffer::GfxCommandBuffer;
use vesper_gfx::commands::rendering_info::GfxClearValue;

use crate::render_graph::builder::RgBuilder;
use crate::render_graph::context::RgPassContext;
use crate::render_graph::resource_handle::{RgBufferId, RgTextureId};
use crate::render_graph::resource_state::RgResourceState;

/// pass 在哪类管线上执行，决定 barrier 的 stage、access 和 image layout
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RgPassType {
    Graphics,
    Compute,
    Transfer,
}

impl fmt::Display for RgPassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Graphics => "graphics",
            Self::Compute => "compute",
            Self::Transfer => "transfer",
        };
        f.write_str(name)
    }
}

/// pass 对资源的访问声明
#[derive(Clone, Debug, Default)]
pub struct RgPassAccess {
    /// 由该 pass 声明、在该 pass 执行前分配的资源
    pub texture_creates: BTreeSet<RgTextureId>,
    pub texture_reads: BTreeSet<RgTextureId>,
    pub texture_writes: BTreeSet<RgTextureId>,

    pub buffer_creates: BTreeSet<RgBufferId>,
    pub buffer_reads: BTreeSet<RgBufferId>,
    pub buffer_writes: BTreeSet<RgBufferId>,

    /// 读取时声明的用途，同一资源多次读取时合并
    pub texture_states: HashMap<RgTextureId, RgResourceState>,
    pub buffer_states: HashMap<RgBufferId, RgResourceState>,
}

impl RgPassAccess {
    #[inline]
    pub fn texture_state(&self, id: RgTextureId) -> RgResourceState {
        self.texture_states.get(&id).copied().unwrap_or_default()
    }

    #[inline]
    pub fn buffer_state(&self, id: RgBufferId) -> RgResourceState {
        self.buffer_states.get(&id).copied().unwrap_or_default()
    }
}

/// 颜色 attachment
#[derive(Clone, Copy, Debug)]
pub struct RgRenderTargetInfo {
    pub texture: RgTextureId,
    pub clear_value: GfxClearValue,
    pub load_op: vk::AttachmentLoadOp,
    pub store_op: vk::AttachmentStoreOp,
}

/// 深度模板 attachment，depth 和 stencil 的 load/store 分开指定
#[derive(Clone, Copy, Debug)]
pub struct RgDepthStencilInfo {
    pub texture: RgTextureId,
    pub clear_value: GfxClearValue,
    pub depth_load_op: vk::AttachmentLoadOp,
    pub depth_store_op: vk::AttachmentStoreOp,
    pub stencil_load_op: vk::AttachmentLoadOp,
    pub stencil_store_op: vk::AttachmentStoreOp,
}

/// viewport 和 scissor 使用同一个矩形
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RgViewport {
    pub width: u32,
    pub height: u32,
    pub offset_x: i32,
    pub offset_y: i32,
}

impl RgViewport {
    #[inline]
    pub fn to_rect(&self) -> vk::Rect2D {
        vk::Rect2D {
            offset: vk::Offset2D {
                x: self.offset_x,
                y: self.offset_y,
            },
            extent: vk::Extent2D {
                width: self.width,
                height: self.height,
            },
        }
    }
}

/// RgPass trait
///
/// 定义渲染图中的一个 Pass。需要在 pass 内部保存状态时实现此 trait，
/// 否则直接使用 `RenderGraph::add_pass` 的闭包形式即可。
///
/// # 示例
///
/// ```ignore
/// struct BlurPass {
///     input: Option<RgTextureId>,
///     output: Option<RgTextureId>,
/// }
///
/// impl RgPass for BlurPass {
///     fn setup(&mut self, builder: &mut RgBuilder) {
///         self.input = Some(builder.read_texture("HDR", RgResourceState::SHADER_RESOURCE));
///         self.output = Some(builder.write_texture("Blurred", Some("Scratch")));
///     }
///
///     fn execute(&self, ctx: &RgPassContext<'_>, cmd: &mut dyn GfxCommandBuffer) {
///         let input = ctx.get_texture(self.input.unwrap());
///         // 绑定 pipeline, dispatch...
///     }
/// }
/// ```
///
/// # 线程安全
///
/// Pass 不需要是 Send + Sync，graph 的构建和执行都在驱动这一帧的线程上完成。
pub trait RgPass {
    /// 声明 Pass 的资源依赖，在 `add_rg_pass` 时立即调用
    fn setup(&mut self, builder: &mut RgBuilder<'_>);

    /// 录制 Pass 的命令
    ///
    /// barrier 已经插入完毕；带 attachment 的 graphics pass 已经处于 dynamic rendering 中。
    fn execute(&self, ctx: &RgPassContext<'_>, cmd: &mut dyn GfxCommandBuffer);
}

/// 类型擦除的 Pass 执行器 trait
pub(crate) trait RgPassExecutor {
    fn execute(&self, ctx: &RgPassContext<'_>, cmd: &mut dyn GfxCommandBuffer);
}

/// 包装用户 Pass 实现的执行器
pub(crate) struct RgPassExecutorWrapper<P: RgPass> {
    pub pass: P,
}

impl<P: RgPass> RgPassExecutor for RgPassExecutorWrapper<P> {
    fn execute(&self, ctx: &RgPassContext<'_>, cmd: &mut dyn GfxCommandBuffer) {
        self.pass.execute(ctx, cmd);
    }
}

/// 闭包形式的 pass：setup 填充的数据 + 执行回调
pub(crate) struct RgClosureExecutor<D, F> {
    pub data: D,
    pub execute: F,
}

impl<D, F> RgPassExecutor for RgClosureExecutor<D, F>
where
    F: Fn(&D, &RgPassContext<'_>, &mut dyn GfxCommandBuffer),
{
    fn execute(&self, ctx: &RgPassContext<'_>, cmd: &mut dyn GfxCommandBuffer) {
        (self.execute)(&self.data, ctx, cmd);
    }
}

/// Pass 节点
pub struct RgPassNode<'a> {
    pub name: String,
    pub pass_type: RgPassType,
    pub access: RgPassAccess,

    /// 颜色 attachment，按声明顺序绑定
    pub render_targets: Vec<RgRenderTargetInfo>,
    pub depth_stencil: Option<RgDepthStencilInfo>,
    pub viewport: Option<RgViewport>,

    /// 执行回调（类型擦除的 Pass 实现）
    pub(crate) executor: Box<dyn RgPassExecutor + 'a>,
}

impl RgPassNode<'_> {
    /// 是否需要开启 dynamic rendering
    #[inline]
    pub fn has_attachments(&self) -> bool {
        !self.render_targets.is_empty() || self.depth_stencil.is_some()
    }
}
