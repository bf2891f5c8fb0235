//! 延迟渲染管线
//!
//! ```text
//! DepthPrepass ──► Cull ──► GBuffer ──► Lighting ──► Bloom* ──► Tonemap ──► Readback
//!      │                       ▲
//!      └───────────────────────┘  (SceneDepth 是 Depth 的别名)
//! ```
//!
//! 所有资源都由 render graph 管理，每帧重新声明；物理资源由资源池跨帧复用。

mod bloom_pass;
mod cull_pass;

use ash::vk;
use vesper_gfx::basic::color::LabelColor;
use vesper_gfx::commands::command_buffer::GfxCommandBuffer;
use vesper_gfx::commands::rendering_info::GfxClearValue;
use vesper_render_graph::render_graph::{
    RenderGraph, RgBufferDesc, RgBufferId, RgPassType, RgResourceState, RgTextureDesc, RgTextureId,
};

pub use bloom_pass::BloomPass;
pub use cull_pass::CullPass;

use crate::app_config::AppConfig;

// 资源名字
pub const DEPTH: &str = "Depth";
pub const SCENE_DEPTH: &str = "SceneDepth";
pub const DRAW_COMMANDS: &str = "DrawCommands";
pub const ALBEDO: &str = "GBufferAlbedo";
pub const NORMAL: &str = "GBufferNormal";
pub const HDR: &str = "HDR";
pub const HDR_BLOOM: &str = "HDRBloom";
pub const LDR: &str = "LDR";
pub const READBACK: &str = "ReadbackStaging";

pub const DEPTH_FORMAT: vk::Format = vk::Format::D32_SFLOAT;
pub const HDR_FORMAT: vk::Format = vk::Format::R16G16B16A16_SFLOAT;

/// 在 pass 的执行回调里标记一条命令，headless 后端会记录成一个 debug label
fn record_command(cmd: &mut dyn GfxCommandBuffer, name: &str) {
    cmd.begin_label(name, LabelColor::COLOR_CMD);
    cmd.end_label();
}

#[derive(Default)]
struct GBufferData {
    draw_commands: Option<RgBufferId>,
    albedo: Option<RgTextureId>,
}

#[derive(Default)]
struct LightingData {
    inputs: Vec<RgTextureId>,
    output: Option<RgTextureId>,
}

#[derive(Default)]
struct ReadbackData {
    source: Option<RgTextureId>,
    staging: Option<RgBufferId>,
}

/// 延迟渲染管线
///
/// 本身不持有 GPU 资源，每帧通过 [`DeferredPipeline::record`] 把 pass 加入新的 graph。
/// pass 的执行回调借用 `self`，graph 的生命周期不能超过管线。
pub struct DeferredPipeline {
    pub width: u32,
    pub height: u32,
    pub bloom_enabled: bool,
    pub max_draws: u32,
}

// new & init
impl DeferredPipeline {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            bloom_enabled: config.bloom_enabled,
            max_draws: config.max_draws,
        }
    }
}

// 构建 graph
impl DeferredPipeline {
    /// 把整条管线加入 graph
    pub fn record<'a>(&'a self, graph: &mut RenderGraph<'a>) {
        self.add_depth_prepass(graph);
        graph.add_rg_pass("Cull", RgPassType::Compute, CullPass::new(self.max_draws));
        self.add_gbuffer_pass(graph);
        self.add_lighting_pass(graph);

        let tonemap_input = if self.bloom_enabled {
            for (name, pass) in BloomPass::chain(self.width, self.height) {
                graph.add_rg_pass(name, RgPassType::Compute, pass);
            }
            HDR_BLOOM
        } else {
            HDR
        };

        self.add_tonemap_pass(graph, tonemap_input);
        self.add_readback_pass(graph);
    }

    fn color_desc(&self, format: vk::Format, usage: vk::ImageUsageFlags) -> RgTextureDesc {
        RgTextureDesc::new_2d(self.width, self.height, format, usage)
    }

    fn add_depth_prepass(&self, graph: &mut RenderGraph<'_>) {
        let depth_desc = self.color_desc(
            DEPTH_FORMAT,
            vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT | vk::ImageUsageFlags::SAMPLED,
        );
        let (width, height) = (self.width, self.height);

        graph.add_pass::<()>(
            "DepthPrepass",
            RgPassType::Graphics,
            |_, builder| {
                builder.declare_texture(DEPTH, depth_desc);
                builder.write_depth_stencil(
                    DEPTH,
                    GfxClearValue::DEPTH_FAR,
                    vk::AttachmentLoadOp::CLEAR,
                    vk::AttachmentStoreOp::STORE,
                    vk::AttachmentLoadOp::DONT_CARE,
                    vk::AttachmentStoreOp::DONT_CARE,
                    None,
                );
                builder.set_viewport_scissor(width, height);
            },
            |_, _, cmd| record_command(cmd, "draw_opaque_depth"),
        );
    }

    fn add_gbuffer_pass<'a>(&'a self, graph: &mut RenderGraph<'a>) {
        let albedo_desc = self.color_desc(
            vk::Format::R8G8B8A8_UNORM,
            vk::ImageUsageFlags::COLOR_ATTACHMENT | vk::ImageUsageFlags::SAMPLED,
        );
        let normal_desc = self.color_desc(
            HDR_FORMAT,
            vk::ImageUsageFlags::COLOR_ATTACHMENT | vk::ImageUsageFlags::SAMPLED,
        );
        let (width, height) = (self.width, self.height);

        graph.add_pass(
            "GBuffer",
            RgPassType::Graphics,
            |data: &mut GBufferData, builder| {
                data.draw_commands = Some(builder.read_buffer(DRAW_COMMANDS, RgResourceState::INDIRECT_ARGUMENT));

                builder.declare_texture(ALBEDO, albedo_desc);
                builder.declare_texture(NORMAL, normal_desc);
                data.albedo = Some(builder.write_render_target(
                    ALBEDO,
                    GfxClearValue::BLACK,
                    vk::AttachmentLoadOp::CLEAR,
                    vk::AttachmentStoreOp::STORE,
                    None,
                ));
                builder.write_render_target(
                    NORMAL,
                    GfxClearValue::Color([0.0; 4]),
                    vk::AttachmentLoadOp::CLEAR,
                    vk::AttachmentStoreOp::STORE,
                    None,
                );
                // 深度已经在 prepass 中写好，这里只做 equal 测试
                builder.write_depth_stencil(
                    SCENE_DEPTH,
                    GfxClearValue::DEPTH_FAR,
                    vk::AttachmentLoadOp::LOAD,
                    vk::AttachmentStoreOp::STORE,
                    vk::AttachmentLoadOp::DONT_CARE,
                    vk::AttachmentStoreOp::DONT_CARE,
                    Some(DEPTH),
                );
                builder.set_viewport_scissor(width, height);
            },
            move |data, ctx, cmd| {
                let (Some(draw_commands), Some(albedo)) = (data.draw_commands, data.albedo) else {
                    return;
                };
                log::trace!(
                    "GBuffer: draw indirect from {:?}, max {} draws, albedo {:?}",
                    ctx.vk_buffer(draw_commands),
                    self.max_draws,
                    ctx.vk_image_view(albedo)
                );
                record_command(cmd, "draw_indexed_indirect");
            },
        );
    }

    fn add_lighting_pass(&self, graph: &mut RenderGraph<'_>) {
        let hdr_desc = self.color_desc(HDR_FORMAT, vk::ImageUsageFlags::STORAGE | vk::ImageUsageFlags::SAMPLED);
        let groups = [self.width.div_ceil(8), self.height.div_ceil(8), 1];

        graph.add_pass(
            "Lighting",
            RgPassType::Compute,
            |data: &mut LightingData, builder| {
                for input in [ALBEDO, NORMAL, SCENE_DEPTH] {
                    data.inputs.push(builder.read_texture(input, RgResourceState::SHADER_RESOURCE));
                }
                builder.declare_texture(HDR, hdr_desc);
                data.output = Some(builder.write_texture(HDR, None));
            },
            move |data, ctx, cmd| {
                let views = data.inputs.iter().map(|&id| ctx.vk_image_view(id)).collect::<Vec<_>>();
                log::trace!("Lighting: dispatch {:?}, gbuffer {:?} -> {:?}", groups, views, data.output);
                record_command(cmd, "dispatch_lighting");
            },
        );
    }

    fn add_tonemap_pass(&self, graph: &mut RenderGraph<'_>, input: &'static str) {
        let ldr_desc = self.color_desc(
            vk::Format::R8G8B8A8_UNORM,
            vk::ImageUsageFlags::COLOR_ATTACHMENT | vk::ImageUsageFlags::TRANSFER_SRC,
        );
        let (width, height) = (self.width, self.height);

        graph.add_pass::<()>(
            "Tonemap",
            RgPassType::Graphics,
            |_, builder| {
                builder.read_texture(input, RgResourceState::SHADER_RESOURCE);
                builder.declare_texture(LDR, ldr_desc);
                builder.write_render_target(
                    LDR,
                    GfxClearValue::BLACK,
                    vk::AttachmentLoadOp::DONT_CARE,
                    vk::AttachmentStoreOp::STORE,
                    None,
                );
                builder.set_viewport_scissor(width, height);
            },
            |_, _, cmd| record_command(cmd, "draw_fullscreen_triangle"),
        );
    }

    fn add_readback_pass(&self, graph: &mut RenderGraph<'_>) {
        let staging_size = vk::DeviceSize::from(self.width) * vk::DeviceSize::from(self.height) * 4;

        graph.add_pass(
            "Readback",
            RgPassType::Transfer,
            |data: &mut ReadbackData, builder| {
                data.source = Some(builder.read_texture(LDR, RgResourceState::TRANSFER_SRC));
                let desc = RgBufferDesc::new(staging_size, vk::BufferUsageFlags::TRANSFER_DST).per_frame();
                builder.declare_buffer(READBACK, desc);
                data.staging = Some(builder.write_buffer(READBACK, None));
            },
            |data, ctx, cmd| {
                let (Some(source), Some(staging)) = (data.source, data.staging) else {
                    return;
                };
                log::trace!("Readback: copy {:?} -> {:?}", ctx.vk_image(source), ctx.vk_buffer(staging));
                record_command(cmd, "copy_image_to_buffer");
            },
        );
    }
}
