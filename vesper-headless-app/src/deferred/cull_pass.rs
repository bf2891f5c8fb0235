//! GPU culling Pass
//!
//! 用 prepass 的深度做遮挡剔除，把可见物体写成 indirect draw 命令。

use ash::vk;
use vesper_gfx::commands::command_buffer::GfxCommandBuffer;
use vesper_render_graph::render_graph::{
    RgBufferDesc, RgBufferId, RgBuilder, RgPass, RgPassContext, RgResourceState, RgTextureId,
};

use crate::deferred::{DEPTH, DRAW_COMMANDS, record_command};

pub struct CullPass {
    max_draws: u32,

    depth: Option<RgTextureId>,
    draw_commands: Option<RgBufferId>,
}

impl CullPass {
    const COMMAND_STRIDE: vk::DeviceSize = size_of::<vk::DrawIndexedIndirectCommand>() as vk::DeviceSize;
    const GROUP_SIZE: u32 = 64;

    pub fn new(max_draws: u32) -> Self {
        Self {
            max_draws,
            depth: None,
            draw_commands: None,
        }
    }
}

impl RgPass for CullPass {
    fn setup(&mut self, builder: &mut RgBuilder<'_>) {
        self.depth = Some(builder.read_texture(DEPTH, RgResourceState::SHADER_RESOURCE));

        // 每帧的 indirect 命令在 GPU 读取完之前不能被下一帧覆盖
        let desc = RgBufferDesc::new(
            Self::COMMAND_STRIDE * vk::DeviceSize::from(self.max_draws),
            vk::BufferUsageFlags::STORAGE_BUFFER | vk::BufferUsageFlags::INDIRECT_BUFFER,
        )
        .per_frame();
        builder.declare_buffer(DRAW_COMMANDS, desc);
        self.draw_commands = Some(builder.write_buffer(DRAW_COMMANDS, None));
    }

    fn execute(&self, ctx: &RgPassContext<'_>, cmd: &mut dyn GfxCommandBuffer) {
        let (Some(depth), Some(draw_commands)) = (self.depth, self.draw_commands) else {
            return;
        };

        log::trace!(
            "Cull: {} groups, hi-z {:?}, output {:?} ({} bytes)",
            self.max_draws.div_ceil(Self::GROUP_SIZE),
            ctx.vk_image_view(depth),
            ctx.vk_buffer(draw_commands),
            ctx.buffer_spec(draw_commands).capacity
        );
        record_command(cmd, "dispatch_cull");
    }
}
