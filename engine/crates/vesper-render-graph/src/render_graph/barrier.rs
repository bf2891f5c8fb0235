//! barrier 的 stage / access / layout 推导
//!
//! 源端由写入 pass 的类型决定，目标端由读取 pass 的类型决定；
//! graphics pass 读取缓冲区时无法从类型得知具体 stage，需要结合缓冲区 usage 和声明的读取状态。

use ash::vk;
use vesper_gfx::resources::format;

use crate::render_graph::pass::RgPassType;
use crate::render_graph::resource_state::{RgImageState, RgResourceState};

/// stage + access
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct RgAccessMask {
    pub stage: vk::PipelineStageFlags2,
    pub access: vk::AccessFlags2,
}

impl RgAccessMask {
    #[inline]
    pub const fn new(stage: vk::PipelineStageFlags2, access: vk::AccessFlags2) -> Self {
        Self { stage, access }
    }

    #[inline]
    pub fn union(self, other: Self) -> Self {
        Self {
            stage: self.stage | other.stage,
            access: self.access | other.access,
        }
    }
}

const SHADER_READ_WRITE: vk::AccessFlags2 =
    vk::AccessFlags2::from_raw(vk::AccessFlags2::SHADER_READ.as_raw() | vk::AccessFlags2::SHADER_WRITE.as_raw());

/// 写入缓冲区的 pass 作为 barrier 源端
///
/// # Panics
/// graphics pass 不允许写入 storage buffer
pub fn buffer_src_mask(writer_type: RgPassType, writer_name: &str, buffer_name: &str) -> RgAccessMask {
    match writer_type {
        RgPassType::Graphics => panic!(
            "RenderGraph: graphics passes may not write storage buffers (pass \"{}\", buffer \"{}\")",
            writer_name, buffer_name
        ),
        RgPassType::Compute => RgAccessMask::new(vk::PipelineStageFlags2::COMPUTE_SHADER, SHADER_READ_WRITE),
        RgPassType::Transfer => RgAccessMask::new(vk::PipelineStageFlags2::ALL_TRANSFER, vk::AccessFlags2::TRANSFER_WRITE),
    }
}

/// 读写缓冲区的 pass 作为 barrier 目标端
///
/// graphics pass 按缓冲区 usage 扩展 stage 和 access，并且总是包含 fragment/mesh/task shader stage。
pub fn buffer_dst_mask(
    reader_type: RgPassType,
    usage: vk::BufferUsageFlags,
    state: RgResourceState,
) -> RgAccessMask {
    match reader_type {
        RgPassType::Compute => RgAccessMask::new(vk::PipelineStageFlags2::COMPUTE_SHADER, SHADER_READ_WRITE),
        RgPassType::Transfer => RgAccessMask::new(
            vk::PipelineStageFlags2::ALL_TRANSFER,
            vk::AccessFlags2::TRANSFER_READ | vk::AccessFlags2::TRANSFER_WRITE,
        ),
        RgPassType::Graphics => {
            let mut stage = vk::PipelineStageFlags2::FRAGMENT_SHADER
                | vk::PipelineStageFlags2::MESH_SHADER_EXT
                | vk::PipelineStageFlags2::TASK_SHADER_EXT;
            let mut access = vk::AccessFlags2::NONE;

            if usage.contains(vk::BufferUsageFlags::INDIRECT_BUFFER) {
                stage |= vk::PipelineStageFlags2::DRAW_INDIRECT;
                access |= vk::AccessFlags2::INDIRECT_COMMAND_READ;
            }
            if usage.contains(vk::BufferUsageFlags::VERTEX_BUFFER) {
                stage |= vk::PipelineStageFlags2::VERTEX_ATTRIBUTE_INPUT | vk::PipelineStageFlags2::VERTEX_SHADER;
                access |= vk::AccessFlags2::VERTEX_ATTRIBUTE_READ;
            }
            if usage.contains(vk::BufferUsageFlags::INDEX_BUFFER) {
                stage |= vk::PipelineStageFlags2::INDEX_INPUT;
                access |= vk::AccessFlags2::INDEX_READ;
            }
            if usage.contains(vk::BufferUsageFlags::STORAGE_BUFFER) {
                stage |= vk::PipelineStageFlags2::VERTEX_SHADER;
                access |= vk::AccessFlags2::SHADER_READ;
            }
            if usage.contains(vk::BufferUsageFlags::UNIFORM_BUFFER) {
                stage |= vk::PipelineStageFlags2::VERTEX_SHADER;
                access |= vk::AccessFlags2::UNIFORM_READ;
            }

            let (state_stage, state_access) = state.graphics_mask();
            RgAccessMask::new(stage | state_stage, access | state_access)
        }
    }
}

/// pass 写入纹理时纹理需要处于的状态
pub fn texture_write_state(pass_type: RgPassType, format: vk::Format) -> RgImageState {
    match pass_type {
        RgPassType::Graphics if format::is_depth_format(format) => RgImageState::DEPTH_STENCIL_ATTACHMENT,
        RgPassType::Graphics => RgImageState::COLOR_ATTACHMENT,
        RgPassType::Compute => RgImageState::COMPUTE_GENERAL,
        RgPassType::Transfer => RgImageState::TRANSFER_DST,
    }
}

/// pass 读取纹理时纹理需要处于的状态
///
/// transfer pass 读取时作为拷贝源，使用 `TRANSFER_SRC_OPTIMAL`。
pub fn texture_read_state(pass_type: RgPassType, state: RgResourceState) -> RgImageState {
    match pass_type {
        RgPassType::Graphics => {
            let (stage, access) = state.graphics_mask();
            let base = RgImageState::SHADER_READ_GRAPHICS;
            RgImageState::new(base.stage | stage, base.access | access, base.layout)
        }
        RgPassType::Compute => RgImageState::COMPUTE_GENERAL,
        RgPassType::Transfer => RgImageState::TRANSFER_SRC,
    }
}

/// 写入纹理的 pass 作为 barrier 源端
#[inline]
pub fn texture_src_mask(writer_type: RgPassType, format: vk::Format) -> RgAccessMask {
    let state = texture_write_state(writer_type, format);
    RgAccessMask::new(state.stage, state.src_access())
}
