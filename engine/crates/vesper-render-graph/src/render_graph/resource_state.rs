//! 资源状态定义
//!
//! - [`RgResourceState`]: pass 读取资源时声明的用途，参与 graphics pass 的 dst mask 推导
//! - [`RgImageState`]: stage、access、layout 三元组，用于跟踪 image 的当前状态

use ash::vk;
use bitflags::bitflags;

bitflags! {
    /// pass 读取资源的方式
    ///
    /// 同一个 pass 对同一个资源多次读取时，flags 会合并。
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct RgResourceState: u32 {
        const VERTEX_BUFFER = 1 << 0;
        const INDEX_BUFFER = 1 << 1;
        const INDIRECT_ARGUMENT = 1 << 2;
        const UNIFORM_BUFFER = 1 << 3;
        /// 采样或只读访问
        const SHADER_RESOURCE = 1 << 4;
        const STORAGE = 1 << 5;
        const TRANSFER_SRC = 1 << 6;
        const DEPTH_READ = 1 << 7;
    }
}

impl Default for RgResourceState {
    fn default() -> Self {
        Self::empty()
    }
}

impl RgResourceState {
    /// graphics pass 读取时额外需要等待的 stage 和 access
    pub fn graphics_mask(self) -> (vk::PipelineStageFlags2, vk::AccessFlags2) {
        let mut stage = vk::PipelineStageFlags2::NONE;
        let mut access = vk::AccessFlags2::NONE;

        if self.contains(Self::VERTEX_BUFFER) {
            stage |= vk::PipelineStageFlags2::VERTEX_ATTRIBUTE_INPUT;
            access |= vk::AccessFlags2::VERTEX_ATTRIBUTE_READ;
        }
        if self.contains(Self::INDEX_BUFFER) {
            stage |= vk::PipelineStageFlags2::INDEX_INPUT;
            access |= vk::AccessFlags2::INDEX_READ;
        }
        if self.contains(Self::INDIRECT_ARGUMENT) {
            stage |= vk::PipelineStageFlags2::DRAW_INDIRECT;
            access |= vk::AccessFlags2::INDIRECT_COMMAND_READ;
        }
        if self.contains(Self::UNIFORM_BUFFER) {
            stage |= vk::PipelineStageFlags2::VERTEX_SHADER;
            access |= vk::AccessFlags2::UNIFORM_READ;
        }
        if self.contains(Self::SHADER_RESOURCE) {
            stage |= vk::PipelineStageFlags2::VERTEX_SHADER;
            access |= vk::AccessFlags2::SHADER_READ;
        }
        if self.contains(Self::STORAGE) {
            stage |= vk::PipelineStageFlags2::VERTEX_SHADER;
            access |= vk::AccessFlags2::SHADER_STORAGE_READ;
        }
        if self.contains(Self::TRANSFER_SRC) {
            stage |= vk::PipelineStageFlags2::ALL_TRANSFER;
            access |= vk::AccessFlags2::TRANSFER_READ;
        }
        if self.contains(Self::DEPTH_READ) {
            stage |= vk::PipelineStageFlags2::EARLY_FRAGMENT_TESTS | vk::PipelineStageFlags2::LATE_FRAGMENT_TESTS;
            access |= vk::AccessFlags2::DEPTH_STENCIL_ATTACHMENT_READ;
        }

        (stage, access)
    }
}

/// 图像资源状态
///
/// 描述图像在某个 Pass 中的使用方式，用于自动计算 barrier。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RgImageState {
    /// Pipeline stage
    pub stage: vk::PipelineStageFlags2,
    /// Access mask
    pub access: vk::AccessFlags2,
    /// Image layout
    pub layout: vk::ImageLayout,
}

impl Default for RgImageState {
    fn default() -> Self {
        Self::UNDEFINED
    }
}

// new & 常量定义
impl RgImageState {
    #[inline]
    pub const fn new(stage: vk::PipelineStageFlags2, access: vk::AccessFlags2, layout: vk::ImageLayout) -> Self {
        Self { stage, access, layout }
    }

    /// 未定义状态（新分配的 image，内容不关心）
    pub const UNDEFINED: Self =
        Self::new(vk::PipelineStageFlags2::TOP_OF_PIPE, vk::AccessFlags2::NONE, vk::ImageLayout::UNDEFINED);

    /// 颜色附件读写
    pub const COLOR_ATTACHMENT: Self = Self::new(
        vk::PipelineStageFlags2::COLOR_ATTACHMENT_OUTPUT,
        vk::AccessFlags2::from_raw(
            vk::AccessFlags2::COLOR_ATTACHMENT_READ.as_raw() | vk::AccessFlags2::COLOR_ATTACHMENT_WRITE.as_raw(),
        ),
        vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
    );

    /// 深度模板附件读写
    pub const DEPTH_STENCIL_ATTACHMENT: Self = Self::new(
        vk::PipelineStageFlags2::from_raw(
            vk::PipelineStageFlags2::EARLY_FRAGMENT_TESTS.as_raw()
                | vk::PipelineStageFlags2::LATE_FRAGMENT_TESTS.as_raw(),
        ),
        vk::AccessFlags2::from_raw(
            vk::AccessFlags2::DEPTH_STENCIL_ATTACHMENT_READ.as_raw()
                | vk::AccessFlags2::DEPTH_STENCIL_ATTACHMENT_WRITE.as_raw(),
        ),
        vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL,
    );

    /// graphics pass 中的着色器只读访问
    pub const SHADER_READ_GRAPHICS: Self = Self::new(
        vk::PipelineStageFlags2::from_raw(
            vk::PipelineStageFlags2::VERTEX_SHADER.as_raw() | vk::PipelineStageFlags2::FRAGMENT_SHADER.as_raw(),
        ),
        vk::AccessFlags2::from_raw(
            vk::AccessFlags2::SHADER_SAMPLED_READ.as_raw() | vk::AccessFlags2::SHADER_READ.as_raw(),
        ),
        vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
    );

    /// 计算着色器读写
    pub const COMPUTE_GENERAL: Self = Self::new(
        vk::PipelineStageFlags2::COMPUTE_SHADER,
        vk::AccessFlags2::from_raw(vk::AccessFlags2::SHADER_READ.as_raw() | vk::AccessFlags2::SHADER_WRITE.as_raw()),
        vk::ImageLayout::GENERAL,
    );

    /// 传输源
    pub const TRANSFER_SRC: Self = Self::new(
        vk::PipelineStageFlags2::ALL_TRANSFER,
        vk::AccessFlags2::TRANSFER_READ,
        vk::ImageLayout::TRANSFER_SRC_OPTIMAL,
    );

    /// 传输目标
    pub const TRANSFER_DST: Self = Self::new(
        vk::PipelineStageFlags2::ALL_TRANSFER,
        vk::AccessFlags2::TRANSFER_WRITE,
        vk::ImageLayout::TRANSFER_DST_OPTIMAL,
    );

    /// 写操作的 access flags
    const WRITE_ACCESS: vk::AccessFlags2 = vk::AccessFlags2::from_raw(
        vk::AccessFlags2::SHADER_WRITE.as_raw()
            | vk::AccessFlags2::SHADER_STORAGE_WRITE.as_raw()
            | vk::AccessFlags2::COLOR_ATTACHMENT_WRITE.as_raw()
            | vk::AccessFlags2::DEPTH_STENCIL_ATTACHMENT_WRITE.as_raw()
            | vk::AccessFlags2::TRANSFER_WRITE.as_raw()
            | vk::AccessFlags2::MEMORY_WRITE.as_raw(),
    );

    /// 检查是否为写操作
    #[inline]
    pub fn is_write(&self) -> bool {
        self.access.intersects(Self::WRITE_ACCESS)
    }

    /// 作为 barrier src 时只保留写操作的 access
    #[inline]
    pub fn src_access(&self) -> vk::AccessFlags2 {
        self.access & Self::WRITE_ACCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphics_mask_vertex_and_indirect() {
        let (stage, access) = (RgResourceState::VERTEX_BUFFER | RgResourceState::INDIRECT_ARGUMENT).graphics_mask();
        assert!(stage.contains(vk::PipelineStageFlags2::VERTEX_ATTRIBUTE_INPUT));
        assert!(stage.contains(vk::PipelineStageFlags2::DRAW_INDIRECT));
        assert!(access.contains(vk::AccessFlags2::VERTEX_ATTRIBUTE_READ));
        assert!(access.contains(vk::AccessFlags2::INDIRECT_COMMAND_READ));
        assert!(!access.contains(vk::AccessFlags2::INDEX_READ));
    }

    #[test]
    fn test_image_state_write_access() {
        assert!(RgImageState::COLOR_ATTACHMENT.is_write());
        assert!(RgImageState::COMPUTE_GENERAL.is_write());
        assert!(!RgImageState::SHADER_READ_GRAPHICS.is_write());
        assert!(!RgImageState::TRANSFER_SRC.is_write());
        assert_eq!(RgImageState::COLOR_ATTACHMENT.src_access(), vk::AccessFlags2::COLOR_ATTACHMENT_WRITE);
    }
}
