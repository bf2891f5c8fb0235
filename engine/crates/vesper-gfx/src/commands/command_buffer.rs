use ash::vk;

use crate::commands::barrier::{GfxBufferBarrier, GfxImageBarrier};
use crate::commands::rendering_info::GfxRenderingInfo;

/// 命令录制接口
///
/// render graph 在执行 pass 时通过此接口插入 barrier、开启 dynamic rendering、打 debug label。
/// 具体的 Vulkan 实现由渲染后端提供；[`crate::headless::RecordingCommandBuffer`] 把所有调用记录下来用于测试。
pub trait GfxCommandBuffer {
    /// 一次 `vkCmdPipelineBarrier2` 提交全部 barrier
    ///
    /// - command type: synchronize
    /// - supported queue types: graphics, compute, transfer
    fn insert_barriers(&mut self, buffer_barriers: &[GfxBufferBarrier], image_barriers: &[GfxImageBarrier]);

    /// - command type: state
    /// - supported queue type: graphics
    fn begin_rendering(&mut self, rendering_info: &GfxRenderingInfo);

    fn end_rendering(&mut self);

    /// 同时设置 viewport 和 scissor
    fn set_viewport_and_scissor(&mut self, area: vk::Rect2D);

    /// - command type: state, action
    /// - supported queue type: graphics, compute
    fn begin_label(&mut self, label_name: &str, label_color: glam::Vec4);

    fn end_label(&mut self);
}
