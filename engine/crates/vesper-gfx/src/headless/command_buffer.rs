use ash::vk;

use crate::commands::barrier::{GfxBufferBarrier, GfxImageBarrier};
use crate::commands::command_buffer::GfxCommandBuffer;
use crate::commands::rendering_info::GfxRenderingInfo;

/// 被记录下来的一条命令
#[derive(Clone, Debug)]
pub enum RecordedCommand {
    Barriers {
        buffer_barriers: Vec<GfxBufferBarrier>,
        image_barriers: Vec<GfxImageBarrier>,
    },
    BeginRendering(GfxRenderingInfo),
    EndRendering,
    SetViewportAndScissor(vk::Rect2D),
    BeginLabel {
        name: String,
        color: glam::Vec4,
    },
    EndLabel,
    /// pass 自己录制的命令，用于在测试中标记执行位置
    Marker(String),
}

/// 记录所有调用的 [`GfxCommandBuffer`] 实现
#[derive(Default)]
pub struct RecordingCommandBuffer {
    commands: Vec<RecordedCommand>,
}

impl RecordingCommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn commands(&self) -> &[RecordedCommand] {
        &self.commands
    }

    /// 取走已记录的命令，开始新一帧的记录
    #[inline]
    pub fn take_commands(&mut self) -> Vec<RecordedCommand> {
        std::mem::take(&mut self.commands)
    }

    /// 插入一个自定义标记
    #[inline]
    pub fn marker(&mut self, text: impl Into<String>) {
        self.commands.push(RecordedCommand::Marker(text.into()));
    }

    /// 依次列出每个 debug label 的名字，即 pass 的执行顺序
    pub fn label_names(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                RecordedCommand::BeginLabel { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// 所有 barrier 批次
    pub fn barrier_batches(&self) -> Vec<(&[GfxBufferBarrier], &[GfxImageBarrier])> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                RecordedCommand::Barriers {
                    buffer_barriers,
                    image_barriers,
                } => Some((buffer_barriers.as_slice(), image_barriers.as_slice())),
                _ => None,
            })
            .collect()
    }

    /// 某个 pass 的 label 区间内记录的命令（不含 label 本身）
    pub fn commands_in_label(&self, label: &str) -> &[RecordedCommand] {
        let Some(begin) = self
            .commands
            .iter()
            .position(|cmd| matches!(cmd, RecordedCommand::BeginLabel { name, .. } if name == label))
        else {
            return &[];
        };

        let mut depth = 0usize;
        for (offset, cmd) in self.commands[begin + 1..].iter().enumerate() {
            match cmd {
                RecordedCommand::BeginLabel { .. } => depth += 1,
                RecordedCommand::EndLabel if depth == 0 => return &self.commands[begin + 1..begin + 1 + offset],
                RecordedCommand::EndLabel => depth -= 1,
                _ => {}
            }
        }
        &self.commands[begin + 1..]
    }
}

impl GfxCommandBuffer for RecordingCommandBuffer {
    fn insert_barriers(&mut self, buffer_barriers: &[GfxBufferBarrier], image_barriers: &[GfxImageBarrier]) {
        self.commands.push(RecordedCommand::Barriers {
            buffer_barriers: buffer_barriers.to_vec(),
            image_barriers: image_barriers.to_vec(),
        });
    }

    fn begin_rendering(&mut self, rendering_info: &GfxRenderingInfo) {
        self.commands.push(RecordedCommand::BeginRendering(rendering_info.clone()));
    }

    fn end_rendering(&mut self) {
        self.commands.push(RecordedCommand::EndRendering);
    }

    fn set_viewport_and_scissor(&mut self, area: vk::Rect2D) {
        self.commands.push(RecordedCommand::SetViewportAndScissor(area));
    }

    fn begin_label(&mut self, label_name: &str, label_color: glam::Vec4) {
        self.commands.push(RecordedCommand::BeginLabel {
            name: label_name.to_string(),
            color: label_color,
        });
    }

    fn end_label(&mut self) {
        self.commands.push(RecordedCommand::EndLabel);
    }
}
