//! 不依赖 GPU 的后端实现
//!
//! `HeadlessDevice` 在内存里模拟资源的生命周期和 image layout，
//! `RecordingCommandBuffer` 把所有命令按顺序记录下来，测试可以逐条检查。

mod command_buffer;
mod device;

pub use command_buffer::{RecordedCommand, RecordingCommandBuffer};
pub use device::{HeadlessBuffer, HeadlessDevice, HeadlessTexture};
