//! Vesper GPU 抽象层
//!
//! render graph 只依赖这里定义的接口，不直接调用 Vulkan API：
//!
//! - [`device::GfxDevice`]: 纹理、缓冲区的创建、销毁、resize，以及 image layout 跟踪
//! - [`commands::command_buffer::GfxCommandBuffer`]: barrier、dynamic rendering、debug label
//! - [`commands::barrier`]: `vk::ImageMemoryBarrier2` / `vk::BufferMemoryBarrier2` 的 builder
//! - [`headless`]: 纯内存实现，不需要 GPU，用于单元测试和 demo

pub mod basic;
pub mod commands;
pub mod device;
pub mod handles;
pub mod headless;
pub mod resources;
