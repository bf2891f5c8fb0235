use ash::vk;

use crate::handles::{GfxBufferHandle, GfxTextureHandle};
use crate::resources::buffer::GfxBufferSpec;
use crate::resources::texture::GfxTextureSpec;

/// GPU 资源工厂
///
/// 负责纹理、缓冲区的创建和销毁，并记录每个 image 当前的 layout。
/// 调用方只持有句柄，资源的所有权始终在实现者手里。
///
/// 查询一个已销毁或不存在的句柄属于调用方的逻辑错误，实现可以直接 panic。
pub trait GfxDevice {
    fn create_texture(&mut self, spec: &GfxTextureSpec, name: &str) -> GfxTextureHandle;
    fn create_buffer(&mut self, spec: &GfxBufferSpec, name: &str) -> GfxBufferHandle;

    fn destroy_texture(&mut self, handle: GfxTextureHandle);
    fn destroy_buffer(&mut self, handle: GfxBufferHandle);

    /// 原地改变纹理尺寸，格式、用途保持不变
    fn resize_texture(&mut self, handle: GfxTextureHandle, width: u32, height: u32, depth: u32);
    fn resize_buffer(&mut self, handle: GfxBufferHandle, capacity: vk::DeviceSize);

    fn set_texture_debug_name(&mut self, handle: GfxTextureHandle, name: &str);
    fn set_buffer_debug_name(&mut self, handle: GfxBufferHandle, name: &str);

    fn texture_spec(&self, handle: GfxTextureHandle) -> &GfxTextureSpec;
    fn buffer_spec(&self, handle: GfxBufferHandle) -> &GfxBufferSpec;

    /// image 当前所处的 layout（最后一次 barrier 之后的 layout）
    fn texture_layout(&self, handle: GfxTextureHandle) -> vk::ImageLayout;
    fn set_texture_layout(&mut self, handle: GfxTextureHandle, layout: vk::ImageLayout);

    fn vk_image(&self, handle: GfxTextureHandle) -> vk::Image;
    fn vk_image_view(&self, handle: GfxTextureHandle) -> vk::ImageView;
    fn vk_buffer(&self, handle: GfxBufferHandle) -> vk::Buffer;
}
