use ash::vk;
use ash::vk::Handle;
use slotmap::SlotMap;

use crate::device::GfxDevice;
use crate::handles::{GfxBufferHandle, GfxTextureHandle};
use crate::resources::buffer::GfxBufferSpec;
use crate::resources::texture::GfxTextureSpec;

/// 内存中的纹理对象
#[derive(Debug, Clone)]
pub struct HeadlessTexture {
    pub spec: GfxTextureSpec,
    pub name: String,
    pub layout: vk::ImageLayout,
    pub image: vk::Image,
    pub view: vk::ImageView,
}

/// 内存中的缓冲区对象
#[derive(Debug, Clone)]
pub struct HeadlessBuffer {
    pub spec: GfxBufferSpec,
    pub name: String,
    pub buffer: vk::Buffer,
}

/// 纯内存的 [`GfxDevice`] 实现
///
/// vk 句柄是递增的假值，只用于区分不同的资源。同时统计创建、销毁、resize 次数，方便测试资源池的复用行为。
#[derive(Default)]
pub struct HeadlessDevice {
    textures: SlotMap<GfxTextureHandle, HeadlessTexture>,
    buffers: SlotMap<GfxBufferHandle, HeadlessBuffer>,

    next_raw_handle: u64,

    textures_created: usize,
    textures_destroyed: usize,
    buffers_created: usize,
    buffers_destroyed: usize,
    resize_count: usize,
}

// new & init
impl HeadlessDevice {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_raw(&mut self) -> u64 {
        self.next_raw_handle += 1;
        self.next_raw_handle
    }
}

// getters
impl HeadlessDevice {
    #[inline]
    pub fn texture(&self, handle: GfxTextureHandle) -> Option<&HeadlessTexture> {
        self.textures.get(handle)
    }

    #[inline]
    pub fn buffer(&self, handle: GfxBufferHandle) -> Option<&HeadlessBuffer> {
        self.buffers.get(handle)
    }

    /// 当前存活的纹理数量
    #[inline]
    pub fn live_texture_count(&self) -> usize {
        self.textures.len()
    }

    /// 当前存活的缓冲区数量
    #[inline]
    pub fn live_buffer_count(&self) -> usize {
        self.buffers.len()
    }

    #[inline]
    pub fn textures_created(&self) -> usize {
        self.textures_created
    }

    #[inline]
    pub fn textures_destroyed(&self) -> usize {
        self.textures_destroyed
    }

    #[inline]
    pub fn buffers_created(&self) -> usize {
        self.buffers_created
    }

    #[inline]
    pub fn buffers_destroyed(&self) -> usize {
        self.buffers_destroyed
    }

    #[inline]
    pub fn resize_count(&self) -> usize {
        self.resize_count
    }

    fn texture_ref(&self, handle: GfxTextureHandle) -> &HeadlessTexture {
        self.textures.get(handle).unwrap_or_else(|| panic!("HeadlessDevice: texture {handle:?} does not exist"))
    }

    fn texture_mut(&mut self, handle: GfxTextureHandle) -> &mut HeadlessTexture {
        self.textures.get_mut(handle).unwrap_or_else(|| panic!("HeadlessDevice: texture {handle:?} does not exist"))
    }

    fn buffer_ref(&self, handle: GfxBufferHandle) -> &HeadlessBuffer {
        self.buffers.get(handle).unwrap_or_else(|| panic!("HeadlessDevice: buffer {handle:?} does not exist"))
    }

    fn buffer_mut(&mut self, handle: GfxBufferHandle) -> &mut HeadlessBuffer {
        self.buffers.get_mut(handle).unwrap_or_else(|| panic!("HeadlessDevice: buffer {handle:?} does not exist"))
    }
}

impl GfxDevice for HeadlessDevice {
    fn create_texture(&mut self, spec: &GfxTextureSpec, name: &str) -> GfxTextureHandle {
        let image = vk::Image::from_raw(self.next_raw());
        let view = vk::ImageView::from_raw(self.next_raw());
        self.textures_created += 1;
        log::debug!("HeadlessDevice: create texture \"{}\" {}x{} {:?}", name, spec.width, spec.height, spec.format);

        self.textures.insert(HeadlessTexture {
            spec: *spec,
            name: name.to_string(),
            layout: vk::ImageLayout::UNDEFINED,
            image,
            view,
        })
    }

    fn create_buffer(&mut self, spec: &GfxBufferSpec, name: &str) -> GfxBufferHandle {
        let buffer = vk::Buffer::from_raw(self.next_raw());
        self.buffers_created += 1;
        log::debug!("HeadlessDevice: create buffer \"{}\" ({} bytes)", name, spec.capacity);

        self.buffers.insert(HeadlessBuffer {
            spec: *spec,
            name: name.to_string(),
            buffer,
        })
    }

    fn destroy_texture(&mut self, handle: GfxTextureHandle) {
        if let Some(texture) = self.textures.remove(handle) {
            self.textures_destroyed += 1;
            log::debug!("HeadlessDevice: destroy texture \"{}\"", texture.name);
        }
    }

    fn destroy_buffer(&mut self, handle: GfxBufferHandle) {
        if let Some(buffer) = self.buffers.remove(handle) {
            self.buffers_destroyed += 1;
            log::debug!("HeadlessDevice: destroy buffer \"{}\"", buffer.name);
        }
    }

    fn resize_texture(&mut self, handle: GfxTextureHandle, width: u32, height: u32, depth: u32) {
        self.resize_count += 1;
        let texture = self.texture_mut(handle);
        texture.spec.width = width;
        texture.spec.height = height;
        texture.spec.depth = depth;
        // 重新创建的 image 内容未定义
        texture.layout = vk::ImageLayout::UNDEFINED;
    }

    fn resize_buffer(&mut self, handle: GfxBufferHandle, capacity: vk::DeviceSize) {
        self.resize_count += 1;
        self.buffer_mut(handle).spec.capacity = capacity;
    }

    fn set_texture_debug_name(&mut self, handle: GfxTextureHandle, name: &str) {
        self.texture_mut(handle).name = name.to_string();
    }

    fn set_buffer_debug_name(&mut self, handle: GfxBufferHandle, name: &str) {
        self.buffer_mut(handle).name = name.to_string();
    }

    fn texture_spec(&self, handle: GfxTextureHandle) -> &GfxTextureSpec {
        &self.texture_ref(handle).spec
    }

    fn buffer_spec(&self, handle: GfxBufferHandle) -> &GfxBufferSpec {
        &self.buffer_ref(handle).spec
    }

    fn texture_layout(&self, handle: GfxTextureHandle) -> vk::ImageLayout {
        self.texture_ref(handle).layout
    }

    fn set_texture_layout(&mut self, handle: GfxTextureHandle, layout: vk::ImageLayout) {
        self.texture_mut(handle).layout = layout;
    }

    fn vk_image(&self, handle: GfxTextureHandle) -> vk::Image {
        self.texture_ref(handle).image
    }

    fn vk_image_view(&self, handle: GfxTextureHandle) -> vk::ImageView {
        self.texture_ref(handle).view
    }

    fn vk_buffer(&self, handle: GfxBufferHandle) -> vk::Buffer {
        self.buffer_ref(handle).buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_destroy() {
        let mut device = HeadlessDevice::new();
        let spec = GfxTextureSpec::new_2d(16, 16, vk::Format::R8G8B8A8_UNORM, vk::ImageUsageFlags::SAMPLED);
        let a = device.create_texture(&spec, "a");
        let b = device.create_texture(&spec, "b");
        assert_ne!(device.vk_image(a), device.vk_image(b));
        assert_eq!(device.texture_layout(a), vk::ImageLayout::UNDEFINED);

        device.destroy_texture(a);
        assert_eq!(device.live_texture_count(), 1);
        assert_eq!(device.textures_created(), 2);
        assert_eq!(device.textures_destroyed(), 1);
    }

    #[test]
    fn test_resize_resets_layout() {
        let mut device = HeadlessDevice::new();
        let spec = GfxTextureSpec::new_2d(16, 16, vk::Format::R8G8B8A8_UNORM, vk::ImageUsageFlags::SAMPLED);
        let handle = device.create_texture(&spec, "t");
        device.set_texture_layout(handle, vk::ImageLayout::GENERAL);
        device.resize_texture(handle, 32, 8, 1);

        assert_eq!(device.texture_spec(handle).width, 32);
        assert_eq!(device.texture_spec(handle).height, 8);
        assert_eq!(device.texture_layout(handle), vk::ImageLayout::UNDEFINED);
    }
}
