use ash::vk;
use vesper_gfx::commands::command_buffer::GfxCommandBuffer;
use vesper_gfx::device::GfxDevice;
use vesper_gfx::handles::{GfxBufferHandle, GfxTextureHandle};
use vesper_gfx::resources::buffer::GfxBufferSpec;
use vesper_gfx::resources::texture::GfxTextureSpec;

use crate::render_graph::resource_handle::{RgBufferId, RgTextureId};
use crate::render_graph::resource_pool::RgResourcePool;
use crate::render_graph::resource_registry::RgResourceRegistry;

/// 执行一帧 graph 需要的外部对象
///
/// 资源池跨帧持有；device 和 command buffer 由渲染后端提供。
pub struct RgFrameResources<'f> {
    pub pool: &'f mut RgResourcePool,
    pub device: &'f mut dyn GfxDevice,
    pub cmd: &'f mut dyn GfxCommandBuffer,
}

impl<'f> RgFrameResources<'f> {
    pub fn new(pool: &'f mut RgResourcePool, device: &'f mut dyn GfxDevice, cmd: &'f mut dyn GfxCommandBuffer) -> Self {
        Self { pool, device, cmd }
    }
}

/// Pass 执行时的上下文
///
/// 把 graph 内部的资源 ID 解析为物理资源。
pub struct RgPassContext<'a> {
    pass_name: &'a str,
    device: &'a dyn GfxDevice,
    resources: &'a RgResourceRegistry,
}

// new & init
impl<'a> RgPassContext<'a> {
    pub(crate) fn new(pass_name: &'a str, device: &'a dyn GfxDevice, resources: &'a RgResourceRegistry) -> Self {
        Self {
            pass_name,
            device,
            resources,
        }
    }
}

// getters
impl RgPassContext<'_> {
    #[inline]
    pub fn pass_name(&self) -> &str {
        self.pass_name
    }

    #[inline]
    pub fn device(&self) -> &dyn GfxDevice {
        self.device
    }

    /// 纹理的物理句柄，未分配时为 None
    #[inline]
    pub fn try_get_texture(&self, id: RgTextureId) -> Option<GfxTextureHandle> {
        self.resources.textures.resolve_handle(id)
    }

    /// 纹理的物理句柄
    ///
    /// # Panics
    /// 纹理尚未分配
    pub fn get_texture(&self, id: RgTextureId) -> GfxTextureHandle {
        self.try_get_texture(id).unwrap_or_else(|| {
            panic!(
                "RenderGraph: pass \"{}\" accesses texture \"{}\" which is not allocated",
                self.pass_name,
                self.resources.textures.name(id)
            )
        })
    }

    #[inline]
    pub fn try_get_buffer(&self, id: RgBufferId) -> Option<GfxBufferHandle> {
        self.resources.buffers.resolve_handle(id)
    }

    /// 缓冲区的物理句柄
    ///
    /// # Panics
    /// 缓冲区尚未分配
    pub fn get_buffer(&self, id: RgBufferId) -> GfxBufferHandle {
        self.try_get_buffer(id).unwrap_or_else(|| {
            panic!(
                "RenderGraph: pass \"{}\" accesses buffer \"{}\" which is not allocated",
                self.pass_name,
                self.resources.buffers.name(id)
            )
        })
    }

    /// 按名字查找纹理
    #[inline]
    pub fn find_texture(&self, name: &str) -> Option<RgTextureId> {
        self.resources.textures.find(name)
    }

    #[inline]
    pub fn find_buffer(&self, name: &str) -> Option<RgBufferId> {
        self.resources.buffers.find(name)
    }

    /// 物理纹理当前的创建参数
    #[inline]
    pub fn texture_spec(&self, id: RgTextureId) -> &GfxTextureSpec {
        self.device.texture_spec(self.get_texture(id))
    }

    #[inline]
    pub fn buffer_spec(&self, id: RgBufferId) -> &GfxBufferSpec {
        self.device.buffer_spec(self.get_buffer(id))
    }

    #[inline]
    pub fn vk_image(&self, id: RgTextureId) -> vk::Image {
        self.device.vk_image(self.get_texture(id))
    }

    #[inline]
    pub fn vk_image_view(&self, id: RgTextureId) -> vk::ImageView {
        self.device.vk_image_view(self.get_texture(id))
    }

    #[inline]
    pub fn vk_buffer(&self, id: RgBufferId) -> vk::Buffer {
        self.device.vk_buffer(self.get_buffer(id))
    }
}
