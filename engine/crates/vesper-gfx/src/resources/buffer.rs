use ash::vk;
use bitflags::bitflags;

bitflags! {
    /// 缓冲区的内存属性，和 usage 一起决定缓冲区能否复用
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct GfxBufferFlags: u32 {
        const DEVICE_LOCAL = 1 << 0;
        const HOST_VISIBLE = 1 << 1;
        const DEDICATED_ALLOCATION = 1 << 2;
    }
}

/// 缓冲区创建参数
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GfxBufferSpec {
    /// 容量（字节）
    pub capacity: vk::DeviceSize,
    pub usage: vk::BufferUsageFlags,
    pub flags: GfxBufferFlags,
}

impl Default for GfxBufferSpec {
    fn default() -> Self {
        Self {
            capacity: 0,
            usage: vk::BufferUsageFlags::STORAGE_BUFFER,
            flags: GfxBufferFlags::DEVICE_LOCAL,
        }
    }
}

impl GfxBufferSpec {
    #[inline]
    pub fn new(capacity: vk::DeviceSize, usage: vk::BufferUsageFlags) -> Self {
        Self {
            capacity,
            usage,
            ..Default::default()
        }
    }

    #[inline]
    pub fn with_flags(mut self, flags: GfxBufferFlags) -> Self {
        self.flags = flags;
        self
    }

    /// 两个缓冲区是否可以复用同一个物理资源（容量不同时原地 resize）
    #[inline]
    pub fn is_compatible_with(&self, other: &Self) -> bool {
        self.usage == other.usage && self.flags == other.flags
    }
}
