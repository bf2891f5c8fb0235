//! Graph 资源节点
//!
//! 每个声明（或别名）出来的名字对应一个节点。节点记录了读写它的 pass，
//! 以及已经和哪些写入 pass 同步过，执行时据此生成 barrier。

use std::collections::{BTreeSet, HashSet};

use ash::vk;
use vesper_gfx::handles::{GfxBufferHandle, GfxTextureHandle};
use vesper_gfx::resources::buffer::GfxBufferSpec;
use vesper_gfx::resources::texture::GfxTextureSpec;

use crate::render_graph::resource_handle::{RgBufferId, RgTextureId};

/// 纹理资源描述
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RgTextureDesc {
    pub spec: GfxTextureSpec,
    /// 为每个 frame in flight 单独分配一份
    pub per_frame: bool,
}

impl RgTextureDesc {
    #[inline]
    pub fn new(spec: GfxTextureSpec) -> Self {
        Self { spec, per_frame: false }
    }

    /// 2D 纹理的便捷构造
    #[inline]
    pub fn new_2d(width: u32, height: u32, format: vk::Format, usage: vk::ImageUsageFlags) -> Self {
        Self::new(GfxTextureSpec::new_2d(width, height, format, usage))
    }

    #[inline]
    pub fn per_frame(mut self) -> Self {
        self.per_frame = true;
        self
    }
}

/// 缓冲区资源描述
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RgBufferDesc {
    pub spec: GfxBufferSpec,
    pub per_frame: bool,
}

impl RgBufferDesc {
    #[inline]
    pub fn new(capacity: vk::DeviceSize, usage: vk::BufferUsageFlags) -> Self {
        Self {
            spec: GfxBufferSpec::new(capacity, usage),
            per_frame: false,
        }
    }

    #[inline]
    pub fn with_spec(spec: GfxBufferSpec) -> Self {
        Self { spec, per_frame: false }
    }

    #[inline]
    pub fn per_frame(mut self) -> Self {
        self.per_frame = true;
        self
    }
}

/// Graph 资源节点，纹理和缓冲区共用同一套结构
#[derive(Debug)]
pub struct RgResource<Id, Desc, Handle> {
    pub id: Id,
    pub name: String,
    pub desc: Desc,

    /// 物理资源句柄
    ///
    /// 在声明它的 pass 执行时分配；别名在源资源分配后立即得到同一个句柄。
    pub handle: Option<Handle>,
    /// 别名的源资源
    pub alias_of: Option<Id>,

    /// 读取该资源的 pass 下标
    pub read_passes: BTreeSet<usize>,
    /// 写入该资源的 pass 下标
    pub write_passes: BTreeSet<usize>,
    /// 已经插入过 barrier 的写入 pass，同一次写入只同步一次
    pub synced_with: HashSet<usize>,
}

pub type RgTexture = RgResource<RgTextureId, RgTextureDesc, GfxTextureHandle>;
pub type RgBuffer = RgResource<RgBufferId, RgBufferDesc, GfxBufferHandle>;

// new & init
impl<Id, Desc, Handle> RgResource<Id, Desc, Handle> {
    pub fn new(id: Id, name: impl Into<String>, desc: Desc) -> Self {
        Self {
            id,
            name: name.into(),
            desc,
            handle: None,
            alias_of: None,
            read_passes: BTreeSet::new(),
            write_passes: BTreeSet::new(),
            synced_with: HashSet::new(),
        }
    }

    pub fn new_alias(id: Id, name: impl Into<String>, desc: Desc, source: Id) -> Self {
        Self {
            alias_of: Some(source),
            ..Self::new(id, name, desc)
        }
    }
}

// getters
impl<Id, Desc, Handle: Copy> RgResource<Id, Desc, Handle> {
    #[inline]
    pub fn is_alias(&self) -> bool {
        self.alias_of.is_some()
    }

    #[inline]
    pub fn handle(&self) -> Option<Handle> {
        self.handle
    }
}

impl RgTexture {
    #[inline]
    pub fn format(&self) -> vk::Format {
        self.desc.spec.format
    }
}

impl RgBuffer {
    #[inline]
    pub fn capacity(&self) -> vk::DeviceSize {
        self.desc.spec.capacity
    }
}
