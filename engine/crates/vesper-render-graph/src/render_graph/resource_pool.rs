//! 瞬态资源池
//!
//! render graph 每帧重建，但物理资源由资源池跨帧持有。池里分为两部分：
//!
//! - shared：所有帧共用，同一帧内一个条目只能被分配一次
//! - per-frame：每个 frame in flight 一个槽位，对应 `per_frame` 描述的资源
//!
//! 每帧开始时调用 [`RgResourcePool::tick`]，超过一帧未使用的条目会被销毁。

use ash::vk;
use vesper_gfx::device::GfxDevice;
use vesper_gfx::handles::{GfxBufferHandle, GfxTextureHandle};
use vesper_gfx::resources::buffer::GfxBufferSpec;
use vesper_gfx::resources::texture::GfxTextureSpec;

use crate::render_graph::resource::{RgBufferDesc, RgTextureDesc};
use crate::render_graph::settings::RgPoolSettings;

/// 池中的一个条目
struct RgPooledResource<Spec, Handle> {
    handle: Handle,
    spec: Spec,
    name: String,
    /// 最后一次被分配的帧号，从未分配过为 None
    last_used_frame: Option<u64>,
    /// 当前帧已经被分配
    active: bool,
}

type RgTextureEntries = Vec<RgPooledResource<GfxTextureSpec, GfxTextureHandle>>;
type RgBufferEntries = Vec<RgPooledResource<GfxBufferSpec, GfxBufferHandle>>;

/// 按帧复用物理纹理和缓冲区
pub struct RgResourcePool {
    frames_in_flight: usize,
    /// 当前帧号，每次 tick 加一
    frame_number: u64,

    shared_textures: RgTextureEntries,
    per_frame_textures: Vec<RgTextureEntries>,
    shared_buffers: RgBufferEntries,
    per_frame_buffers: Vec<RgBufferEntries>,
}

impl Default for RgResourcePool {
    fn default() -> Self {
        Self::new(&RgPoolSettings::default())
    }
}

// new & init
impl RgResourcePool {
    pub fn new(settings: &RgPoolSettings) -> Self {
        assert!(settings.frames_in_flight > 0, "RgResourcePool: frames_in_flight must be at least 1");

        let frames_in_flight = settings.frames_in_flight;
        Self {
            frames_in_flight,
            frame_number: 0,
            shared_textures: Vec::new(),
            per_frame_textures: (0..frames_in_flight).map(|_| Vec::new()).collect(),
            shared_buffers: Vec::new(),
            per_frame_buffers: (0..frames_in_flight).map(|_| Vec::new()).collect(),
        }
    }
}

// update
impl RgResourcePool {
    /// 进入下一帧
    ///
    /// 回收 shared 池和当前帧槽位中不再使用的条目：
    /// - shared：未激活且 `last_used < frame`
    /// - per-frame：未激活且 `last_used + 1 < frame`，多留一帧
    ///
    /// 之后把这两部分剩余条目的 active 标记清空，本帧可以重新分配。
    pub fn tick(&mut self, device: &mut dyn GfxDevice) {
        let _span = tracy_client::span!("RgResourcePool::tick");

        self.frame_number += 1;
        let frame = self.frame_number;
        let slot = self.current_slot();

        let shared_expired = |last_used: Option<u64>| last_used.is_none_or(|last| last < frame);
        let per_frame_expired = |last_used: Option<u64>| last_used.is_none_or(|last| last + 1 < frame);

        Self::evict(&mut self.shared_textures, shared_expired, |h| device.destroy_texture(h));
        Self::evict(&mut self.per_frame_textures[slot], per_frame_expired, |h| device.destroy_texture(h));
        Self::evict(&mut self.shared_buffers, shared_expired, |h| device.destroy_buffer(h));
        Self::evict(&mut self.per_frame_buffers[slot], per_frame_expired, |h| device.destroy_buffer(h));

        self.shared_textures.iter_mut().for_each(|e| e.active = false);
        self.per_frame_textures[slot].iter_mut().for_each(|e| e.active = false);
        self.shared_buffers.iter_mut().for_each(|e| e.active = false);
        self.per_frame_buffers[slot].iter_mut().for_each(|e| e.active = false);
    }

    /// swap-remove 所有过期条目
    fn evict<Spec, Handle: Copy>(
        entries: &mut Vec<RgPooledResource<Spec, Handle>>,
        expired: impl Fn(Option<u64>) -> bool,
        mut destroy: impl FnMut(Handle),
    ) {
        let mut index = 0;
        while index < entries.len() {
            let entry = &entries[index];
            if !entry.active && expired(entry.last_used_frame) {
                let entry = entries.swap_remove(index);
                log::debug!("RgResourcePool: evict \"{}\"", entry.name);
                destroy(entry.handle);
            } else {
                index += 1;
            }
        }
    }

    /// 分配一个物理纹理
    ///
    /// 优先复用兼容且本帧未分配的条目，尺寸不同时原地 resize；没有可复用的条目时创建新的。
    pub fn allocate_texture(
        &mut self,
        device: &mut dyn GfxDevice,
        desc: &RgTextureDesc,
        name: &str,
    ) -> GfxTextureHandle {
        let frame = self.frame_number;
        let slot = self.current_slot();
        let entries = if desc.per_frame { &mut self.per_frame_textures[slot] } else { &mut self.shared_textures };

        if let Some(entry) = entries.iter_mut().find(|e| !e.active && e.spec.is_compatible_with(&desc.spec)) {
            entry.active = true;
            entry.last_used_frame = Some(frame);

            if !entry.spec.same_size(&desc.spec) {
                log::debug!(
                    "RgResourcePool: resize texture \"{}\" {}x{} -> {}x{}",
                    entry.name,
                    entry.spec.width,
                    entry.spec.height,
                    desc.spec.width,
                    desc.spec.height
                );
                device.resize_texture(entry.handle, desc.spec.width, desc.spec.height, desc.spec.depth);
                entry.spec = desc.spec;
            }
            if entry.name != name {
                device.set_texture_debug_name(entry.handle, name);
                entry.name = name.to_string();
            }
            return entry.handle;
        }

        let handle = device.create_texture(&desc.spec, name);
        log::debug!("RgResourcePool: create texture \"{}\" (per_frame: {})", name, desc.per_frame);
        entries.push(RgPooledResource {
            handle,
            spec: desc.spec,
            name: name.to_string(),
            last_used_frame: Some(frame),
            active: true,
        });
        handle
    }

    /// 分配一个物理缓冲区，规则同 [`Self::allocate_texture`]
    pub fn allocate_buffer(&mut self, device: &mut dyn GfxDevice, desc: &RgBufferDesc, name: &str) -> GfxBufferHandle {
        let frame = self.frame_number;
        let slot = self.current_slot();
        let entries = if desc.per_frame { &mut self.per_frame_buffers[slot] } else { &mut self.shared_buffers };

        if let Some(entry) = entries.iter_mut().find(|e| !e.active && e.spec.is_compatible_with(&desc.spec)) {
            entry.active = true;
            entry.last_used_frame = Some(frame);

            if entry.spec.capacity != desc.spec.capacity {
                log::debug!(
                    "RgResourcePool: resize buffer \"{}\" {} -> {} bytes",
                    entry.name,
                    entry.spec.capacity,
                    desc.spec.capacity
                );
                device.resize_buffer(entry.handle, desc.spec.capacity);
                entry.spec.capacity = desc.spec.capacity;
            }
            if entry.name != name {
                device.set_buffer_debug_name(entry.handle, name);
                entry.name = name.to_string();
            }
            return entry.handle;
        }

        let handle = device.create_buffer(&desc.spec, name);
        log::debug!(
            "RgResourcePool: create buffer \"{}\" ({} bytes, per_frame: {})",
            name,
            desc.spec.capacity,
            desc.per_frame
        );
        entries.push(RgPooledResource {
            handle,
            spec: desc.spec,
            name: name.to_string(),
            last_used_frame: Some(frame),
            active: true,
        });
        handle
    }
}

// destroy
impl RgResourcePool {
    /// 销毁池中所有资源
    pub fn release_all(&mut self, device: &mut dyn GfxDevice) {
        let _span = tracy_client::span!("RgResourcePool::release_all");

        let per_frame_textures = self.per_frame_textures.iter_mut().flat_map(|p| p.drain(..));
        for entry in self.shared_textures.drain(..).chain(per_frame_textures) {
            device.destroy_texture(entry.handle);
        }

        let per_frame_buffers = self.per_frame_buffers.iter_mut().flat_map(|p| p.drain(..));
        for entry in self.shared_buffers.drain(..).chain(per_frame_buffers) {
            device.destroy_buffer(entry.handle);
        }
    }
}

// getters
impl RgResourcePool {
    #[inline]
    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    #[inline]
    pub fn frames_in_flight(&self) -> usize {
        self.frames_in_flight
    }

    /// 当前帧使用的 per-frame 槽位
    #[inline]
    pub fn current_slot(&self) -> usize {
        (self.frame_number % self.frames_in_flight as u64) as usize
    }

    #[inline]
    pub fn shared_texture_count(&self) -> usize {
        self.shared_textures.len()
    }

    #[inline]
    pub fn per_frame_texture_count(&self, slot: usize) -> usize {
        self.per_frame_textures[slot].len()
    }

    #[inline]
    pub fn shared_buffer_count(&self) -> usize {
        self.shared_buffers.len()
    }

    #[inline]
    pub fn per_frame_buffer_count(&self, slot: usize) -> usize {
        self.per_frame_buffers[slot].len()
    }

    /// 池中所有资源占用的缓冲区字节数
    pub fn total_buffer_bytes(&self) -> vk::DeviceSize {
        self.shared_buffers
            .iter()
            .chain(self.per_frame_buffers.iter().flatten())
            .map(|e| e.spec.capacity)
            .sum()
    }
}
