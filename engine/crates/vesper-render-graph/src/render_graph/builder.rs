//! Pass 构建器
//!
//! 只在 pass 的 setup 阶段使用。所有资源都通过名字引用：
//! 声明新资源、读取已有资源、写入已有资源或以已有资源为源写入一个新的别名。
//! 依赖关系由这些读写记录隐式确定，不需要手动连边。

use ash::vk;
use vesper_gfx::commands::rendering_info::GfxClearValue;

use crate::render_graph::pass::{RgDepthStencilInfo, RgPassAccess, RgPassType, RgRenderTargetInfo, RgViewport};
use crate::render_graph::resource::{RgBufferDesc, RgTextureDesc};
use crate::render_graph::resource_handle::{RgBufferId, RgTextureId};
use crate::render_graph::resource_registry::RgResourceRegistry;
use crate::render_graph::resource_state::RgResourceState;

/// Pass 构建器
///
/// 声明错误（重名、引用未声明的名字、空的读取状态等）属于 pass 编写错误，直接 panic。
pub struct RgBuilder<'r> {
    pub(crate) pass_index: usize,
    pub(crate) pass_name: String,
    pub(crate) pass_type: RgPassType,

    pub(crate) access: RgPassAccess,
    pub(crate) render_targets: Vec<RgRenderTargetInfo>,
    pub(crate) depth_stencil: Option<RgDepthStencilInfo>,
    pub(crate) viewport: Option<RgViewport>,

    /// 资源注册表引用（用于声明资源和记录读写 pass）
    pub(crate) resources: &'r mut RgResourceRegistry,
}

// new & init
impl<'r> RgBuilder<'r> {
    pub(crate) fn new(
        pass_index: usize,
        pass_name: &str,
        pass_type: RgPassType,
        resources: &'r mut RgResourceRegistry,
    ) -> Self {
        Self {
            pass_index,
            pass_name: pass_name.to_string(),
            pass_type,
            access: RgPassAccess::default(),
            render_targets: Vec::new(),
            depth_stencil: None,
            viewport: None,
            resources,
        }
    }
}

// getters
impl RgBuilder<'_> {
    #[inline]
    pub fn pass_name(&self) -> &str {
        &self.pass_name
    }

    #[inline]
    pub fn pass_type(&self) -> RgPassType {
        self.pass_type
    }
}

// texture
impl RgBuilder<'_> {
    /// 声明一个新纹理，在本 pass 执行前由资源池分配
    ///
    /// # Panics
    /// 名字已经被声明过
    pub fn declare_texture(&mut self, name: &str, desc: RgTextureDesc) -> RgTextureId {
        let id = self.resources.textures.declare(name, desc);
        self.access.texture_creates.insert(id);
        id
    }

    /// 声明读取纹理
    ///
    /// # Panics
    /// `state` 为空，或名字未声明
    pub fn read_texture(&mut self, name: &str, state: RgResourceState) -> RgTextureId {
        assert!(
            !state.is_empty(),
            "RenderGraph: pass \"{}\" reads texture \"{}\" with empty resource state",
            self.pass_name,
            name
        );

        let id = self.resources.textures.lookup(name, &self.pass_name);
        self.access.texture_reads.insert(id);
        self.resources.textures.get_mut(id).read_passes.insert(self.pass_index);
        *self.access.texture_states.entry(id).or_default() |= state;
        id
    }

    /// 声明写入纹理
    ///
    /// - `source` 为 None：写入已声明的 `name`
    /// - `source` 为 Some：读取 `source`，并把写入结果登记为新名字 `name`，与 `source` 共用物理资源
    ///
    /// # Panics
    /// 引用的名字未声明，或别名的名字已经存在
    pub fn write_texture(&mut self, name: &str, source: Option<&str>) -> RgTextureId {
        let pass_index = self.pass_index;
        let textures = &mut self.resources.textures;

        let id = match source {
            None => textures.lookup(name, &self.pass_name),
            Some(source) => {
                let source_id = textures.lookup(source, &self.pass_name);
                self.access.texture_reads.insert(source_id);
                textures.get_mut(source_id).read_passes.insert(pass_index);

                textures.declare_alias(name, source_id)
            }
        };

        self.access.texture_writes.insert(id);
        textures.get_mut(id).write_passes.insert(pass_index);
        id
    }

    /// 写入颜色 attachment，规则同 [`Self::write_texture`]
    pub fn write_render_target(
        &mut self,
        name: &str,
        clear_value: GfxClearValue,
        load_op: vk::AttachmentLoadOp,
        store_op: vk::AttachmentStoreOp,
        source: Option<&str>,
    ) -> RgTextureId {
        let texture = self.write_texture(name, source);
        self.render_targets.push(RgRenderTargetInfo {
            texture,
            clear_value,
            load_op,
            store_op,
        });
        texture
    }

    /// 写入深度模板 attachment，每个 pass 最多一个
    ///
    /// # Panics
    /// pass 已经设置过深度模板 attachment
    #[allow(clippy::too_many_arguments)]
    pub fn write_depth_stencil(
        &mut self,
        name: &str,
        clear_value: GfxClearValue,
        depth_load_op: vk::AttachmentLoadOp,
        depth_store_op: vk::AttachmentStoreOp,
        stencil_load_op: vk::AttachmentLoadOp,
        stencil_store_op: vk::AttachmentStoreOp,
        source: Option<&str>,
    ) -> RgTextureId {
        assert!(
            self.depth_stencil.is_none(),
            "RenderGraph: pass \"{}\" already has a depth-stencil target",
            self.pass_name
        );

        let texture = self.write_texture(name, source);
        self.depth_stencil = Some(RgDepthStencilInfo {
            texture,
            clear_value,
            depth_load_op,
            depth_store_op,
            stencil_load_op,
            stencil_store_op,
        });
        texture
    }
}

// buffer
impl RgBuilder<'_> {
    /// 声明一个新缓冲区，在本 pass 执行前由资源池分配
    ///
    /// # Panics
    /// 名字已经被声明过
    pub fn declare_buffer(&mut self, name: &str, desc: RgBufferDesc) -> RgBufferId {
        let id = self.resources.buffers.declare(name, desc);
        self.access.buffer_creates.insert(id);
        id
    }

    /// 声明读取缓冲区
    ///
    /// # Panics
    /// `state` 为空，或名字未声明
    pub fn read_buffer(&mut self, name: &str, state: RgResourceState) -> RgBufferId {
        assert!(
            !state.is_empty(),
            "RenderGraph: pass \"{}\" reads buffer \"{}\" with empty resource state",
            self.pass_name,
            name
        );

        let id = self.resources.buffers.lookup(name, &self.pass_name);
        self.access.buffer_reads.insert(id);
        self.resources.buffers.get_mut(id).read_passes.insert(self.pass_index);
        *self.access.buffer_states.entry(id).or_default() |= state;
        id
    }

    /// 声明写入缓冲区，规则同 [`Self::write_texture`]
    pub fn write_buffer(&mut self, name: &str, source: Option<&str>) -> RgBufferId {
        let pass_index = self.pass_index;
        let buffers = &mut self.resources.buffers;

        let id = match source {
            None => buffers.lookup(name, &self.pass_name),
            Some(source) => {
                let source_id = buffers.lookup(source, &self.pass_name);
                self.access.buffer_reads.insert(source_id);
                buffers.get_mut(source_id).read_passes.insert(pass_index);

                buffers.declare_alias(name, source_id)
            }
        };

        self.access.buffer_writes.insert(id);
        buffers.get_mut(id).write_passes.insert(pass_index);
        id
    }
}

// render state
impl RgBuilder<'_> {
    /// 设置 viewport 和 scissor，偏移为 0
    pub fn set_viewport_scissor(&mut self, width: u32, height: u32) {
        self.set_viewport_scissor_with_offset(width, height, 0, 0);
    }

    /// # Panics
    /// 非 graphics pass
    pub fn set_viewport_scissor_with_offset(&mut self, width: u32, height: u32, offset_x: i32, offset_y: i32) {
        assert_eq!(
            self.pass_type,
            RgPassType::Graphics,
            "RenderGraph: viewport can only be set on graphics passes, \"{}\" is a {} pass",
            self.pass_name,
            self.pass_type
        );

        self.viewport = Some(RgViewport {
            width,
            height,
            offset_x,
            offset_y,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color_desc() -> RgTextureDesc {
        RgTextureDesc::new_2d(800, 600, vk::Format::R16G16B16A16_SFLOAT, vk::ImageUsageFlags::COLOR_ATTACHMENT)
    }

    #[test]
    fn test_read_merges_states() {
        let mut registry = RgResourceRegistry::new();
        {
            let mut builder = RgBuilder::new(0, "Producer", RgPassType::Compute, &mut registry);
            builder.declare_buffer("Instances", RgBufferDesc::new(1024, vk::BufferUsageFlags::STORAGE_BUFFER));
            builder.write_buffer("Instances", None);
        }

        let mut builder = RgBuilder::new(1, "Consumer", RgPassType::Graphics, &mut registry);
        let id = builder.read_buffer("Instances", RgResourceState::VERTEX_BUFFER);
        builder.read_buffer("Instances", RgResourceState::STORAGE);

        assert_eq!(builder.access.buffer_state(id), RgResourceState::VERTEX_BUFFER | RgResourceState::STORAGE);
        assert_eq!(builder.access.buffer_reads.len(), 1);
        drop(builder);

        let buffer = registry.buffers.get(id);
        assert!(buffer.read_passes.contains(&1));
        assert!(buffer.write_passes.contains(&0));
    }

    #[test]
    fn test_alias_write_reads_source() {
        let mut registry = RgResourceRegistry::new();
        {
            let mut builder = RgBuilder::new(0, "A", RgPassType::Graphics, &mut registry);
            builder.declare_texture("RT0", color_desc());
            builder.write_render_target(
                "RT0",
                GfxClearValue::BLACK,
                vk::AttachmentLoadOp::CLEAR,
                vk::AttachmentStoreOp::STORE,
                None,
            );
        }

        let mut builder = RgBuilder::new(1, "B", RgPassType::Graphics, &mut registry);
        let rt1 = builder.write_render_target(
            "RT1",
            GfxClearValue::BLACK,
            vk::AttachmentLoadOp::LOAD,
            vk::AttachmentStoreOp::STORE,
            Some("RT0"),
        );
        let rt0 = registry_find(&builder, "RT0");

        assert!(builder.access.texture_reads.contains(&rt0));
        assert!(builder.access.texture_writes.contains(&rt1));
        assert!(!builder.access.texture_creates.contains(&rt1));
        assert_eq!(builder.render_targets.len(), 1);
        drop(builder);

        assert_eq!(registry.textures.get(rt1).alias_of, Some(rt0));
        assert!(registry.textures.get(rt0).read_passes.contains(&1));
        assert!(registry.textures.get(rt1).write_passes.contains(&1));
    }

    fn registry_find(builder: &RgBuilder<'_>, name: &str) -> RgTextureId {
        builder.resources.textures.find(name).unwrap()
    }

    #[test]
    #[should_panic(expected = "empty resource state")]
    fn test_read_with_empty_state_panics() {
        let mut registry = RgResourceRegistry::new();
        let mut builder = RgBuilder::new(0, "A", RgPassType::Compute, &mut registry);
        builder.declare_texture("T", color_desc());
        builder.read_texture("T", RgResourceState::empty());
    }

    #[test]
    #[should_panic(expected = "texture \"Y\" which isn't declared")]
    fn test_read_undeclared_panics() {
        let mut registry = RgResourceRegistry::new();
        let mut builder = RgBuilder::new(0, "A", RgPassType::Graphics, &mut registry);
        builder.read_texture("Y", RgResourceState::SHADER_RESOURCE);
    }

    #[test]
    #[should_panic(expected = "isn't declared")]
    fn test_alias_of_undeclared_source_panics() {
        let mut registry = RgResourceRegistry::new();
        let mut builder = RgBuilder::new(0, "A", RgPassType::Compute, &mut registry);
        builder.write_buffer("Next", Some("Missing"));
    }

    #[test]
    #[should_panic(expected = "viewport can only be set on graphics passes")]
    fn test_viewport_on_compute_panics() {
        let mut registry = RgResourceRegistry::new();
        let mut builder = RgBuilder::new(0, "Cull", RgPassType::Compute, &mut registry);
        builder.set_viewport_scissor(1920, 1080);
    }

    #[test]
    #[should_panic(expected = "already has a depth-stencil target")]
    fn test_second_depth_stencil_panics() {
        let mut registry = RgResourceRegistry::new();
        let mut builder = RgBuilder::new(0, "Depth", RgPassType::Graphics, &mut registry);
        let desc =
            RgTextureDesc::new_2d(64, 64, vk::Format::D32_SFLOAT, vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT);
        builder.declare_texture("D0", desc);
        builder.declare_texture("D1", desc);
        for name in ["D0", "D1"] {
            builder.write_depth_stencil(
                name,
                GfxClearValue::DEPTH_FAR,
                vk::AttachmentLoadOp::CLEAR,
                vk::AttachmentStoreOp::STORE,
                vk::AttachmentLoadOp::DONT_CARE,
                vk::AttachmentStoreOp::DONT_CARE,
                None,
            );
        }
    }
}
