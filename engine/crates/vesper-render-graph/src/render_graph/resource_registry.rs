//! 资源注册表
//!
//! 按类型分别保存 graph 资源节点，并维护名字到 ID 的映射。
//! 别名是一个新的节点，`alias_of` 指向源节点，所以别名的下标总是大于源节点。

use std::collections::HashMap;

use vesper_gfx::handles::{GfxBufferHandle, GfxTextureHandle};

use crate::render_graph::resource::{RgBufferDesc, RgResource, RgTextureDesc};
use crate::render_graph::resource_handle::{RgBufferId, RgResourceId, RgTextureId};

/// 同一种资源的节点表
pub struct RgResourceTable<Id, Desc, Handle> {
    resources: Vec<RgResource<Id, Desc, Handle>>,
    names: HashMap<String, Id>,
}

pub type RgTextureTable = RgResourceTable<RgTextureId, RgTextureDesc, GfxTextureHandle>;
pub type RgBufferTable = RgResourceTable<RgBufferId, RgBufferDesc, GfxBufferHandle>;

impl<Id, Desc, Handle> Default for RgResourceTable<Id, Desc, Handle> {
    fn default() -> Self {
        Self {
            resources: Vec::new(),
            names: HashMap::new(),
        }
    }
}

// register
impl<Id: RgResourceId, Desc: Copy, Handle: Copy + PartialEq> RgResourceTable<Id, Desc, Handle> {
    /// 注册一个新名字
    ///
    /// # Panics
    /// 名字已经被声明过
    pub fn declare(&mut self, name: &str, desc: Desc) -> Id {
        assert!(
            !self.names.contains_key(name),
            "RenderGraph: {} \"{}\" is already declared",
            Id::KIND,
            name
        );

        let id = Id::from_index(self.resources.len());
        self.resources.push(RgResource::new(id, name, desc));
        self.names.insert(name.to_string(), id);
        id
    }

    /// 以 `source` 为源注册一个别名节点，沿用源节点的描述
    ///
    /// # Panics
    /// 别名的名字已经被声明过
    pub fn declare_alias(&mut self, name: &str, source: Id) -> Id {
        assert!(
            !self.names.contains_key(name),
            "RenderGraph: alias {} \"{}\" is already declared",
            Id::KIND,
            name
        );

        let id = Id::from_index(self.resources.len());
        let desc = self.resources[source.index()].desc;
        self.resources.push(RgResource::new_alias(id, name, desc, source));
        self.names.insert(name.to_string(), id);
        id
    }

    /// 为资源设置物理句柄，并同步给所有以它为源的别名
    pub fn assign_handle(&mut self, id: Id, handle: Handle) {
        self.resources[id.index()].handle = Some(handle);

        for index in id.index() + 1..self.resources.len() {
            let Some(source) = self.resources[index].alias_of else {
                continue;
            };
            if self.resources[index].handle.is_none() && self.resources[source.index()].handle == Some(handle) {
                self.resources[index].handle = Some(handle);
            }
        }
    }
}

// getters
impl<Id: RgResourceId, Desc, Handle: Copy> RgResourceTable<Id, Desc, Handle> {
    #[inline]
    pub fn find(&self, name: &str) -> Option<Id> {
        self.names.get(name).copied()
    }

    /// 按名字查找资源
    ///
    /// # Panics
    /// 名字未声明
    pub fn lookup(&self, name: &str, pass_name: &str) -> Id {
        self.find(name).unwrap_or_else(|| {
            panic!("RenderGraph: pass \"{}\" uses {} \"{}\" which isn't declared", pass_name, Id::KIND, name)
        })
    }

    #[inline]
    pub fn get(&self, id: Id) -> &RgResource<Id, Desc, Handle> {
        &self.resources[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: Id) -> &mut RgResource<Id, Desc, Handle> {
        &mut self.resources[id.index()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &RgResource<Id, Desc, Handle>> {
        self.resources.iter()
    }

    #[inline]
    pub fn name(&self, id: Id) -> &str {
        &self.resources[id.index()].name
    }

    /// 资源自身以及它的所有源节点，从近到远
    pub fn alias_chain(&self, id: Id) -> impl Iterator<Item = Id> + '_ {
        std::iter::successors(Some(id), move |current| self.resources[current.index()].alias_of)
    }

    /// 沿着别名链解析物理句柄
    pub fn resolve_handle(&self, id: Id) -> Option<Handle> {
        self.alias_chain(id).find_map(|current| self.resources[current.index()].handle)
    }

    /// 别名链最末端的源节点
    pub fn root(&self, id: Id) -> Id {
        self.alias_chain(id).last().unwrap_or(id)
    }
}

/// 一次 graph 构建中所有声明的资源
#[derive(Default)]
pub struct RgResourceRegistry {
    pub textures: RgTextureTable,
    pub buffers: RgBufferTable,
}

impl RgResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use ash::vk;
    use vesper_gfx::device::GfxDevice;
    use vesper_gfx::headless::HeadlessDevice;

    use super::*;

    fn color_desc() -> RgTextureDesc {
        RgTextureDesc::new_2d(64, 64, vk::Format::R8G8B8A8_UNORM, vk::ImageUsageFlags::COLOR_ATTACHMENT)
    }

    #[test]
    fn test_alias_chain_and_root() {
        let mut table = RgTextureTable::default();
        let a = table.declare("A", color_desc());
        let b = table.declare_alias("B", a);
        let c = table.declare_alias("C", b);

        assert_eq!(table.alias_chain(c).collect::<Vec<_>>(), vec![c, b, a]);
        assert_eq!(table.root(c), a);
        assert_eq!(table.root(a), a);
        assert_eq!(table.get(c).desc, table.get(a).desc);
    }

    #[test]
    fn test_assign_handle_propagates_to_aliases() {
        let mut device = HeadlessDevice::new();
        let mut table = RgTextureTable::default();
        let a = table.declare("A", color_desc());
        let other = table.declare("Other", color_desc());
        let b = table.declare_alias("B", a);
        let c = table.declare_alias("C", b);

        let handle = device.create_texture(&color_desc().spec, "A");
        table.assign_handle(a, handle);

        assert_eq!(table.get(b).handle, Some(handle));
        assert_eq!(table.get(c).handle, Some(handle));
        assert_eq!(table.get(other).handle, None);
        assert_eq!(table.resolve_handle(c), Some(handle));
    }

    #[test]
    #[should_panic(expected = "texture \"A\" is already declared")]
    fn test_duplicate_declare_panics() {
        let mut table = RgTextureTable::default();
        table.declare("A", color_desc());
        table.declare("A", color_desc());
    }

    #[test]
    #[should_panic(expected = "isn't declared")]
    fn test_lookup_undeclared_panics() {
        let table = RgTextureTable::default();
        table.lookup("Y", "PassA");
    }
}
