//! RenderGraph 资源 ID 定义
//!
//! 这些 ID 是 graph 内部的逻辑引用，与 `GfxDevice` 分配的物理句柄分离。
//! ID 就是资源在所属数组中的下标，每帧重建 graph 时从 0 开始分配。

use std::fmt;
use std::hash::Hash;

/// 纹理 ID 和缓冲区 ID 的公共接口
pub trait RgResourceId: Copy + Eq + Ord + Hash + fmt::Debug {
    /// 资源类型名，用于日志和 panic 信息
    const KIND: &'static str;

    fn from_index(index: usize) -> Self;

    fn index(&self) -> usize;
}

/// Graph 内部的纹理 ID
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RgTextureId(u32);

/// Graph 内部的缓冲区 ID
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RgBufferId(u32);

impl RgResourceId for RgTextureId {
    const KIND: &'static str = "texture";

    #[inline]
    fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    #[inline]
    fn index(&self) -> usize {
        self.0 as usize
    }
}

impl RgResourceId for RgBufferId {
    const KIND: &'static str = "buffer";

    #[inline]
    fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    #[inline]
    fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for RgTextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RgTexture({})", self.0)
    }
}

impl fmt::Debug for RgBufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RgBuffer({})", self.0)
    }
}
