use ash::vk;

/// 纹理创建参数
///
/// 描述创建一个 `vk::Image`（以及它的默认 view 和采样方式）所需的信息。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GfxTextureSpec {
    pub width: u32,
    pub height: u32,
    /// 3D 纹理的深度，2D 纹理为 1
    pub depth: u32,
    pub mip_levels: u32,
    pub array_layers: u32,
    pub format: vk::Format,
    pub usage: vk::ImageUsageFlags,
    /// 默认 sampler 的寻址方式
    pub wrap: vk::SamplerAddressMode,
    /// 默认 sampler 的过滤方式
    pub filter: vk::Filter,
}

impl Default for GfxTextureSpec {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            depth: 1,
            mip_levels: 1,
            array_layers: 1,
            format: vk::Format::R8G8B8A8_UNORM,
            usage: vk::ImageUsageFlags::SAMPLED | vk::ImageUsageFlags::STORAGE,
            wrap: vk::SamplerAddressMode::CLAMP_TO_EDGE,
            filter: vk::Filter::LINEAR,
        }
    }
}

// new & init & builder
impl GfxTextureSpec {
    /// 创建 2D 纹理描述
    #[inline]
    pub fn new_2d(width: u32, height: u32, format: vk::Format, usage: vk::ImageUsageFlags) -> Self {
        Self {
            width,
            height,
            format,
            usage,
            ..Default::default()
        }
    }

    #[inline]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[inline]
    pub fn with_mip_levels(mut self, mip_levels: u32) -> Self {
        self.mip_levels = mip_levels;
        self
    }

    #[inline]
    pub fn with_array_layers(mut self, array_layers: u32) -> Self {
        self.array_layers = array_layers;
        self
    }

    #[inline]
    pub fn with_sampler(mut self, wrap: vk::SamplerAddressMode, filter: vk::Filter) -> Self {
        self.wrap = wrap;
        self.filter = filter;
        self
    }
}

// getters
impl GfxTextureSpec {
    #[inline]
    pub fn extent(&self) -> vk::Extent3D {
        vk::Extent3D {
            width: self.width,
            height: self.height,
            depth: self.depth,
        }
    }

    /// 两个纹理是否可以复用同一个物理资源
    ///
    /// 尺寸不参与比较：尺寸不同的纹理可以原地 resize 后复用。mip 数量不同则必须重新创建。
    #[inline]
    pub fn is_compatible_with(&self, other: &Self) -> bool {
        self.format == other.format
            && self.usage == other.usage
            && self.wrap == other.wrap
            && self.filter == other.filter
            && self.array_layers == other.array_layers
            && self.mip_levels == other.mip_levels
    }

    #[inline]
    pub fn same_size(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.depth == other.depth
    }
}
