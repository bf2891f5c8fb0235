//! GPU 物理资源句柄
//!
//! 由 [`crate::device::GfxDevice`] 分配，render graph 只持有句柄，不拥有资源本身。

use slotmap::new_key_type;

new_key_type! {
    /// 纹理（vk::Image + 默认 vk::ImageView）句柄
    pub struct GfxTextureHandle;

    /// 缓冲区句柄
    pub struct GfxBufferHandle;
}
