use ash::vk;

/// attachment 的 clear 值
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GfxClearValue {
    Color([f32; 4]),
    DepthStencil { depth: f32, stencil: u32 },
}

impl GfxClearValue {
    /// 1 表示无限远
    pub const DEPTH_FAR: Self = Self::DepthStencil { depth: 1.0, stencil: 0 };
    pub const BLACK: Self = Self::Color([0.0, 0.0, 0.0, 1.0]);

    pub fn to_vk(self) -> vk::ClearValue {
        match self {
            Self::Color(float32) => vk::ClearValue {
                color: vk::ClearColorValue { float32 },
            },
            Self::DepthStencil { depth, stencil } => vk::ClearValue {
                depth_stencil: vk::ClearDepthStencilValue { depth, stencil },
            },
        }
    }
}

/// dynamic rendering 的单个 attachment
#[derive(Clone, Copy, Debug)]
pub struct GfxRenderingAttachment {
    pub image: vk::Image,
    pub image_view: vk::ImageView,
    pub image_layout: vk::ImageLayout,
    pub load_op: vk::AttachmentLoadOp,
    pub store_op: vk::AttachmentStoreOp,
    /// 只对 depth-stencil attachment 有意义
    pub stencil_load_op: vk::AttachmentLoadOp,
    pub stencil_store_op: vk::AttachmentStoreOp,
    pub clear_value: GfxClearValue,
}

impl GfxRenderingAttachment {
    fn vk_attachment_info(&self) -> vk::RenderingAttachmentInfo<'static> {
        vk::RenderingAttachmentInfo::default()
            .image_layout(self.image_layout)
            .image_view(self.image_view)
            .load_op(self.load_op)
            .store_op(self.store_op)
            .clear_value(self.clear_value.to_vk())
    }

    fn vk_stencil_attachment_info(&self) -> vk::RenderingAttachmentInfo<'static> {
        vk::RenderingAttachmentInfo::default()
            .image_layout(self.image_layout)
            .image_view(self.image_view)
            .load_op(self.stencil_load_op)
            .store_op(self.stencil_store_op)
            .clear_value(self.clear_value.to_vk())
    }
}

/// `vkCmdBeginRendering` 需要的全部信息
///
/// color attachments 在前，depth-stencil attachment 最多一个。
#[derive(Clone, Debug)]
pub struct GfxRenderingInfo {
    pub render_area: vk::Rect2D,
    pub color_attachments: Vec<GfxRenderingAttachment>,
    pub depth_stencil_attachment: Option<GfxRenderingAttachment>,
    /// depth-stencil attachment 的格式是否带 stencil
    pub has_stencil: bool,
}

impl GfxRenderingInfo {
    pub fn new(render_area: vk::Rect2D) -> Self {
        Self {
            render_area,
            color_attachments: Vec::new(),
            depth_stencil_attachment: None,
            has_stencil: false,
        }
    }

    #[inline]
    pub fn attachment_count(&self) -> usize {
        self.color_attachments.len() + usize::from(self.depth_stencil_attachment.is_some())
    }

    /// 转换为 vk 结构体后交给回调
    ///
    /// `vk::RenderingInfo` 借用 attachment 数组，所以通过回调限制生命周期。
    pub fn with_vk_rendering_info<R>(&self, f: impl FnOnce(&vk::RenderingInfo<'_>) -> R) -> R {
        let color_infos: Vec<_> = self.color_attachments.iter().map(|a| a.vk_attachment_info()).collect();
        let depth_info = self.depth_stencil_attachment.as_ref().map(|a| a.vk_attachment_info());
        let stencil_info =
            self.depth_stencil_attachment.as_ref().filter(|_| self.has_stencil).map(|a| a.vk_stencil_attachment_info());

        let mut info = vk::RenderingInfo::default()
            .layer_count(1)
            .render_area(self.render_area)
            .color_attachments(&color_infos);
        if let Some(depth_info) = &depth_info {
            info = info.depth_attachment(depth_info);
        }
        if let Some(stencil_info) = &stencil_info {
            info = info.stencil_attachment(stencil_info);
        }
        f(&info)
    }
}
