//! Bloom 后处理 Pass
//!
//! 半分辨率的两张纹理来回模糊：
//! - BloomExtract: HDR -> BloomA
//! - BloomBlurH: BloomA -> BloomB
//! - BloomBlurV: BloomB -> BloomABlurred（BloomA 的别名）
//! - BloomComposite: BloomABlurred + HDR -> HDRBloom（HDR 的别名）

use ash::vk;
use vesper_gfx::commands::command_buffer::GfxCommandBuffer;
use vesper_render_graph::render_graph::{RgBuilder, RgPass, RgPassContext, RgResourceState, RgTextureDesc, RgTextureId};

use crate::deferred::{HDR, HDR_BLOOM, HDR_FORMAT, record_command};

const BLOOM_A: &str = "BloomA";
const BLOOM_B: &str = "BloomB";
const BLOOM_A_BLURRED: &str = "BloomABlurred";

/// bloom 中的一个 compute 步骤
pub struct BloomPass {
    input: &'static str,
    output: &'static str,
    /// 输出作为 `output_source` 的别名写入
    output_source: Option<&'static str>,
    /// 输出是新声明的纹理
    output_desc: Option<RgTextureDesc>,
    groups: [u32; 3],

    textures: Option<(RgTextureId, RgTextureId)>,
}

impl BloomPass {
    fn new(input: &'static str, output: &'static str, width: u32, height: u32) -> Self {
        Self {
            input,
            output,
            output_source: None,
            output_desc: None,
            groups: [width.div_ceil(8), height.div_ceil(8), 1],
            textures: None,
        }
    }

    fn declare(mut self, desc: RgTextureDesc) -> Self {
        self.output_desc = Some(desc);
        self
    }

    fn alias_of(mut self, source: &'static str) -> Self {
        self.output_source = Some(source);
        self
    }

    /// 按执行顺序排列的 bloom 步骤
    pub fn chain(width: u32, height: u32) -> [(&'static str, BloomPass); 4] {
        let (half_width, half_height) = (width.div_ceil(2), height.div_ceil(2));
        let half_desc = RgTextureDesc::new_2d(
            half_width,
            half_height,
            HDR_FORMAT,
            vk::ImageUsageFlags::STORAGE | vk::ImageUsageFlags::SAMPLED,
        );

        [
            ("BloomExtract", Self::new(HDR, BLOOM_A, half_width, half_height).declare(half_desc)),
            ("BloomBlurH", Self::new(BLOOM_A, BLOOM_B, half_width, half_height).declare(half_desc)),
            ("BloomBlurV", Self::new(BLOOM_B, BLOOM_A_BLURRED, half_width, half_height).alias_of(BLOOM_A)),
            ("BloomComposite", Self::new(BLOOM_A_BLURRED, HDR_BLOOM, width, height).alias_of(HDR)),
        ]
    }
}

impl RgPass for BloomPass {
    fn setup(&mut self, builder: &mut RgBuilder<'_>) {
        let input = builder.read_texture(self.input, RgResourceState::SHADER_RESOURCE);
        if let Some(desc) = self.output_desc {
            builder.declare_texture(self.output, desc);
        }
        let output = builder.write_texture(self.output, self.output_source);
        self.textures = Some((input, output));
    }

    fn execute(&self, ctx: &RgPassContext<'_>, cmd: &mut dyn GfxCommandBuffer) {
        let Some((input, output)) = self.textures else {
            return;
        };

        log::trace!(
            "{}: dispatch {:?}, {:?} -> {:?}",
            ctx.pass_name(),
            self.groups,
            ctx.vk_image_view(input),
            ctx.vk_image_view(output)
        );
        record_command(cmd, "dispatch_bloom");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_reuses_ping_pong_textures() {
        let chain = BloomPass::chain(100, 50);

        assert_eq!(chain[0].1.output, chain[1].1.input);
        assert_eq!(chain[2].1.output_source, Some(BLOOM_A));
        assert!(chain[2].1.output_desc.is_none());
        assert_eq!(chain[3].1.output, HDR_BLOOM);
        assert_eq!(chain[0].1.groups, [7, 4, 1]);
    }
}
