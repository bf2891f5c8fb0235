pub struct LabelColor;
impl LabelColor {
    const _RED: glam::Vec4 = glam::vec4(1.0, 0.0, 0.0, 1.0);
    const GREEN: glam::Vec4 = glam::vec4(0.0, 1.0, 0.0, 1.0);
    const BLUE: glam::Vec4 = glam::vec4(0.0, 0.0, 1.0, 1.0);
    const YELLOW: glam::Vec4 = glam::vec4(1.0, 1.0, 0.0, 1.0);

    pub const COLOR_PASS: glam::Vec4 = Self::BLUE;
    pub const COLOR_STAGE: glam::Vec4 = Self::YELLOW;
    pub const COLOR_CMD: glam::Vec4 = Self::GREEN;

    /// 根据名字生成稳定的 label 颜色
    ///
    /// 对名字做 FNV-1a hash，取低 24 位作为 RGB。同一个 pass 在每一帧、每次运行中颜色都相同，
    /// 方便在 RenderDoc / Nsight 中辨认。
    pub fn from_name(name: &str) -> glam::Vec4 {
        const FNV_OFFSET: u32 = 0x811c_9dc5;
        const FNV_PRIME: u32 = 0x0100_0193;

        let hash = name.bytes().fold(FNV_OFFSET, |hash, byte| (hash ^ byte as u32).wrapping_mul(FNV_PRIME));

        let r = (hash & 0xff) as f32 / 255.0;
        let g = ((hash >> 8) & 0xff) as f32 / 255.0;
        let b = ((hash >> 16) & 0xff) as f32 / 255.0;
        glam::vec4(r, g, b, 1.0)
    }
}
