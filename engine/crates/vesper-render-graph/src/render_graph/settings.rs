use std::path::PathBuf;

use serde::Deserialize;
use vesper_crate_tools::resource::VesperPath;

/// render graph 构建阶段的调试选项
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RenderGraphSettings {
    /// build 时把依赖图写成 Graphviz dot 文件
    pub dump_graphviz: bool,
    /// dot 文件路径，为空时写到 assets 目录下的 `render_graph.dot`
    pub graphviz_path: Option<PathBuf>,
}

impl RenderGraphSettings {
    /// 实际写入的 dot 文件路径
    pub fn graphviz_output_path(&self) -> PathBuf {
        self.graphviz_path.clone().unwrap_or_else(|| VesperPath::assets_path("render_graph.dot"))
    }
}

/// 资源池配置
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct RgPoolSettings {
    /// 同时在 GPU 上执行的帧数，per-frame 资源会为每一帧单独分配
    pub frames_in_flight: usize,
}

impl RgPoolSettings {
    pub const DEFAULT_FRAMES_IN_FLIGHT: usize = 3;
}

impl Default for RgPoolSettings {
    fn default() -> Self {
        Self {
            frames_in_flight: Self::DEFAULT_FRAMES_IN_FLIGHT,
        }
    }
}
