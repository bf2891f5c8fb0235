use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use vesper_render_graph::render_graph::{RenderGraphSettings, RgPoolSettings};

/// 演示程序的配置，对应工作区根目录下的 `vesper.toml`
///
/// 所有字段都有默认值，配置文件中只需要写要覆盖的部分。
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 运行多少帧
    pub frames: u32,
    pub width: u32,
    pub height: u32,
    pub bloom_enabled: bool,
    /// GPU culling 的最大 draw 数量，决定 indirect buffer 的大小
    pub max_draws: u32,

    pub render_graph: RenderGraphSettings,
    pub pool: RgPoolSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            frames: 4,
            width: 1280,
            height: 720,
            bloom_enabled: true,
            max_draws: 4096,
            render_graph: RenderGraphSettings::default(),
            pool: RgPoolSettings::default(),
        }
    }
}

impl AppConfig {
    pub const FILE_NAME: &'static str = "vesper.toml";

    /// 从 TOML 文件加载配置，文件不存在时使用默认值
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("config {:?} not found, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).with_context(|| format!("failed to read config {:?}", path))?;
        Self::from_toml(&content).with_context(|| format!("failed to parse config {:?}", path))
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config() {
        let config = AppConfig::from_toml(
            r#"
            frames = 10
            bloom_enabled = false

            [render_graph]
            dump_graphviz = true

            [pool]
            frames_in_flight = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.frames, 10);
        assert!(!config.bloom_enabled);
        assert_eq!(config.width, 1280);
        assert!(config.render_graph.dump_graphviz);
        assert!(config.render_graph.graphviz_path.is_none());
        assert_eq!(config.pool.frames_in_flight, 2);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::from_file("/nonexistent/vesper.toml").unwrap();
        assert_eq!(config.frames, AppConfig::default().frames);
        assert_eq!(config.pool.frames_in_flight, RgPoolSettings::DEFAULT_FRAMES_IN_FLIGHT);
    }

    #[test]
    fn test_invalid_field_type() {
        assert!(AppConfig::from_toml("frames = \"many\"").is_err());
    }
}
