use std::path::{Path, PathBuf};

/// 统一资源路径管理
///
/// 所有路径基于工作区根目录（通过 `CARGO_MANIFEST_DIR` 推导）。
/// 避免使用硬编码相对路径，确保在不同构建环境下路径一致。
///
/// # 使用示例
/// ```ignore
/// let dot = VesperPath::assets_path("render_graph.dot"); // assets/render_graph.dot
/// let config = VesperPath::config_path("vesper.toml");   // vesper.toml
/// ```
pub struct VesperPath {}
// 核心路径
impl VesperPath {
    /// 获取工作区根目录
    pub fn workspace_path() -> PathBuf {
        // 从 vesper-crate-tools 的位置推导 workspace 目录
        match Path::new(env!("CARGO_MANIFEST_DIR")).parent() {
            Some(parent) => parent.to_path_buf(),
            None => PathBuf::from("."),
        }
    }

    pub fn target_path() -> PathBuf {
        Self::workspace_path().join("target")
    }
}
// 根目录下
impl VesperPath {
    pub fn engine_path() -> PathBuf {
        Self::workspace_path().join("engine")
    }

    /// 获取 `assets/` 目录下的文件路径
    pub fn assets_path(filename: &str) -> PathBuf {
        Self::workspace_path().join("assets").join(filename)
    }

    /// 获取工作区根目录下的配置文件路径
    pub fn config_path(filename: &str) -> PathBuf {
        Self::workspace_path().join(filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assets_path_is_under_workspace() {
        let path = VesperPath::assets_path("render_graph.dot");
        assert!(path.starts_with(VesperPath::workspace_path()));
        assert!(path.ends_with("assets/render_graph.dot"));
    }
}
