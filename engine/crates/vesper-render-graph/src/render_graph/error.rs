use std::path::PathBuf;

/// render graph 构建阶段可上报的错误
///
/// pass 编写错误（重名、未声明的名字等）不在这里，它们直接 panic。
#[derive(Debug, thiserror::Error)]
pub enum RgError {
    /// pass 之间存在环，无法排序
    #[error("render graph contains a cycle through passes: {}", .passes.join(" -> "))]
    Cycle { passes: Vec<String> },

    #[error("failed to write render graph dump to {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
