//! 依赖图构建和拓扑排序
//!
//! 分析 Pass 之间的资源依赖关系，构建邻接表，并用显式栈的 DFS 做拓扑排序。
//! 调试输出借助 petgraph 生成 Graphviz dot 文本。

use petgraph::dot::{Config, Dot};
use petgraph::graph::DiGraph;

use crate::render_graph::pass::RgPassAccess;

/// 拓扑排序时节点的访问状态
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    InProgress,
    Done,
}

/// 依赖图
///
/// `adjacency[p]` 中保存所有读取了 p 写入资源的 pass（p 必须先执行）。
/// 每对 pass 最多一条边：纹理依赖成立时不再检查缓冲区。
#[derive(Clone, Debug, Default)]
pub struct RgDependencyGraph {
    adjacency: Vec<Vec<usize>>,
}

// new & init
impl RgDependencyGraph {
    /// 分析资源依赖，构建依赖图
    ///
    /// 对任意两个不同的 pass (P, Q)，Q 读取了 P 写入的纹理或缓冲区时，Q 加入 P 的邻接表。
    pub fn analyze(accesses: &[&RgPassAccess]) -> Self {
        let pass_count = accesses.len();
        let mut adjacency = vec![Vec::new(); pass_count];

        for (producer, producer_access) in accesses.iter().enumerate() {
            for (consumer, consumer_access) in accesses.iter().enumerate() {
                if producer == consumer {
                    continue;
                }

                let depends = !producer_access.texture_writes.is_disjoint(&consumer_access.texture_reads)
                    || !producer_access.buffer_writes.is_disjoint(&consumer_access.buffer_reads);
                if depends {
                    adjacency[producer].push(consumer);
                }
            }
        }

        Self { adjacency }
    }

    pub fn from_adjacency(adjacency: Vec<Vec<usize>>) -> Self {
        Self { adjacency }
    }
}

// getters
impl RgDependencyGraph {
    #[inline]
    pub fn pass_count(&self) -> usize {
        self.adjacency.len()
    }

    #[inline]
    pub fn adjacency(&self) -> &[Vec<usize>] {
        &self.adjacency
    }

    /// Pass 的直接后继
    #[inline]
    pub fn successors(&self, pass_index: usize) -> &[usize] {
        &self.adjacency[pass_index]
    }

    /// Pass 的直接依赖（前驱）
    pub fn predecessors(&self, pass_index: usize) -> Vec<usize> {
        (0..self.adjacency.len()).filter(|&p| self.adjacency[p].contains(&pass_index)).collect()
    }
}

// tools
impl RgDependencyGraph {
    /// 执行拓扑排序
    ///
    /// 按下标顺序对每个未访问节点做 DFS，邻居按邻接表顺序访问；
    /// 后序收集完成的节点，最后整体反转。
    ///
    /// # 返回
    /// - `Ok(order)`: 拓扑排序后的 Pass 索引列表
    /// - `Err(cycle)`: 检测到循环依赖，返回环上的 Pass 索引（按遍历顺序）
    pub fn topological_sort(&self) -> Result<Vec<usize>, Vec<usize>> {
        let pass_count = self.adjacency.len();
        let mut states = vec![VisitState::Unvisited; pass_count];
        let mut post_order = Vec::with_capacity(pass_count);
        // (节点, 下一个要访问的邻居下标)
        let mut stack: Vec<(usize, usize)> = Vec::new();

        for root in 0..pass_count {
            if states[root] != VisitState::Unvisited {
                continue;
            }

            states[root] = VisitState::InProgress;
            stack.push((root, 0));

            while let Some((node, cursor)) = stack.last_mut() {
                let node = *node;
                let Some(&next) = self.adjacency[node].get(*cursor) else {
                    states[node] = VisitState::Done;
                    post_order.push(node);
                    stack.pop();
                    continue;
                };
                *cursor += 1;

                match states[next] {
                    VisitState::Unvisited => {
                        states[next] = VisitState::InProgress;
                        stack.push((next, 0));
                    }
                    VisitState::InProgress => {
                        let start = stack.iter().position(|&(n, _)| n == next).unwrap_or(0);
                        return Err(stack[start..].iter().map(|&(n, _)| n).collect());
                    }
                    VisitState::Done => {}
                }
            }
        }

        post_order.reverse();
        Ok(post_order)
    }

    /// 生成 Graphviz dot 文本，节点标签为 pass 名字
    pub fn to_graphviz(&self, pass_names: &[&str]) -> String {
        let mut graph: DiGraph<&str, &str> = DiGraph::with_capacity(self.adjacency.len(), self.adjacency.len() * 2);
        let nodes: Vec<_> = pass_names.iter().map(|name| graph.add_node(*name)).collect();

        for (producer, consumers) in self.adjacency.iter().enumerate() {
            for &consumer in consumers {
                graph.add_edge(nodes[producer], nodes[consumer], "");
            }
        }

        format!("{}", Dot::with_config(&graph, &[Config::EdgeNoLabel]))
    }
}

#[cfg(test)]
mod tests {
    use crate::render_graph::resource_handle::{RgBufferId, RgResourceId, RgTextureId};

    use super::*;

    fn texture(index: usize) -> RgTextureId {
        RgTextureId::from_index(index)
    }

    fn access(reads: &[usize], writes: &[usize]) -> RgPassAccess {
        RgPassAccess {
            texture_reads: reads.iter().map(|&i| texture(i)).collect(),
            texture_writes: writes.iter().map(|&i| texture(i)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_simple_dependency() {
        // Pass 0 写入 texture 0，Pass 1 读取 texture 0
        let passes = [access(&[], &[0]), access(&[0], &[])];
        let graph = RgDependencyGraph::analyze(&passes.iter().collect::<Vec<_>>());

        assert_eq!(graph.adjacency(), &[vec![1], vec![]]);
        assert_eq!(graph.topological_sort().unwrap(), vec![0, 1]);
        assert_eq!(graph.predecessors(1), vec![0]);
    }

    #[test]
    fn test_chain_dependency() {
        // Pass 0 -> Pass 1 -> Pass 2，注册顺序打乱
        let passes = [access(&[1], &[]), access(&[0], &[1]), access(&[], &[0])];
        let graph = RgDependencyGraph::analyze(&passes.iter().collect::<Vec<_>>());

        assert_eq!(graph.topological_sort().unwrap(), vec![2, 1, 0]);
    }

    #[test]
    fn test_single_edge_per_pair() {
        let mut producer = access(&[], &[0, 1]);
        producer.buffer_writes.insert(RgBufferId::from_index(0));
        let mut consumer = access(&[0, 1], &[]);
        consumer.buffer_reads.insert(RgBufferId::from_index(0));

        let graph = RgDependencyGraph::analyze(&[&producer, &consumer]);
        assert_eq!(graph.successors(0), &[1]);
    }

    #[test]
    fn test_buffer_only_dependency() {
        let mut producer = RgPassAccess::default();
        producer.buffer_writes.insert(RgBufferId::from_index(3));
        let mut consumer = RgPassAccess::default();
        consumer.buffer_reads.insert(RgBufferId::from_index(3));

        let graph = RgDependencyGraph::analyze(&[&consumer, &producer]);
        assert_eq!(graph.adjacency(), &[vec![], vec![0]]);
        assert_eq!(graph.topological_sort().unwrap(), vec![1, 0]);
    }

    #[test]
    fn test_parallel_passes() {
        // Pass 0、1 互不依赖，Pass 2 读取两者的输出
        let passes = [access(&[], &[0]), access(&[], &[1]), access(&[0, 1], &[])];
        let graph = RgDependencyGraph::analyze(&passes.iter().collect::<Vec<_>>());

        let order = graph.topological_sort().unwrap();
        assert_eq!(order.len(), 3);
        assert_eq!(order[2], 2);
    }

    #[test]
    fn test_independent_passes_are_deterministic() {
        let graph = RgDependencyGraph::from_adjacency(vec![vec![], vec![], vec![]]);
        let first = graph.topological_sort().unwrap();
        assert_eq!(first, vec![2, 1, 0]);
        assert_eq!(graph.topological_sort().unwrap(), first);
    }

    #[test]
    fn test_cycle_detected() {
        // 0 -> 1 -> 2 -> 1
        let graph = RgDependencyGraph::from_adjacency(vec![vec![1], vec![2], vec![1]]);
        assert_eq!(graph.topological_sort(), Err(vec![1, 2]));
    }

    #[test]
    fn test_self_feedback_through_two_passes() {
        let passes = [access(&[1], &[0]), access(&[0], &[1])];
        let graph = RgDependencyGraph::analyze(&passes.iter().collect::<Vec<_>>());
        assert_eq!(graph.topological_sort(), Err(vec![0, 1]));
    }

    #[test]
    fn test_deep_chain_does_not_recurse() {
        let count = 10_000;
        let adjacency = (0..count).map(|i| if i + 1 < count { vec![i + 1] } else { vec![] }).collect();
        let graph = RgDependencyGraph::from_adjacency(adjacency);
        let order = graph.topological_sort().unwrap();
        assert_eq!(order, (0..count).collect::<Vec<_>>());
    }

    #[test]
    fn test_graphviz_output() {
        let graph = RgDependencyGraph::from_adjacency(vec![vec![1], vec![]]);
        let dot = graph.to_graphviz(&["DepthPrepass", "Lighting"]);

        assert!(dot.starts_with("digraph {"));
        assert!(dot.contains("label = \"DepthPrepass\""));
        assert!(dot.contains("0 -> 1"));
    }
}
