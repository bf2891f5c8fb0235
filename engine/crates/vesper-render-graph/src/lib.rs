pub mod render_graph;
