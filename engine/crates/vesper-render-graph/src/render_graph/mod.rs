//! 每帧重建的 render graph
//!
//! ```ignore
//! let mut graph = RenderGraph::new(settings);
//! graph.add_pass::<()>(
//!     "Shade",
//!     RgPassType::Graphics,
//!     |_, builder| {
//!         builder.declare_texture("Color", RgTextureDesc::new_2d(w, h, vk::Format::R8G8B8A8_UNORM, usage));
//!         builder.write_render_target("Color", GfxClearValue::BLACK, load, store, None);
//!         builder.set_viewport_scissor(w, h);
//!     },
//!     |_, ctx, cmd| { /* draw */ },
//! );
//! graph.build();
//! graph.execute(&mut RgFrameResources::new(&mut pool, &mut device, &mut cmd));
//! ```

mod barrier;
mod builder;
mod context;
mod error;
mod executor;
mod graph;
mod pass;
mod resource;
mod resource_handle;
mod resource_pool;
mod resource_registry;
mod resource_state;
mod settings;

// Re-exports
pub use barrier::{
    RgAccessMask, buffer_dst_mask, buffer_src_mask, texture_read_state, texture_src_mask, texture_write_state,
};
pub use builder::RgBuilder;
pub use context::{RgFrameResources, RgPassContext};
pub use error::RgError;
pub use executor::{RenderGraph, RgPassBarrierStats};
pub use graph::RgDependencyGraph;
pub use pass::{
    RgDepthStencilInfo, RgPass, RgPassAccess, RgPassNode, RgPassType, RgRenderTargetInfo, RgViewport,
};
pub use resource::{RgBuffer, RgBufferDesc, RgResource, RgTexture, RgTextureDesc};
pub use resource_handle::{RgBufferId, RgResourceId, RgTextureId};
pub use resource_pool::RgResourcePool;
pub use resource_registry::{RgBufferTable, RgResourceRegistry, RgResourceTable, RgTextureTable};
pub use resource_state::{RgImageState, RgResourceState};
pub use settings::{RenderGraphSettings, RgPoolSettings};
