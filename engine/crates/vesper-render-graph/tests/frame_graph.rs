//! 端到端测试：用 headless device 和记录命令的 command buffer 跑完整的 build + execute

use std::cell::RefCell;

use ash::vk;
use vesper_gfx::commands::command_buffer::GfxCommandBuffer;
use vesper_gfx::commands::rendering_info::GfxClearValue;
use vesper_gfx::device::GfxDevice;
use vesper_gfx::headless::{HeadlessDevice, RecordedCommand, RecordingCommandBuffer};
use vesper_render_graph::render_graph::{
    RenderGraph, RgBufferDesc, RgFrameResources, RgPassType, RgPoolSettings, RgResourcePool, RgResourceState,
    RgTextureDesc,
};

const WIDTH: u32 = 320;
const HEIGHT: u32 = 180;

fn color_desc() -> RgTextureDesc {
    RgTextureDesc::new_2d(
        WIDTH,
        HEIGHT,
        vk::Format::R16G16B16A16_SFLOAT,
        vk::ImageUsageFlags::COLOR_ATTACHMENT | vk::ImageUsageFlags::SAMPLED,
    )
}

fn depth_desc() -> RgTextureDesc {
    RgTextureDesc::new_2d(
        WIDTH,
        HEIGHT,
        vk::Format::D24_UNORM_S8_UINT,
        vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT | vk::ImageUsageFlags::SAMPLED,
    )
}

fn storage_desc(capacity: vk::DeviceSize) -> RgBufferDesc {
    RgBufferDesc::new(capacity, vk::BufferUsageFlags::STORAGE_BUFFER)
}

/// 持有跨帧的对象
struct Frame {
    device: HeadlessDevice,
    pool: RgResourcePool,
    cmd: RecordingCommandBuffer,
}

impl Frame {
    fn new() -> Self {
        Self {
            device: HeadlessDevice::new(),
            pool: RgResourcePool::default(),
            cmd: RecordingCommandBuffer::new(),
        }
    }

    fn run(&mut self, graph: &mut RenderGraph<'_>) {
        self.cmd.take_commands();
        self.pool.tick(&mut self.device);
        graph.build();
        graph.execute(&mut RgFrameResources::new(&mut self.pool, &mut self.device, &mut self.cmd));
    }
}

fn add_color_pass(graph: &mut RenderGraph<'_>, name: &str, target: &str, source: Option<&str>) {
    let target = target.to_string();
    let source = source.map(str::to_string);
    graph.add_pass::<()>(
        name,
        RgPassType::Graphics,
        move |_, builder| {
            if source.is_none() {
                builder.declare_texture(&target, color_desc());
            }
            builder.write_render_target(
                &target,
                GfxClearValue::BLACK,
                vk::AttachmentLoadOp::CLEAR,
                vk::AttachmentStoreOp::STORE,
                source.as_deref(),
            );
            builder.set_viewport_scissor(WIDTH, HEIGHT);
        },
        |_, _, _| {},
    );
}

#[test]
fn compute_written_vertex_buffer_gets_one_barrier() {
    let mut graph = RenderGraph::default();
    graph.add_pass::<()>(
        "Skinning",
        RgPassType::Compute,
        |_, builder| {
            let usage = vk::BufferUsageFlags::STORAGE_BUFFER | vk::BufferUsageFlags::VERTEX_BUFFER;
            builder.declare_buffer("SkinnedVertices", RgBufferDesc::new(4096, usage));
            builder.write_buffer("SkinnedVertices", None);
        },
        |_, _, _| {},
    );
    add_color_pass(&mut graph, "Forward", "SceneColor", None);
    graph.add_pass::<()>(
        "DrawSkinned",
        RgPassType::Graphics,
        |_, builder| {
            builder.read_buffer("SkinnedVertices", RgResourceState::VERTEX_BUFFER);
            builder.write_render_target(
                "SceneColor",
                GfxClearValue::BLACK,
                vk::AttachmentLoadOp::LOAD,
                vk::AttachmentStoreOp::STORE,
                None,
            );
            builder.set_viewport_scissor(WIDTH, HEIGHT);
        },
        |_, _, _| {},
    );

    let mut frame = Frame::new();
    frame.run(&mut graph);

    let draw = frame.cmd.commands_in_label("DrawSkinned");
    let RecordedCommand::Barriers {
        buffer_barriers,
        image_barriers,
    } = &draw[0]
    else {
        panic!("DrawSkinned should start with a barrier batch, got {:?}", draw[0]);
    };
    assert_eq!(buffer_barriers.len(), 1);
    // SceneColor 在 Forward 中已经写过，这里是 write-after-write
    assert_eq!(image_barriers.len(), 1);
    assert_eq!(image_barriers[0].old_layout(), vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL);
    assert_eq!(image_barriers[0].mask().src_access, vk::AccessFlags2::COLOR_ATTACHMENT_WRITE);

    let barrier = &buffer_barriers[0];
    let mask = barrier.mask();
    assert_eq!(mask.src_stage, vk::PipelineStageFlags2::COMPUTE_SHADER);
    assert_eq!(mask.src_access, vk::AccessFlags2::SHADER_READ | vk::AccessFlags2::SHADER_WRITE);
    assert!(mask.dst_stage.contains(vk::PipelineStageFlags2::VERTEX_ATTRIBUTE_INPUT));
    assert!(mask.dst_stage.contains(vk::PipelineStageFlags2::FRAGMENT_SHADER));
    assert!(mask.dst_access.contains(vk::AccessFlags2::VERTEX_ATTRIBUTE_READ));

    let handle = graph.get_buffer(graph.find_buffer("SkinnedVertices").unwrap()).unwrap();
    assert_eq!(barrier.inner().buffer, frame.device.vk_buffer(handle));
    assert_eq!(barrier.inner().offset, 0);
    assert_eq!(barrier.inner().size, vk::WHOLE_SIZE);
}

#[test]
fn zero_capacity_buffers_are_not_synchronized() {
    let mut graph = RenderGraph::default();
    graph.add_pass::<()>(
        "Emit",
        RgPassType::Compute,
        |_, builder| {
            builder.declare_buffer("EmptyLights", storage_desc(0));
            builder.declare_buffer("Counters", storage_desc(64));
            builder.write_buffer("EmptyLights", None);
            builder.write_buffer("Counters", None);
        },
        |_, _, _| {},
    );
    graph.add_pass::<()>(
        "Gather",
        RgPassType::Compute,
        |_, builder| {
            builder.read_buffer("EmptyLights", RgResourceState::STORAGE);
            builder.read_buffer("Counters", RgResourceState::STORAGE);
        },
        |_, _, _| {},
    );

    let mut frame = Frame::new();
    frame.run(&mut graph);

    let batches = frame.cmd.barrier_batches();
    assert_eq!(batches.len(), 1);
    let (buffer_barriers, image_barriers) = batches[0];
    assert_eq!(buffer_barriers.len(), 1);
    assert!(image_barriers.is_empty());

    let counters = graph.get_buffer(graph.find_buffer("Counters").unwrap()).unwrap();
    assert_eq!(buffer_barriers[0].inner().buffer, frame.device.vk_buffer(counters));
    assert_eq!(graph.barrier_stats(1).unwrap().buffer_barriers, 1);

    // 只有空缓冲区时整个 pass 不插入 barrier
    let mut graph = RenderGraph::default();
    graph.add_pass::<()>(
        "Emit",
        RgPassType::Compute,
        |_, builder| {
            builder.declare_buffer("EmptyLights", storage_desc(0));
            builder.write_buffer("EmptyLights", None);
        },
        |_, _, _| {},
    );
    graph.add_pass::<()>(
        "Gather",
        RgPassType::Compute,
        |_, builder| {
            builder.read_buffer("EmptyLights", RgResourceState::STORAGE);
        },
        |_, _, _| {},
    );
    frame.run(&mut graph);

    assert!(frame.cmd.barrier_batches().is_empty());
    assert_eq!(graph.barrier_stats(1).unwrap().buffer_barriers, 0);
    assert!(graph.get_buffer(graph.find_buffer("EmptyLights").unwrap()).is_some());
}

#[test]
fn aliases_share_the_physical_texture() {
    let mut graph = RenderGraph::default();
    add_color_pass(&mut graph, "A", "RT0", None);
    add_color_pass(&mut graph, "B", "RT1", Some("RT0"));
    graph.add_pass::<()>(
        "C",
        RgPassType::Graphics,
        |_, builder| {
            builder.read_texture("RT1", RgResourceState::SHADER_RESOURCE);
            builder.declare_texture("Out", color_desc());
            builder.write_render_target(
                "Out",
                GfxClearValue::BLACK,
                vk::AttachmentLoadOp::DONT_CARE,
                vk::AttachmentStoreOp::STORE,
                None,
            );
            builder.set_viewport_scissor(WIDTH, HEIGHT);
        },
        |_, _, _| {},
    );

    let mut frame = Frame::new();
    frame.run(&mut graph);

    assert_eq!(graph.execution_order_names(), vec!["A", "B", "C"]);

    let rt0 = graph.find_texture("RT0").unwrap();
    let rt1 = graph.find_texture("RT1").unwrap();
    assert_eq!(graph.resources().textures.get(rt1).alias_of, Some(rt0));
    assert_eq!(graph.get_texture(rt0), graph.get_texture(rt1));
    assert_eq!(frame.device.textures_created(), 2);

    let stats = |name: &str| graph.barrier_stats(graph.find_pass(name).unwrap()).unwrap().image_barriers;
    assert_eq!(stats("A"), 1);
    // B 读取 RT0 与写入 RT1 是同一个物理纹理，只保留写入一侧
    assert_eq!(stats("B"), 1);
    assert_eq!(stats("C"), 2);

    let batches = frame.cmd.barrier_batches();
    let (_, c_images) = batches[2];
    assert_eq!(c_images[1].old_layout(), vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL);
    assert_eq!(c_images[1].new_layout(), vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL);
    assert_eq!(c_images[1].mask().src_stage, vk::PipelineStageFlags2::COLOR_ATTACHMENT_OUTPUT);
    assert_eq!(c_images[1].mask().src_access, vk::AccessFlags2::COLOR_ATTACHMENT_WRITE);
}

#[test]
fn first_write_discards_previous_contents() {
    let mut graph = RenderGraph::default();
    add_color_pass(&mut graph, "Clear", "Target", None);

    let mut frame = Frame::new();
    frame.run(&mut graph);

    let (buffers, images) = frame.cmd.barrier_batches()[0];
    assert!(buffers.is_empty());
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].old_layout(), vk::ImageLayout::UNDEFINED);
    assert_eq!(images[0].new_layout(), vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL);
    assert_eq!(images[0].mask().src_stage, vk::PipelineStageFlags2::TOP_OF_PIPE);
    assert_eq!(images[0].mask().src_access, vk::AccessFlags2::NONE);
    assert_eq!(images[0].inner().subresource_range.aspect_mask, vk::ImageAspectFlags::COLOR);
}

#[test]
fn depth_stencil_attachment_uses_both_aspects() {
    let mut graph = RenderGraph::default();
    graph.add_pass::<()>(
        "DepthPrepass",
        RgPassType::Graphics,
        |_, builder| {
            builder.declare_texture("Depth", depth_desc());
            builder.write_depth_stencil(
                "Depth",
                GfxClearValue::DEPTH_FAR,
                vk::AttachmentLoadOp::CLEAR,
                vk::AttachmentStoreOp::STORE,
                vk::AttachmentLoadOp::CLEAR,
                vk::AttachmentStoreOp::DONT_CARE,
                None,
            );
            builder.set_viewport_scissor(WIDTH, HEIGHT);
        },
        |_, _, _| {},
    );

    let mut frame = Frame::new();
    frame.run(&mut graph);

    let commands = frame.cmd.commands_in_label("DepthPrepass");
    let RecordedCommand::Barriers { image_barriers, .. } = &commands[0] else {
        panic!("expected a barrier batch");
    };
    assert_eq!(image_barriers[0].new_layout(), vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL);
    assert_eq!(
        image_barriers[0].inner().subresource_range.aspect_mask,
        vk::ImageAspectFlags::DEPTH | vk::ImageAspectFlags::STENCIL
    );

    let RecordedCommand::BeginRendering(info) = &commands[1] else {
        panic!("expected begin rendering");
    };
    assert!(info.color_attachments.is_empty());
    assert!(info.has_stencil);
    let depth = info.depth_stencil_attachment.unwrap();
    assert_eq!(depth.load_op, vk::AttachmentLoadOp::CLEAR);
    assert_eq!(depth.stencil_store_op, vk::AttachmentStoreOp::DONT_CARE);
}

#[test]
fn transfer_reads_use_transfer_src_layout() {
    let mut graph = RenderGraph::default();
    graph.add_pass::<()>(
        "Raytrace",
        RgPassType::Compute,
        |_, builder| {
            builder.declare_texture("Accum", color_desc());
            builder.write_texture("Accum", None);
        },
        |_, _, _| {},
    );
    graph.add_pass::<()>(
        "Readback",
        RgPassType::Transfer,
        |_, builder| {
            builder.read_texture("Accum", RgResourceState::TRANSFER_SRC);
        },
        |_, _, _| {},
    );

    let mut frame = Frame::new();
    frame.run(&mut graph);

    let batches = frame.cmd.barrier_batches();
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0].1[0].new_layout(), vk::ImageLayout::GENERAL);

    let readback = batches[1].1[0];
    assert_eq!(readback.old_layout(), vk::ImageLayout::GENERAL);
    assert_eq!(readback.new_layout(), vk::ImageLayout::TRANSFER_SRC_OPTIMAL);
    assert_eq!(readback.mask().src_stage, vk::PipelineStageFlags2::COMPUTE_SHADER);
    assert_eq!(readback.mask().dst_stage, vk::PipelineStageFlags2::ALL_TRANSFER);

    let accum = graph.get_texture(graph.find_texture("Accum").unwrap()).unwrap();
    assert_eq!(frame.device.texture_layout(accum), vk::ImageLayout::TRANSFER_SRC_OPTIMAL);
}

#[test]
fn writer_is_synchronized_once_for_many_readers() {
    let mut graph = RenderGraph::default();
    graph.add_pass::<()>(
        "Produce",
        RgPassType::Compute,
        |_, builder| {
            builder.declare_buffer("Data", storage_desc(256));
            builder.write_buffer("Data", None);
        },
        |_, _, _| {},
    );
    for i in 0..3 {
        graph.add_pass::<()>(
            &format!("Read{i}"),
            RgPassType::Compute,
            |_, builder| {
                builder.read_buffer("Data", RgResourceState::SHADER_RESOURCE);
            },
            |_, _, _| {},
        );
    }

    let mut frame = Frame::new();
    frame.run(&mut graph);

    assert_eq!(graph.execution_order_names(), vec!["Produce", "Read2", "Read1", "Read0"]);

    let batches = frame.cmd.barrier_batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].0.len(), 1);
    assert_eq!(frame.cmd.commands_in_label("Read2").len(), 1);
    assert!(frame.cmd.commands_in_label("Read1").is_empty());
}

#[test]
fn independent_passes_have_a_stable_order() {
    let build = || {
        let mut graph = RenderGraph::default();
        for name in ["Shadow", "Sky", "Particles"] {
            graph.add_pass::<()>(
                name,
                RgPassType::Compute,
                move |_, builder| {
                    builder.declare_buffer(&format!("{name}Output"), storage_desc(64));
                    builder.write_buffer(&format!("{name}Output"), None);
                },
                |_, _, _| {},
            );
        }
        graph.build();
        graph.execution_order().to_vec()
    };

    let first = build();
    assert_eq!(first, vec![2, 1, 0]);
    for _ in 0..8 {
        assert_eq!(build(), first);
    }
}

#[test]
fn pool_reuses_resources_across_frames() {
    let mut frame = Frame::new();
    let mut handles = Vec::new();

    for _ in 0..4 {
        let mut graph = RenderGraph::default();
        add_color_pass(&mut graph, "Lighting", "HDR", None);
        frame.run(&mut graph);
        handles.push(graph.get_texture(graph.find_texture("HDR").unwrap()).unwrap());
    }

    assert!(handles.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(frame.device.textures_created(), 1);
    assert_eq!(frame.pool.shared_texture_count(), 1);
}

#[test]
fn per_frame_resources_are_bounded_per_slot() {
    let settings = RgPoolSettings { frames_in_flight: 2 };
    let mut frame = Frame {
        device: HeadlessDevice::new(),
        pool: RgResourcePool::new(&settings),
        cmd: RecordingCommandBuffer::new(),
    };

    let mut handles = Vec::new();
    for _ in 0..6 {
        let mut graph = RenderGraph::default();
        graph.add_pass::<()>(
            "Upload",
            RgPassType::Transfer,
            |_, builder| {
                let usage = vk::BufferUsageFlags::TRANSFER_DST | vk::BufferUsageFlags::UNIFORM_BUFFER;
                builder.declare_buffer("Constants", RgBufferDesc::new(256, usage).per_frame());
                builder.write_buffer("Constants", None);
            },
            |_, _, _| {},
        );
        frame.run(&mut graph);
        handles.push(graph.get_buffer(graph.find_buffer("Constants").unwrap()).unwrap());
    }

    assert_eq!(frame.device.buffers_created(), 2);
    assert_eq!(frame.pool.per_frame_buffer_count(0), 1);
    assert_eq!(frame.pool.per_frame_buffer_count(1), 1);
    assert_ne!(handles[0], handles[1]);
    assert_eq!(handles[0], handles[2]);
    assert_eq!(handles[1], handles[3]);
}

#[test]
fn pass_context_resolves_physical_resources() {
    let observed = RefCell::new(None);

    let mut graph = RenderGraph::default();
    add_color_pass(&mut graph, "GBuffer", "Albedo", None);
    graph.add_pass::<()>(
        "Tonemap",
        RgPassType::Compute,
        |_, builder| {
            builder.read_texture("Albedo", RgResourceState::SHADER_RESOURCE);
        },
        |_, ctx, cmd| {
            let albedo = ctx.find_texture("Albedo").unwrap();
            let spec = ctx.texture_spec(albedo);
            *observed.borrow_mut() = Some((spec.width, spec.height, ctx.vk_image(albedo)));
            cmd.begin_label("dispatch", glam::Vec4::ONE);
            cmd.end_label();
        },
    );

    let mut frame = Frame::new();
    frame.run(&mut graph);

    let albedo = graph.get_texture(graph.find_texture("Albedo").unwrap()).unwrap();
    assert_eq!(*observed.borrow(), Some((WIDTH, HEIGHT, frame.device.vk_image(albedo))));

    // compute pass 没有 rendering scope
    let tonemap = frame.cmd.commands_in_label("Tonemap");
    assert!(!tonemap.iter().any(|c| matches!(c, RecordedCommand::BeginRendering(_))));
}

#[test]
#[should_panic(expected = "is already declared")]
fn duplicate_texture_declaration_panics() {
    let mut graph = RenderGraph::default();
    add_color_pass(&mut graph, "First", "Color", None);
    add_color_pass(&mut graph, "Second", "Color", None);
}

#[test]
#[should_panic(expected = "which isn't declared")]
fn reading_undeclared_texture_panics() {
    let mut graph = RenderGraph::default();
    graph.add_pass::<()>(
        "Composite",
        RgPassType::Compute,
        |_, builder| {
            builder.read_texture("NeverDeclared", RgResourceState::SHADER_RESOURCE);
        },
        |_, _, _| {},
    );
}

#[test]
#[should_panic(expected = "graphics passes may not write storage buffers")]
fn graphics_pass_writing_buffer_panics_when_consumed() {
    let mut graph = RenderGraph::default();
    graph.add_pass::<()>(
        "FragmentAtomics",
        RgPassType::Graphics,
        |_, builder| {
            builder.declare_buffer("Counters", storage_desc(16));
            builder.write_buffer("Counters", None);
        },
        |_, _, _| {},
    );
    graph.add_pass::<()>(
        "Resolve",
        RgPassType::Compute,
        |_, builder| {
            builder.read_buffer("Counters", RgResourceState::STORAGE);
        },
        |_, _, _| {},
    );

    let mut frame = Frame::new();
    frame.run(&mut graph);
}
