#![allow(irrefutable_let_patterns)]

use blade_graphics as gpu;
use blade_icosphere::{self as ico, panel};
use std::{str::FromStr, time::Instant};

const MAX_FLY_SPEED: f32 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Shape {
    Icosphere,
    Cube,
    Quad,
}

impl FromStr for Shape {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "icosphere" => Ok(Self::Icosphere),
            "cube" => Ok(Self::Cube),
            "quad" => Ok(Self::Quad),
            other => Err(format!("Unknown shape: {}", other)),
        }
    }
}

#[derive(argh::FromArgs)]
/// Render a procedurally generated mesh with an animated shader.
struct Args {
    /// initial icosphere subdivision level (0-8)
    #[argh(option, default = "5")]
    level: u32,
    /// icosphere radius, or cube and quad size
    #[argh(option, default = "1.0")]
    radius: f32,
    /// shape to draw: icosphere, cube or quad
    #[argh(option, default = "Shape::Icosphere")]
    shape: Shape,
    /// base color as #rrggbb
    #[argh(option, default = "String::from(\"#ff7f2a\")")]
    color: String,
}

#[derive(Default)]
pub struct ControlledCamera {
    pub position: glam::Vec3,
    pub orientation: glam::Quat,
    pub fov_y: f32,
    pub depth: f32,
    pub fly_speed: f32,
}

impl ControlledCamera {
    pub fn get_view_matrix(&self) -> glam::Mat4 {
        glam::Mat4::from_rotation_translation(self.orientation, self.position).inverse()
    }

    pub fn get_projection_matrix(&self, aspect: f32) -> glam::Mat4 {
        glam::Mat4::perspective_rh(self.fov_y, aspect, 0.1, self.depth)
    }

    pub fn move_by(&mut self, offset: glam::Vec3) {
        self.position += self.orientation * offset;
    }

    pub fn on_key(&mut self, code: winit::keyboard::KeyCode, delta: f32) -> bool {
        use winit::keyboard::KeyCode as Kc;

        let move_offset = self.fly_speed * delta;
        match code {
            Kc::KeyW => {
                self.move_by(glam::Vec3::new(0.0, 0.0, -move_offset));
            }
            Kc::KeyS => {
                self.move_by(glam::Vec3::new(0.0, 0.0, move_offset));
            }
            Kc::KeyA => {
                self.move_by(glam::Vec3::new(-move_offset, 0.0, 0.0));
            }
            Kc::KeyD => {
                self.move_by(glam::Vec3::new(move_offset, 0.0, 0.0));
            }
            Kc::KeyZ => {
                self.move_by(glam::Vec3::new(0.0, -move_offset, 0.0));
            }
            Kc::KeyX => {
                self.move_by(glam::Vec3::new(0.0, move_offset, 0.0));
            }
            _ => return false,
        }

        true
    }

    pub fn on_wheel(&mut self, delta: winit::event::MouseScrollDelta) {
        let shift = match delta {
            winit::event::MouseScrollDelta::LineDelta(_, lines) => lines,
            winit::event::MouseScrollDelta::PixelDelta(position) => position.y as f32 * 0.01,
        };
        self.fly_speed = (self.fly_speed * shift.exp()).clamp(0.01, MAX_FLY_SPEED);
    }
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Zeroable, bytemuck::Pod)]
pub struct Parameters {
    view_proj: [[f32; 4]; 4],
    color: [f32; 4],
    mouse: [f32; 4],
    time: f32,
    energy: f32,
    life: f32,
    vitality: f32,
}

const DEPTH_FORMAT: gpu::TextureFormat = gpu::TextureFormat::Depth32Float;

/// Size of the depth target for a window. Zero-sized windows still get a 1x1 texture.
fn depth_extent(size: winit::dpi::PhysicalSize<u32>) -> gpu::Extent {
    gpu::Extent {
        width: size.width.max(1),
        height: size.height.max(1),
        depth: 1,
    }
}

/// Depth buffer matching the window, recreated on resize.
struct DepthTarget {
    texture: gpu::Texture,
    view: gpu::TextureView,
    needs_init: bool,
}

impl DepthTarget {
    fn new(context: &gpu::Context, size: winit::dpi::PhysicalSize<u32>) -> Self {
        let texture = context.create_texture(gpu::TextureDesc {
            name: "depth",
            format: DEPTH_FORMAT,
            size: depth_extent(size),
            dimension: gpu::TextureDimension::D2,
            array_layer_count: 1,
            mip_level_count: 1,
            usage: gpu::TextureUsage::TARGET,
            sample_count: 1,
            external: None,
        });
        let view = context.create_texture_view(
            texture,
            gpu::TextureViewDesc {
                name: "depth",
                format: DEPTH_FORMAT,
                dimension: gpu::ViewDimension::D2,
                subresources: &Default::default(),
            },
        );
        Self {
            texture,
            view,
            needs_init: true,
        }
    }

    fn deinit(&mut self, context: &gpu::Context) {
        context.destroy_texture_view(self.view);
        context.destroy_texture(self.texture);
    }
}

#[derive(blade_macros::ShaderData)]
struct DrawData {
    g_params: Parameters,
    b_positions: gpu::BufferPiece,
    b_normals: gpu::BufferPiece,
}

/// Everything the render loop and the input handlers share.
struct Example {
    camera: ControlledCamera,
    controls: panel::Controls,
    frame_counter: panel::FrameCounter,
    shape: Shape,
    radius: f32,
    color: glam::Vec4,
    mouse: glam::Vec4,
    start_time: Instant,
    background_pipeline: gpu::RenderPipeline,
    draw_pipeline: gpu::RenderPipeline,
    command_encoder: gpu::CommandEncoder,
    prev_sync_point: Option<gpu::SyncPoint>,
    window_size: winit::dpi::PhysicalSize<u32>,
    depth_target: DepthTarget,
    mesh: ico::GpuMesh,
    surface: gpu::Surface,
    context: gpu::Context,
}

#[derive(Debug)]
enum InitError {
    Context(gpu::NotSupportedError),
    Shape(ico::ShapeError),
}

impl Example {
    fn make_surface_config(size: winit::dpi::PhysicalSize<u32>) -> gpu::SurfaceConfig {
        log::info!("Window size: {:?}", size);
        gpu::SurfaceConfig {
            size: gpu::Extent {
                width: size.width,
                height: size.height,
                depth: 1,
            },
            usage: gpu::TextureUsage::TARGET,
            display_sync: gpu::DisplaySync::Recent,
            ..Default::default()
        }
    }

    fn build_mesh(shape: Shape, radius: f32, level: u32) -> Result<ico::Mesh, ico::ShapeError> {
        match shape {
            Shape::Icosphere => ico::generate(glam::Vec3::ZERO, radius, level),
            Shape::Cube => ico::cube(glam::Vec3::ZERO, radius),
            Shape::Quad => ico::quad(glam::Vec3::ZERO, radius),
        }
    }

    fn init(window: &winit::window::Window, args: &Args) -> Result<Self, InitError> {
        let color = panel::parse_hex_color(&args.color).map_err(InitError::Shape)?;
        let mut controls = panel::Controls::default();
        // the initial mesh is built below, no rebuild needed
        let _ = controls.set_level(args.level);
        let mesh_data =
            Self::build_mesh(args.shape, args.radius, controls.level()).map_err(InitError::Shape)?;

        let context = unsafe {
            gpu::Context::init(gpu::ContextDesc {
                presentation: true,
                validation: cfg!(debug_assertions),
                timing: false,
                capture: false,
                overlay: false,
                device_id: 0,
            })
            .map_err(InitError::Context)?
        };
        log::info!("{:?}", context.device_information());
        let window_size = window.inner_size();

        let surface = context
            .create_surface_configured(window, Self::make_surface_config(window_size))
            .map_err(InitError::Context)?;
        let info = surface.info();

        let shader = {
            let source = include_str!("shader.wgsl");
            context.create_shader(gpu::ShaderDesc { source })
        };
        let background_pipeline = context.create_render_pipeline(gpu::RenderPipelineDesc {
            name: "background",
            data_layouts: &[],
            primitive: gpu::PrimitiveState {
                topology: gpu::PrimitiveTopology::TriangleStrip,
                ..Default::default()
            },
            vertex: shader.at("background_vs"),
            vertex_fetches: &[],
            fragment: Some(shader.at("background_fs")),
            color_targets: &[info.format.into()],
            depth_stencil: Some(gpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: gpu::CompareFunction::Always,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample_state: Default::default(),
        });
        let draw_layout = <DrawData as gpu::ShaderData>::layout();
        let draw_pipeline = context.create_render_pipeline(gpu::RenderPipelineDesc {
            name: "main",
            data_layouts: &[&draw_layout],
            primitive: gpu::PrimitiveState {
                topology: gpu::PrimitiveTopology::TriangleList,
                front_face: gpu::FrontFace::Ccw,
                cull_mode: Some(gpu::Face::Back),
                ..Default::default()
            },
            vertex: shader.at("draw_vs"),
            vertex_fetches: &[],
            fragment: Some(shader.at("draw_fs")),
            color_targets: &[info.format.into()],
            // the shader displaces vertices, so the drawn surface is not convex
            depth_stencil: Some(gpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: gpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample_state: Default::default(),
        });

        let mut command_encoder = context.create_command_encoder(gpu::CommandEncoderDesc {
            name: "main",
            buffer_count: 2,
        });
        let mesh = ico::GpuMesh::new(&mesh_data, &context, &mut command_encoder);
        let depth_target = DepthTarget::new(&context, window_size);

        Ok(Self {
            camera: ControlledCamera {
                position: glam::Vec3::new(0.0, 0.0, 5.0),
                fov_y: 45f32.to_radians(),
                depth: 1000.0,
                fly_speed: 0.1,
                ..Default::default()
            },
            controls,
            frame_counter: panel::FrameCounter::default(),
            shape: args.shape,
            radius: args.radius,
            color,
            mouse: glam::Vec4::ZERO,
            start_time: Instant::now(),
            background_pipeline,
            draw_pipeline,
            command_encoder,
            prev_sync_point: None,
            window_size,
            depth_target,
            mesh,
            surface,
            context,
        })
    }

    fn deinit(&mut self) {
        self.wait_for_gpu();
        self.context
            .destroy_render_pipeline(&mut self.background_pipeline);
        self.context
            .destroy_render_pipeline(&mut self.draw_pipeline);
        self.context
            .destroy_command_encoder(&mut self.command_encoder);
        self.context.destroy_surface(&mut self.surface);
        self.depth_target.deinit(&self.context);
        self.mesh.deinit(&self.context);
    }

    fn resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        self.wait_for_gpu();
        self.window_size = size;
        let config = Self::make_surface_config(size);
        self.context.reconfigure_surface(&mut self.surface, config);
        self.depth_target.deinit(&self.context);
        self.depth_target = DepthTarget::new(&self.context, size);
    }

    fn wait_for_gpu(&mut self) {
        if let Some(sp) = self.prev_sync_point.take() {
            self.context.wait_for(&sp, !0);
        }
    }

    fn execute(&mut self, command: panel::Command) {
        match command {
            panel::Command::Rebuild { level } => {
                let mesh_data = match Self::build_mesh(self.shape, self.radius, level) {
                    Ok(mesh) => mesh,
                    Err(e) => {
                        log::error!("Keeping the previous mesh: {}", e);
                        return;
                    }
                };
                self.wait_for_gpu();
                self.mesh.deinit(&self.context);
                self.mesh = ico::GpuMesh::new(&mesh_data, &self.context, &mut self.command_encoder);
            }
        }
    }

    fn on_key(&mut self, code: winit::keyboard::KeyCode) {
        use winit::keyboard::KeyCode as Kc;

        let controls = &mut self.controls;
        let command = match code {
            Kc::ArrowUp => controls.step_level(1),
            Kc::ArrowDown => controls.step_level(-1),
            Kc::KeyL => Some(controls.load_scene()),
            Kc::KeyR => controls.reset(),
            Kc::Digit1 => {
                controls.set_energy(controls.energy - 0.05);
                None
            }
            Kc::Digit2 => {
                controls.set_energy(controls.energy + 0.05);
                None
            }
            Kc::Digit3 => {
                controls.set_life(controls.life - 0.1);
                None
            }
            Kc::Digit4 => {
                controls.set_life(controls.life + 0.1);
                None
            }
            Kc::Digit5 => {
                controls.set_vitality(controls.vitality - 0.1);
                None
            }
            Kc::Digit6 => {
                controls.set_vitality(controls.vitality + 0.1);
                None
            }
            _ => {
                self.camera.on_key(code, 1.0);
                return;
            }
        };
        log::info!("{:?}", self.controls);
        if let Some(command) = command {
            self.execute(command);
        }
    }

    fn on_cursor(&mut self, position: winit::dpi::PhysicalPosition<f64>) {
        let size = glam::Vec2::new(self.window_size.width as f32, self.window_size.height as f32);
        self.mouse = panel::mouse_ray(glam::Vec2::new(position.x as f32, position.y as f32), size);
    }

    /// Returns the frame rate whenever a new measurement is available.
    fn render(&mut self) -> Option<f32> {
        if self.window_size == Default::default() {
            return None;
        }
        let frame = self.surface.acquire_frame();
        let aspect = self.window_size.width as f32 / self.window_size.height as f32;
        let view_proj =
            self.camera.get_projection_matrix(aspect) * self.camera.get_view_matrix();

        self.command_encoder.start();
        self.command_encoder.init_texture(frame.texture());
        if self.depth_target.needs_init {
            self.command_encoder.init_texture(self.depth_target.texture);
            self.depth_target.needs_init = false;
        }

        if let mut pass = self.command_encoder.render(
            "main",
            gpu::RenderTargetSet {
                colors: &[gpu::RenderTarget {
                    view: frame.texture_view(),
                    init_op: gpu::InitOp::Clear(gpu::TextureColor::OpaqueBlack),
                    finish_op: gpu::FinishOp::Store,
                }],
                depth_stencil: Some(gpu::RenderTarget {
                    view: self.depth_target.view,
                    init_op: gpu::InitOp::Clear(gpu::TextureColor::White),
                    finish_op: gpu::FinishOp::Discard,
                }),
            },
        ) {
            if let mut pen = pass.with(&self.background_pipeline) {
                pen.draw(0, 3, 0, 1);
            }
            let mut pen = pass.with(&self.draw_pipeline);
            pen.bind(
                0,
                &DrawData {
                    g_params: Parameters {
                        view_proj: view_proj.to_cols_array_2d(),
                        color: self.color.into(),
                        mouse: self.mouse.into(),
                        time: self.start_time.elapsed().as_secs_f32(),
                        energy: self.controls.energy,
                        life: self.controls.life,
                        vitality: self.controls.vitality,
                    },
                    b_positions: self.mesh.position_buf.at(0),
                    b_normals: self.mesh.normal_buf.at(0),
                },
            );
            pen.draw_indexed(
                self.mesh.index_buf.at(0),
                gpu::IndexType::U32,
                self.mesh.index_count,
                0,
                0,
                1,
            );
        }
        self.command_encoder.present(frame);
        let sync_point = self.context.submit(&mut self.command_encoder);

        self.wait_for_gpu();
        self.prev_sync_point = Some(sync_point);
        self.frame_counter.tick(Instant::now())
    }
}

fn main() {
    env_logger::init();
    let args: Args = argh::from_env();

    let event_loop = winit::event_loop::EventLoop::new().unwrap();
    let window_attributes =
        winit::window::Window::default_attributes().with_title("blade-icosphere");
    let window = event_loop.create_window(window_attributes).unwrap();

    let mut example = match Example::init(&window, &args) {
        Ok(example) => example,
        Err(InitError::Context(e)) => {
            log::error!("Graphics context is not supported: {:?}", e);
            std::process::exit(1);
        }
        Err(InitError::Shape(e)) => {
            log::error!("Invalid arguments: {}", e);
            std::process::exit(2);
        }
    };

    event_loop
        .run(|event, target| {
            target.set_control_flow(winit::event_loop::ControlFlow::Poll);
            match event {
                winit::event::Event::AboutToWait => {
                    window.request_redraw();
                }
                winit::event::Event::WindowEvent { event, .. } => match event {
                    winit::event::WindowEvent::Resized(size) => {
                        example.resize(size);
                    }
                    winit::event::WindowEvent::KeyboardInput {
                        event:
                            winit::event::KeyEvent {
                                physical_key: winit::keyboard::PhysicalKey::Code(key_code),
                                state: winit::event::ElementState::Pressed,
                                ..
                            },
                        ..
                    } => {
                        if key_code == winit::keyboard::KeyCode::Escape {
                            target.exit();
                        }
                        example.on_key(key_code);
                    }
                    winit::event::WindowEvent::CursorMoved { position, .. } => {
                        example.on_cursor(position);
                    }
                    winit::event::WindowEvent::MouseWheel { delta, .. } => {
                        example.camera.on_wheel(delta);
                    }
                    winit::event::WindowEvent::CloseRequested => {
                        target.exit();
                    }
                    winit::event::WindowEvent::RedrawRequested => {
                        if let Some(fps) = example.render() {
                            window.set_title(&format!("blade-icosphere - {:.0} fps", fps));
                        }
                    }
                    _ => {}
                },
                _ => {}
            }
        })
        .unwrap();

    example.deinit();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_target_follows_window() {
        let extent = depth_extent(winit::dpi::PhysicalSize::new(1280, 720));
        assert_eq!((extent.width, extent.height, extent.depth), (1280, 720, 1));
    }

    #[test]
    fn minimized_window_keeps_valid_depth_target() {
        let extent = depth_extent(winit::dpi::PhysicalSize::new(0, 0));
        assert_eq!((extent.width, extent.height), (1, 1));
    }
}
