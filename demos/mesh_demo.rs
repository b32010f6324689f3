//! Demo building a mesh and drawing it against the recording backend
//!
//! Run with:
//!   cargo run --example mesh_demo
//!   cargo run --example mesh_demo -- --layout separate --draws 2
//!   RUST_LOG=trace cargo run --example mesh_demo

use std::rc::Rc;

use clap::Parser;
use glam::{Vec2, Vec3};
use graphics_mesh::{
    generic3d, BufferUsage, Command, Mesh, MeshDescriptor, MeshError, Primitive, RecordingBackend,
};

/// How vertex attributes are laid out in the vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
enum CliLayout {
    /// All attributes of one vertex stored together.
    #[default]
    Interleaved,
    /// Each attribute stored as one contiguous run.
    Separate,
}

#[derive(Parser, Debug)]
#[command(name = "mesh_demo", about = "Build a quad mesh and print the submitted commands", version)]
struct Args {
    /// Vertex buffer layout.
    #[arg(long, default_value = "interleaved", value_enum)]
    layout: CliLayout,

    /// Number of times the mesh is drawn.
    #[arg(long, default_value = "1")]
    draws: u32,

    /// Label attached to the mesh.
    #[arg(long, default_value = "quad")]
    label: String,
}

/// One interleaved vertex, matching the bind order below
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: Vec3,
    normal: Vec3,
    uv: Vec2,
}

fn build_quad(backend: &Rc<RecordingBackend>, args: &Args) -> Result<Mesh, MeshError> {
    let positions = [
        Vec3::new(-0.5, -0.5, 0.0),
        Vec3::new(0.5, -0.5, 0.0),
        Vec3::new(-0.5, 0.5, 0.0),
        Vec3::new(0.5, 0.5, 0.0),
    ];
    let normals = [Vec3::Z; 4];
    let uvs = [
        Vec2::new(0.0, 1.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
    ];

    let mut mesh = Mesh::new(
        backend.clone(),
        MeshDescriptor::new(Primitive::TriangleStrip, positions.len() as u32)
            .with_label(args.label.clone()),
    );

    let interleaved = args.layout == CliLayout::Interleaved;
    let vertices = mesh.add_buffer(interleaved)?;
    mesh.bind(vertices, generic3d::POSITION)?;
    mesh.bind(vertices, generic3d::NORMAL)?;
    mesh.bind(vertices, generic3d::TEXTURE_COORDINATES)?;

    if let Some(buffer) = mesh.buffer_mut(vertices) {
        if interleaved {
            let data: Vec<Vertex> = positions
                .iter()
                .zip(&normals)
                .zip(&uvs)
                .map(|((&position, &normal), &uv)| Vertex {
                    position,
                    normal,
                    uv,
                })
                .collect();
            buffer.set_pod_data(&data, BufferUsage::StaticDraw)?;
        } else {
            let mut data: Vec<f32> = Vec::new();
            data.extend(positions.iter().flat_map(|p| p.to_array()));
            data.extend(normals.iter().flat_map(|n| n.to_array()));
            data.extend(uvs.iter().flat_map(|uv| uv.to_array()));
            buffer.set_pod_data(&data, BufferUsage::StaticDraw)?;
        }
    }

    // Rebinding an already bound location is reported, not applied
    if let Err(err) = mesh.bind(vertices, generic3d::POSITION) {
        log::warn!("{}", err);
    }

    Ok(mesh)
}

fn main() {
    env_logger::init();
    graphics_mesh::init();

    let args = Args::parse();
    println!("Mesh demo ({:?} layout, {} draws)", args.layout, args.draws);

    let backend = Rc::new(RecordingBackend::new());
    let mut mesh = match build_quad(&backend, &args) {
        Ok(mesh) => mesh,
        Err(e) => {
            eprintln!("Failed to build mesh: {}", e);
            return;
        }
    };

    for _ in 0..args.draws {
        if let Err(e) = mesh.draw(backend.as_ref()) {
            eprintln!("Draw failed: {}", e);
            return;
        }
    }

    for command in backend.take_commands() {
        match command {
            Command::BindAttribute { buffer, attribute } => println!(
                "  bind location {} -> buffer {}: {}x{:?} stride {} offset {}",
                attribute.location,
                buffer.raw(),
                attribute.components,
                attribute.component_type,
                attribute.stride,
                attribute.offset
            ),
            other => println!("  {:?}", other),
        }
    }

    drop(mesh);
    println!("Live buffers after drop: {}", backend.live_buffers());
}
