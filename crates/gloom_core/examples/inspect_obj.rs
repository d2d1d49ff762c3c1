//! Example: Load and inspect an OBJ file.
//!
//! Run with: cargo run --example inspect_obj -- assets/crate.obj

use std::env;

use gloom_core::load_obj;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: inspect_obj <path-to-obj-file>");
        println!("\nExample:");
        println!("  cargo run --example inspect_obj -- assets/crate.obj");
        return;
    }

    let path = &args[1];
    println!("Loading OBJ file: {}", path);

    match load_obj(path) {
        Ok(mesh) => {
            println!("\n=== Mesh: {} ===", path);
            println!("Unique vertices: {}", mesh.vertex_count());
            println!("Triangles: {}", mesh.triangle_count());
            println!("Vertex buffer: {} bytes", mesh.vertex_bytes().len());
            println!("Index buffer: {} bytes", mesh.index_bytes().len());

            if mesh.is_empty() {
                println!("\n(no geometry)");
                return;
            }

            let bounds = mesh.bounds();
            println!("\n--- Bounds ---");
            println!(
                "  Min: ({:.2}, {:.2}, {:.2})",
                bounds.x.min, bounds.y.min, bounds.z.min
            );
            println!(
                "  Max: ({:.2}, {:.2}, {:.2})",
                bounds.x.max, bounds.y.max, bounds.z.max
            );
            let center = mesh.center();
            println!("  Center: ({:.2}, {:.2}, {:.2})", center.x, center.y, center.z);
            println!("  Size: {:.2}", mesh.size());
        }
        Err(e) => {
            eprintln!("Error loading OBJ file: {}", e);
        }
    }
}
