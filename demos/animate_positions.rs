//! Animate a synthetic point cloud
//!
//! Builds a cloud from generated color and depth gradients, then runs a few
//! frames that push a wave through the points, fade the material and finally
//! swap in new image data.

use imagecloud_core::{
    FrameHooks, HostBackend, ImagePointCloud, MaterialParameters, PointCloudParameters, RasterImage,
};
use std::cell::Cell;
use std::rc::Rc;

const WIDTH: u32 = 64;
const HEIGHT: u32 = 48;
const FRAMES: usize = 5;

/// Radial color gradient with depth falling off from the center
fn synthetic_images(phase: f32) -> anyhow::Result<(RasterImage, RasterImage)> {
    let mut color = Vec::with_capacity((WIDTH * HEIGHT) as usize);
    let mut depth = Vec::with_capacity((WIDTH * HEIGHT) as usize);

    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            let u = x as f32 / WIDTH as f32;
            let v = y as f32 / HEIGHT as f32;
            let r = ((u - 0.5).powi(2) + (v - 0.5).powi(2)).sqrt();

            let d = ((1.0 - r * 1.5 + phase).clamp(0.0, 1.0) * 255.0) as u8;
            color.push([(u * 255.0) as u8, (v * 255.0) as u8, 160, 255]);
            depth.push([d, d, d, 255]);
        }
    }

    Ok((
        RasterImage::from_pixels(WIDTH, HEIGHT, &color)?,
        RasterImage::from_pixels(WIDTH, HEIGHT, &depth)?,
    ))
}

fn main() -> anyhow::Result<()> {
    simple_logger::init_with_level(log::Level::Debug)?;

    let backend = HostBackend::new();
    let parameters = PointCloudParameters {
        color_threshold: 0.2,
        depth_threshold: 0.1,
        depth_scale: 0.5,
        point_size: 0.02,
        ..Default::default()
    };
    let predicate = parameters.default_predicate();

    let (color, depth) = synthetic_images(0.0)?;
    let mut cloud = ImagePointCloud::new(backend.clone(), &color, &depth, parameters, &predicate)?;
    println!("Built {} points from {}x{} images", cloud.len()?, WIDTH, HEIGHT);

    let frame = Rc::new(Cell::new(0usize));
    let mut hooks = FrameHooks::new();
    let counter = Rc::clone(&frame);
    hooks.set_begin_frame(move || counter.set(counter.get() + 1));

    for step in 0..FRAMES {
        hooks.begin_frame();
        let time = step as f32 * 0.2;
        cloud.iterate_positions(|x, y, z, t| (x, y, z + 0.05 * (t * std::f32::consts::TAU + time).sin()))?;
        cloud.set_material_parameters(&MaterialParameters::default().with_opacity(1.0 - step as f32 / FRAMES as f32))?;
        hooks.end_frame();

        let (min, max) = cloud.bounding_box()?;
        println!("Frame {}: z in [{:.3}, {:.3}], opacity {:.2}", frame.get(), min.z, max.z, cloud.material()?.opacity);
    }

    let (color, depth) = synthetic_images(0.3)?;
    cloud.set_image_data(&color, &depth, &predicate)?;
    println!("Rebuilt with {} points", cloud.len()?);

    cloud.dispose()?;
    println!(
        "Live geometries: {}, live materials: {}",
        backend.live_geometries(),
        backend.live_materials()
    );
    Ok(())
}
