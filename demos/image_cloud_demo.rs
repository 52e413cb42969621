//! Build a point cloud from a color image and a depth image
//!
//! ```text
//! imagecloud-demo color.png depth.png --color-threshold 0.1 --depth-scale 2
//! imagecloud-demo color.png depth.png --params "pointCloudParameters=eyJ..."
//! ```
//!
//! Prints the point count, the bounding box and the query string that
//! restores the parameters used.

use anyhow::Context;
use clap::Parser;
use imagecloud_core::{
    AcceptAll, FrameHooks, HostBackend, ImagePointCloud, PointCloudParameters, RasterImage, RenderBackend,
    ThresholdPredicate,
};
use imagecloud_gpu::{GpuContext, WgpuBackend};
use imagecloud_io::{load_image_pair, VisualizationParameters};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "imagecloud-demo", about = "Turn a color/depth image pair into a point cloud")]
struct Args {
    /// Color image
    color: PathBuf,

    /// Depth image, same size as the color image
    depth: PathBuf,

    /// Minimum mean RGB value in [0, 1]
    #[arg(long)]
    color_threshold: Option<f32>,

    /// Minimum depth value in [0, 1]
    #[arg(long)]
    depth_threshold: Option<f32>,

    /// Multiplier applied to the centered depth
    #[arg(long)]
    depth_scale: Option<f32>,

    /// Render size of each point
    #[arg(long)]
    point_size: Option<f32>,

    /// Query string holding encoded parameters; flags override it
    #[arg(long)]
    params: Option<String>,

    /// Keep every pixel instead of thresholding
    #[arg(long)]
    accept_all: bool,

    /// Upload to the GPU instead of host memory
    #[arg(long)]
    gpu: bool,
}

impl Args {
    fn visualization_parameters(&self) -> VisualizationParameters {
        let mut parameters = match &self.params {
            Some(query) => VisualizationParameters::from_query(query, &VisualizationParameters::default()),
            None => VisualizationParameters::default(),
        };
        if let Some(value) = self.color_threshold {
            parameters.color_threshold = value;
        }
        if let Some(value) = self.depth_threshold {
            parameters.depth_threshold = value;
        }
        if let Some(value) = self.depth_scale {
            parameters.depth_scale = value;
        }
        if let Some(value) = self.point_size {
            parameters.point_size = value;
        }
        parameters
    }
}

fn report<B: RenderBackend>(
    backend: B,
    color: &RasterImage,
    depth: &RasterImage,
    parameters: PointCloudParameters,
    predicate: &dyn ThresholdPredicate,
) -> anyhow::Result<()> {
    let mut hooks = FrameHooks::new();
    let start = Instant::now();
    hooks.set_end_frame(move || log::info!("Frame finished after {:?}", start.elapsed()));

    hooks.begin_frame();
    let mut cloud = ImagePointCloud::new(backend, color, depth, parameters, predicate)?;
    hooks.end_frame();

    let (width, height) = cloud.dimensions();
    let (min, max) = cloud.bounding_box()?;
    println!("Image size:   {}x{}", width, height);
    println!("Points:       {} of {} pixels", cloud.len()?, width as usize * height as usize);
    println!("Bounding box: ({:.3}, {:.3}, {:.3}) - ({:.3}, {:.3}, {:.3})", min.x, min.y, min.z, max.x, max.y, max.z);
    println!("Point size:   {}", cloud.material()?.size);

    cloud.dispose()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    simple_logger::init_with_level(log::Level::Info)?;
    let args = Args::parse();

    let (color, depth) = load_image_pair(&args.color, &args.depth)
        .with_context(|| format!("loading {} and {}", args.color.display(), args.depth.display()))?;

    let visualization = args.visualization_parameters();
    let parameters = visualization.point_cloud_parameters();
    let threshold = parameters.default_predicate();
    let predicate: &dyn ThresholdPredicate = if args.accept_all { &AcceptAll } else { &threshold };

    if args.gpu {
        let context = pollster::block_on(GpuContext::new())?;
        report(WgpuBackend::new(&context), &color, &depth, parameters, predicate)?;
    } else {
        report(HostBackend::new(), &color, &depth, parameters, predicate)?;
    }

    println!("Parameters:   ?{}", visualization.to_query("")?);
    Ok(())
}
