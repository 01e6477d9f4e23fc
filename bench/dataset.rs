use kmeans_restarts::PointStore;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Generate `blobs` well-separated groups of points with uniform noise.
/// Deterministic for a given seed.
pub fn generate_blobs(
    point_count: usize,
    dimension: usize,
    blobs: usize,
    separation: f32,
    seed: u64,
) -> PointStore {
    let mut rng = StdRng::seed_from_u64(seed);
    let blobs = blobs.max(1);
    let mut data = Array2::<f32>::zeros((point_count, dimension));

    for i in 0..point_count {
        let blob = i % blobs;
        for d in 0..dimension {
            let center = blob as f32 * separation + d as f32 * 0.1;
            data[(i, d)] = center + rng.gen_range(-0.5..0.5);
        }
    }

    PointStore::new(data)
}

/// Write a store in the comma-separated format the CLI reads.
pub fn write_text_dataset(store: &PointStore, path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut out = BufWriter::new(File::create(path)?);
    for row in store.get_vectors().outer_iter() {
        let fields: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        writeln!(out, "{}", fields.join(","))?;
    }
    out.flush()?;

    eprintln!("Dataset saved to {:?}", path);
    Ok(())
}
