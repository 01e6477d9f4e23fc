use ndarray::ArrayView1;
use std::time::{SystemTime, UNIX_EPOCH};
use wide::{f32x4, f32x8};

/// Euclidean distance between two feature vectors of equal length.
///
/// Squared differences are summed first and the root is taken once.
#[inline]
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    squared_distance_simd(a, b).sqrt()
}

/// Euclidean distance between two ndarray rows.
///
/// Contiguous rows take the SIMD path; strided views fall back to a scalar sum.
#[inline]
pub fn row_distance(a: ArrayView1<f32>, b: ArrayView1<f32>) -> f32 {
    match (a.as_slice(), b.as_slice()) {
        (Some(a), Some(b)) => euclidean_distance(a, b),
        _ => a
            .iter()
            .zip(b.iter())
            .map(|(x, y)| {
                let d = x - y;
                d * d
            })
            .sum::<f32>()
            .sqrt(),
    }
}

#[inline]
fn squared_distance_simd(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    let dim = a.len().min(b.len());
    let mut j = 0;

    // SIMD 8-element chunks
    let mut acc8 = f32x8::splat(0.0);
    while j + 8 <= dim {
        let mut p_arr = [0.0f32; 8];
        let mut c_arr = [0.0f32; 8];
        p_arr.copy_from_slice(&a[j..j + 8]);
        c_arr.copy_from_slice(&b[j..j + 8]);
        let diff = f32x8::from(p_arr) - f32x8::from(c_arr);
        acc8 += diff * diff;
        j += 8;
    }

    // SIMD 4-element chunks
    let mut acc4 = f32x4::splat(0.0);
    while j + 4 <= dim {
        let mut p_arr = [0.0f32; 4];
        let mut c_arr = [0.0f32; 4];
        p_arr.copy_from_slice(&a[j..j + 4]);
        c_arr.copy_from_slice(&b[j..j + 4]);
        let diff = f32x4::from(p_arr) - f32x4::from(c_arr);
        acc4 += diff * diff;
        j += 4;
    }

    let mut tail = 0.0;
    while j < dim {
        let diff = a[j] - b[j];
        tail += diff * diff;
        j += 1;
    }

    acc8.reduce_add() + acc4.reduce_add() + tail
}

/// Seconds since the Unix epoch, used as the default RNG seed.
pub fn unix_timestamp_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
