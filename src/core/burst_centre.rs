use crate::types::{BurstCentres, GcpGrid, SarError, SarResult};
use ndarray::{s, Array1, Array2, Axis};

/// Geographic centre of each burst of a sub-swath.
///
/// Latitude and longitude are first averaged across range for every sampled
/// azimuth line; burst `i` spans lines `i` and `i + 1`, so its centre is the
/// mean of those two line averages. Longitudes are averaged arithmetically,
/// bursts straddling the antimeridian are not corrected.
pub fn compute_burst_centre(gcp: &GcpGrid) -> SarResult<BurstCentres> {
    let (azimuth_lines, _) = gcp.dim();
    if azimuth_lines != gcp.burst_count + 1 {
        return Err(SarError::Metadata(format!(
            "GCP grid has {} azimuth lines for {} bursts",
            azimuth_lines, gcp.burst_count
        )));
    }

    let latitude = midpoints(&range_mean(&gcp.latitude)?);
    let longitude = midpoints(&range_mean(&gcp.longitude)?);

    log::debug!("Computed {} burst centres", latitude.len());
    Ok(BurstCentres { latitude, longitude })
}

fn range_mean(values: &Array2<f64>) -> SarResult<Array1<f64>> {
    values
        .mean_axis(Axis(1))
        .ok_or_else(|| SarError::Metadata("GCP grid has no range samples".to_string()))
}

fn midpoints(lines: &Array1<f64>) -> Array1<f64> {
    (&lines.slice(s![..-1]) + &lines.slice(s![1..])) / 2.0
}
