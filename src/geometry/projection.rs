/// Earth radius used by the spherical Web Mercator projection (EPSG:3857),
/// matching the constant the original conflator used for its planar distance
/// and slope math.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// projects a WGS84 lon/lat pair (decimal degrees) to Web Mercator meters.
/// Distances and slopes computed in this frame are an approximation that
/// degrades near the poles; adequate at the road/trail/POI scales this
/// engine operates on.
pub fn project_coord(lon: f64, lat: f64) -> (f64, f64) {
    let x = lon.to_radians() * EARTH_RADIUS_M;
    let lat_rad = lat.to_radians();
    let y = EARTH_RADIUS_M * ((std::f64::consts::FRAC_PI_4 + lat_rad / 2.0).tan()).ln();
    (x, y)
}
