use crate::models::address::GeoPoint;

const EARTH_RADIUS_M: f64 = 6_371_000.0;

pub fn distance_meters(from: &GeoPoint, to: &GeoPoint) -> f64 {
    let phi1 = from.lat.to_radians();
    let phi2 = to.lat.to_radians();
    let delta_phi = (to.lat - from.lat).to_radians();
    let delta_lambda = (to.lng - from.lng).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::distance_meters;
    use crate::models::address::GeoPoint;

    #[test]
    fn same_point_is_zero() {
        let p = GeoPoint {
            lat: 48.8566,
            lng: 2.3522,
        };
        assert!(distance_meters(&p, &p) < 1e-6);
    }

    #[test]
    fn paris_to_lyon_is_around_391_km() {
        let paris = GeoPoint {
            lat: 48.8566,
            lng: 2.3522,
        };
        let lyon = GeoPoint {
            lat: 45.7640,
            lng: 4.8357,
        };
        let distance = distance_meters(&paris, &lyon);
        assert!((distance - 391_000.0).abs() < 5_000.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = GeoPoint {
            lat: 52.52,
            lng: 13.405,
        };
        let b = GeoPoint {
            lat: 53.5511,
            lng: 9.9937,
        };
        assert!((distance_meters(&a, &b) - distance_meters(&b, &a)).abs() < 1e-6);
    }
}
