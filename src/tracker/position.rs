use chrono::{DateTime, Utc};
use sgp4::{Constants, Elements};

use crate::catalog::ElementSet;
use crate::tracker::{Position, TrackerError};

// WGS-84
const EARTH_RADIUS_KM: f64 = 6378.137;
const EARTH_POLAR_RADIUS_KM: f64 = 6356.7523142;
const GEODETIC_ITERATIONS: usize = 20;
const GEODETIC_TOLERANCE_RAD: f64 = 1e-12;

const METERS_PER_KM: f64 = 1000.0;
const SECONDS_PER_HOUR: f64 = 3600.0;

/// Turns an element set into a ground position.
///
/// `Err` means the position is unusable for this tick, whatever the cause.
pub trait Propagator {
    fn resolve(&self, elements: &ElementSet, at: DateTime<Utc>) -> Result<Position, TrackerError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Sgp4Propagator;

impl Propagator for Sgp4Propagator {
    fn resolve(&self, elements: &ElementSet, at: DateTime<Utc>) -> Result<Position, TrackerError> {
        resolve(elements, at)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geodetic {
    pub latitude_rad: f64,
    pub longitude_rad: f64,
    pub height_km: f64,
}

pub fn resolve(elements: &ElementSet, at: DateTime<Utc>) -> Result<Position, TrackerError> {
    let parsed = Elements::from_tle(
        None,
        elements.line1.as_bytes(),
        elements.line2.as_bytes(),
    )?;
    let constants = Constants::from_elements(&parsed)?;

    let minutes = parsed
        .datetime_to_minutes_since_epoch(&at.naive_utc())
        .map_err(|e| TrackerError::Propagation(e.to_string()))?;
    let prediction = constants.propagate(minutes)?;

    let geodetic = eci_to_geodetic(prediction.position, sidereal_time(at));
    position_from_geodetic(geodetic, prediction.velocity)
}

/// Greenwich sidereal time in radians
pub fn sidereal_time(at: DateTime<Utc>) -> f64 {
    sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&at.naive_utc()))
}

/// Unit conversions and the validity check shared by every propagator.
pub fn position_from_geodetic(
    geodetic: Geodetic,
    velocity_km_s: [f64; 3],
) -> Result<Position, TrackerError> {
    let latitude_deg = geodetic.latitude_rad.to_degrees();
    let longitude_deg = geodetic.longitude_rad.to_degrees();
    if !latitude_deg.is_finite() || !longitude_deg.is_finite() {
        return Err(TrackerError::NonFinite);
    }

    let speed_km_s = (velocity_km_s[0] * velocity_km_s[0]
        + velocity_km_s[1] * velocity_km_s[1]
        + velocity_km_s[2] * velocity_km_s[2])
        .sqrt();

    Ok(Position {
        latitude_deg,
        longitude_deg,
        altitude_m: geodetic.height_km * METERS_PER_KM,
        speed_kmh: speed_km_s * SECONDS_PER_HOUR,
    })
}

pub fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

/// Geodetic latitude/longitude/height of an inertial position, longitude
/// wrapped to [-pi, pi].
pub fn eci_to_geodetic(pos_eci_km: [f64; 3], gmst: f64) -> Geodetic {
    let [x, y, z] = teme_to_ecef_position(pos_eci_km, gmst);

    let flattening = (EARTH_RADIUS_KM - EARTH_POLAR_RADIUS_KM) / EARTH_RADIUS_KM;
    let e2 = 2.0 * flattening - flattening * flattening;
    let r = (x * x + y * y).sqrt();

    let longitude_rad = y.atan2(x);

    let mut latitude_rad = z.atan2(r);
    let mut c = 1.0;
    for _ in 0..GEODETIC_ITERATIONS {
        let previous = latitude_rad;
        let sin_lat = latitude_rad.sin();
        c = 1.0 / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        latitude_rad = (z + EARTH_RADIUS_KM * c * e2 * sin_lat).atan2(r);
        if (latitude_rad - previous).abs() < GEODETIC_TOLERANCE_RAD {
            break;
        }
    }

    // r/cos(lat) degenerates towards the poles, z/sin(lat) towards the equator
    let (sin_lat, cos_lat) = latitude_rad.sin_cos();
    let height_km = if cos_lat.abs() >= sin_lat.abs() {
        r / cos_lat - EARTH_RADIUS_KM * c
    } else {
        z / sin_lat - EARTH_RADIUS_KM * c * (1.0 - e2)
    };

    Geodetic {
        latitude_rad,
        longitude_rad,
        height_km,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn iss() -> ElementSet {
        ElementSet::new(
            "1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992",
            "2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008",
        )
        .unwrap()
    }

    #[test]
    fn iss_position_is_plausible() {
        let at = Utc.with_ymd_and_hms(2020, 7, 12, 22, 0, 0).unwrap();
        let position = resolve(&iss(), at).unwrap();

        assert!(position.latitude_deg.abs() <= 51.7);
        assert!((-180.0..=180.0).contains(&position.longitude_deg));
        assert!((350_000.0..450_000.0).contains(&position.altitude_m));
        assert!((26_000.0..29_000.0).contains(&position.speed_kmh));
    }

    #[test]
    fn resolve_is_pure() {
        let at = Utc.with_ymd_and_hms(2020, 7, 13, 3, 30, 0).unwrap();
        assert_eq!(resolve(&iss(), at).unwrap(), resolve(&iss(), at).unwrap());
    }

    #[test]
    fn malformed_lines_are_invalid() {
        let garbage = ElementSet::new("1 garbage", "2 garbage").unwrap();
        let at = Utc.with_ymd_and_hms(2020, 7, 12, 22, 0, 0).unwrap();
        assert!(resolve(&garbage, at).is_err());
    }

    #[test]
    fn nan_latitude_is_invalid() {
        let geodetic = Geodetic {
            latitude_rad: f64::NAN,
            longitude_rad: 0.3,
            height_km: 420.0,
        };
        assert!(matches!(
            position_from_geodetic(geodetic, [7.0, 0.0, 0.0]),
            Err(TrackerError::NonFinite)
        ));
    }

    #[test]
    fn units_are_converted() {
        let geodetic = Geodetic {
            latitude_rad: 0.5_f64.to_radians(),
            longitude_rad: (-120.0_f64).to_radians(),
            height_km: 420.5,
        };
        let position = position_from_geodetic(geodetic, [3.0, 4.0, 0.0]).unwrap();
        assert!((position.latitude_deg - 0.5).abs() < 1e-9);
        assert!((position.longitude_deg + 120.0).abs() < 1e-9);
        assert!((position.altitude_m - 420_500.0).abs() < 1e-6);
        assert!((position.speed_kmh - 18_000.0).abs() < 1e-9);
    }

    #[test]
    fn equatorial_point_has_zero_latitude() {
        let geodetic = eci_to_geodetic([EARTH_RADIUS_KM + 400.0, 0.0, 0.0], 0.0);
        assert!(geodetic.latitude_rad.abs() < 1e-12);
        assert!(geodetic.longitude_rad.abs() < 1e-12);
        assert!((geodetic.height_km - 400.0).abs() < 1e-6);
    }

    #[test]
    fn point_over_a_pole_keeps_its_height() {
        let north = eci_to_geodetic([0.0, 0.0, 7000.0], 0.0);
        assert!((north.latitude_rad - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!((north.height_km - (7000.0 - EARTH_POLAR_RADIUS_KM)).abs() < 1e-6);

        let south = eci_to_geodetic([0.0, 0.0, -7000.0], 1.0);
        assert!((south.latitude_rad + std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!((south.height_km - (7000.0 - EARTH_POLAR_RADIUS_KM)).abs() < 1e-6);
    }

    #[test]
    fn height_grows_smoothly_towards_the_poles() {
        // same geocentric radius, so only the ellipsoid surface moves
        let mut previous = f64::NEG_INFINITY;
        for degrees in (0..=90).step_by(5) {
            let angle = (degrees as f64).to_radians();
            let geodetic = eci_to_geodetic([7000.0 * angle.cos(), 0.0, 7000.0 * angle.sin()], 0.0);
            assert!(geodetic.height_km >= 7000.0 - EARTH_RADIUS_KM - 1e-6);
            assert!(geodetic.height_km <= 7000.0 - EARTH_POLAR_RADIUS_KM + 1e-6);
            assert!(geodetic.height_km >= previous - 1e-9, "drop at {} deg", degrees);
            previous = geodetic.height_km;
        }
    }

    #[test]
    fn sidereal_rotation_shifts_longitude_west() {
        let geodetic = eci_to_geodetic([7000.0, 0.0, 0.0], std::f64::consts::FRAC_PI_2);
        assert!((geodetic.longitude_rad + std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }
}
