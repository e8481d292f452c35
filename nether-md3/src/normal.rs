//! Packed normal encoding
//!
//! MD3 stores a vertex normal as two 8-bit spherical angles in one 16-bit
//! value: latitude in the high byte, longitude in the low byte. Both angles
//! are quantized in steps of `2π / 255`.
//!
//! ```text
//! longitude = atan2(-ny, -nx)   normalized to [0, 2π)
//! latitude  = acos(-nz)
//! packed    = round(255 * latitude / 2π) * 256 + round(255 * longitude / 2π)
//! ```

use std::f64::consts::TAU;

use glam::Vec3;

/// Pack a unit normal into the 16-bit latitude/longitude encoding
pub fn pack_normal(normal: Vec3) -> u16 {
    let nx = f64::from(normal.x);
    let ny = f64::from(normal.y);
    let nz = f64::from(normal.z);

    // At the poles the sign of zero decides the longitude; +0/+0 lands on
    // atan2(-0, -0) = -π, i.e. half a turn.
    let angle = (-ny).atan2(-nx);
    let longitude = if angle < 0.0 { angle + TAU } else { angle };
    let latitude = (-nz).clamp(-1.0, 1.0).acos();

    let lng = quantize_angle(longitude);
    let lat = quantize_angle(latitude);
    lat * 256 + lng
}

/// Rebuild a unit normal from its packed form
pub fn unpack_normal(packed: u16) -> Vec3 {
    let longitude = f64::from(packed % 256) * TAU / 255.0;
    let latitude = f64::from(packed / 256) * TAU / 255.0;

    let (sin_lat, cos_lat) = latitude.sin_cos();
    let (sin_lng, cos_lng) = longitude.sin_cos();
    Vec3::new(
        (-cos_lng * sin_lat) as f32,
        (-sin_lng * sin_lat) as f32,
        (-cos_lat) as f32,
    )
}

fn quantize_angle(angle: f64) -> u16 {
    (255.0 * angle / TAU).round().clamp(0.0, 255.0) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Angular distance between two packed values, per component, wrapping
    /// longitude around the circle.
    fn packed_distance(a: u16, b: u16) -> (u16, u16) {
        let lat = (a / 256).abs_diff(b / 256);
        let lng = (a % 256).abs_diff(b % 256);
        (lat, lng.min(255 - lng))
    }

    #[test]
    fn test_poles() {
        assert_eq!(pack_normal(Vec3::NEG_Z), 128);
        assert_eq!(pack_normal(Vec3::Z), 128 * 256 + 128);
        assert!(unpack_normal(128).abs_diff_eq(Vec3::NEG_Z, 1e-6));
        assert!(unpack_normal(0).abs_diff_eq(Vec3::NEG_Z, 1e-6));
    }

    #[test]
    fn test_pole_longitude_follows_zero_sign() {
        assert_eq!(pack_normal(Vec3::new(-0.0, -0.0, -1.0)), 0);
        assert_eq!(pack_normal(Vec3::new(-0.0, 0.0, 1.0)), 128 * 256);
    }

    #[test]
    fn test_north_pole_repack_settles() {
        // +Z decodes just past the pole, then stays put
        let once = pack_normal(unpack_normal(pack_normal(Vec3::Z)));
        assert_eq!(once / 256, 127);
        assert!(once % 256 <= 1, "{once:#06x}");
        assert_eq!(pack_normal(unpack_normal(once)), once);
    }

    #[test]
    fn test_axis_normals() {
        // -x faces longitude 0, latitude π/2
        assert_eq!(pack_normal(Vec3::NEG_X), 64 * 256);
        // +x faces longitude π
        assert_eq!(pack_normal(Vec3::X), 64 * 256 + 128);
        // -y faces longitude π/2
        assert_eq!(pack_normal(Vec3::NEG_Y), 64 * 256 + 64);
    }

    #[test]
    fn test_unpack_is_unit_length() {
        for packed in [0u16, 1, 255, 256, 0x4040, 0x7F80, 0x8000] {
            let n = unpack_normal(packed);
            assert!((n.length() - 1.0).abs() < 1e-5, "packed {packed:#06x}");
        }
    }

    #[test]
    fn test_axis_round_trip() {
        for axis in [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::NEG_Z] {
            let back = unpack_normal(pack_normal(axis));
            assert!(back.abs_diff_eq(axis, 0.02), "{axis} -> {back}");
        }
    }

    proptest! {
        #[test]
        fn prop_round_trip_within_one_step(
            theta in 0.05f32..3.09,
            phi in 0.0f32..std::f32::consts::TAU,
        ) {
            let normal = Vec3::new(
                theta.sin() * phi.cos(),
                theta.sin() * phi.sin(),
                theta.cos(),
            );
            let back = unpack_normal(pack_normal(normal));
            // Two angles each off by at most half a step of 2π/255
            prop_assert!(normal.angle_between(back) < 0.04, "{} -> {}", normal, back);
        }

        #[test]
        fn prop_repack_is_stable(lat in 1u16..128, lng in 0u16..256) {
            let packed = lat * 256 + lng;
            let once = pack_normal(unpack_normal(packed));
            let (dlat, dlng) = packed_distance(packed, once);
            prop_assert!(dlat <= 1 && dlng <= 1, "{:#06x} -> {:#06x}", packed, once);

            let twice = pack_normal(unpack_normal(once));
            prop_assert_eq!(once, twice);
        }
    }
}
