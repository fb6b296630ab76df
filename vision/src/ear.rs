use crate::landmarks::LandmarkSet;

/// Sentinel returned when an eye-aspect ratio cannot be measured.
///
/// Far above any plausible wink threshold, so an invalid reading can never
/// register as a closed eye.
pub const INVALID_EAR: f64 = 999.0;

/// Eye-aspect ratio from six eye landmarks: vertical opening over horizontal
/// width.
///
/// `eye` follows the ordering of [`crate::LEFT_EYE`] / [`crate::RIGHT_EYE`]:
/// [outer corner, upper 1, upper 2, inner corner, lower 1, lower 2]. Missing
/// landmarks or a degenerate (zero-width) eye yield [`INVALID_EAR`] rather
/// than NaN.
pub fn eye_aspect_ratio(landmarks: &LandmarkSet, eye: &[usize; 6]) -> f64 {
    let mut points = [None; 6];
    for (slot, &index) in points.iter_mut().zip(eye.iter()) {
        *slot = landmarks.get(index);
    }
    let [p0, p1, p2, p3, p4, p5] = points;
    let (Some(p0), Some(p1), Some(p2), Some(p3), Some(p4), Some(p5)) = (p0, p1, p2, p3, p4, p5)
    else {
        return INVALID_EAR;
    };

    let top = (p1.y as f64 + p2.y as f64) / 2.0;
    let bottom = (p4.y as f64 + p5.y as f64) / 2.0;
    let width = (p3.x as f64 - p0.x as f64).abs();
    if width == 0.0 {
        return INVALID_EAR;
    }
    (top - bottom).abs() / width
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::Landmark;

    fn set_with_eye(eye: &[usize; 6], coords: [(f32, f32); 6]) -> LandmarkSet {
        let max = *eye.iter().max().unwrap();
        let mut points = vec![
            Landmark {
                x: 0.0,
                y: 0.0,
                z: 0.0
            };
            max + 1
        ];
        for (&index, &(x, y)) in eye.iter().zip(coords.iter()) {
            points[index] = Landmark { x, y, z: 0.0 };
        }
        LandmarkSet(points)
    }

    #[test]
    fn open_eye_ratio() {
        let eye = crate::LEFT_EYE;
        // Width 0.10, vertical opening 0.03.
        let set = set_with_eye(
            &eye,
            [
                (0.40, 0.50),
                (0.43, 0.485),
                (0.46, 0.485),
                (0.50, 0.50),
                (0.46, 0.515),
                (0.43, 0.515),
            ],
        );
        let ear = eye_aspect_ratio(&set, &eye);
        assert!((ear - 0.3).abs() < 1e-6);
    }

    #[test]
    fn zero_width_is_sentinel() {
        let eye = crate::RIGHT_EYE;
        let set = set_with_eye(
            &eye,
            [
                (0.4, 0.5),
                (0.4, 0.48),
                (0.4, 0.48),
                (0.4, 0.5),
                (0.4, 0.52),
                (0.4, 0.52),
            ],
        );
        assert_eq!(eye_aspect_ratio(&set, &eye), INVALID_EAR);
    }

    #[test]
    fn missing_landmarks_are_sentinel() {
        let set = LandmarkSet(vec![]);
        assert_eq!(eye_aspect_ratio(&set, &crate::LEFT_EYE), INVALID_EAR);
    }
}
