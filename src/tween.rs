use rand::Rng;

use crate::scene::Rgb;

pub const COLOR_TWEEN_SECONDS: f64 = 1.0;

pub fn ease_in_out_quad(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 { 2.0 * t * t } else { -1.0 + (4.0 - 2.0 * t) * t }
}

/// A body color to tween toward: dark, each channel in `[0.1, 0.4)`.
pub fn random_body_color(rng: &mut impl Rng) -> Rgb {
    [
        rng.gen_range(0.1..0.4),
        rng.gen_range(0.1..0.4),
        rng.gen_range(0.1..0.4),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorTween {
    from: Rgb,
    to: Rgb,
    start: f64,
    duration: f64,
}

impl ColorTween {
    pub fn new(from: Rgb, to: Rgb, start: f64, duration: f64) -> Self {
        Self { from, to, start, duration }
    }

    pub fn sample(&self, now: f64) -> Rgb {
        let k = if self.duration <= 0.0 {
            1.0
        } else {
            ease_in_out_quad((now - self.start) / self.duration) as f32
        };
        std::array::from_fn(|i| self.from[i] + (self.to[i] - self.from[i]) * k)
    }

    pub fn is_finished(&self, now: f64) -> bool {
        now - self.start >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn easing_curve() {
        assert_eq!(ease_in_out_quad(0.0), 0.0);
        assert_eq!(ease_in_out_quad(0.25), 0.125);
        assert_eq!(ease_in_out_quad(0.5), 0.5);
        assert_eq!(ease_in_out_quad(0.75), 0.875);
        assert_eq!(ease_in_out_quad(1.0), 1.0);
        assert_eq!(ease_in_out_quad(3.0), 1.0);
    }

    #[test]
    fn tween_runs_from_start_to_target() {
        let tween = ColorTween::new([0.0, 0.0, 0.0], [0.4, 0.2, 0.1], 10.0, COLOR_TWEEN_SECONDS);
        assert_eq!(tween.sample(9.0), [0.0, 0.0, 0.0]);
        let mid = tween.sample(10.5);
        assert!((mid[0] - 0.2).abs() < 1e-6);
        assert!(!tween.is_finished(10.5));
        assert_eq!(tween.sample(11.0), [0.4, 0.2, 0.1]);
        assert!(tween.is_finished(11.0));
    }

    #[test]
    fn random_colors_stay_dark() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..100 {
            let c = random_body_color(&mut rng);
            assert!(c.iter().all(|v| (0.1..0.4).contains(v)));
        }
    }
}
