use rand::Rng as RngCore;

use crate::rng::seeded;

/// Seeded 2D gradient noise.
///
/// `noise2` returns values in roughly `[-1, 1]`; the fractal variants are
/// normalised to `[0, 1]`.
#[derive(Debug, Clone)]
pub struct PerlinNoise {
    perm: [u8; 512],
}

impl PerlinNoise {
    pub fn new(seed: u64) -> Self {
        let mut table = [0u8; 256];
        for (i, v) in table.iter_mut().enumerate() {
            *v = i as u8;
        }
        let mut rng = seeded(seed);
        for i in (1..256).rev() {
            let j = (rng.next_u32() as usize) % (i + 1);
            table.swap(i, j);
        }
        let mut perm = [0u8; 512];
        for (i, v) in perm.iter_mut().enumerate() {
            *v = table[i & 255];
        }
        Self { perm }
    }

    fn hash(&self, x: usize, y: usize) -> u8 {
        self.perm[self.perm[x] as usize + y]
    }

    pub fn noise2(&self, x: f64, y: f64) -> f64 {
        if !x.is_finite() || !y.is_finite() {
            return 0.0;
        }
        let x0 = x.floor();
        let y0 = y.floor();
        let xi = (x0 as i64 & 255) as usize;
        let yi = (y0 as i64 & 255) as usize;
        let xf = x - x0;
        let yf = y - y0;
        let u = fade(xf);
        let v = fade(yf);

        let aa = self.hash(xi, yi);
        let ab = self.hash(xi, yi + 1);
        let ba = self.hash(xi + 1, yi);
        let bb = self.hash(xi + 1, yi + 1);

        let x1 = lerp(grad(aa, xf, yf), grad(ba, xf - 1.0, yf), u);
        let x2 = lerp(grad(ab, xf, yf - 1.0), grad(bb, xf - 1.0, yf - 1.0), u);
        lerp(x1, x2, v).clamp(-1.0, 1.0)
    }

    /// Fractal sum of `octaves` layers, mapped to `[0, 1]`.
    pub fn fbm(&self, x: f64, y: f64, octaves: u32) -> f64 {
        let (sum, norm) = self.octaves(x, y, octaves, |n| n);
        (sum / norm * 0.5 + 0.5).clamp(0.0, 1.0)
    }

    /// Ridged multifractal: sharp crests where the noise crosses zero.
    pub fn ridged(&self, x: f64, y: f64, octaves: u32) -> f64 {
        let (sum, norm) = self.octaves(x, y, octaves, |n| {
            let r = 1.0 - n.abs();
            r * r
        });
        (sum / norm).clamp(0.0, 1.0)
    }

    pub fn turbulence(&self, x: f64, y: f64, octaves: u32) -> f64 {
        let (sum, norm) = self.octaves(x, y, octaves, f64::abs);
        (sum / norm).clamp(0.0, 1.0)
    }

    fn octaves<F>(&self, x: f64, y: f64, octaves: u32, shape: F) -> (f64, f64)
    where
        F: Fn(f64) -> f64,
    {
        let mut sum = 0.0;
        let mut norm = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        for _ in 0..octaves.max(1) {
            sum += shape(self.noise2(x * frequency, y * frequency)) * amplitude;
            norm += amplitude;
            amplitude *= 0.5;
            frequency *= 2.0;
        }
        (sum, norm)
    }
}

fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

fn grad(hash: u8, x: f64, y: f64) -> f64 {
    match hash & 7 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        3 => -x - y,
        4 => x,
        5 => -x,
        6 => y,
        _ => -y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_at_lattice_points() {
        let n = PerlinNoise::new(3);
        assert_eq!(n.noise2(4.0, 7.0), 0.0);
        assert_eq!(n.noise2(-2.0, 0.0), 0.0);
    }

    #[test]
    fn test_seed_determinism() {
        let a = PerlinNoise::new(11);
        let b = PerlinNoise::new(11);
        let c = PerlinNoise::new(12);
        let samples: Vec<(f64, f64)> = (0..50).map(|i| (i as f64 * 0.37, i as f64 * 0.61)).collect();
        assert!(samples.iter().all(|&(x, y)| a.noise2(x, y) == b.noise2(x, y)));
        assert!(samples.iter().any(|&(x, y)| a.noise2(x, y) != c.noise2(x, y)));
    }

    #[test]
    fn test_fractal_ranges() {
        let n = PerlinNoise::new(5);
        for i in 0..200 {
            let (x, y) = (i as f64 * 0.173, i as f64 * -0.291);
            for v in [n.fbm(x, y, 4), n.ridged(x, y, 4), n.turbulence(x, y, 4)] {
                assert!((0.0..=1.0).contains(&v));
            }
        }
    }
}
