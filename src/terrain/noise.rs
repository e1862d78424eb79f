//! Coherent 3D noise used for corner heights
//!
//! Heights only need a smooth scalar field over space. [`CoherentNoise3D`]
//! is the seam for plugging in another generator; [`PerlinNoise`] is the
//! built-in improved Perlin noise with seeded hashing.

use glam::Vec3;

/// Smooth scalar field over 3D space
///
/// Implementations should return values roughly in `[-1, 1]` and must be
/// deterministic for a given position.
pub trait CoherentNoise3D {
    fn noise(&self, p: Vec3) -> f32;
}

impl<N: CoherentNoise3D + ?Sized> CoherentNoise3D for &N {
    #[inline]
    fn noise(&self, p: Vec3) -> f32 {
        (**self).noise(p)
    }
}

// Ken Perlin's reference permutation
const PERM: [u32; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225, 140, 36, 103, 30, 69,
    142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148, 247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219,
    203, 117, 35, 11, 32, 57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122, 60, 211, 133, 230,
    220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54, 65, 25, 63, 161, 1, 216, 80, 73, 209, 76,
    132, 187, 208, 89, 18, 169, 200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198, 173,
    186, 3, 64, 52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212, 207, 206,
    59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213, 119, 248, 152, 2, 44, 154, 163,
    70, 221, 153, 101, 155, 167, 43, 172, 9, 129, 22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232,
    178, 185, 112, 104, 218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162,
    241, 81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157, 184, 84, 204,
    176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93, 222, 114, 67, 29, 24, 72, 243, 141,
    128, 195, 78, 66, 215, 61, 156, 180,
];

/// Improved Perlin noise, output roughly in `[-1, 1]`
///
/// The seed perturbs the lattice hash, so two seeds give unrelated fields
/// over the same coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PerlinNoise {
    seed: u32,
    seed_hash: u32,
}

impl PerlinNoise {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            seed_hash: seed.wrapping_mul(1103515245).wrapping_add(12345) >> 16,
        }
    }

    #[inline]
    pub fn seed(&self) -> u32 {
        self.seed
    }

    #[inline]
    fn hash(&self, x: i32, y: i32, z: i32) -> u32 {
        let ix = ((x as u32) ^ self.seed_hash) & 255;
        let iy = ((y as u32) ^ (self.seed_hash >> 8)) & 255;
        let iz = ((z as u32) ^ (self.seed_hash >> 16)) & 255;
        let a = PERM[ix as usize];
        let b = PERM[((a + iy) & 255) as usize];
        PERM[((b + iz) & 255) as usize]
    }
}

/// Dot product with one of the 12 cube edge gradients
#[inline]
fn gradient(hash: u32, x: f32, y: f32, z: f32) -> f32 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        z
    } else {
        x
    };
    let u = if h & 1 == 0 { -u } else { u };
    let v = if h & 2 == 0 { -v } else { v };
    u + v
}

/// 6t⁵ - 15t⁴ + 10t³
#[inline]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

impl CoherentNoise3D for PerlinNoise {
    fn noise(&self, p: Vec3) -> f32 {
        let cell = p.floor();
        let (x0, y0, z0) = (cell.x as i32, cell.y as i32, cell.z as i32);
        let f = p - cell;
        let (u, v, w) = (fade(f.x), fade(f.y), fade(f.z));

        let corner = |dx: i32, dy: i32, dz: i32| {
            let h = self.hash(x0 + dx, y0 + dy, z0 + dz);
            gradient(h, f.x - dx as f32, f.y - dy as f32, f.z - dz as f32)
        };

        let x00 = lerp(corner(0, 0, 0), corner(1, 0, 0), u);
        let x10 = lerp(corner(0, 1, 0), corner(1, 1, 0), u);
        let x01 = lerp(corner(0, 0, 1), corner(1, 0, 1), u);
        let x11 = lerp(corner(0, 1, 1), corner(1, 1, 1), u);
        lerp(lerp(x00, x10, v), lerp(x01, x11, v), w)
    }
}
