//! Burst particles for snap and completion feedback.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const MAX_PARTICLES: usize = 512;
pub const GRAVITY: f32 = 0.15;
pub const LIFE_STEP: f32 = 0.02;
const SIZE_MIN: f32 = 2.0;
const SIZE_MAX: f32 = 5.0;

const SNAP_COLORS: [[u8; 3]; 3] = [[255, 215, 64], [255, 255, 255], [255, 170, 40]];
const AUTO_PLACE_COLORS: [[u8; 3]; 3] = [[90, 200, 255], [160, 120, 255], [255, 255, 255]];
const CELEBRATION_COLORS: [[u8; 3]; 5] = [
    [255, 99, 132],
    [255, 206, 86],
    [75, 192, 192],
    [54, 162, 235],
    [153, 102, 255],
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BurstKind {
    Snap,
    AutoPlace,
    Celebration,
}

impl BurstKind {
    pub fn count(self) -> usize {
        match self {
            BurstKind::Snap | BurstKind::AutoPlace => 10,
            BurstKind::Celebration => 50,
        }
    }

    /// Initial speed range in pixels per frame.
    pub fn speed_range(self) -> (f32, f32) {
        match self {
            BurstKind::Snap | BurstKind::AutoPlace => (1.0, 4.0),
            BurstKind::Celebration => (3.0, 10.0),
        }
    }

    fn palette(self) -> &'static [[u8; 3]] {
        match self {
            BurstKind::Snap => &SNAP_COLORS,
            BurstKind::AutoPlace => &AUTO_PLACE_COLORS,
            BurstKind::Celebration => &CELEBRATION_COLORS,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub position: (f32, f32),
    pub velocity: (f32, f32),
    pub color: [u8; 3],
    pub life: f32,
    pub size: f32,
}

impl Particle {
    /// Advances one frame. Returns false once the particle is spent.
    pub fn step(&mut self) -> bool {
        self.position.0 += self.velocity.0;
        self.position.1 += self.velocity.1;
        self.velocity.1 += GRAVITY;
        self.life -= LIFE_STEP;
        self.life > 0.0
    }

    pub fn opacity(&self) -> f32 {
        self.life.clamp(0.0, 1.0)
    }

    pub fn css_color(&self) -> String {
        let [r, g, b] = self.color;
        format!("rgba({}, {}, {}, {:.3})", r, g, b, self.opacity())
    }
}

#[derive(Clone, Debug)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    rng: StdRng,
}

impl ParticleSystem {
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Spawns up to `kind.count()` particles at a point; returns how many fit in
    /// the pool.
    pub fn spawn(&mut self, x: f32, y: f32, kind: BurstKind) -> usize {
        let room = MAX_PARTICLES.saturating_sub(self.particles.len());
        let count = kind.count().min(room);
        if count == 0 {
            log::debug!("particles: pool full, dropped {:?} burst", kind);
            return 0;
        }
        let (speed_min, speed_max) = kind.speed_range();
        let palette = kind.palette();
        for _ in 0..count {
            let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
            let speed = self.rng.random_range(speed_min..speed_max);
            let color = palette[self.rng.random_range(0..palette.len())];
            let size = self.rng.random_range(SIZE_MIN..SIZE_MAX);
            self.particles.push(Particle {
                position: (x, y),
                velocity: (angle.cos() * speed, angle.sin() * speed),
                color,
                life: 1.0,
                size,
            });
        }
        count
    }

    pub fn step(&mut self) {
        self.particles.retain_mut(Particle::step);
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
