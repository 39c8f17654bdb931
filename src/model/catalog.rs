use nalgebra::Point3;

/// Diffuse texture applied to a body's surface.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum BodyTexture {
    Sun,
    Mercury,
    Venus,
    Earth,
    Mars,
    Moon,
}

impl BodyTexture {
    pub const ALL: [BodyTexture; 6] = [
        BodyTexture::Sun,
        BodyTexture::Mercury,
        BodyTexture::Venus,
        BodyTexture::Earth,
        BodyTexture::Mars,
        BodyTexture::Moon,
    ];

    /// File name, relative to the asset directory.
    pub fn file_name(self) -> &'static str {
        match self {
            BodyTexture::Sun => "2k_sun.jpg",
            BodyTexture::Mercury => "2k_mercury.jpg",
            BodyTexture::Venus => "2k_venus_surface.jpg",
            BodyTexture::Earth => "2k_earth_daymap.jpg",
            BodyTexture::Mars => "2k_mars.jpg",
            BodyTexture::Moon => "2k_moon.jpg",
        }
    }

    /// Key under which the texture is registered with the renderer.
    pub fn texture_name(self) -> &'static str {
        match self {
            BodyTexture::Sun => "body/sun",
            BodyTexture::Mercury => "body/mercury",
            BodyTexture::Venus => "body/venus",
            BodyTexture::Earth => "body/earth",
            BodyTexture::Mars => "body/mars",
            BodyTexture::Moon => "body/moon",
        }
    }

    /// Flat color drawn until the texture has loaded (or forever, if it never does).
    pub fn fallback_color(self) -> Point3<f32> {
        match self {
            BodyTexture::Sun => Point3::new(1.0, 0.8, 0.3),
            BodyTexture::Mercury => Point3::new(0.6, 0.58, 0.55),
            BodyTexture::Venus => Point3::new(0.85, 0.7, 0.45),
            BodyTexture::Earth => Point3::new(0.25, 0.45, 0.8),
            BodyTexture::Mars => Point3::new(0.75, 0.35, 0.2),
            BodyTexture::Moon => Point3::new(0.7, 0.7, 0.7),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    /// Ignores lights entirely.
    Basic,
    /// Ambient plus a single point light.
    Standard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceMaterial {
    pub texture: BodyTexture,
    pub shading: Shading,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoonSpec {
    pub name: &'static str,
    pub radius: f64,
    pub distance: f64,
    pub angular_speed: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CelestialBodySpec {
    pub name: &'static str,
    pub radius: f64,
    pub distance: f64,
    pub angular_speed: f64,
    pub surface: SurfaceMaterial,
    pub moons: &'static [MoonSpec],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub color: [f32; 3],
    pub intensity: f32,
    pub position: [f32; 3],
}

pub const SUN_SCALE: f64 = 5.0;

pub const SUN_MATERIAL: SurfaceMaterial = SurfaceMaterial {
    texture: BodyTexture::Sun,
    shading: Shading::Basic,
};

/// Shared by every moon in the system.
pub const MOON_MATERIAL: SurfaceMaterial = SurfaceMaterial {
    texture: BodyTexture::Moon,
    shading: Shading::Standard,
};

pub const AMBIENT_LIGHT: AmbientLight = AmbientLight {
    color: [1.0, 1.0, 1.0],
    intensity: 0.12,
};

// Sits inside the sun.
pub const POINT_LIGHT: PointLight = PointLight {
    color: [1.0, 1.0, 1.0],
    intensity: 2000.0,
    position: [0.0, 0.0, 0.0],
};

pub const CUBE_MAP_DIR: &str = "cubeMap";

/// Background faces, in +x, -x, +y, -y, +z, -z order.
pub const CUBE_MAP_FACES: [&str; 6] = ["px.png", "nx.png", "py.png", "ny.png", "pz.png", "nz.png"];

const fn standard(texture: BodyTexture) -> SurfaceMaterial {
    SurfaceMaterial {
        texture,
        shading: Shading::Standard,
    }
}

pub static PLANETS: [CelestialBodySpec; 4] = [
    CelestialBodySpec {
        name: "Mercury",
        radius: 0.5,
        distance: 10.0,
        angular_speed: 0.01,
        surface: standard(BodyTexture::Mercury),
        moons: &[],
    },
    CelestialBodySpec {
        name: "Venus",
        radius: 0.8,
        distance: 15.0,
        angular_speed: 0.007,
        surface: standard(BodyTexture::Venus),
        moons: &[],
    },
    CelestialBodySpec {
        name: "Earth",
        radius: 1.0,
        distance: 20.0,
        angular_speed: 0.005,
        surface: standard(BodyTexture::Earth),
        moons: &[MoonSpec {
            name: "Moon",
            radius: 0.3,
            distance: 2.5,
            angular_speed: 0.015,
        }],
    },
    CelestialBodySpec {
        name: "Mars",
        radius: 0.7,
        distance: 25.0,
        angular_speed: 0.003,
        surface: standard(BodyTexture::Mars),
        moons: &[
            MoonSpec {
                name: "Phobos",
                radius: 0.1,
                distance: 2.0,
                angular_speed: 0.02,
            },
            MoonSpec {
                name: "Deimos",
                radius: 0.2,
                distance: 3.0,
                angular_speed: 0.01,
            },
        ],
    },
];

pub fn find_planet(name: &str) -> Option<&'static CelestialBodySpec> {
    PLANETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    #[test]
    fn test_table_is_well_formed() {
        let mut names = HashSet::new();
        for planet in PLANETS.iter() {
            assert!(planet.radius > 0.0, "{} has no radius", planet.name);
            assert!(planet.distance >= 0.0);
            assert_eq!(planet.surface.shading, Shading::Standard);
            assert!(names.insert(planet.name));

            for moon in planet.moons {
                assert!(moon.radius > 0.0, "{} has no radius", moon.name);
                assert!(moon.distance >= 0.0);
                assert!(names.insert(moon.name));
            }
        }
    }

    #[test]
    fn test_moons_keep_table_order() {
        let mars = find_planet("mars").unwrap();
        let names: Vec<_> = mars.moons.iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["Phobos", "Deimos"]);

        assert_eq!(find_planet("Earth").unwrap().moons.len(), 1);
        assert!(find_planet("Pluto").is_none());
    }

    #[test]
    fn test_texture_names_are_distinct() {
        let files: HashSet<_> = BodyTexture::ALL.iter().map(|t| t.file_name()).collect();
        let keys: HashSet<_> = BodyTexture::ALL.iter().map(|t| t.texture_name()).collect();
        assert_eq!(files.len(), BodyTexture::ALL.len());
        assert_eq!(keys.len(), BodyTexture::ALL.len());
    }
}
