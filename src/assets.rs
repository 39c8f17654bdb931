//! Background texture loading.
//!
//! Each texture is read and decoded on its own thread. The render thread polls
//! the handles once per frame; anything still pending just keeps its fallback
//! appearance for another frame.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use image::DynamicImage;
use log::{debug, warn};
use thiserror::Error;

use crate::model::catalog::{BodyTexture, CUBE_MAP_DIR, CUBE_MAP_FACES};

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("loader thread for {path} went away without a result")]
    Disconnected { path: PathBuf },
}

#[derive(Debug)]
pub enum TextureStatus {
    Pending,
    Ready(DynamicImage),
    Failed(TextureError),
}

/// A texture that is loading in the background.
#[derive(Debug)]
pub struct PendingTexture {
    path: PathBuf,
    receiver: Receiver<Result<DynamicImage, TextureError>>,
}

impl PendingTexture {
    pub fn spawn(path: PathBuf) -> Self {
        let (sender, receiver) = mpsc::channel();
        let thread_path = path.clone();
        thread::spawn(move || {
            // Nobody to tell if the receiving side is already gone
            let _ = sender.send(load_image(&thread_path));
        });
        PendingTexture { path, receiver }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Checks for a result without blocking. `Ready` and `Failed` are only
    /// reported once; afterwards the handle reports `Failed(Disconnected)`.
    pub fn poll(&self) -> TextureStatus {
        match self.receiver.try_recv() {
            Ok(Ok(image)) => TextureStatus::Ready(image),
            Ok(Err(err)) => TextureStatus::Failed(err),
            Err(TryRecvError::Empty) => TextureStatus::Pending,
            Err(TryRecvError::Disconnected) => TextureStatus::Failed(TextureError::Disconnected {
                path: self.path.clone(),
            }),
        }
    }
}

fn load_image(path: &Path) -> Result<DynamicImage, TextureError> {
    let bytes = std::fs::read(path).map_err(|source| TextureError::Io {
        path: path.to_owned(),
        source,
    })?;
    image::load_from_memory(&bytes).map_err(|source| TextureError::Decode {
        path: path.to_owned(),
        source,
    })
}

/// Everything the scene textures itself with.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum TextureKey {
    Body(BodyTexture),
    /// Index into `CUBE_MAP_FACES`.
    SkyFace(usize),
}

impl TextureKey {
    pub fn all() -> impl Iterator<Item = TextureKey> {
        BodyTexture::ALL
            .iter()
            .copied()
            .map(TextureKey::Body)
            .chain((0..CUBE_MAP_FACES.len()).map(TextureKey::SkyFace))
    }

    pub fn path_in(self, asset_dir: &Path) -> PathBuf {
        match self {
            TextureKey::Body(texture) => asset_dir.join(texture.file_name()),
            TextureKey::SkyFace(idx) => asset_dir.join(CUBE_MAP_DIR).join(CUBE_MAP_FACES[idx]),
        }
    }
}

/// A batch of in-flight textures, keyed by what they will be used for.
#[derive(Debug)]
pub struct TextureSet<K> {
    pending: Vec<(K, PendingTexture)>,
}

impl<K: Copy> TextureSet<K> {
    pub fn new() -> Self {
        TextureSet { pending: vec![] }
    }

    pub fn load(&mut self, key: K, path: PathBuf) {
        self.pending.push((key, PendingTexture::spawn(path)));
    }

    pub fn num_pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_settled(&self) -> bool {
        self.pending.is_empty()
    }

    /// Returns the textures that finished since the last call. Failures are
    /// logged and dropped, leaving whatever used them on its fallback.
    pub fn poll(&mut self) -> Vec<(K, DynamicImage)> {
        let mut ready = vec![];
        self.pending.retain(|(key, texture)| match texture.poll() {
            TextureStatus::Pending => true,
            TextureStatus::Ready(image) => {
                debug!("Loaded texture {}", texture.path().display());
                ready.push((*key, image));
                false
            }
            TextureStatus::Failed(err) => {
                warn!("{}", err);
                false
            }
        });
        ready
    }
}

impl<K: Copy> Default for TextureSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureSet<TextureKey> {
    /// Kicks off loads for every body texture and background face.
    pub fn load_all(asset_dir: &Path) -> Self {
        let mut set = TextureSet::new();
        for key in TextureKey::all() {
            set.load(key, key.path_in(asset_dir));
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::{Duration, Instant};

    use image::GenericImageView;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("solar-orrery-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn wait_for(texture: &PendingTexture) -> TextureStatus {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            match texture.poll() {
                TextureStatus::Pending if Instant::now() < deadline => {
                    thread::sleep(Duration::from_millis(5))
                }
                status => return status,
            }
        }
    }

    #[test]
    fn test_ready_texture() {
        let path = scratch_dir("ready").join("tiny.png");
        image::RgbaImage::from_pixel(2, 3, image::Rgba([255, 0, 0, 255]))
            .save(&path)
            .unwrap();

        match wait_for(&PendingTexture::spawn(path)) {
            TextureStatus::Ready(image) => {
                assert_eq!(image.width(), 2);
                assert_eq!(image.height(), 3);
            }
            other => panic!("Expected a texture, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_texture_fails() {
        let path = scratch_dir("missing").join("nope.jpg");
        match wait_for(&PendingTexture::spawn(path.clone())) {
            TextureStatus::Failed(TextureError::Io { path: p, .. }) => assert_eq!(p, path),
            other => panic!("Expected an IO failure, got {:?}", other),
        }
    }

    #[test]
    fn test_garbage_texture_fails() {
        let path = scratch_dir("garbage").join("garbage.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        match wait_for(&PendingTexture::spawn(path)) {
            TextureStatus::Failed(TextureError::Decode { .. }) => {}
            other => panic!("Expected a decode failure, got {:?}", other),
        }
    }

    #[test]
    fn test_set_drains() {
        let dir = scratch_dir("set");
        image::RgbImage::new(1, 1).save(dir.join("a.png")).unwrap();

        let mut set = TextureSet::new();
        set.load(1, dir.join("a.png"));
        set.load(2, dir.join("missing.png"));
        assert_eq!(set.num_pending(), 2);

        let deadline = Instant::now() + Duration::from_secs(10);
        let mut loaded = vec![];
        while !set.is_settled() && Instant::now() < deadline {
            loaded.extend(set.poll().into_iter().map(|(key, _)| key));
            thread::sleep(Duration::from_millis(5));
        }

        assert!(set.is_settled());
        assert_eq!(loaded, vec![1]);
    }

    #[test]
    fn test_keys_cover_every_file() {
        let dir = Path::new("textures");
        let paths: Vec<_> = TextureKey::all().map(|k| k.path_in(dir)).collect();
        assert_eq!(paths.len(), 12);
        assert!(paths.contains(&dir.join("2k_earth_daymap.jpg")));
        assert!(paths.contains(&dir.join("cubeMap").join("nz.png")));
    }
}
