use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use kiss3d::resource::TextureManager;
use log::info;

use super::scene::SceneContext;
use super::skybox::SkyboxRenderer;
use crate::assets::{TextureKey, TextureSet};
use crate::model::catalog::CUBE_MAP_FACES;

fn registered_name(key: TextureKey) -> String {
    match key {
        TextureKey::Body(texture) => texture.texture_name().to_owned(),
        TextureKey::SkyFace(idx) => format!("sky/{}", CUBE_MAP_FACES[idx]),
    }
}

pub struct TextureCache {
    loads: TextureSet<TextureKey>,
    context: Rc<RefCell<SceneContext>>,
}

impl TextureCache {
    pub fn start(asset_dir: &Path, context: Rc<RefCell<SceneContext>>) -> Self {
        let loads = TextureSet::load_all(asset_dir);
        info!(
            "Loading {} textures from {}",
            loads.num_pending(),
            asset_dir.display()
        );
        TextureCache { loads, context }
    }

    pub fn is_settled(&self) -> bool {
        self.loads.is_settled()
    }

    // Must run on the thread that owns the GL context
    pub fn poll(&mut self, skybox: &mut SkyboxRenderer) {
        for (key, image) in self.loads.poll() {
            let name = registered_name(key);
            let mut image = Some(image);
            let texture = TextureManager::get_global_manager(|tm| {
                image.take().map(|image| tm.add_image(image, &name))
            });
            let texture = match texture {
                Some(texture) => texture,
                None => continue,
            };

            match key {
                TextureKey::Body(body) => self.context.borrow_mut().bindings_mut().apply(body),
                TextureKey::SkyFace(idx) => skybox.set_face(idx, texture),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use kiss3d::resource::Texture;

    #[test]
    fn test_decoded_images_fit_texture_manager() {
        // Whatever the loader threads decode must be what kiss3d uploads
        let upload: fn(&mut TextureManager, image::DynamicImage, &str) -> Rc<Texture> =
            TextureManager::add_image;
        let _ = upload;
    }
}
