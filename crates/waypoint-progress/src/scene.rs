//! The scene-loading seam.

/// Loads a scene by identifier.
///
/// Fire-and-forget: the progress controller calls this once it has decided
/// where the player goes and never looks at the result. Whatever owns the
/// scene graph implements it; closures work too, which is handy for tests
/// and headless tools.
pub trait SceneLoader: Send + Sync + 'static {
    fn load_scene(&self, scene: &str);
}

impl<F> SceneLoader for F
where
    F: Fn(&str) + Send + Sync + 'static,
{
    fn load_scene(&self, scene: &str) {
        self(scene)
    }
}
