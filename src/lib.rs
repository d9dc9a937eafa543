//! Custom Info - live text templates over a simulation's object directory
//!
//! This library renders templates such as `Speed: {Player.Speed}` by
//! resolving type references against a [`Host`], locating live instances,
//! walking member chains and formatting the results.
//!
//! # Example
//!
//! ```rust
//! use custom_info::{render, SceneFile};
//!
//! let world = SceneFile::from_str(r#"
//!     [[types]]
//!     name = "Celeste.Player"
//!     module = "Celeste"
//!     kind = "entity"
//!     fields = ["Speed"]
//!
//!     [[types]]
//!     name = "Celeste.Level"
//!     module = "Celeste"
//!
//!     [[objects]]
//!     type = "Celeste.Player"
//!     values = { Speed = [90.0, 0.0] }
//!
//!     [scene]
//!     type = "Celeste.Level"
//! "#).unwrap().into_world().unwrap();
//!
//! assert_eq!(render("Speed: {Player.Speed}", &world), "Speed: (90.00, 0.00)");
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod template;

pub use config::{ConfigError, InfoConfig, PrecisionOverrides};
pub use engine::InfoEngine;
pub use error::ExpressionError;
pub use host::{Host, SceneError, SceneFile, World};

use std::path::Path;

use thiserror::Error;

/// Errors that can occur while loading inputs for a render
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("scene error: {0}")]
    Scene(#[from] SceneError),
}

/// Render a template against `host` with the default configuration
pub fn render(template: &str, host: &dyn Host) -> String {
    render_with_config(host, InfoConfig::default().with_template(template))
}

/// Render the template held by `config` against `host`
pub fn render_with_config(host: &dyn Host, config: InfoConfig) -> String {
    let mut engine = InfoEngine::new(config, host);
    engine.get_info(host, None)
}

/// Load a scene file and an optional config file
pub fn load(scene: &Path, config: Option<&Path>) -> Result<(World, InfoConfig), LoadError> {
    let world = SceneFile::from_file(scene)?.into_world()?;
    let config = match config {
        Some(path) => InfoConfig::from_file(path)?,
        None => InfoConfig::default(),
    };
    Ok((world, config))
}
