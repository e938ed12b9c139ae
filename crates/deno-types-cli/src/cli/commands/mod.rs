pub mod ci;
mod dispatch;
pub mod generate;

pub use dispatch::dispatch;

use std::path::Path;

use deno_types_core::{GenResult, TypeScriptLibs};

pub(crate) fn load_ts_libs(dir: Option<&Path>) -> GenResult<TypeScriptLibs> {
    match dir {
        Some(dir) => {
            let libs = TypeScriptLibs::from_dir(dir)?;
            tracing::info!("Using {} TypeScript libs from {}", libs.len(), dir.display());
            Ok(libs)
        }
        None => Ok(TypeScriptLibs::builtin()),
    }
}
