//! HSACO binary emission.
//!
//! Lowers a prepared module to a relocatable object file under the system
//! temp directory, then links it into a loadable shared object with the
//! external `ld.lld`. Neither scratch file is deleted afterwards; callers
//! read the `.hsaco` after this returns and cleanup is left to the OS.

use std::fs;
use std::path::PathBuf;

use inkwell::module::Module;
use inkwell::targets::FileType;
use object::{Object, ObjectKind};

use crate::error::{TranslateError, TranslateResult};
use crate::linker;
use crate::scratch::ScratchPaths;
use crate::target::{prepare_module, TargetDescriptor};

/// Lower `module` to a linked `.hsaco` image and return its path.
///
/// A non-zero linker exit is logged with its code and captured stderr, but
/// the output path is still returned: once code generation succeeds this
/// function always hands back the expected `.hsaco` location, and callers
/// who need link status must watch the log channel. Only preparation and
/// object emission failures are errors.
pub fn emit_hsaco<'ctx>(
    module: &Module<'ctx>,
    descriptor: &TargetDescriptor,
) -> TranslateResult<PathBuf> {
    let machine = prepare_module(module, descriptor)?;

    let paths = ScratchPaths::fresh();
    machine
        .write_to_file(module, FileType::Object, &paths.object)
        .map_err(|message| TranslateError::ObjectEmission {
            path: paths.object.clone(),
            message: message.to_string(),
        })?;

    let outcome = linker::link_shared_object(&paths.object, &paths.hsaco);
    if outcome.success() {
        inspect_image(&paths.hsaco);
    } else {
        log::error!(
            "ld.lld failed with exit code {}: {}",
            outcome.code,
            outcome.stderr.trim_end(),
        );
    }

    Ok(paths.hsaco)
}

/// Sanity-read the linked image and log its shape. Diagnostics only.
fn inspect_image(path: &std::path::Path) {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(err) => {
            log::warn!("linked image {} is unreadable: {err}", path.display());
            return;
        }
    };
    match object::File::parse(&*data) {
        Ok(image) => {
            if image.kind() != ObjectKind::Dynamic {
                log::warn!("linked image {} is not a shared object", path.display());
            }
            log::debug!(
                "linked {} ({} bytes, {:?})",
                path.display(),
                data.len(),
                image.kind(),
            );
        }
        Err(err) => {
            log::warn!("linked image {} is not valid ELF: {err}", path.display());
        }
    }
}
