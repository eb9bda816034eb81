//! AMDGCN assembly emission.
//!
//! Runs the target machine's file-emission passes with assembly output
//! captured in memory. No scratch files are touched on this path.

use inkwell::module::Module;
use inkwell::targets::FileType;

use crate::error::{TranslateError, TranslateResult};
use crate::target::{prepare_module, TargetDescriptor};

/// Env toggle dumping generated assembly to stderr.
const DUMP_ENV: &str = "AMDGCN_ENABLE_DUMP";

/// Lower `module` to AMDGCN assembly text.
///
/// Prepares the module (mutating it, see [`prepare_module`]) and captures
/// the assembly printer's output in memory. With `AMDGCN_ENABLE_DUMP` set
/// to a truthy value the text is also written to stderr under a banner.
pub fn emit_amdgcn<'ctx>(
    module: &Module<'ctx>,
    descriptor: &TargetDescriptor,
) -> TranslateResult<String> {
    let machine = prepare_module(module, descriptor)?;

    let buffer = machine
        .write_to_memory_buffer(module, FileType::Assembly)
        .map_err(|message| TranslateError::AssemblyEmission {
            message: message.to_string(),
        })?;
    let amdgcn = String::from_utf8_lossy(buffer.as_slice()).into_owned();

    if dump_enabled() {
        eprintln!("// -----// AMDGCN Dump //----- //\n{amdgcn}");
    }

    Ok(amdgcn)
}

fn dump_enabled() -> bool {
    bool_env(DUMP_ENV)
}

/// Truthy values match the original toggle: `1`, `true`, `on`.
fn bool_env(name: &str) -> bool {
    matches!(
        std::env::var(name).as_deref(),
        Ok("1") | Ok("true") | Ok("on")
    )
}
