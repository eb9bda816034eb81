//! End-to-end translation: one IR module in, both artifacts out.

use std::path::PathBuf;

use inkwell::module::Module;

use crate::assembly::emit_amdgcn;
use crate::binary::emit_hsaco;
use crate::error::TranslateResult;
use crate::target::{initialize_amdgpu, TargetDescriptor};

/// Both artifacts of one translation run.
#[derive(Debug, Clone)]
pub struct CompiledKernel {
    /// AMDGCN assembly text.
    pub amdgcn: String,
    /// Path of the linked `.hsaco` image under the system temp directory.
    /// The file persists after the call; see [`crate::binary::emit_hsaco`]
    /// for the link-failure contract.
    pub hsaco: PathBuf,
}

/// Translate `module` for `descriptor`, producing assembly text and a
/// linked HSACO image.
///
/// The module is cloned once so the two codegen runs operate on distinct
/// instances: preparation mutates its module (triple, data layout,
/// attributes) and a target machine must never be shared across runs. The
/// caller keeps ownership of `module`; the clone lives only for the binary
/// path. The pipeline itself is stateless and may be invoked concurrently
/// from many threads.
pub fn translate<'ctx>(
    module: &Module<'ctx>,
    descriptor: &TargetDescriptor,
) -> TranslateResult<CompiledKernel> {
    initialize_amdgpu();

    let binary_module = module.clone();
    let amdgcn = emit_amdgcn(module, descriptor)?;
    let hsaco = emit_hsaco(&binary_module, descriptor)?;

    Ok(CompiledKernel { amdgcn, hsaco })
}
