// This module owns everything target-related in the pipeline: one-time registration of
// the AMDGPU backend with LLVM's global target registry, the TargetDescriptor tuple that
// fully determines a backend configuration, the kernel floating-point policy, and
// prepare_module, which verifies an IR module and binds it to a configured TargetMachine.
// Preparation mutates the module in place (triple, data layout, per-function attributes),
// so each codegen run must prepare its own module instance and never share one. The
// TargetMachine handed back is owned by the caller and lives for a single emission run.

//! AMDGPU target registration and per-module target machine setup.

use std::sync::Once;

use inkwell::attributes::{Attribute, AttributeLoc};
use inkwell::context::ContextRef;
use inkwell::module::Module;
use inkwell::targets::{
    CodeModel, InitializationConfig, RelocMode, Target, TargetMachine, TargetTriple,
};
use inkwell::values::FunctionValue;
use inkwell::OptimizationLevel;

use crate::error::{TranslateError, TranslateResult};

static AMDGPU_INIT: Once = Once::new();

/// Register the AMDGPU backend with the global target registry.
///
/// Covers the target itself, its target-info, the MC layer and the assembly
/// parser/printer. Idempotent and safe under concurrent first calls; if
/// registration is unavailable the subsequent target lookup fails instead.
pub fn initialize_amdgpu() {
    AMDGPU_INIT.call_once(|| {
        Target::initialize_amd_gpu(&InitializationConfig {
            asm_parser: true,
            asm_printer: true,
            base: true,
            disassembler: false,
            info: true,
            machine_code: true,
        });
    });
}

/// The (processor, triple, features) tuple identifying one backend configuration.
///
/// Passed by value through the pipeline; immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDescriptor {
    /// Processor name, e.g. `gfx90a`.
    pub arch: String,
    /// Target triple, e.g. `amdgcn-amd-amdhsa`.
    pub triple: String,
    /// Feature string, e.g. `+sramecc,-xnack`.
    pub features: String,
}

impl TargetDescriptor {
    pub fn new(
        arch: impl Into<String>,
        triple: impl Into<String>,
        features: impl Into<String>,
    ) -> Self {
        Self {
            arch: arch.into(),
            triple: triple.into(),
            features: features.into(),
        }
    }

    /// Descriptor for the standard HSA triple with no extra features.
    pub fn amdgpu(arch: impl Into<String>) -> Self {
        Self::new(arch, "amdgcn-amd-amdhsa", "")
    }
}

/// Floating-point codegen policy applied to every function of a kernel module.
///
/// Kernel numerics favor fused multiply-add for throughput but must keep
/// standard infinity semantics; NaN-free fast paths are allowed. The three
/// `*-fp-math` settings reach the backend through the per-function string
/// attributes `TargetMachine` reads when resetting its options; the fusion
/// preference has no LLVM-C hook and is recorded here for inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FpMathPolicy {
    pub fuse_fp_ops: bool,
    pub unsafe_fp_math: bool,
    pub no_infs_fp_math: bool,
    pub no_nans_fp_math: bool,
}

impl Default for FpMathPolicy {
    fn default() -> Self {
        Self {
            fuse_fp_ops: true,
            unsafe_fp_math: false,
            no_infs_fp_math: false,
            no_nans_fp_math: true,
        }
    }
}

impl FpMathPolicy {
    /// The string attributes this policy pins on each function.
    pub fn function_attributes(&self) -> [(&'static str, &'static str); 3] {
        [
            ("unsafe-fp-math", flag(self.unsafe_fp_math)),
            ("no-infs-fp-math", flag(self.no_infs_fp_math)),
            ("no-nans-fp-math", flag(self.no_nans_fp_math)),
        ]
    }

    fn apply_to(&self, context: &ContextRef<'_>, function: FunctionValue<'_>) {
        for (key, value) in self.function_attributes() {
            let attr = context.create_string_attribute(key, value);
            function.add_attribute(AttributeLoc::Function, attr);
        }
    }
}

fn flag(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Verify `module`, bind it to `descriptor` and hand back the configured machine.
///
/// Mutates the module: sets the target triple, copies the machine's natural
/// data layout onto it, and marks every function `alwaysinline` (kernels are
/// expected to be single-function after inlining, so no call sites survive
/// to the backend) with the kernel FP policy attached.
pub fn prepare_module<'ctx>(
    module: &Module<'ctx>,
    descriptor: &TargetDescriptor,
) -> TranslateResult<TargetMachine> {
    module
        .verify()
        .map_err(|message| TranslateError::InvalidModule {
            message: message.to_string(),
        })?;

    let triple = TargetTriple::create(&descriptor.triple);
    module.set_triple(&triple);

    let target = Target::from_triple(&triple).map_err(|message| TranslateError::TargetLookup {
        triple: descriptor.triple.clone(),
        message: message.to_string(),
    })?;

    let machine = target
        .create_target_machine(
            &triple,
            &descriptor.arch,
            &descriptor.features,
            OptimizationLevel::Aggressive,
            RelocMode::PIC,
            CodeModel::Default,
        )
        .ok_or_else(|| TranslateError::TargetLookup {
            triple: descriptor.triple.clone(),
            message: format!("target machine construction failed for {}", descriptor.arch),
        })?;

    module.set_data_layout(&machine.get_target_data().get_data_layout());

    let policy = FpMathPolicy::default();
    log::debug!(
        "prepared {} for {} ({}): fp fusion {}",
        module.get_name().to_string_lossy(),
        descriptor.arch,
        descriptor.triple,
        if policy.fuse_fp_ops { "fast" } else { "standard" },
    );

    let context = module.get_context();
    let always_inline =
        context.create_enum_attribute(Attribute::get_named_enum_kind_id("alwaysinline"), 0);
    for function in module.get_functions() {
        function.add_attribute(AttributeLoc::Function, always_inline);
        policy.apply_to(&context, function);
    }

    Ok(machine)
}
