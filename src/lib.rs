//! hsacogen - LLVM-IR → AMDGCN/HSACO lowering.
//!
//! Final lowering stage of an AMD GPU kernel compiler: given an LLVM IR
//! module and a target descriptor, it produces human-readable AMDGCN
//! assembly and a linked, loadable HSACO image (an ELF shared object
//! written under the system temp directory).
//!
//! # Primary Usage
//!
//! ```ignore
//! use hsacogen::{translate, TargetDescriptor};
//! use inkwell::context::Context;
//!
//! let context = Context::create();
//! let module = context.create_module("kernel");
//! // ... build or parse the kernel IR ...
//!
//! let kernel = translate(&module, &TargetDescriptor::amdgpu("gfx90a"))?;
//! println!("{}", kernel.amdgcn);
//! std::fs::read(&kernel.hsaco)?; // loadable image
//! ```
//!
//! # Architecture
//!
//! - [`target`] - backend registration, target machine setup, kernel policy
//! - [`assembly`] - in-memory AMDGCN assembly emission
//! - [`binary`] - object emission + external `ld.lld` link
//! - [`linker`] - linker resolution and child-process handling
//! - [`scratch`] - unique identifiers for intermediate artifact paths
//! - [`pipeline`] - orchestration of both emission paths

pub mod assembly;
pub mod binary;
pub mod error;
pub mod linker;
pub mod pipeline;
pub mod scratch;
pub mod target;

pub use error::{TranslateError, TranslateResult};
pub use pipeline::{translate, CompiledKernel};
pub use target::{initialize_amdgpu, prepare_module, FpMathPolicy, TargetDescriptor};
