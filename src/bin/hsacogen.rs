//! Command line front end for the HSACO translation pipeline.
//!
//! Reads a textual LLVM IR module, lowers it for the requested AMD GPU
//! target and reports where the linked image landed.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use inkwell::context::Context;
use inkwell::memory_buffer::MemoryBuffer;
use inkwell::module::Module;

use hsacogen::{translate, TargetDescriptor, TranslateError};

#[derive(Parser)]
#[command(name = "hsacogen", about = "Lower LLVM IR to AMDGCN assembly and a linked HSACO image")]
struct Args {
    /// Input LLVM IR file (.ll)
    input: PathBuf,

    /// Target processor, e.g. gfx90a
    #[arg(long)]
    arch: String,

    /// Target triple
    #[arg(long, default_value = "amdgcn-amd-amdhsa")]
    triple: String,

    /// Target feature string, e.g. +sramecc,-xnack
    #[arg(long, default_value = "")]
    features: String,

    /// Copy the linked .hsaco to this path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the generated assembly to stdout
    #[arg(long)]
    emit_asm: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let ir = fs::read_to_string(&args.input)?;

    let context = Context::create();
    let module = parse_module(&context, &ir, &args.input)?;

    let descriptor = TargetDescriptor::new(&args.arch, &args.triple, &args.features);
    let kernel = translate(&module, &descriptor)?;

    if args.emit_asm {
        println!("{}", kernel.amdgcn);
    }

    if let Some(output) = &args.output {
        fs::copy(&kernel.hsaco, output)?;
        eprintln!("wrote {}", output.display());
    } else {
        eprintln!("wrote {}", kernel.hsaco.display());
    }

    Ok(())
}

/// Parse textual LLVM IR into a module owned by `context`.
fn parse_module<'ctx>(
    context: &'ctx Context,
    ir: &str,
    name: &std::path::Path,
) -> Result<Module<'ctx>, TranslateError> {
    let buffer = MemoryBuffer::create_from_memory_range_copy(
        ir.as_bytes(),
        &name.display().to_string(),
    );
    context
        .create_module_from_ir(buffer)
        .map_err(|message| TranslateError::InvalidIr {
            message: message.to_string(),
        })
}
