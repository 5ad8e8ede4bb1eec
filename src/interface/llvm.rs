use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;

use super::names::Artifacts;
use super::process::run_build;
use super::BuildPipeline;
use crate::config::Toolchain;
use crate::error::Result;
use crate::types::{BenchmarkDescriptor, HeuristicVariant, ParameterPoint};

/// Build pipeline driving `clang` & `opt` from an LLVM build tree.
pub struct LlvmToolchain {
    clang: PathBuf,
    opt: PathBuf,
    work_dir: PathBuf,
}

impl LlvmToolchain {
    pub fn new(toolchain: &Toolchain) -> Self {
        return Self {
            clang: toolchain.clang_path(),
            opt: toolchain.opt_path(),
            work_dir: toolchain.work_dir.clone(),
        };
    }

    fn names(&self, bench: &BenchmarkDescriptor) -> Artifacts {
        Artifacts::new(&self.work_dir, bench)
    }

    /// Arguments passed to `opt` to select the heuristic & its constants.
    pub fn heuristic_args(point: ParameterPoint, variant: HeuristicVariant) -> Vec<String> {
        vec![
            format!("-pgi-off={}", point.offset),
            format!("-pgi-mul={}", point.multiplier),
            format!("-pgi-linear={}", variant.is_linear()),
        ]
    }
}

impl BuildPipeline for LlvmToolchain {
    fn compile_baseline(&mut self, bench: &BenchmarkDescriptor) -> Result<PathBuf> {
        let out = self.names(bench).bitcode();
        run_build(
            Command::new(&self.clang)
                .args(["-O0", "-emit-llvm"])
                .arg(self.work_dir.join(&bench.identifier))
                .arg("-c")
                .arg("-o")
                .arg(&out)
                .args(&bench.extra_build_flags),
        )?;
        return Ok(out);
    }

    fn instrument_for_profiling(
        &mut self,
        bench: &BenchmarkDescriptor,
        artifact: &Path,
    ) -> Result<PathBuf> {
        let out = self.names(bench).profiled_bitcode();
        run_build(
            Command::new(&self.opt)
                .arg("-insert-edge-profiling")
                .arg(artifact)
                .arg("-o")
                .arg(&out),
        )?;
        return Ok(out);
    }

    fn link(
        &mut self,
        bench: &BenchmarkDescriptor,
        artifact: &Path,
        extra_libs: &[PathBuf],
        output: &Path,
    ) -> Result<PathBuf> {
        run_build(
            Command::new(&self.clang)
                .arg("-O0")
                .arg(artifact)
                .args(extra_libs)
                .arg("-o")
                .arg(output)
                .args(&bench.extra_build_flags),
        )?;
        return Ok(output.to_path_buf());
    }

    fn build_reference(&mut self, bench: &BenchmarkDescriptor) -> Result<PathBuf> {
        let names = self.names(bench);
        let bitcode = names.reference_bitcode();
        run_build(
            Command::new(&self.opt)
                .arg("-inline")
                .arg(names.bitcode())
                .arg("-o")
                .arg(&bitcode),
        )?;
        return self.link(bench, &bitcode, &[], &names.reference_binary());
    }

    fn build_with_heuristic(
        &mut self,
        bench: &BenchmarkDescriptor,
        point: ParameterPoint,
        variant: HeuristicVariant,
        profile: &Path,
    ) -> Result<PathBuf> {
        let names = self.names(bench);
        let bitcode = names.heuristic_bitcode();
        debug!("Building {} with {} heuristic at {}", bench.identifier, variant, point);

        run_build(
            Command::new(&self.opt)
                .args(Self::heuristic_args(point, variant))
                .args(["-profile-loader", "-profile-info-file"])
                .arg(profile)
                .arg("-inline")
                .arg(names.bitcode())
                .arg("-o")
                .arg(&bitcode),
        )?;
        return self.link(bench, &bitcode, &[], &names.heuristic_binary());
    }
}
